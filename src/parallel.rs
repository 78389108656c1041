//! Static row-range partitioning over a dedicated worker pool.
//!
//! Work is split into a fixed list of contiguous `start..end` ranges computed
//! from the item count and the degree of parallelism. Each range gets its own
//! task and exclusive access to its slice of the destination, and every entry
//! point returns only after all tasks have finished. Ranges are assigned by
//! index, so results never depend on scheduling.

use crate::pixel::{Pixel, PixelMatrix};
use crate::Result;
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::ops::Range;

/// Split `0..len` into at most `workers` contiguous, disjoint ranges.
///
/// The chunk size is `len / n` with `n = min(workers, len)`, and the final
/// range absorbs the remainder. The result tiles `0..len` exactly once; an
/// empty list is returned for `len == 0`.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    let n = workers.max(1).min(len);
    if n == 0 {
        return Vec::new();
    }
    let chunk = len / n;
    (0..n)
        .map(|i| {
            let start = i * chunk;
            let end = if i == n - 1 { len } else { start + chunk };
            start..end
        })
        .collect()
}

pub struct Engine {
    workers: usize,
    pool: ThreadPool,
}

impl Engine {
    /// Engine with `workers` threads (at least one).
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("pixmosaic-worker-{i}"))
            .build()?;
        Ok(Self { workers, pool })
    }

    /// One worker per logical CPU.
    pub fn with_default_parallelism() -> Result<Self> {
        Self::new(num_cpus::get())
    }

    /// Single worker; produces the same output as any other engine.
    pub fn sequential() -> Result<Self> {
        Self::new(1)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn partition(&self, len: usize) -> Vec<Range<usize>> {
        partition(len, self.workers)
    }

    /// Run `f` over disjoint row ranges of `matrix`, in place.
    ///
    /// `f` receives the absolute row range and the flat pixel slice holding
    /// exactly those rows (`range.len() * width` pixels).
    pub fn for_each_rows<F>(&self, matrix: &mut PixelMatrix, f: F)
    where
        F: Fn(Range<usize>, &mut [Pixel]) + Sync,
    {
        let ranges = self.partition(matrix.height());
        self.dispatch(matrix, ranges, f);
    }

    /// Like [`Engine::for_each_rows`], but every range boundary falls on a
    /// multiple of `align` rows so a band of `align`-high blocks is never
    /// split between two workers.
    pub fn for_each_aligned_rows<F>(&self, matrix: &mut PixelMatrix, align: usize, f: F)
    where
        F: Fn(Range<usize>, &mut [Pixel]) + Sync,
    {
        let align = align.max(1);
        let height = matrix.height();
        let bands = height.div_ceil(align);
        let ranges = self
            .partition(bands)
            .into_iter()
            .map(|r| r.start * align..(r.end * align).min(height))
            .collect();
        self.dispatch(matrix, ranges, f);
    }

    /// Evaluate `f` for every index range of `0..len` concurrently and
    /// concatenate the per-range outputs in range order.
    pub fn map_ranges<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(Range<usize>) -> Vec<T> + Sync,
    {
        let ranges = self.partition(len);
        debug!("mapping {len} items over {} ranges", ranges.len());
        let parts: Vec<Vec<T>> = self.pool.install(|| ranges.into_par_iter().map(&f).collect());
        parts.into_iter().flatten().collect()
    }

    fn dispatch<F>(&self, matrix: &mut PixelMatrix, ranges: Vec<Range<usize>>, f: F)
    where
        F: Fn(Range<usize>, &mut [Pixel]) + Sync,
    {
        let width = matrix.width();
        debug!(
            "dispatching {} row ranges over {} workers for {}x{} matrix",
            ranges.len(),
            self.workers,
            width,
            matrix.height()
        );

        let mut tasks = Vec::with_capacity(ranges.len());
        let mut rest = matrix.pixels_mut();
        for range in ranges {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * width);
            tasks.push((range, head));
            rest = tail;
        }
        debug_assert!(rest.is_empty(), "row ranges must tile the matrix");

        // for_each returns once every task has completed
        self.pool.install(|| {
            tasks.into_par_iter().for_each(|(range, rows)| f(range, rows));
        });
    }
}
