//! Pixelation: each block is flattened to its average color.

use crate::block::{average, spans};
use crate::parallel::Engine;
use crate::pixel::PixelMatrix;
use log::info;

/// Overwrite every `factor`×`factor` block of `matrix` with its average,
/// in place. Edge blocks are clipped. `factor <= 1` leaves the matrix as is.
///
/// Workers receive whole bands of blocks, so the result is the same as a
/// sequential pass over [`crate::block::decompose`].
pub fn downscale(engine: &Engine, matrix: &mut PixelMatrix, factor: usize) {
    if factor <= 1 || matrix.is_empty() {
        return;
    }
    let (width, height) = matrix.dimensions();
    engine.for_each_aligned_rows(matrix, factor, |range, rows| {
        // Same block extents and row-major order as `decompose`, restricted
        // to the bands starting inside `range`; `base` maps rows into `rows`.
        let base = range.start;
        for (y0, y1) in spans(range.end, factor).skip_while(|&(y0, _)| y0 < base) {
            for (x0, x1) in spans(width, factor) {
                let avg = average((y0..y1).map(|y| {
                    let off = (y - base) * width;
                    &rows[off + x0..off + x1]
                }));
                for y in y0..y1 {
                    let off = (y - base) * width;
                    rows[off + x0..off + x1].fill(avg);
                }
            }
        }
    });
    info!("downscaled {width}x{height} matrix with factor {factor}");
}
