//! Block decomposition - splits a matrix into `factor`×`factor` tiles.

use crate::pixel::{Pixel, PixelMatrix};
use crate::{MosaicError, Result};

/// Rectangular tile of a matrix. Tiles on the right and bottom edges are
/// clipped to the matrix when its size is not a multiple of the factor.
#[derive(Clone, Debug)]
pub struct Block<'a> {
    /// Top-left corner in the owning matrix.
    pub x: usize,
    pub y: usize,
    rows: Vec<&'a [Pixel]>,
    average: Pixel,
}

impl<'a> Block<'a> {
    fn new(x: usize, y: usize, rows: Vec<&'a [Pixel]>) -> Self {
        let average = average(rows.iter().copied());
        Self { x, y, rows, average }
    }

    pub fn average(&self) -> Pixel {
        self.average
    }

    pub fn rows(&self) -> &[&'a [Pixel]] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Same pixel content anchored at another position.
    pub fn relocated(&self, x: usize, y: usize) -> Block<'a> {
        Block { x, y, rows: self.rows.clone(), average: self.average }
    }
}

/// Component-wise mean over all pixels, truncated. Black for no pixels.
pub fn average<'a>(rows: impl IntoIterator<Item = &'a [Pixel]>) -> Pixel {
    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for p in rows.into_iter().flatten() {
        r += u64::from(p.r);
        g += u64::from(p.g);
        b += u64::from(p.b);
        count += 1;
    }
    if count == 0 {
        return Pixel::default();
    }
    Pixel::new((r / count) as u16, (g / count) as u16, (b / count) as u16)
}

/// Tile origins along one axis: `0, factor, 2*factor, ...` below `len`,
/// with the clipped extent of each tile.
pub(crate) fn spans(len: usize, factor: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..len).step_by(factor.max(1)).map(move |start| (start, (start + factor).min(len)))
}

/// Split `matrix` into blocks in row-major block order: top to bottom, then
/// left to right within a band.
pub fn decompose(matrix: &PixelMatrix, factor: usize) -> Result<Vec<Block<'_>>> {
    if factor == 0 {
        return Err(MosaicError::ZeroFactor);
    }
    let (width, height) = matrix.dimensions();
    let mut blocks = Vec::with_capacity(width.div_ceil(factor) * height.div_ceil(factor));
    for (y0, y1) in spans(height, factor) {
        for (x0, x1) in spans(width, factor) {
            let rows = (y0..y1).map(|y| &matrix.row(y)[x0..x1]).collect();
            blocks.push(Block::new(x0, y0, rows));
        }
    }
    Ok(blocks)
}
