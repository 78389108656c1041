//! Luma grayscale conversion.

use crate::parallel::Engine;
use crate::pixel::{Pixel, PixelMatrix};
use log::info;

/// `0.299 R + 0.587 G + 0.114 B`, truncated toward zero.
///
/// Evaluated in fixed point so the truncation is exact: a pixel with
/// `R == G == B == v` always maps back to `v`.
pub fn luma(p: Pixel) -> u16 {
    let weighted = 299 * u32::from(p.r) + 587 * u32::from(p.g) + 114 * u32::from(p.b);
    (weighted / 1000) as u16
}

/// Replace every pixel with its luma, in place, one row range per worker.
pub fn grayscale(engine: &Engine, matrix: &mut PixelMatrix) {
    let (width, height) = matrix.dimensions();
    engine.for_each_rows(matrix, |_, rows| {
        for p in rows.iter_mut() {
            *p = Pixel::gray(luma(*p));
        }
    });
    info!("grayscale applied to {width}x{height} matrix");
}
