//! Pixel and pixel matrix data model shared by every transform.

use crate::{MosaicError, Result};

/// RGB value with 16-bit channels. No alpha; treated as opaque downstream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Pixel {
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u16) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Sum of squared channel differences. Only relative ordering matters,
    /// so no square root is taken.
    pub fn distance_sq(&self, other: &Pixel) -> u64 {
        let dr = i64::from(self.r) - i64::from(other.r);
        let dg = i64::from(self.g) - i64::from(other.g);
        let db = i64::from(self.b) - i64::from(other.b);
        (dr * dr + dg * dg + db * db) as u64
    }
}

/// Rectangular row-major grid of pixels.
///
/// Storage is a single flat buffer, so rows can never be ragged once the
/// matrix exists. Cloning is explicit: transforms that mutate in place take
/// `&mut`, and callers keep the original by calling [`PixelMatrix::clone`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelMatrix {
    width: usize,
    height: usize,
    data: Vec<Pixel>,
}

impl PixelMatrix {
    /// Black matrix of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Pixel::default())
    }

    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Self {
        Self { width, height, data: vec![pixel; width * height] }
    }

    /// Build from nested rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<Pixel>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(width * height);
        for (row, pixels) in rows.into_iter().enumerate() {
            if pixels.len() != width {
                return Err(MosaicError::RaggedRows { row, expected: width, found: pixels.len() });
            }
            data.extend(pixels);
        }
        Ok(Self { width, height, data })
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Pixel) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Panics when `(x, y)` lies outside the matrix.
    pub fn get(&self, x: usize, y: usize) -> Pixel {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.data[y * self.width + x] = pixel;
    }

    pub fn row(&self, y: usize) -> &[Pixel] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        // chunks_exact panics on 0; an empty matrix has no rows anyway
        self.data.chunks_exact(self.width.max(1))
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<Pixel>> {
        self.rows().map(<[Pixel]>::to_vec).collect()
    }
}
