//! Bridge between decoded images and pixel matrices.

use crate::parallel::Engine;
use crate::pixel::{Pixel, PixelMatrix};
use crate::Result;
use image::{DynamicImage, ImageBuffer, Rgb, Rgba, RgbaImage};
use log::info;
use std::borrow::Cow;
use std::path::Path;

type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

/// Decode an image file. Fails before any transform sees partial data.
pub fn open(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let image = image::open(path)?;
    info!("decoded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

/// Copy the RGB channels of `image` into a new matrix, one row range per
/// worker. 16-bit RGB sources are borrowed as is; every other layout is
/// converted once to 16-bit RGB (8-bit channels widen by `* 0x101`, gray
/// replicates into all three channels, alpha is dropped).
pub fn extract(engine: &Engine, image: &DynamicImage) -> PixelMatrix {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut matrix = PixelMatrix::new(width, height);
    if matrix.is_empty() {
        return matrix;
    }

    let rgb16: Cow<'_, Rgb16Image> = match image.as_rgb16() {
        Some(buffer) => Cow::Borrowed(buffer),
        None => Cow::Owned(image.to_rgb16()),
    };
    let samples = rgb16.as_raw();
    engine.for_each_rows(&mut matrix, |range, rows| {
        let src = &samples[range.start * width * 3..range.end * width * 3];
        for (dst, rgb) in rows.iter_mut().zip(src.chunks_exact(3)) {
            *dst = Pixel::new(rgb[0], rgb[1], rgb[2]);
        }
    });
    matrix
}

/// Narrow to 8 bits per channel with a fully opaque alpha channel.
pub fn to_rgba8(matrix: &PixelMatrix) -> RgbaImage {
    let (width, height) = matrix.dimensions();
    RgbaImage::from_fn(width as u32, height as u32, |x, y| {
        let p = matrix.get(x as usize, y as usize);
        Rgba([(p.r >> 8) as u8, (p.g >> 8) as u8, (p.b >> 8) as u8, 255])
    })
}

/// Encode `matrix` to `path`; the format follows the file extension.
pub fn save(matrix: &PixelMatrix, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    to_rgba8(matrix).save(path)?;
    info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, LumaA, RgbImage};

    #[test]
    fn extract_widens_8bit_channels() {
        let engine = Engine::new(2).unwrap();
        let img = RgbImage::from_fn(3, 5, |x, y| Rgb([x as u8 * 80, y as u8 * 50, 0xff]));
        let m = extract(&engine, &DynamicImage::ImageRgb8(img));
        assert_eq!(m.dimensions(), (3, 5));
        assert_eq!(m.get(2, 4), Pixel::new(160 * 0x101, 200 * 0x101, 0xffff));
        assert_eq!(m.get(0, 0), Pixel::new(0, 0, 0xffff));
    }

    #[test]
    fn extract_copies_16bit_channels() {
        let engine = Engine::new(3).unwrap();
        let img: Rgb16Image = ImageBuffer::from_fn(4, 4, |x, y| Rgb([x as u16 * 1001, y as u16 * 3, 12345]));
        let m = extract(&engine, &DynamicImage::ImageRgb16(img));
        assert_eq!(m.get(3, 2), Pixel::new(3003, 6, 12345));
    }

    #[test]
    fn extract_keeps_low_byte_of_16bit_rgba() {
        let engine = Engine::new(2).unwrap();
        let img = ImageBuffer::from_pixel(3, 4, Rgba([0x1234u16, 0xabcd, 0x0001, 0xffff]));
        let m = extract(&engine, &DynamicImage::ImageRgba16(img));
        assert_eq!(m, PixelMatrix::filled(3, 4, Pixel::new(0x1234, 0xabcd, 0x0001)));
    }

    #[test]
    fn extract_replicates_16bit_gray() {
        let engine = Engine::new(3).unwrap();
        let luma = ImageBuffer::from_fn(2, 5, |x, y| Luma([0x1234u16 + (x + 2 * y) as u16]));
        let m = extract(&engine, &DynamicImage::ImageLuma16(luma));
        assert_eq!(m.get(0, 0), Pixel::gray(0x1234));
        assert_eq!(m.get(1, 4), Pixel::gray(0x1234 + 9));

        let luma_alpha = ImageBuffer::from_pixel(2, 2, LumaA([0xfedcu16, 0x0102]));
        let m = extract(&engine, &DynamicImage::ImageLumaA16(luma_alpha));
        assert_eq!(m, PixelMatrix::filled(2, 2, Pixel::gray(0xfedc)));
    }

    #[test]
    fn rgba8_shifts_channels_and_is_opaque() {
        let m = PixelMatrix::filled(2, 1, Pixel::new(0xabcd, 0x00ff, 0xff00));
        let img = to_rgba8(&m);
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(1, 0).0, [0xab, 0x00, 0xff, 255]);
    }

    #[test]
    fn extract_then_encode_preserves_8bit_values() {
        let engine = Engine::new(2).unwrap();
        let img = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8 * 60, y as u8 * 70, 7]));
        let m = extract(&engine, &DynamicImage::ImageRgb8(img.clone()));
        let back = to_rgba8(&m);
        for (x, y, p) in img.enumerate_pixels() {
            let [r, g, b] = p.0;
            assert_eq!(back.get_pixel(x, y).0, [r, g, b, 255]);
        }
    }

    #[test]
    fn open_missing_file_is_an_error() {
        assert!(open("/nonexistent/definitely-missing.png").is_err());
    }
}
