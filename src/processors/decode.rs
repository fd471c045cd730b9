//! Decoding uploaded bytes into pixel buffers.
//!
//! The decoder accepts any raster format the `image` crate understands and
//! always hands an 8-bit RGB buffer to the rest of the pipeline. Inputs with
//! other channel layouts are converted deterministically: grayscale is
//! replicated across the three channels, alpha and palette entries are
//! resolved and dropped.

use crate::core::errors::ClassifyError;
use image::RgbImage;

/// Decodes raw upload bytes into an RGB pixel buffer.
///
/// # Errors
///
/// Returns `ClassifyError::Decode` if the bytes are not a valid encoding of
/// a still image. No partial buffer is ever returned.
pub fn decode_image(data: &[u8]) -> Result<RgbImage, ClassifyError> {
    let img = image::load_from_memory(data).map_err(ClassifyError::Decode)?;
    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, Rgba};
    use std::io::Cursor;

    fn encode(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn decodes_rgb_png_and_preserves_dimensions() {
        let img = RgbImage::from_pixel(500, 300, Rgb([10, 20, 30]));
        let bytes = encode(DynamicImage::ImageRgb8(img));

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (500, 300));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn grayscale_input_is_replicated_to_rgb() {
        let img = image::GrayImage::from_pixel(16, 16, image::Luma([128]));
        let bytes = encode(DynamicImage::ImageLuma8(img));

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
        assert_eq!(decoded.get_pixel(5, 5), &Rgb([128, 128, 128]));
    }

    #[test]
    fn rgba_input_drops_alpha() {
        let img = image::RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 7]));
        let bytes = encode(DynamicImage::ImageRgba8(img));

        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([200, 100, 50]));
    }

    #[test]
    fn malformed_bytes_fail_with_decode_error() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(ClassifyError::Decode(_))));
    }

    #[test]
    fn empty_input_fails_with_decode_error() {
        assert!(matches!(decode_image(&[]), Err(ClassifyError::Decode(_))));
    }
}
