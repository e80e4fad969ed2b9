//! Variant encoding.
//!
//! JPEG goes through mozjpeg so quality and progressive scans are honored;
//! PNG through the image crate; WebP through libwebp. The output identifier
//! comes from the configuration unvalidated, so an unrecognized value falls
//! back to JPEG while the file keeps the configured extension.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::error::TransformError;
use crate::plan::DEFAULT_QUALITY;

/// Encode parameters collected from the plan's quality/progressive steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub quality: u8,
    pub progressive: bool,
}

impl Default for EncodeParams {
    fn default() -> Self {
        EncodeParams {
            quality: DEFAULT_QUALITY,
            progressive: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// Map the configured output identifier to a format, falling back to
    /// JPEG for anything unrecognized.
    pub fn parse(output: &str) -> OutputFormat {
        match output.to_ascii_lowercase().as_str() {
            "png" => OutputFormat::Png,
            "webp" => OutputFormat::WebP,
            _ => OutputFormat::Jpeg,
        }
    }
}

/// Encode one variant image.
pub fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    params: &EncodeParams,
) -> Result<Bytes, TransformError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(img, params),
        OutputFormat::Png => encode_png(img),
        OutputFormat::WebP => encode_webp(img, params),
    }
}

fn encode_jpeg(img: &DynamicImage, params: &EncodeParams) -> Result<Bytes, TransformError> {
    let rgb_img = img.to_rgb8();
    let (width, height) = rgb_img.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(params.quality.clamp(1, 100) as f32);
    if params.progressive {
        comp.set_progressive_mode();
    }
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| TransformError::Encode(format!("JPEG compressor start failed: {e}")))?;
    comp.write_scanlines(&rgb_img)
        .map_err(|e| TransformError::Encode(format!("JPEG scanline write failed: {e}")))?;
    let jpeg_data = comp
        .finish()
        .map_err(|e| TransformError::Encode(format!("JPEG finish failed: {e}")))?;

    Ok(Bytes::from(jpeg_data))
}

fn encode_png(img: &DynamicImage) -> Result<Bytes, TransformError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| TransformError::Encode(format!("PNG encode failed: {e}")))?;
    Ok(Bytes::from(buffer))
}

fn encode_webp(img: &DynamicImage, params: &EncodeParams) -> Result<Bytes, TransformError> {
    let (width, height) = img.dimensions();
    let rgba_img = img.to_rgba8();

    let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
    let webp_data = encoder.encode(params.quality.clamp(1, 100) as f32);

    Ok(Bytes::copy_from_slice(&webp_data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn img() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([120, 30, 200, 255])))
    }

    #[test]
    fn test_parse_output_identifier() {
        assert_eq!(OutputFormat::parse("jpg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("jpeg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::parse("PNG"), OutputFormat::Png);
        assert_eq!(OutputFormat::parse("webp"), OutputFormat::WebP);
        // Unrecognized falls back to JPEG
        assert_eq!(OutputFormat::parse("tiff"), OutputFormat::Jpeg);
    }

    #[test]
    fn test_jpeg_round_trips_through_decoder() {
        let data = encode(&img(), OutputFormat::Jpeg, &EncodeParams::default()).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (8, 8));
    }

    #[test]
    fn test_progressive_jpeg_decodes() {
        let params = EncodeParams {
            quality: 90,
            progressive: true,
        };
        let data = encode(&img(), OutputFormat::Jpeg, &params).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.dimensions(), (8, 8));
    }

    #[test]
    fn test_png_and_webp_magic_bytes() {
        let png = encode(&img(), OutputFormat::Png, &EncodeParams::default()).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);

        let webp = encode(&img(), OutputFormat::WebP, &EncodeParams::default()).unwrap();
        assert_eq!(&webp[..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");
    }
}
