//! Pixel-level transform operations.
//!
//! Everything here takes and returns a [`DynamicImage`]; blur, sharpen and
//! grayscale go straight through the image crate in the executor and have
//! no wrapper.

use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};
use imgstage_core::config::{Background, ExtendMargins, ExtractRegion};

use crate::error::TransformError;

/// Extract a rectangle. Fails when the region falls outside the image.
pub fn extract(img: &DynamicImage, region: ExtractRegion) -> Result<DynamicImage, TransformError> {
    let (width, height) = img.dimensions();
    if region.width == 0 || region.height == 0 {
        return Err(TransformError::InvalidGeometry(format!(
            "extract region {}x{} is empty",
            region.width, region.height
        )));
    }
    let right = region.left.checked_add(region.width);
    let bottom = region.top.checked_add(region.height);
    match (right, bottom) {
        (Some(r), Some(b)) if r <= width && b <= height => {
            Ok(img.crop_imm(region.left, region.top, region.width, region.height))
        }
        _ => Err(TransformError::InvalidGeometry(format!(
            "extract region {}+{}x{}+{} exceeds image bounds {}x{}",
            region.left, region.width, region.top, region.height, width, height
        ))),
    }
}

/// Trim near-uniform borders. The top-left pixel is the reference; a border
/// row or column is removed while every pixel in it stays within `threshold`
/// mean channel distance of the reference. A fully uniform image is
/// returned untouched rather than trimmed to nothing.
pub fn trim(img: &DynamicImage, threshold: u32) -> DynamicImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let reference = *rgba.get_pixel(0, 0);

    let row_uniform = |y: u32, x0: u32, x1: u32| {
        (x0..x1).all(|x| within(rgba.get_pixel(x, y), &reference, threshold))
    };
    let col_uniform = |x: u32, y0: u32, y1: u32| {
        (y0..y1).all(|y| within(rgba.get_pixel(x, y), &reference, threshold))
    };

    let mut top = 0;
    while top < height && row_uniform(top, 0, width) {
        top += 1;
    }
    if top == height {
        return img.clone();
    }
    let mut bottom = height;
    while bottom > top && row_uniform(bottom - 1, 0, width) {
        bottom -= 1;
    }
    let mut left = 0;
    while left < width && col_uniform(left, top, bottom) {
        left += 1;
    }
    let mut right = width;
    while right > left && col_uniform(right - 1, top, bottom) {
        right -= 1;
    }

    img.crop_imm(left, top, right - left, bottom - top)
}

fn within(pixel: &Rgba<u8>, reference: &Rgba<u8>, threshold: u32) -> bool {
    let diff: u32 = pixel.0[..3]
        .iter()
        .zip(&reference.0[..3])
        .map(|(a, b)| (*a as i32 - *b as i32).unsigned_abs())
        .sum();
    diff / 3 <= threshold
}

/// Composite the image over the background color, removing transparency.
pub fn flatten(img: &DynamicImage, background: Background) -> DynamicImage {
    let (width, height) = img.dimensions();
    let fill = Rgba([background.r, background.g, background.b, 255]);
    let mut canvas = RgbaImage::from_pixel(width, height, fill);
    imageops::overlay(&mut canvas, &img.to_rgba8(), 0, 0);
    DynamicImage::ImageRgba8(canvas)
}

/// Extend the canvas by the given margins, filled with the background.
pub fn extend(img: &DynamicImage, margins: ExtendMargins, background: Background) -> DynamicImage {
    let (width, height) = img.dimensions();
    let mut canvas = RgbaImage::from_pixel(
        width + margins.left + margins.right,
        height + margins.top + margins.bottom,
        Rgba(background.rgba()),
    );
    imageops::overlay(
        &mut canvas,
        &img.to_rgba8(),
        margins.left as i64,
        margins.top as i64,
    );
    DynamicImage::ImageRgba8(canvas)
}

/// Invert the color channels (alpha untouched).
pub fn negate(img: &DynamicImage) -> DynamicImage {
    let mut out = img.clone();
    out.invert();
    out
}

/// Rotate clockwise by a right angle. 0 is a no-op; the plan builder never
/// emits any other angle.
pub fn rotate(img: &DynamicImage, angle: u16) -> DynamicImage {
    match angle {
        90 => DynamicImage::ImageRgba8(imageops::rotate90(&img.to_rgba8())),
        180 => DynamicImage::ImageRgba8(imageops::rotate180(&img.to_rgba8())),
        270 => DynamicImage::ImageRgba8(imageops::rotate270(&img.to_rgba8())),
        _ => img.clone(),
    }
}

/// Flip about the horizontal axis (top becomes bottom).
pub fn flip(img: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageRgba8(imageops::flip_vertical(&img.to_rgba8()))
}

/// Mirror about the vertical axis (left becomes right).
pub fn flop(img: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()))
}

/// Gamma-correct the color channels with a 256-entry lookup table.
pub fn gamma(img: &DynamicImage, value: f32) -> DynamicImage {
    let value = value.clamp(1.0, 3.0);
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = (255.0 * (i as f32 / 255.0).powf(1.0 / value)).round() as u8;
    }

    let mut rgba = img.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = lut[*channel as usize];
        }
    }
    DynamicImage::ImageRgba8(rgba)
}

/// Stretch luminance to the full 0..=255 range.
pub fn normalize(img: &DynamicImage) -> DynamicImage {
    let mut rgba = img.to_rgba8();

    let (mut min, mut max) = (255u8, 0u8);
    for pixel in rgba.pixels() {
        let luma = luminance(pixel);
        min = min.min(luma);
        max = max.max(luma);
    }
    if min >= max {
        return img.clone();
    }

    let range = (max - min) as f32;
    for pixel in rgba.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            let stretched = (*channel as f32 - min as f32) * 255.0 / range;
            *channel = stretched.clamp(0.0, 255.0).round() as u8;
        }
    }
    DynamicImage::ImageRgba8(rgba)
}

fn luminance(pixel: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32).round() as u8
}
