//! Resize geometry.
//!
//! The crop/embed/max/min/without-enlargement/ignore-aspect-ratio operations
//! do not transform pixels on their own: they modify how the single resize
//! executes, exactly like the query object they accumulate on in the
//! configuration model. The executor folds them into a [`ResizeMode`] and
//! calls [`apply_resize`] once.

use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};
use imgstage_core::config::Background;

use crate::plan::Gravity;

/// Folded resize modifiers for one variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeMode {
    pub gravity: Option<Gravity>,
    pub embed: bool,
    pub max: bool,
    pub min: bool,
    pub without_enlargement: bool,
    pub ignore_aspect_ratio: bool,
}

/// Select a filter by downscale ratio: cheaper filters for heavy
/// reductions, Lanczos for mild ones.
pub fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> imageops::FilterType {
    let width_ratio = orig_width as f32 / new_width.max(1) as f32;
    let height_ratio = orig_height as f32 / new_height.max(1) as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        imageops::FilterType::Triangle
    } else if max_ratio > 1.5 {
        imageops::FilterType::CatmullRom
    } else {
        imageops::FilterType::Lanczos3
    }
}

/// Apply the resolved resize to the image.
///
/// Precedence when several modifiers are set mirrors the original engine:
/// ignore-aspect-ratio (exact stretch) > embed (letterbox on the background)
/// > max (fit inside) > min (cover, no crop) > default cover-and-crop at the
/// gravity (center unless a crop gravity was configured).
pub fn apply_resize(
    img: &DynamicImage,
    target_width: u32,
    target_height: u32,
    mode: &ResizeMode,
    background: Background,
) -> DynamicImage {
    let (orig_width, orig_height) = img.dimensions();
    let target_width = target_width.max(1);
    let target_height = target_height.max(1);

    if mode.ignore_aspect_ratio {
        if mode.without_enlargement && target_width >= orig_width && target_height >= orig_height {
            return img.clone();
        }
        let filter = select_filter(orig_width, orig_height, target_width, target_height);
        return img.resize_exact(target_width, target_height, filter);
    }

    if mode.embed {
        let inner = fit_inside(img, target_width, target_height, mode.without_enlargement);
        return pad_to_canvas(&inner, target_width, target_height, background);
    }

    if mode.max {
        return fit_inside(img, target_width, target_height, mode.without_enlargement);
    }

    if mode.min {
        return cover(img, target_width, target_height, mode.without_enlargement);
    }

    // Default: cover the target box, then crop to it at the gravity.
    let covered = cover(img, target_width, target_height, mode.without_enlargement);
    let (cw, ch) = covered.dimensions();
    if cw <= target_width && ch <= target_height {
        // Enlargement was suppressed; nothing to crop.
        return covered;
    }
    let crop_w = target_width.min(cw);
    let crop_h = target_height.min(ch);
    let (x, y) = gravity_offset(mode.gravity.unwrap_or(Gravity::Center), cw, ch, crop_w, crop_h);
    covered.crop_imm(x, y, crop_w, crop_h)
}

/// Resize preserving aspect so both dimensions fit within the target.
fn fit_inside(img: &DynamicImage, width: u32, height: u32, without_enlargement: bool) -> DynamicImage {
    let (ow, oh) = img.dimensions();
    if without_enlargement && ow <= width && oh <= height {
        return img.clone();
    }
    let filter = select_filter(ow, oh, width, height);
    img.resize(width, height, filter)
}

/// Resize preserving aspect so both dimensions are at least the target.
fn cover(img: &DynamicImage, width: u32, height: u32, without_enlargement: bool) -> DynamicImage {
    let (ow, oh) = img.dimensions();
    let scale = (width as f64 / ow as f64).max(height as f64 / oh as f64);
    if without_enlargement && scale > 1.0 {
        return img.clone();
    }
    let new_w = ((ow as f64 * scale).round() as u32).max(width);
    let new_h = ((oh as f64 * scale).round() as u32).max(height);
    let filter = select_filter(ow, oh, new_w, new_h);
    img.resize_exact(new_w, new_h, filter)
}

/// Center the image on an exactly-sized canvas filled with the background.
fn pad_to_canvas(
    img: &DynamicImage,
    width: u32,
    height: u32,
    background: Background,
) -> DynamicImage {
    let (iw, ih) = img.dimensions();
    if iw == width && ih == height {
        return img.clone();
    }
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba(background.rgba()));
    let x = (width.saturating_sub(iw) / 2) as i64;
    let y = (height.saturating_sub(ih) / 2) as i64;
    imageops::overlay(&mut canvas, &img.to_rgba8(), x, y);
    DynamicImage::ImageRgba8(canvas)
}

/// Top-left offset of a `crop_w`x`crop_h` window anchored at the gravity
/// inside a `width`x`height` image.
fn gravity_offset(gravity: Gravity, width: u32, height: u32, crop_w: u32, crop_h: u32) -> (u32, u32) {
    let max_x = width - crop_w;
    let max_y = height - crop_h;
    let (fx, fy) = match gravity {
        Gravity::Northwest => (0.0, 0.0),
        Gravity::North => (0.5, 0.0),
        Gravity::Northeast => (1.0, 0.0),
        Gravity::West => (0.0, 0.5),
        Gravity::Center => (0.5, 0.5),
        Gravity::East => (1.0, 0.5),
        Gravity::Southwest => (0.0, 1.0),
        Gravity::South => (0.5, 1.0),
        Gravity::Southeast => (1.0, 1.0),
    };
    (
        (max_x as f64 * fx).round() as u32,
        (max_y as f64 * fy).round() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn test_default_cover_crops_to_exact_target() {
        let out = apply_resize(&img(400, 200), 100, 100, &ResizeMode::default(), bg());
        assert_eq!(out.dimensions(), (100, 100));
    }

    #[test]
    fn test_ignore_aspect_ratio_stretches() {
        let mode = ResizeMode {
            ignore_aspect_ratio: true,
            ..Default::default()
        };
        let out = apply_resize(&img(400, 200), 50, 300, &mode, bg());
        assert_eq!(out.dimensions(), (50, 300));
    }

    #[test]
    fn test_max_fits_inside() {
        let mode = ResizeMode {
            max: true,
            ..Default::default()
        };
        let out = apply_resize(&img(400, 200), 100, 100, &mode, bg());
        assert_eq!(out.dimensions(), (100, 50));
    }

    #[test]
    fn test_min_covers_target() {
        let mode = ResizeMode {
            min: true,
            ..Default::default()
        };
        let out = apply_resize(&img(400, 200), 100, 100, &mode, bg());
        let (w, h) = out.dimensions();
        assert!(w >= 100 && h >= 100);
        assert_eq!(h, 100);
        assert_eq!(w, 200);
    }

    #[test]
    fn test_embed_pads_to_exact_target() {
        let mode = ResizeMode {
            embed: true,
            ..Default::default()
        };
        let out = apply_resize(&img(400, 200), 100, 100, &mode, bg());
        assert_eq!(out.dimensions(), (100, 100));
        // Letterbox rows carry the background color
        let top = out.to_rgba8().get_pixel(0, 0).0;
        assert_eq!(top, [200, 200, 200, 255]);
    }

    #[test]
    fn test_without_enlargement_keeps_small_images() {
        let mode = ResizeMode {
            without_enlargement: true,
            ..Default::default()
        };
        let out = apply_resize(&img(40, 20), 100, 100, &mode, bg());
        assert_eq!(out.dimensions(), (40, 20));
    }

    #[test]
    fn test_gravity_offsets() {
        assert_eq!(gravity_offset(Gravity::Northwest, 200, 100, 50, 50), (0, 0));
        assert_eq!(gravity_offset(Gravity::Southeast, 200, 100, 50, 50), (150, 50));
        assert_eq!(gravity_offset(Gravity::Center, 200, 100, 50, 50), (75, 25));
        assert_eq!(gravity_offset(Gravity::North, 200, 100, 50, 50), (75, 0));
        assert_eq!(gravity_offset(Gravity::West, 200, 100, 50, 50), (0, 25));
    }

    #[test]
    fn test_filter_selection_by_ratio() {
        assert_eq!(select_filter(400, 400, 100, 100), imageops::FilterType::Triangle);
        assert_eq!(select_filter(180, 180, 100, 100), imageops::FilterType::CatmullRom);
        assert_eq!(select_filter(110, 110, 100, 100), imageops::FilterType::Lanczos3);
    }

    fn bg() -> Background {
        Background {
            r: 200,
            g: 200,
            b: 200,
            a: 1.0,
        }
    }
}
