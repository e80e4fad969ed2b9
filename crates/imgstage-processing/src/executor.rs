//! Plan execution.
//!
//! Applies one variant's operation plan to the shared master image. The
//! resize-family operations (crop gravity, embed, max, min,
//! without-enlargement, ignore-aspect-ratio) modify how the single resize
//! executes and are folded into a [`ResizeMode`] first; every other
//! operation applies sequentially in plan order. Quality and progressive
//! carry no pixel effect and are collected into the [`EncodeParams`].

use image::DynamicImage;
use imgstage_core::config::Background;

use crate::encode::EncodeParams;
use crate::error::TransformError;
use crate::ops;
use crate::plan::Operation;
use crate::resize::{apply_resize, ResizeMode};

/// Apply a plan, returning the transformed image and its encode parameters.
pub fn apply(
    master: &DynamicImage,
    plan: &[Operation],
    background: Background,
) -> Result<(DynamicImage, EncodeParams), TransformError> {
    let mut mode = ResizeMode::default();
    for op in plan {
        match op {
            Operation::Crop(gravity) => mode.gravity = Some(*gravity),
            Operation::Embed => mode.embed = true,
            Operation::Max => mode.max = true,
            Operation::Min => mode.min = true,
            Operation::WithoutEnlargement => mode.without_enlargement = true,
            Operation::IgnoreAspectRatio => mode.ignore_aspect_ratio = true,
            _ => {}
        }
    }

    let mut img = master.clone();
    let mut params = EncodeParams::default();

    for op in plan {
        img = match op {
            Operation::Resize { width, height } => {
                apply_resize(&img, *width, *height, &mode, background)
            }
            // Folded into the resize geometry above
            Operation::Crop(_)
            | Operation::Embed
            | Operation::Max
            | Operation::Min
            | Operation::WithoutEnlargement
            | Operation::IgnoreAspectRatio => img,
            Operation::Extract(region) => ops::extract(&img, *region)?,
            Operation::Trim { threshold } => ops::trim(&img, *threshold),
            Operation::Flatten => ops::flatten(&img, background),
            Operation::Extend(margins) => ops::extend(&img, *margins, background),
            Operation::Negate => ops::negate(&img),
            Operation::Rotate { angle } => ops::rotate(&img, *angle),
            Operation::Flip => ops::flip(&img),
            Operation::Flop => ops::flop(&img),
            Operation::Blur { sigma } => img.blur(*sigma),
            Operation::Sharpen { sigma } => img.unsharpen(*sigma, 0),
            Operation::Gamma { value } => ops::gamma(&img, *value),
            Operation::Grayscale => img.grayscale(),
            Operation::Normalize => ops::normalize(&img),
            Operation::Quality { value } => {
                params.quality = *value;
                img
            }
            Operation::Progressive => {
                params.progressive = true;
                img
            }
        };
    }

    Ok((img, params))
}
