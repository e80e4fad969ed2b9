//! Upload configuration model and resolution.
//!
//! A pipeline invocation is driven by one immutable [`UploadConfig`]. Callers
//! supply a flat JSON object; [`UploadConfig::resolve`] overlays it onto the
//! built-in defaults per top-level key: caller keys win wholesale and unset
//! keys keep their default. There is no deep merge; every field is a scalar,
//! a fixed-shape record, or a flat list.
//!
//! No schema validation happens here. A value no transform step recognizes
//! (an unsupported rotation angle, an unknown crop gravity) is accepted and
//! silently skipped at the point of use.

use serde::{Deserialize, Serialize};

/// A transform toggle: `false` = skip, `true` = apply with a built-in
/// default parameter, any other value = apply with that parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Toggle<T> {
    /// Plain on/off. `Switch(false)` is the skip state.
    Switch(bool),
    /// On, with an explicit parameter.
    Value(T),
}

impl<T> Default for Toggle<T> {
    fn default() -> Self {
        Toggle::Switch(false)
    }
}

impl<T> Toggle<T> {
    /// Whether the step applies at all. Everything except `false` is on.
    pub fn is_on(&self) -> bool {
        !matches!(self, Toggle::Switch(false))
    }

    /// The explicit parameter, if one was supplied.
    pub fn value(&self) -> Option<&T> {
        match self {
            Toggle::Value(v) => Some(v),
            Toggle::Switch(_) => None,
        }
    }
}

impl<T: Copy> Toggle<T> {
    /// The parameter to use when the step is on, falling back to `default`
    /// for a bare `true`.
    pub fn value_or(&self, default: T) -> T {
        match self {
            Toggle::Value(v) => *v,
            Toggle::Switch(_) => default,
        }
    }
}

/// One output variant: `<filename>.<suffix>.<output>` at `width`x`height`.
///
/// Suffixes are expected to be unique within a size list; a duplicate is not
/// rejected but makes the later entry overwrite the earlier one's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSpec {
    pub suffix: String,
    pub width: u32,
    pub height: u32,
}

/// Background fill used by the embed, flatten and extend steps.
/// `a` is 0.0..=1.0 as in the caller-facing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Background {
    /// RGBA components with alpha scaled to 0..=255.
    pub fn rgba(&self) -> [u8; 4] {
        [
            self.r,
            self.g,
            self.b,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

/// Region for the extract step, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Margins for the extend step, filled with the configured background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtendMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Fully-populated upload configuration. Read-only after resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadConfig {
    // Identity / storage
    /// Multipart field name carrying the file.
    pub field: String,
    /// Base storage location for masters and variants.
    pub location: String,
    /// Date-token directory format, e.g. `yyyy/mmm/d`.
    pub dir_format: String,
    /// Length of the generated random filename.
    pub file_name_len: usize,
    /// Maximum accepted upload size, human-readable (`"10mb"`).
    pub max_file_size: String,
    /// Accepted file-type identifiers (canonical extensions).
    pub accept: Vec<String>,
    /// Output file-type identifier, shared by every size.
    pub output: String,
    /// Output variants, one file per entry.
    pub sizes: Vec<SizeSpec>,

    // Transform toggles, in application order
    pub background: Background,
    pub resize: bool,
    /// Crop gravity token (`"north"`, `"centre"`, ...). Unrecognized tokens
    /// are silently skipped.
    pub crop: Toggle<String>,
    pub embed: bool,
    pub max: bool,
    pub min: bool,
    pub without_enlargement: bool,
    pub ignore_aspect_ratio: bool,
    pub extract: Toggle<ExtractRegion>,
    /// Trim threshold; bare `true` uses the built-in default.
    pub trim: Toggle<u32>,
    pub flatten: bool,
    pub extend: Toggle<ExtendMargins>,
    pub negate: bool,
    /// Rotation angle; only 0/90/180/270 are applied, any other value
    /// (negative included) deserializes and skips.
    pub rotate: Toggle<i32>,
    pub flip: bool,
    pub flop: bool,
    pub blur: Toggle<f32>,
    pub sharpen: Toggle<f32>,
    pub gamma: Toggle<f32>,
    pub grayscale: bool,
    /// Alias spelling of `grayscale`; either enables the step.
    pub greyscale: bool,
    pub normalize: bool,
    /// Alias spelling of `normalize`; either enables the step.
    pub normalise: bool,
    pub quality: Toggle<u8>,
    pub progressive: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            field: "file".to_string(),
            location: "/var/www/uploads/".to_string(),
            dir_format: "yyyy/mmm/d".to_string(),
            file_name_len: 50,
            max_file_size: "10mb".to_string(),
            accept: vec!["png".to_string(), "jpeg".to_string(), "jpg".to_string()],
            output: "jpg".to_string(),
            sizes: vec![SizeSpec {
                suffix: "lg".to_string(),
                width: 500,
                height: 500,
            }],
            background: Background {
                r: 200,
                g: 200,
                b: 200,
                a: 1.0,
            },
            resize: true,
            crop: Toggle::default(),
            embed: false,
            max: false,
            min: false,
            without_enlargement: false,
            ignore_aspect_ratio: false,
            extract: Toggle::default(),
            trim: Toggle::default(),
            flatten: false,
            extend: Toggle::default(),
            negate: false,
            rotate: Toggle::default(),
            flip: false,
            flop: false,
            blur: Toggle::default(),
            sharpen: Toggle::default(),
            gamma: Toggle::default(),
            grayscale: false,
            greyscale: false,
            normalize: false,
            normalise: false,
            quality: Toggle::default(),
            progressive: false,
        }
    }
}

impl UploadConfig {
    /// Overlay caller-supplied keys onto the defaults. Pure; every key
    /// present in `overrides` replaces the default wholesale, everything
    /// else keeps its default value.
    pub fn resolve(overrides: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(overrides)
    }

    /// Whether the grayscale step applies (either spelling).
    pub fn wants_grayscale(&self) -> bool {
        self.grayscale || self.greyscale
    }

    /// Whether the normalize step applies (either spelling).
    pub fn wants_normalize(&self) -> bool {
        self.normalize || self.normalise
    }
}
