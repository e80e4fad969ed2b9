//! Transform plan builder.
//!
//! Each output size gets its own operation plan, built by walking a single
//! declarative table of steps in a fixed order and collecting the operation
//! of every step the configuration enables. The plan is a plain `Vec` of
//! [`Operation`] values, so the order contract is testable without touching
//! the image library.
//!
//! A toggle whose value no step recognizes (an unsupported rotation angle,
//! an unknown gravity token) contributes nothing to the plan.

use imgstage_core::config::{ExtendMargins, ExtractRegion, SizeSpec, UploadConfig};

/// Trim threshold used for a bare `trim: true`.
pub const DEFAULT_TRIM_THRESHOLD: u32 = 10;
/// Blur sigma used for a bare `blur: true`.
pub const DEFAULT_BLUR_SIGMA: f32 = 2.0;
/// Sharpen sigma used for a bare `sharpen: true`.
pub const DEFAULT_SHARPEN_SIGMA: f32 = 1.0;
/// Gamma used for a bare `gamma: true`.
pub const DEFAULT_GAMMA: f32 = 2.2;
/// Output quality used when no explicit quality is configured.
pub const DEFAULT_QUALITY: u8 = 80;

/// Named anchor point selecting the focal region of a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
    Center,
}

impl Gravity {
    /// Parse a gravity token. Both `center` and `centre` are recognized;
    /// anything else is not a gravity and the crop step is skipped.
    pub fn parse(token: &str) -> Option<Gravity> {
        match token.to_ascii_lowercase().as_str() {
            "north" => Some(Gravity::North),
            "northeast" => Some(Gravity::Northeast),
            "east" => Some(Gravity::East),
            "southeast" => Some(Gravity::Southeast),
            "south" => Some(Gravity::South),
            "southwest" => Some(Gravity::Southwest),
            "west" => Some(Gravity::West),
            "northwest" => Some(Gravity::Northwest),
            "center" | "centre" => Some(Gravity::Center),
            _ => None,
        }
    }
}

/// One operation in a variant's plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Resize { width: u32, height: u32 },
    Crop(Gravity),
    Embed,
    Max,
    Min,
    WithoutEnlargement,
    IgnoreAspectRatio,
    Extract(ExtractRegion),
    Trim { threshold: u32 },
    Flatten,
    Extend(ExtendMargins),
    Negate,
    Rotate { angle: u16 },
    Flip,
    Flop,
    Blur { sigma: f32 },
    Sharpen { sigma: f32 },
    Gamma { value: f32 },
    Grayscale,
    Normalize,
    Quality { value: u8 },
    Progressive,
}

/// One entry in the ordered step table: evaluates the configuration and
/// yields the step's operation when enabled.
pub struct Step {
    pub name: &'static str,
    pub build: fn(&UploadConfig, &SizeSpec) -> Option<Operation>,
}

/// The fixed application order. Every toggle is evaluated against the same
/// immutable configuration for every size; only width/height/suffix vary
/// per size. The background color is not an operation of its own: it
/// parameterizes the embed, flatten and extend fills.
pub const STEPS: &[Step] = &[
    Step {
        name: "resize",
        build: |c, s| {
            c.resize.then_some(Operation::Resize {
                width: s.width,
                height: s.height,
            })
        },
    },
    Step {
        name: "crop",
        build: |c, _| {
            c.crop
                .value()
                .and_then(|token| Gravity::parse(token))
                .map(Operation::Crop)
        },
    },
    Step {
        name: "embed",
        build: |c, _| c.embed.then_some(Operation::Embed),
    },
    Step {
        name: "max",
        build: |c, _| c.max.then_some(Operation::Max),
    },
    Step {
        name: "min",
        build: |c, _| c.min.then_some(Operation::Min),
    },
    Step {
        name: "withoutEnlargement",
        build: |c, _| c.without_enlargement.then_some(Operation::WithoutEnlargement),
    },
    Step {
        name: "ignoreAspectRatio",
        build: |c, _| c.ignore_aspect_ratio.then_some(Operation::IgnoreAspectRatio),
    },
    Step {
        name: "extract",
        build: |c, _| c.extract.value().copied().map(Operation::Extract),
    },
    Step {
        name: "trim",
        build: |c, _| {
            c.trim.is_on().then(|| Operation::Trim {
                threshold: c.trim.value_or(DEFAULT_TRIM_THRESHOLD),
            })
        },
    },
    Step {
        name: "flatten",
        build: |c, _| c.flatten.then_some(Operation::Flatten),
    },
    Step {
        name: "extend",
        build: |c, _| c.extend.value().copied().map(Operation::Extend),
    },
    Step {
        name: "negate",
        build: |c, _| c.negate.then_some(Operation::Negate),
    },
    Step {
        name: "rotate",
        build: |c, _| match c.rotate.value() {
            Some(&angle) if matches!(angle, 0 | 90 | 180 | 270) => Some(Operation::Rotate {
                angle: angle as u16,
            }),
            _ => None,
        },
    },
    Step {
        name: "flip",
        build: |c, _| c.flip.then_some(Operation::Flip),
    },
    Step {
        name: "flop",
        build: |c, _| c.flop.then_some(Operation::Flop),
    },
    Step {
        name: "blur",
        build: |c, _| {
            c.blur.is_on().then(|| Operation::Blur {
                sigma: c.blur.value_or(DEFAULT_BLUR_SIGMA),
            })
        },
    },
    Step {
        name: "sharpen",
        build: |c, _| {
            c.sharpen.is_on().then(|| Operation::Sharpen {
                sigma: c.sharpen.value_or(DEFAULT_SHARPEN_SIGMA),
            })
        },
    },
    Step {
        name: "gamma",
        build: |c, _| {
            c.gamma.is_on().then(|| Operation::Gamma {
                value: c.gamma.value_or(DEFAULT_GAMMA),
            })
        },
    },
    Step {
        name: "grayscale",
        build: |c, _| c.wants_grayscale().then_some(Operation::Grayscale),
    },
    Step {
        name: "normalize",
        build: |c, _| c.wants_normalize().then_some(Operation::Normalize),
    },
    Step {
        name: "quality",
        build: |c, _| {
            c.quality.is_on().then(|| Operation::Quality {
                value: c.quality.value_or(DEFAULT_QUALITY),
            })
        },
    },
    Step {
        name: "progressive",
        build: |c, _| c.progressive.then_some(Operation::Progressive),
    },
];

/// Build the operation plan for one output size.
pub fn build(config: &UploadConfig, size: &SizeSpec) -> Vec<Operation> {
    STEPS
        .iter()
        .filter_map(|step| (step.build)(config, size))
        .collect()
}
