//! Variant derivation and pipeline orchestration for imgstage.
//!
//! The transformer turns the ~25 configuration toggles into an ordered
//! operation plan per output size (see [`plan`]), applies it to the shared
//! master image ([`executor`]) and encodes the result ([`encode`]). Sizes
//! fan out independently ([`variants`]); the orchestrator ([`pipeline`])
//! sequences upload, transform and cleanup with failure short-circuit.

pub mod encode;
pub mod error;
pub mod executor;
pub mod ops;
pub mod pipeline;
pub mod plan;
pub mod resize;
pub mod variants;

// Re-export commonly used types
pub use encode::{EncodeParams, OutputFormat};
pub use error::TransformError;
pub use pipeline::{PipelineStage, StageError};
pub use plan::{Gravity, Operation};
