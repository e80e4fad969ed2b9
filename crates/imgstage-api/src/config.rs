//! Server configuration from the environment.
//!
//! Upload options live in an optional JSON file (flat keys, see
//! `imgstage_core::config`); anything the file leaves unset keeps its
//! built-in default. The resolved configuration is immutable for the
//! lifetime of the process.

use std::path::PathBuf;

use anyhow::Context;
use imgstage_core::UploadConfig;

const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub options_path: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("IMGSTAGE_PORT") {
            Ok(v) => v
                .parse()
                .with_context(|| format!("Invalid IMGSTAGE_PORT: {v:?}"))?,
            Err(_) => DEFAULT_PORT,
        };
        let options_path = std::env::var("IMGSTAGE_OPTIONS").ok().map(PathBuf::from);

        Ok(ServerConfig { port, options_path })
    }

    /// Load and resolve the upload options file, or fall back to defaults.
    pub async fn load_upload_config(&self) -> anyhow::Result<UploadConfig> {
        let Some(path) = &self.options_path else {
            return Ok(UploadConfig::default());
        };

        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read upload options {}", path.display()))?;
        let overrides: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("Upload options {} are not valid JSON", path.display()))?;

        UploadConfig::resolve(overrides)
            .with_context(|| format!("Invalid upload options in {}", path.display()))
    }
}
