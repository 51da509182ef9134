//! Embedded configuration adapter.
//!
//! Implements [`ConfigPort`] over a JSON document compiled into the
//! firmware image from `config/flower.json`.  The document is parsed and
//! validated once at boot and never written back.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

/// JSON shipped with the image.
pub const EMBEDDED_JSON: &str = include_str!("../../config/flower.json");

pub struct EmbeddedConfig {
    document: &'static str,
}

impl Default for EmbeddedConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedConfig {
    pub fn new() -> Self {
        Self::from_document(EMBEDDED_JSON)
    }

    pub fn from_document(document: &'static str) -> Self {
        Self { document }
    }

    /// Load, or fall back to defaults with a warning.
    pub fn load_or_default(&self) -> SystemConfig {
        match self.load() {
            Ok(cfg) => {
                info!("Config loaded ({} bytes)", self.document.len());
                cfg
            }
            Err(e) => {
                warn!("Config load failed ({}), using defaults", e);
                SystemConfig::default()
            }
        }
    }
}

impl ConfigPort for EmbeddedConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        parse(self.document)
    }
}

/// Parse and validate a JSON config document.
pub fn parse(document: &str) -> Result<SystemConfig, ConfigError> {
    let cfg: SystemConfig = serde_json::from_str(document).map_err(|_| ConfigError::Corrupted)?;
    cfg.validate()?;
    Ok(cfg)
}
