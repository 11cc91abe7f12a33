//! Tunables for the signature dialogs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Image media types accepted by the image tab.
pub const SUPPORTED_IMAGE_TYPES: &[&str] = &[
    "image/apng",
    "image/avif",
    "image/bmp",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/svg+xml",
    "image/webp",
    "image/x-icon",
];

/// Height hint handed to the host editor with every new signature.
pub const DEFAULT_SIGNATURE_HEIGHT: f64 = 40.0;

/// Number of signatures a store keeps before reporting itself full.
pub const DEFAULT_MAX_STORED_SIGNATURES: usize = 5;

/// Localization key for the default description of a drawn signature.
pub const DRAW_DESCRIPTION_KEY: &str = "inkstamp-signature-drawn-default-description";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Signature dialog configuration.
///
/// Every field has a default, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Media types the image tab accepts.
    pub supported_image_types: Vec<String>,
    /// Height hint passed to `SignatureHost::add_signature`.
    pub default_height: f64,
    /// Initial stroke thickness of the draw tab.
    pub default_thickness: f64,
    pub min_thickness: f64,
    pub max_thickness: f64,
    /// Capacity of the bundled stores.
    pub max_stored_signatures: usize,
    /// Key looked up for the default description of a drawing.
    pub draw_description_key: String,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            supported_image_types: SUPPORTED_IMAGE_TYPES.iter().map(|t| t.to_string()).collect(),
            default_height: DEFAULT_SIGNATURE_HEIGHT,
            default_thickness: 1.0,
            min_thickness: 1.0,
            max_thickness: 5.0,
            max_stored_signatures: DEFAULT_MAX_STORED_SIGNATURES,
            draw_description_key: DRAW_DESCRIPTION_KEY.to_string(),
        }
    }
}

impl SignatureConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Check whether a media type may be traced.
    pub fn is_supported_image_type(&self, media_type: &str) -> bool {
        self.supported_image_types.iter().any(|t| t == media_type)
    }

    /// Clamp a requested stroke thickness into the allowed range.
    pub fn clamp_thickness(&self, thickness: f64) -> f64 {
        thickness.clamp(self.min_thickness, self.max_thickness)
    }
}
