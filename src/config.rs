// In: src/config.rs

//! The single source of truth for all fdf configuration.
//!
//! `FdfConfig` is created once at the application boundary (e.g., from a JSON file
//! or with `Default`) and then shared read-only through an `Arc<FdfConfig>` held by
//! the `FdfContext`. Nothing in the library reads global state.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FdfError;

//==================================================================================
// I. The Unified FdfConfig
//==================================================================================

/// The unified configuration for parsing, resolving and extracting array files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FdfConfig {
    /// The character that replaces every disallowed character in a file name.
    #[serde(default = "default_replacement_char")]
    pub replacement_char: char,

    /// Punctuation allowed in file names in addition to ASCII alphanumerics.
    /// Must contain `.` (the separator) and the replacement character.
    #[serde(default = "default_allowed_punctuation")]
    pub allowed_punctuation: String,

    /// If true, a file name that needs sanitizing is rejected instead of
    /// being renamed with a warning.
    #[serde(default)]
    pub strict_names: bool,

    /// If true, the `BufferExtractor` marks buffer files with the `mmap`
    /// compression tag so they are memory-mapped when resolved.
    #[serde(default = "default_true")]
    pub mmap_buffers: bool,

    /// Zstd level used when writing `zst` files.
    #[serde(default = "default_zstd_level")]
    pub zstd_level: i32,
}

impl Default for FdfConfig {
    fn default() -> Self {
        Self {
            replacement_char: default_replacement_char(),
            allowed_punctuation: default_allowed_punctuation(),
            strict_names: false,
            mmap_buffers: true,
            zstd_level: default_zstd_level(),
        }
    }
}

impl FdfConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, FdfError> {
        let config: FdfConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FdfError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that the settings can produce grammar-safe names.
    pub fn validate(&self) -> Result<(), FdfError> {
        if !self.allowed_punctuation.contains('.') {
            return Err(FdfError::InvalidConfig(
                "allowed_punctuation must contain the '.' separator".into(),
            ));
        }
        if self.replacement_char == '.' {
            return Err(FdfError::InvalidConfig(
                "replacement_char cannot be the '.' separator".into(),
            ));
        }
        if !self.replacement_char.is_ascii_alphanumeric()
            && !self.allowed_punctuation.contains(self.replacement_char)
        {
            return Err(FdfError::InvalidConfig(format!(
                "replacement_char '{}' is not itself an allowed character",
                self.replacement_char
            )));
        }
        Ok(())
    }
}

fn default_replacement_char() -> char {
    '-'
}

fn default_allowed_punctuation() -> String {
    "-_.".to_string()
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_zstd_level() -> i32 {
    3
}
