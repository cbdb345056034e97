// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from an optional YAML or JSON file; anything missing
//! falls back to the defaults below.

use crate::raster::history::DEFAULT_HISTORY_LIMIT;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable settings for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of undoable gestures kept
    pub history_limit: usize,
    /// Initial brush diameter in mask pixels, shared by brush and eraser
    pub brush_width: u32,
    pub brush_width_min: u32,
    pub brush_width_max: u32,
    /// Embed the mask PNG in the payload instead of referencing the file
    pub embed_mask_in_payload: bool,
    pub mask_filename: String,
    pub payload_filename: String,
    /// Fallback file for the prompt when the clipboard is unavailable
    pub prompt_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            brush_width: 24,
            brush_width_min: 1,
            brush_width_max: 200,
            embed_mask_in_payload: false,
            mask_filename: "mask.png".to_string(),
            payload_filename: "payload.json".to_string(),
            prompt_filename: "prompt.txt".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML or JSON file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        let config: Config = match extension {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("Invalid YAML config {}", path.display()))?,
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON config {}", path.display()))?,
            _ => bail!("Unsupported config extension: {:?}", extension),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.history_limit == 0 {
            bail!("history_limit must be at least 1");
        }
        if self.brush_width_min == 0 || self.brush_width_min > self.brush_width_max {
            bail!(
                "brush width range {}..={} is invalid",
                self.brush_width_min,
                self.brush_width_max
            );
        }
        if !(self.brush_width_min..=self.brush_width_max).contains(&self.brush_width) {
            bail!(
                "brush_width {} outside {}..={}",
                self.brush_width,
                self.brush_width_min,
                self.brush_width_max
            );
        }
        for name in [&self.mask_filename, &self.payload_filename, &self.prompt_filename] {
            if name.trim().is_empty() {
                bail!("output file names must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.brush_width, 24);
    }

    #[test]
    fn test_load_partial_yaml() {
        let file = write_temp(".yaml", "history_limit: 30\nembed_mask_in_payload: true\n");
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.history_limit, 30);
        assert!(config.embed_mask_in_payload);
        assert_eq!(config.brush_width, 24);
        assert_eq!(config.mask_filename, "mask.png");
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(".json", r#"{"brush_width": 40, "brush_width_max": 64}"#);
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.brush_width, 40);
        assert_eq!(config.brush_width_max, 64);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_temp(".yml", "history_limit: 0\n");
        assert!(Config::load(file.path()).is_err());

        let file = write_temp(".json", r#"{"brush_width": 500}"#);
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".toml", "history_limit = 5\n");
        assert!(Config::load(file.path()).is_err());
    }
}
