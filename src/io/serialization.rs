// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Export of the mask image and the job payload.
//!
//! Payloads are written as JSON or YAML; the mask is written as PNG.
//! Everything is encoded in memory first so a failure never leaves a
//! partial file behind.

use crate::models::payload::ExportPayload;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Export the payload to JSON format.
pub fn export_json(payload: &ExportPayload, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Export the payload to YAML format.
pub fn export_yaml(payload: &ExportPayload, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(payload)?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Export the payload in the format implied by the file extension.
pub fn export_payload(payload: &ExportPayload, path: &Path) -> Result<()> {
    let extension = path.extension().and_then(|s| s.to_str());
    match extension {
        Some("yaml") | Some("yml") => export_yaml(payload, path),
        Some("json") => export_json(payload, path),
        _ => bail!("Unsupported file extension: {:?}", extension),
    }
}

/// Write already-encoded PNG bytes to disk.
pub fn write_mask_png(png: &[u8], path: &Path) -> Result<()> {
    if png.is_empty() {
        bail!("Refusing to write an empty mask image");
    }
    std::fs::write(path, png)
        .with_context(|| format!("Failed to write mask {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payload::{build_export_payload, ImageMeta, MaskImageRef};
    use crate::raster::{encode_png, MaskBitmap};

    fn sample_payload() -> ExportPayload {
        build_export_payload(
            Some(&ImageMeta::new("base.png", 64, 48)),
            Some(&ImageMeta::new("ref.jpg", 300, 200)),
            " widen the trench ",
            MaskImageRef::File("mask.png".to_string()),
            chrono::Utc::now(),
        )
    }

    #[test]
    fn test_export_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        export_payload(&sample_payload(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["execution_prompt"], "widen the trench");
        assert_eq!(value["inputs"]["reference_image_filename"], "ref.jpg");
        assert_eq!(value["mask"]["file"], "mask.png");
    }

    #[test]
    fn test_export_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.yaml");
        export_payload(&sample_payload(), &path).unwrap();

        let value: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["mask"]["convention"].as_str(), Some("white_editable_black_locked"));
        assert_eq!(value["inputs"]["base_image_filename"].as_str(), Some("base.png"));
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.txt");
        assert!(export_payload(&sample_payload(), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_mask_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let bitmap = MaskBitmap::new(64, 48).unwrap();
        write_mask_png(&encode_png(&bitmap.to_export_image()).unwrap(), &path).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));

        assert!(write_mask_png(&[], &dir.path().join("empty.png")).is_err());
    }
}
