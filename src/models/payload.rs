// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Export payload describing an inpainting job.
//!
//! The payload travels next to the exported mask PNG and tells the
//! downstream generator which images were used, what to do, and how
//! to read the mask.

use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Identifier written into every payload.
pub const TOOL_ID: &str = "trench-inpaint-tool";

/// Payload schema version.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Mask convention: white pixels may change, black pixels must not.
pub const MASK_CONVENTION: &str = "white_editable_black_locked";

/// Descriptive metadata for a loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMeta {
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

impl ImageMeta {
    pub fn new(filename: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            filename: filename.into(),
            width,
            height,
        }
    }
}

/// Where the downstream consumer finds the mask pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskImageRef {
    /// File name of a mask PNG written next to the payload
    File(String),
    /// Base64-encoded mask PNG
    #[serde(rename = "png_base64")]
    Embedded(String),
}

impl MaskImageRef {
    /// Embed already-encoded PNG bytes.
    pub fn embedded(png: &[u8]) -> Self {
        Self::Embedded(base64::engine::general_purpose::STANDARD.encode(png))
    }

    fn note(&self) -> String {
        match self {
            MaskImageRef::File(name) => {
                format!("Use the downloaded {name}; mask pixels are not embedded by default.")
            }
            MaskImageRef::Embedded(_) => {
                "Mask PNG is embedded as base64 in png_base64.".to_string()
            }
        }
    }
}

/// Input image section of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadInputs {
    pub base_image_filename: String,
    pub reference_image_filename: String,
    pub base_image_size: Option<[u32; 2]>,
    pub reference_image_size: Option<[u32; 2]>,
}

/// Mask section of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskSection {
    pub convention: String,
    #[serde(flatten)]
    pub image: MaskImageRef,
    pub note: String,
}

/// Complete export payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub tool: String,
    pub version: String,
    pub created_at: String,
    pub inputs: PayloadInputs,
    pub execution_prompt: String,
    pub mask: MaskSection,
}

/// Assemble a payload from session state.
///
/// Missing images produce an empty filename and a null size; the fields
/// themselves are always present.
pub fn build_export_payload(
    base: Option<&ImageMeta>,
    reference: Option<&ImageMeta>,
    prompt: &str,
    mask: MaskImageRef,
    created_at: DateTime<Utc>,
) -> ExportPayload {
    let filename = |meta: Option<&ImageMeta>| meta.map(|m| m.filename.clone()).unwrap_or_default();
    let size = |meta: Option<&ImageMeta>| meta.map(|m| [m.width, m.height]);

    ExportPayload {
        tool: TOOL_ID.to_string(),
        version: SCHEMA_VERSION.to_string(),
        created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        inputs: PayloadInputs {
            base_image_filename: filename(base),
            reference_image_filename: filename(reference),
            base_image_size: size(base),
            reference_image_size: size(reference),
        },
        execution_prompt: prompt.trim().to_string(),
        mask: MaskSection {
            convention: MASK_CONVENTION.to_string(),
            note: mask.note(),
            image: mask,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_payload_without_reference_keeps_fields() {
        let base = ImageMeta::new("site.jpg", 800, 600);
        let payload = build_export_payload(
            Some(&base),
            None,
            "  fill the trench  \n",
            MaskImageRef::File("mask.png".to_string()),
            fixed_time(),
        );

        assert_eq!(payload.execution_prompt, "fill the trench");
        assert_eq!(payload.inputs.reference_image_filename, "");

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["inputs"]["base_image_filename"], "site.jpg");
        assert_eq!(value["inputs"]["base_image_size"], serde_json::json!([800, 600]));
        assert_eq!(value["inputs"]["reference_image_filename"], "");
        assert!(value["inputs"]["reference_image_size"].is_null());
        assert!(value["inputs"].as_object().unwrap().contains_key("reference_image_size"));
    }

    #[test]
    fn test_payload_shape() {
        let payload = build_export_payload(
            None,
            None,
            "",
            MaskImageRef::File("mask.png".to_string()),
            fixed_time(),
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["tool"], TOOL_ID);
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["created_at"], "2025-03-14T09:26:53.000Z");
        assert_eq!(value["execution_prompt"], "");
        assert_eq!(value["mask"]["convention"], "white_editable_black_locked");
        assert_eq!(value["mask"]["file"], "mask.png");
        assert!(value["mask"].get("png_base64").is_none());
    }

    #[test]
    fn test_embedded_mask_is_base64() {
        let mask = MaskImageRef::embedded(&[0x89, b'P', b'N', b'G']);
        let payload = build_export_payload(None, None, "x", mask, fixed_time());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["mask"]["png_base64"], "iVBORw==");
        assert!(value["mask"].get("file").is_none());
    }
}
