// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image loading.
//!
//! Decodes base and reference images to RGBA pixels at their native
//! resolution, which is also the resolution of the mask.

use crate::models::payload::ImageMeta;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// A decoded image ready for display.
pub struct LoadedImage {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    pub fn meta(&self) -> ImageMeta {
        ImageMeta::new(self.filename.clone(), self.width, self.height)
    }
}

/// Decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();

    if img.width() == 0 || img.height() == 0 {
        bail!("Image {} has no pixels", path.display());
    }

    Ok(LoadedImage {
        filename: file_name(path),
        width: img.width(),
        height: img.height(),
        pixels: img.into_raw(),
    })
}

/// Bare file name of a path, as reported in the payload.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
