// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the mask raster engine.

use thiserror::Error;

/// Errors produced by mask operations.
///
/// None of these corrupt the in-memory bitmap; every variant is
/// recoverable within the session.
#[derive(Error, Debug)]
pub enum MaskError {
    /// A raster operation was attempted before a base image finished decoding
    #[error("Upload a base image first")]
    NotReady,

    /// A bitmap was requested with a zero dimension
    #[error("Invalid mask dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The system clipboard could not be used
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    /// Encoding the exported mask image failed
    #[error("Failed to encode mask image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Result type for mask operations
pub type Result<T> = std::result::Result<T, MaskError>;
