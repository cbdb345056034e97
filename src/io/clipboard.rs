// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Prompt copy to the system clipboard, with a file fallback.

use crate::error::MaskError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Which path a prompt copy took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Prompt was empty; nothing happened
    Skipped,
    Clipboard,
    /// Clipboard failed; the prompt was written to this file instead
    SavedToFile(PathBuf),
}

/// Copy the trimmed prompt to the system clipboard, falling back to a file.
pub fn copy_prompt(text: &str, fallback: &Path) -> Result<CopyOutcome> {
    copy_prompt_with(text, fallback, set_system_clipboard)
}

fn set_system_clipboard(text: &str) -> std::result::Result<(), MaskError> {
    let mut clip =
        arboard::Clipboard::new().map_err(|e| MaskError::ClipboardUnavailable(e.to_string()))?;
    clip.set_text(text.to_string())
        .map_err(|e| MaskError::ClipboardUnavailable(e.to_string()))
}

fn copy_prompt_with<F>(text: &str, fallback: &Path, set_clipboard: F) -> Result<CopyOutcome>
where
    F: FnOnce(&str) -> std::result::Result<(), MaskError>,
{
    let text = text.trim();
    if text.is_empty() {
        return Ok(CopyOutcome::Skipped);
    }

    match set_clipboard(text) {
        Ok(()) => {
            log::info!("Copied prompt to clipboard");
            Ok(CopyOutcome::Clipboard)
        }
        Err(e) => {
            log::warn!("{}; saving prompt to {}", e, fallback.display());
            std::fs::write(fallback, text)
                .with_context(|| format!("Failed to write {}", fallback.display()))?;
            Ok(CopyOutcome::SavedToFile(fallback.to_path_buf()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        let outcome = copy_prompt_with("  \n", &path, |_| panic!("clipboard touched")).unwrap();
        assert_eq!(outcome, CopyOutcome::Skipped);
        assert!(!path.exists());
    }

    #[test]
    fn test_clipboard_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        let mut copied = String::new();
        let outcome = copy_prompt_with(" hello ", &path, |t| {
            copied = t.to_string();
            Ok(())
        })
        .unwrap();

        assert_eq!(outcome, CopyOutcome::Clipboard);
        assert_eq!(copied, "hello");
        assert!(!path.exists());
    }

    #[test]
    fn test_fallback_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        let outcome = copy_prompt_with("keep edits inside the mask\n", &path, |_| {
            Err(MaskError::ClipboardUnavailable("no display".to_string()))
        })
        .unwrap();

        assert_eq!(outcome, CopyOutcome::SavedToFile(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep edits inside the mask");
    }
}
