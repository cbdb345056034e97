// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounded undo history.
//!
//! Each entry is a rectangular patch holding the pixels a gesture is about
//! to overwrite. A full-frame snapshot is just a patch covering the whole
//! bitmap, so both kinds restore through the same path.

use super::{PixelRect, RasterSurface};
use std::collections::VecDeque;

/// Default number of undoable gestures kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Prior pixels of one rectangle of the mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    rect: PixelRect,
    pixels: Vec<u8>,
}

impl Snapshot {
    /// Capture `rect` from the surface as it is now.
    pub fn capture<S: RasterSurface>(surface: &S, rect: PixelRect) -> Self {
        Self {
            rect,
            pixels: surface.read_region(rect),
        }
    }

    /// Cut `rect` out of a full-frame row-major copy of a `stride`-wide surface.
    pub fn from_frame(frame: &[u8], stride: u32, rect: PixelRect) -> Self {
        let stride = stride as usize;
        let mut pixels = Vec::with_capacity(rect.area());
        for y in rect.y..rect.bottom() {
            let start = y as usize * stride + rect.x as usize;
            pixels.extend_from_slice(&frame[start..start + rect.width as usize]);
        }
        Self { rect, pixels }
    }

    /// Write the captured pixels back. Patches that no longer fit the
    /// surface are skipped.
    pub fn restore<S: RasterSurface>(&self, surface: &mut S) {
        if !self.rect.fits_within(surface.width(), surface.height()) {
            log::warn!(
                "Skipping undo patch {:?} outside {}x{} mask",
                self.rect,
                surface.width(),
                surface.height()
            );
            return;
        }
        if !self.rect.is_empty() {
            surface.write_region(self.rect, &self.pixels);
        }
    }

    pub fn memory_size(&self) -> usize {
        self.pixels.len()
    }
}

/// History system for undo.
#[derive(Debug)]
pub struct HistoryStack {
    /// Past states, most recent last
    entries: VecDeque<Snapshot>,
    /// Maximum history size
    limit: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl HistoryStack {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.max(1)),
            limit: limit.max(1),
        }
    }

    /// Save a state before making a change, evicting the oldest on overflow.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Bytes of pixel data held by all entries.
    pub fn memory_size(&self) -> usize {
        self.entries.iter().map(Snapshot::memory_size).sum()
    }
}

/// Full-frame snapshot of the current raster state.
pub fn snapshot_for_undo<S: RasterSurface>(surface: &S) -> Snapshot {
    Snapshot::capture(surface, surface.bounds())
}

/// Restore the most recent snapshot. Returns `false` when there was nothing
/// to undo.
pub fn undo<S: RasterSurface>(surface: &mut S, history: &mut HistoryStack) -> bool {
    match history.pop() {
        Some(snapshot) => {
            snapshot.restore(surface);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stroke::{Point, StrokeMode, StrokeSegment};
    use crate::raster::{apply_stroke, MaskBitmap};

    fn stroke(bitmap: &mut MaskBitmap, y: f32) {
        let segment = StrokeSegment::new(
            Point::new(2.0, y),
            Point::new(28.0, y),
            StrokeMode::Paint,
            3.0,
        );
        apply_stroke(bitmap, &segment);
    }

    #[test]
    fn test_undo_restores_exact_state() {
        let mut bitmap = MaskBitmap::new(32, 32).unwrap();
        let mut history = HistoryStack::default();

        history.push(snapshot_for_undo(&bitmap));
        stroke(&mut bitmap, 5.0);
        let before_last = bitmap.clone();

        history.push(snapshot_for_undo(&bitmap));
        stroke(&mut bitmap, 6.0);
        assert_ne!(bitmap, before_last);

        assert!(undo(&mut bitmap, &mut history));
        assert_eq!(bitmap, before_last);
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut bitmap = MaskBitmap::new(8, 8).unwrap();
        stroke(&mut bitmap, 4.0);
        let current = bitmap.clone();
        let mut history = HistoryStack::default();

        assert!(!undo(&mut bitmap, &mut history));
        assert_eq!(bitmap, current);
    }

    #[test]
    fn test_history_bound_keeps_most_recent() {
        let mut bitmap = MaskBitmap::new(32, 32).unwrap();
        let mut history = HistoryStack::new(3);
        let mut states = Vec::new();

        for y in 0..5 {
            states.push(bitmap.clone());
            history.push(snapshot_for_undo(&bitmap));
            stroke(&mut bitmap, 3.0 + y as f32 * 5.0);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.limit(), 3);

        while undo(&mut bitmap, &mut history) {}
        // Oldest retained state is the one before the third stroke
        assert_eq!(bitmap, states[2]);
        assert_ne!(bitmap, states[0]);
    }

    #[test]
    fn test_patch_from_frame_matches_capture() {
        let mut bitmap = MaskBitmap::new(16, 12).unwrap();
        stroke(&mut bitmap, 6.0);
        let rect = PixelRect::new(3, 4, 7, 5);

        let from_frame = Snapshot::from_frame(bitmap.as_raw(), 16, rect);
        assert_eq!(from_frame, Snapshot::capture(&bitmap, rect));
        assert_eq!(from_frame.memory_size(), 35);
    }

    #[test]
    fn test_mismatched_patch_is_skipped() {
        let big = MaskBitmap::new(20, 20).unwrap();
        let patch = snapshot_for_undo(&big);

        let mut small = MaskBitmap::new(10, 10).unwrap();
        stroke(&mut small, 5.0);
        let before = small.clone();
        patch.restore(&mut small);
        assert_eq!(small, before);
    }
}
