// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing session state.
//!
//! A [`MaskSession`] owns the mask bitmap and its undo history and turns
//! pointer gestures into strokes. The app holds exactly one session and
//! drives it from input events in order.

use crate::error::{MaskError, Result};
use crate::models::stroke::{Point, StrokeMode, StrokeSegment};
use crate::raster::{
    apply_stroke, encode_png, HistoryStack, MaskBitmap, PixelRect, RasterSurface, Snapshot,
    LOCKED,
};
use image::RgbImage;

/// Part of the bitmap changed since the last [`MaskSession::take_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskChange {
    /// Everything, possibly including the size
    Full,
    Region(PixelRect),
}

/// A gesture in progress.
struct Gesture {
    mode: StrokeMode,
    width: f32,
    last: Point,
    /// Pixels touched so far
    dirty: Option<PixelRect>,
}

/// Mask bitmap, undo history and the active gesture.
pub struct MaskSession {
    bitmap: Option<MaskBitmap>,
    history: HistoryStack,
    gesture: Option<Gesture>,
    /// Copy of the bitmap taken when the active gesture started
    before_gesture: Vec<u8>,
    /// Changes not yet picked up by the display
    changes: Option<MaskChange>,
}

impl MaskSession {
    pub fn new(history_limit: usize) -> Self {
        Self {
            bitmap: None,
            history: HistoryStack::new(history_limit),
            gesture: None,
            before_gesture: Vec::new(),
            changes: None,
        }
    }

    /// Replace the bitmap with a fully locked one of the given native size.
    ///
    /// Discards history. Refused (leaving any existing bitmap in place)
    /// when either dimension is zero.
    pub fn initialize(&mut self, width: u32, height: u32) -> Result<()> {
        let bitmap = MaskBitmap::new(width, height)?;
        self.bitmap = Some(bitmap);
        self.history.clear();
        self.gesture = None;
        self.before_gesture.clear();
        self.changes = Some(MaskChange::Full);
        log::info!("Initialized {}x{} mask", width, height);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.bitmap.is_some()
    }

    pub fn bitmap(&self) -> Option<&MaskBitmap> {
        self.bitmap.as_ref()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.bitmap.as_ref().map(|b| (b.width(), b.height()))
    }

    /// Take the changes made since the last call.
    pub fn take_changes(&mut self) -> Option<MaskChange> {
        self.changes.take()
    }

    fn mark_region(&mut self, rect: PixelRect) {
        self.changes = match self.changes {
            Some(MaskChange::Full) => Some(MaskChange::Full),
            Some(MaskChange::Region(pending)) => Some(MaskChange::Region(pending.union(&rect))),
            None => Some(MaskChange::Region(rect)),
        };
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Start a gesture at `point`.
    ///
    /// The pre-gesture state is captured before anything is painted, and a
    /// dab is painted at `point` right away so a click without movement
    /// still leaves a mark.
    pub fn begin_gesture(&mut self, point: Point, mode: StrokeMode, width: f32) -> Result<()> {
        if self.gesture.is_some() {
            self.end_gesture();
        }
        let bitmap = self.bitmap.as_mut().ok_or(MaskError::NotReady)?;

        self.before_gesture.clear();
        self.before_gesture.extend_from_slice(bitmap.as_raw());

        let dirty = bitmap.paint_dab(point, width, mode);
        self.gesture = Some(Gesture {
            mode,
            width,
            last: point,
            dirty,
        });
        if let Some(rect) = dirty {
            self.mark_region(rect);
        }
        log::debug!("Gesture started at ({:.1}, {:.1}) {:?} width {}", point.x, point.y, mode, width);
        Ok(())
    }

    /// Continue the active gesture to `point`. Ignored when no gesture is
    /// active or the pointer has not moved.
    pub fn extend_gesture(&mut self, point: Point) -> Result<()> {
        let bitmap = self.bitmap.as_mut().ok_or(MaskError::NotReady)?;
        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(());
        };
        if point == gesture.last {
            return Ok(());
        }

        let segment = StrokeSegment::new(gesture.last, point, gesture.mode, gesture.width);
        let touched = apply_stroke(bitmap, &segment);
        if let Some(rect) = touched {
            gesture.dirty = Some(match gesture.dirty {
                Some(dirty) => dirty.union(&rect),
                None => rect,
            });
        }
        gesture.last = point;
        if let Some(rect) = touched {
            self.mark_region(rect);
        }
        Ok(())
    }

    /// Finish the active gesture and record it as one undo step.
    ///
    /// Returns `false` when no gesture was active.
    pub fn end_gesture(&mut self) -> bool {
        let Some(gesture) = self.gesture.take() else {
            return false;
        };
        let Some(bitmap) = self.bitmap.as_ref() else {
            return false;
        };

        // A gesture that missed the mask still gets an (empty) entry so one
        // undo always reverts one gesture.
        let rect = gesture.dirty.unwrap_or(PixelRect::new(0, 0, 0, 0));
        let patch = Snapshot::from_frame(&self.before_gesture, bitmap.width(), rect);
        log::debug!("Gesture committed, {} bytes of undo data", patch.memory_size());
        self.history.push(patch);
        log::debug!("History holds {} bytes", self.history.memory_size());
        true
    }

    /// Revert the most recent gesture or clear. An active gesture is
    /// committed first. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        if self.bitmap.is_none() {
            return Err(MaskError::NotReady);
        }
        self.end_gesture();
        let bitmap = self.bitmap.as_mut().ok_or(MaskError::NotReady)?;

        let restored = crate::raster::undo(bitmap, &mut self.history);
        if restored {
            self.changes = Some(MaskChange::Full);
            log::info!("Undo, {}/{} steps left", self.history.len(), self.history.limit());
        }
        Ok(restored)
    }

    /// Reset every cell to locked as one undoable step.
    pub fn clear(&mut self) -> Result<()> {
        if self.bitmap.is_none() {
            return Err(MaskError::NotReady);
        }
        self.end_gesture();
        let bitmap = self.bitmap.as_mut().ok_or(MaskError::NotReady)?;

        let rect = bitmap.editable_bounds().unwrap_or(PixelRect::new(0, 0, 0, 0));
        self.history.push(Snapshot::capture(&*bitmap, rect));
        bitmap.fill(LOCKED);
        self.changes = Some(MaskChange::Full);
        log::info!("Mask cleared");
        Ok(())
    }

    /// Flattened black/white image of the current mask.
    pub fn export_mask_image(&self) -> Result<RgbImage> {
        self.bitmap
            .as_ref()
            .map(MaskBitmap::to_export_image)
            .ok_or(MaskError::NotReady)
    }

    /// PNG bytes of the flattened mask.
    pub fn encode_mask_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.export_mask_image()?)
    }
}
