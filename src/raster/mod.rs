// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mask raster engine.
//!
//! The engine works against the [`RasterSurface`] trait so stroke
//! rasterization and undo bookkeeping never touch the UI toolkit.
//! [`MaskBitmap`] is the single implementation used by the app.

pub mod bitmap;
pub mod history;
pub mod stroke;

pub use bitmap::{encode_png, MaskBitmap};
pub use history::{snapshot_for_undo, undo, HistoryStack, Snapshot};
pub use stroke::apply_stroke;

use crate::models::stroke::{Point, StrokeMode, StrokeSegment};

/// Coverage value of an editable cell.
pub const EDITABLE: u8 = 255;

/// Coverage value of a locked cell.
pub const LOCKED: u8 = 0;

/// Axis-aligned pixel rectangle, `x..x+width` by `y..y+height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &PixelRect) -> PixelRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        PixelRect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Whether the rectangle lies inside a `width` x `height` surface.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// Minimal pixel surface the engine paints on.
pub trait RasterSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Composite coverage `alpha` (0..=1) into one cell.
    fn composite(&mut self, x: u32, y: u32, alpha: f32, mode: StrokeMode);

    /// Copy a region out, row-major.
    fn read_region(&self, rect: PixelRect) -> Vec<u8>;

    /// Overwrite a region with row-major data from [`read_region`](Self::read_region).
    fn write_region(&mut self, rect: PixelRect, data: &[u8]);

    fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width(), self.height())
    }

    /// Paint a single round dab; returns the touched rectangle.
    fn paint_dab(&mut self, center: Point, diameter: f32, mode: StrokeMode) -> Option<PixelRect>
    where
        Self: Sized,
    {
        apply_stroke(self, &StrokeSegment::dab(center, mode, diameter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_union() {
        let a = PixelRect::new(2, 3, 4, 4);
        let b = PixelRect::new(5, 1, 10, 2);
        assert_eq!(a.union(&b), PixelRect::new(2, 1, 13, 6));
        assert_eq!(a.union(&PixelRect::new(0, 0, 0, 0)), a);
        assert_eq!(PixelRect::new(9, 9, 0, 3).union(&b), b);
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(PixelRect::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(!PixelRect::new(1, 0, 10, 10).fits_within(10, 10));
    }
}
