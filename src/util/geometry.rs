// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module converts between on-screen display coordinates and mask
//! bitmap pixel coordinates. The scale is derived from the display rect
//! on every call, so layout changes never require resampling the mask.

use crate::models::stroke::Point;

/// On-screen rectangle the base image is currently drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Convert a pointer position in display coordinates to bitmap pixel coordinates.
///
/// Each axis scales independently. Returns `None` for a zero-sized display rect.
pub fn map_pointer_to_bitmap(
    pointer_x: f32,
    pointer_y: f32,
    rect: &DisplayRect,
    bitmap_width: u32,
    bitmap_height: u32,
) -> Option<Point> {
    if rect.is_degenerate() {
        return None;
    }
    Some(Point {
        x: (pointer_x - rect.left) * bitmap_width as f32 / rect.width,
        y: (pointer_y - rect.top) * bitmap_height as f32 / rect.height,
    })
}

/// Fit an image of the given size inside `available`, centred, keeping aspect.
pub fn fit_rect(image_width: u32, image_height: u32, available: &DisplayRect) -> DisplayRect {
    let img_aspect = image_width as f32 / image_height as f32;
    let available_aspect = available.width / available.height;

    let (width, height) = if img_aspect > available_aspect {
        // Image is wider - fit to width
        (available.width, available.width / img_aspect)
    } else {
        // Image is taller - fit to height
        (available.height * img_aspect, available.height)
    };

    DisplayRect::new(
        available.left + (available.width - width) / 2.0,
        available.top + (available.height - height) / 2.0,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_corners() {
        let rect = DisplayRect::new(40.0, 25.0, 400.0, 300.0);

        // Top-left corner
        let tl = map_pointer_to_bitmap(40.0, 25.0, &rect, 1600, 1200).unwrap();
        assert_eq!(tl.x, 0.0);
        assert_eq!(tl.y, 0.0);

        // Bottom-right corner
        let br = map_pointer_to_bitmap(440.0, 325.0, &rect, 1600, 1200).unwrap();
        assert_eq!(br.x, 1600.0);
        assert_eq!(br.y, 1200.0);
    }

    #[test]
    fn test_map_is_axis_independent() {
        // Stretched display: x scales by 2, y by 0.5
        let rect = DisplayRect::new(0.0, 0.0, 100.0, 400.0);
        let p = map_pointer_to_bitmap(25.0, 100.0, &rect, 200, 200).unwrap();
        assert_eq!(p.x, 50.0);
        assert_eq!(p.y, 50.0);

        let moved_x = map_pointer_to_bitmap(50.0, 100.0, &rect, 200, 200).unwrap();
        assert_eq!(moved_x.y, p.y);
    }

    #[test]
    fn test_map_follows_resize() {
        let bitmap = (800, 600);
        let small = DisplayRect::new(0.0, 0.0, 400.0, 300.0);
        let large = DisplayRect::new(0.0, 0.0, 1600.0, 1200.0);

        let a = map_pointer_to_bitmap(200.0, 150.0, &small, bitmap.0, bitmap.1).unwrap();
        let b = map_pointer_to_bitmap(800.0, 600.0, &large, bitmap.0, bitmap.1).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Point::new(400.0, 300.0));
    }

    #[test]
    fn test_degenerate_rect() {
        let rect = DisplayRect::new(10.0, 10.0, 0.0, 50.0);
        assert!(map_pointer_to_bitmap(10.0, 10.0, &rect, 100, 100).is_none());
    }

    #[test]
    fn test_fit_rect_centres_wide_image() {
        let available = DisplayRect::new(0.0, 0.0, 1000.0, 1000.0);
        let fitted = fit_rect(2000, 1000, &available);
        assert_eq!(fitted, DisplayRect::new(0.0, 250.0, 1000.0, 500.0));
    }
}
