// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stroke rasterization.
//!
//! A segment is drawn as a capsule: every pixel whose centre lies within
//! `width / 2` of the segment is covered, which gives round caps and joins
//! for free. Edge pixels get fractional coverage over a one-pixel ramp.

use super::{PixelRect, RasterSurface};
use crate::models::stroke::{Point, StrokeSegment};

/// Paint one segment onto `surface`.
///
/// Returns the rectangle of pixels that may have changed, or `None` when the
/// segment misses the surface entirely.
pub fn apply_stroke<S: RasterSurface>(surface: &mut S, segment: &StrokeSegment) -> Option<PixelRect> {
    if !segment.a.is_finite() || !segment.b.is_finite() {
        log::warn!("Ignoring stroke with non-finite endpoints: {:?}", segment);
        return None;
    }

    let radius = segment.radius();
    let reach = radius + 0.5;
    let rect = footprint(segment, reach, surface.width(), surface.height())?;

    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let alpha = (reach - segment.distance_to(center)).clamp(0.0, 1.0);
            if alpha > 0.0 {
                surface.composite(x, y, alpha, segment.mode);
            }
        }
    }

    Some(rect)
}

/// Pixel rectangle covering the capsule, clipped to the surface.
fn footprint(segment: &StrokeSegment, reach: f32, width: u32, height: u32) -> Option<PixelRect> {
    let min_x = (segment.a.x.min(segment.b.x) - reach).floor().max(0.0);
    let min_y = (segment.a.y.min(segment.b.y) - reach).floor().max(0.0);
    let max_x = (segment.a.x.max(segment.b.x) + reach).ceil().min(width as f32);
    let max_y = (segment.a.y.max(segment.b.y) + reach).ceil().min(height as f32);

    if min_x >= max_x || min_y >= max_y {
        return None;
    }

    Some(PixelRect::new(
        min_x as u32,
        min_y as u32,
        (max_x - min_x) as u32,
        (max_y - min_y) as u32,
    ))
}
