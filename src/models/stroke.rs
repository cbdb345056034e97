// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Stroke data structures.
//!
//! This module defines the points and segments produced from pointer
//! input, expressed in bitmap pixel coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point in bitmap pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// How a stroke composites onto the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeMode {
    /// Marks covered cells editable (source-over white)
    Paint,
    /// Returns covered cells to locked (destination-out)
    Erase,
}

/// One line segment of a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSegment {
    pub a: Point,
    pub b: Point,
    pub mode: StrokeMode,
    /// Brush diameter in bitmap pixels
    pub width: f32,
}

impl StrokeSegment {
    pub fn new(a: Point, b: Point, mode: StrokeMode, width: f32) -> Self {
        Self { a, b, mode, width }
    }

    /// A zero-length segment, which rasterizes as a round dab.
    pub fn dab(center: Point, mode: StrokeMode, width: f32) -> Self {
        Self::new(center, center, mode, width)
    }

    pub fn radius(&self) -> f32 {
        self.width.max(0.0) / 2.0
    }

    /// Distance from `p` to the closest point of the segment.
    pub fn distance_to(&self, p: Point) -> f32 {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f32::EPSILON {
            return p.distance(&self.a);
        }
        let t = (((p.x - self.a.x) * dx + (p.y - self.a.y) * dy) / len_sq).clamp(0.0, 1.0);
        p.distance(&Point::new(self.a.x + t * dx, self.a.y + t * dy))
    }
}
