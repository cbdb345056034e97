// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Single-channel coverage bitmap.

use super::{PixelRect, RasterSurface, LOCKED};
use crate::error::{MaskError, Result};
use crate::models::stroke::StrokeMode;
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use std::io::Cursor;

/// Editable coverage per pixel: 255 = editable (white), 0 = locked (black).
#[derive(Debug, Clone, PartialEq)]
pub struct MaskBitmap {
    pixels: GrayImage,
}

impl MaskBitmap {
    /// Create a fully locked bitmap at the base image's native size.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MaskError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels: GrayImage::from_pixel(width, height, Luma([LOCKED])),
        })
    }

    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y).0[0]
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: u8) {
        self.pixels.pixels_mut().for_each(|p| p.0[0] = value);
    }

    /// Bounding box of all cells with non-zero coverage.
    pub fn editable_bounds(&self) -> Option<PixelRect> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in self.pixels.enumerate_pixels() {
            if p.0[0] == LOCKED {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds.map(|(x0, y0, x1, y1)| PixelRect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }

    /// Flatten onto a solid black background: opaque, white where editable.
    pub fn to_export_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| {
            // White at coverage c over black is gray level c.
            let c = self.coverage(x, y);
            Rgb([c, c, c])
        })
    }
}

impl RasterSurface for MaskBitmap {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn composite(&mut self, x: u32, y: u32, alpha: f32, mode: StrokeMode) {
        let alpha = alpha.clamp(0.0, 1.0);
        let cell = &mut self.pixels.get_pixel_mut(x, y).0[0];
        let current = *cell as f32 / 255.0;
        let next = match mode {
            StrokeMode::Paint => current + alpha * (1.0 - current),
            StrokeMode::Erase => current * (1.0 - alpha),
        };
        *cell = (next * 255.0).round() as u8;
    }

    fn read_region(&self, rect: PixelRect) -> Vec<u8> {
        let stride = self.width() as usize;
        let raw = self.as_raw();
        let mut out = Vec::with_capacity(rect.area());
        for y in rect.y..rect.bottom() {
            let start = y as usize * stride + rect.x as usize;
            out.extend_from_slice(&raw[start..start + rect.width as usize]);
        }
        out
    }

    fn write_region(&mut self, rect: PixelRect, data: &[u8]) {
        let stride = self.width() as usize;
        let row_len = rect.width as usize;
        let raw: &mut [u8] = &mut self.pixels;
        for (row, src) in data.chunks_exact(row_len.max(1)).take(rect.height as usize).enumerate() {
            let start = (rect.y as usize + row) * stride + rect.x as usize;
            raw[start..start + row_len].copy_from_slice(src);
        }
    }
}

/// Encode a flattened mask image as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::EDITABLE;

    #[test]
    fn test_new_is_fully_locked() {
        let bitmap = MaskBitmap::new(800, 600).unwrap();
        assert_eq!(bitmap.width(), 800);
        assert_eq!(bitmap.height(), 600);
        assert!(bitmap.as_raw().iter().all(|&c| c == LOCKED));
        assert_eq!(bitmap.editable_bounds(), None);
    }

    #[test]
    fn test_zero_dimensions_refused() {
        assert!(matches!(
            MaskBitmap::new(0, 10),
            Err(MaskError::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(MaskBitmap::new(10, 0).is_err());
    }

    #[test]
    fn test_composite_modes() {
        let mut bitmap = MaskBitmap::new(2, 1).unwrap();
        bitmap.composite(0, 0, 1.0, StrokeMode::Paint);
        assert_eq!(bitmap.coverage(0, 0), EDITABLE);

        bitmap.composite(1, 0, 0.5, StrokeMode::Paint);
        assert_eq!(bitmap.coverage(1, 0), 128);

        bitmap.composite(0, 0, 0.5, StrokeMode::Erase);
        assert_eq!(bitmap.coverage(0, 0), 128);
        bitmap.composite(0, 0, 1.0, StrokeMode::Erase);
        assert_eq!(bitmap.coverage(0, 0), LOCKED);
    }

    #[test]
    fn test_region_round_trip() {
        let mut bitmap = MaskBitmap::new(6, 5).unwrap();
        let rect = PixelRect::new(1, 2, 3, 2);
        bitmap.write_region(rect, &[1, 2, 3, 4, 5, 6]);

        assert_eq!(bitmap.read_region(rect), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(bitmap.coverage(1, 2), 1);
        assert_eq!(bitmap.coverage(3, 3), 6);
        assert_eq!(bitmap.coverage(0, 2), 0);
        assert_eq!(bitmap.editable_bounds(), Some(rect));
    }

    #[test]
    fn test_export_image_is_opaque_gray() {
        let mut bitmap = MaskBitmap::new(3, 1).unwrap();
        bitmap.write_region(PixelRect::new(0, 0, 3, 1), &[0, 77, 255]);

        let img = bitmap.to_export_image();
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([77, 77, 77]));
        assert_eq!(img.get_pixel(2, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_encode_png_decodes_to_same_size() {
        let mut bitmap = MaskBitmap::new(16, 9).unwrap();
        bitmap.fill(EDITABLE);
        let png = encode_png(&bitmap.to_export_image()).unwrap();

        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 9));
        assert!(!decoded.color().has_alpha());
        assert!(decoded.to_rgb8().pixels().all(|p| p.0 == [255, 255, 255]));
    }
}
