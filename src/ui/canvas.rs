// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the base image and mask overlay.
//!
//! This module shows the base image with the mask on top and turns
//! pointer input into stroke actions in mask pixel coordinates.

use crate::app::Tool;
use crate::models::stroke::Point;
use crate::raster::{MaskBitmap, PixelRect, RasterSurface};
use crate::util::geometry::{fit_rect, map_pointer_to_bitmap, DisplayRect};

/// Opacity of a fully editable cell in the on-screen overlay.
const OVERLAY_ALPHA: u16 = 170;

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    BeginStroke(Point),
    ExtendStroke(Point),
    EndStroke,
}

/// Primary-button pointer input, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Press(egui::Pos2),
    Move(egui::Pos2),
    Release(egui::Pos2),
    /// Pointer left the window
    Gone,
}

/// Everything the canvas draws in one frame.
pub struct CanvasView<'a> {
    pub base_texture: Option<&'a egui::TextureHandle>,
    pub mask_texture: Option<&'a egui::TextureHandle>,
    /// Native mask size, `None` until a base image is loaded
    pub mask_size: Option<(u32, u32)>,
    pub tool: Tool,
    pub brush_width: u32,
    pub is_drawing: bool,
    pub status: &'a str,
}

fn overlay_color(coverage: u8) -> egui::Color32 {
    let alpha = (coverage as u16 * OVERLAY_ALPHA / 255) as u8;
    egui::Color32::from_rgba_unmultiplied(255, 255, 255, alpha)
}

/// Overlay pixels for one region of the mask: white, with alpha following coverage.
pub fn mask_overlay_region(bitmap: &MaskBitmap, rect: PixelRect) -> egui::ColorImage {
    let pixels = bitmap
        .read_region(rect)
        .into_iter()
        .map(overlay_color)
        .collect();
    egui::ColorImage {
        size: [rect.width as usize, rect.height as usize],
        pixels,
    }
}

/// Overlay pixels for the whole mask.
pub fn mask_overlay_image(bitmap: &MaskBitmap) -> egui::ColorImage {
    mask_overlay_region(bitmap, bitmap.bounds())
}

/// Primary-button events of this frame, in arrival order.
fn pointer_inputs(input: &egui::InputState) -> Vec<PointerInput> {
    input
        .events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerMoved(pos) => Some(PointerInput::Move(*pos)),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => Some(if *pressed {
                PointerInput::Press(*pos)
            } else {
                PointerInput::Release(*pos)
            }),
            egui::Event::PointerGone => Some(PointerInput::Gone),
            _ => None,
        })
        .collect()
}

/// Turn one frame of pointer input into gesture actions.
///
/// Every move is forwarded, and the release or exit position is painted
/// before the gesture ends. A press only starts a gesture inside
/// `image_rect` and when `accept_press` is set.
pub fn stroke_actions(
    inputs: &[PointerInput],
    is_drawing: bool,
    accept_press: bool,
    primary_down: bool,
    image_rect: egui::Rect,
    to_bitmap: impl Fn(egui::Pos2) -> Option<Point>,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    let mut drawing = is_drawing;
    let mut last = None;

    for &input in inputs {
        match input {
            PointerInput::Press(pos) if !drawing && accept_press && image_rect.contains(pos) => {
                if let Some(point) = to_bitmap(pos) {
                    actions.push(CanvasAction::BeginStroke(point));
                    last = Some(point);
                    drawing = true;
                }
            }
            PointerInput::Move(pos) | PointerInput::Release(pos) if drawing => {
                if let Some(point) = to_bitmap(pos) {
                    if last != Some(point) {
                        actions.push(CanvasAction::ExtendStroke(point));
                        last = Some(point);
                    }
                }
                // Leaving the surface ends the gesture
                if matches!(input, PointerInput::Release(_)) || !image_rect.contains(pos) {
                    actions.push(CanvasAction::EndStroke);
                    drawing = false;
                }
            }
            PointerInput::Gone if drawing => {
                actions.push(CanvasAction::EndStroke);
                drawing = false;
            }
            _ => {}
        }
    }

    // The button can be released outside the window without an event
    if drawing && !primary_down {
        actions.push(CanvasAction::EndStroke);
    }
    actions
}

/// Display the main canvas area and handle pointer interactions.
pub fn show(ui: &mut egui::Ui, view: &CanvasView) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size() - egui::vec2(0.0, 24.0);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some((mask_w, mask_h))) = (view.base_texture, view.mask_size) else {
            show_welcome(ui);
            return;
        };

        let available = ui.max_rect();
        let display = fit_rect(
            mask_w,
            mask_h,
            &DisplayRect::new(available.min.x, available.min.y, available.width(), available.height()),
        );
        let image_rect = egui::Rect::from_min_size(
            egui::pos2(display.left, display.top),
            egui::vec2(display.width, display.height),
        );
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

        ui.painter().image(texture.id(), image_rect, uv, egui::Color32::WHITE);
        if let Some(mask) = view.mask_texture {
            ui.painter().image(mask.id(), image_rect, uv, egui::Color32::WHITE);
        }

        let response = ui.allocate_rect(image_rect, egui::Sense::drag());
        let (inputs, primary_down) = ui.input(|i| (pointer_inputs(i), i.pointer.primary_down()));

        // The display rect is recomputed every frame, so resizes are picked up here.
        actions = stroke_actions(
            &inputs,
            view.is_drawing,
            response.hovered(),
            primary_down,
            image_rect,
            |p| map_pointer_to_bitmap(p.x, p.y, &display, mask_w, mask_h),
        );

        // Brush outline under the pointer
        if let Some(hover) = response.hover_pos() {
            let radius = view.brush_width as f32 * display.width / mask_w as f32 / 2.0;
            let color = match view.tool {
                Tool::Brush => egui::Color32::WHITE,
                Tool::Eraser => egui::Color32::LIGHT_RED,
            };
            ui.painter()
                .circle_stroke(hover, radius.max(1.0), egui::Stroke::new(1.0, color));
        }
    });

    // Display current tool info at the bottom
    ui.separator();
    ui.horizontal(|ui| {
        ui.label(format!("Current tool: {:?}", view.tool));
        ui.separator();
        ui.label(format!("Brush: {} px", view.brush_width));
        ui.separator();
        ui.label(view.status);
    });

    actions
}

/// Placeholder shown until a base image is loaded.
fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("MaskPaint")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("White = editable, black = locked")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Upload a base image first")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open Base Image...")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}
