// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! This module provides the toolbar for choosing brush or eraser,
//! setting the brush size, and the undo/clear buttons.

use crate::app::Tool;
use std::ops::RangeInclusive;

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    Undo,
    Clear,
}

/// Display the toolbar with tool selection buttons.
pub fn show(
    ui: &mut egui::Ui,
    current_tool: &mut Tool,
    brush_width: &mut u32,
    brush_range: RangeInclusive<u32>,
    can_undo: bool,
    ready: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");

        ui.separator();

        if ui.selectable_label(*current_tool == Tool::Brush, "🖌 Brush (B)").clicked() {
            *current_tool = Tool::Brush;
        }

        if ui.selectable_label(*current_tool == Tool::Eraser, "⌫ Eraser (E)").clicked() {
            *current_tool = Tool::Eraser;
        }

        ui.separator();

        // One size for both tools
        ui.add(egui::Slider::new(brush_width, brush_range).text("Brush size"));

        ui.separator();

        if ui.add_enabled(can_undo, egui::Button::new("Undo (Ctrl+Z)")).clicked() {
            action = ToolbarAction::Undo;
        }
        if ui.add_enabled(ready, egui::Button::new("Clear")).clicked() {
            action = ToolbarAction::Clear;
        }

        ui.separator();

        let tool_text = match current_tool {
            Tool::Brush => "Paint white: regions the generator may change",
            Tool::Eraser => "Erase to black: regions that must stay untouched",
        };

        ui.label(egui::RichText::new(tool_text).italics().weak());
    });

    action
}
