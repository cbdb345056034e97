// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Job properties panel.
//!
//! This module provides the side panel with the input image details,
//! the reference preview, the prompt editor with presets, and the
//! export buttons.

use crate::models::payload::ImageMeta;
use crate::models::preset::PromptPreset;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    LoadReference,
    ApplyPreset,
    CopyPrompt,
    ExportMask,
    ExportPayload,
}

/// Display the properties panel.
pub fn show(
    ui: &mut egui::Ui,
    base: Option<&ImageMeta>,
    reference: Option<&ImageMeta>,
    reference_texture: &Option<egui::TextureHandle>,
    prompt: &mut String,
    preset: &mut PromptPreset,
    ready: bool,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Inputs");
    ui.separator();

    ui.label(egui::RichText::new("Base image").strong());
    match base {
        Some(meta) => ui.label(format!("{} ({}x{})", meta.filename, meta.width, meta.height)),
        None => ui.label(egui::RichText::new("Not loaded").weak()),
    };

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Reference image").strong());
        if ui.small_button("Open...").clicked() {
            action = PropertiesAction::LoadReference;
        }
    });
    match reference {
        Some(meta) => ui.label(format!("{} ({}x{})", meta.filename, meta.width, meta.height)),
        None => ui.label(egui::RichText::new("Optional, not loaded").weak()),
    };
    if let Some(texture) = reference_texture {
        ui.add(egui::Image::new(texture).max_width(ui.available_width()).max_height(180.0));
    }

    ui.add_space(12.0);
    ui.heading("Prompt");
    ui.separator();

    ui.horizontal(|ui| {
        egui::ComboBox::from_id_source("prompt_preset")
            .selected_text(preset.label())
            .show_ui(ui, |ui| {
                for option in PromptPreset::ALL {
                    ui.selectable_value(preset, option, option.label());
                }
            });
        if ui.button("Apply").clicked() {
            action = PropertiesAction::ApplyPreset;
        }
    });

    egui::ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
        ui.add(
            egui::TextEdit::multiline(prompt)
                .desired_rows(12)
                .desired_width(f32::INFINITY)
                .hint_text("Execution prompt for the inpainting job"),
        );
    });

    if ui.button("Copy prompt").clicked() {
        action = PropertiesAction::CopyPrompt;
    }

    ui.add_space(12.0);
    ui.heading("Export");
    ui.separator();

    ui.add_enabled_ui(ready, |ui| {
        if ui.button("Download mask.png...").clicked() {
            action = PropertiesAction::ExportMask;
        }
    });
    if ui.button("Export payload...").clicked() {
        action = PropertiesAction::ExportPayload;
    }

    action
}
