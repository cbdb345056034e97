// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the mask session and translates UI
//! actions into session operations and exports.

use crate::config::Config;
use crate::error::MaskError;
use crate::io::clipboard::{self, CopyOutcome};
use crate::io::media::{self, LoadedImage};
use crate::io::serialization;
use crate::models::payload::{build_export_payload, ImageMeta, MaskImageRef};
use crate::models::preset::PromptPreset;
use crate::models::stroke::{Point, StrokeMode};
use crate::session::{MaskChange, MaskSession};
use crate::ui::{canvas, properties, toolbar};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Current drawing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Brush,
    Eraser,
}

impl Tool {
    pub fn mode(self) -> StrokeMode {
        match self {
            Tool::Brush => StrokeMode::Paint,
            Tool::Eraser => StrokeMode::Erase,
        }
    }
}

/// Which input slot an image is loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageRole {
    Base,
    Reference,
}

/// Result of a background image loading operation.
struct LoadedImageData {
    role: ImageRole,
    image: LoadedImage,
}

/// Main application state.
pub struct MaskerApp {
    config: Config,

    /// Currently selected drawing tool
    current_tool: Tool,

    /// Brush diameter in mask pixels, shared by brush and eraser
    brush_width: u32,

    /// Mask bitmap and undo history
    session: MaskSession,

    base: Option<ImageMeta>,
    reference: Option<ImageMeta>,

    base_texture: Option<egui::TextureHandle>,
    reference_texture: Option<egui::TextureHandle>,
    mask_texture: Option<egui::TextureHandle>,

    prompt: String,
    preset: PromptPreset,

    /// Receivers for background image loading
    image_loaders: Vec<Receiver<Result<LoadedImageData, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Last user-facing status line
    status: String,
}

impl MaskerApp {
    /// Create a new application instance, optionally loading images right away.
    pub fn new(config: Config, base: Option<PathBuf>, reference: Option<PathBuf>) -> Self {
        let mut app = Self {
            current_tool: Tool::Brush,
            brush_width: config.brush_width,
            session: MaskSession::new(config.history_limit),
            base: None,
            reference: None,
            base_texture: None,
            reference_texture: None,
            mask_texture: None,
            prompt: String::new(),
            preset: PromptPreset::StrictCivil,
            image_loaders: Vec::new(),
            loading_message: None,
            status: MaskError::NotReady.to_string(),
            config,
        };

        if let Some(path) = base {
            app.load_image_file(path, ImageRole::Base);
        }
        if let Some(path) = reference {
            app.load_image_file(path, ImageRole::Reference);
        }
        app
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    /// Surface an engine error to the user.
    fn report(&mut self, error: MaskError) {
        match error {
            MaskError::NotReady => log::warn!("Operation refused: {}", error),
            _ => log::error!("{}", error),
        }
        self.set_status(error.to_string());
    }

    /// Load an image file into the given slot (asynchronously).
    fn load_image_file(&mut self, path: PathBuf, role: ImageRole) {
        let (sender, receiver) = channel();
        self.image_loaders.push(receiver);
        self.loading_message = Some("Loading image...".to_string());

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = media::load_image(&path)
                .map(|image| {
                    log::info!("Loaded image: {} ({}x{})", path.display(), image.width, image.height);
                    LoadedImageData { role, image }
                })
                .map_err(|e| format!("{:#}", e));

            let _ = sender.send(result);
        });
    }

    /// Collect finished background loads.
    fn poll_loaders(&mut self, ctx: &egui::Context) {
        let mut finished = Vec::new();
        self.image_loaders.retain(|receiver| match receiver.try_recv() {
            Ok(result) => {
                finished.push(result);
                false
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => true,
            Err(std::sync::mpsc::TryRecvError::Disconnected) => false,
        });

        if self.image_loaders.is_empty() {
            self.loading_message = None;
        }

        for result in finished {
            match result {
                Ok(loaded) => self.install_image(ctx, loaded),
                Err(e) => {
                    log::error!("Failed to load image: {}", e);
                    self.set_status(format!("Failed to load image: {}", e));
                }
            }
        }
    }

    /// Create a texture for a decoded image and update session state.
    fn install_image(&mut self, ctx: &egui::Context, loaded: LoadedImageData) {
        let image = loaded.image;
        let size = [image.width as usize, image.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &image.pixels);

        match loaded.role {
            ImageRole::Base => {
                // The mask always takes the native size of the base image
                if let Err(e) = self.session.initialize(image.width, image.height) {
                    self.report(e);
                    return;
                }
                self.base_texture =
                    Some(ctx.load_texture("base_image", color_image, egui::TextureOptions::LINEAR));
                self.mask_texture = None;
                self.set_status(format!("Base image {} loaded", image.filename));
                self.base = Some(image.meta());
            }
            ImageRole::Reference => {
                self.reference_texture = Some(ctx.load_texture(
                    "reference_image",
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
                self.set_status(format!("Reference image {} loaded", image.filename));
                self.reference = Some(image.meta());
            }
        }
    }

    /// Upload mask changes to the overlay texture.
    ///
    /// Gesture changes go up as a patch; anything else replaces the whole image.
    fn refresh_mask_texture(&mut self, ctx: &egui::Context) {
        let Some(change) = self.session.take_changes() else {
            return;
        };
        let Some(bitmap) = self.session.bitmap() else {
            return;
        };

        if let (Some(texture), MaskChange::Region(rect)) = (self.mask_texture.as_mut(), change) {
            if !rect.is_empty() {
                let patch = canvas::mask_overlay_region(bitmap, rect);
                texture.set_partial(
                    [rect.x as usize, rect.y as usize],
                    patch,
                    egui::TextureOptions::NEAREST,
                );
            }
            return;
        }

        let overlay = canvas::mask_overlay_image(bitmap);
        match self.mask_texture {
            Some(ref mut texture) => texture.set(overlay, egui::TextureOptions::NEAREST),
            None => {
                self.mask_texture =
                    Some(ctx.load_texture("mask_overlay", overlay, egui::TextureOptions::NEAREST));
            }
        }
    }

    fn begin_stroke(&mut self, point: Point) {
        let width = self.brush_width as f32;
        if let Err(e) = self.session.begin_gesture(point, self.current_tool.mode(), width) {
            self.report(e);
        }
    }

    fn extend_stroke(&mut self, point: Point) {
        if let Err(e) = self.session.extend_gesture(point) {
            self.report(e);
        }
    }

    fn end_stroke(&mut self) {
        if self.session.end_gesture() {
            log::info!("Stroke committed, {} undo steps", self.session.history_len());
        }
    }

    fn undo(&mut self) {
        match self.session.undo() {
            Ok(true) => self.set_status("Undo"),
            Ok(false) => log::debug!("Nothing to undo"),
            Err(e) => self.report(e),
        }
    }

    fn clear(&mut self) {
        match self.session.clear() {
            Ok(()) => self.set_status("Mask cleared"),
            Err(e) => self.report(e),
        }
    }

    /// Encode the mask and write it to `path`.
    fn export_mask(&mut self, path: &Path) {
        let png = match self.session.encode_mask_png() {
            Ok(png) => png,
            Err(e) => return self.report(e),
        };

        match serialization::write_mask_png(&png, path) {
            Ok(()) => {
                log::info!("Exported mask to {}", path.display());
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export mask: {:#}", e);
                self.set_status(format!("Failed to export mask: {}", e));
            }
        }
    }

    /// Build the payload from current session state and write it to `path`.
    fn export_payload(&mut self, path: &Path) {
        let mask = if self.config.embed_mask_in_payload {
            match self.session.encode_mask_png() {
                Ok(png) => MaskImageRef::embedded(&png),
                Err(e) => return self.report(e),
            }
        } else {
            MaskImageRef::File(self.config.mask_filename.clone())
        };

        let payload = build_export_payload(
            self.base.as_ref(),
            self.reference.as_ref(),
            &self.prompt,
            mask,
            chrono::Utc::now(),
        );

        match serialization::export_payload(&payload, path) {
            Ok(()) => {
                log::info!("Exported payload to {}", path.display());
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export payload: {:#}", e);
                self.set_status(format!("Failed to export payload: {}", e));
            }
        }
    }

    fn copy_prompt(&mut self) {
        let fallback = PathBuf::from(&self.config.prompt_filename);
        match clipboard::copy_prompt(&self.prompt, &fallback) {
            Ok(CopyOutcome::Skipped) => {}
            Ok(CopyOutcome::Clipboard) => self.set_status("Prompt copied to clipboard"),
            Ok(CopyOutcome::SavedToFile(path)) => self.set_status(format!(
                "Clipboard unavailable, prompt saved to {}",
                path.display()
            )),
            Err(e) => {
                log::error!("Failed to copy prompt: {:#}", e);
                self.set_status(format!("Failed to copy prompt: {}", e));
            }
        }
    }

    fn pick_image(&mut self, role: ImageRole) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "tiff", "tif", "webp"])
            .pick_file()
        {
            self.load_image_file(path, role);
        }
    }

    fn pick_mask_destination(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(&self.config.mask_filename)
            .save_file()
        {
            self.export_mask(&path);
        }
    }

    fn pick_payload_destination(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name(&self.config.payload_filename)
            .save_file()
        {
            self.export_payload(&path);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Only process if no text field is focused (to avoid stealing prompt typing)
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Z)) {
            self.undo();
        }
        if ctx.input(|i| !i.modifiers.command && i.key_pressed(egui::Key::B)) {
            self.current_tool = Tool::Brush;
        }
        if ctx.input(|i| !i.modifiers.command && i.key_pressed(egui::Key::E)) {
            self.current_tool = Tool::Eraser;
        }
    }
}

impl eframe::App for MaskerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loaders(ctx);

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Base Image...").clicked() {
                        self.pick_image(ImageRole::Base);
                        ui.close_menu();
                    }
                    if ui.button("Open Reference Image...").clicked() {
                        self.pick_image(ImageRole::Reference);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(self.session.is_ready(), egui::Button::new("Export Mask PNG..."))
                        .clicked()
                    {
                        self.pick_mask_destination();
                        ui.close_menu();
                    }
                    if ui.button("Export Payload...").clicked() {
                        self.pick_payload_destination();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.session.can_undo(), egui::Button::new("Undo (Ctrl+Z)"))
                        .clicked()
                    {
                        self.undo();
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.session.is_ready(), egui::Button::new("Clear Mask"))
                        .clicked()
                    {
                        self.clear();
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let range = self.config.brush_width_min..=self.config.brush_width_max;
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    &mut self.current_tool,
                    &mut self.brush_width,
                    range,
                    self.session.can_undo(),
                    self.session.is_ready(),
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::Undo => self.undo(),
            toolbar::ToolbarAction::Clear => self.clear(),
            toolbar::ToolbarAction::None => {}
        }

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(280.0)
            .show(ctx, |ui| {
                properties::show(
                    ui,
                    self.base.as_ref(),
                    self.reference.as_ref(),
                    &self.reference_texture,
                    &mut self.prompt,
                    &mut self.preset,
                    self.session.is_ready(),
                )
            })
            .inner;

        match properties_action {
            properties::PropertiesAction::LoadReference => self.pick_image(ImageRole::Reference),
            properties::PropertiesAction::ApplyPreset => {
                self.prompt = self.preset.text().to_string();
            }
            properties::PropertiesAction::CopyPrompt => self.copy_prompt(),
            properties::PropertiesAction::ExportMask => self.pick_mask_destination(),
            properties::PropertiesAction::ExportPayload => self.pick_payload_destination(),
            properties::PropertiesAction::None => {}
        }

        self.handle_shortcuts(ctx);
        self.refresh_mask_texture(ctx);

        // Main canvas (center)
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    Vec::new()
                } else {
                    let view = canvas::CanvasView {
                        base_texture: self.base_texture.as_ref(),
                        mask_texture: self.mask_texture.as_ref(),
                        mask_size: self.session.dimensions(),
                        tool: self.current_tool,
                        brush_width: self.brush_width,
                        is_drawing: self.session.is_drawing(),
                        status: &self.status,
                    };
                    canvas::show(ui, &view)
                }
            })
            .inner;

        for action in canvas_actions {
            match action {
                canvas::CanvasAction::BeginStroke(point) => self.begin_stroke(point),
                canvas::CanvasAction::ExtendStroke(point) => self.extend_stroke(point),
                canvas::CanvasAction::EndStroke => self.end_stroke(),
            }
        }

        // Keep drawing responsive while a gesture is active
        if self.session.is_drawing() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_modes() {
        assert_eq!(Tool::Brush.mode(), StrokeMode::Paint);
        assert_eq!(Tool::Eraser.mode(), StrokeMode::Erase);
    }

    #[test]
    fn test_new_app_waits_for_base_image() {
        let app = MaskerApp::new(Config::default(), None, None);
        assert!(!app.session.is_ready());
        assert_eq!(app.status, "Upload a base image first");
        assert_eq!(app.brush_width, 24);
    }

    #[test]
    fn test_export_payload_without_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        let mut app = MaskerApp::new(Config::default(), None, None);
        app.prompt = "  keep the road  ".to_string();

        app.export_payload(&path);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["execution_prompt"], "keep the road");
        assert_eq!(value["inputs"]["base_image_filename"], "");
        assert!(value["inputs"]["base_image_size"].is_null());
    }

    #[test]
    fn test_export_mask_before_load_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        let mut app = MaskerApp::new(Config::default(), None, None);

        app.export_mask(&path);
        assert!(!path.exists());
        assert_eq!(app.status, "Upload a base image first");
    }

    #[test]
    fn test_mask_texture_follows_session() {
        let ctx = egui::Context::default();
        let mut app = MaskerApp::new(Config::default(), None, None);
        app.refresh_mask_texture(&ctx);
        assert!(app.mask_texture.is_none());

        app.session.initialize(64, 32).unwrap();
        app.refresh_mask_texture(&ctx);
        assert_eq!(app.mask_texture.as_ref().unwrap().size(), [64, 32]);

        app.begin_stroke(Point::new(10.0, 10.0));
        app.extend_stroke(Point::new(50.0, 20.0));
        app.refresh_mask_texture(&ctx);
        assert_eq!(app.mask_texture.as_ref().unwrap().size(), [64, 32]);
        assert_eq!(app.session.take_changes(), None);

        // A new base image replaces the texture at the new size
        app.end_stroke();
        app.session.initialize(16, 8).unwrap();
        app.refresh_mask_texture(&ctx);
        assert_eq!(app.mask_texture.as_ref().unwrap().size(), [16, 8]);
    }

    #[test]
    fn test_embedded_payload_requires_mask() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.json");
        let config = Config {
            embed_mask_in_payload: true,
            ..Config::default()
        };
        let mut app = MaskerApp::new(config, None, None);

        app.export_payload(&path);
        assert!(!path.exists());

        app.session.initialize(8, 8).unwrap();
        app.export_payload(&path);
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["mask"]["png_base64"].as_str().is_some());
    }
}
