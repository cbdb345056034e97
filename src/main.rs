// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! MaskPaint - inpainting mask painter
//!
//! A desktop application for painting editable/locked masks over a base
//! image and exporting them with a job payload for an inpainting model.

use anyhow::Result;
use clap::Parser;
use maskpaint::app::MaskerApp;
use maskpaint::config::Config;
use std::path::PathBuf;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "maskpaint", version, about = "Paint inpainting masks over a base image")]
struct Args {
    /// YAML or JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base image to open on startup
    #[arg(long)]
    base: Option<PathBuf>,

    /// Reference image to open on startup
    #[arg(long)]
    reference: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let config = match args.config {
        Some(ref path) => {
            let config = Config::load(path)?;
            log::info!("Loaded config from {}", path.display());
            config
        }
        None => Config::default(),
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("MaskPaint - Inpainting Mask Painter"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "MaskPaint",
        options,
        Box::new(move |_cc| Ok(Box::new(MaskerApp::new(config, args.base, args.reference)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
