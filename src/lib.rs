// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! MaskPaint library.
//!
//! The mask raster engine ([`raster`], [`session`]) has no UI
//! dependencies; [`app`] and [`ui`] wrap it in an egui desktop shell.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod raster;
pub mod session;
pub mod ui;
pub mod util;
