// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data structures shared by the engine, exporters and UI.

pub mod payload;
pub mod preset;
pub mod stroke;
