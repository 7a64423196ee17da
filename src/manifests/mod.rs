// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Manifest templates: rendering named files and decoding the result.

pub mod decode;
pub mod render;

pub use decode::decode;
pub use render::{render_template, ManifestRenderer, Placeholders};
