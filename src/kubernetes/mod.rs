// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for connection bootstrap, discovery, and object creation.

pub mod apply;
pub mod client;
pub mod configmaps;
pub mod discovery;

pub use apply::apply_resource;
pub use client::ClusterConnection;
pub use configmaps::{create_config_map, ConfigMapOptions};
pub use discovery::{DiscoveryCache, ResourceMapping, ResourceScope};
