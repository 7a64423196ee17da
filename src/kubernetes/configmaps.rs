// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! ConfigMap creation through the typed API

use crate::cancel::Cancellation;
use crate::error::{Result, RuntimeError};
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Optional metadata for [`create_config_map`]
#[derive(Debug, Clone, Default)]
pub struct ConfigMapOptions {
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

/// Build a ConfigMap; empty labels or annotations leave the field unset
pub fn build_config_map(
    namespace: &str,
    name: &str,
    data: BTreeMap<String, String>,
    options: Option<&ConfigMapOptions>,
) -> ConfigMap {
    let mut metadata = ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    };

    if let Some(opts) = options {
        if !opts.labels.is_empty() {
            metadata.labels = Some(opts.labels.clone());
        }
        if !opts.annotations.is_empty() {
            metadata.annotations = Some(opts.annotations.clone());
        }
    }

    ConfigMap {
        metadata,
        data: Some(data),
        ..Default::default()
    }
}

/// Create a ConfigMap in the given namespace
#[instrument(skip(client, cancel, data, options))]
pub async fn create_config_map(
    client: &Client,
    cancel: &Cancellation,
    namespace: &str,
    name: &str,
    data: BTreeMap<String, String>,
    options: Option<&ConfigMapOptions>,
) -> Result<ConfigMap> {
    let config_maps: Api<ConfigMap> = Api::namespaced(client.clone(), namespace);
    let config_map = build_config_map(namespace, name, data, options);

    let created = cancel
        .run(async {
            config_maps
                .create(&PostParams::default(), &config_map)
                .await
                .map_err(RuntimeError::from)
        })
        .await?;

    info!("ConfigMap {}/{} created", namespace, name);
    Ok(created)
}
