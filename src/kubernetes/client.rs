// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster connection bootstrap

use crate::config::Config;
use crate::error::{Result, RuntimeError};
use crate::kubernetes::discovery::DiscoveryCache;
use kube::{config::KubeConfigOptions, Client, Config as KConfig};
use tracing::{debug, info, instrument};

/// Everything needed to talk to the target cluster.
///
/// The same `Client` serves typed (`Api<ConfigMap>`), dynamic
/// (`Api<DynamicObject>`) and discovery requests. Cloning is cheap and all
/// clones share one discovery cache.
#[derive(Clone)]
pub struct ClusterConnection {
    client: Client,
    discovery: DiscoveryCache,
    default_namespace: String,
}

impl std::fmt::Debug for ClusterConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterConnection")
            .field("default_namespace", &self.default_namespace)
            .finish_non_exhaustive()
    }
}

impl ClusterConnection {
    /// Connect using in-cluster credentials, falling back to the default kubeconfig.
    ///
    /// No request is sent to the cluster here.
    #[instrument(skip(config))]
    pub async fn connect(config: &Config) -> Result<Self> {
        let kube_config = load_kube_config().await?;
        let default_namespace =
            resolve_default_namespace(config.default_namespace.as_deref(), &kube_config.default_namespace);

        info!(
            "Using cluster {} with default namespace {}",
            kube_config.cluster_url, default_namespace
        );

        let client = Client::try_from(kube_config)
            .map_err(|e| RuntimeError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self::new(client, default_namespace))
    }

    /// Wrap an existing client
    pub fn new(client: Client, default_namespace: impl Into<String>) -> Self {
        Self {
            discovery: DiscoveryCache::new(client.clone()),
            client,
            default_namespace: default_namespace.into(),
        }
    }

    /// Wrap an existing client, keeping the namespace it was configured with
    pub fn from_client(client: Client) -> Self {
        let namespace = client.default_namespace().to_string();
        Self::new(client, namespace)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn discovery(&self) -> &DiscoveryCache {
        &self.discovery
    }

    /// Namespace used for namespaced objects that do not name one
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }
}

async fn load_kube_config() -> Result<KConfig> {
    match KConfig::incluster() {
        Ok(c) => {
            info!("Using in-cluster service account credentials");
            Ok(c)
        }
        Err(in_cluster_err) => {
            debug!("In-cluster configuration unavailable: {}", in_cluster_err);
            let c = KConfig::from_kubeconfig(&KubeConfigOptions::default())
                .await
                .map_err(|e| {
                    RuntimeError::Connection(format!(
                        "No in-cluster configuration ({}) and no usable kubeconfig ({})",
                        in_cluster_err, e
                    ))
                })?;
            info!("Using kubeconfig credentials");
            Ok(c)
        }
    }
}

/// Configured override wins over the namespace inferred from the credentials
fn resolve_default_namespace(configured: Option<&str>, inferred: &str) -> String {
    match configured.map(str::trim).filter(|ns| !ns.is_empty()) {
        Some(ns) => ns.to_string(),
        None if !inferred.is_empty() => inferred.to_string(),
        None => "default".to_string(),
    }
}
