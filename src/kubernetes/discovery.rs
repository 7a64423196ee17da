// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kind to REST resource resolution through API discovery, cached in memory

use crate::cancel::Cancellation;
use crate::error::{Result, RuntimeError};
use kube::{
    core::GroupVersionKind,
    discovery::{oneshot::pinned_kind, ApiResource, Scope},
    Client,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Whether objects of a resource live in a namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceScope {
    Namespaced,
    Cluster,
}

/// The REST resource serving a kind, and its scope
#[derive(Debug, Clone)]
pub struct ResourceMapping {
    pub api_resource: ApiResource,
    pub scope: ResourceScope,
}

impl ResourceMapping {
    /// Plural resource name used in request paths, e.g. `deployments`
    pub fn resource(&self) -> &str {
        &self.api_resource.plural
    }

    pub fn is_namespaced(&self) -> bool {
        self.scope == ResourceScope::Namespaced
    }
}

/// Discovery results cached for the lifetime of the cache (or until invalidated).
///
/// Lookups of cached kinds never leave the process. Misses resolve only the
/// requested group/version. Failed lookups are not cached.
#[derive(Clone)]
pub struct DiscoveryCache {
    client: Client,
    mappings: Arc<RwLock<HashMap<GroupVersionKind, ResourceMapping>>>,
}

impl DiscoveryCache {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            mappings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Resolve a kind to its REST resource and scope.
    ///
    /// Cache hits are served even when `cancel` has already fired.
    #[instrument(skip(self, cancel), fields(api_version = %gvk.api_version(), kind = %gvk.kind))]
    pub async fn resolve(
        &self,
        cancel: &Cancellation,
        gvk: &GroupVersionKind,
    ) -> Result<ResourceMapping> {
        if let Some(mapping) = self.cached(gvk).await {
            debug!("Resource mapping cache hit");
            return Ok(mapping);
        }

        let mapping = cancel.run(self.discover(gvk)).await?;

        // A concurrent populate may have won; keep whichever landed first
        let mut mappings = self.mappings.write().await;
        let mapping = mappings.entry(gvk.clone()).or_insert(mapping).clone();
        Ok(mapping)
    }

    /// Currently cached mapping for a kind, without contacting the cluster
    pub async fn cached(&self, gvk: &GroupVersionKind) -> Option<ResourceMapping> {
        self.mappings.read().await.get(gvk).cloned()
    }

    /// Number of cached mappings
    pub async fn len(&self) -> usize {
        self.mappings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Forget every cached mapping
    pub async fn invalidate(&self) {
        let mut mappings = self.mappings.write().await;
        info!("Invalidating {} cached resource mappings", mappings.len());
        mappings.clear();
    }

    /// Drop the cached mapping for one kind and resolve it again
    pub async fn refresh(
        &self,
        cancel: &Cancellation,
        gvk: &GroupVersionKind,
    ) -> Result<ResourceMapping> {
        self.mappings.write().await.remove(gvk);
        self.resolve(cancel, gvk).await
    }

    /// Whether both handles point at the same cache
    pub fn shares_cache_with(&self, other: &DiscoveryCache) -> bool {
        Arc::ptr_eq(&self.mappings, &other.mappings)
    }

    async fn discover(&self, gvk: &GroupVersionKind) -> Result<ResourceMapping> {
        let not_found = || RuntimeError::MappingNotFound {
            api_version: gvk.api_version(),
            kind: gvk.kind.clone(),
        };

        match pinned_kind(&self.client, gvk).await {
            Ok((api_resource, capabilities)) => {
                let scope = match capabilities.scope {
                    Scope::Namespaced => ResourceScope::Namespaced,
                    Scope::Cluster => ResourceScope::Cluster,
                };
                debug!(
                    "Discovered resource {} ({:?}) for kind {}",
                    api_resource.plural, scope, gvk.kind
                );
                Ok(ResourceMapping {
                    api_resource,
                    scope,
                })
            }
            Err(kube::Error::Discovery(e)) => {
                debug!("Kind not served by the cluster: {}", e);
                Err(not_found())
            }
            Err(kube::Error::Api(err)) if err.code == 404 => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }
}
