// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Scope-aware creation of generic objects

use crate::cancel::Cancellation;
use crate::error::{Result, RuntimeError};
use crate::kubernetes::client::ClusterConnection;
use crate::kubernetes::discovery::ResourceScope;
use crate::types::GenericResource;
use kube::{
    api::{DynamicObject, PostParams},
    Api,
};
use tracing::{debug, info, instrument};

/// Create `resource` in the cluster and return the object as stored by the API server.
///
/// Namespaced kinds are created in the object's namespace, or in the
/// connection's default namespace when the manifest leaves it empty. Cluster
/// scoped kinds ignore the namespace. Creating an object that already exists
/// fails with a 409 API error.
#[instrument(
    skip(connection, cancel, resource),
    fields(kind = %resource.kind(), name = %resource.name().unwrap_or("<generated>"))
)]
pub async fn apply_resource(
    connection: &ClusterConnection,
    cancel: &Cancellation,
    resource: &GenericResource,
) -> Result<GenericResource> {
    let mapping = connection.discovery().resolve(cancel, resource.gvk()).await?;

    let mut object = resource.clone();
    let api: Api<DynamicObject> = match mapping.scope {
        ResourceScope::Namespaced => {
            let namespace = match resource.namespace() {
                Some(ns) => ns.to_string(),
                None => {
                    debug!(
                        "No namespace in manifest, using default namespace {}",
                        connection.default_namespace()
                    );
                    connection.default_namespace().to_string()
                }
            };
            object.set_namespace(&namespace);
            Api::namespaced_with(connection.client().clone(), &namespace, &mapping.api_resource)
        }
        ResourceScope::Cluster => {
            object.clear_namespace();
            Api::all_with(connection.client().clone(), &mapping.api_resource)
        }
    };

    let object: DynamicObject = object.into();
    let created = cancel
        .run(async {
            api.create(&PostParams::default(), &object)
                .await
                .map_err(RuntimeError::from)
        })
        .await?;

    let created = GenericResource::try_from(created)?;
    info!(
        "Created {} {}{}",
        created.kind(),
        created
            .namespace()
            .map(|ns| format!("{}/", ns))
            .unwrap_or_default(),
        created.name().unwrap_or_default()
    );
    Ok(created)
}
