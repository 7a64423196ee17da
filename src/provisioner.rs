// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Single entry point for provisioning cluster objects from manifest templates.

use crate::cancel::Cancellation;
use crate::error::Result;
use crate::kubernetes::{apply_resource, create_config_map, ClusterConnection, ConfigMapOptions};
use crate::manifests::{decode, ManifestRenderer, Placeholders};
use crate::types::GenericResource;
use k8s_openapi::api::core::v1::ConfigMap;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Cluster connection plus the manifest directory it provisions from
#[derive(Debug, Clone)]
pub struct Provisioner {
    connection: ClusterConnection,
    renderer: ManifestRenderer,
}

impl Provisioner {
    pub fn new(connection: ClusterConnection, renderer: ManifestRenderer) -> Self {
        Self {
            connection,
            renderer,
        }
    }

    pub fn connection(&self) -> &ClusterConnection {
        &self.connection
    }

    pub fn renderer(&self) -> &ManifestRenderer {
        &self.renderer
    }

    /// Render `filename` with `placeholders`, decode it and create the object.
    #[instrument(skip(self, cancel, placeholders))]
    pub async fn create_resource_from_file(
        &self,
        cancel: &Cancellation,
        filename: &str,
        placeholders: &Placeholders,
    ) -> Result<GenericResource> {
        cancel.check()?;

        let rendered = self.renderer.render(filename, placeholders).await?;
        let resource = decode(&rendered)?;
        debug!(
            "Decoded {} {} from {}",
            resource.api_version(),
            resource.kind(),
            filename
        );

        apply_resource(&self.connection, cancel, &resource).await
    }

    /// Create a ConfigMap directly, without a template
    pub async fn create_config_map(
        &self,
        cancel: &Cancellation,
        namespace: &str,
        name: &str,
        data: BTreeMap<String, String>,
        options: Option<&ConfigMapOptions>,
    ) -> Result<ConfigMap> {
        create_config_map(self.connection.client(), cancel, namespace, name, data, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use crate::kubernetes::ResourceScope;
    use crate::test_utils::{api_resource_list_json, created_json, MockService};
    use std::fs;
    use std::time::Duration;

    const DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: provider-{{ .ProviderID }}
  namespace: evals
spec:
  replicas: 1
  selector:
    matchLabels:
      app: provider-{{ .ProviderID }}
"#;

    fn provisioner(service: &MockService, dir: &std::path::Path) -> Provisioner {
        let connection = ClusterConnection::new(service.clone().into_client(), "default");
        Provisioner::new(connection, ManifestRenderer::new(dir))
    }

    fn placeholders() -> Placeholders {
        Placeholders::from([("ProviderID".to_string(), "acme".to_string())])
    }

    #[tokio::test]
    async fn test_create_resource_from_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("deployment.yaml"), DEPLOYMENT).unwrap();

        let rendered = String::from_utf8(
            ManifestRenderer::new(dir.path())
                .render("deployment.yaml", &placeholders())
                .await
                .unwrap(),
        )
        .unwrap();
        assert!(rendered.contains("name: provider-acme"));

        let decoded = decode(rendered.as_bytes()).unwrap();
        let echoed = serde_json::json!({
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "provider-acme", "namespace": "evals"},
            "spec": decoded.field("spec").unwrap().clone()
        });
        let service = MockService::new()
            .on_get(
                "/apis/apps/v1",
                200,
                &api_resource_list_json("apps/v1", &[("deployments", "Deployment", true)]),
            )
            .on_post(
                "/apis/apps/v1/namespaces/evals/deployments",
                201,
                &created_json(echoed, "uid-acme"),
            );
        let provisioner = provisioner(&service, dir.path());
        let (cancel, _handle) = Cancellation::with_timeout(Duration::from_secs(5));

        let mapping = provisioner
            .connection()
            .discovery()
            .resolve(&cancel, decoded.gvk())
            .await
            .unwrap();
        assert_eq!(mapping.scope, ResourceScope::Namespaced);

        let created = provisioner
            .create_resource_from_file(&cancel, "deployment.yaml", &placeholders())
            .await
            .unwrap();

        assert_eq!(created.kind(), "Deployment");
        assert_eq!(created.name(), Some("provider-acme"));
        assert_eq!(created.uid(), Some("uid-acme"));
        assert_eq!(
            service.count("POST", "/apis/apps/v1/namespaces/evals/deployments"),
            1
        );
        // Second resolve was served from the cache
        assert_eq!(service.count("GET", "/apis/apps/v1"), 1);
    }

    #[tokio::test]
    async fn test_render_failure_never_reaches_cluster() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("deployment.yaml"), DEPLOYMENT).unwrap();
        let service = MockService::new();
        let provisioner = provisioner(&service, dir.path());
        let (cancel, _handle) = Cancellation::with_timeout(Duration::from_secs(5));

        let err = provisioner
            .create_resource_from_file(&cancel, "deployment.yaml", &Placeholders::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::Template { .. }));
        assert!(service.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let service = MockService::new();
        let provisioner = provisioner(&service, dir.path());
        let (cancel, _handle) = Cancellation::with_timeout(Duration::from_secs(5));

        let err = provisioner
            .create_resource_from_file(&cancel, "deployment.yaml", &placeholders())
            .await
            .unwrap_err();

        assert!(matches!(err, RuntimeError::ManifestNotFound(_)));
    }
}
