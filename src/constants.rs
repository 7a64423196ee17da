// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Directory under which manifest templates are looked up (relative to the working directory)
pub const MANIFESTS_DIR: &str = "config/kubernetes";

/// Manifest rendered once per benchmark of an evaluation job
pub const JOB_MANIFEST: &str = "job.yaml";

/// Default per-job deadline for cluster calls made by the runtime
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Name reported by the Kubernetes runtime
pub const RUNTIME_NAME: &str = "kubernetes";

/// Kubernetes label keys set on objects created for evaluation jobs
pub mod labels {
    pub const MANAGED_BY: &str = "app.kubernetes.io/managed-by";
    pub const MANAGED_BY_VALUE: &str = "eval-hub";
    pub const JOB_ID: &str = "eval-hub.io/job-id";
}

/// Template placeholder names supplied by the runtime
pub mod placeholders {
    pub const JOB_ID: &str = "JobID";
    pub const PROVIDER_ID: &str = "ProviderID";
    pub const BENCHMARK_ID: &str = "BenchmarkID";
    pub const MODEL_URL: &str = "ModelURL";
    pub const MODEL_NAME: &str = "ModelName";
    pub const NAMESPACE: &str = "Namespace";
    pub const CONFIG_MAP: &str = "ConfigMap";
}
