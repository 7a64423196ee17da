// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Runtime that turns evaluation jobs into Kubernetes objects.

use crate::cancel::Cancellation;
use crate::config::Config;
use crate::constants::{labels, placeholders, RUNTIME_NAME};
use crate::error::{Result, RuntimeError};
use crate::kubernetes::ConfigMapOptions;
use crate::manifests::Placeholders;
use crate::provisioner::Provisioner;
use crate::runtime::{Runtime, Storage};
use crate::types::{BenchmarkSpec, EvaluationJob, JobStatus};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Key of the job definition inside the job ConfigMap
const JOB_CONFIG_KEY: &str = "job.json";

pub struct K8sRuntime {
    provisioner: Provisioner,
    job_manifest: String,
    request_timeout: Duration,
}

impl K8sRuntime {
    pub fn new(provisioner: Provisioner, config: &Config) -> Self {
        Self {
            provisioner,
            job_manifest: config.job_manifest.clone(),
            request_timeout: config.request_timeout,
        }
    }

    async fn provision(&self, job: &EvaluationJob, cancel: &Cancellation) -> Result<()> {
        let namespace = self.provisioner.connection().default_namespace().to_string();
        let config_map = job.config_map_name();

        let definition = serde_json::to_string_pretty(job)
            .map_err(|e| RuntimeError::InvalidJob(format!("cannot serialize job: {}", e)))?;
        let options = ConfigMapOptions {
            labels: job_labels(job),
            annotations: BTreeMap::new(),
        };
        self.provisioner
            .create_config_map(
                cancel,
                &namespace,
                &config_map,
                BTreeMap::from([(JOB_CONFIG_KEY.to_string(), definition)]),
                Some(&options),
            )
            .await?;

        for benchmark in &job.benchmarks {
            let values = job_placeholders(job, benchmark, &namespace, &config_map);
            let created = self
                .provisioner
                .create_resource_from_file(cancel, &self.job_manifest, &values)
                .await?;
            info!(
                "Started benchmark {} of job {} as {} {}",
                benchmark.benchmark_id,
                job.id,
                created.kind(),
                created.name().unwrap_or_default()
            );
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Runtime for K8sRuntime {
    #[instrument(skip(self, job, storage), fields(job = %job.id))]
    async fn run_evaluation_job(&self, job: &EvaluationJob, storage: &dyn Storage) -> Result<()> {
        validate_job(job)?;

        let (cancel, _handle) = Cancellation::with_timeout(self.request_timeout);

        match self.provision(job, &cancel).await {
            Ok(()) => {
                storage
                    .update_evaluation_job_status(&job.id, JobStatus::Running)
                    .await?;
                Ok(())
            }
            Err(e) => {
                error!("Failed to start evaluation job {}: {}", job.id, e);
                if let Err(status_err) = storage
                    .update_evaluation_job_status(&job.id, JobStatus::Failed)
                    .await
                {
                    warn!("Failed to record failure of job {}: {}", job.id, status_err);
                }
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        RUNTIME_NAME
    }
}

/// Job ids end up in object names, so they must be valid DNS labels
fn validate_job(job: &EvaluationJob) -> Result<()> {
    let valid_id = !job.id.is_empty()
        && job.id.len() <= 50
        && job
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !job.id.starts_with('-')
        && !job.id.ends_with('-');
    if !valid_id {
        return Err(RuntimeError::InvalidJob(format!(
            "job id {:?} is not a valid DNS label",
            job.id
        )));
    }
    if job.benchmarks.is_empty() {
        return Err(RuntimeError::InvalidJob(format!(
            "job {} has no benchmarks",
            job.id
        )));
    }

    validate_field("model url", &job.model.url)?;
    validate_field("model name", &job.model.name)?;
    for benchmark in &job.benchmarks {
        validate_field("benchmark id", &benchmark.benchmark_id)?;
        validate_field("provider id", &benchmark.provider_id)?;
    }
    Ok(())
}

/// Values substituted into quoted YAML scalars of the job manifest
fn validate_field(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RuntimeError::InvalidJob(format!("{} is empty", field)));
    }
    if value
        .chars()
        .any(|c| c == '"' || c == '\\' || c.is_control())
    {
        return Err(RuntimeError::InvalidJob(format!(
            "{} {:?} contains quotes, backslashes or control characters",
            field, value
        )));
    }
    Ok(())
}

fn job_labels(job: &EvaluationJob) -> BTreeMap<String, String> {
    BTreeMap::from([
        (labels::MANAGED_BY.to_string(), labels::MANAGED_BY_VALUE.to_string()),
        (labels::JOB_ID.to_string(), job.id.clone()),
    ])
}

fn job_placeholders(
    job: &EvaluationJob,
    benchmark: &BenchmarkSpec,
    namespace: &str,
    config_map: &str,
) -> Placeholders {
    [
        (placeholders::JOB_ID, job.id.as_str()),
        (placeholders::PROVIDER_ID, benchmark.provider_id.as_str()),
        (placeholders::BENCHMARK_ID, benchmark.benchmark_id.as_str()),
        (placeholders::MODEL_URL, job.model.url.as_str()),
        (placeholders::MODEL_NAME, job.model.name.as_str()),
        (placeholders::NAMESPACE, namespace),
        (placeholders::CONFIG_MAP, config_map),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
