// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Capabilities exposed to, and consumed from, the job-orchestration layer.

pub mod kubernetes;

use crate::error::Result;
use crate::types::{EvaluationJob, JobStatus};

pub use kubernetes::K8sRuntime;

/// Executes evaluation jobs on some backend
#[async_trait::async_trait]
pub trait Runtime: Send + Sync {
    /// Start the workloads for `job`, recording progress in `storage`
    async fn run_evaluation_job(&self, job: &EvaluationJob, storage: &dyn Storage) -> Result<()>;

    fn name(&self) -> &str;
}

/// Job bookkeeping owned by the orchestration layer
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    async fn update_evaluation_job_status(&self, id: &str, status: JobStatus) -> anyhow::Result<()>;
}
