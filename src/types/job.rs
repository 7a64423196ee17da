// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};
use std::fmt;

/// An evaluation job handed to a runtime by the job-orchestration layer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EvaluationJob {
    pub id: String,
    pub model: ModelSpec,
    pub benchmarks: Vec<BenchmarkSpec>,
}

/// The model server under evaluation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelSpec {
    pub url: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BenchmarkSpec {
    pub benchmark_id: String,
    pub provider_id: String,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub config: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl EvaluationJob {
    /// Name of the ConfigMap holding this job's definition
    pub fn config_map_name(&self) -> String {
        format!("eval-job-{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_job_without_benchmark_config() {
        let job: EvaluationJob = serde_json::from_value(json!({
            "id": "a1b2",
            "model": {"url": "http://vllm:8000/v1", "name": "granite"},
            "benchmarks": [{"benchmark_id": "mmlu", "provider_id": "lm_evaluation_harness"}]
        }))
        .unwrap();

        assert_eq!(job.benchmarks.len(), 1);
        assert!(job.benchmarks[0].config.is_empty());
        assert_eq!(job.config_map_name(), "eval-job-a1b2");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(JobStatus::Running).unwrap(), json!("running"));
        assert_eq!(JobStatus::Failed.to_string(), "failed");
    }
}
