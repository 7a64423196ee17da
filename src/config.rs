// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{JOB_MANIFEST, MANIFESTS_DIR, REQUEST_TIMEOUT_SECS};
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the manifest templates
    pub manifests_dir: PathBuf,
    /// Overrides the namespace inferred from the cluster credentials
    pub default_namespace: Option<String>,
    /// Manifest rendered for each benchmark of an evaluation job
    pub job_manifest: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            manifests_dir: PathBuf::from(MANIFESTS_DIR),
            default_namespace: None,
            job_manifest: JOB_MANIFEST.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let manifests_dir = non_empty("EVAL_HUB_MANIFESTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.manifests_dir);
        let default_namespace = non_empty("EVAL_HUB_NAMESPACE");
        let job_manifest = non_empty("EVAL_HUB_JOB_MANIFEST").unwrap_or(defaults.job_manifest);

        let request_timeout = match non_empty("EVAL_HUB_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("EVAL_HUB_REQUEST_TIMEOUT_SECS is not a number: {raw}"))?;
                if secs == 0 {
                    bail!("EVAL_HUB_REQUEST_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        Ok(Config {
            manifests_dir,
            default_namespace,
            job_manifest,
            request_timeout,
        })
    }
}
