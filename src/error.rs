// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Failed to connect to cluster: {0}")]
    Connection(String),

    #[error("No resource mapping for kind {kind} in {api_version}")]
    MappingNotFound { api_version: String, kind: String },

    #[error("Manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Failed to read manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error in {name}: {reason}")]
    Template { name: String, reason: TemplateFailure },

    #[error("Failed to decode manifest: {0}")]
    Decode(String),

    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation deadline exceeded")]
    DeadlineExceeded,

    #[error("Job storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Invalid evaluation job: {0}")]
    InvalidJob(String),
}

/// Why a manifest template could not be rendered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateFailure {
    #[error("parse failed: {0}")]
    Parse(String),

    #[error("missing placeholders: {}", .0.join(", "))]
    MissingPlaceholders(Vec<String>),

    #[error("execution failed: {0}")]
    Execution(String),
}

impl RuntimeError {
    /// HTTP status code of a server-side rejection, if this is one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RuntimeError::Api(kube::Error::Api(response)) => Some(response.code),
            _ => None,
        }
    }

    /// Machine-readable reason of a server-side rejection (e.g. `AlreadyExists`)
    pub fn reason(&self) -> Option<&str> {
        match self {
            RuntimeError::Api(kube::Error::Api(response)) => Some(response.reason.as_str()),
            _ => None,
        }
    }

    /// True for `Cancelled` and `DeadlineExceeded`
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RuntimeError::Cancelled | RuntimeError::DeadlineExceeded)
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
