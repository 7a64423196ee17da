// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Domain types: generic Kubernetes objects and evaluation jobs.

pub mod job;
pub mod resource;

pub use job::{BenchmarkSpec, EvaluationJob, JobStatus, ModelSpec};
pub use resource::GenericResource;
