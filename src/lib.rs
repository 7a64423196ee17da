// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod cancel;
pub mod config;
pub mod constants;
pub mod error;
pub mod kubernetes;
pub mod manifests;
pub mod provisioner;
pub mod runtime;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use cancel::{CancelHandle, Cancellation};
pub use error::{Result, RuntimeError};
pub use provisioner::Provisioner;
