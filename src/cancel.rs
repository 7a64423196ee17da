// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Caller-supplied deadline and cancellation for cluster calls.

use crate::error::{Result, RuntimeError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// Deadline plus cancel signal passed to every network-bound operation.
///
/// There is no way to build one without a deadline.
#[derive(Clone, Debug)]
pub struct Cancellation {
    deadline: Instant,
    cancelled: watch::Receiver<bool>,
}

/// Fires the cancel signal of the `Cancellation` it was created with
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Cancellation {
    pub fn with_deadline(deadline: Instant) -> (Self, CancelHandle) {
        let (tx, cancelled) = watch::channel(false);
        (Self { deadline, cancelled }, CancelHandle { tx })
    }

    pub fn with_timeout(timeout: Duration) -> (Self, CancelHandle) {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Fail fast if the operation may not start
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(RuntimeError::Cancelled);
        }
        if Instant::now() >= self.deadline {
            return Err(RuntimeError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `fut` to completion unless cancelled or past the deadline first
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let mut cancelled = self.cancelled.clone();
        tokio::select! {
            res = fut => res,
            _ = sleep_until(self.deadline) => Err(RuntimeError::DeadlineExceeded),
            _ = wait_cancelled(&mut cancelled) => Err(RuntimeError::Cancelled),
        }
    }
}

async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    // A dropped handle can never fire
    if rx.wait_for(|c| *c).await.is_err() {
        std::future::pending::<()>().await;
    }
}
