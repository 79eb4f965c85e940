// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The provisioner contract and generic provisioner combinators.
//!
//! A provisioner moves some part of the outside world toward the state a
//! resource asks for. Both operations must be idempotent and must never block
//! waiting for external state to converge: return [`ProvisionResult::Yield`]
//! and the engine calls again after a flat interval.

pub mod concurrent;
pub mod namespace;
pub mod serial;

pub use concurrent::Concurrent;
pub use namespace::NamespaceProvisioner;
pub use serial::Serial;

use crate::context::ProvisionContext;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// How far a provisioning operation got.
#[derive(Debug)]
pub enum ProvisionResult {
    /// Desired state reached
    Complete,
    /// Progressing, call again later
    Yield,
    /// Aborted because the controller is shutting down
    Cancelled,
    /// Anything else
    Failed(anyhow::Error),
}

impl ProvisionResult {
    /// Classify an error raised while provisioning.
    ///
    /// Errors observed after shutdown began are reported as cancellation, the
    /// abort usually surfaces as some unrelated I/O error.
    pub fn from_error(ctx: &ProvisionContext, err: impl Into<anyhow::Error>) -> Self {
        if ctx.is_cancelled() {
            ProvisionResult::Cancelled
        } else {
            ProvisionResult::Failed(err.into())
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ProvisionResult::Complete)
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create or update whatever the resource describes.
    async fn provision(&self, ctx: &ProvisionContext) -> ProvisionResult;

    /// Tear down everything `provision` created.
    async fn deprovision(&self, ctx: &ProvisionContext) -> ProvisionResult;
}
