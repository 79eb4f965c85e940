// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

/// Finalizer marking this controller's ownership stake in a resource
pub const FINALIZER: &str = "steward.dev/finalizer";

/// The controller name reported on events
pub const OPERATOR_NAME: &str = "steward";

/// Flat requeue period for resources still being (de)provisioned or that hit
/// an unexpected provisioner error.
pub const DEFAULT_YIELD_TIMEOUT: Duration = Duration::from_secs(10);

/// Requeue period the dispatcher uses after a store error
pub const ERROR_REQUEUE: Duration = Duration::from_secs(60);

/// Labels applied to objects created on behalf of a managed resource
pub mod labels {
    pub const MANAGED_BY: &str = "app.kubernetes.io/managed-by";
    pub const OWNER_KIND: &str = "steward.dev/owner-kind";
    pub const OWNER_NAMESPACE: &str = "steward.dev/owner-namespace";
    pub const OWNER_NAME: &str = "steward.dev/owner-name";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
