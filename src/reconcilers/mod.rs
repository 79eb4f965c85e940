// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation of managed resources.

pub mod condition;
pub mod controller;
pub mod engine;

pub use controller::ManagedController;
pub use engine::{ProvisionerFactory, ReconcileOutcome, Reconciler};
