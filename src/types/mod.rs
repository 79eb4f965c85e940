// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource types understood by the reconciliation engine.

pub mod condition;
pub mod managed_resource;

use chrono::Utc;
use kube::core::NamespaceResourceScope;
use kube::Resource;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

pub use condition::{Condition, ConditionReason, ConditionStatus, ConditionType};
pub use managed_resource::{ManagedResource, ManagedResourceSpec, ManagedResourceStatus};

/// Capabilities every resource kind needs for the engine to manage it.
///
/// Identity, deletion timestamp and finalizers come from the object metadata,
/// the rest is kind specific.
pub trait ManagableResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Whether reconciliation has been suspended by the user.
    fn paused(&self) -> bool;

    fn status_conditions(&self) -> &[Condition];

    fn status_conditions_mut(&mut self) -> &mut Vec<Condition>;

    fn status_condition(&self, condition_type: ConditionType) -> Option<&Condition> {
        condition::find_condition(self.status_conditions(), condition_type)
    }

    /// Write a condition, replacing any existing one of the same type.
    fn status_condition_write(
        &mut self,
        condition_type: ConditionType,
        status: ConditionStatus,
        reason: ConditionReason,
        message: &str,
    ) {
        condition::update_condition(
            self.status_conditions_mut(),
            condition_type,
            status,
            reason,
            message,
            Utc::now(),
        );
    }
}
