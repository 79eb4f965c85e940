// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Status conditions attached to managed resources.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of fact a condition describes. Unique per resource.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
pub enum ConditionType {
    /// Whether the resource is provisioned and usable
    Available,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
}

/// Machine readable explanation of a condition's status.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema)]
pub enum ConditionReason {
    Provisioned,
    Provisioning,
    Deprovisioned,
    Deprovisioning,
    /// The controller was shut down mid-operation
    Cancelled,
    Errored,
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "Available"),
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "True"),
            Self::False => write!(f, "False"),
        }
    }
}

impl fmt::Display for ConditionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Provisioned => "Provisioned",
            Self::Provisioning => "Provisioning",
            Self::Deprovisioned => "Deprovisioned",
            Self::Deprovisioning => "Deprovisioning",
            Self::Cancelled => "Cancelled",
            Self::Errored => "Errored",
        };
        f.write_str(s)
    }
}

/// Kubernetes style status condition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub status: ConditionStatus,
    pub reason: ConditionReason,
    pub message: String,
    /// Only moves when `status` changes value
    pub last_transition_time: DateTime<Utc>,
}

/// Get the condition of the given type, if any.
pub fn find_condition(conditions: &[Condition], condition_type: ConditionType) -> Option<&Condition> {
    conditions
        .iter()
        .find(|c| c.condition_type == condition_type)
}

/// Merge a condition into the list by type.
///
/// An existing condition of the same type is replaced in place, keeping its
/// transition time when the status is unchanged. Otherwise the condition is
/// appended with `now` as its transition time.
pub fn update_condition(
    conditions: &mut Vec<Condition>,
    condition_type: ConditionType,
    status: ConditionStatus,
    reason: ConditionReason,
    message: impl Into<String>,
    now: DateTime<Utc>,
) {
    let mut condition = Condition {
        condition_type,
        status,
        reason,
        message: message.into(),
        last_transition_time: now,
    };

    if let Some(existing) = conditions
        .iter_mut()
        .find(|c| c.condition_type == condition_type)
    {
        if existing.status == status {
            condition.last_transition_time = existing.last_transition_time;
        }
        *existing = condition;
        return;
    }

    conditions.push(condition);
}
