// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::{Condition, ManagableResource};
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "steward.dev", version = "v1alpha1", kind = "ManagedResource")]
#[kube(namespaced)]
#[kube(status = "ManagedResourceStatus")]
#[kube(shortname = "mr")]
#[serde(rename_all = "camelCase")]
pub struct ManagedResourceSpec {
    /// Suspends reconciliation while true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause: Option<bool>,
    /// Desired state, interpreted only by provisioners
    #[serde(flatten)]
    pub payload: BTreeMap<String, serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagedResourceStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl ManagableResource for ManagedResource {
    fn paused(&self) -> bool {
        self.spec.pause.unwrap_or(false)
    }

    fn status_conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

    fn status_conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.status.get_or_insert_with(Default::default).conditions
    }
}
