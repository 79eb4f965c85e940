// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provisions a namespace in the current cluster scope.
//!
//! Created namespaces carry the identity of their owning resource as labels.
//! A namespace without matching labels is never adopted nor deleted.

use crate::constants::{labels, OPERATOR_NAME};
use crate::context::ProvisionContext;
use crate::provisioners::{ProvisionResult, Provisioner};
use crate::types::ManagedResource;
use anyhow::anyhow;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, ObjectReference};
use kube::{
    api::{DeleteParams, ObjectMeta, PostParams},
    runtime::events::EventType,
    Api, ResourceExt,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Payload key naming the namespace to create
pub const NAMESPACE_KEY: &str = "namespace";

pub struct NamespaceProvisioner {
    name: String,
}

impl NamespaceProvisioner {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Use the namespace named in the resource payload, or derive one from
    /// the resource identity.
    pub fn for_resource(resource: &ManagedResource) -> Self {
        let name = resource
            .spec
            .payload
            .get(NAMESPACE_KEY)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "{}-{}",
                    resource.namespace().unwrap_or_default(),
                    resource.name_any()
                )
            });

        Self::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn make_namespace(&self, owner: &ObjectReference) -> Namespace {
        Namespace {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                labels: Some(owner_labels(owner)),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn create(&self, ctx: &ProvisionContext, namespaces: &Api<Namespace>) -> ProvisionResult {
        info!("Creating namespace {}", self.name);
        let namespace = self.make_namespace(ctx.resource());

        let Some(created) = ctx
            .until_cancelled(namespaces.create(&PostParams::default(), &namespace))
            .await
        else {
            return ProvisionResult::Cancelled;
        };
        if let Err(e) = created {
            return ProvisionResult::from_error(ctx, e);
        }

        ctx.record(
            EventType::Normal,
            "NamespaceCreated",
            "Provision",
            Some(format!("Created namespace {}", self.name)),
        )
        .await;
        ProvisionResult::Complete
    }

    async fn delete(&self, ctx: &ProvisionContext, namespaces: &Api<Namespace>) -> ProvisionResult {
        info!("Deleting namespace {}", self.name);

        let Some(deleted) = ctx
            .until_cancelled(namespaces.delete(&self.name, &DeleteParams::default()))
            .await
        else {
            return ProvisionResult::Cancelled;
        };

        match deleted {
            // The object came back, deletion is still in progress
            Ok(deleted) if deleted.is_left() => ProvisionResult::Yield,
            Ok(_) => ProvisionResult::Complete,
            Err(kube::Error::Api(err)) if err.code == 404 => ProvisionResult::Complete,
            // Raced with another delete, it is terminating now
            Err(kube::Error::Api(err)) if err.code == 409 => ProvisionResult::Yield,
            Err(e) => ProvisionResult::from_error(ctx, e),
        }
    }
}

/// Labels marking a namespace as created by us on behalf of `owner`
fn owner_labels(owner: &ObjectReference) -> BTreeMap<String, String> {
    let mut values = BTreeMap::from([(
        labels::MANAGED_BY.to_string(),
        OPERATOR_NAME.to_string(),
    )]);
    let owner_values = [
        (labels::OWNER_KIND, &owner.kind),
        (labels::OWNER_NAMESPACE, &owner.namespace),
        (labels::OWNER_NAME, &owner.name),
    ];
    for (key, value) in owner_values {
        if let Some(value) = value {
            values.insert(key.to_string(), value.clone());
        }
    }
    values
}

/// Only namespaces carrying every owner label of `owner` are ours to manage.
fn is_owned_by(namespace: &Namespace, owner: &ObjectReference) -> bool {
    let existing = namespace.labels();
    owner_labels(owner)
        .iter()
        .all(|(key, value)| existing.get(key) == Some(value))
}

fn is_terminating(namespace: &Namespace) -> bool {
    namespace.metadata.deletion_timestamp.is_some()
        || namespace
            .status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .is_some_and(|phase| phase == "Terminating")
}

#[async_trait]
impl Provisioner for NamespaceProvisioner {
    #[instrument(skip(self, ctx), fields(namespace = %self.name))]
    async fn provision(&self, ctx: &ProvisionContext) -> ProvisionResult {
        let namespaces: Api<Namespace> = Api::all(ctx.cluster().client.clone());

        let Some(existing) = ctx.until_cancelled(namespaces.get_opt(&self.name)).await else {
            return ProvisionResult::Cancelled;
        };

        match existing {
            Ok(Some(namespace)) if is_terminating(&namespace) => {
                debug!("Namespace {} is terminating, waiting", self.name);
                ProvisionResult::Yield
            }
            Ok(Some(namespace)) if !is_owned_by(&namespace, ctx.resource()) => {
                warn!("Namespace {} exists but is not managed by this resource", self.name);
                ProvisionResult::Failed(anyhow!(
                    "namespace {} already exists and is not owned by this resource",
                    self.name
                ))
            }
            Ok(Some(_)) => {
                debug!("Namespace {} already exists", self.name);
                ProvisionResult::Complete
            }
            Ok(None) => self.create(ctx, &namespaces).await,
            Err(e) => ProvisionResult::from_error(ctx, e),
        }
    }

    #[instrument(skip(self, ctx), fields(namespace = %self.name))]
    async fn deprovision(&self, ctx: &ProvisionContext) -> ProvisionResult {
        let namespaces: Api<Namespace> = Api::all(ctx.cluster().client.clone());

        let Some(existing) = ctx.until_cancelled(namespaces.get_opt(&self.name)).await else {
            return ProvisionResult::Cancelled;
        };

        match existing {
            Ok(None) => {
                info!("Namespace {} deleted", self.name);
                ProvisionResult::Complete
            }
            Ok(Some(namespace)) if is_terminating(&namespace) => {
                debug!("Namespace {} is being deleted", self.name);
                ProvisionResult::Yield
            }
            Ok(Some(namespace)) if !is_owned_by(&namespace, ctx.resource()) => {
                info!("Namespace {} is not managed by this resource, leaving it", self.name);
                ProvisionResult::Complete
            }
            Ok(Some(_)) => self.delete(ctx, &namespaces).await,
            Err(e) => ProvisionResult::from_error(ctx, e),
        }
    }
}
