// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The per-reconcile context handed to provisioners.

use crate::cd::Driver;
use crate::events::EventPublisher;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::EventType;
use kube::Client;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The cluster provisioners currently operate on.
#[derive(Clone)]
pub struct ClusterContext {
    /// `None` for the cluster the controller runs in
    pub name: Option<String>,
    pub client: Client,
}

impl ClusterContext {
    pub fn local(client: Client) -> Self {
        Self { name: None, client }
    }

    pub fn remote(name: impl Into<String>, client: Client) -> Self {
        Self {
            name: Some(name.into()),
            client,
        }
    }
}

/// Process wide handles shared by every reconcile.
#[derive(Clone)]
pub struct Handles {
    pub driver: Arc<dyn Driver>,
    pub events: Arc<dyn EventPublisher>,
    /// Namespace the controller runs in
    pub namespace: String,
    /// Client for the local cluster, never rescoped
    pub client: Client,
}

impl Handles {
    /// Build a fresh context for one reconcile of `resource`.
    pub fn new_context(&self, resource: ObjectReference, cancel: CancellationToken) -> ProvisionContext {
        ProvisionContext {
            driver: self.driver.clone(),
            events: self.events.clone(),
            namespace: self.namespace.clone(),
            static_client: self.client.clone(),
            cluster: ClusterContext::local(self.client.clone()),
            resource,
            cancel,
        }
    }
}

/// Everything a provisioner may need, passed explicitly through every call.
///
/// One is built per reconcile and dropped when it returns. Nested
/// provisioners that move into another cluster derive a new context with
/// [`ProvisionContext::with_cluster`] rather than mutating this one.
pub struct ProvisionContext {
    driver: Arc<dyn Driver>,
    events: Arc<dyn EventPublisher>,
    namespace: String,
    static_client: Client,
    cluster: ClusterContext,
    resource: ObjectReference,
    cancel: CancellationToken,
}

impl ProvisionContext {
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Client for the local cluster regardless of the current cluster scope
    pub fn static_client(&self) -> &Client {
        &self.static_client
    }

    pub fn cluster(&self) -> &ClusterContext {
        &self.cluster
    }

    /// The resource that caused this reconcile
    pub fn resource(&self) -> &ObjectReference {
        &self.resource
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the controller starts shutting down
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Drive `fut` to completion unless shutdown begins first, in which case
    /// it is dropped and `None` is returned.
    pub async fn until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            output = fut => Some(output),
        }
    }

    /// Derive a context scoped to another cluster.
    pub fn with_cluster(&self, cluster: ClusterContext) -> ProvisionContext {
        ProvisionContext {
            driver: self.driver.clone(),
            events: self.events.clone(),
            namespace: self.namespace.clone(),
            static_client: self.static_client.clone(),
            cluster,
            resource: self.resource.clone(),
            cancel: self.cancel.clone(),
        }
    }

    /// Publish an event on the originating resource.
    pub async fn record(&self, type_: EventType, reason: &str, action: &str, note: Option<String>) {
        self.events
            .publish(&self.resource, type_, reason, action, note)
            .await;
    }
}
