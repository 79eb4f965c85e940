// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The generic reconciliation state machine.
//!
//! A reconcile fetches the object, then either deprovisions it (deletion
//! requested) or provisions it, records the outcome in the Available condition
//! and tells the dispatcher when to come back. Provisioner outcomes never
//! surface as errors: "more work remains" and unexpected failures are both
//! retried after the same flat interval, so the dispatcher's exponential
//! backoff only ever applies to store failures.

use crate::constants::FINALIZER;
use crate::context::{Handles, ProvisionContext};
use crate::error::Result;
use crate::provisioners::{ProvisionResult, Provisioner};
use crate::reconcilers::condition::{translate, Operation};
use crate::store::ObjectStore;
use crate::types::{ConditionType, ManagableResource};
use kube::runtime::controller::Action;
use kube::ResourceExt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Builds the root provisioner for an object
pub type ProvisionerFactory<K> = Arc<dyn Fn(&K) -> Box<dyn Provisioner> + Send + Sync>;

/// How a single reconcile ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The object no longer exists
    Gone,
    Paused,
    DeleteInProgress,
    /// Deprovisioned and our finalizer released, or nothing left to do
    DeleteComplete,
    ProvisionInProgress,
    ProvisionComplete,
    /// The provisioner failed unexpectedly
    Errored,
    /// The provisioner was aborted by controller shutdown
    Cancelled,
}

impl ReconcileOutcome {
    /// The requeue directive for the dispatcher.
    pub fn action(self, yield_timeout: Duration) -> Action {
        match self {
            Self::Gone | Self::Paused | Self::DeleteComplete | Self::ProvisionComplete => {
                Action::await_change()
            }
            Self::DeleteInProgress | Self::ProvisionInProgress | Self::Errored | Self::Cancelled => {
                Action::requeue(yield_timeout)
            }
        }
    }
}

pub struct Reconciler<K, S> {
    store: S,
    handles: Handles,
    create_provisioner: ProvisionerFactory<K>,
    /// Cancelled when the controller shuts down
    shutdown: CancellationToken,
    yield_timeout: Duration,
}

impl<K, S> Reconciler<K, S>
where
    K: ManagableResource,
    S: ObjectStore<K>,
{
    pub fn new(
        store: S,
        handles: Handles,
        create_provisioner: ProvisionerFactory<K>,
        shutdown: CancellationToken,
        yield_timeout: Duration,
    ) -> Self {
        Self {
            store,
            handles,
            create_provisioner,
            shutdown,
            yield_timeout,
        }
    }

    pub fn yield_timeout(&self) -> Duration {
        self.yield_timeout
    }

    /// Reconcile the object identified by `namespace` and `name`.
    ///
    /// Only store failures are returned as errors.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<ReconcileOutcome> {
        let Some(object) = self.store.get(namespace, name).await? else {
            info!("Object deleted");
            return Ok(ReconcileOutcome::Gone);
        };

        if object.paused() {
            info!("Reconciliation paused");
            return Ok(ReconcileOutcome::Paused);
        }

        // Without finalizers Kubernetes is in charge of the deletion
        if object.meta().deletion_timestamp.is_some() {
            if object.finalizers().is_empty() {
                return Ok(ReconcileOutcome::DeleteComplete);
            }

            info!("Deleting object");
            return self.reconcile_delete(object).await;
        }

        info!("Reconciling object");
        self.reconcile_normal(object).await
    }

    #[instrument(skip(self, object))]
    async fn reconcile_delete(&self, object: K) -> Result<ReconcileOutcome> {
        let provisioner = (self.create_provisioner)(&object);
        let ctx = self.new_context(&object);

        let result = classify(provisioner.deprovision(&ctx).await, &ctx);

        let mut object = self
            .update_condition(object, Operation::Deprovision, &result)
            .await?;

        match result {
            ProvisionResult::Complete => {
                if remove_finalizer(&mut object) {
                    self.store.update(&object).await?;
                }
                Ok(ReconcileOutcome::DeleteComplete)
            }
            ProvisionResult::Yield => {
                debug!("Deprovisioning in progress");
                Ok(ReconcileOutcome::DeleteInProgress)
            }
            ProvisionResult::Cancelled => {
                warn!("Deprovisioning aborted due to controller shutdown");
                Ok(ReconcileOutcome::Cancelled)
            }
            ProvisionResult::Failed(e) => {
                error!("Deprovisioning failed unexpectedly: {:#}", e);
                Ok(ReconcileOutcome::Errored)
            }
        }
    }

    #[instrument(skip(self, object))]
    async fn reconcile_normal(&self, mut object: K) -> Result<ReconcileOutcome> {
        // Hold deletion until we have deprovisioned
        if add_finalizer(&mut object) {
            object = self.store.update(&object).await?;
        }

        let provisioner = (self.create_provisioner)(&object);
        let ctx = self.new_context(&object);

        let result = classify(provisioner.provision(&ctx).await, &ctx);

        self.update_condition(object, Operation::Provision, &result)
            .await?;

        match result {
            ProvisionResult::Complete => Ok(ReconcileOutcome::ProvisionComplete),
            ProvisionResult::Yield => {
                debug!("Provisioning in progress");
                Ok(ReconcileOutcome::ProvisionInProgress)
            }
            ProvisionResult::Cancelled => {
                warn!("Provisioning aborted due to controller shutdown");
                Ok(ReconcileOutcome::Cancelled)
            }
            ProvisionResult::Failed(e) => {
                error!("Provisioning failed unexpectedly: {:#}", e);
                Ok(ReconcileOutcome::Errored)
            }
        }
    }

    fn new_context(&self, object: &K) -> ProvisionContext {
        self.handles
            .new_context(object.object_ref(&()), self.shutdown.child_token())
    }

    async fn update_condition(
        &self,
        mut object: K,
        operation: Operation,
        result: &ProvisionResult,
    ) -> Result<K> {
        let update = translate(operation, result);

        object.status_condition_write(
            ConditionType::Available,
            update.status,
            update.reason,
            &update.message,
        );

        self.store.update_status(&object).await
    }
}

/// A failure raised after shutdown began is the shutdown's doing.
fn classify(result: ProvisionResult, ctx: &ProvisionContext) -> ProvisionResult {
    match result {
        ProvisionResult::Failed(e) if ctx.is_cancelled() => {
            debug!("Ignoring error after shutdown: {:#}", e);
            ProvisionResult::Cancelled
        }
        other => other,
    }
}

fn add_finalizer<K: ManagableResource>(object: &mut K) -> bool {
    if object.finalizers().iter().any(|f| f == FINALIZER) {
        return false;
    }
    object.finalizers_mut().push(FINALIZER.to_string());
    true
}

fn remove_finalizer<K: ManagableResource>(object: &mut K) -> bool {
    let finalizers = object.finalizers_mut();
    let before = finalizers.len();
    finalizers.retain(|f| f != FINALIZER);
    finalizers.len() != before
}
