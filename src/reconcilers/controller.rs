// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Runs the reconciliation engine under the kube-runtime controller.

use crate::constants::ERROR_REQUEUE;
use crate::error::{Result, StewardError};
use crate::reconcilers::engine::Reconciler;
use crate::store::ObjectStore;
use crate::types::ManagableResource;
use futures::StreamExt;
use kube::{
    runtime::{controller::Action, Controller},
    Api, Client, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Watches every object of kind `K` and reconciles it.
pub struct ManagedController<K, S> {
    client: Client,
    reconciler: Reconciler<K, S>,
    shutdown: CancellationToken,
}

impl<K, S> ManagedController<K, S>
where
    K: ManagableResource,
    S: ObjectStore<K> + 'static,
{
    pub fn new(client: Client, reconciler: Reconciler<K, S>, shutdown: CancellationToken) -> Self {
        Self {
            client,
            reconciler,
            shutdown,
        }
    }

    /// Run until the shutdown token is cancelled and in-flight reconciles
    /// have finished.
    pub async fn run(self) -> anyhow::Result<()> {
        let objects: Api<K> = Api::all(self.client.clone());
        let shutdown = self.shutdown.clone();
        let context = Arc::new(self.reconciler);

        info!("Starting controller for {}", K::kind(&()));

        Controller::new(objects, WatcherConfig::default())
            .graceful_shutdown_on(shutdown.cancelled_owned())
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        info!("Controller for {} stopped", K::kind(&()));
        Ok(())
    }
}

async fn reconcile<K, S>(object: Arc<K>, ctx: Arc<Reconciler<K, S>>) -> Result<Action>
where
    K: ManagableResource,
    S: ObjectStore<K>,
{
    let namespace = object
        .namespace()
        .ok_or(StewardError::MissingObjectKey(".metadata.namespace"))?;
    let name = object.name_any();

    let outcome = ctx.reconcile(&namespace, &name).await?;
    debug!("Reconciled {}/{}: {:?}", namespace, name, outcome);

    Ok(outcome.action(ctx.yield_timeout()))
}

fn error_policy<K, S>(_object: Arc<K>, error: &StewardError, _ctx: Arc<Reconciler<K, S>>) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(ERROR_REQUEUE)
}
