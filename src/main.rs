// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use std::sync::Arc;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use steward::cd::new_driver;
use steward::config::Config;
use steward::context::Handles;
use steward::events::KubeEventPublisher;
use steward::kubernetes::wait_for_crd;
use steward::provisioners::{NamespaceProvisioner, Provisioner};
use steward::reconcilers::{ManagedController, ProvisionerFactory, Reconciler};
use steward::store::KubeStore;
use steward::types::ManagedResource;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting steward controller");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: namespace={}, cd_driver={}, yield_timeout={:?}",
        config.namespace, config.cd_driver, config.yield_timeout
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for ManagedResource CRD to become available...");
    wait_for_crd::<ManagedResource>(&client).await?;

    let shutdown = CancellationToken::new();
    let terminate = signal(SignalKind::terminate())?;
    tokio::spawn(shutdown_on_signal(terminate, shutdown.clone()));

    let handles = Handles {
        driver: new_driver(config.cd_driver, client.clone(), &config.namespace),
        events: Arc::new(KubeEventPublisher::new(client.clone(), &config.controller_name)),
        namespace: config.namespace.clone(),
        client: client.clone(),
    };

    let factory: ProvisionerFactory<ManagedResource> = Arc::new(|resource: &ManagedResource| {
        Box::new(NamespaceProvisioner::for_resource(resource)) as Box<dyn Provisioner>
    });

    let reconciler = Reconciler::new(
        KubeStore::new(client.clone()),
        handles,
        factory,
        shutdown.clone(),
        config.yield_timeout,
    );

    ManagedController::new(client, reconciler, shutdown)
        .run()
        .await?;

    info!("Shutdown complete");
    Ok(())
}

/// Cancel `shutdown` on SIGINT or SIGTERM
async fn shutdown_on_signal(mut terminate: Signal, shutdown: CancellationToken) {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Unable to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = interrupt => info!("Received SIGINT, shutting down"),
        _ = terminate.recv() => info!("Received SIGTERM, shutting down"),
    }

    shutdown.cancel();
}
