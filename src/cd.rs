// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Continuous delivery drivers that provisioners hand applications to.

use crate::error::StewardError;
use kube::Client;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The delivery backend selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    ArgoCd,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgoCd => write!(f, "argocd"),
        }
    }
}

impl FromStr for DriverKind {
    type Err = StewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "argocd" => Ok(Self::ArgoCd),
            _ => Err(StewardError::CdDriver(s.to_string())),
        }
    }
}

/// Handle to a delivery backend, injected into every provisioning call.
pub trait Driver: Send + Sync {
    fn kind(&self) -> DriverKind;
}

/// Argo CD backed delivery, applications live in `namespace`.
pub struct ArgoCd {
    client: Client,
    namespace: String,
}

impl ArgoCd {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Driver for ArgoCd {
    fn kind(&self) -> DriverKind {
        DriverKind::ArgoCd
    }
}

/// Create the driver for the configured kind
pub fn new_driver(kind: DriverKind, client: Client, namespace: &str) -> Arc<dyn Driver> {
    match kind {
        DriverKind::ArgoCd => Arc::new(ArgoCd::new(client, namespace)),
    }
}
