// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Access to the backing object store.

use crate::error::{Result, StewardError};
use crate::types::ManagableResource;
use async_trait::async_trait;
use kube::{api::PostParams, Api, Client};
use tracing::instrument;

/// Read and write managed objects.
///
/// Writes are optimistic: the object's resource version is sent along and a
/// concurrent modification fails with a conflict error.
#[async_trait]
pub trait ObjectStore<K: Send + Sync + 'static>: Send + Sync {
    /// Fetch an object, `None` if it does not exist.
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>>;

    /// Replace the object, status is ignored.
    async fn update(&self, object: &K) -> Result<K>;

    /// Replace only the status of the object.
    async fn update_status(&self, object: &K) -> Result<K>;
}

/// Object store backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api_for<K: ManagableResource>(&self, object: &K) -> Result<(Api<K>, String)> {
        let namespace = object
            .meta()
            .namespace
            .as_deref()
            .ok_or(StewardError::MissingObjectKey(".metadata.namespace"))?;
        let name = object
            .meta()
            .name
            .clone()
            .ok_or(StewardError::MissingObjectKey(".metadata.name"))?;

        Ok((Api::namespaced(self.client.clone(), namespace), name))
    }
}

#[async_trait]
impl<K: ManagableResource> ObjectStore<K> for KubeStore {
    #[instrument(skip(self))]
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn update(&self, object: &K) -> Result<K> {
        let (api, name) = self.api_for(object)?;
        Ok(api.replace(&name, &PostParams::default(), object).await?)
    }

    async fn update_status(&self, object: &K) -> Result<K> {
        let (api, name) = self.api_for(object)?;
        let data = serde_json::to_vec(object)?;
        Ok(api.replace_status(&name, &PostParams::default(), data).await?)
    }
}
