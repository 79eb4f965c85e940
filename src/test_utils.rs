// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use crate::cd::{new_driver, DriverKind};
use crate::context::{Handles, ProvisionContext};
use crate::events::{EventPublisher, NoopEventPublisher};
use async_trait::async_trait;
use http::{Request, Response};
use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::EventType;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    calls: Arc<Mutex<Vec<String>>>,
    hanging: Arc<Mutex<HashSet<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            hanging: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    /// Add a response for DELETE requests matching the exact path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Never answer requests with this method and exact path
    pub fn hang_on(self, method: &str, path: &str) -> Self {
        self.hanging
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()));
        self
    }

    /// Requests served so far, as `METHOD path`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        // Try exact match first
        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // Try prefix match for paths like /api/v1/namespaces/foo
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        self.calls.lock().unwrap().push(format!("{} {}", method, path));

        if self
            .hanging
            .lock()
            .unwrap()
            .contains(&(method.clone(), path.clone()))
        {
            return Box::pin(futures::future::pending::<Result<Self::Response, Self::Error>>());
        }

        let response = self.find_response(&method, &path);

        Box::pin(async move {
            match response {
                Some((status, body)) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))
                    .unwrap()),
                None => {
                    // Default 404 for unmatched requests
                    let body = r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#;
                    Ok(Response::builder()
                        .status(404)
                        .header("content-type", "application/json")
                        .body(Body::from(body.as_bytes().to_vec()))
                        .unwrap())
                }
            }
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        },
        "status": {
            "phase": "Active"
        }
    })
    .to_string()
}

/// Create a mock namespace JSON response carrying the given labels
pub fn labelled_namespace_json(name: &str, labels: &[(&str, &str)]) -> String {
    let labels: serde_json::Map<String, serde_json::Value> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
        .collect();

    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid",
            "labels": labels
        },
        "status": {
            "phase": "Active"
        }
    })
    .to_string()
}

/// Create a mock namespace JSON response for a namespace being deleted
pub fn terminating_namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid",
            "deletionTimestamp": "2026-01-01T00:00:00Z"
        },
        "status": {
            "phase": "Terminating"
        }
    })
    .to_string()
}

/// Event publisher remembering `(object name, reason)` of everything published
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<(String, String)>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<(String, String)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(
        &self,
        resource_ref: &ObjectReference,
        _type_: EventType,
        reason: &str,
        _action: &str,
        _note: Option<String>,
    ) {
        self.events.lock().unwrap().push((
            resource_ref.name.clone().unwrap_or_default(),
            reason.to_string(),
        ));
    }
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Reference to the resource used throughout the tests
pub fn make_resource_ref() -> ObjectReference {
    ObjectReference {
        api_version: Some("steward.dev/v1alpha1".to_string()),
        kind: Some("ManagedResource".to_string()),
        name: Some("demo".to_string()),
        namespace: Some("tenants".to_string()),
        ..Default::default()
    }
}

/// Process handles backed by the given client
pub fn make_handles(client: Client, events: Arc<dyn EventPublisher>) -> Handles {
    Handles {
        driver: new_driver(DriverKind::ArgoCd, client.clone(), "argocd"),
        events,
        namespace: "steward-system".to_string(),
        client,
    }
}

/// A provision context for the test resource that drops its events
pub fn make_context(client: Client, cancel: CancellationToken) -> ProvisionContext {
    make_context_with_events(client, cancel, Arc::new(NoopEventPublisher))
}

pub fn make_context_with_events(
    client: Client,
    cancel: CancellationToken,
    events: Arc<dyn EventPublisher>,
) -> ProvisionContext {
    make_handles(client, events).new_context(make_resource_ref(), cancel)
}
