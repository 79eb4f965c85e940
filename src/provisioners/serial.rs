// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::context::ProvisionContext;
use crate::provisioners::{ProvisionResult, Provisioner};
use async_trait::async_trait;

/// Runs provisioners one after the other.
///
/// Provisioning goes front to back and deprovisioning back to front, both stop
/// at the first provisioner that does not complete.
pub struct Serial {
    provisioners: Vec<Box<dyn Provisioner>>,
}

impl Serial {
    pub fn new(provisioners: Vec<Box<dyn Provisioner>>) -> Self {
        Self { provisioners }
    }
}

#[async_trait]
impl Provisioner for Serial {
    async fn provision(&self, ctx: &ProvisionContext) -> ProvisionResult {
        for provisioner in &self.provisioners {
            let result = provisioner.provision(ctx).await;
            if !result.is_complete() {
                return result;
            }
        }

        ProvisionResult::Complete
    }

    async fn deprovision(&self, ctx: &ProvisionContext) -> ProvisionResult {
        for provisioner in self.provisioners.iter().rev() {
            let result = provisioner.deprovision(ctx).await;
            if !result.is_complete() {
                return result;
            }
        }

        ProvisionResult::Complete
    }
}
