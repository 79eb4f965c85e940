// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::context::ProvisionContext;
use crate::provisioners::{ProvisionResult, Provisioner};
use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

/// Runs provisioners at the same time and waits for all of them.
pub struct Concurrent {
    provisioners: Vec<Box<dyn Provisioner>>,
}

impl Concurrent {
    pub fn new(provisioners: Vec<Box<dyn Provisioner>>) -> Self {
        Self { provisioners }
    }
}

#[async_trait]
impl Provisioner for Concurrent {
    async fn provision(&self, ctx: &ProvisionContext) -> ProvisionResult {
        let results = join_all(self.provisioners.iter().map(|p| p.provision(ctx))).await;
        combine(results)
    }

    async fn deprovision(&self, ctx: &ProvisionContext) -> ProvisionResult {
        let results = join_all(self.provisioners.iter().map(|p| p.deprovision(ctx))).await;
        combine(results)
    }
}

/// Collapse results, the first failure wins, then cancellation, then yield.
fn combine(results: Vec<ProvisionResult>) -> ProvisionResult {
    let mut failed = None;
    let mut cancelled = false;
    let mut yielded = false;

    for result in results {
        match result {
            ProvisionResult::Failed(e) if failed.is_none() => failed = Some(e),
            ProvisionResult::Failed(e) => debug!("Additional concurrent failure: {:#}", e),
            ProvisionResult::Cancelled => cancelled = true,
            ProvisionResult::Yield => yielded = true,
            ProvisionResult::Complete => {}
        }
    }

    if let Some(e) = failed {
        ProvisionResult::Failed(e)
    } else if cancelled {
        ProvisionResult::Cancelled
    } else if yielded {
        ProvisionResult::Yield
    } else {
        ProvisionResult::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provisioners::MockProvisioner;
    use crate::test_utils::{make_context, MockService};
    use tokio_util::sync::CancellationToken;

    fn make_provisioner(result: fn() -> ProvisionResult) -> Box<dyn Provisioner> {
        let mut mock = MockProvisioner::new();
        mock.expect_provision().times(1).returning(move |_| result());
        mock.expect_deprovision().returning(move |_| result());
        Box::new(mock)
    }

    #[test]
    fn test_combine_empty_is_complete() {
        assert!(combine(vec![]).is_complete());
    }

    #[test]
    fn test_combine_precedence() {
        let result = combine(vec![
            ProvisionResult::Yield,
            ProvisionResult::Cancelled,
            ProvisionResult::Failed(anyhow::anyhow!("first")),
            ProvisionResult::Failed(anyhow::anyhow!("second")),
        ]);
        match result {
            ProvisionResult::Failed(e) => assert_eq!(e.to_string(), "first"),
            other => panic!("unexpected result {:?}", other),
        }

        let result = combine(vec![ProvisionResult::Yield, ProvisionResult::Cancelled]);
        assert!(matches!(result, ProvisionResult::Cancelled));

        let result = combine(vec![ProvisionResult::Complete, ProvisionResult::Yield]);
        assert!(matches!(result, ProvisionResult::Yield));
    }

    #[tokio::test]
    async fn test_provision_runs_every_child() {
        let ctx = make_context(MockService::new().into_client(), CancellationToken::new());
        let concurrent = Concurrent::new(vec![
            make_provisioner(|| ProvisionResult::Yield),
            make_provisioner(|| ProvisionResult::Complete),
            make_provisioner(|| ProvisionResult::Complete),
        ]);

        assert!(matches!(
            concurrent.provision(&ctx).await,
            ProvisionResult::Yield
        ));
    }
}
