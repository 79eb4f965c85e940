// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Translation of provisioner results into status conditions.

use crate::provisioners::ProvisionResult;
use crate::types::{ConditionReason, ConditionStatus};

/// Which provisioner operation produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Provision,
    Deprovision,
}

/// The status, reason and message to write to the Available condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionUpdate {
    pub status: ConditionStatus,
    pub reason: ConditionReason,
    pub message: String,
}

impl ConditionUpdate {
    fn new(status: ConditionStatus, reason: ConditionReason, message: impl Into<String>) -> Self {
        Self {
            status,
            reason,
            message: message.into(),
        }
    }
}

pub fn translate(operation: Operation, result: &ProvisionResult) -> ConditionUpdate {
    use ConditionReason::*;

    match (operation, result) {
        (Operation::Provision, ProvisionResult::Complete) => {
            ConditionUpdate::new(ConditionStatus::True, Provisioned, "Provisioned")
        }
        (Operation::Deprovision, ProvisionResult::Complete) => {
            ConditionUpdate::new(ConditionStatus::True, Deprovisioned, "Deprovisioned")
        }
        (Operation::Provision, ProvisionResult::Yield) => {
            ConditionUpdate::new(ConditionStatus::False, Provisioning, "Provisioning")
        }
        (Operation::Deprovision, ProvisionResult::Yield) => {
            ConditionUpdate::new(ConditionStatus::False, Deprovisioning, "Deprovisioning")
        }
        (_, ProvisionResult::Cancelled) => ConditionUpdate::new(
            ConditionStatus::False,
            Cancelled,
            "Aborted due to controller shutdown",
        ),
        (_, ProvisionResult::Failed(e)) => ConditionUpdate::new(
            ConditionStatus::False,
            Errored,
            format!("Unhandled error: {:#}", e),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(
        operation: Operation,
        result: ProvisionResult,
        status: ConditionStatus,
        reason: ConditionReason,
        message: &str,
    ) {
        assert_eq!(
            translate(operation, &result),
            ConditionUpdate::new(status, reason, message)
        );
    }

    #[test]
    fn test_complete() {
        check(
            Operation::Provision,
            ProvisionResult::Complete,
            ConditionStatus::True,
            ConditionReason::Provisioned,
            "Provisioned",
        );
        check(
            Operation::Deprovision,
            ProvisionResult::Complete,
            ConditionStatus::True,
            ConditionReason::Deprovisioned,
            "Deprovisioned",
        );
    }

    #[test]
    fn test_yield() {
        check(
            Operation::Provision,
            ProvisionResult::Yield,
            ConditionStatus::False,
            ConditionReason::Provisioning,
            "Provisioning",
        );
        check(
            Operation::Deprovision,
            ProvisionResult::Yield,
            ConditionStatus::False,
            ConditionReason::Deprovisioning,
            "Deprovisioning",
        );
    }

    #[test]
    fn test_cancelled_ignores_operation() {
        for operation in [Operation::Provision, Operation::Deprovision] {
            check(
                operation,
                ProvisionResult::Cancelled,
                ConditionStatus::False,
                ConditionReason::Cancelled,
                "Aborted due to controller shutdown",
            );
        }
    }

    #[test]
    fn test_failed_includes_detail() {
        for operation in [Operation::Provision, Operation::Deprovision] {
            check(
                operation,
                ProvisionResult::Failed(anyhow::anyhow!("disk full")),
                ConditionStatus::False,
                ConditionReason::Errored,
                "Unhandled error: disk full",
            );
        }
    }

    #[test]
    fn test_failed_includes_error_chain() {
        let err = anyhow::anyhow!("disk full").context("writing chart values");

        let update = translate(Operation::Provision, &ProvisionResult::Failed(err));

        assert_eq!(update.message, "Unhandled error: writing chart values: disk full");
    }

    #[test]
    fn test_translate_is_deterministic() {
        let result = ProvisionResult::Failed(anyhow::anyhow!("boom"));
        assert_eq!(
            translate(Operation::Deprovision, &result),
            translate(Operation::Deprovision, &result)
        );
    }
}
