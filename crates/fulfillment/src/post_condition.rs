//! Post-condition checks for pick job mutations.
//!
//! A PATCH that returns 2xx has not necessarily landed: a concurrent writer
//! may have raced us. After every mutation the returned pick job is compared
//! against what the mutation was supposed to produce.

use common::{PickJobId, Version};
use contracts::{PickJob, PickStatus};

use crate::error::{FulfillmentError, Result};

/// Why a mutated pick job does not match the expected outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    VersionMismatch {
        expected: Version,
        actual: Version,
    },
    StatusMismatch {
        expected: PickStatus,
        actual: PickStatus,
    },
    LineItemNotPerfectlyPicked {
        line_item_id: String,
        status: PickStatus,
        picked: u32,
        quantity: u32,
    },
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictReason::VersionMismatch { expected, actual } => {
                write!(f, "expected version {expected}, got {actual}")
            }
            ConflictReason::StatusMismatch { expected, actual } => {
                write!(f, "expected status {expected}, got {actual}")
            }
            ConflictReason::LineItemNotPerfectlyPicked {
                line_item_id,
                status,
                picked,
                quantity,
            } => write!(
                f,
                "line item {line_item_id} is {status} with {picked}/{quantity} picked"
            ),
        }
    }
}

/// Expected shape of a pick job after one versioned mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostCondition {
    expected_version: Version,
    desired_status: PickStatus,
}

impl PostCondition {
    /// The mutation was sent with `previous_version` and should move the job
    /// to `desired_status`.
    pub fn new(previous_version: Version, desired_status: PickStatus) -> Self {
        Self {
            expected_version: previous_version.next(),
            desired_status,
        }
    }

    pub fn expected_version(&self) -> Version {
        self.expected_version
    }

    /// Lists every way `pick_job` deviates from the expected outcome.
    ///
    /// Closing additionally requires every line item to be closed with its
    /// full quantity picked.
    pub fn violations(&self, pick_job: &PickJob) -> Vec<ConflictReason> {
        let mut reasons = Vec::new();

        if pick_job.version != self.expected_version {
            reasons.push(ConflictReason::VersionMismatch {
                expected: self.expected_version,
                actual: pick_job.version,
            });
        }

        if pick_job.status != self.desired_status {
            reasons.push(ConflictReason::StatusMismatch {
                expected: self.desired_status,
                actual: pick_job.status,
            });
        }

        if self.desired_status == PickStatus::Closed {
            reasons.extend(
                pick_job
                    .pick_line_items
                    .iter()
                    .filter(|item| !item.is_perfectly_picked())
                    .map(|item| ConflictReason::LineItemNotPerfectlyPicked {
                        line_item_id: item.id.clone(),
                        status: item.status,
                        picked: item.picked,
                        quantity: item.quantity,
                    }),
            );
        }

        reasons
    }

    /// Fails with [`FulfillmentError::Conflict`] if `pick_job` deviates.
    pub fn verify(&self, pick_job_id: &PickJobId, pick_job: &PickJob) -> Result<()> {
        let reasons = self.violations(pick_job);
        if reasons.is_empty() {
            return Ok(());
        }

        metrics::counter!("pick_job_conflicts_total").increment(1);
        tracing::warn!(
            pick_job_id = %pick_job_id,
            expected_version = %self.expected_version,
            actual_version = %pick_job.version,
            desired_status = %self.desired_status,
            actual_status = %pick_job.status,
            "Pick job mutation did not land as expected"
        );

        Err(FulfillmentError::Conflict {
            pick_job_id: pick_job_id.clone(),
            reasons,
        })
    }
}
