//! Fulfillment error types.

use common::{OrderId, PickJobId};
use contracts::ValidationError;
use thiserror::Error;

use crate::post_condition::ConflictReason;
use crate::transport::Method;

/// Errors that can occur while driving the fulfillment workflow.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// A request or response payload failed its contract.
    #[error("Contract violation: {0}")]
    Contract(#[from] ValidationError),

    /// A mutation succeeded over HTTP but did not land where it should have.
    /// The caller may re-fetch the pick job and retry.
    #[error("Conflict on pick job {pick_job_id}: {}", render(.reasons))]
    Conflict {
        pick_job_id: PickJobId,
        reasons: Vec<ConflictReason>,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} on {method} {path}: {body}")]
    Status {
        status: u16,
        method: Method,
        path: String,
        body: String,
    },

    /// The request never got a response.
    #[error("Transport error on {method} {path}: {reason}")]
    Transport {
        method: Method,
        path: String,
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    /// The response body was not JSON.
    #[error("Undecodable response from {method} {path}: {reason}")]
    Decode {
        method: Method,
        path: String,
        reason: String,
    },

    /// The server has not materialized any pick job for the order yet.
    #[error("No pick jobs found for order {order_ref}")]
    NoPickJobs { order_ref: OrderId },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FulfillmentError {
    /// Returns true for post-condition conflicts.
    pub fn is_conflict(&self) -> bool {
        matches!(self, FulfillmentError::Conflict { .. })
    }

    /// Returns true for contract violations.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, FulfillmentError::Contract(_))
    }

    /// Returns the HTTP status for server-side rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            FulfillmentError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn render(reasons: &[ConflictReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience type alias for fulfillment results.
pub type Result<T> = std::result::Result<T, FulfillmentError>;
