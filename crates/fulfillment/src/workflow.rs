//! End-to-end order fulfillment flow.

use common::AuthToken;
use contracts::{Consumer, Order, OrderLineItem, PickJob, StrippedPickJob};
use futures_util::future::try_join_all;

use crate::error::Result;
use crate::identity::TokenProvider;
use crate::retry::RetryPolicy;
use crate::service::FulfillmentService;
use crate::transport::Transport;

/// Outcome of a completed fulfillment run.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    pub order: Order,

    /// Closed pick jobs, in the order the listing returned them.
    pub closed_pick_jobs: Vec<PickJob>,
}

/// Places an order and perfectly picks every pick job it produces.
///
/// Token acquisition, order creation and pick job discovery run one after
/// another. Pick jobs are then processed concurrently, each moved to
/// `IN_PROGRESS` and then closed. The first failing pick job fails the run.
pub struct FulfillmentWorkflow<T: Transport, P: TokenProvider> {
    service: FulfillmentService<T>,
    tokens: P,
    poll_policy: RetryPolicy,
}

impl<T: Transport, P: TokenProvider> FulfillmentWorkflow<T, P> {
    pub fn new(service: FulfillmentService<T>, tokens: P, poll_policy: RetryPolicy) -> Self {
        Self {
            service,
            tokens,
            poll_policy,
        }
    }

    pub fn service(&self) -> &FulfillmentService<T> {
        &self.service
    }

    #[tracing::instrument(skip_all, fields(line_items = line_items.len()))]
    pub async fn run(&self, line_items: &[OrderLineItem], consumer: &Consumer) -> Result<WorkflowReport> {
        let token = self.tokens.token().await?;

        let order = self
            .service
            .create_order(Some(line_items), Some(consumer), &token)
            .await?;

        let listing = self
            .service
            .poll_pick_jobs_for_order(&order.id, &token, &self.poll_policy)
            .await?;
        tracing::info!(order_id = %order.id, pick_jobs = listing.pickjobs.len(), "Pick jobs found");

        let closed_pick_jobs = try_join_all(
            listing
                .pickjobs
                .iter()
                .map(|summary| self.fulfill_pick_job(summary, &token)),
        )
        .await?;

        tracing::info!(order_id = %order.id, closed = closed_pick_jobs.len(), "Order fulfilled");
        Ok(WorkflowReport {
            order,
            closed_pick_jobs,
        })
    }

    async fn fulfill_pick_job(&self, summary: &StrippedPickJob, token: &AuthToken) -> Result<PickJob> {
        let in_progress = self
            .service
            .set_pick_job_in_progress(&summary.id, summary.version, token)
            .await?;
        self.service
            .pick_perfect_and_close_pick_job(&in_progress, token)
            .await
    }
}
