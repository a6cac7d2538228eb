//! Fulfillment workflow engine.

use std::time::Instant;

use common::{AuthToken, OrderId, PickJobId, Version};
use contracts::{
    Consumer, Contract, Order, OrderForCreation, OrderLineItem, PickJob, PickStatus,
    PickingPatchActions, StrippedPickJobs, ValidationError, parse_non_empty,
};
use serde_json::Value;

use crate::error::{FulfillmentError, Result};
use crate::post_condition::PostCondition;
use crate::retry::{RetryPolicy, retry};
use crate::transport::{ApiRequest, Transport};

/// Drives orders and pick jobs through the fulfillment API.
///
/// Every request body passes its contract before it is sent and every
/// response body after it is received. Mutations are additionally checked
/// against their expected outcome; see [`PostCondition`].
pub struct FulfillmentService<T: Transport> {
    transport: T,
}

impl<T: Transport> FulfillmentService<T> {
    /// Creates a new fulfillment service.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Creates an order for `consumer` with `line_items`.
    ///
    /// Both inputs are validated before anything is sent: an absent consumer,
    /// absent or empty line items, or a line item with a quantity below 1 fail
    /// with a contract violation.
    #[tracing::instrument(skip_all)]
    pub async fn create_order(
        &self,
        line_items: Option<&[OrderLineItem]>,
        consumer: Option<&Consumer>,
        token: &AuthToken,
    ) -> Result<Order> {
        let consumer = Consumer::parse(&serde_json::to_value(consumer)?)?;
        let line_items = parse_non_empty::<OrderLineItem>(&serde_json::to_value(line_items)?)?;
        let body = OrderForCreation::new(consumer, line_items).validated()?;

        let request = ApiRequest::post("/orders", token, serde_json::to_value(&body)?);
        let response = self.call("create_order", request).await?;
        let order = Order::parse(&response)?;

        tracing::info!(
            order_id = %order.id,
            tenant_order_id = %body.tenant_order_id,
            version = %order.version,
            "Order created"
        );
        Ok(order)
    }

    /// Lists the pick jobs the server has materialized for an order.
    #[tracing::instrument(skip_all, fields(order_ref = %order_ref))]
    pub async fn get_all_pick_jobs_for_order(
        &self,
        order_ref: &OrderId,
        token: &AuthToken,
    ) -> Result<StrippedPickJobs> {
        if order_ref.as_str().is_empty() {
            return Err(ValidationError::single("PickJobQuery", "orderRef", "must not be empty").into());
        }

        let request =
            ApiRequest::get("/pickjobs", token).with_query("orderRef", order_ref.as_str());
        let response = self.call("get_all_pick_jobs_for_order", request).await?;
        let listing = StrippedPickJobs::parse(&response)?;

        tracing::debug!(total = listing.total, returned = listing.pickjobs.len(), "Pick jobs listed");
        Ok(listing)
    }

    /// Polls until at least one pick job exists for the order.
    ///
    /// Pick jobs appear asynchronously after order creation. An empty listing
    /// counts as [`FulfillmentError::NoPickJobs`] and is retried like any other
    /// failure; exhaustion returns the last attempt's error.
    #[tracing::instrument(skip_all, fields(order_ref = %order_ref, max_attempts = policy.max_attempts()))]
    pub async fn poll_pick_jobs_for_order(
        &self,
        order_ref: &OrderId,
        token: &AuthToken,
        policy: &RetryPolicy,
    ) -> Result<StrippedPickJobs> {
        let this = self;
        retry(policy, move || async move {
            let listing = this.get_all_pick_jobs_for_order(order_ref, token).await?;
            if listing.is_empty() {
                return Err(FulfillmentError::NoPickJobs {
                    order_ref: order_ref.clone(),
                });
            }
            Ok(listing)
        })
        .await
    }

    /// Moves a pick job to `IN_PROGRESS`.
    ///
    /// `current_version` is the version last read; the returned pick job must
    /// carry the next version and the new status.
    #[tracing::instrument(skip_all, fields(pick_job_id = %pick_job_id, version = %current_version))]
    pub async fn set_pick_job_in_progress(
        &self,
        pick_job_id: &PickJobId,
        current_version: Version,
        token: &AuthToken,
    ) -> Result<PickJob> {
        let patch = PickingPatchActions::set_status(current_version, PickStatus::InProgress);
        let pick_job = self.patch_pick_job(pick_job_id, &patch, token).await?;

        PostCondition::new(current_version, PickStatus::InProgress).verify(pick_job_id, &pick_job)?;

        tracing::info!(version = %pick_job.version, "Pick job in progress");
        Ok(pick_job)
    }

    /// Marks every line item of `pick_job` as fully picked and closes the job
    /// in a single versioned patch.
    #[tracing::instrument(skip_all, fields(pick_job_id = %pick_job.id, version = %pick_job.version))]
    pub async fn pick_perfect_and_close_pick_job(
        &self,
        pick_job: &PickJob,
        token: &AuthToken,
    ) -> Result<PickJob> {
        let patch = PickingPatchActions::perfect_pick_and_close(pick_job);
        let closed = self.patch_pick_job(&pick_job.id, &patch, token).await?;

        PostCondition::new(pick_job.version, PickStatus::Closed).verify(&pick_job.id, &closed)?;

        tracing::info!(
            version = %closed.version,
            line_items = closed.pick_line_items.len(),
            "Pick job perfectly picked and closed"
        );
        Ok(closed)
    }

    async fn patch_pick_job(
        &self,
        pick_job_id: &PickJobId,
        patch: &PickingPatchActions,
        token: &AuthToken,
    ) -> Result<PickJob> {
        let body = patch.validated()?;
        let request = ApiRequest::patch(
            format!("/pickjobs/{pick_job_id}"),
            token,
            serde_json::to_value(&body)?,
        );
        let response = self.call("patch_pick_job", request).await?;
        Ok(PickJob::parse(&response)?)
    }

    async fn call(&self, operation: &'static str, request: ApiRequest) -> Result<Value> {
        let method = request.method;
        let path = request.path.clone();
        tracing::debug!(%method, %path, "Sending request");

        let start = Instant::now();
        let result = self.transport.send(request).await;
        let duration = start.elapsed().as_secs_f64();

        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!("fulfillment_requests_total", "operation" => operation, "outcome" => outcome)
            .increment(1);
        metrics::histogram!("fulfillment_request_duration_seconds", "operation" => operation)
            .record(duration);

        if let Err(e) = &result {
            tracing::warn!(%method, %path, error = %e, "Request failed");
        }
        result
    }
}
