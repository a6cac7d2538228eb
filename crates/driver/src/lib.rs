//! Places a sample order against a live fulfillment API and perfectly picks
//! every pick job it produces.

pub mod config;
pub mod sample;

use contracts::{Consumer, OrderLineItem};
use fulfillment::{
    FulfillmentError, FulfillmentService, FulfillmentWorkflow, HttpIdentityClient, HttpTransport,
    WorkflowReport,
};
use thiserror::Error;

pub use config::{ConfigError, DriverConfig};

/// Errors that end a driver run.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fulfillment error: {0}")]
    Fulfillment(#[from] FulfillmentError),
}

/// Builds the HTTP collaborators from `config` and runs one order through the workflow.
#[tracing::instrument(skip_all, fields(api = %config.fulfillment_api_url))]
pub async fn run(
    config: &DriverConfig,
    line_items: &[OrderLineItem],
    consumer: &Consumer,
) -> Result<WorkflowReport, DriverError> {
    let transport = HttpTransport::with_timeout(&config.fulfillment_api_url, config.http_timeout)?;
    let identity = HttpIdentityClient::new(
        &config.identity_url,
        &config.client_id,
        &config.client_secret,
    );
    let workflow = FulfillmentWorkflow::new(
        FulfillmentService::new(transport),
        identity,
        config.poll_policy,
    );

    Ok(workflow.run(line_items, consumer).await?)
}
