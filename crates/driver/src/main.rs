//! Driver entry point.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use driver::DriverConfig;
use driver::sample::{sample_consumer, sample_line_items};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    let config = match DriverConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    tracing::info!(?config, "starting fulfillment run");

    let outcome = driver::run(&config, &sample_line_items(), &sample_consumer()).await;
    tracing::info!(metrics = %metrics_handle.render(), "run metrics");

    match outcome {
        Ok(report) => {
            for pick_job in &report.closed_pick_jobs {
                tracing::info!(
                    pick_job_id = %pick_job.id,
                    short_id = %pick_job.short_id,
                    version = %pick_job.version,
                    "pick job closed"
                );
            }
            tracing::info!(order_id = %report.order.id, "order fulfilled");
        }
        Err(e) => {
            tracing::error!(error = %e, "fulfillment run failed");
            std::process::exit(1);
        }
    }
}
