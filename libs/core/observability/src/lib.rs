//! Observability for the product service.
//!
//! - Structured log shipping to a search index ([`SearchIndexLayer`], [`LogShipper`])
//! - Prometheus metrics recorder, `/metrics` handler, and request metrics middleware
//!
//! ```rust,ignore
//! use observability::{SearchLogConfig, start_search_logging};
//!
//! let layer = start_search_logging(&SearchLogConfig::from_env()?).await?;
//! core_config::tracing::init_tracing_with(&environment, Some(Box::new(layer.filtered())));
//! observability::install_panic_logging();
//! ```

pub mod client;
pub mod config;
pub mod entry;
pub mod error;
pub mod layer;
pub mod middleware;
pub mod severity;
pub mod shipper;

pub use client::{ElasticsearchClient, IndexClient};
pub use config::SearchLogConfig;
pub use entry::LogEntry;
pub use error::{SinkError, SinkResult};
pub use layer::{SearchIndexLayer, install_panic_logging};
pub use middleware::metrics_middleware;
pub use severity::Severity;
pub use shipper::{LogShipper, SearchIndex};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Provisions the log index on `config.url` and returns a layer feeding it.
///
/// Fails with [`SinkError::IndexInit`] when the index is missing and cannot be created.
pub async fn start_search_logging(config: &SearchLogConfig) -> SinkResult<SearchIndexLayer> {
    let client = ElasticsearchClient::new(&config.url, config.request_timeout)?;
    let (shipper, _worker) =
        LogShipper::start(Arc::new(client), config.index.clone(), config.queue_capacity).await?;

    Ok(SearchIndexLayer::new(
        shipper,
        config.host.clone(),
        config.min_severity,
    ))
}

/// Installs the Prometheus recorder once; later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        register_metric_descriptions();
        info!("Prometheus metrics recorder initialized");
        Ok(handle)
    })
}

/// Axum handler for `/metrics`
pub async fn metrics_handler() -> String {
    match METRICS_HANDLE.get() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    describe_counter!(
        "search_log_entries_shipped_total",
        "Log entries written to the search index"
    );
    describe_counter!(
        "search_log_entries_dropped_total",
        "Log entries dropped by reason (queue_full, closed, write_failed)"
    );
}
