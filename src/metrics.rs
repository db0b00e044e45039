//! Prometheus metrics for upstream calls and served searches.
//!
//! Recording is a no-op until `init_metrics` installs the exporter, so the
//! library and its tests can call these freely.

use std::net::SocketAddr;
use tracing::{info, warn};

/// Every metric name the service records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    UpstreamRequests,
    UpstreamErrors,
    UpstreamDuration,
    SearchesTotal,
    EventsReturned,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::UpstreamRequests => "febl_upstream_requests_total",
            MetricName::UpstreamErrors => "febl_upstream_errors_total",
            MetricName::UpstreamDuration => "febl_upstream_duration_seconds",
            MetricName::SearchesTotal => "febl_searches_total",
            MetricName::EventsReturned => "febl_events_returned",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            UpstreamRequests,
            UpstreamErrors,
            UpstreamDuration,
            SearchesTotal,
            EventsReturned,
        ]
        .into_iter()
    }
}

/// Installs the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(port: u16) {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => warn!("Prometheus exporter install failed (possibly already installed): {}", e),
    }
}

// ============================================================================
// Graph API calls
// ============================================================================

pub mod upstream {
    use super::MetricName;

    pub fn request(endpoint: &'static str) {
        ::metrics::counter!(MetricName::UpstreamRequests.as_str(), "endpoint" => endpoint)
            .increment(1);
    }

    pub fn error(endpoint: &'static str) {
        ::metrics::counter!(MetricName::UpstreamErrors.as_str(), "endpoint" => endpoint)
            .increment(1);
    }

    pub fn duration(endpoint: &'static str, secs: f64) {
        ::metrics::histogram!(MetricName::UpstreamDuration.as_str(), "endpoint" => endpoint)
            .record(secs);
    }
}

// ============================================================================
// Searches
// ============================================================================

pub mod search {
    use super::MetricName;

    pub fn completed(kind: &'static str, events: usize) {
        ::metrics::counter!(MetricName::SearchesTotal.as_str(), "kind" => kind, "outcome" => "ok")
            .increment(1);
        ::metrics::histogram!(MetricName::EventsReturned.as_str(), "kind" => kind)
            .record(events as f64);
    }

    pub fn failed(kind: &'static str) {
        ::metrics::counter!(MetricName::SearchesTotal.as_str(), "kind" => kind, "outcome" => "error")
            .increment(1);
    }
}
