//! Request counters exposed in the Prometheus text format.
//!
//! Every `App` owns its own recorder instead of installing a global one, so several
//! apps can share a process (the integration tests spawn one per test).

use axum::http::Method;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

pub const REQUESTS_TOTAL: &str = "narocniki_requests_total";

/// Builds a recorder and the handle that renders it for `GET /metrics`.
pub fn init_metrics_recorder() -> (PrometheusRecorder, PrometheusHandle) {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        metrics::describe_counter!(
            REQUESTS_TOTAL,
            "Requests served by the subscriber record endpoints"
        );
    });

    (recorder, handle)
}

/// `path` is a route template like `/narocniki/{id}`, never a raw path,
/// so the number of series stays fixed.
pub fn count_request(recorder: &PrometheusRecorder, path: &str, method: &Method) {
    metrics::with_local_recorder(recorder, || {
        metrics::counter!(
            REQUESTS_TOTAL,
            "path" => path.to_string(),
            "method" => method.to_string()
        )
        .increment(1);
    });
}
