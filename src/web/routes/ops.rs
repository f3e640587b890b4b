use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// How long the liveness probe waits on the store before calling it sick.
pub const HEALTHCHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Never fails: a store that errors or does not answer in time yields `503 {"healthy": false}`.
#[tracing::instrument(name = "healthcheck", skip_all)]
pub async fn healthcheck(State(app_state): State<AppState>) -> impl IntoResponse {
    let healthy = match tokio::time::timeout(HEALTHCHECK_TIMEOUT, app_state.store.ping()).await {
        Ok(Ok(())) => true,
        Ok(Err(er)) => {
            warn!("{:<20} - store ping failed: {er}", "HEALTHCHECK");
            false
        }
        Err(_) => {
            warn!("{:<20} - store ping timed out", "HEALTHCHECK");
            false
        }
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(json!({ "healthy": healthy })))
}

#[derive(Debug, Serialize)]
pub struct EnvironmentInfo {
    maintainer: String,
    repository: String,
    version: &'static str,
    environment: String,
}

pub async fn environment(State(app_state): State<AppState>) -> Json<EnvironmentInfo> {
    Json(EnvironmentInfo {
        maintainer: app_state.info.maintainer.clone(),
        repository: app_state.info.repository.clone(),
        version: env!("CARGO_PKG_VERSION"),
        environment: app_state.environment.as_ref().to_string(),
    })
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(app_state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        app_state.metrics_handle.render(),
    )
}
