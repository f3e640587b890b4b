use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use crate::helpers::{nikolina, TestApp};

#[tokio::test]
async fn environment_reports_service_metadata() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/environment").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;

    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["maintainer"], app.app_state.info.maintainer.as_str());
    assert_eq!(body["repository"], app.app_state.info.repository.as_str());
    assert_eq!(body["environment"], app.app_state.environment.as_ref());

    Ok(())
}

/// Value of the `narocniki_requests_total` series with these labels.
fn request_count(body: &str, path: &str, method: &str) -> Option<u64> {
    let path_label = format!("path=\"{path}\"");
    let method_label = format!("method=\"{method}\"");

    body.lines()
        .filter(|line| line.starts_with("narocniki_requests_total{"))
        .find(|line| line.contains(&path_label) && line.contains(&method_label))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}

#[tokio::test]
async fn metrics_count_record_endpoint_calls_by_route() -> Result<()> {
    let app = TestApp::spawn().await?;

    app.post_subscriber(&nikolina()).await?;
    app.get_subscriber(3).await?;
    app.get_subscriber(4).await?;
    app.get("/narocniki").await?;
    // Not a record endpoint, never counted.
    app.get("/lestvica").await?;

    let res = app.get("/metrics").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()["content-type"].to_str()?.to_string();
    assert!(content_type.starts_with("text/plain"));
    let body = res.text().await?;

    assert_eq!(request_count(&body, "/narocniki", "POST"), Some(1));
    assert_eq!(request_count(&body, "/narocniki", "GET"), Some(1));
    assert_eq!(request_count(&body, "/narocniki/{id}", "GET"), Some(2));
    assert!(!body.contains("/lestvica"));

    Ok(())
}

#[tokio::test]
async fn every_response_carries_a_request_id() -> Result<()> {
    let app = TestApp::spawn().await?;

    for path in ["/healthcheck", "/narocniki", "/narocniki/1", "/loto"] {
        let res = app.get(path).await?;
        assert!(
            res.headers().contains_key("x-request-id"),
            "{path} has no x-request-id"
        );
    }

    Ok(())
}
