use std::sync::Arc;

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, Method, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, to_value};

use crate::{
    web::{log, metrics, Error, REQUEST_ID_HEADER},
    AppState,
};

/// Turns a `web::Error` stored in the response extensions into the JSON error body
/// and ships a log line for every request.
pub async fn response_mapper(
    State(app_state): State<AppState>,
    req_method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    resp: Response,
) -> Response {
    let req_id_header = req_headers.get(REQUEST_ID_HEADER).cloned();
    let req_id = req_id_header
        .as_ref()
        .and_then(|hv| hv.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let web_error = resp.extensions().get::<Arc<Error>>().map(|er| {
        tracing::debug!("{:<12} - SERVER ERROR: {er} ID: {req_id}", "RES_MAPPER");
        er.as_ref()
    });
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let client_error = to_value(cl_err).ok();
        let message = client_error.as_ref().and_then(|v| v.get("message"));
        let detail = client_error.as_ref().and_then(|v| v.get("detail"));

        let client_error_body = json!({
            "error": {
                "message": message,
                "data": {
                    "req_id": req_id,
                    "detail": detail,
                }
            }
        });

        let mut err_resp = (*status, Json(client_error_body)).into_response();
        // A fresh response, the request id has to be carried over by hand.
        if let Some(hv) = &req_id_header {
            err_resp.headers_mut().insert(REQUEST_ID_HEADER, hv.clone());
        }
        err_resp
    });

    log::log_request(
        &app_state.log_sink,
        &req_id,
        &req_method,
        &uri,
        resp.status(),
        web_error,
        client_status_and_error.as_ref(),
    )
    .await;

    err_resp.unwrap_or(resp)
}

/// Counts requests per matched route template. Only installed with `route_layer`,
/// so unmatched paths never reach it.
pub async fn count_requests(
    State(app_state): State<AppState>,
    matched_path: MatchedPath,
    req: Request,
    next: Next,
) -> Response {
    metrics::count_request(
        &app_state.metrics_recorder,
        matched_path.as_str(),
        req.method(),
    );

    next.run(req).await
}
