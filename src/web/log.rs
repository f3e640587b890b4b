use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde_json::json;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, warn};

use super::error::ClientError;
use crate::{config::LogConfig, web::Error};

/// Ships one JSON `LogLine` per request to a UDP log collector.
/// Without a configured sink the lines only show up in the debug log.
#[derive(Debug)]
pub struct LogSink {
    target: Option<SinkTarget>,
}

#[derive(Debug)]
struct SinkTarget {
    socket: UdpSocket,
    addr: SocketAddr,
}

impl LogSink {
    /// Resolves the sink address once. A host that does not resolve is a startup error.
    pub async fn init(log_config: &LogConfig) -> std::io::Result<Self> {
        let Some((host, port)) = log_config.sink_addr() else {
            return Ok(Self::disabled());
        };

        // Prefer IPv4, a dual-stack name like `localhost` usually lists `::1` first.
        let addrs: Vec<SocketAddr> = lookup_host((host, port)).await?.collect();
        let addr = addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("log sink address did not resolve: {host}:{port}"),
                )
            })?;

        let bind_addr: SocketAddr = match addr {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(bind_addr).await?;
        debug!("{:<20} - {host}:{port} -> {addr}", "LOG SINK");

        Ok(LogSink {
            target: Some(SinkTarget { socket, addr }),
        })
    }

    pub fn disabled() -> Self {
        LogSink { target: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Never fails, delivery errors are only logged.
    async fn send(&self, logline: &LogLine) {
        let payload = json!(logline).to_string();

        let Some(target) = &self.target else {
            debug!("LOGLINE: {payload}");
            return;
        };

        if let Err(er) = target.socket.send_to(payload.as_bytes(), target.addr).await {
            warn!("{:<20} - failed to ship log line: {er}", "LOG SINK");
        }
    }
}

pub async fn log_request(
    sink: &LogSink,
    req_id: &str,
    req_method: &Method,
    uri: &Uri,
    status_code: StatusCode,
    web_error: Option<&Error>,
    client_status_and_error: Option<&(StatusCode, ClientError)>,
) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let client_error_type = client_status_and_error.map(|(_, ce)| ce.as_ref().to_string());
    let status_code = client_status_and_error
        .map(|(sc, _)| sc.as_u16())
        .unwrap_or(status_code.as_u16());
    let web_error_type = web_error.map(|we| we.as_ref().to_string());
    let web_error_msg = web_error.map(|we| we.to_string());

    let logline = LogLine {
        timestamp,
        req_id: req_id.to_string(),
        req_method: req_method.to_string(),
        uri: uri.to_string(),
        status_code,
        client_error_type,
        web_error_type,
        web_error_msg,
    };

    sink.send(&logline).await;
}

#[derive(Debug, Serialize)]
pub struct LogLine {
    timestamp: String,
    req_id: String,

    req_method: String,
    uri: String,
    status_code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    client_error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_error_msg: Option<String>,
}
