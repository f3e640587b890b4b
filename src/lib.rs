//! Subscriber directory: a JSON HTTP service that stores subscriber records in Postgres
//! and derives a leaderboard and a prize draw from them.

pub mod app;
pub mod config;
pub mod database;
mod error;
pub mod model;
pub mod web;

// re-exports
pub use app::{App, AppState};
pub use error::{Error, Result};
pub use web::serve;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Compact human readable output, used by debug builds and tests.
/// Filtered by `RUST_LOG`, defaults to `debug`.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(env_filter("debug"))
        .compact()
        .init();
}

/// One JSON object per line, used by release builds.
/// Filtered by `RUST_LOG`, defaults to `info`.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(env_filter("info"))
        .init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
