mod error;
pub mod log;
pub mod metrics;
pub mod midware;
pub mod routes;
pub mod serve;
pub mod types;

pub use error::{ClientError, Error, WebResult};
pub use log::LogSink;
pub use serve::serve;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
