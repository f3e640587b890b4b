use std::sync::Arc;

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use strum_macros::AsRefStr;

use super::types::DataParsingError;
use crate::model;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscriber with id {0} was not found")]
    SubscriberNotFound(i32),
    #[error("there are no subscribers to draw from")]
    NoSubscribers,

    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),
    #[error("json rejection: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("path rejection: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("model error: {0}")]
    Model(#[from] model::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::SubscriberNotFound(_) => (StatusCode::NOT_FOUND, SubscriberNotFound),
            Error::NoSubscribers => (StatusCode::NOT_FOUND, NoSubscribers),
            Error::DataParsing(data_er) => {
                (StatusCode::BAD_REQUEST, InvalidInput(data_er.to_string()))
            }
            Error::JsonRejection(rej) => (StatusCode::BAD_REQUEST, InvalidInput(rej.body_text())),
            Error::PathRejection(rej) => (StatusCode::BAD_REQUEST, InvalidInput(rej.body_text())),
            Error::Model(model::Error::DuplicateId(id)) => {
                (StatusCode::CONFLICT, SubscriberExists(*id))
            }
            Error::Model(_) => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the caller gets to see. Serializes to `{"message": "...", "detail": ...}`.
#[derive(Debug, Serialize, AsRefStr)]
#[serde(tag = "message", content = "detail")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientError {
    SubscriberNotFound,
    NoSubscribers,
    InvalidInput(String),
    SubscriberExists(i32),
    ServiceError,
}
