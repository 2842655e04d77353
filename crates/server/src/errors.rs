use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::books::Violation;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

use common::types::MessageBody;

pub const NOT_FOUND_MESSAGE: &str = "Book not found";
pub const STORE_FAILURE_MESSAGE: &str = "Failed to persist books";
pub const MALFORMED_BODY_MESSAGE: &str = "Malformed JSON body";

/// One entry of the `errors` array in a 400 response.
#[derive(Debug, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'static str>,
    pub location: &'static str,
}

impl From<Violation> for FieldError {
    fn from(v: Violation) -> Self {
        Self {
            kind: "field",
            value: v.value,
            msg: v.message.to_string(),
            path: Some(v.field.as_str()),
            location: "body",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorsBody {
    pub errors: Vec<FieldError>,
}

/// Errors returned by the book handlers, rendered as JSON.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<Violation>),
    #[error("malformed body: {0}")]
    MalformedBody(String),
    #[error("book not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for the `outcome` metric dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) => "invalid",
            ApiError::NotFound => "not_found",
            ApiError::Storage(_) => "error",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(v) => ApiError::Validation(v),
            ServiceError::NotFound(_) => ApiError::NotFound,
            ServiceError::Store(err) => ApiError::Storage(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::MalformedBody(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(violations) => {
                let errors = violations.into_iter().map(FieldError::from).collect();
                (status, Json(ErrorsBody { errors })).into_response()
            }
            ApiError::MalformedBody(detail) => {
                let errors = vec![FieldError {
                    kind: "body",
                    value: Some(detail),
                    msg: MALFORMED_BODY_MESSAGE.to_string(),
                    path: None,
                    location: "body",
                }];
                (status, Json(ErrorsBody { errors })).into_response()
            }
            ApiError::NotFound => (status, Json(MessageBody::new(NOT_FOUND_MESSAGE))).into_response(),
            ApiError::Storage(msg) => {
                error!(error = %msg, "book persistence failed");
                (status, Json(MessageBody::new(STORE_FAILURE_MESSAGE))).into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
