//! Typed errors and HTTP mapping.

use crate::search::SearchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Precondition on the request failed. `key` becomes the `error.{key}` alert.
    #[error("{message}")]
    BadRequest {
        entity: &'static str,
        key: &'static str,
        message: String,
    },
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    pub fn bad_request(entity: &'static str, key: &'static str, message: impl Into<String>) -> Self {
        AppError::BadRequest {
            entity,
            key,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Attached to error responses; the alert middleware turns it into `X-{app}-error` headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorAlert {
    pub key: &'static str,
    pub entity: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, entity, key) = match &self {
            AppError::BadRequest { entity, key, .. } => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(*entity), Some(*key))
            }
            AppError::InvalidFilter(_) => (StatusCode::BAD_REQUEST, "bad_filter", None, Some("badfilter")),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error", None, Some("validation")),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None, None),
            AppError::UnsupportedMediaType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type", None, None)
            }
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict", None, None),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found", None, None)
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None, None)
                }
            }
            AppError::Search(_) => (StatusCode::INTERNAL_SERVER_ERROR, "search_error", None, None),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None, None),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                entity_name: entity,
                error_key: key,
                details: None,
            },
        };
        let mut response = (status, Json(body)).into_response();
        if let Some(key) = key {
            response.extensions_mut().insert(ErrorAlert { key, entity });
        }
        response
    }
}
