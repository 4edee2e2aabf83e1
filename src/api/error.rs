// Copyright 2025 The Drasi Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types and the mapping from errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::todo::TodoError;

/// Error codes for API responses
pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const TODO_NOT_FOUND: &str = "TODO_NOT_FOUND";
    pub const TODO_CONFLICT: &str = "TODO_CONFLICT";
    pub const STORE_ERROR: &str = "STORE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// API error response structure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Failure of a single request.
///
/// Every handler returns `Result<_, ApiError>`; the [`IntoResponse`] impl is
/// the one place where failures become status codes and log lines.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("missing todo item id")]
    MissingId,

    #[error(transparent)]
    Todo(#[from] TodoError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingId => StatusCode::NOT_FOUND,
            ApiError::Todo(TodoError::Invalid(_)) => StatusCode::BAD_REQUEST,
            ApiError::Todo(err @ TodoError::Store(_)) => store_status(err.store_status()),
        }
    }

    /// Body sent to the client. Store internals stay in the server log.
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::BadRequest(message) => {
                ErrorResponse::new(error_codes::INVALID_REQUEST, message.clone())
            }
            ApiError::MissingId => {
                ErrorResponse::new(error_codes::TODO_NOT_FOUND, "A todo item id is required")
            }
            ApiError::Todo(TodoError::Invalid(err)) => {
                ErrorResponse::new(error_codes::VALIDATION_FAILED, err.to_string())
            }
            ApiError::Todo(TodoError::Store(_)) => match self.status() {
                StatusCode::NOT_FOUND => {
                    ErrorResponse::new(error_codes::TODO_NOT_FOUND, "Todo item not found")
                }
                StatusCode::CONFLICT => ErrorResponse::new(
                    error_codes::TODO_CONFLICT,
                    "Todo item was modified concurrently",
                ),
                StatusCode::INTERNAL_SERVER_ERROR => {
                    ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
                }
                status => ErrorResponse::new(
                    error_codes::STORE_ERROR,
                    format!("Document store request failed with status {}", status.as_u16()),
                ),
            },
        }
    }
}

/// Forward the status the store reported; 500 when it reported none.
fn store_status(code: Option<u16>) -> StatusCode {
    code.and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("[ERROR]: {self}");
        } else {
            log::warn!("Request failed with {status}: {self}");
        }
        (status, Json(self.to_error_response())).into_response()
    }
}
