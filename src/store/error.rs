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

//! Errors reported by a document store.

use serde::Deserialize;

/// Error returned by [`DocumentStore`](super::DocumentStore) operations.
///
/// Variants that originate from an HTTP response from the store carry the
/// status code the store reported; see [`StoreError::status_code`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {reason}")]
    NotFound { reason: String },

    #[error("document update conflict: {reason}")]
    Conflict { reason: String },

    #[error("store returned {status} ({error}): {reason}")]
    Status {
        status: u16,
        error: String,
        reason: String,
    },

    #[error("document store unavailable at {url}: {source}")]
    Unavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid document store url '{0}'")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode store payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// HTTP-style status code reported by the store, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StoreError::NotFound { .. } => Some(404),
            StoreError::Conflict { .. } => Some(409),
            StoreError::Status { status, .. } => Some(*status),
            StoreError::Unavailable { .. }
            | StoreError::InvalidUrl(_)
            | StoreError::Transport(_)
            | StoreError::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        StoreError::NotFound {
            reason: reason.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        StoreError::Conflict {
            reason: reason.into(),
        }
    }

    /// Build an error from a non-success status and the `{"error","reason"}`
    /// body the store sends with it.
    pub fn from_status(status: u16, body: ErrorBody) -> Self {
        match status {
            404 => StoreError::NotFound {
                reason: body.reason,
            },
            409 => StoreError::Conflict {
                reason: body.reason,
            },
            _ => StoreError::Status {
                status,
                error: body.error,
                reason: body.reason,
            },
        }
    }
}

/// Error body sent by CouchDB alongside a non-success status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub reason: String,
}
