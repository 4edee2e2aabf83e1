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

//! Document store client.
//!
//! The todo service talks to its database through the [`DocumentStore`]
//! trait. Two implementations are provided:
//!
//! - [`CouchDbClient`] - CouchDB over its HTTP API
//! - [`MemoryStore`] - an in-process store with the same contract, used by tests
//!
//! Documents are plain JSON values. Every document carries a revision token
//! that must be presented to update or delete it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod couchdb;
pub mod error;
pub mod memory;

pub use couchdb::CouchDbClient;
pub use error::StoreError;
pub use memory::MemoryStore;

/// Prefix shared by all design document ids.
pub const DESIGN_PREFIX: &str = "_design/";

/// A document read from the store together with its current revision.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub rev: String,
    pub body: Value,
}

/// Parameters for a view query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    /// `Some(false)` requests raw rows from a view that defines a reducer.
    pub reduce: Option<bool>,
    pub descending: bool,
}

impl ViewParams {
    pub fn without_reduce() -> Self {
        Self {
            reduce: Some(false),
            ..Default::default()
        }
    }

    pub fn reduced() -> Self {
        Self {
            reduce: Some(true),
            ..Default::default()
        }
    }

    /// Query string pairs in the form CouchDB expects.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(reduce) = self.reduce {
            pairs.push(("reduce", reduce.to_string()));
        }
        if self.descending {
            pairs.push(("descending", "true".to_string()));
        }
        pairs
    }
}

/// One row emitted by a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    /// Id of the emitting document; absent on reduced rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Value,
    #[serde(default)]
    pub value: Value,
}

/// Response to a view query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default)]
    pub rows: Vec<ViewRow>,
}

/// Generic CRUD contract of a document database.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Names of all databases on the server.
    async fn list_databases(&self) -> Result<Vec<String>, StoreError>;

    async fn create_database(&self, name: &str) -> Result<(), StoreError>;

    async fn delete_database(&self, name: &str) -> Result<(), StoreError>;

    /// Read a document and its current revision.
    async fn read(&self, db: &str, id: &str) -> Result<StoredDocument, StoreError>;

    /// Create or update the document `id`. `rev` must be the current
    /// revision when updating and `None` when creating. Returns the new
    /// revision.
    async fn save(
        &self,
        db: &str,
        id: &str,
        body: &Value,
        rev: Option<&str>,
    ) -> Result<String, StoreError>;

    /// Delete revision `rev` of document `id`. Returns the tombstone revision.
    async fn delete(&self, db: &str, id: &str, rev: &str) -> Result<String, StoreError>;

    /// Query view `view` of design document `_design/{design}`.
    async fn query_view(
        &self,
        db: &str,
        design: &str,
        view: &str,
        params: &ViewParams,
    ) -> Result<ViewResponse, StoreError>;
}
