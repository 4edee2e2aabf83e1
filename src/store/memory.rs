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

//! In-process [`DocumentStore`] for tests and `store.kind: memory`.
//!
//! Follows the CouchDB contract closely enough to exercise the service:
//! revisions are checked on update and delete, missing databases and
//! documents report 404, and views are answered from registered Rust map
//! functions standing in for the JavaScript in design documents.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::error::StoreError;
use super::{DocumentStore, StoredDocument, ViewParams, ViewResponse, ViewRow, DESIGN_PREFIX};

/// Map function of a view: returns the `(key, value)` a document emits.
pub type MapFn = Arc<dyn Fn(&Value) -> Option<(Value, Value)> + Send + Sync>;

#[derive(Default)]
struct Database {
    docs: BTreeMap<String, (String, Value)>,
}

/// Thread-safe in-memory document store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    databases: Arc<RwLock<HashMap<String, Database>>>,
    map_functions: Arc<HashMap<(String, String), MapFn>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the map function answering view `design/view`.
    ///
    /// The view still has to be defined by a saved design document before
    /// it can be queried.
    pub fn with_view<F>(mut self, design: &str, view: &str, map: F) -> Self
    where
        F: Fn(&Value) -> Option<(Value, Value)> + Send + Sync + 'static,
    {
        let mut functions = (*self.map_functions).clone();
        functions.insert((design.to_string(), view.to_string()), Arc::new(map));
        self.map_functions = Arc::new(functions);
        self
    }

    /// Number of documents in `db`, design documents included.
    pub async fn document_count(&self, db: &str) -> Option<usize> {
        let databases = self.databases.read().await;
        databases.get(db).map(|database| database.docs.len())
    }

    fn next_rev(current: Option<&str>) -> String {
        let generation = current
            .and_then(|rev| rev.split('-').next())
            .and_then(|n| n.parse::<u64>().ok())
            .unwrap_or(0);
        format!("{}-{}", generation + 1, Uuid::new_v4().simple())
    }

    fn missing_database() -> StoreError {
        StoreError::not_found("Database does not exist.")
    }
}

/// Order view keys the way CouchDB collates JSON: null, booleans, numbers,
/// strings, arrays, objects.
fn collate(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(a, b)| collate(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_databases(&self) -> Result<Vec<String>, StoreError> {
        let databases = self.databases.read().await;
        let mut names: Vec<String> = databases.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn create_database(&self, name: &str) -> Result<(), StoreError> {
        let mut databases = self.databases.write().await;
        if databases.contains_key(name) {
            return Err(StoreError::Status {
                status: 412,
                error: "file_exists".to_string(),
                reason: "The database could not be created, the file already exists.".to_string(),
            });
        }
        databases.insert(name.to_string(), Database::default());
        Ok(())
    }

    async fn delete_database(&self, name: &str) -> Result<(), StoreError> {
        let mut databases = self.databases.write().await;
        databases
            .remove(name)
            .map(|_| ())
            .ok_or_else(Self::missing_database)
    }

    async fn read(&self, db: &str, id: &str) -> Result<StoredDocument, StoreError> {
        let databases = self.databases.read().await;
        let database = databases.get(db).ok_or_else(Self::missing_database)?;
        let (rev, body) = database
            .docs
            .get(id)
            .ok_or_else(|| StoreError::not_found("missing"))?;

        let mut body = body.clone();
        if let Value::Object(fields) = &mut body {
            fields.insert("_id".to_string(), Value::String(id.to_string()));
            fields.insert("_rev".to_string(), Value::String(rev.clone()));
        }
        Ok(StoredDocument {
            rev: rev.clone(),
            body,
        })
    }

    async fn save(
        &self,
        db: &str,
        id: &str,
        body: &Value,
        rev: Option<&str>,
    ) -> Result<String, StoreError> {
        let mut databases = self.databases.write().await;
        let database = databases.get_mut(db).ok_or_else(Self::missing_database)?;

        let current = database.docs.get(id).map(|(current, _)| current.as_str());
        if current != rev {
            return Err(StoreError::conflict("Document update conflict."));
        }

        let new_rev = Self::next_rev(current);
        let mut stored = body.clone();
        if let Value::Object(fields) = &mut stored {
            fields.remove("_id");
            fields.remove("_rev");
        }
        database
            .docs
            .insert(id.to_string(), (new_rev.clone(), stored));
        Ok(new_rev)
    }

    async fn delete(&self, db: &str, id: &str, rev: &str) -> Result<String, StoreError> {
        let mut databases = self.databases.write().await;
        let database = databases.get_mut(db).ok_or_else(Self::missing_database)?;

        let current = match database.docs.get(id) {
            Some((current, _)) => current.clone(),
            None => return Err(StoreError::not_found("deleted")),
        };
        if current != rev {
            return Err(StoreError::conflict("Document update conflict."));
        }

        database.docs.remove(id);
        Ok(Self::next_rev(Some(&current)))
    }

    async fn query_view(
        &self,
        db: &str,
        design: &str,
        view: &str,
        params: &ViewParams,
    ) -> Result<ViewResponse, StoreError> {
        let databases = self.databases.read().await;
        let database = databases.get(db).ok_or_else(Self::missing_database)?;

        let design_id = format!("{DESIGN_PREFIX}{design}");
        let (_, design_doc) = database
            .docs
            .get(&design_id)
            .ok_or_else(|| StoreError::not_found("missing"))?;
        let definition = design_doc
            .get("views")
            .and_then(|views| views.get(view))
            .ok_or_else(|| StoreError::not_found("missing_named_view"))?;
        let map = self
            .map_functions
            .get(&(design.to_string(), view.to_string()))
            .ok_or_else(|| StoreError::not_found("missing_named_view"))?;

        let mut rows: Vec<ViewRow> = database
            .docs
            .iter()
            .filter(|(id, _)| !id.starts_with(DESIGN_PREFIX))
            .filter_map(|(id, (rev, body))| {
                let mut doc = body.clone();
                if let Value::Object(fields) = &mut doc {
                    fields.insert("_id".to_string(), Value::String(id.clone()));
                    fields.insert("_rev".to_string(), Value::String(rev.clone()));
                }
                (**map)(&doc).map(|(key, value)| ViewRow {
                    id: Some(id.clone()),
                    key,
                    value,
                })
            })
            .collect();

        rows.sort_by(|a, b| collate(&a.key, &b.key).then_with(|| a.id.cmp(&b.id)));
        if params.descending {
            rows.reverse();
        }

        let has_count_reducer = definition.get("reduce").and_then(Value::as_str) == Some("_count");
        if has_count_reducer && params.reduce != Some(false) {
            let rows = if rows.is_empty() {
                Vec::new()
            } else {
                vec![ViewRow {
                    id: None,
                    key: Value::Null,
                    value: Value::from(rows.len()),
                }]
            };
            return Ok(ViewResponse {
                total_rows: None,
                offset: None,
                rows,
            });
        }

        Ok(ViewResponse {
            total_rows: Some(rows.len() as u64),
            offset: Some(0),
            rows,
        })
    }
}
