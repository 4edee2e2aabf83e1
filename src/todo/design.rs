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

//! The design document indexing todo items.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::model::TODO_ITEM_KIND;
use crate::store::{MemoryStore, DESIGN_PREFIX};

/// Name of the design document, stored as `_design/todo`.
pub const DESIGN_NAME: &str = "todo";

/// View of all todo items keyed by creation time, reduced with `_count`.
pub const ALL_TODOS_VIEW: &str = "getAllTodos";

const ALL_TODOS_MAP: &str =
    r#"function(doc){ if(doc.type==="todo_item"){ emit(doc.created, doc); } }"#;

const COUNT_REDUCER: &str = "_count";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub language: String,
    pub views: BTreeMap<String, ViewDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    pub map: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduce: Option<String>,
}

pub fn design_id() -> String {
    format!("{DESIGN_PREFIX}{DESIGN_NAME}")
}

pub fn todo_design_document() -> DesignDocument {
    let mut views = BTreeMap::new();
    views.insert(
        ALL_TODOS_VIEW.to_string(),
        ViewDefinition {
            map: ALL_TODOS_MAP.to_string(),
            reduce: Some(COUNT_REDUCER.to_string()),
        },
    );
    DesignDocument {
        language: "javascript".to_string(),
        views,
    }
}

/// Rust rendition of the `getAllTodos` map function.
pub fn emit_all_todos(doc: &Value) -> Option<(Value, Value)> {
    if doc.get("type").and_then(Value::as_str) != Some(TODO_ITEM_KIND) {
        return None;
    }
    let key = doc.get("created").cloned().unwrap_or(Value::Null);
    Some((key, doc.clone()))
}

/// A [`MemoryStore`] that can answer the todo views.
pub fn memory_store() -> MemoryStore {
    MemoryStore::new().with_view(DESIGN_NAME, ALL_TODOS_VIEW, emit_all_todos)
}
