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

//! Todo item documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::ValidationError;

/// Value of the `type` field identifying todo item documents.
pub const TODO_ITEM_KIND: &str = "todo_item";

/// A single todo item as stored in the database.
///
/// `_id` and `_rev` belong to the store and are empty until the item has
/// been persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TodoItem {
    /// Document id assigned at creation
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Current revision of the document
    #[serde(rename = "_rev", default, skip_serializing_if = "String::is_empty")]
    pub rev: String,
    /// Document discriminator, always `todo_item`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// What needs doing
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub completed: bool,
    /// Optional due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    /// Creation time, set by the server
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "created_format"
    )]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created: Option<DateTime<Utc>>,
}

impl TodoItem {
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            ..Default::default()
        }
    }

    /// Check the invariants an item must satisfy before it is stored.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.kind != TODO_ITEM_KIND {
            return Err(ValidationError::WrongKind {
                found: self.kind.clone(),
            });
        }
        if self.task_name.is_empty() {
            return Err(ValidationError::EmptyTaskName);
        }
        Ok(())
    }
}

/// All todo items, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TodoList {
    pub items: Vec<TodoItem>,
}

/// Fixed microsecond precision keeps the string form of `created` in
/// chronological order, which the view index relies on.
mod created_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(created) => {
                serializer.serialize_str(&created.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<DateTime<Utc>>::deserialize(deserializer)
    }
}
