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

//! Data access for todo items.

use chrono::Utc;
use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::design::{self, ALL_TODOS_VIEW, DESIGN_NAME};
use super::error::TodoError;
use super::model::{TodoItem, TodoList, TODO_ITEM_KIND};
use crate::store::{DocumentStore, StoreError, StoredDocument, ViewParams, DESIGN_PREFIX};

/// Todo item access on top of one database of a [`DocumentStore`].
///
/// Constructed once at startup through [`TodoRepository::initialize`] and
/// shared by all requests. Holds no mutable state of its own.
#[derive(Clone)]
pub struct TodoRepository {
    store: Arc<dyn DocumentStore>,
    database: String,
}

impl TodoRepository {
    /// Make sure `database` and the todo design document exist, creating
    /// whichever is missing.
    ///
    /// Safe to call repeatedly: once both exist nothing is written.
    pub async fn initialize(
        store: Arc<dyn DocumentStore>,
        database: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let repository = Self {
            store,
            database: database.into(),
        };
        info!("Initializing database '{}'", repository.database);
        repository.ensure_database().await?;
        repository.ensure_design_document().await?;
        Ok(repository)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    async fn ensure_database(&self) -> Result<(), StoreError> {
        let databases = self.store.list_databases().await?;
        if databases.iter().any(|name| name == &self.database) {
            debug!("Database '{}' already exists", self.database);
            return Ok(());
        }

        info!("Creating database '{}'", self.database);
        match self.store.create_database(&self.database).await {
            // Created by someone else since we listed.
            Err(StoreError::Status { status: 412, .. }) => Ok(()),
            other => other,
        }
    }

    async fn ensure_design_document(&self) -> Result<(), StoreError> {
        let id = design::design_id();
        match self.store.read(&self.database, &id).await {
            Ok(_) => {
                debug!("Design document '{id}' already exists");
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                info!("Writing design document '{id}'");
                let body = serde_json::to_value(design::todo_design_document())?;
                match self.store.save(&self.database, &id, &body, None).await {
                    Ok(_) | Err(StoreError::Conflict { .. }) => Ok(()),
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Store a new item and return its generated id.
    ///
    /// `created` and the document type are filled in here; `_id`, `_rev` and
    /// any client supplied `created` are discarded. Invalid items are
    /// rejected without contacting the store.
    pub async fn create_todo_item(&self, mut item: TodoItem) -> Result<String, TodoError> {
        item.id.clear();
        item.rev.clear();
        item.kind = TODO_ITEM_KIND.to_string();
        item.created = Some(Utc::now());
        item.validate()?;

        let id = Uuid::new_v4().simple().to_string();
        let body = serde_json::to_value(&item).map_err(StoreError::from)?;
        self.store.save(&self.database, &id, &body, None).await?;
        debug!("Created todo item '{id}'");
        Ok(id)
    }

    /// Read `id` if it is a todo item. Design documents and documents of
    /// any other type are reported as not found.
    async fn read_todo_document(&self, id: &str) -> Result<StoredDocument, TodoError> {
        if id.starts_with(DESIGN_PREFIX) {
            return Err(StoreError::not_found("missing").into());
        }
        let document = self.store.read(&self.database, id).await?;
        if document.body.get("type").and_then(Value::as_str) != Some(TODO_ITEM_KIND) {
            debug!("Document '{id}' is not a todo item");
            return Err(StoreError::not_found("missing").into());
        }
        Ok(document)
    }

    pub async fn get_todo_item(&self, id: &str) -> Result<TodoItem, TodoError> {
        let document = self.read_todo_document(id).await?;
        let item = serde_json::from_value(document.body).map_err(StoreError::from)?;
        Ok(item)
    }

    /// Delete an item at its latest revision.
    ///
    /// The current revision is read first; if that read fails the delete
    /// fails with the same error. Only todo items can be deleted.
    pub async fn delete_todo_item(&self, id: &str) -> Result<(), TodoError> {
        let document = self.read_todo_document(id).await?;
        self.store
            .delete(&self.database, id, &document.rev)
            .await?;
        debug!("Deleted todo item '{id}' at revision {}", document.rev);
        Ok(())
    }

    /// All items ordered by creation time, oldest first.
    pub async fn get_todo_list(&self) -> Result<TodoList, TodoError> {
        let response = self
            .store
            .query_view(
                &self.database,
                DESIGN_NAME,
                ALL_TODOS_VIEW,
                &ViewParams::without_reduce(),
            )
            .await?;

        let items = response
            .rows
            .into_iter()
            .map(|row| serde_json::from_value::<TodoItem>(row.value))
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)?;
        Ok(TodoList { items })
    }

    /// Number of todo items, from the view's `_count` reducer.
    pub async fn count_todo_items(&self) -> Result<u64, TodoError> {
        let response = self
            .store
            .query_view(
                &self.database,
                DESIGN_NAME,
                ALL_TODOS_VIEW,
                &ViewParams::reduced(),
            )
            .await?;

        Ok(response
            .rows
            .first()
            .and_then(|row| row.value.as_u64())
            .unwrap_or(0))
    }
}
