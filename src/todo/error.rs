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

use crate::store::StoreError;

use super::model::TODO_ITEM_KIND;

/// Reasons a todo item is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("document type must be '{TODO_ITEM_KIND}', found '{found}'")]
    WrongKind { found: String },

    #[error("task_name must not be empty")]
    EmptyTaskName,
}

/// Error returned by [`TodoRepository`](super::TodoRepository) operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("invalid todo item: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TodoError {
    /// Status code reported by the store, if the error came from it.
    pub fn store_status(&self) -> Option<u16> {
        match self {
            TodoError::Invalid(_) => None,
            TodoError::Store(err) => err.status_code(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::Store(err) if err.is_not_found())
    }
}
