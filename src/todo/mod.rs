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

//! Todo items and their persistence.
//!
//! Items live as JSON documents in one database of a
//! [`DocumentStore`](crate::store::DocumentStore). Listing goes through the
//! `getAllTodos` view of the `_design/todo` design document, which
//! [`TodoRepository::initialize`] creates on first start.

pub mod design;
pub mod error;
pub mod model;
pub mod repository;

pub use error::{TodoError, ValidationError};
pub use model::{TodoItem, TodoList, TODO_ITEM_KIND};
pub use repository::TodoRepository;
