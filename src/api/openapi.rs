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

//! OpenAPI documentation, served at `/openapi.json`.

use utoipa::OpenApi;

use super::error::ErrorResponse;
use super::responses::{CountResponse, CreatedResponse, HealthResponse};
use crate::todo::{TodoItem, TodoList};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::health_check,
        super::handlers::list_todos,
        super::handlers::create_todo,
        super::handlers::count_todos,
        super::handlers::get_todo,
        super::handlers::delete_todo,
    ),
    components(
        schemas(
            TodoItem,
            TodoList,
            CreatedResponse,
            CountResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Todo", description = "Todo item management"),
    ),
    info(
        title = "Todo API",
        version = "1.0.0",
        description = "Create, list, fetch and delete todo items stored in CouchDB.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    )
)]
pub struct ApiDoc;
