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

//! Route definitions.

use axum::{extract::Extension, response::Json, routing::get, Router};
use std::sync::Arc;
use utoipa::OpenApi;

use super::handlers;
use super::openapi::ApiDoc;
use crate::todo::TodoRepository;

/// Build the router serving the todo API.
///
/// Methods a route does not list are answered with 405 by axum.
pub fn build_router(repository: Arc<TodoRepository>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(openapi_json))
        .route(
            "/todo",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todo/",
            get(handlers::missing_todo_id).delete(handlers::missing_todo_id),
        )
        .route(
            "/todo/count",
            get(handlers::count_todos).delete(handlers::missing_todo_id),
        )
        .route(
            "/todo/:id",
            get(handlers::get_todo).delete(handlers::delete_todo),
        )
        .layer(Extension(repository))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
