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

//! Handler functions for the todo API.

use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    response::{Html, Json},
};
use log::info;
use std::sync::Arc;

use super::error::{ApiError, ErrorResponse};
use super::responses::{CountResponse, CreatedResponse, HealthResponse};
use crate::todo::{TodoItem, TodoList, TodoRepository};

const HOME_PAGE: &str = r#"<!doctype html>
<html>
<head>
    <title>TODO</title>
</head>
<body>
    <h1>TODO API</h1>
    <p>Try these routes:</p>
    <ul>
        <li>GET /todo - List of Todo items</li>
        <li>POST /todo - Create a new Todo item</li>
        <li>GET /todo/count - Number of Todo items</li>
        <li>GET /todo/{item-id} - Fetch a Todo item</li>
        <li>DELETE /todo/{item-id} - Delete a Todo item</li>
    </ul>
</body>
</html>
"#;

/// Describe the available routes
pub async fn home() -> Html<&'static str> {
    info!("Serving the home page");
    Html(HOME_PAGE)
}

/// Check server health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// List all todo items, oldest first
#[utoipa::path(
    get,
    path = "/todo",
    responses(
        (status = 200, description = "All todo items", body = TodoList),
        (status = 500, description = "Document store failure", body = ErrorResponse),
    ),
    tag = "Todo"
)]
pub async fn list_todos(
    Extension(repository): Extension<Arc<TodoRepository>>,
) -> Result<Json<TodoList>, ApiError> {
    info!("GET /todo");
    let list = repository.get_todo_list().await?;
    Ok(Json(list))
}

/// Create a todo item
#[utoipa::path(
    post,
    path = "/todo",
    request_body = TodoItem,
    responses(
        (status = 201, description = "Todo item created", body = CreatedResponse),
        (status = 400, description = "Malformed body or invalid item", body = ErrorResponse),
        (status = 500, description = "Document store failure", body = ErrorResponse),
    ),
    tag = "Todo"
)]
pub async fn create_todo(
    Extension(repository): Extension<Arc<TodoRepository>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    info!("POST /todo");
    // The body is JSON whatever the Content-Type header says.
    let item: TodoItem =
        serde_json::from_slice(&body).map_err(|err| ApiError::BadRequest(err.to_string()))?;
    let new_id = repository.create_todo_item(item).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { new_id })))
}

/// Count todo items
#[utoipa::path(
    get,
    path = "/todo/count",
    responses(
        (status = 200, description = "Number of todo items", body = CountResponse),
        (status = 500, description = "Document store failure", body = ErrorResponse),
    ),
    tag = "Todo"
)]
pub async fn count_todos(
    Extension(repository): Extension<Arc<TodoRepository>>,
) -> Result<Json<CountResponse>, ApiError> {
    info!("GET /todo/count");
    let count = repository.count_todo_items().await?;
    Ok(Json(CountResponse { count }))
}

/// Fetch a single todo item
#[utoipa::path(
    get,
    path = "/todo/{id}",
    params(("id" = String, Path, description = "Todo item id")),
    responses(
        (status = 200, description = "The todo item", body = TodoItem),
        (status = 404, description = "No such todo item", body = ErrorResponse),
    ),
    tag = "Todo"
)]
pub async fn get_todo(
    Extension(repository): Extension<Arc<TodoRepository>>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    info!("GET /todo/{id}");
    let item = repository.get_todo_item(&id).await?;
    Ok(Json(item))
}

/// Delete a todo item
#[utoipa::path(
    delete,
    path = "/todo/{id}",
    params(("id" = String, Path, description = "Todo item id")),
    responses(
        (status = 204, description = "Todo item deleted"),
        (status = 404, description = "No such todo item", body = ErrorResponse),
        (status = 409, description = "Todo item changed while deleting", body = ErrorResponse),
    ),
    tag = "Todo"
)]
pub async fn delete_todo(
    Extension(repository): Extension<Arc<TodoRepository>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    info!("DELETE /todo/{id}");
    repository.delete_todo_item(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `/todo/` without an id, and `DELETE /todo/count`.
pub async fn missing_todo_id() -> ApiError {
    ApiError::MissingId
}
