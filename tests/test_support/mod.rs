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

//! Shared helpers for integration tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use todo_server::config::ServerSettings;
use todo_server::todo::design;
use todo_server::{build_app, MemoryStore, TodoRepository};
use tower::ServiceExt;

pub const TEST_DATABASE: &str = "todo_test_db";

/// A repository over a fresh in-memory store.
pub async fn memory_repository() -> (MemoryStore, Arc<TodoRepository>) {
    let store = design::memory_store();
    let repository = TodoRepository::initialize(Arc::new(store.clone()), TEST_DATABASE)
        .await
        .expect("Failed to initialize test repository");
    (store, Arc::new(repository))
}

/// The full application router over a fresh in-memory store.
pub async fn test_app() -> (MemoryStore, Router) {
    let (store, repository) = memory_repository().await;
    (store, build_app(repository, &ServerSettings::default()))
}

/// Send a request and return the status with the raw body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

/// Send a request and parse the body as JSON (`Null` when empty).
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&body).unwrap())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

/// Create an item through the API and return its id.
pub async fn create_todo(app: &Router, task_name: &str) -> String {
    let body = serde_json::json!({ "task_name": task_name }).to_string();
    let (status, json) = send_json(app, post_json("/todo", body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["new_id"].as_str().unwrap().to_string()
}
