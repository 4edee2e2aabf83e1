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

//! API Integration Tests
//!
//! These tests drive the complete router, layers included, against an
//! in-memory document store.

#![allow(clippy::unwrap_used)]

mod test_support;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use todo_server::config::ServerSettings;
use todo_server::store::{StoredDocument, ViewParams, ViewResponse};
use todo_server::todo::design;
use todo_server::{build_app, DocumentStore, MemoryStore, StoreError, TodoRepository};
use tower::ServiceExt;
use test_support::{
    create_todo, delete, get, post_json, send, send_json, test_app, TEST_DATABASE,
};

/// In-memory store whose view queries fail without an HTTP status.
struct FailingViewStore {
    inner: MemoryStore,
}

#[async_trait]
impl DocumentStore for FailingViewStore {
    async fn list_databases(&self) -> Result<Vec<String>, StoreError> {
        self.inner.list_databases().await
    }

    async fn create_database(&self, name: &str) -> Result<(), StoreError> {
        self.inner.create_database(name).await
    }

    async fn delete_database(&self, name: &str) -> Result<(), StoreError> {
        self.inner.delete_database(name).await
    }

    async fn read(&self, db: &str, id: &str) -> Result<StoredDocument, StoreError> {
        self.inner.read(db, id).await
    }

    async fn save(
        &self,
        db: &str,
        id: &str,
        body: &Value,
        rev: Option<&str>,
    ) -> Result<String, StoreError> {
        self.inner.save(db, id, body, rev).await
    }

    async fn delete(&self, db: &str, id: &str, rev: &str) -> Result<String, StoreError> {
        self.inner.delete(db, id, rev).await
    }

    async fn query_view(
        &self,
        _db: &str,
        _design: &str,
        _view: &str,
        _params: &ViewParams,
    ) -> Result<ViewResponse, StoreError> {
        Err(StoreError::from(
            serde_json::from_str::<Value>("{\"rows\": [").unwrap_err(),
        ))
    }
}

#[tokio::test]
async fn test_home_page_lists_routes() {
    let (_store, app) = test_app().await;

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("POST /todo"));
    assert!(page.contains("DELETE /todo/{item-id}"));
}

#[tokio::test]
async fn test_empty_list() {
    let (_store, app) = test_app().await;

    let (status, body) = send_json(&app, get("/todo")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "items": [] }));
}

#[tokio::test]
async fn test_create_and_fetch_todo() {
    let (_store, app) = test_app().await;

    let body = r#"{"task_name": "Buy Milk", "due": "2030-01-01T09:00:00Z"}"#;
    let (status, created) = send_json(&app, post_json("/todo", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["new_id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 32);

    let (status, item) = send_json(&app, get(&format!("/todo/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["_id"], id.as_str());
    assert!(item["_rev"].as_str().unwrap().starts_with("1-"));
    assert_eq!(item["type"], "todo_item");
    assert_eq!(item["task_name"], "Buy Milk");
    assert_eq!(item["completed"], false);
    assert_eq!(item["due"], "2030-01-01T09:00:00Z");
    assert!(item["created"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_client_supplied_identity_is_ignored() {
    let (_store, app) = test_app().await;

    let body = r#"{"_id": "chosen", "_rev": "7-abc", "type": "note", "task_name": "Walk dog"}"#;
    let (status, created) = send_json(&app, post_json("/todo", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(created["new_id"], "chosen");

    let (status, _) = send_json(&app, get("/todo/chosen")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send_json(&app, get("/todo")).await;
    assert_eq!(list["items"][0]["type"], "todo_item");
}

#[tokio::test]
async fn test_milk_and_eggs() {
    let (_store, app) = test_app().await;

    let milk = create_todo(&app, "Buy Milk").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let eggs = create_todo(&app, "Buy Eggs").await;

    let (status, list) = send_json(&app, get("/todo")).await;
    assert_eq!(status, StatusCode::OK);
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["task_name"], "Buy Milk");
    assert_eq!(items[1]["task_name"], "Buy Eggs");

    let (status, _) = send(&app, delete(&format!("/todo/{eggs}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send_json(&app, get("/todo")).await;
    let items = list["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["_id"], milk.as_str());
    assert_eq!(items[0]["task_name"], "Buy Milk");
}

#[tokio::test]
async fn test_list_is_oldest_first() {
    let (_store, app) = test_app().await;

    let names = ["first", "second", "third", "fourth"];
    for name in names {
        create_todo(&app, name).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let (_, list) = send_json(&app, get("/todo")).await;
    let listed: Vec<&str> = list["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["task_name"].as_str().unwrap())
        .collect();
    assert_eq!(listed, names);
}

#[tokio::test]
async fn test_empty_task_name_is_rejected() {
    let (store, app) = test_app().await;

    let (status, body) = send_json(&app, post_json("/todo", r#"{"task_name": ""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    // Only the design document is stored.
    assert_eq!(store.document_count(TEST_DATABASE).await, Some(1));
    let (_, count) = send_json(&app, get("/todo/count")).await;
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_missing_task_name_is_rejected() {
    let (_store, app) = test_app().await;

    let (status, _) = send_json(&app, post_json("/todo", r#"{"completed": true}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (store, app) = test_app().await;

    let (status, body) = send_json(&app, post_json("/todo", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    let (status, _) = send_json(&app, post_json("/todo", r#"{"task_name": 42}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(store.document_count(TEST_DATABASE).await, Some(1));
}

#[tokio::test]
async fn test_body_is_decoded_without_json_content_type() {
    let (_store, app) = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/todo")
        .body(Body::from(r#"{"task_name": "Buy Milk"}"#))
        .unwrap();
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["new_id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/todo")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(r#"{"task_name": "Buy Eggs"}"#))
        .unwrap();
    let (status, _) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, item) = send_json(&app, get(&format!("/todo/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["task_name"], "Buy Milk");

    let (_, list) = send_json(&app, get("/todo")).await;
    assert_eq!(list["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (_store, app) = test_app().await;

    let (status, body) = send_json(&app, get("/todo/unknown-id")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TODO_NOT_FOUND");
    assert!(!body["message"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_delete_twice() {
    let (_store, app) = test_app().await;

    let id = create_todo(&app, "Buy Eggs").await;

    let (status, body) = send(&app, delete(&format!("/todo/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = send(&app, delete(&format!("/todo/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get(&format!("/todo/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_id_is_not_found() {
    let (_store, app) = test_app().await;
    create_todo(&app, "Buy Milk").await;

    let (status, _) = send(&app, get("/todo/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, delete("/todo/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, count) = send_json(&app, get("/todo/count")).await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_design_document_is_not_exposed() {
    let (store, app) = test_app().await;
    create_todo(&app, "Buy Milk").await;

    let (status, body) = send_json(&app, get("/todo/_design%2Ftodo")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TODO_NOT_FOUND");

    let (status, _) = send_json(&app, delete("/todo/_design%2Ftodo")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(store.read(TEST_DATABASE, "_design/todo").await.is_ok());
    let (status, list) = send_json(&app, get("/todo")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["items"].as_array().unwrap().len(), 1);
    let (status, count) = send_json(&app, get("/todo/count")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_non_todo_document_is_not_found() {
    let (store, app) = test_app().await;
    store
        .save(TEST_DATABASE, "note-1", &serde_json::json!({"type": "note"}), None)
        .await
        .unwrap();

    let (status, _) = send_json(&app, get("/todo/note-1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send_json(&app, delete("/todo/note-1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(store.read(TEST_DATABASE, "note-1").await.is_ok());
}

#[tokio::test]
async fn test_delete_count_is_not_found() {
    let (_store, app) = test_app().await;
    create_todo(&app, "Buy Milk").await;

    let (status, body) = send_json(&app, delete("/todo/count")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TODO_NOT_FOUND");

    let (_, count) = send_json(&app, get("/todo/count")).await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_store_failure_without_status_is_internal_error() {
    let store = FailingViewStore {
        inner: design::memory_store(),
    };
    let repository = TodoRepository::initialize(Arc::new(store), TEST_DATABASE)
        .await
        .unwrap();
    let app = build_app(Arc::new(repository), &ServerSettings::default());

    for uri in ["/todo", "/todo/count"] {
        let (status, body) = send_json(&app, get(uri)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["code"], "INTERNAL_ERROR", "{uri}");
        assert_eq!(body["message"], "Internal server error", "{uri}");
    }
}

#[tokio::test]
async fn test_unsupported_methods() {
    let (_store, app) = test_app().await;
    let id = create_todo(&app, "Buy Milk").await;

    for (method, uri) in [
        (Method::PUT, "/todo".to_string()),
        (Method::DELETE, "/todo".to_string()),
        (Method::POST, format!("/todo/{id}")),
        (Method::PUT, format!("/todo/{id}")),
    ] {
        let request = Request::builder()
            .method(method.clone())
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_count() {
    let (_store, app) = test_app().await;

    for name in ["a", "b", "c"] {
        create_todo(&app, name).await;
    }

    let (status, body) = send_json(&app, get("/todo/count")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "count": 3 }));
}

#[tokio::test]
async fn test_health_check() {
    let (_store, app) = test_app().await;

    let (status, body) = send_json(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (_store, app) = test_app().await;

    let (status, body) = send_json(&app, get("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/todo"].is_object());
    assert!(body["paths"]["/todo/{id}"]["delete"].is_object());
}

#[tokio::test]
async fn test_cors_headers_are_set() {
    let (_store, app) = test_app().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/todo")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
