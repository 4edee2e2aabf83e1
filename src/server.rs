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

use anyhow::{Context, Result};
use axum::Router;
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::api;
use crate::config::{ServerSettings, StoreKind, StoreSettings, TodoServerConfig};
use crate::store::{CouchDbClient, DocumentStore};
use crate::todo::{design, TodoRepository};

pub struct TodoServer {
    config: TodoServerConfig,
}

impl TodoServer {
    pub fn new(config: TodoServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TodoServerConfig {
        &self.config
    }

    /// Connect to the store, prepare the database and serve until Ctrl-C.
    ///
    /// Any failure before the listener is bound is returned, so the process
    /// can exit with a non-zero status.
    pub async fn run(self) -> Result<()> {
        info!("Starting todo server");

        let store = connect_store(&self.config.store).await?;
        let repository = TodoRepository::initialize(store, self.config.store.database.clone())
            .await
            .with_context(|| {
                format!(
                    "Failed to initialize database '{}'",
                    self.config.store.database
                )
            })?;

        let app = build_app(Arc::new(repository), &self.config.server);

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!("Listening on http://{addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Todo server stopped");
        Ok(())
    }
}

/// Open the configured document store.
///
/// A CouchDB server that does not answer is a startup error.
pub async fn connect_store(settings: &StoreSettings) -> Result<Arc<dyn DocumentStore>> {
    match settings.kind {
        StoreKind::CouchDb => {
            let mut client =
                CouchDbClient::new(&settings.host, settings.port, settings.connect_timeout())?;
            if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
                client = client.with_credentials(username, password);
            }
            client
                .ping()
                .await
                .with_context(|| format!("Cannot reach CouchDB at {}", client.base_url()))?;
            info!("Connected to CouchDB at {}", client.base_url());
            Ok(Arc::new(client))
        }
        StoreKind::Memory => {
            warn!("Using the in-memory store: todo items are lost on shutdown");
            Ok(Arc::new(design::memory_store()))
        }
    }
}

/// The API router with the CORS and request timeout layers applied.
pub fn build_app(repository: Arc<TodoRepository>, settings: &ServerSettings) -> Router {
    api::build_router(repository)
        .layer(TimeoutLayer::new(settings.request_timeout()))
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
