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

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

lazy_static! {
    /// CouchDB database naming rule.
    static ref DATABASE_NAME_PATTERN: Regex =
        Regex::new(r"^[a-z][a-z0-9_$()+/-]*$").expect("Invalid regex pattern");
}

/// Top level configuration of the todo server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Upper bound on the time spent handling one request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Which [`DocumentStore`](crate::store::DocumentStore) backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    CouchDb,
    /// Non-persistent store for local experiments
    Memory,
}

/// Document store connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub kind: StoreKind,
    #[serde(default = "default_store_host")]
    pub host: String,
    #[serde(default = "default_store_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            host: default_store_host(),
            port: default_store_port(),
            database: default_database(),
            connect_timeout_ms: default_connect_timeout_ms(),
            username: None,
            password: None,
        }
    }
}

impl StoreSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8085
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_store_host() -> String {
    "localhost".to_string()
}

fn default_store_port() -> u16 {
    5984
}

fn default_database() -> String {
    "todo_db".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    100
}

impl TodoServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("Invalid server port: 0"));
        }
        if self.server.host.is_empty() {
            return Err(anyhow!("Server host cannot be empty"));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than 0"));
        }

        if self.store.kind == StoreKind::CouchDb {
            if self.store.host.is_empty() {
                return Err(anyhow!("Store host cannot be empty"));
            }
            if self.store.port == 0 {
                return Err(anyhow!("Invalid store port: 0"));
            }
            if self.store.username.is_some() != self.store.password.is_some() {
                return Err(anyhow!(
                    "Store username and password must be configured together"
                ));
            }
        }
        if !DATABASE_NAME_PATTERN.is_match(&self.store.database) {
            return Err(anyhow!(
                "Invalid database name '{}': must start with a lowercase letter and contain only a-z, 0-9, _$()+-/",
                self.store.database
            ));
        }
        Ok(())
    }
}
