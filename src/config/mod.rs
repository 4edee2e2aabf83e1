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

//! Configuration for the todo server.
//!
//! Every setting has a default, so an empty file is a valid configuration.
//! Values may reference environment variables with `${VAR}` or
//! `${VAR:-default}`.
//!
//! ```yaml
//! server:
//!   host: "${TODO_HOST:-0.0.0.0}"
//!   port: 8085
//!   log_level: info
//!
//! store:
//!   kind: couchdb
//!   host: "${COUCHDB_HOST:-localhost}"
//!   port: 5984
//!   database: todo_db
//!   username: "${COUCHDB_USER}"
//!   password: "${COUCHDB_PASSWORD}"
//! ```

pub mod env_interpolation;
pub mod loader;
pub mod types;

pub use loader::{from_json_str, from_yaml_str, load_config_file, ConfigError};
pub use types::{ServerSettings, StoreKind, StoreSettings, TodoServerConfig};
