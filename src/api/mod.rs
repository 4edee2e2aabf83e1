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

//! REST API for todo items.
//!
//! ## API Structure
//!
//! ```text
//! GET    /               - HTML page describing the routes
//! GET    /health         - Health check
//! GET    /openapi.json   - OpenAPI document
//! GET    /todo           - List todo items
//! POST   /todo           - Create a todo item
//! GET    /todo/count     - Number of todo items
//! GET    /todo/{id}      - Fetch a todo item
//! DELETE /todo/{id}      - Delete a todo item
//! ```
//!
//! ## Module Organization
//!
//! - `handlers` - Request handlers
//! - `routes` - Router construction
//! - `error` - `ApiError` and its mapping to status codes
//! - `responses` - Response bodies
//! - `openapi` - OpenAPI documentation

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod responses;
pub mod routes;

pub use error::{error_codes, ApiError, ErrorResponse};
pub use openapi::ApiDoc;
pub use responses::{CountResponse, CreatedResponse, HealthResponse};
pub use routes::build_router;
