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

//! Environment variable interpolation for configuration files.
//!
//! Supported forms:
//! - `${VAR_NAME}` - replaced by the variable, which must be set
//! - `${VAR_NAME:-default}` - falls back to `default` when unset or empty
//!
//! ```
//! use todo_server::config::env_interpolation::interpolate;
//! use std::env;
//!
//! env::set_var("DOC_COUCH_HOST", "couch.internal");
//!
//! let result = interpolate("host: ${DOC_COUCH_HOST}\ndatabase: ${DOC_COUCH_DB:-todo_db}").unwrap();
//! assert_eq!(result, "host: couch.internal\ndatabase: todo_db");
//! ```

use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};
use std::env;

/// Upper bound on the size of an interpolated config file.
const MAX_INTERPOLATED_LENGTH: usize = 10_000_000;

lazy_static! {
    /// Group 1 is the POSIX variable name, group 3 the optional default.
    static ref ENV_VAR_PATTERN: Regex =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}").expect("Invalid regex pattern");
}

#[derive(Debug, thiserror::Error)]
pub enum InterpolationError {
    #[error("Environment variable '{name}' is not set and has no default value")]
    MissingVariable { name: String },

    #[error("Environment variable '{name}' does not contain valid Unicode")]
    InvalidUnicode { name: String },

    #[error("Interpolated result exceeds maximum allowed length of {MAX_INTERPOLATED_LENGTH} bytes")]
    ResultTooLarge,
}

fn resolve(caps: &Captures<'_>) -> Result<String, InterpolationError> {
    let name = &caps[1];
    let default = caps.get(3).map(|m| m.as_str());

    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        Err(env::VarError::NotUnicode(_)) => Err(InterpolationError::InvalidUnicode {
            name: name.to_string(),
        }),
        _ => default
            .map(str::to_string)
            .ok_or_else(|| InterpolationError::MissingVariable {
                name: name.to_string(),
            }),
    }
}

/// Replace every `${...}` reference in `input`.
///
/// Expansion is not recursive: substituted values are never rescanned.
pub fn interpolate(input: &str) -> Result<String, InterpolationError> {
    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;
    let mut names = Vec::new();

    for caps in ENV_VAR_PATTERN.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        output.push_str(&input[cursor..whole.start()]);
        output.push_str(&resolve(&caps)?);
        cursor = whole.end();
        names.push(caps[1].to_string());

        if output.len() > MAX_INTERPOLATED_LENGTH {
            return Err(InterpolationError::ResultTooLarge);
        }
    }
    output.push_str(&input[cursor..]);

    if !names.is_empty() {
        debug!("Interpolated environment variables: {}", names.join(", "));
    }
    Ok(output)
}
