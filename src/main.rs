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

// Allow println! in main.rs for the validate command's output
#![allow(clippy::print_stdout)]

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use todo_server::config::{load_config_file, StoreKind, TodoServerConfig};
use todo_server::TodoServer;

#[derive(Parser)]
#[command(name = "todo-server")]
#[command(about = "REST service for todo items stored in CouchDB")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (default if no subcommand specified)
    Run {
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Validate a configuration file without starting the server
    Validate {
        /// Path to the configuration file to validate
        #[arg(short, long, default_value = "config/server.yaml")]
        config: PathBuf,
    },
}

/// Settings that take precedence over the configuration file.
#[derive(Args, Clone)]
struct Overrides {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config/server.yaml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// CouchDB host name or URL
    #[arg(long)]
    db_host: Option<String>,

    /// CouchDB port
    #[arg(long)]
    db_port: Option<u16>,

    /// Database holding the todo items
    #[arg(long)]
    db_name: Option<String>,

    /// Keep todo items in memory instead of CouchDB
    #[arg(long)]
    in_memory: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

impl Overrides {
    fn apply(&self, config: &mut TodoServerConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.db_host {
            config.store.host = host.clone();
        }
        if let Some(port) = self.db_port {
            config.store.port = port;
        }
        if let Some(name) = &self.db_name {
            config.store.database = name.clone();
        }
        if self.in_memory {
            config.store.kind = StoreKind::Memory;
        }
        if let Some(level) = &self.log_level {
            config.server.log_level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { overrides }) => run_server(overrides).await,
        Some(Commands::Validate { config }) => validate_config(&config),
        None => run_server(cli.overrides).await,
    }
}

/// Load `.env` from the configuration file's directory, if present.
fn load_env_file(config_path: &Path) -> bool {
    let Some(config_dir) = config_path.parent() else {
        return false;
    };
    let env_file = config_dir.join(".env");
    if !env_file.exists() {
        return false;
    }
    match dotenvy::from_path(&env_file) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Warning: Failed to load .env file: {e}");
            false
        }
    }
}

async fn run_server(overrides: Overrides) -> Result<()> {
    let env_file_loaded = load_env_file(&overrides.config);

    let config_exists = overrides.config.exists();
    let mut config = if config_exists {
        load_config_file(&overrides.config)?
    } else {
        TodoServerConfig::default()
    };
    overrides.apply(&mut config);
    config.validate()?;

    // Set log level from config if RUST_LOG wasn't explicitly set by user
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &config.server.log_level);
    }
    env_logger::init();

    if env_file_loaded {
        info!("Loaded environment variables from .env file");
    }
    if config_exists {
        info!("Config file: {}", overrides.config.display());
    } else {
        warn!(
            "Config file '{}' not found. Using built-in defaults.",
            overrides.config.display()
        );
    }
    info!("Port: {}", config.server.port);
    info!(
        "Database: {} on {}:{}",
        config.store.database, config.store.host, config.store.port
    );
    debug!("Server configuration: {config:?}");

    TodoServer::new(config).run().await
}

/// Validate a configuration file
fn validate_config(config_path: &Path) -> Result<()> {
    load_env_file(config_path);
    println!("Validating configuration: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[ERROR] Configuration file not found: {}",
            config_path.display()
        );
        std::process::exit(1);
    }

    match load_config_file(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid");
            println!();
            println!("Summary:");
            println!("  Listen: {}:{}", config.server.host, config.server.port);
            println!("  Log level: {}", config.server.log_level);
            match config.store.kind {
                StoreKind::CouchDb => println!(
                    "  Store: CouchDB at {}:{}",
                    config.store.host, config.store.port
                ),
                StoreKind::Memory => println!("  Store: in-memory"),
            }
            println!("  Database: {}", config.store.database);
            Ok(())
        }
        Err(e) => {
            println!("[ERROR] Configuration is invalid:");
            println!("  {e}");
            std::process::exit(1);
        }
    }
}
