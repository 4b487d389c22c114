//! # Chatline Development Chat Service
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `chatline serve` runs a small local chat service speaking the same wire
//! protocol the widget expects, so the widget (or a browser front-end) can be
//! exercised without a real chatbot backend:
//!
//! - `POST /chat` with `{"message": "..."}` answers
//!   `{"reply": "No language model configured. You said: '...'"}`
//! - a missing or empty `message` answers HTTP 400 `{"reply": "Invalid message"}`
//!
//! Permissive CORS is on by default so browser pages served from other
//! origins can reach it.
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the default 127.0.0.1:5001
//! chatline serve
//!
//! # Serve on all interfaces, port 8080, without CORS headers
//! chatline serve --host 0.0.0.0 --port 8080 --no-cors
//! ```
//!
use crate::core::config::{self, ServiceConfig};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::net::IpAddr;
use std::path::Path;
use tracing::info;

/// Contains the Axum-based service implementation.
pub mod server_logic;

#[derive(Parser, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Port to listen on. The next free port is used if it is taken.
    /// Defaults to `service.port` from the configuration (5001).
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Address to bind to. Defaults to `service.host` (127.0.0.1).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Do not send CORS headers.
    #[arg(long)]
    pub no_cors: bool,
}

impl ServeArgs {
    /// Applies the flags that were given on top of `service`.
    pub fn apply(&self, mut service: ServiceConfig) -> ServiceConfig {
        if let Some(port) = self.port {
            service.port = port;
        }
        if let Some(host) = self.host {
            service.host = host;
        }
        if self.no_cors {
            service.enable_cors = false;
        }
        service
    }
}

/// # Handle Serve Command (`handle_serve`)
///
/// Loads the `[service]` settings, applies the flags and runs the
/// development service. Client-only settings such as `endpoint` are not
/// checked.
///
/// ## Errors
///
/// Returns configuration problems (including a zero port) and bind or
/// server failures from [`server_logic::run_server`].
pub async fn handle_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);
    let cfg = config::load_config(config_path)?;
    let service = args.apply(cfg.service);
    config::validate_service_config(&service).context("Configuration validation failed")?;
    info!("Effective service config: {:?}", service);

    server_logic::run_server(service).await
}
