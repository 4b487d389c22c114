//! # Chatline CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests: a `chatline` command isolated
//! from the user's configuration, and throwaway chat services running on a
//! background Tokio runtime while the blocking `assert_cmd` calls execute.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use axum::{
    http::{header, StatusCode},
    routing::post,
    Router,
};
use std::fs;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

/// # Get Chatline Command (`chatline_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `chatline` binary.
///
/// ## Panics
/// Panics if the `chatline` binary cannot be found via `Command::cargo_bin`.
pub fn chatline_cmd() -> Command {
    Command::cargo_bin("chatline").expect("Failed to find chatline binary for testing")
}

/// A `chatline` command that ignores the user's config file and environment.
///
/// It runs inside a fresh temporary directory containing `.git` (which stops
/// the project config search) and an empty config file passed via `--config`.
/// Keep the returned `TempDir` alive for as long as the command is used.
pub fn isolated_cmd() -> (Command, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir(dir.path().join(".git")).expect("Failed to create .git marker");
    let config = dir.path().join("config.toml");
    fs::write(&config, "").expect("Failed to write empty config");

    let mut cmd = chatline_cmd();
    cmd.current_dir(dir.path())
        .env_remove("CHATLINE_ENDPOINT")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config);
    (cmd, dir)
}

/// A chat service running on a background runtime. Dropping it shuts the
/// runtime (and the service) down.
pub struct MockService {
    pub endpoint: String,
    _runtime: Runtime,
}

/// Starts a service whose `POST /chat` always answers `status` with the JSON
/// text `body`.
pub fn mock_service(status: u16, body: &'static str) -> MockService {
    let status = StatusCode::from_u16(status).expect("valid status code");
    let router = Router::new().route(
        "/chat",
        post(move || async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }),
    );
    serve_router(router)
}

/// Serves `router` on an ephemeral port.
pub fn serve_router(router: Router) -> MockService {
    let runtime = Runtime::new().expect("Failed to build Tokio runtime");
    let listener = runtime
        .block_on(TcpListener::bind("127.0.0.1:0"))
        .expect("Failed to bind mock service");
    let addr = listener.local_addr().expect("Failed to read mock address");
    runtime.spawn(async move {
        axum::serve(listener, router).await.expect("mock service failed");
    });
    MockService {
        endpoint: format!("http://{}/chat", addr),
        _runtime: runtime,
    }
}

/// An endpoint on a port nothing listens on.
pub fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);
    format!("http://{}/chat", addr)
}
