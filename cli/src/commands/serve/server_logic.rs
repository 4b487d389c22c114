//! # Chatline Development Service Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! The Axum service behind `chatline serve`:
//! - a single `POST /chat` route answering with the fallback echo reply
//! - port fallback when the requested port is taken
//! - optional permissive CORS and request tracing
//! - graceful shutdown on Ctrl+C or SIGTERM
//!
use crate::core::config::ServiceConfig;
use crate::core::error::{ChatError, Result};
use anyhow::Context;
use axum::{http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

const MAX_PORT_ATTEMPTS: u8 = 10;

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    reply: String,
}

/// # Run Development Service (`run_server`)
///
/// Binds the listener, prints a start-up banner and serves `POST /chat` until
/// Ctrl+C or SIGTERM arrives. In-flight requests finish before it returns.
///
/// ## Arguments
///
/// * `config` - Validated service settings. When `config.port` is taken the
///   next free port among the following ones is used.
///
/// ## Errors
///
/// * `ChatError::BindFailed` - No port in the fallback range could be bound.
/// * Any I/O error raised by the HTTP server while running.
pub async fn run_server(config: ServiceConfig) -> Result<()> {
    let listener = bind_with_fallback(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    let addr = listener
        .local_addr()
        .context("Failed to read the bound address")?;

    let app = create_app(config.enable_cors);

    println!("\n=================================================================");
    println!("💬 Chat endpoint:     http://{}/chat", addr);
    println!("⚙️  Binding to address: {}", addr);
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");
    info!("Starting chat service on {}", addr);
    println!("Service starting! Press Ctrl+C to stop.");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nService shutdown complete.");
    Ok(())
}

/// Builds the router with the `/chat` route and middleware.
pub fn create_app(enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/chat", post(chat_handler))
        .layer(trace_layer)
        .layer(cors_layer)
}

async fn chat_handler(Json(request): Json<ChatRequest>) -> (StatusCode, Json<ChatReply>) {
    match request.message.filter(|m| !m.is_empty()) {
        Some(message) => {
            info!("Received message ({} chars)", message.chars().count());
            (
                StatusCode::OK,
                Json(ChatReply {
                    reply: fallback_reply(&message),
                }),
            )
        }
        None => {
            warn!("Rejected request without a message");
            (
                StatusCode::BAD_REQUEST,
                Json(ChatReply {
                    reply: "Invalid message".to_string(),
                }),
            )
        }
    }
}

/// Reply used while no language model is wired in.
pub fn fallback_reply(message: &str) -> String {
    format!("No language model configured. You said: '{}'", message)
}

/// Binds `host:start_port`, moving on to the following ports while they are
/// taken. Returns the bound listener so the port cannot be lost in between.
async fn bind_with_fallback(host: IpAddr, start_port: u16, max_attempts: u8) -> Result<TcpListener> {
    let mut last_error = None;
    let mut tried = 0;
    for attempt in 0..max_attempts {
        let Some(port) = start_port.checked_add(u16::from(attempt)) else {
            warn!("Port range ends at {}, giving up.", u16::MAX);
            break;
        };
        tried += 1;
        let addr = SocketAddr::new(host, port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, bound to port {} instead.",
                        start_port, port
                    );
                }
                return Ok(listener);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    port,
                    host,
                    e
                );
                last_error = Some(e.to_string());
            }
        }
    }

    Err(ChatError::BindFailed {
        addr: SocketAddr::new(host, start_port).to_string(),
        reason: format!(
            "no free port among {} tried (last error: {})",
            tried,
            last_error.unwrap_or_else(|| "port range exhausted".to_string())
        ),
    }
    .into())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, initiating graceful shutdown...");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::ChatClient;
    use std::net::Ipv4Addr;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    /// Serves the app on an ephemeral port and returns its base URL.
    async fn spawn_app(enable_cors: bool) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_app(enable_cors)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_chat_route_echoes_message() {
        let base = spawn_app(true).await;
        let client = ChatClient::new(&format!("{}/chat", base)).unwrap();
        let reply = client.exchange("Hello").await.unwrap();
        assert_eq!(
            reply.text().as_deref(),
            Some("No language model configured. You said: 'Hello'")
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let base = spawn_app(true).await;
        let client = ChatClient::new(&format!("{}/chat", base)).unwrap();
        match client.exchange("").await {
            Err(ChatError::HttpStatus { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid message"));
            }
            other => panic!("expected a 400, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_message_field_is_rejected() {
        let base = spawn_app(true).await;
        let response = reqwest::Client::new()
            .post(format!("{}/chat", base))
            .json(&serde_json::json!({ "text": "wrong field" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_headers_follow_flag() {
        let with_cors = spawn_app(true).await;
        let response = reqwest::Client::new()
            .post(format!("{}/chat", with_cors))
            .header("Origin", "http://example.com")
            .json(&serde_json::json!({ "message": "hi" }))
            .send()
            .await
            .unwrap();
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));

        let without_cors = spawn_app(false).await;
        let response = reqwest::Client::new()
            .post(format!("{}/chat", without_cors))
            .header("Origin", "http://example.com")
            .json(&serde_json::json!({ "message": "hi" }))
            .send()
            .await
            .unwrap();
        assert!(!response
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_bind_with_fallback_skips_taken_port() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let taken_port = taken.local_addr().unwrap().port();

        match bind_with_fallback(LOCALHOST, taken_port, 10).await {
            Ok(listener) => {
                let port = listener.local_addr().unwrap().port();
                assert!(port > taken_port && port < taken_port.saturating_add(10));
            }
            // Every following port was also busy; the error names the start.
            Err(e) => assert!(e.to_string().contains(&taken_port.to_string())),
        }
    }

    #[tokio::test]
    async fn test_bind_with_fallback_stops_at_port_range_end() {
        // Port 65535 must be busy; if another process already holds it the
        // bind below fails and the port is busy anyway.
        let _blocker = TcpListener::bind((LOCALHOST, u16::MAX)).await;

        let err = bind_with_fallback(LOCALHOST, u16::MAX, 3)
            .await
            .expect_err("no port after 65535 can be tried");
        let message = err.to_string();
        assert!(message.contains("65535"), "unexpected error: {}", message);
        // The range ends after the first port, so only one was tried.
        assert!(message.contains("among 1 tried"), "unexpected error: {}", message);
    }

    #[test]
    fn test_fallback_reply() {
        assert_eq!(
            fallback_reply("What is Botox?"),
            "No language model configured. You said: 'What is Botox?'"
        );
    }
}
