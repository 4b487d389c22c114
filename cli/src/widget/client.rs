//! # Chat Service Client
//!
//! File: cli/src/widget/client.rs
//!
//! ## Overview
//!
//! Performs the single request/response exchange with the remote chat
//! service: `POST <endpoint>` with `Content-Type: application/json` and a
//! `{"message": ...}` body.
//!
//! The client applies no timeout and never retries. A request runs until the
//! service answers or the transport fails.
//!
use super::message::{InboundReply, OutboundRequest};
use crate::core::error::ChatError;
use reqwest::{Client, Url};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    endpoint: Url,
}

impl ChatClient {
    /// Builds a client for `endpoint`, which must be an absolute http(s) URL.
    pub fn new(endpoint: &str) -> Result<Self, ChatError> {
        crate::core::config::validate_endpoint(endpoint)?;
        let endpoint = Url::parse(endpoint).map_err(|e| ChatError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `message` and returns the decoded reply body.
    ///
    /// ## Errors
    ///
    /// - `ChatError::HttpStatus` when the service answers with a non-2xx
    ///   status. The body is returned as text, not parsed.
    /// - `ChatError::Transport` when the request cannot be sent, the body
    ///   cannot be read, or a success body is not valid JSON.
    /// - `ChatError::MalformedReply` when a success body is the JSON literal
    ///   `null`, which has no fields to read `reply` from.
    pub async fn exchange(&self, message: &str) -> Result<InboundReply, ChatError> {
        let request = OutboundRequest {
            message: message.to_string(),
        };
        debug!("POST {} ({} bytes of message)", self.endpoint, message.len());

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ChatError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        if body.is_null() {
            return Err(ChatError::MalformedReply(
                "body is null, expected a JSON object".to_string(),
            ));
        }
        Ok(InboundReply::from(body))
    }
}
