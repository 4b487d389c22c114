//! # Chatline Commands
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level subcommand, plus the connection options shared
//! by the commands that talk to a chat service.
//!
use crate::core::config::{self, Config};
use crate::core::error::Result;
use anyhow::Context;
use clap::Args;
use std::path::Path;
use tracing::debug;

/// Interactive chat session (`chatline chat`, the default command).
pub mod chat;
/// One-shot exchange (`chatline send <text>`).
pub mod send;
/// Local development chat service (`chatline serve`).
pub mod serve;

/// Options shared by `chat` and `send`.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Chat service URL that messages are POSTed to.
    /// Overrides `endpoint` from the configuration files.
    #[arg(long, short, env = "CHATLINE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Hide the `[HH:MM:SS]` prefix in front of each message.
    #[arg(long)]
    pub no_timestamps: bool,
}

impl ConnectionArgs {
    /// # Resolve Connection Settings (`resolve`)
    ///
    /// Loads the layered configuration, applies these flags on top and
    /// validates the result.
    ///
    /// ## Arguments
    ///
    /// * `config_path` - The global `--config` file, if one was given.
    ///
    /// ## Errors
    ///
    /// Returns an error when a config file cannot be loaded, or when the
    /// effective endpoint or labels are invalid after the flags are applied.
    pub fn resolve(&self, config_path: Option<&Path>) -> Result<Config> {
        self.apply(config::load_config(config_path)?)
    }

    /// Applies these flags to `cfg` and validates the client settings.
    fn apply(&self, mut cfg: Config) -> Result<Config> {
        if let Some(endpoint) = &self.endpoint {
            debug!("Endpoint overridden from command line: {}", endpoint);
            cfg.endpoint = endpoint.clone();
        }
        if self.no_timestamps {
            cfg.display.show_timestamps = false;
        }
        config::validate_client_config(&cfg).context("Configuration validation failed")?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_endpoint(endpoint: &str) -> Config {
        Config {
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_flag_replaces_invalid_configured_endpoint() {
        let args = ConnectionArgs {
            endpoint: Some("http://127.0.0.1:5001/chat".to_string()),
            no_timestamps: true,
        };
        let cfg = args.apply(with_endpoint("ftp://old.example/chat")).unwrap();
        assert_eq!(cfg.endpoint, "http://127.0.0.1:5001/chat");
        assert!(!cfg.display.show_timestamps);
    }

    #[test]
    fn test_invalid_endpoint_without_flag_is_rejected() {
        let err = ConnectionArgs::default()
            .apply(with_endpoint("ftp://old.example/chat"))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_invalid_endpoint_flag_is_rejected() {
        let args = ConnectionArgs {
            endpoint: Some("not a url".to_string()),
            no_timestamps: false,
        };
        assert!(args.apply(Config::default()).is_err());
    }
}
