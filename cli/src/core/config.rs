//! # Chatline Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates Chatline's configuration. Settings
//! come from several layers, later layers overriding earlier ones field by field:
//!
//! 1. Default values defined in the code
//! 2. User-specific `<config dir>/chatline/config.toml` (or `--config <path>`)
//! 3. Project-specific `.chatline.toml` in the current directory or ancestors
//! 4. Command-line flags (applied by the command handlers)
//!
//! ## Examples
//!
//! ```toml
//! endpoint = "http://127.0.0.1:5001/chat"
//!
//! [display]
//! show_timestamps = false
//! bot_label = "quinn"
//!
//! [service]
//! port = 5002
//! enable_cors = false
//! ```
//!
//! ```rust
//! let cfg = config::load_config(None)?;
//! let endpoint = &cfg.endpoint;
//! ```
//!
use crate::core::error::{ChatError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::IpAddr;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Default address of the chat service the widget talks to.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5001/chat";

const PROJECT_CONFIG_FILENAME: &str = ".chatline.toml";

/// The effective configuration after all layers have been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// URL that chat messages are POSTed to.
    pub endpoint: String,
    pub display: DisplayConfig,
    pub service: ServiceConfig,
}

/// How the terminal transcript renders messages.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub show_timestamps: bool,
    pub user_label: String,
    pub bot_label: String,
}

/// Settings for the `chatline serve` development service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            display: DisplayConfig::default(),
            service: ServiceConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            user_label: "you".to_string(),
            bot_label: "bot".to_string(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 5001,
            enable_cors: true,
        }
    }
}

/// One configuration file as written on disk. Every field is optional so a
/// file only overrides what it mentions.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    #[serde(default)]
    display: FileDisplayConfig,
    #[serde(default)]
    service: FileServiceConfig,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileDisplayConfig {
    show_timestamps: Option<bool>,
    user_label: Option<String>,
    bot_label: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileServiceConfig {
    host: Option<IpAddr>,
    port: Option<u16>,
    enable_cors: Option<bool>,
}

/// # Load Configuration (`load_config`)
///
/// Merges the defaults, the user config file and the nearest project
/// `.chatline.toml` into one `Config`. The project file is searched for from
/// the current working directory.
///
/// The result is not validated here. Command-line flags still have to be
/// applied on top, so each command validates the settings it uses afterwards
/// with [`validate_client_config`] or [`validate_service_config`].
///
/// ## Arguments
///
/// * `user_config` - Replaces the platform user config path when given (the
///   `--config` flag). Unlike the default path, this file must exist.
///
/// ## Returns
///
/// * `Result<Config>` - The merged configuration.
///
/// ## Errors
///
/// Returns an error if the current directory cannot be read, or if a config
/// file that is present cannot be read or parsed (including unknown keys).
pub fn load_config(user_config: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    load_config_from(user_config, &cwd)
}

/// Same as [`load_config`] but searches for the project file from `start_dir`.
pub fn load_config_from(user_config: Option<&Path>, start_dir: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(user) = load_user_config(user_config)? {
        apply_file_config(&mut config, user);
    }
    if let Some(path) = find_project_config_path(start_dir) {
        info!("Loading project configuration from: {}", path.display());
        apply_file_config(&mut config, load_config_from_path(&path)?);
    } else {
        debug!("No project configuration file ({PROJECT_CONFIG_FILENAME}) found.");
    }

    debug!("Merged configuration from files: {:?}", config);
    Ok(config)
}

fn load_user_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    if let Some(path) = explicit {
        // An explicitly requested file has to exist.
        info!("Loading configuration from: {}", path.display());
        return load_config_from_path(path).map(Some);
    }
    let Some(proj_dirs) = ProjectDirs::from("com", "Chatline", "chatline") else {
        warn!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.exists() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

/// Walks up from `start` looking for `.chatline.toml`, stopping at the first
/// directory that contains `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn apply_file_config(config: &mut Config, file: FileConfig) {
    if let Some(endpoint) = file.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(v) = file.display.show_timestamps {
        config.display.show_timestamps = v;
    }
    if let Some(v) = file.display.user_label {
        config.display.user_label = v;
    }
    if let Some(v) = file.display.bot_label {
        config.display.bot_label = v;
    }
    if let Some(v) = file.service.host {
        config.service.host = v;
    }
    if let Some(v) = file.service.port {
        config.service.port = v;
    }
    if let Some(v) = file.service.enable_cors {
        config.service.enable_cors = v;
    }
}

/// Checks that `endpoint` is an absolute `http`/`https` URL.
pub fn validate_endpoint(endpoint: &str) -> std::result::Result<(), ChatError> {
    let url = reqwest::Url::parse(endpoint).map_err(|e| ChatError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ChatError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Checks the settings used by the chat widget: the endpoint and the
/// transcript labels.
pub fn validate_client_config(config: &Config) -> Result<()> {
    validate_endpoint(&config.endpoint)?;
    if config.display.user_label.trim().is_empty() || config.display.bot_label.trim().is_empty() {
        return Err(anyhow!(ChatError::Config(
            "Display labels must not be empty.".to_string()
        )));
    }
    Ok(())
}

/// Checks the settings used by `chatline serve`.
pub fn validate_service_config(service: &ServiceConfig) -> Result<()> {
    if service.port == 0 {
        return Err(anyhow!(ChatError::Config(
            "Service port must be non-zero.".to_string()
        )));
    }
    Ok(())
}
