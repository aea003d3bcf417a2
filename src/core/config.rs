//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.config/gtasks/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::store::SortKey;
use crate::store::http::DEFAULT_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GtasksConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub offline: OfflineConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub store: Option<StoreKind>,
    pub debounce_ms: Option<u64>,
    pub show_completed: Option<bool>,
    pub show_hidden: Option<bool>,
    pub sort_order: Option<Vec<SortKey>>,
    pub detail_height: Option<u16>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HttpConfig {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OfflineConfig {
    pub data_file: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Http,
    Offline,
}

/// Values taken from command-line flags (None/false = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub offline: bool,
    pub data_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_DETAIL_HEIGHT: u16 = 8;
pub const DEFAULT_SORT_ORDER: [SortKey; 3] = [
    SortKey::Alphabetical,
    SortKey::LastModified,
    SortKey::UncompletedFirst,
];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub store: StoreKind,
    pub debounce: Duration,
    pub show_completed: bool,
    pub show_hidden: bool,
    pub sort_order: Vec<SortKey>,
    pub detail_height: u16,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
    pub base_url: String,
    pub access_token: Option<String>,
    pub data_file: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.config/gtasks/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("gtasks"))
}

/// Returns the path to `~/.config/gtasks/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.config/gtasks/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `GtasksConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<GtasksConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(GtasksConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(GtasksConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<GtasksConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: GtasksConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# gtasks configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# store = "http"                     # "http" or "offline"
# debounce_ms = 300                  # delay before fetching tasks while scrolling lists
# show_completed = true
# show_hidden = false
# sort_order = ["alphabetical", "last-modified", "uncompleted-tasks"]  # also "due-date"
# detail_height = 8
# log_level = "info"

# [http]
# base_url = "https://tasks.googleapis.com/tasks/v1"
# access_token = "ya29...."          # Or set GTASKS_ACCESS_TOKEN env var

# [offline]
# data_file = "~/.config/gtasks/offline.json"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &GtasksConfig, cli: &CliOverrides) -> ResolvedConfig {
    let base_dir = config_dir().unwrap_or_else(|| PathBuf::from("."));

    // Store: CLI → env → config → default
    let store = if cli.offline {
        StoreKind::Offline
    } else {
        std::env::var("GTASKS_STORE")
            .ok()
            .and_then(|s| parse_store_kind(&s))
            .or(config.general.store)
            .unwrap_or(StoreKind::Http)
    };

    let debounce_ms = std::env::var("GTASKS_DEBOUNCE_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .or(config.general.debounce_ms)
        .unwrap_or(DEFAULT_DEBOUNCE_MS);

    // Access token: env → config
    let access_token = std::env::var("GTASKS_ACCESS_TOKEN")
        .ok()
        .or_else(|| config.http.access_token.clone());

    // Base URL: env → config → default
    let base_url = std::env::var("GTASKS_BASE_URL")
        .ok()
        .or_else(|| config.http.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Data file: CLI → env → config → default
    let data_file = cli
        .data_file
        .clone()
        .or_else(|| std::env::var("GTASKS_DATA_FILE").ok().map(PathBuf::from))
        .or_else(|| config.offline.data_file.as_deref().map(expand_home))
        .unwrap_or_else(|| base_dir.join("offline.json"));

    let sort_order = match &config.general.sort_order {
        Some(order) if !order.is_empty() => order.clone(),
        Some(_) => {
            warn!("Empty sort_order in config, using default");
            DEFAULT_SORT_ORDER.to_vec()
        }
        None => DEFAULT_SORT_ORDER.to_vec(),
    };

    let log_level = config
        .general
        .log_level
        .as_deref()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Debug);

    ResolvedConfig {
        store,
        debounce: Duration::from_millis(debounce_ms),
        show_completed: config.general.show_completed.unwrap_or(true),
        show_hidden: config.general.show_hidden.unwrap_or(false),
        sort_order,
        detail_height: config
            .general
            .detail_height
            .unwrap_or(DEFAULT_DETAIL_HEIGHT),
        log_level,
        log_file: cli
            .log_file
            .clone()
            .unwrap_or_else(|| base_dir.join("gtasks.log")),
        base_url,
        access_token,
        data_file,
    }
}

fn parse_store_kind(s: &str) -> Option<StoreKind> {
    match s.trim().to_ascii_lowercase().as_str() {
        "http" | "online" => Some(StoreKind::Http),
        "offline" | "memory" => Some(StoreKind::Offline),
        other => {
            warn!("Ignoring unknown store kind {:?}", other);
            None
        }
    }
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
