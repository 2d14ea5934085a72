//! Configuration file loading with precedence handling.

use crate::config::{
    ActionBarButton, ActionBarLink, AdapterConfig, BrowserConfig, DataAdapterKind, InitialState,
    SortableProperty,
};
use crate::model::{FilterForm, FilterTypes, RecordId, SortDirective, SortTypes};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RECBROWSE_CONFIG";

/// Environment variable overriding the page size.
pub const PAGE_SIZE_ENV: &str = "RECBROWSE_PAGE_SIZE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending key.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/recbrowse/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Session state to start from.
    #[serde(default)]
    pub initial_state: Option<InitialStateSection>,

    /// Records per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Data source settings.
    #[serde(default)]
    pub data_adapter: Option<DataAdapterSection>,

    /// Sort options offered to the user.
    #[serde(default)]
    pub sortable_properties: Option<Vec<SortableProperty>>,

    /// List rendering schema (opaque).
    #[serde(default)]
    pub list_schema: Option<serde_json::Value>,

    /// Filter form schema (opaque).
    #[serde(default)]
    pub filter_schema: Option<serde_json::Value>,

    /// Whether rows expand individually.
    #[serde(default)]
    pub expandable: Option<bool>,

    /// Action bar buttons.
    #[serde(default)]
    pub action_bar_buttons: Option<Vec<ActionBarButton>>,

    /// Action bar links.
    #[serde(default)]
    pub action_bar_links: Option<Vec<ActionBarLink>>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// `[initial_state]` section.
///
/// ```toml
/// [initial_state]
/// sort = [{ key = "name", direction = "desc" }]
/// filter = { team = "red" }
/// page_count = 2
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InitialStateSection {
    /// Sort directives, primary first.
    #[serde(default)]
    pub sort: Option<Vec<SortDirective>>,
    /// Raw filter form.
    #[serde(default)]
    pub filter: Option<FilterForm>,
    /// Ids selected at start.
    #[serde(default)]
    pub selection: Option<Vec<RecordId>>,
    /// First record index.
    #[serde(default)]
    pub first_index: Option<usize>,
    /// Pages per window.
    #[serde(default)]
    pub page_count: Option<usize>,
    /// Expand-all flag.
    #[serde(default)]
    pub expanded: Option<bool>,
}

/// `[data_adapter]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DataAdapterSection {
    /// Adapter kind (`preloaded`, `custom` or `external`).
    #[serde(default, rename = "type")]
    pub kind: Option<DataAdapterKind>,
    /// Key of the item array inside an item document.
    #[serde(default)]
    pub items_prop: Option<String>,
    /// Field holding a record's identity.
    #[serde(default)]
    pub id_field: Option<String>,
    /// Sort kind per field.
    #[serde(default)]
    pub sort_types: Option<SortTypes>,
    /// Filter kind per field.
    #[serde(default)]
    pub filter_types: Option<FilterTypes>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Browser setup.
    pub browser: BrowserConfig,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/recbrowse/recbrowse.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("recbrowse").join("recbrowse.log")
    } else {
        PathBuf::from("recbrowse.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/recbrowse/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("recbrowse").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (like CLI `--config`)
/// 2. `RECBROWSE_CONFIG` environment variable
/// 3. Default path `~/.config/recbrowse/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for a zero `page_size` or
/// `initial_state.page_count`.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let browser = defaults.browser;
    let page_size = config.page_size.unwrap_or(browser.page_size);
    if page_size == 0 {
        return Err(positive("page_size"));
    }

    let initial = config.initial_state.unwrap_or_default();
    let initial_state = InitialState {
        sort: initial.sort.unwrap_or(browser.initial_state.sort),
        filter: initial.filter.unwrap_or(browser.initial_state.filter),
        selection: initial.selection.unwrap_or(browser.initial_state.selection),
        first_index: initial.first_index.unwrap_or(browser.initial_state.first_index),
        page_count: initial.page_count.unwrap_or(browser.initial_state.page_count),
        expanded: initial.expanded.unwrap_or(browser.initial_state.expanded),
    };
    if initial_state.page_count == 0 {
        return Err(positive("initial_state.page_count"));
    }

    let adapter = config.data_adapter.unwrap_or_default();
    let defaults_adapter = browser.data_adapter;
    let data_adapter = AdapterConfig {
        kind: adapter.kind.unwrap_or(defaults_adapter.kind),
        items_prop: adapter.items_prop.unwrap_or(defaults_adapter.items_prop),
        id_field: adapter.id_field.unwrap_or(defaults_adapter.id_field),
        sort_types: adapter.sort_types.unwrap_or(defaults_adapter.sort_types),
        filter_types: adapter.filter_types.unwrap_or(defaults_adapter.filter_types),
    };

    Ok(ResolvedConfig {
        browser: BrowserConfig {
            initial_state,
            page_size,
            data_adapter,
            sortable_properties: config
                .sortable_properties
                .unwrap_or(browser.sortable_properties),
            list_schema: config.list_schema.or(browser.list_schema),
            filter_schema: config.filter_schema.or(browser.filter_schema),
            expandable: config.expandable.unwrap_or(browser.expandable),
            action_bar_buttons: config
                .action_bar_buttons
                .unwrap_or(browser.action_bar_buttons),
            action_bar_links: config.action_bar_links.unwrap_or(browser.action_bar_links),
        },
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    })
}

fn positive(field: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: "must be at least 1".to_string(),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `RECBROWSE_PAGE_SIZE`: Override page size (ignored unless a positive integer)
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(PAGE_SIZE_ENV) {
        match raw.trim().parse::<usize>() {
            Ok(size) if size > 0 => config.browser.page_size = size,
            _ => tracing::warn!(value = %raw, "ignoring invalid RECBROWSE_PAGE_SIZE"),
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for a zero page size.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    page_size_override: Option<usize>,
) -> Result<ResolvedConfig, ConfigError> {
    if let Some(page_size) = page_size_override {
        if page_size == 0 {
            return Err(positive("page_size"));
        }
        config.browser.page_size = page_size;
    }

    Ok(config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
