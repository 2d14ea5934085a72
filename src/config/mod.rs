//! Configuration module.
//!
//! [`BrowserConfig`] is the fully resolved browser setup; [`loader`] turns a
//! TOML file, environment and CLI flags into one.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};

use crate::model::{
    FieldTypes, FilterForm, FilterTypes, Identity, RecordId, SortDirective, SortTypes,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Records per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Key of the item array inside an item document.
pub const DEFAULT_ITEMS_PROP: &str = "items";

/// Field holding a record's identity.
pub const DEFAULT_ID_FIELD: &str = "id";

// ===== Data adapter =====

/// Which kind of data source backs the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataAdapterKind {
    /// In-memory snapshot handed over by the caller.
    #[default]
    Preloaded,
    /// Caller-provided data source.
    Custom,
    /// Results pushed from outside through a subscription.
    External,
}

/// Settings a data source receives from the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Adapter kind.
    pub kind: DataAdapterKind,
    /// Key of the item array inside an item document.
    pub items_prop: String,
    /// Field holding a record's identity.
    pub id_field: String,
    /// Sort kind overrides.
    pub sort_types: SortTypes,
    /// Filter kind overrides.
    pub filter_types: FilterTypes,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            kind: DataAdapterKind::default(),
            items_prop: DEFAULT_ITEMS_PROP.to_string(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            sort_types: SortTypes::new(),
            filter_types: FilterTypes::new(),
        }
    }
}

impl AdapterConfig {
    /// Kind overrides in the shape the query engine consumes.
    pub fn field_types(&self) -> FieldTypes {
        FieldTypes {
            sort_types: self.sort_types.clone(),
            filter_types: self.filter_types.clone(),
        }
    }

    /// Identity extraction based on `id_field`.
    pub fn identity(&self) -> Identity {
        Identity::Field(self.id_field.clone())
    }
}

// ===== Initial state =====

/// Session state the browser starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialState {
    /// Sort directives, primary first.
    pub sort: Vec<SortDirective>,
    /// Raw filter form.
    pub filter: FilterForm,
    /// Ids selected at start.
    pub selection: Vec<RecordId>,
    /// First record index.
    pub first_index: usize,
    /// Pages per window. Never zero.
    pub page_count: usize,
    /// Expand-all flag.
    pub expanded: bool,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            sort: Vec::new(),
            filter: FilterForm::new(),
            selection: Vec::new(),
            first_index: 0,
            page_count: 1,
            expanded: false,
        }
    }
}

// ===== Action bar =====

/// When an action-bar entry is enabled, by selection size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnabledPolicy {
    /// Always enabled.
    #[default]
    Always,
    /// Enabled with exactly one selected row.
    Single,
    /// Enabled with at least one selected row.
    Multi,
    /// Unrecognized policy name; always disabled.
    Unknown(String),
}

impl EnabledPolicy {
    /// Whether an entry with this policy is disabled for `selected` rows.
    pub fn is_disabled(&self, selected: usize) -> bool {
        match self {
            EnabledPolicy::Always => false,
            EnabledPolicy::Single => selected != 1,
            EnabledPolicy::Multi => selected < 1,
            EnabledPolicy::Unknown(_) => true,
        }
    }
}

impl From<String> for EnabledPolicy {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "always" => EnabledPolicy::Always,
            "single" => EnabledPolicy::Single,
            "multi" => EnabledPolicy::Multi,
            _ => EnabledPolicy::Unknown(raw),
        }
    }
}

impl From<EnabledPolicy> for String {
    fn from(policy: EnabledPolicy) -> Self {
        match policy {
            EnabledPolicy::Always => "always".to_string(),
            EnabledPolicy::Single => "single".to_string(),
            EnabledPolicy::Multi => "multi".to_string(),
            EnabledPolicy::Unknown(raw) => raw,
        }
    }
}

/// A button in the action bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionBarButton {
    /// Action triggered on click (`create`, `edit`, `delete`, `detail` or custom).
    pub action_name: String,
    /// Enablement policy.
    #[serde(default)]
    pub enabled: EnabledPolicy,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,
}

/// A navigation link in the action bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionBarLink {
    /// Target route.
    pub route: String,
    /// Enablement policy.
    #[serde(default)]
    pub enabled: EnabledPolicy,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
}

/// A property the user may sort by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortableProperty {
    /// Record field.
    pub name: String,
    /// Display label; the field name when absent.
    #[serde(default)]
    pub label: Option<String>,
}

impl SortableProperty {
    /// Label shown for this property.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

// ===== BrowserConfig =====

/// Fully resolved browser configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    /// Starting session state.
    pub initial_state: InitialState,
    /// Records per page. Never zero.
    pub page_size: usize,
    /// Data source settings.
    pub data_adapter: AdapterConfig,
    /// Sort options offered to the user.
    pub sortable_properties: Vec<SortableProperty>,
    /// List rendering schema, passed through untouched.
    pub list_schema: Option<Value>,
    /// Filter form schema, passed through untouched.
    pub filter_schema: Option<Value>,
    /// Whether rows can be expanded individually.
    pub expandable: bool,
    /// Action bar buttons.
    pub action_bar_buttons: Vec<ActionBarButton>,
    /// Action bar links.
    pub action_bar_links: Vec<ActionBarLink>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            initial_state: InitialState::default(),
            page_size: DEFAULT_PAGE_SIZE,
            data_adapter: AdapterConfig::default(),
            sortable_properties: Vec::new(),
            list_schema: None,
            filter_schema: None,
            expandable: false,
            action_bar_buttons: Vec::new(),
            action_bar_links: Vec::new(),
        }
    }
}
