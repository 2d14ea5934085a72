//! Derived view model handed to renderers.
//!
//! Nothing here is stored: [`build`] recomputes the whole view from the
//! session and the last applied page.

use crate::config::BrowserConfig;
use crate::model::{Generation, Record, RecordId, SortDirection};
use crate::state::session::SessionState;
use serde::Serialize;
use serde_json::Value;

/// One visible row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionEntry {
    /// The record itself.
    pub record: Record,
    /// Its identity.
    pub id: RecordId,
    /// Position on the current page.
    pub index: usize,
    /// Whether the row is selected.
    pub is_selected: bool,
    /// Whether the row renders expanded.
    pub is_expanded: bool,
}

/// A sort choice offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOption {
    /// Field name.
    pub value: String,
    /// Display label.
    pub label: String,
    /// Direction when this field is part of the active sort.
    pub active_direction: Option<SortDirection>,
}

/// An action-bar button with its enablement resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    /// Action triggered on click.
    pub action_name: String,
    /// Display label.
    pub label: Option<String>,
    /// Icon name.
    pub icon: Option<String>,
    /// Whether the button is disabled for the current selection.
    pub disabled: bool,
}

/// An action-bar link with its enablement resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    /// Target route.
    pub route: String,
    /// Display label.
    pub label: Option<String>,
    /// Whether the link is disabled for the current selection.
    pub disabled: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserView {
    /// Visible rows in display order.
    pub entries: Vec<SelectionEntry>,
    /// Records matching the filter.
    pub matched_count: usize,
    /// Selected ids.
    pub selected_count: usize,
    /// Index of the first visible row in the full result.
    pub first_index: usize,
    /// Records per page.
    pub page_size: usize,
    /// Pages in the window.
    pub page_count: usize,
    /// Generation of the visible page, if one was applied.
    pub generation: Option<Generation>,
    /// Expand-all flag.
    pub expanded: bool,
    /// Whether rows can be expanded one by one.
    pub expandable: bool,
    /// Sort choices.
    pub sort_options: Vec<SortOption>,
    /// List schema, untouched.
    pub list_schema: Option<Value>,
    /// Filter schema, untouched.
    pub filter_schema: Option<Value>,
    /// Action-bar buttons.
    pub buttons: Vec<ButtonView>,
    /// Action-bar links.
    pub links: Vec<LinkView>,
}

/// The visible page as the controller last applied it.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    /// Records in display order.
    pub records: &'a [Record],
    /// Ids parallel to `records`.
    pub ids: &'a [RecordId],
    /// Index of `records[0]` in the full result.
    pub first_index: usize,
    /// Records matching the filter.
    pub matched_count: usize,
    /// Generation the page was applied for.
    pub generation: Option<Generation>,
}

/// Derive the view for `page` under `session`.
pub fn build(config: &BrowserConfig, session: &SessionState, page: PageView<'_>) -> BrowserView {
    let selected_count = session.selection.len();

    let entries = page
        .records
        .iter()
        .zip(page.ids)
        .enumerate()
        .map(|(index, (record, id))| SelectionEntry {
            record: record.clone(),
            id: id.clone(),
            index,
            is_selected: session.selection.contains(id),
            is_expanded: session.is_expanded(id),
        })
        .collect();

    let sort_options = config
        .sortable_properties
        .iter()
        .map(|property| SortOption {
            value: property.name.clone(),
            label: property.label().to_string(),
            active_direction: session
                .sort
                .iter()
                .find(|d| d.key == property.name)
                .map(|d| d.direction),
        })
        .collect();

    let buttons = config
        .action_bar_buttons
        .iter()
        .map(|button| ButtonView {
            action_name: button.action_name.clone(),
            label: button.label.clone(),
            icon: button.icon.clone(),
            disabled: button.enabled.is_disabled(selected_count),
        })
        .collect();

    let links = config
        .action_bar_links
        .iter()
        .map(|link| LinkView {
            route: link.route.clone(),
            label: link.label.clone(),
            disabled: link.enabled.is_disabled(selected_count),
        })
        .collect();

    BrowserView {
        entries,
        matched_count: page.matched_count,
        selected_count,
        first_index: page.first_index,
        page_size: config.page_size,
        page_count: session.page_count,
        generation: page.generation,
        expanded: session.expanded,
        expandable: config.expandable,
        sort_options,
        list_schema: config.list_schema.clone(),
        filter_schema: config.filter_schema.clone(),
        buttons,
        links,
    }
}

// ===== Action events =====

/// Named action emitted upward. Receivers read the selection themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionEvent {
    /// Create a new record.
    Create,
    /// Edit the selected record(s).
    Edit,
    /// Delete the selected record(s).
    Delete,
    /// Show the selected record.
    Detail,
    /// Any other action-bar name.
    Custom(String),
}

impl ActionEvent {
    /// Map an action name to its event.
    pub fn from_name(name: &str) -> Self {
        match name {
            "create" => ActionEvent::Create,
            "edit" => ActionEvent::Edit,
            "delete" => ActionEvent::Delete,
            "detail" => ActionEvent::Detail,
            other => ActionEvent::Custom(other.to_string()),
        }
    }

    /// The action name.
    pub fn name(&self) -> &str {
        match self {
            ActionEvent::Create => "create",
            ActionEvent::Edit => "edit",
            ActionEvent::Delete => "delete",
            ActionEvent::Detail => "detail",
            ActionEvent::Custom(name) => name,
        }
    }
}
