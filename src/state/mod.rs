//! Browser state machine.
//!
//! Selection transitions and view derivation are pure functions; the
//! controller sequences them around data-source fetches.

pub mod controller;
pub mod selection;
pub mod session;
pub mod view_model;

// Re-export for convenience
pub use controller::{ApplyOutcome, BrowserController};
pub use selection::{on_item_click, ItemClick, SelectionState};
pub use session::SessionState;
pub use view_model::{ActionEvent, BrowserView, SelectionEntry, SortOption};
