//! Query engine (pure).
//!
//! Filtering, sorting and paging over an in-memory snapshot. Nothing here
//! performs I/O or holds state between calls.

pub mod engine;
pub mod filter;
pub mod sort;

// Re-export for convenience
pub use engine::{execute, QueryEngine};
pub use filter::{compile_form, Predicate};
pub use sort::{CompiledSort, FieldComparator};
