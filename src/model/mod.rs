//! Domain model types (pure).
//!
//! All types in this module are plain data; behaviour lives in `query` and `state`.

pub mod error;
pub mod filter;
pub mod query;
pub mod record;
pub mod sort;
pub mod value;

// Re-export for convenience
pub use error::{AppError, BrowserError, DataSourceError, InputError};
pub use filter::{FilterForm, FilterKind, FilterSource, FilterSpec, FilterTypes};
pub use query::{FieldTypes, Generation, QueryRequest, QueryResult};
pub use record::{IdFn, Identity, Record, RecordId};
pub use sort::{SortDirection, SortDirective, SortKind, SortTypes};
