//! Record browser (recbrowse)
//!
//! Query and state engine for browsing a collection of records: filter by
//! field predicates, sort by several keys, page through results and track a
//! selection, while fetches may resolve out of order.
//!
//! Pure core (`model`, `query`, `state`) with a thin impure shell (`source`,
//! `config`, `logging`, the `recbrowse` binary).

pub mod config;
pub mod logging;
pub mod model;
pub mod query;
pub mod source;
pub mod state;

#[cfg(test)]
mod test_harness;
