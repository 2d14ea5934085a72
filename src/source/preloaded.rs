//! In-memory data source over a caller-owned snapshot.

use super::{DataSource, PendingQuery, Subscription, SubscriptionCallback};
use crate::config::AdapterConfig;
use crate::model::{DataSourceError, IdFn, Identity, QueryRequest, QueryResult, Record, RecordId};
use crate::query::QueryEngine;
use tracing::debug;

/// Runs the query engine synchronously over a snapshot of records.
///
/// Results come back as already-settled [`PendingQuery`]s. While a subscriber
/// is registered, every `get_data` call refreshes its last-known query, and
/// [`set_items`](Self::set_items) re-runs that query and pushes the outcome.
#[derive(Debug, Default)]
pub struct PreloadedDataSource {
    items: Vec<Record>,
    engine: QueryEngine,
    identity: Identity,
    custom_identity: bool,
    subscription: Subscription,
    disposed: bool,
}

impl PreloadedDataSource {
    /// Serve `items`.
    pub fn new(items: Vec<Record>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Derive ids with `id_fn` instead of the configured id field.
    pub fn with_id_fn(mut self, id_fn: IdFn) -> Self {
        self.identity = Identity::Custom(id_fn);
        self.custom_identity = true;
        self
    }

    /// Current snapshot.
    pub fn items(&self) -> &[Record] {
        &self.items
    }

    /// Whether [`dispose`](DataSource::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Replace the snapshot. When subscribed, the last-known query is re-run
    /// (same generation) and pushed to the subscriber.
    pub fn set_items(&mut self, items: Vec<Record>) {
        if self.disposed {
            debug!("ignoring set_items on disposed data source");
            return;
        }
        self.items = items;
        debug!(count = self.items.len(), "snapshot replaced");

        if let Some(query) = self.subscription.query().cloned() {
            let pending = self.get_data(&query);
            self.subscription.notify(pending);
        }
    }

    /// Push an externally computed result to the subscriber.
    ///
    /// Dropped (returns false) without a subscriber, or when its generation
    /// differs from the subscriber's last-known query.
    pub fn notify_with(&mut self, result: QueryResult) -> bool {
        let expected = match self.subscription.query() {
            Some(query) => query.generation,
            None => return false,
        };
        if result.generation != expected {
            debug!(
                pushed = %result.generation,
                expected = %expected,
                "dropping push for another generation"
            );
            return false;
        }
        self.subscription.notify(PendingQuery::ready(expected, Ok(result)))
    }
}

impl DataSource for PreloadedDataSource {
    fn get_data(&mut self, request: &QueryRequest) -> PendingQuery {
        if self.disposed {
            return PendingQuery::ready(request.generation, Err(DataSourceError::Disposed));
        }
        self.subscription.track(request);
        let result = self.engine.execute(&self.items, request);
        PendingQuery::ready(request.generation, Ok(result))
    }

    fn get_id(&self, record: &Record) -> RecordId {
        self.identity.id_of(record)
    }

    fn configure(&mut self, adapter: &AdapterConfig) {
        self.engine.set_types(adapter.field_types());
        if !self.custom_identity {
            self.identity = adapter.identity();
        }
    }

    fn subscribe(&mut self, query: QueryRequest, callback: SubscriptionCallback) {
        if !self.disposed {
            self.subscription.register(query, callback);
        }
    }

    fn unsubscribe(&mut self) {
        self.subscription.clear();
    }

    fn dispose(&mut self) {
        self.subscription.clear();
        self.items.clear();
        self.disposed = true;
    }
}
