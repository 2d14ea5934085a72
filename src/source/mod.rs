//! Record data sources.
//!
//! This module provides the [`DataSource`] contract the browser fetches through:
//! - [`PreloadedDataSource`] for an in-memory snapshot (also serves pushed results)
//! - [`EmptyDataSource`] as the placeholder for caller-provided backends
//! - [`items`] for reading item documents from disk
//!
//! Every fetch is asynchronous from the caller's point of view: `get_data`
//! returns a [`PendingQuery`] whose future resolves to a result stamped with
//! the request's generation.

use crate::config::{AdapterConfig, DataAdapterKind};
use crate::model::{DataSourceError, Generation, QueryRequest, QueryResult, Record, RecordId};
use futures::future::{self, BoxFuture, FutureExt};
use std::fmt;
use tracing::debug;

pub mod empty;
pub mod items;
pub mod preloaded;

pub use empty::EmptyDataSource;
pub use items::{load_items, parse_items};
pub use preloaded::PreloadedDataSource;

/// Future produced by a fetch.
pub type QueryFuture = BoxFuture<'static, Result<QueryResult, DataSourceError>>;

/// Receiver of re-queries a data source initiates on its own.
pub type SubscriptionCallback = Box<dyn FnMut(PendingQuery) + Send>;

// ===== PendingQuery =====

/// An in-flight fetch, tagged with the generation it was issued for.
pub struct PendingQuery {
    generation: Generation,
    future: QueryFuture,
}

/// A settled fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Generation the fetch was issued for.
    pub generation: Generation,
    /// What the data source produced.
    pub result: Result<QueryResult, DataSourceError>,
}

impl PendingQuery {
    /// Wrap an arbitrary future.
    pub fn new(generation: Generation, future: QueryFuture) -> Self {
        Self { generation, future }
    }

    /// An already-settled fetch.
    pub fn ready(generation: Generation, result: Result<QueryResult, DataSourceError>) -> Self {
        Self::new(generation, future::ready(result).boxed())
    }

    /// Generation the fetch was issued for.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Wait for the data source.
    pub async fn resolve(self) -> FetchOutcome {
        FetchOutcome {
            generation: self.generation,
            result: self.future.await,
        }
    }
}

impl fmt::Debug for PendingQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingQuery")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

// ===== DataSource =====

/// Where the browser gets its records from.
///
/// Implementations must stamp every result with the generation of the request
/// that produced it. They hold at most one subscriber.
pub trait DataSource {
    /// Start a fetch for `request`.
    fn get_data(&mut self, request: &QueryRequest) -> PendingQuery;

    /// Identity of `record`.
    fn get_id(&self, record: &Record) -> RecordId;

    /// Accept the browser's adapter settings.
    fn configure(&mut self, adapter: &AdapterConfig);

    /// Register the one callback for source-initiated re-queries, replacing
    /// any previous registration. `query` is the last-known request.
    fn subscribe(&mut self, query: QueryRequest, callback: SubscriptionCallback);

    /// Drop the registered callback, if any.
    fn unsubscribe(&mut self);

    /// Release the subscription and any held data. Later fetches fail.
    fn dispose(&mut self);
}

impl<D: DataSource + ?Sized> DataSource for Box<D> {
    fn get_data(&mut self, request: &QueryRequest) -> PendingQuery {
        (**self).get_data(request)
    }

    fn get_id(&self, record: &Record) -> RecordId {
        (**self).get_id(record)
    }

    fn configure(&mut self, adapter: &AdapterConfig) {
        (**self).configure(adapter)
    }

    fn subscribe(&mut self, query: QueryRequest, callback: SubscriptionCallback) {
        (**self).subscribe(query, callback)
    }

    fn unsubscribe(&mut self) {
        (**self).unsubscribe()
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}

// ===== Subscription =====

/// Single-slot subscriber registry shared by the bundled data sources.
#[derive(Default)]
pub struct Subscription {
    active: Option<(QueryRequest, SubscriptionCallback)>,
}

impl Subscription {
    /// Register `callback`; returns true when it replaced an earlier one.
    pub fn register(&mut self, query: QueryRequest, callback: SubscriptionCallback) -> bool {
        let replaced = self.active.replace((query, callback)).is_some();
        debug!(replaced, "subscriber registered");
        replaced
    }

    /// Drop the subscriber; returns true when one was registered.
    pub fn clear(&mut self) -> bool {
        let cleared = self.active.take().is_some();
        if cleared {
            debug!("subscriber removed");
        }
        cleared
    }

    /// Whether a subscriber is registered.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Last-known query of the subscriber.
    pub fn query(&self) -> Option<&QueryRequest> {
        self.active.as_ref().map(|(query, _)| query)
    }

    /// Remember `request` as the subscriber's last-known query.
    pub fn track(&mut self, request: &QueryRequest) {
        if let Some((query, _)) = self.active.as_mut() {
            *query = request.clone();
        }
    }

    /// Hand `pending` to the subscriber; returns false when there is none.
    pub fn notify(&mut self, pending: PendingQuery) -> bool {
        match self.active.as_mut() {
            Some((_, callback)) => {
                debug!(generation = %pending.generation(), "pushing re-query to subscriber");
                callback(pending);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("query", &self.query())
            .finish()
    }
}

/// Build the bundled data source for `adapter`, already configured.
///
/// `custom` adapters get an [`EmptyDataSource`] until the caller supplies
/// their own implementation.
pub fn for_adapter(adapter: &AdapterConfig, items: Vec<Record>) -> Box<dyn DataSource + Send> {
    let mut source: Box<dyn DataSource + Send> = match adapter.kind {
        DataAdapterKind::Preloaded | DataAdapterKind::External => {
            Box::new(PreloadedDataSource::new(items))
        }
        DataAdapterKind::Custom => Box::new(EmptyDataSource::new()),
    };
    source.configure(adapter);
    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilterSource;
    use crate::test_harness::numbered;
    use futures::executor::block_on;
    use std::sync::{Arc, Mutex};

    fn request(generation: u64) -> QueryRequest {
        QueryRequest {
            filter: FilterSource::default(),
            sort: vec![],
            first_index: 0,
            page_count: 1,
            page_size: 10,
            generation: Generation::new(generation),
        }
    }

    #[test]
    fn ready_query_resolves_with_its_generation() {
        let pending = PendingQuery::ready(Generation::new(3), Err(DataSourceError::Disposed));

        let outcome = block_on(pending.resolve());

        assert_eq!(outcome.generation, Generation::new(3));
        assert_eq!(outcome.result, Err(DataSourceError::Disposed));
    }

    #[test]
    fn subscription_holds_one_subscriber() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let mut subscription = Subscription::default();

        let first = Arc::clone(&hits);
        assert!(!subscription.register(
            request(1),
            Box::new(move |p| first.lock().unwrap().push(("first", p.generation())))
        ));
        let second = Arc::clone(&hits);
        assert!(subscription.register(
            request(1),
            Box::new(move |p| second.lock().unwrap().push(("second", p.generation())))
        ));

        assert!(subscription.notify(PendingQuery::ready(
            Generation::new(1),
            Err(DataSourceError::Disposed)
        )));

        assert_eq!(*hits.lock().unwrap(), vec![("second", Generation::new(1))]);
    }

    #[test]
    fn subscription_tracks_last_query_only_while_active() {
        let mut subscription = Subscription::default();
        subscription.track(&request(5));
        assert!(subscription.query().is_none());

        subscription.register(request(1), Box::new(|_| {}));
        subscription.track(&request(5));
        assert_eq!(subscription.query().map(|q| q.generation), Some(Generation::new(5)));

        assert!(subscription.clear());
        assert!(!subscription.is_active());
        assert!(!subscription.notify(PendingQuery::ready(
            Generation::new(5),
            Err(DataSourceError::Disposed)
        )));
    }

    #[test]
    fn custom_adapter_yields_empty_results() {
        let adapter = AdapterConfig {
            kind: DataAdapterKind::Custom,
            ..AdapterConfig::default()
        };
        let mut source = for_adapter(&adapter, numbered(5, 1));

        let outcome = block_on(source.get_data(&request(2)).resolve());

        let result = outcome.result.unwrap();
        assert!(result.records.is_empty());
        assert_eq!(result.generation, Generation::new(2));
    }

    #[test]
    fn preloaded_adapter_serves_items() {
        let mut source = for_adapter(&AdapterConfig::default(), numbered(5, 1));

        let outcome = block_on(source.get_data(&request(2)).resolve());

        assert_eq!(outcome.result.unwrap().matched_count, 5);
    }
}
