//! A data source with no records.

use super::{DataSource, PendingQuery, Subscription, SubscriptionCallback};
use crate::config::AdapterConfig;
use crate::model::{DataSourceError, Identity, QueryRequest, QueryResult, Record, RecordId};

/// Always answers with an empty, correctly stamped result.
#[derive(Debug, Default)]
pub struct EmptyDataSource {
    identity: Identity,
    subscription: Subscription,
    disposed: bool,
}

impl EmptyDataSource {
    /// A fresh empty source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataSource for EmptyDataSource {
    fn get_data(&mut self, request: &QueryRequest) -> PendingQuery {
        if self.disposed {
            return PendingQuery::ready(request.generation, Err(DataSourceError::Disposed));
        }
        self.subscription.track(request);
        PendingQuery::ready(request.generation, Ok(QueryResult::empty(request)))
    }

    fn get_id(&self, record: &Record) -> RecordId {
        self.identity.id_of(record)
    }

    fn configure(&mut self, adapter: &AdapterConfig) {
        self.identity = adapter.identity();
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
        self.disposed = true;
    }
}
