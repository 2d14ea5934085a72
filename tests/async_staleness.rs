//! Staleness and ordering against an asynchronous data source.
//!
//! `ChannelDataSource` parks every fetch on a `oneshot` channel so the test
//! decides when, and in which order, each request resolves.

use futures::channel::oneshot;
use futures::executor::block_on;
use futures::FutureExt;
use recbrowse::config::{AdapterConfig, BrowserConfig};
use recbrowse::model::{
    BrowserError, DataSourceError, FieldTypes, FilterSpec, Identity, QueryRequest, QueryResult,
    Record, RecordId, SortDirective,
};
use recbrowse::query::execute;
use recbrowse::source::{DataSource, PendingQuery, SubscriptionCallback};
use recbrowse::state::{ApplyOutcome, BrowserController};
use serde_json::{json, Value};

type Reply = oneshot::Sender<Result<QueryResult, DataSourceError>>;

/// Data source whose fetches resolve only when the test answers them.
#[derive(Default)]
struct ChannelDataSource {
    dataset: Vec<Record>,
    identity: Identity,
    waiting: Vec<(QueryRequest, Reply)>,
}

impl ChannelDataSource {
    fn new(dataset: Vec<Record>) -> Self {
        Self {
            dataset,
            ..Self::default()
        }
    }

    /// Take the oldest unanswered request.
    fn next_request(&mut self) -> (QueryRequest, Reply) {
        assert!(!self.waiting.is_empty(), "no request in flight");
        self.waiting.remove(0)
    }

    /// Answer `reply` with the engine's result for `request`.
    fn answer(&self, request: &QueryRequest, reply: Reply) {
        let result = execute(&self.dataset, request, &FieldTypes::default());
        let _ = reply.send(Ok(result));
    }
}

impl DataSource for ChannelDataSource {
    fn get_data(&mut self, request: &QueryRequest) -> PendingQuery {
        let (tx, rx) = oneshot::channel();
        self.waiting.push((request.clone(), tx));
        let future = rx
            .map(|answer| {
                answer.unwrap_or_else(|_| Err(DataSourceError::Unavailable("dropped".into())))
            })
            .boxed();
        PendingQuery::new(request.generation, future)
    }

    fn get_id(&self, record: &Record) -> RecordId {
        self.identity.id_of(record)
    }

    fn configure(&mut self, adapter: &AdapterConfig) {
        self.identity = adapter.identity();
    }

    fn subscribe(&mut self, _query: QueryRequest, _callback: SubscriptionCallback) {}

    fn unsubscribe(&mut self) {}

    fn dispose(&mut self) {
        self.waiting.clear();
    }
}

// ===== Test Fixtures =====

fn dataset() -> Vec<Record> {
    (0..6)
        .map(|i| Record::from_value(json!({"id": i, "even": i % 2 == 0})).unwrap())
        .collect()
}

fn ids(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .map(|r| r.get("id").and_then(Value::as_i64).unwrap_or(-1))
        .collect()
}

fn controller() -> BrowserController<ChannelDataSource> {
    let config = BrowserConfig {
        page_size: 3,
        ..BrowserConfig::default()
    };
    BrowserController::new(ChannelDataSource::new(dataset()), config)
}

// ===== Out-of-order resolution =====

#[test]
fn late_older_generation_is_discarded() {
    let mut ctrl = controller();

    // G1: even ids, G2: descending ids. Both in flight.
    let g1 = ctrl.set_filter(FilterSpec::equals("even", true)).unwrap();
    let (req1, reply1) = ctrl.source_mut().next_request();
    let g2 = ctrl.set_sort(vec![SortDirective::desc("id")]).unwrap();
    let (req2, reply2) = ctrl.source_mut().next_request();
    assert_eq!(req1.generation, g1.generation());
    assert_eq!(req2.generation, g2.generation());

    // G2 resolves first and lands.
    ctrl.source().answer(&req2, reply2);
    let outcome = block_on(ctrl.resolve(g2)).unwrap();
    assert!(matches!(outcome, ApplyOutcome::Applied { .. }));
    assert_eq!(ids(ctrl.records()), vec![4, 2, 0]);

    // G1 resolves afterwards and is dropped.
    ctrl.source().answer(&req1, reply1);
    let outcome = block_on(ctrl.resolve(g1)).unwrap();
    assert_eq!(outcome, ApplyOutcome::Stale);
    assert_eq!(ids(ctrl.records()), vec![4, 2, 0]);
    assert_eq!(ctrl.last_applied_generation(), Some(req2.generation));
}

#[test]
fn in_order_resolution_still_applies_only_latest() {
    let mut ctrl = controller();

    let g1 = ctrl.refresh().unwrap();
    let (req1, reply1) = ctrl.source_mut().next_request();
    let g2 = ctrl.next_page().unwrap();
    let (req2, reply2) = ctrl.source_mut().next_request();

    ctrl.source().answer(&req1, reply1);
    assert_eq!(block_on(ctrl.resolve(g1)).unwrap(), ApplyOutcome::Stale);
    assert!(ctrl.records().is_empty());

    ctrl.source().answer(&req2, reply2);
    block_on(ctrl.resolve(g2)).unwrap();
    assert_eq!(ids(ctrl.records()), vec![3, 4, 5]);
    assert_eq!(ctrl.matched_count(), 6);
}

#[test]
fn concurrent_futures_settle_independently_of_the_controller() {
    let mut ctrl = controller();

    let g1 = ctrl.load().unwrap();
    let (req1, reply1) = ctrl.source_mut().next_request();
    let g2 = ctrl.load_more().unwrap();
    let (req2, reply2) = ctrl.source_mut().next_request();

    // Both answered before either is awaited; settle them together.
    ctrl.source().answer(&req2, reply2);
    ctrl.source().answer(&req1, reply1);
    let (first, second) = block_on(futures::future::join(g1.resolve(), g2.resolve()));

    assert_eq!(ctrl.apply(second).unwrap(), ApplyOutcome::Applied { pruned: 0 });
    assert_eq!(ctrl.apply(first).unwrap(), ApplyOutcome::Stale);
    assert_eq!(ids(ctrl.records()), vec![0, 1, 2, 3, 4, 5]);
}

// ===== Rejection =====

#[test]
fn rejection_for_current_generation_surfaces_and_keeps_page() {
    let mut ctrl = controller();
    let pending = ctrl.load().unwrap();
    let (req, reply) = ctrl.source_mut().next_request();
    ctrl.source().answer(&req, reply);
    block_on(ctrl.resolve(pending)).unwrap();
    let before = ids(ctrl.records());

    let pending = ctrl.next_page().unwrap();
    let (_, reply) = ctrl.source_mut().next_request();
    let _ = reply.send(Err(DataSourceError::Rejected {
        reason: "quota".into(),
    }));
    let err = block_on(ctrl.resolve(pending)).unwrap_err();

    assert_eq!(
        err,
        BrowserError::Fetch(DataSourceError::Rejected {
            reason: "quota".into()
        })
    );
    assert_eq!(ids(ctrl.records()), before);
    assert_eq!(ctrl.matched_count(), 6);
}

#[test]
fn rejection_for_superseded_generation_is_stale() {
    let mut ctrl = controller();

    let g1 = ctrl.refresh().unwrap();
    let (_, reply1) = ctrl.source_mut().next_request();
    let _g2 = ctrl.refresh().unwrap();

    let _ = reply1.send(Err(DataSourceError::Unavailable("timeout".into())));
    assert_eq!(block_on(ctrl.resolve(g1)).unwrap(), ApplyOutcome::Stale);
}

#[test]
fn dropped_reply_is_reported_as_unavailable() {
    let mut ctrl = controller();

    let pending = ctrl.refresh().unwrap();
    let (_, reply) = ctrl.source_mut().next_request();
    drop(reply);

    let err = block_on(ctrl.resolve(pending)).unwrap_err();
    assert!(matches!(
        err,
        BrowserError::Fetch(DataSourceError::Unavailable(_))
    ));
}
