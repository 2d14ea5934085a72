//! Browser controller: the state machine tying session, data source and page.
//!
//! Every event that needs a new page bumps the session generation and returns
//! a [`PendingQuery`]. The caller drives it (any executor will do) and hands
//! the outcome back through [`BrowserController::apply`] or
//! [`BrowserController::resolve`]. Outcomes for any generation other than the
//! current one are dropped, so the last intent wins regardless of arrival
//! order.

use crate::config::BrowserConfig;
use crate::model::{
    BrowserError, FilterForm, FilterSource, Generation, Record, RecordId, SortDirective,
};
use crate::source::{DataSource, FetchOutcome, PendingQuery};
use crate::state::selection::{on_item_click, ItemClick, SelectionState};
use crate::state::session::SessionState;
use crate::state::view_model::{self, ActionEvent, BrowserView, PageView};
use futures::channel::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, trace, warn};

/// What [`BrowserController::apply`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The page was replaced.
    Applied {
        /// Selected ids dropped because they left the page.
        pruned: usize,
    },
    /// The outcome belonged to a superseded generation.
    Stale,
}

/// Owns one browsing session over one data source.
pub struct BrowserController<D: DataSource> {
    source: D,
    config: BrowserConfig,
    session: SessionState,
    records: Vec<Record>,
    page_ids: Vec<RecordId>,
    page_first_index: usize,
    matched_count: usize,
    last_applied: Option<Generation>,
    pushed: UnboundedReceiver<PendingQuery>,
    disposed: bool,
}

impl<D: DataSource> BrowserController<D> {
    /// Configure `source` for `config` and subscribe to its pushes.
    ///
    /// Nothing is fetched until [`load`](Self::load) or another event.
    pub fn new(mut source: D, config: BrowserConfig) -> Self {
        let session = SessionState::from_initial(&config.initial_state);
        source.configure(&config.data_adapter);

        let (tx, rx) = mpsc::unbounded();
        source.subscribe(
            session.to_request(config.page_size),
            Box::new(move |pending| {
                // Receiver gone means the controller was dropped.
                let _ = tx.unbounded_send(pending);
            }),
        );

        Self {
            source,
            config,
            session,
            records: Vec::new(),
            page_ids: Vec::new(),
            page_first_index: 0,
            matched_count: 0,
            last_applied: None,
            pushed: rx,
            disposed: false,
        }
    }

    // ===== Accessors =====

    /// Current session.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Resolved configuration.
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Current generation token.
    pub fn generation(&self) -> Generation {
        self.session.generation
    }

    /// Generation of the visible page, if any was applied.
    pub fn last_applied_generation(&self) -> Option<Generation> {
        self.last_applied
    }

    /// Visible records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Ids of the visible records, in display order.
    pub fn page_ids(&self) -> &[RecordId] {
        &self.page_ids
    }

    /// Records matching the filter, as of the last applied page.
    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionState {
        &self.session.selection
    }

    /// The underlying data source.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// The underlying data source, mutably (e.g. to replace a snapshot).
    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ===== Query events =====

    /// Fetch the page for the current session without changing it.
    pub fn load(&mut self) -> Result<PendingQuery, BrowserError> {
        self.issue()
    }

    /// Replace the filter.
    pub fn set_filter(
        &mut self,
        filter: impl Into<FilterSource>,
    ) -> Result<PendingQuery, BrowserError> {
        self.ensure_live()?;
        self.session.filter = filter.into();
        self.session.bump();
        self.issue()
    }

    /// Replace the filter with a raw form.
    pub fn set_filter_form(&mut self, form: FilterForm) -> Result<PendingQuery, BrowserError> {
        self.set_filter(FilterSource::Form(form))
    }

    /// Replace the sort and return to the first page.
    pub fn set_sort(&mut self, sort: Vec<SortDirective>) -> Result<PendingQuery, BrowserError> {
        self.ensure_live()?;
        self.session.sort = sort;
        self.session.first_index = 0;
        self.session.page_count = 1;
        self.session.bump();
        self.issue()
    }

    /// Grow the window by one page.
    pub fn load_more(&mut self) -> Result<PendingQuery, BrowserError> {
        self.ensure_live()?;
        self.session.page_count = self.session.page_count.saturating_add(1);
        self.session.bump();
        self.issue()
    }

    /// Move the window forward one page.
    pub fn next_page(&mut self) -> Result<PendingQuery, BrowserError> {
        let target = self.session.first_index.saturating_add(self.config.page_size);
        self.go_to_index(target)
    }

    /// Move the window back one page, stopping at zero.
    pub fn prev_page(&mut self) -> Result<PendingQuery, BrowserError> {
        let target = self.session.first_index.saturating_sub(self.config.page_size);
        self.go_to_index(target)
    }

    /// Start a single-page window at `first_index`.
    pub fn go_to_index(&mut self, first_index: usize) -> Result<PendingQuery, BrowserError> {
        self.ensure_live()?;
        self.session.first_index = first_index;
        self.session.page_count = 1;
        self.session.bump();
        self.issue()
    }

    /// Re-run the current query under a new generation.
    pub fn refresh(&mut self) -> Result<PendingQuery, BrowserError> {
        self.ensure_live()?;
        self.session.bump();
        self.issue()
    }

    fn issue(&mut self) -> Result<PendingQuery, BrowserError> {
        self.ensure_live()?;
        let request = self.session.to_request(self.config.page_size);
        debug!(
            generation = %request.generation,
            first_index = request.first_index,
            page_count = request.page_count,
            "issuing query"
        );
        Ok(self.source.get_data(&request))
    }

    // ===== Local events =====

    /// Apply a row click. Does not re-query.
    pub fn click(&mut self, click: &ItemClick) -> Result<(), BrowserError> {
        self.ensure_live()?;
        self.session.selection = on_item_click(click, &self.session.selection, &self.page_ids);
        Ok(())
    }

    /// A plain click on the visible row at `index`, if there is one.
    pub fn item_click(&self, index: usize) -> Option<ItemClick> {
        self.page_ids
            .get(index)
            .map(|id| ItemClick::plain(index, id.clone()))
    }

    /// Flip the expand-all flag; returns the new value.
    pub fn toggle_expand_all(&mut self) -> Result<bool, BrowserError> {
        self.ensure_live()?;
        self.session.expanded = !self.session.expanded;
        Ok(self.session.expanded)
    }

    /// Flip expansion of one row; returns whether it is now expanded.
    ///
    /// Rows only expand individually when the browser is `expandable`.
    pub fn toggle_expanded(&mut self, id: &RecordId) -> Result<bool, BrowserError> {
        self.ensure_live()?;
        if !self.config.expandable {
            return Ok(false);
        }
        let expanded = &mut self.session.expanded_ids;
        if !expanded.remove(id) {
            expanded.insert(id.clone());
        }
        Ok(expanded.contains(id))
    }

    /// Emit the named action.
    pub fn trigger_action(&self, name: &str) -> Result<ActionEvent, BrowserError> {
        self.ensure_live()?;
        let event = ActionEvent::from_name(name);
        info!(
            action = event.name(),
            selected = self.session.selection.len(),
            "action triggered"
        );
        Ok(event)
    }

    // ===== Outcomes =====

    /// Apply a settled fetch.
    ///
    /// # Errors
    ///
    /// Returns `BrowserError::Fetch` when the current generation's fetch
    /// failed; the visible page, matched count and selection are untouched.
    /// Returns `BrowserError::Disposed` after [`dispose`](Self::dispose).
    pub fn apply(&mut self, outcome: FetchOutcome) -> Result<ApplyOutcome, BrowserError> {
        self.ensure_live()?;
        let current = self.session.generation;
        if outcome.generation != current {
            trace!(stale = %outcome.generation, current = %current, "discarding stale outcome");
            return Ok(ApplyOutcome::Stale);
        }

        let result = match outcome.result {
            Ok(result) => result,
            Err(err) => {
                warn!(generation = %current, error = %err, "fetch failed");
                return Err(BrowserError::Fetch(err));
            }
        };
        if result.generation != current {
            trace!(stale = %result.generation, current = %current, "discarding mis-stamped result");
            return Ok(ApplyOutcome::Stale);
        }

        self.page_ids = result
            .records
            .iter()
            .map(|record| self.source.get_id(record))
            .collect();
        self.records = result.records;
        self.page_first_index = result.first_index;
        self.matched_count = result.matched_count;
        self.last_applied = Some(current);
        let pruned = self.session.selection.prune(&self.page_ids);

        debug!(
            generation = %current,
            matched = self.matched_count,
            visible = self.records.len(),
            pruned,
            "applied result"
        );
        Ok(ApplyOutcome::Applied { pruned })
    }

    /// Wait for `pending` and apply it.
    pub async fn resolve(&mut self, pending: PendingQuery) -> Result<ApplyOutcome, BrowserError> {
        let outcome = pending.resolve().await;
        self.apply(outcome)
    }

    /// Drain re-queries the data source pushed since the last call.
    pub fn take_pushed(&mut self) -> Vec<PendingQuery> {
        let mut pending = Vec::new();
        while let Ok(Some(query)) = self.pushed.try_next() {
            pending.push(query);
        }
        pending
    }

    /// Drain pushed re-queries and apply each one in arrival order.
    pub async fn resolve_pushed(&mut self) -> Vec<Result<ApplyOutcome, BrowserError>> {
        let mut outcomes = Vec::new();
        for pending in self.take_pushed() {
            outcomes.push(self.resolve(pending).await);
        }
        outcomes
    }

    // ===== View =====

    /// Derive the current view model.
    pub fn view(&self) -> BrowserView {
        view_model::build(
            &self.config,
            &self.session,
            PageView {
                records: &self.records,
                ids: &self.page_ids,
                first_index: self.page_first_index,
                matched_count: self.matched_count,
                generation: self.last_applied,
            },
        )
    }

    // ===== Lifecycle =====

    /// Release the data source. Later events fail with `BrowserError::Disposed`.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.source.unsubscribe();
        self.source.dispose();
        self.pushed.close();
        self.disposed = true;
        debug!("browser disposed");
    }

    fn ensure_live(&self) -> Result<(), BrowserError> {
        if self.disposed {
            Err(BrowserError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl<D: DataSource> Drop for BrowserController<D> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
