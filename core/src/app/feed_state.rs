//! Feed state
//!
//! The client-held snapshot of visible facts plus loading, error and category
//! status. One `FeedStore` is shared by the feed, submission and vote services;
//! nothing else mutates it.

use std::collections::HashSet;

use tokio::sync::RwLock;

use crate::domain::entities::{CategoryFilter, Fact, FactId};

/// What readers see
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    /// Visible facts, newest first
    pub facts: Vec<Fact>,
    /// Current category filter
    pub active_category: CategoryFilter,
    /// A feed load is in flight
    pub loading: bool,
    /// Detail of the last load or upload failure
    pub error: Option<String>,
    /// A new fact is being uploaded
    pub uploading: bool,
    /// Facts with a vote in flight
    pub updating: HashSet<FactId>,
}

impl FeedState {
    /// Find a visible fact by id
    pub fn fact(&self, id: &FactId) -> Option<&Fact> {
        self.facts.iter().find(|f| f.id == *id)
    }

    /// Whether a vote on this fact is in flight
    pub fn is_updating(&self, id: &FactId) -> bool {
        self.updating.contains(id)
    }
}

/// Feed state plus load bookkeeping the view never needs
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) view: FeedState,
    /// Token of the most recently issued load
    latest_request: u64,
    /// Filter of the most recently issued load, for retries
    last_requested: Option<CategoryFilter>,
}

impl StoreState {
    /// Register a new load for `filter`, make it the active category and hand
    /// back the load's token
    pub(crate) fn begin_load(&mut self, filter: CategoryFilter) -> u64 {
        self.latest_request += 1;
        self.view.active_category = filter.clone();
        self.last_requested = Some(filter);
        self.view.loading = true;
        self.view.error = None;
        self.latest_request
    }

    /// Only the most recently issued load may touch the view
    pub(crate) fn is_latest(&self, token: u64) -> bool {
        token == self.latest_request
    }

    pub(crate) fn last_requested(&self) -> Option<&CategoryFilter> {
        self.last_requested.as_ref()
    }
}

/// Shared owner of the feed state.
///
/// Every mutation runs inside [`FeedStore::update`], so the lock is never held
/// across a backend request.
#[derive(Debug, Default)]
pub struct FeedStore {
    state: RwLock<StoreState>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current feed state
    pub async fn snapshot(&self) -> FeedState {
        self.state.read().await.view.clone()
    }

    pub(crate) async fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let state = self.state.read().await;
        f(&state)
    }

    pub(crate) async fn update<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut state = self.state.write().await;
        f(&mut state)
    }
}
