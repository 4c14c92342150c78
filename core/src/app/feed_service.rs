//! Feed service
//!
//! The feed controller: owns the visible list of facts, the active category
//! filter and loading/error status. Every load carries a request token so a
//! slow response to an older filter can never overwrite a newer one.

use std::sync::Arc;

use crate::app::feed_state::{FeedState, FeedStore};
use crate::domain::entities::{CategoryFilter, CategoryRegistry, ALL_CATEGORIES};
use crate::domain::ports::{FactQuery, FactRepository, DEFAULT_FETCH_LIMIT};
use crate::error::{AppError, DomainError};

/// How a load ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the visible facts
    Loaded { count: usize },
    /// A newer load was issued meanwhile; the response was dropped
    Stale,
}

/// Service driving feed loads and the category filter
pub struct FeedService<FR>
where
    FR: FactRepository,
{
    facts: Arc<FR>,
    store: Arc<FeedStore>,
    registry: Arc<CategoryRegistry>,
    fetch_limit: usize,
}

impl<FR> FeedService<FR>
where
    FR: FactRepository,
{
    pub fn new(facts: Arc<FR>, store: Arc<FeedStore>, registry: Arc<CategoryRegistry>) -> Self {
        Self {
            facts,
            store,
            registry,
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }

    /// Override the row cap applied to every fetch
    pub fn with_fetch_limit(mut self, fetch_limit: usize) -> Self {
        self.fetch_limit = fetch_limit;
        self
    }

    /// Copy of the current feed state
    pub async fn snapshot(&self) -> FeedState {
        self.store.snapshot().await
    }

    /// Initial load at application start
    pub async fn start(&self) -> Result<LoadOutcome, AppError> {
        self.load_facts(ALL_CATEGORIES).await
    }

    /// Fetch the facts of one category (or every category for `all`) and
    /// make it the active category
    ///
    /// Backend failures are recorded in the feed's error slot, leaving the
    /// previously visible facts in place, and returned to the caller.
    pub async fn load_facts(&self, category: &str) -> Result<LoadOutcome, AppError> {
        let filter = self.resolve(category)?;
        let token = self.store.update(|s| s.begin_load(filter.clone())).await;
        self.fetch(token, filter).await
    }

    /// Re-run the last load, whatever its outcome was
    pub async fn retry(&self) -> Result<LoadOutcome, AppError> {
        let (token, filter) = self
            .store
            .update(|s| {
                let filter = s.last_requested().cloned().unwrap_or_default();
                (s.begin_load(filter.clone()), filter)
            })
            .await;
        self.fetch(token, filter).await
    }

    /// Change the active category without fetching.
    ///
    /// Returns whether the category actually changed. A load still in flight
    /// for another category is discarded when it resolves.
    pub async fn set_category(&self, category: &str) -> Result<bool, AppError> {
        let filter = self.resolve(category)?;
        let changed = self
            .store
            .update(|s| {
                if s.view.active_category == filter {
                    false
                } else {
                    s.view.active_category = filter;
                    true
                }
            })
            .await;

        if changed {
            tracing::debug!(category, "Active category changed");
        }
        Ok(changed)
    }

    /// Change the active category and fetch once if it changed
    ///
    /// The change and the load's token are taken under one lock, so of two
    /// overlapping selections the later one always owns the feed.
    pub async fn select_category(&self, category: &str) -> Result<Option<LoadOutcome>, AppError> {
        let filter = self.resolve(category)?;
        let token = self
            .store
            .update(|s| {
                (s.view.active_category != filter).then(|| s.begin_load(filter.clone()))
            })
            .await;

        match token {
            Some(token) => {
                tracing::debug!(category, "Active category changed");
                Ok(Some(self.fetch(token, filter).await?))
            }
            None => Ok(None),
        }
    }

    fn resolve(&self, category: &str) -> Result<CategoryFilter, AppError> {
        self.registry.resolve(category).ok_or_else(|| {
            AppError::Domain(DomainError::Validation(format!(
                "Unknown category: {}",
                category
            )))
        })
    }

    async fn fetch(&self, token: u64, filter: CategoryFilter) -> Result<LoadOutcome, AppError> {
        tracing::debug!(request = token, category = %filter, "Loading facts");

        let query = FactQuery::new(filter.clone()).with_limit(self.fetch_limit);
        let result = self.facts.find(&query).await;

        let outcome = self
            .store
            .update(|s| {
                if !s.is_latest(token) {
                    return Ok(LoadOutcome::Stale);
                }
                s.view.loading = false;
                if s.view.active_category != filter {
                    return Ok(LoadOutcome::Stale);
                }
                match result {
                    Ok(facts) => {
                        let count = facts.len();
                        s.view.facts = facts;
                        Ok(LoadOutcome::Loaded { count })
                    }
                    Err(e) => {
                        s.view.error = Some(e.to_string());
                        Err(e)
                    }
                }
            })
            .await;

        match &outcome {
            Ok(LoadOutcome::Loaded { count }) => {
                tracing::debug!(request = token, count, "Facts loaded");
            }
            Ok(LoadOutcome::Stale) => {
                tracing::debug!(request = token, "Discarding stale feed response");
            }
            Err(e) => {
                tracing::warn!(request = token, error = %e, "Failed to load facts");
            }
        }

        Ok(outcome?)
    }
}
