//! Vote service
//!
//! Increments one reaction counter on a fact. The counter shown afterwards is
//! always the value the backend returns, never a locally computed one.

use std::sync::Arc;

use crate::app::feed_state::FeedStore;
use crate::domain::entities::{Fact, FactId, VoteKind};
use crate::domain::ports::FactRepository;
use crate::error::VoteError;

/// Service for voting on facts
pub struct VoteService<FR>
where
    FR: FactRepository,
{
    facts: Arc<FR>,
    store: Arc<FeedStore>,
}

impl<FR> VoteService<FR>
where
    FR: FactRepository,
{
    pub fn new(facts: Arc<FR>, store: Arc<FeedStore>) -> Self {
        Self { facts, store }
    }

    /// Add one vote of `kind` to a visible fact.
    ///
    /// Only the targeted row is marked as updating; a second vote on the same
    /// row is refused until the first resolves.
    pub async fn cast_vote(&self, id: FactId, kind: VoteKind) -> Result<Fact, VoteError> {
        let value = self
            .store
            .update(|s| {
                let current = s
                    .view
                    .fact(&id)
                    .map(|f| f.votes(kind))
                    .ok_or(VoteError::NotFound(id))?;
                let value = current
                    .checked_add(1)
                    .ok_or(VoteError::CounterFull(id, kind))?;
                if !s.view.updating.insert(id) {
                    return Err(VoteError::Busy(id));
                }
                Ok(value)
            })
            .await?;

        tracing::debug!(fact_id = %id, vote = %kind, value, "Casting vote");
        let result = self.facts.update_votes(&id, kind, value).await;

        self.store
            .update(|s| {
                s.view.updating.remove(&id);
                match result {
                    Ok(fact) => {
                        if let Some(slot) = s.view.facts.iter_mut().find(|f| f.id == id) {
                            *slot = fact.clone();
                        }
                        tracing::info!(fact_id = %id, vote = %kind, count = fact.votes(kind), "Vote recorded");
                        Ok(fact)
                    }
                    Err(e) => {
                        tracing::warn!(fact_id = %id, error = %e, "Failed to record vote");
                        Err(VoteError::Backend(e))
                    }
                }
            })
            .await
    }
}
