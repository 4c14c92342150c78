//! Submission service
//!
//! Validates the "share a fact" form, persists the fact and merges the row
//! the backend returns into the feed.

use std::sync::Arc;

use crate::app::feed_state::FeedStore;
use crate::domain::entities::{CategoryRegistry, Fact, NewFact};
use crate::domain::ports::FactRepository;
use crate::error::SubmitError;

/// The three input fields of the submission form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactForm {
    pub text: String,
    pub source: String,
    pub category: String,
}

impl FactForm {
    pub fn new(
        text: impl Into<String>,
        source: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            category: category.into(),
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.source.clear();
        self.category.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.source.is_empty() && self.category.is_empty()
    }
}

/// Service for sharing new facts
pub struct SubmissionService<FR>
where
    FR: FactRepository,
{
    facts: Arc<FR>,
    store: Arc<FeedStore>,
    registry: Arc<CategoryRegistry>,
}

impl<FR> SubmissionService<FR>
where
    FR: FactRepository,
{
    pub fn new(facts: Arc<FR>, store: Arc<FeedStore>, registry: Arc<CategoryRegistry>) -> Self {
        Self {
            facts,
            store,
            registry,
        }
    }

    /// Whether an upload is in flight (the submit action is disabled)
    pub async fn is_uploading(&self) -> bool {
        self.store.read(|s| s.view.uploading).await
    }

    /// Validate and upload the form.
    ///
    /// Rejected and refused submissions change nothing, the form included.
    /// Once the request has been sent the form is cleared whatever the
    /// outcome: the created fact is prepended to the feed, or the failure is
    /// recorded in the feed's error slot and returned.
    pub async fn submit(&self, form: &mut FactForm) -> Result<Fact, SubmitError> {
        let new_fact = NewFact::validate(&form.text, &form.source, &form.category, &self.registry)
            .inspect_err(|e| tracing::debug!(error = %e, "Rejected fact submission"))?;

        let claimed = self
            .store
            .update(|s| !std::mem::replace(&mut s.view.uploading, true))
            .await;
        if !claimed {
            return Err(SubmitError::Busy);
        }

        let result = self.facts.create(&new_fact).await;
        form.clear();

        self.store
            .update(|s| {
                s.view.uploading = false;
                match result {
                    Ok(fact) => {
                        tracing::info!(fact_id = %fact.id, category = %fact.category, "Fact shared");
                        s.view.facts.insert(0, fact.clone());
                        Ok(fact)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to upload fact");
                        s.view.error = Some(e.to_string());
                        Err(SubmitError::Backend(e))
                    }
                }
            })
            .await
    }
}
