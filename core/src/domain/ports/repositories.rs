//! Repository port traits
//!
//! These traits define the interface for fact persistence.
//! Implementations are provided by adapters (e.g., PostgREST).

use async_trait::async_trait;

use crate::domain::entities::{CategoryFilter, Fact, FactId, NewFact, VoteKind};
use crate::error::DomainError;

/// Row cap applied to every feed fetch
pub const DEFAULT_FETCH_LIMIT: usize = 1000;

/// Which facts to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactQuery {
    pub filter: CategoryFilter,
    pub limit: usize,
}

impl FactQuery {
    pub fn new(filter: CategoryFilter) -> Self {
        Self {
            filter,
            limit: DEFAULT_FETCH_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Repository for Fact entities
#[async_trait]
pub trait FactRepository: Send + Sync {
    /// Find facts matching the query, newest first
    async fn find(&self, query: &FactQuery) -> Result<Vec<Fact>, DomainError>;

    /// Create a new fact, returning the stored row
    async fn create(&self, fact: &NewFact) -> Result<Fact, DomainError>;

    /// Set one vote counter on a fact, returning the stored row
    async fn update_votes(
        &self,
        id: &FactId,
        kind: VoteKind,
        value: u32,
    ) -> Result<Fact, DomainError>;
}
