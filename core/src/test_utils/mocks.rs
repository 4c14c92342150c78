//! Mock implementations of port traits
//!
//! An in-memory fact store that can be configured for testing. It stores
//! data in memory, records what it was asked, can be switched into a failing
//! mode, and can hold individual requests until the test releases them.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::oneshot;

use crate::domain::entities::{Fact, FactId, NewFact, VoteKind};
use crate::domain::ports::{FactQuery, FactRepository};
use crate::error::DomainError;

// ============================================================================
// In-Memory Fact Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryFactRepository {
    facts: Arc<RwLock<Vec<Fact>>>,
    next_id: AtomicI64,
    failing: AtomicBool,
    find_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    update_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    waiting: AtomicUsize,
    find_calls: AtomicUsize,
    update_calls: AtomicUsize,
    last_query: Mutex<Option<FactQuery>>,
    created: Mutex<Vec<NewFact>>,
}

impl InMemoryFactRepository {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Pre-populate with a fact for testing
    pub fn with_fact(self, fact: Fact) -> Self {
        {
            let mut facts = self.facts.write().unwrap();
            let next = fact.id.0 + 1;
            if next > self.next_id.load(Ordering::SeqCst) {
                self.next_id.store(next, Ordering::SeqCst);
            }
            facts.push(fact);
        }
        self
    }

    /// Pre-populate with several facts
    pub fn with_facts(self, facts: Vec<Fact>) -> Self {
        facts.into_iter().fold(self, Self::with_fact)
    }

    /// Choose the id the next created fact receives
    pub fn with_next_id(self, id: i64) -> Self {
        self.next_id.store(id, Ordering::SeqCst);
        self
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Change a stored counter behind the client's back
    pub fn set_votes(&self, id: FactId, kind: VoteKind, value: u32) {
        let mut facts = self.facts.write().unwrap();
        if let Some(fact) = facts.iter_mut().find(|f| f.id == id) {
            set_counter(fact, kind, value);
        }
    }

    /// Hold the next `find` until the returned sender fires
    pub fn gate_next_find(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.find_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Hold the next `update_votes` until the returned sender fires
    pub fn gate_next_update(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.update_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Number of requests currently held at a gate
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<FactQuery> {
        self.last_query.lock().unwrap().clone()
    }

    /// Everything `create` was asked to store, in order
    pub fn created(&self) -> Vec<NewFact> {
        self.created.lock().unwrap().clone()
    }

    async fn pass_gate(&self, gates: &Mutex<VecDeque<oneshot::Receiver<()>>>) {
        let gate = gates.lock().unwrap().pop_front();
        if let Some(rx) = gate {
            self.waiting.fetch_add(1, Ordering::SeqCst);
            let _ = rx.await;
            self.waiting.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn check_failing(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DomainError::Backend("backend unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn set_counter(fact: &mut Fact, kind: VoteKind, value: u32) {
    match kind {
        VoteKind::Interesting => fact.votes_interesting = value,
        VoteKind::Mindblowing => fact.votes_mindblowing = value,
        VoteKind::False => fact.votes_false = value,
    }
}

#[async_trait]
impl FactRepository for InMemoryFactRepository {
    async fn find(&self, query: &FactQuery) -> Result<Vec<Fact>, DomainError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.pass_gate(&self.find_gates).await;
        self.check_failing()?;

        let facts = self.facts.read().unwrap();
        let mut matching: Vec<Fact> = facts
            .iter()
            .filter(|f| {
                query
                    .filter
                    .category()
                    .map_or(true, |category| f.category == category)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(query.limit);
        Ok(matching)
    }

    async fn create(&self, new_fact: &NewFact) -> Result<Fact, DomainError> {
        self.created.lock().unwrap().push(new_fact.clone());
        self.check_failing()?;

        let fact = Fact {
            id: FactId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            text: new_fact.text().to_string(),
            source: new_fact.source().to_string(),
            category: new_fact.category().to_string(),
            votes_interesting: 0,
            votes_mindblowing: 0,
            votes_false: 0,
            created_at: Utc::now(),
        };
        self.facts.write().unwrap().push(fact.clone());
        Ok(fact)
    }

    async fn update_votes(
        &self,
        id: &FactId,
        kind: VoteKind,
        value: u32,
    ) -> Result<Fact, DomainError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate(&self.update_gates).await;
        self.check_failing()?;

        let mut facts = self.facts.write().unwrap();
        let fact = facts
            .iter_mut()
            .find(|f| f.id == *id)
            .ok_or_else(|| DomainError::NotFound(format!("Fact {} not found", id)))?;
        set_counter(fact, kind, value);
        Ok(fact.clone())
    }
}
