//! PostgREST adapter for FactRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::client::{Order, PostgrestClient, Select};
use crate::domain::entities::{Fact, FactId, NewFact, VoteKind};
use crate::domain::ports::{FactQuery, FactRepository};
use crate::error::{DomainError, RestError};

/// Table facts live in unless configured otherwise
pub const DEFAULT_FACTS_TABLE: &str = "facts";

/// A row of the `facts` table as PostgREST returns it
#[derive(Debug, Deserialize)]
struct FactRow {
    id: i64,
    created_at: DateTime<Utc>,
    text: String,
    source: String,
    category: String,
    #[serde(rename = "votesInteresting", default)]
    votes_interesting: Option<u32>,
    #[serde(rename = "votesMindblowing", default)]
    votes_mindblowing: Option<u32>,
    #[serde(rename = "votesFalse", default)]
    votes_false: Option<u32>,
}

impl From<FactRow> for Fact {
    fn from(r: FactRow) -> Self {
        Fact {
            id: FactId(r.id),
            text: r.text,
            source: r.source,
            category: r.category,
            votes_interesting: r.votes_interesting.unwrap_or_default(),
            votes_mindblowing: r.votes_mindblowing.unwrap_or_default(),
            votes_false: r.votes_false.unwrap_or_default(),
            created_at: r.created_at,
        }
    }
}

/// PostgREST implementation of FactRepository
pub struct PostgrestFactRepository {
    client: PostgrestClient,
    table: String,
}

impl PostgrestFactRepository {
    pub fn new(client: PostgrestClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

fn select_for(query: &FactQuery) -> Select<'_> {
    let select = Select::all()
        .order("created_at", Order::Descending)
        .limit(query.limit);
    match query.filter.category() {
        Some(category) => select.eq("category", category),
        None => select,
    }
}

fn vote_patch(kind: VoteKind, value: u32) -> serde_json::Value {
    let mut patch = serde_json::Map::new();
    patch.insert(kind.column().to_string(), value.into());
    serde_json::Value::Object(patch)
}

#[async_trait]
impl FactRepository for PostgrestFactRepository {
    async fn find(&self, query: &FactQuery) -> Result<Vec<Fact>, DomainError> {
        let rows: Vec<FactRow> = self.client.select(&self.table, &select_for(query)).await?;
        Ok(rows.into_iter().map(Fact::from).collect())
    }

    async fn create(&self, fact: &NewFact) -> Result<Fact, DomainError> {
        let rows: Vec<FactRow> = self
            .client
            .insert(&self.table, std::slice::from_ref(fact))
            .await?;

        rows.into_iter()
            .next()
            .map(Fact::from)
            .ok_or_else(|| RestError::EmptyResponse.into())
    }

    async fn update_votes(
        &self,
        id: &FactId,
        kind: VoteKind,
        value: u32,
    ) -> Result<Fact, DomainError> {
        let row: FactRow = self
            .client
            .update(&self.table, &vote_patch(kind, value), &id.to_string())
            .await
            .map_err(|e| match e {
                RestError::EmptyResponse => {
                    DomainError::NotFound(format!("Fact {} not found", id))
                }
                other => other.into(),
            })?;
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CategoryFilter;

    #[test]
    fn row_deserializes_from_backend_json() {
        let json = r#"{
            "id": 42,
            "created_at": "2023-05-01T10:00:00.123456+00:00",
            "text": "React is being developed by Meta (formerly facebook)",
            "source": "https://opensource.fb.com/",
            "category": "technology",
            "votesInteresting": 24,
            "votesMindblowing": 9,
            "votesFalse": 4
        }"#;

        let fact: Fact = serde_json::from_str::<FactRow>(json).unwrap().into();

        assert_eq!(fact.id, FactId(42));
        assert_eq!(fact.category, "technology");
        assert_eq!(fact.votes_interesting, 24);
        assert_eq!(fact.votes_mindblowing, 9);
        assert_eq!(fact.votes_false, 4);
        assert_eq!(fact.created_at.to_rfc3339(), "2023-05-01T10:00:00.123456+00:00");
    }

    #[test]
    fn null_counters_read_as_zero() {
        let json = r#"{
            "id": 1,
            "created_at": "2023-05-01T10:00:00Z",
            "text": "Fact",
            "source": "https://example.com",
            "category": "news",
            "votesInteresting": null
        }"#;

        let fact: Fact = serde_json::from_str::<FactRow>(json).unwrap().into();

        assert_eq!(fact.votes_interesting, 0);
        assert_eq!(fact.votes_mindblowing, 0);
        assert_eq!(fact.votes_false, 0);
    }

    #[test]
    fn negative_counters_are_rejected() {
        let json = r#"{
            "id": 1,
            "created_at": "2023-05-01T10:00:00Z",
            "text": "Fact",
            "source": "https://example.com",
            "category": "news",
            "votesFalse": -1
        }"#;

        assert!(serde_json::from_str::<FactRow>(json).is_err());
    }

    #[test]
    fn select_for_all_has_no_category_filter() {
        let query = FactQuery::new(CategoryFilter::All);
        let select = select_for(&query);
        assert!(select.filters.is_empty());
        assert_eq!(select.order_by, Some(("created_at", Order::Descending)));
        assert_eq!(select.limit, Some(1000));
    }

    #[test]
    fn select_for_category_filters_on_it() {
        let query = FactQuery::new(CategoryFilter::Only("history".to_string())).with_limit(10);
        let select = select_for(&query);
        assert_eq!(select.filters, vec![("category", "history".to_string())]);
        assert_eq!(select.limit, Some(10));
    }

    #[test]
    fn vote_patch_sets_single_column() {
        assert_eq!(
            vote_patch(VoteKind::Mindblowing, 10).to_string(),
            r#"{"votesMindblowing":10}"#
        );
        assert_eq!(
            vote_patch(VoteKind::False, 1).to_string(),
            r#"{"votesFalse":1}"#
        );
    }
}
