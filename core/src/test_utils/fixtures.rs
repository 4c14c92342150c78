//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::entities::{Category, CategoryRegistry, Fact, FactId};

/// Timestamps grow with the id so "newest first" ordering is predictable
fn created_at(id: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
        + Duration::minutes(id)
}

/// Create a test fact with zeroed counters
pub fn test_fact(id: i64, category: &str) -> Fact {
    test_fact_with_votes(id, category, 0, 0, 0)
}

/// Create a test fact with specific counters
pub fn test_fact_with_votes(
    id: i64,
    category: &str,
    interesting: u32,
    mindblowing: u32,
    wrong: u32,
) -> Fact {
    Fact {
        id: FactId(id),
        text: format!("Test fact #{} about {}", id, category),
        source: format!("https://example.com/facts/{}", id),
        category: category.to_string(),
        votes_interesting: interesting,
        votes_mindblowing: mindblowing,
        votes_false: wrong,
        created_at: created_at(id),
    }
}

/// Registry used across tests; includes `geography`, which the default lacks
pub fn test_registry() -> CategoryRegistry {
    CategoryRegistry::new(vec![
        Category::new("technology", "#3b82f6"),
        Category::new("science", "#16a34a"),
        Category::new("history", "#f97316"),
        Category::new("geography", "#22c55e"),
    ])
    .expect("test registry is valid")
}
