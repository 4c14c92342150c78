//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the PostgREST row types in the `adapters` module.

pub mod category;
pub mod fact;

pub use category::{Category, CategoryFilter, CategoryRegistry, ALL_CATEGORIES};
pub use fact::{Fact, FactId, NewFact, VoteKind, MAX_FACT_LENGTH};
