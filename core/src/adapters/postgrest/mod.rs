//! PostgREST adapter
//!
//! Implementation of the fact repository over a hosted PostgREST backend.

pub mod client;
pub mod fact_repo;

pub use client::{Order, PostgrestClient, Select};
pub use fact_repo::{PostgrestFactRepository, DEFAULT_FACTS_TABLE};
