//! Today I Learned core
//!
//! Feed synchronization, fact submission and voting for a small community
//! fact-sharing app backed by a hosted PostgREST endpoint.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
