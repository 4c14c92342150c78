//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//! The in-memory repository can hold responses back and release them in a
//! chosen order, which is how the race tests drive interleavings.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
