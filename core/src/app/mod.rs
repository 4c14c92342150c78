//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and the shared feed state.

pub mod action_parser;
pub mod feed_service;
pub mod feed_state;
pub mod submission_service;
pub mod vote_service;

pub use action_parser::{help_text, parse_action, ShellAction};
pub use feed_service::{FeedService, LoadOutcome};
pub use feed_state::{FeedState, FeedStore};
pub use submission_service::{FactForm, SubmissionService};
pub use vote_service::VoteService;
