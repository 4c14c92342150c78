//! Feed module
//!
//! Plain-text feed rendering for the terminal.

pub mod renderer;

pub use renderer::{render_categories, render_feed};
