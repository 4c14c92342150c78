//! Feed renderer
//!
//! Renders the feed state to plain text for the terminal.

use crate::app::FeedState;
use crate::domain::entities::{CategoryRegistry, Fact, VoteKind};

/// Render the feed to text
pub fn render_feed(state: &FeedState, registry: &CategoryRegistry) -> String {
    let mut buf = String::new();

    // Header
    buf.push_str(&format!(
        "# Today I Learned ({})\n\n",
        state.active_category
    ));

    if let Some(error) = &state.error {
        buf.push_str(&format!("[ERROR] {}\n", error));
        buf.push_str("Type `retry` to try again.\n\n");
    }

    if state.loading {
        buf.push_str("Loading...\n\n");
    }

    if state.uploading {
        buf.push_str("Uploading your fact...\n\n");
    }

    if state.facts.is_empty() {
        if !state.loading {
            buf.push_str("_No facts for this category yet! Create the first one._\n");
        }
        return buf;
    }

    for (i, fact) in state.facts.iter().enumerate() {
        buf.push_str(&render_fact(i + 1, fact, registry, state.is_updating(&fact.id)));
    }

    buf.push_str(&format!(
        "\n{} fact{} in the feed.\n",
        state.facts.len(),
        if state.facts.len() == 1 { "" } else { "s" }
    ));

    buf
}

fn render_fact(index: usize, fact: &Fact, registry: &CategoryRegistry, updating: bool) -> String {
    let disputed = if fact.is_disputed() {
        "[DISPUTED] "
    } else {
        ""
    };
    let color = registry
        .color_of(&fact.category)
        .map(|c| format!(" {}", c))
        .unwrap_or_default();

    let votes = VoteKind::ALL
        .iter()
        .map(|kind| format!("{} {}", kind.emoji(), fact.votes(*kind)))
        .collect::<Vec<_>>()
        .join("  ");
    let pending = if updating { "  (voting...)" } else { "" };

    format!(
        "[{}] {}{}\n    ({}) #{}{}\n    {}{}\n",
        index, disputed, fact.text, fact.source, fact.category, color, votes, pending
    )
}

/// Render the category list with colors
pub fn render_categories(registry: &CategoryRegistry) -> String {
    let mut buf = String::from("# Categories\n\n");
    for category in registry.iter() {
        buf.push_str(&format!("- {} {}\n", category.name, category.color));
    }
    buf
}
