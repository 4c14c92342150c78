//! Action parser for shell text commands
//!
//! Parses commands like "filter science", "vote 2 mindblowing" or
//! "share <text> | <source> | <category>".

use crate::domain::entities::{VoteKind, ALL_CATEGORIES};
use crate::error::ParseError;

/// Actions a user can take via text commands
#[derive(Debug, Clone, PartialEq)]
pub enum ShellAction {
    /// Show the feed as it currently is
    List,

    /// Filter the feed by category (`all` removes the filter)
    Filter { category: String },

    /// Share a new fact
    Share {
        text: String,
        source: String,
        category: String,
    },

    /// Vote on the fact at a feed index
    Vote { item_index: usize, kind: VoteKind },

    /// Re-run the last feed load
    Retry,

    /// List the known categories
    Categories,

    /// Get help on available commands
    Help,

    /// Leave the shell
    Quit,
}

/// Parse a shell action from text input
pub fn parse_action(input: &str) -> Result<ShellAction, ParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ParseError::UnknownCommand("empty input".to_string()));
    }

    // Command word, then the raw remainder (share keeps its spacing)
    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command.to_lowercase(), rest.trim()),
        None => (input.to_lowercase(), ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match command.as_str() {
        "list" | "ls" | "refresh" | "feed" => Ok(ShellAction::List),

        "all" => Ok(ShellAction::Filter {
            category: ALL_CATEGORIES.to_string(),
        }),

        "filter" | "category" | "cat" => {
            let category = args
                .first()
                .ok_or_else(|| ParseError::MissingArgument("filter".to_string()))?;
            Ok(ShellAction::Filter {
                category: category.to_string(),
            })
        }

        "share" | "new" | "post" => parse_share(rest),

        "vote" => {
            if args.len() < 2 {
                return Err(ParseError::MissingArgument(
                    "vote (usage: vote <n> <interesting|mindblowing|false>)".to_string(),
                ));
            }
            let index: usize = args[0].parse().map_err(|_| {
                ParseError::InvalidArgument(format!("'{}' is not a valid number", args[0]))
            })?;
            if index == 0 {
                return Err(ParseError::InvalidArgument(
                    "index must be 1 or greater".to_string(),
                ));
            }
            let kind: VoteKind = args[1].parse().map_err(ParseError::InvalidArgument)?;

            Ok(ShellAction::Vote {
                item_index: index - 1,
                kind,
            })
        }

        "retry" => Ok(ShellAction::Retry),

        "categories" | "cats" => Ok(ShellAction::Categories),

        "help" | "?" | "commands" => Ok(ShellAction::Help),

        "quit" | "exit" | "q" => Ok(ShellAction::Quit),

        _ => Err(ParseError::UnknownCommand(command)),
    }
}

/// `<text> | <source> | <category>`
fn parse_share(rest: &str) -> Result<ShellAction, ParseError> {
    let parts: Vec<&str> = rest.split('|').map(str::trim).collect();

    match parts.as_slice() {
        [text, source, category] => Ok(ShellAction::Share {
            text: text.to_string(),
            source: source.to_string(),
            category: category.to_string(),
        }),
        [_, _, _, ..] => Err(ParseError::InvalidArgument(
            "share takes exactly three fields; the fact text cannot contain '|'".to_string(),
        )),
        _ => Err(ParseError::MissingArgument(
            "share (usage: share <text> | <source> | <category>)".to_string(),
        )),
    }
}

/// Generate help text for available commands
pub fn help_text() -> String {
    r#"# Available Commands

## Browsing
- `list` - Show the feed again
- `filter <category>` - Only show facts from one category
- `all` - Show facts from every category
- `categories` - List the categories
- `retry` - Retry the last load if it failed

## Sharing
- `share <text> | <source> | <category>` - Share a new fact
  (up to 200 characters, source must be an http(s) URL)

## Voting
- `vote N interesting` (or 👍) - Fact N is interesting
- `vote N mindblowing` (or 🤯) - Fact N is mind-blowing
- `vote N false` (or ⛔️) - Fact N is false

## Other
- `help` - Show this help message
- `quit` - Leave

---
Numbers in the feed (e.g., [1], [2]) can be used with commands.
"#
    .to_string()
}
