//! Fact domain entity
//!
//! A fact is a short user-submitted claim with a supporting source URL,
//! a category tag and three reaction counters. Facts are persisted by the
//! backend, which assigns the id and creation timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CategoryRegistry;
use crate::error::FactValidationError;

/// Maximum fact length, in characters
pub const MAX_FACT_LENGTH: usize = 200;

/// Backend-assigned identifier for a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(pub i64);

impl From<i64> for FactId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three reaction counters a vote can increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Interesting, // 👍
    Mindblowing, // 🤯
    False,       // ⛔️
}

impl VoteKind {
    pub const ALL: [VoteKind; 3] = [VoteKind::Interesting, VoteKind::Mindblowing, VoteKind::False];

    /// Get the emoji representation
    pub fn emoji(&self) -> &'static str {
        match self {
            VoteKind::Interesting => "👍",
            VoteKind::Mindblowing => "🤯",
            VoteKind::False => "⛔️",
        }
    }

    /// Column holding this counter in the `facts` table
    pub fn column(&self) -> &'static str {
        match self {
            VoteKind::Interesting => "votesInteresting",
            VoteKind::Mindblowing => "votesMindblowing",
            VoteKind::False => "votesFalse",
        }
    }
}

impl std::fmt::Display for VoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoteKind::Interesting => write!(f, "interesting"),
            VoteKind::Mindblowing => write!(f, "mindblowing"),
            VoteKind::False => write!(f, "false"),
        }
    }
}

impl std::str::FromStr for VoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interesting" | "votesinteresting" | "👍" => Ok(VoteKind::Interesting),
            "mindblowing" | "votesmindblowing" | "🤯" => Ok(VoteKind::Mindblowing),
            "false" | "votesfalse" | "⛔️" | "⛔" => Ok(VoteKind::False),
            _ => Err(format!(
                "Unknown vote: {}. Use: interesting, mindblowing, false",
                s
            )),
        }
    }
}

/// A persisted fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    pub text: String,
    pub source: String,
    pub category: String,
    pub votes_interesting: u32,
    pub votes_mindblowing: u32,
    pub votes_false: u32,
    pub created_at: DateTime<Utc>,
}

impl Fact {
    /// Current value of one counter
    pub fn votes(&self, kind: VoteKind) -> u32 {
        match kind {
            VoteKind::Interesting => self.votes_interesting,
            VoteKind::Mindblowing => self.votes_mindblowing,
            VoteKind::False => self.votes_false,
        }
    }

    /// More people flagged the fact as false than found it worthwhile
    pub fn is_disputed(&self) -> bool {
        u64::from(self.votes_false)
            > u64::from(self.votes_interesting) + u64::from(self.votes_mindblowing)
    }
}

/// Data needed to create a new fact.
///
/// Only obtainable through [`NewFact::validate`], so anything handed to the
/// backend has already passed the form rules. Counters and id are assigned
/// server-side and are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFact {
    text: String,
    source: String,
    category: String,
}

impl NewFact {
    /// Check the three form fields against the submission rules
    pub fn validate(
        text: &str,
        source: &str,
        category: &str,
        registry: &CategoryRegistry,
    ) -> Result<Self, FactValidationError> {
        if text.trim().is_empty() {
            return Err(FactValidationError::EmptyText);
        }
        let len = text.chars().count();
        if len > MAX_FACT_LENGTH {
            return Err(FactValidationError::TextTooLong {
                len,
                max: MAX_FACT_LENGTH,
            });
        }

        validate_source(source)?;

        if category.is_empty() {
            return Err(FactValidationError::EmptyCategory);
        }
        if !registry.is_assignable(category) {
            return Err(FactValidationError::UnknownCategory(category.to_string()));
        }

        Ok(Self {
            text: text.to_string(),
            source: source.to_string(),
            category: category.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Sources must be absolute http(s) URLs
fn validate_source(source: &str) -> Result<(), FactValidationError> {
    let url = url::Url::parse(source)
        .map_err(|_| FactValidationError::InvalidSource(source.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(FactValidationError::UnsupportedScheme(other.to_string())),
    }
}
