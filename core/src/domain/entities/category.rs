//! Category registry
//!
//! The fixed, ordered list of categories a fact can be tagged with, plus the
//! reserved `all` entry used as the "no filter" value. A registry is built
//! once at startup and passed to the services that need it.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Name of the reserved pseudo-category meaning "no filter"
pub const ALL_CATEGORIES: &str = "all";

/// A category name with its display color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// What the feed is currently filtered by
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Category name to filter on, `None` for the sentinel
    pub fn category(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(name) => Some(name),
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "{}", ALL_CATEGORIES),
            CategoryFilter::Only(name) => write!(f, "{}", name),
        }
    }
}

/// Immutable, ordered set of known categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    // categories[0] is always the `all` sentinel
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// Build a registry from the assignable categories.
    ///
    /// The `all` entry is placed first; callers may pass it explicitly to pick
    /// its color, anywhere else in the list it is rejected like any duplicate.
    pub fn new(categories: Vec<Category>) -> Result<Self, DomainError> {
        let mut iter = categories.into_iter().peekable();
        let all = match iter.peek() {
            Some(first) if first.name == ALL_CATEGORIES => iter.next(),
            _ => None,
        }
        .unwrap_or_else(|| Category::new(ALL_CATEGORIES, "#78716c"));

        let mut registry = vec![all];
        for category in iter {
            if category.name.trim().is_empty() {
                return Err(DomainError::Validation(
                    "category name must not be empty".to_string(),
                ));
            }
            if registry.iter().any(|c| c.name == category.name) {
                return Err(DomainError::Validation(format!(
                    "duplicate category: {}",
                    category.name
                )));
            }
            registry.push(category);
        }

        Ok(Self {
            categories: registry,
        })
    }

    /// Parse `name=#color` pairs separated by commas
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let categories = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (name, color) = entry.split_once('=').ok_or_else(|| {
                    DomainError::Validation(format!(
                        "category '{}' must be written as name=#color",
                        entry
                    ))
                })?;
                Ok(Category::new(name.trim(), color.trim()))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Self::new(categories)
    }

    /// All entries, sentinel first
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Entries a fact can belong to (everything but the sentinel)
    pub fn assignable(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().skip(1)
    }

    /// Whether a fact may be tagged with `name`
    pub fn is_assignable(&self, name: &str) -> bool {
        self.assignable().any(|c| c.name == name)
    }

    /// Resolve a name (registered category or the sentinel) to a filter
    pub fn resolve(&self, name: &str) -> Option<CategoryFilter> {
        if name == ALL_CATEGORIES {
            Some(CategoryFilter::All)
        } else if self.is_assignable(name) {
            Some(CategoryFilter::Only(name.to_string()))
        } else {
            None
        }
    }

    /// Display color for a category name
    pub fn color_of(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.color.as_str())
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        let categories = [
            ("technology", "#3b82f6"),
            ("science", "#16a34a"),
            ("finance", "#ef4444"),
            ("society", "#eab308"),
            ("entertainment", "#db2777"),
            ("health", "#14b8a6"),
            ("history", "#f97316"),
            ("news", "#8b5cf6"),
        ];

        let mut registry = vec![Category::new(ALL_CATEGORIES, "#78716c")];
        registry.extend(
            categories
                .into_iter()
                .map(|(name, color)| Category::new(name, color)),
        );
        Self {
            categories: registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_starts_with_all() {
        let registry = CategoryRegistry::default();
        let first = registry.iter().next().unwrap();
        assert_eq!(first.name, ALL_CATEGORIES);
        assert_eq!(registry.assignable().count(), 8);
        assert!(!registry.is_assignable(ALL_CATEGORIES));
    }

    #[test]
    fn new_inserts_sentinel_when_missing() {
        let registry = CategoryRegistry::new(vec![Category::new("geography", "#22c55e")]).unwrap();
        let names: Vec<&str> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["all", "geography"]);
    }

    #[test]
    fn new_keeps_explicit_sentinel_color() {
        let registry = CategoryRegistry::new(vec![
            Category::new("all", "#000000"),
            Category::new("geography", "#22c55e"),
        ])
        .unwrap();
        assert_eq!(registry.color_of("all"), Some("#000000"));
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn new_rejects_duplicates_and_blank_names() {
        assert!(CategoryRegistry::new(vec![
            Category::new("news", "#111111"),
            Category::new("news", "#222222"),
        ])
        .is_err());
        assert!(CategoryRegistry::new(vec![
            Category::new("news", "#111111"),
            Category::new("all", "#222222"),
        ])
        .is_err());
        assert!(CategoryRegistry::new(vec![Category::new(" ", "#111111")]).is_err());
    }

    #[test]
    fn resolve_names() {
        let registry = CategoryRegistry::default();
        assert_eq!(registry.resolve("all"), Some(CategoryFilter::All));
        assert_eq!(
            registry.resolve("history"),
            Some(CategoryFilter::Only("history".to_string()))
        );
        assert_eq!(registry.resolve("History"), None);
        assert_eq!(registry.resolve("astrology"), None);
    }

    #[test]
    fn parse_pairs() {
        let registry = CategoryRegistry::parse("geography=#22c55e, music = #a855f7").unwrap();
        assert!(registry.is_assignable("geography"));
        assert_eq!(registry.color_of("music"), Some("#a855f7"));
        assert!(CategoryRegistry::parse("geography").is_err());
    }

    #[test]
    fn filter_display() {
        assert_eq!(CategoryFilter::All.to_string(), "all");
        assert_eq!(CategoryFilter::Only("news".to_string()).to_string(), "news");
        assert_eq!(CategoryFilter::All.category(), None);
    }
}
