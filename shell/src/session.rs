//! Shell session
//!
//! Wires the feed, submission and vote services to one shared feed store and
//! turns each parsed command into text for the terminal.

use std::sync::Arc;

use til_core::app::{
    help_text, FactForm, FeedService, FeedStore, ShellAction, SubmissionService, VoteService,
};
use til_core::domain::entities::CategoryRegistry;
use til_core::domain::ports::FactRepository;
use til_core::error::{AppError, DomainError};
use til_core::feed::{render_categories, render_feed};

/// One user's view of the fact feed
pub struct Session<FR>
where
    FR: FactRepository,
{
    registry: Arc<CategoryRegistry>,
    feed: FeedService<FR>,
    submissions: SubmissionService<FR>,
    votes: VoteService<FR>,
}

impl<FR> Session<FR>
where
    FR: FactRepository,
{
    pub fn new(facts: Arc<FR>, registry: CategoryRegistry, fetch_limit: usize) -> Self {
        let registry = Arc::new(registry);
        let store = Arc::new(FeedStore::new());

        Self {
            feed: FeedService::new(facts.clone(), store.clone(), registry.clone())
                .with_fetch_limit(fetch_limit),
            submissions: SubmissionService::new(facts.clone(), store.clone(), registry.clone()),
            votes: VoteService::new(facts, store),
            registry,
        }
    }

    /// Initial load, rendered
    pub async fn start(&self) -> String {
        // A failed start is already visible in the feed's error banner
        let _ = self.feed.start().await;
        self.render().await
    }

    /// Current feed, rendered
    pub async fn render(&self) -> String {
        render_feed(&self.feed.snapshot().await, &self.registry)
    }

    /// Execute one command
    pub async fn handle(&self, action: ShellAction) -> Result<String, AppError> {
        match action {
            ShellAction::List => Ok(self.render().await),

            ShellAction::Filter { category } => {
                let result = self.feed.select_category(&category).await;
                self.after_load(result.map(|_| ())).await
            }

            ShellAction::Retry => {
                let result = self.feed.retry().await;
                self.after_load(result.map(|_| ())).await
            }

            ShellAction::Share {
                text,
                source,
                category,
            } => {
                let mut form = FactForm::new(text, source, category);
                match self.submissions.submit(&mut form).await {
                    Ok(fact) => Ok(format!(
                        "Shared fact #{}.\n\n{}",
                        fact.id,
                        self.render().await
                    )),
                    // The failure is in the feed's error banner
                    Err(e) if e.closes_form() => Ok(self.render().await),
                    Err(e) => Err(e.into()),
                }
            }

            ShellAction::Vote { item_index, kind } => {
                let id = self
                    .feed
                    .snapshot()
                    .await
                    .facts
                    .get(item_index)
                    .map(|f| f.id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!("No fact at [{}]", item_index + 1))
                    })?;

                let fact = self.votes.cast_vote(id, kind).await?;
                Ok(format!(
                    "Voted {} on [{}] (now {}).\n\n{}",
                    kind.emoji(),
                    item_index + 1,
                    fact.votes(kind),
                    self.render().await
                ))
            }

            ShellAction::Categories => Ok(render_categories(&self.registry)),

            ShellAction::Help => Ok(help_text()),

            ShellAction::Quit => Ok("Bye!".to_string()),
        }
    }

    /// Loads report backend failures through the feed state; only caller
    /// mistakes are errors here
    async fn after_load(&self, result: Result<(), AppError>) -> Result<String, AppError> {
        match result {
            Err(e @ AppError::Domain(DomainError::Validation(_))) => Err(e),
            _ => Ok(self.render().await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use til_core::domain::entities::VoteKind;
    use til_core::error::SubmitError;
    use til_core::test_utils::{test_fact, test_registry, InMemoryFactRepository};

    fn session(
        repo: InMemoryFactRepository,
    ) -> (Arc<InMemoryFactRepository>, Session<InMemoryFactRepository>) {
        let repo = Arc::new(repo);
        let session = Session::new(repo.clone(), test_registry(), 1000);
        (repo, session)
    }

    fn seeded() -> InMemoryFactRepository {
        InMemoryFactRepository::new()
            .with_facts(vec![test_fact(1, "science"), test_fact(2, "history")])
    }

    #[tokio::test]
    async fn start_renders_all_facts() {
        let (_, session) = session(seeded());

        let out = session.start().await;

        assert!(out.contains("# Today I Learned (all)"));
        assert!(out.contains("[1] Test fact #2 about history"));
        assert!(out.contains("[2] Test fact #1 about science"));
    }

    #[tokio::test]
    async fn start_failure_shows_banner() {
        let (repo, session) = session(seeded());
        repo.set_failing(true);

        let out = session.start().await;

        assert!(out.contains("[ERROR]"));
    }

    #[tokio::test]
    async fn filter_renders_one_category() {
        let (_, session) = session(seeded());
        session.start().await;

        let out = session
            .handle(ShellAction::Filter {
                category: "science".to_string(),
            })
            .await
            .unwrap();

        assert!(out.contains("(science)"));
        assert!(out.contains("about science"));
        assert!(!out.contains("about history"));
    }

    #[tokio::test]
    async fn filter_unknown_category_is_an_error() {
        let (_, session) = session(seeded());

        let result = session
            .handle(ShellAction::Filter {
                category: "astrology".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn backend_failure_on_filter_renders_stale_feed() {
        let (repo, session) = session(seeded());
        session.start().await;
        repo.set_failing(true);

        let out = session
            .handle(ShellAction::Filter {
                category: "history".to_string(),
            })
            .await
            .unwrap();

        assert!(out.contains("[ERROR]"));
        assert!(out.contains("about science"));
    }

    #[tokio::test]
    async fn share_prepends_fact() {
        let (_, session) = session(seeded());
        session.start().await;

        let out = session
            .handle(ShellAction::Share {
                text: "Lisbon is the capital of Portugal".to_string(),
                source: "http://example.com".to_string(),
                category: "geography".to_string(),
            })
            .await
            .unwrap();

        assert!(out.starts_with("Shared fact #3."));
        assert!(out.contains("[1] Lisbon is the capital of Portugal"));
    }

    #[tokio::test]
    async fn invalid_share_is_reported() {
        let (repo, session) = session(seeded());

        let result = session
            .handle(ShellAction::Share {
                text: "Fact".to_string(),
                source: "not-a-url".to_string(),
                category: "science".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(AppError::Submit(SubmitError::Invalid(_)))
        ));
        assert!(repo.created().is_empty());
    }

    #[tokio::test]
    async fn vote_by_index() {
        let (_, session) = session(seeded());
        session.start().await;

        let out = session
            .handle(ShellAction::Vote {
                item_index: 1,
                kind: VoteKind::Mindblowing,
            })
            .await
            .unwrap();

        assert!(out.starts_with("Voted 🤯 on [2] (now 1)."));
        assert!(out.contains("👍 0  🤯 1  ⛔️ 0"));
    }

    #[tokio::test]
    async fn vote_out_of_range() {
        let (repo, session) = session(seeded());
        session.start().await;

        let result = session
            .handle(ShellAction::Vote {
                item_index: 5,
                kind: VoteKind::False,
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(repo.update_calls(), 0);
    }

    #[tokio::test]
    async fn retry_after_outage() {
        let (repo, session) = session(seeded());
        repo.set_failing(true);
        session.start().await;

        repo.set_failing(false);
        let out = session.handle(ShellAction::Retry).await.unwrap();

        assert!(!out.contains("[ERROR]"));
        assert!(out.contains("2 facts in the feed."));
    }

    #[tokio::test]
    async fn categories_and_help() {
        let (_, session) = session(seeded());

        let cats = session.handle(ShellAction::Categories).await.unwrap();
        assert!(cats.contains("geography"));

        let help = session.handle(ShellAction::Help).await.unwrap();
        assert!(help.contains("share <text> | <source> | <category>"));
    }
}
