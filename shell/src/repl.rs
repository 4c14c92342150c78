//! Command loop
//!
//! Reads commands line by line and runs each one as its own task, printing
//! results as they finish. End of input or `quit` stops reading; commands
//! still running are awaited and printed before the loop returns.

use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinSet};

use til_core::app::{parse_action, ShellAction};
use til_core::domain::ports::FactRepository;
use til_core::error::AppError;

use crate::session::Session;

type CommandResult = Result<String, AppError>;

pub async fn run<FR, R, W>(session: Arc<Session<FR>>, input: R, out: &mut W) -> io::Result<()>
where
    FR: FactRepository + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut commands: JoinSet<CommandResult> = JoinSet::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }

                match parse_action(&line) {
                    Ok(ShellAction::Quit) => break,
                    Ok(action) => {
                        let session = session.clone();
                        commands.spawn(async move { session.handle(action).await });
                    }
                    Err(e) => writeln!(out, "Error: {}", AppError::from(e))?,
                }
            }
            Some(finished) = commands.join_next() => report(out, finished)?,
        }
    }

    while let Some(finished) = commands.join_next().await {
        report(out, finished)?;
    }
    report(out, Ok(session.handle(ShellAction::Quit).await))
}

fn report<W: Write>(out: &mut W, finished: Result<CommandResult, JoinError>) -> io::Result<()> {
    match finished {
        Ok(Ok(output)) => writeln!(out, "{}", output),
        Ok(Err(e)) => writeln!(out, "Error: {}", e),
        Err(e) => {
            tracing::error!(error = %e, "Command task failed");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use til_core::test_utils::{test_fact, test_registry, InMemoryFactRepository};

    fn session() -> (Arc<InMemoryFactRepository>, Arc<Session<InMemoryFactRepository>>) {
        let repo = Arc::new(
            InMemoryFactRepository::new()
                .with_facts(vec![test_fact(1, "science"), test_fact(2, "history")]),
        );
        let session = Arc::new(Session::new(repo.clone(), test_registry(), 1000));
        (repo, session)
    }

    async fn run_to_string(
        session: Arc<Session<InMemoryFactRepository>>,
        input: &'static [u8],
    ) -> String {
        let mut out = Vec::new();
        run(session, input, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn command_in_flight_at_end_of_input_still_prints() {
        let (repo, session) = session();
        session.start().await;
        let release = repo.gate_next_find();

        let shell = tokio::spawn(run_to_string(session, b"filter science\n"));
        while repo.waiting() < 1 {
            tokio::task::yield_now().await;
        }
        release.send(()).unwrap();

        let out = shell.await.unwrap();
        assert!(out.contains("# Today I Learned (science)"));
        assert!(out.trim_end().ends_with("Bye!"));
    }

    #[tokio::test]
    async fn quit_stops_reading_input() {
        let (repo, session) = session();

        let out = run_to_string(
            session,
            b"quit\nshare Late fact | https://example.com | science\n",
        )
        .await;

        assert_eq!(out.trim_end(), "Bye!");
        assert!(repo.created().is_empty());
    }

    #[tokio::test]
    async fn bad_command_is_reported_and_reading_continues() {
        let (_, session) = session();

        let out = run_to_string(session, b"dance\n\nlist\n").await;

        assert!(out.contains("Error: Unknown command: dance"));
        assert!(out.contains("# Today I Learned (all)"));
    }

    #[tokio::test]
    async fn failed_command_is_reported() {
        let (repo, session) = session();

        let out = run_to_string(session, b"vote 7 false\n").await;

        assert!(out.contains("Error: Not found: No fact at [7]"));
        assert_eq!(repo.update_calls(), 0);
    }
}
