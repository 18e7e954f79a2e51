//! Exec command handler: one prompt in, generated code out.

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use verso_core::config::Config;
use verso_core::engine::Engine;
use verso_core::events::{TurnEvent, TurnMode};
use verso_core::interrupt;
use verso_core::session::Session;

pub async fn run(prompt: &str, config: &Config) -> Result<()> {
    let engine = Engine::new(config)?;
    let mut session = Session::new();

    let event = run_cancellable_turn(&engine, &session, TurnMode::Initial, prompt).await;
    match event {
        TurnEvent::Completed {
            label,
            prompt,
            response,
        } => {
            let record = session.commit_turn(&label, prompt, response);
            print!("{}", record.code);
            if !record.code.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        TurnEvent::Failed {
            kind,
            message,
            details,
        } => {
            if let Some(details) = details {
                tracing::debug!(%kind, details, "request failed");
            }
            anyhow::bail!("{kind}: {message}")
        }
        TurnEvent::Interrupted => Err(interrupt::InterruptedError.into()),
    }
}

/// Runs one turn, wiring Ctrl+C to the turn's cancellation token.
pub async fn run_cancellable_turn(
    engine: &Engine,
    session: &Session,
    mode: TurnMode,
    text: &str,
) -> TurnEvent {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            interrupt::wait_for_interrupt().await;
            cancel.cancel();
        })
    };

    let event = engine.run_turn(session.transcript(), mode, text, &cancel).await;
    watcher.abort();
    event
}
