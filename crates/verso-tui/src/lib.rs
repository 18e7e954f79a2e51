//! Full-screen TUI front-end for verso.

pub mod effects;
pub mod events;
pub mod input;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod text;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
pub use runtime::TuiRuntime;
use verso_core::config::Config;
use verso_core::engine::Engine;

/// Runs the interactive code-generation loop.
///
/// # Errors
/// Returns an error when stderr is not a terminal, provider credentials are
/// missing, or terminal setup fails.
pub async fn run_chat(config: &Config) -> Result<()> {
    // Interactive mode requires a terminal to render the TUI
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Interactive mode requires a terminal.\n\
             Use `verso exec --prompt '...'` for non-interactive execution."
        );
    }

    let engine = Engine::new(config)?;

    // Print pre-TUI info to stderr (will be replaced by alternate screen)
    let mut err = stderr();
    writeln!(err, "verso")?;
    writeln!(err, "Model: {}", engine.model())?;
    err.flush()?;

    let mut runtime = TuiRuntime::new(Arc::new(engine))?;
    runtime.run()?;

    // Print goodbye after TUI exits (terminal restored)
    writeln!(stderr(), "Goodbye!")?;

    Ok(())
}
