//! Default command handler: the full-screen TUI.

use std::io::{IsTerminal, Read};

use anyhow::{Context, Result};
use verso_core::config::Config;

use super::exec;

pub async fn run(config: &Config) -> Result<()> {
    // If stdin is piped, run exec mode instead
    if !std::io::stdin().is_terminal() {
        let mut prompt = String::new();
        std::io::stdin().lock().read_to_string(&mut prompt)?;
        let prompt = prompt.trim();
        if prompt.is_empty() {
            anyhow::bail!("No input provided via pipe");
        }
        return exec::run(prompt, config).await;
    }

    verso_tui::run_chat(config)
        .await
        .context("interactive mode failed")?;

    Ok(())
}
