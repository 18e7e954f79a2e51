//! Turn execution: prompt composition plus the provider call.
//!
//! The engine is the capability surface shared by the TUI and the REPL:
//! both build an `Engine` once and run turns against transcript snapshots,
//! committing outcomes back into their `Session` on the UI thread.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::events::{TurnEvent, TurnMode};
use crate::prompts;
use crate::provider::{GeminiClient, GeminiConfig};
use crate::session::ChatMessage;

/// Runs turns against the configured provider.
pub struct Engine {
    client: GeminiClient,
}

impl Engine {
    /// Builds an engine from the loaded config, resolving provider
    /// credentials eagerly.
    ///
    /// # Errors
    /// Returns an error when no API key is available or the base URL is
    /// malformed.
    pub fn new(config: &Config) -> Result<Self> {
        let provider_config = GeminiConfig::from_config(config)?;
        Ok(Self {
            client: GeminiClient::new(provider_config),
        })
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Runs one turn: composes the prompt for `mode`, sends it with the
    /// transcript snapshot, and races the request against `cancel`.
    ///
    /// Never panics or returns `Err`; every outcome is a `TurnEvent`.
    pub async fn run_turn(
        &self,
        transcript: &[ChatMessage],
        mode: TurnMode,
        user_text: &str,
        cancel: &CancellationToken,
    ) -> TurnEvent {
        let prompt = match mode {
            TurnMode::Initial => prompts::build_initial_prompt(user_text),
            TurnMode::Feedback => prompts::build_feedback_prompt(user_text),
        };

        tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!("turn canceled before completion");
                TurnEvent::Interrupted
            }
            result = self.client.generate(transcript, &prompt) => match result {
                Ok(response) => TurnEvent::Completed {
                    label: user_text.to_string(),
                    prompt,
                    response,
                },
                Err(err) => {
                    tracing::warn!(kind = %err.kind, message = %err.message, "turn failed");
                    TurnEvent::Failed {
                        kind: err.kind.into(),
                        message: err.message,
                        details: err.details,
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::GeminiConfig;

    fn offline_engine() -> Engine {
        // Points at a closed port; tests below never complete a request.
        Engine {
            client: GeminiClient::new(GeminiConfig {
                api_key: "test-key".to_string(),
                base_url: "http://127.0.0.1:9".to_string(),
                model: "gemini-2.0-flash".to_string(),
                temperature: 0.5,
                max_output_tokens: None,
            }),
        }
    }

    #[tokio::test]
    async fn cancelled_token_yields_interrupted() {
        let engine = offline_engine();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let event = engine
            .run_turn(&[], TurnMode::Initial, "anything", &cancel)
            .await;

        assert_eq!(event, TurnEvent::Interrupted);
    }
}
