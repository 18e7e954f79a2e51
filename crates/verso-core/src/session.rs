//! Conversation session: transcript and version history.
//!
//! A `Session` is the single owner of all per-conversation state. The
//! transcript mirrors what the remote model has seen (two entries per turn:
//! the composed prompt and the raw response); the history keeps one numbered
//! record per turn for display and version selection.
//!
//! Sessions are mutated only from the UI thread; turn requests run against a
//! transcript snapshot and are committed back here.

use anyhow::{Result, bail};

use crate::markdown;

/// Message author in the transcript, using the Gemini role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Returns the wire-format role string.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One transcript entry: a prompt sent to the model or a raw response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// One completed turn in the version history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    /// 1-based version number.
    pub index: usize,
    /// The user's raw instruction (without the instruction template).
    pub label: String,
    /// The code displayed for this turn (fenced block, or the raw response
    /// when the model returned no fence).
    pub code: String,
}

impl TurnRecord {
    /// Formats the record for the history pane.
    pub fn display(&self) -> String {
        format!("[{}] {}\n\nResponse:\n{}", self.index, self.label, self.code)
    }
}

/// Conversation state shared by every front-end.
///
/// Invariant: `transcript.len() == 2 * history.len()` at every public-method
/// boundary. Each history entry corresponds to exactly one (prompt, response)
/// pair in the transcript.
#[derive(Debug, Default)]
pub struct Session {
    transcript: Vec<ChatMessage>,
    history: Vec<TurnRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transcript as sent to the model.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Returns the completed turns, oldest first.
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Number of completed turns.
    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Records a completed turn.
    ///
    /// `label` is the user's raw text, `prompt` the composed instruction that
    /// was sent, `response` the raw model output. The displayed code is the
    /// first fenced block of the response, falling back to the raw text.
    pub fn commit_turn(&mut self, label: &str, prompt: String, response: String) -> &TurnRecord {
        let code = markdown::code_or_raw(&response).to_string();
        self.transcript.push(ChatMessage::user(prompt));
        self.transcript.push(ChatMessage::model(response));
        self.history.push(TurnRecord {
            index: self.history.len() + 1,
            label: label.to_string(),
            code,
        });
        debug_assert_eq!(self.transcript.len(), self.history.len() * 2);
        self.history.last().expect("just pushed")
    }

    /// Discards the transcript and history entirely.
    pub fn reset(&mut self) {
        tracing::debug!(turns = self.history.len(), "resetting session");
        self.transcript.clear();
        self.history.clear();
    }

    /// Rolls the session back to `version` turns (1-based).
    ///
    /// Pops newer turns (and their two transcript entries each) until the
    /// history length equals `version`, then returns the code recorded for
    /// that turn, read back from the last remaining transcript entry.
    pub fn select_version(&mut self, version: usize) -> Result<&str> {
        if version == 0 || version > self.history.len() {
            bail!(
                "version {} out of range (1..={})",
                version,
                self.history.len()
            );
        }

        while self.history.len() > version {
            self.transcript.pop();
            self.transcript.pop();
            self.history.pop();
        }
        debug_assert_eq!(self.transcript.len(), self.history.len() * 2);

        let last = self.transcript.last().expect("version >= 1");
        Ok(markdown::code_or_raw(&last.text))
    }

    /// Code for the most recent turn, if any.
    pub fn current_code(&self) -> Option<&str> {
        self.history.last().map(|turn| turn.code.as_str())
    }

    /// Version labels for the selector, newest first.
    pub fn version_labels(&self) -> Vec<String> {
        (1..=self.history.len())
            .rev()
            .map(|n| format!("Version {n}"))
            .collect()
    }

    /// The full history pane text: all turn records, oldest first.
    pub fn history_text(&self) -> String {
        self.history
            .iter()
            .map(TurnRecord::display)
            .collect::<Vec<_>>()
            .join("\n\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(session: &mut Session, n: usize) {
        for i in 1..=n {
            session.commit_turn(
                &format!("request {i}"),
                format!("composed prompt {i}"),
                format!("```python\ncode {i}\n```"),
            );
        }
    }

    #[test]
    fn first_turn_yields_single_version() {
        let mut session = Session::new();
        committed(&mut session, 1);

        assert_eq!(session.turn_count(), 1);
        assert_eq!(session.version_labels(), vec!["Version 1"]);
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.current_code(), Some("code 1\n"));
    }

    #[test]
    fn n_feedback_turns_yield_descending_versions() {
        let mut session = Session::new();
        committed(&mut session, 4);

        assert_eq!(session.turn_count(), 4);
        assert_eq!(
            session.version_labels(),
            vec!["Version 4", "Version 3", "Version 2", "Version 1"]
        );
        assert_eq!(session.transcript().len(), 8);
    }

    #[test]
    fn reset_discards_everything() {
        let mut session = Session::new();
        committed(&mut session, 3);

        session.reset();

        assert!(session.is_empty());
        assert!(session.transcript().is_empty());
        assert_eq!(session.current_code(), None);
    }

    #[test]
    fn select_version_truncates_and_returns_code() {
        let mut session = Session::new();
        committed(&mut session, 5);

        let code = session.select_version(2).unwrap().to_string();

        assert_eq!(code, "code 2\n");
        assert_eq!(session.turn_count(), 2);
        assert_eq!(session.transcript().len(), 4);
        assert_eq!(session.version_labels(), vec!["Version 2", "Version 1"]);
    }

    #[test]
    fn select_current_version_is_a_noop_truncation() {
        let mut session = Session::new();
        committed(&mut session, 2);

        let code = session.select_version(2).unwrap().to_string();

        assert_eq!(code, "code 2\n");
        assert_eq!(session.turn_count(), 2);
    }

    #[test]
    fn select_version_rejects_out_of_range() {
        let mut session = Session::new();
        committed(&mut session, 2);

        assert!(session.select_version(0).is_err());
        assert!(session.select_version(3).is_err());
        // State untouched after a rejected selection.
        assert_eq!(session.turn_count(), 2);
    }

    #[test]
    fn unfenced_response_is_kept_verbatim() {
        let mut session = Session::new();
        session.commit_turn(
            "describe",
            "composed".to_string(),
            "no fence here".to_string(),
        );

        assert_eq!(session.current_code(), Some("no fence here"));
    }

    #[test]
    fn history_text_numbers_turns() {
        let mut session = Session::new();
        committed(&mut session, 2);

        let text = session.history_text();
        assert!(text.contains("[1] request 1\n\nResponse:\ncode 1\n"));
        assert!(text.contains("[2] request 2\n\nResponse:\ncode 2\n"));
    }
}
