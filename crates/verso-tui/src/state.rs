//! Application state for the TUI.
//!
//! `AppState` owns the session and every piece of UI state. It is mutated
//! only by the reducer in `update`; the runtime renders it and executes the
//! effects the reducer returns.

use tokio_util::sync::CancellationToken;
use verso_core::session::Session;

use crate::input::InputField;

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Prompt,
    Feedback,
    Versions,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Prompt => Focus::Feedback,
            Focus::Feedback => Focus::Versions,
            Focus::Versions => Focus::Prompt,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Prompt => Focus::Versions,
            Focus::Feedback => Focus::Prompt,
            Focus::Versions => Focus::Feedback,
        }
    }
}

/// Whether a turn request is in flight.
///
/// At most one turn runs at a time; the session is only mutated while Idle.
#[derive(Debug, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Busy {
        /// Cancels the spawned turn task.
        cancel: CancellationToken,
    },
}

impl TurnState {
    pub fn is_busy(&self) -> bool {
        matches!(self, TurnState::Busy { .. })
    }
}

/// Status line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// TUI application state.
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Conversation state (transcript + version history).
    pub session: Session,
    /// Pane with keyboard focus.
    pub focus: Focus,
    /// First-prompt input box.
    pub prompt_input: InputField,
    /// Feedback input box.
    pub feedback_input: InputField,
    /// Selected row in the version list (0 = newest).
    pub selected_version: usize,
    /// Vertical scroll offset of the code pane.
    pub code_scroll: u16,
    /// Vertical scroll offset of the history pane.
    pub history_scroll: u16,
    /// In-flight turn tracking.
    pub turn_state: TurnState,
    /// Message shown in the status line, if any.
    pub status: Option<StatusMessage>,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
    /// Model name for the title bar.
    pub model: String,
}

impl AppState {
    pub fn new(model: String) -> Self {
        Self {
            should_quit: false,
            session: Session::new(),
            focus: Focus::Prompt,
            prompt_input: InputField::default(),
            feedback_input: InputField::default(),
            selected_version: 0,
            code_scroll: 0,
            history_scroll: 0,
            turn_state: TurnState::default(),
            status: None,
            spinner_frame: 0,
            model,
        }
    }

    /// Keeps the version selection inside the current list after the
    /// session shrinks or resets.
    pub fn clamp_version_selection(&mut self) {
        let count = self.session.turn_count();
        if count == 0 {
            self.selected_version = 0;
        } else if self.selected_version >= count {
            self.selected_version = count - 1;
        }
    }
}
