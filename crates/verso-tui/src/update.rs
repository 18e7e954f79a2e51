//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(state, event)`
//! and executes the returned effects.
//!
//! This is the single source of truth for how events modify state.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use verso_core::events::{TurnEvent, TurnMode};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, Focus, StatusMessage, TurnState};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(state: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            state.spinner_frame = state.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(state, &term_event),
        UiEvent::TurnSpawned { cancel } => {
            state.turn_state = TurnState::Busy { cancel };
            state.status = None;
            vec![]
        }
        UiEvent::Turn(turn_event) => handle_turn_event(state, turn_event),
    }
}

fn handle_terminal_event(state: &mut AppState, event: &Event) -> Vec<UiEffect> {
    let Event::Key(key) = event else {
        return vec![];
    };
    if key.kind == KeyEventKind::Release {
        return vec![];
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return vec![UiEffect::Quit],
        KeyCode::Esc => {
            if state.turn_state.is_busy() {
                return vec![UiEffect::CancelTurn];
            }
            state.status = None;
            return vec![];
        }
        KeyCode::Tab => {
            state.focus = state.focus.next();
            return vec![];
        }
        KeyCode::BackTab => {
            state.focus = state.focus.prev();
            return vec![];
        }
        KeyCode::PageDown => {
            state.code_scroll = state.code_scroll.saturating_add(1);
            return vec![];
        }
        KeyCode::PageUp => {
            state.code_scroll = state.code_scroll.saturating_sub(1);
            return vec![];
        }
        KeyCode::Down if ctrl => {
            state.history_scroll = state.history_scroll.saturating_add(1);
            return vec![];
        }
        KeyCode::Up if ctrl => {
            state.history_scroll = state.history_scroll.saturating_sub(1);
            return vec![];
        }
        _ => {}
    }

    match state.focus {
        Focus::Prompt => {
            if key.code == KeyCode::Enter {
                return submit_prompt(state);
            }
            state.prompt_input.handle_key(key);
            vec![]
        }
        Focus::Feedback => {
            if key.code == KeyCode::Enter {
                return submit_feedback(state);
            }
            state.feedback_input.handle_key(key);
            vec![]
        }
        Focus::Versions => handle_versions_key(state, key),
    }
}

/// Submits the first-prompt box. A non-empty history is discarded first, so
/// the request starts a fresh conversation.
fn submit_prompt(state: &mut AppState) -> Vec<UiEffect> {
    if state.turn_state.is_busy() {
        state.status = Some(StatusMessage::info("A request is already running"));
        return vec![];
    }
    if state.prompt_input.is_empty() {
        return vec![];
    }

    let text = state.prompt_input.take();
    if !state.session.is_empty() {
        state.session.reset();
        state.selected_version = 0;
        state.code_scroll = 0;
        state.history_scroll = 0;
    }

    vec![UiEffect::StartTurn {
        mode: TurnMode::Initial,
        text,
    }]
}

/// Submits the feedback box. Feedback needs a previous turn to adjust.
fn submit_feedback(state: &mut AppState) -> Vec<UiEffect> {
    if state.turn_state.is_busy() {
        state.status = Some(StatusMessage::info("A request is already running"));
        return vec![];
    }
    if state.feedback_input.is_empty() {
        return vec![];
    }
    if state.session.is_empty() {
        state.status = Some(StatusMessage::error("Generate code before giving feedback"));
        return vec![];
    }

    let text = state.feedback_input.take();
    vec![UiEffect::StartTurn {
        mode: TurnMode::Feedback,
        text,
    }]
}

fn handle_versions_key(state: &mut AppState, key: &KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Up => {
            state.selected_version = state.selected_version.saturating_sub(1);
        }
        KeyCode::Down => {
            let count = state.session.turn_count();
            if count > 0 && state.selected_version + 1 < count {
                state.selected_version += 1;
            }
        }
        KeyCode::Enter => return select_version(state),
        _ => {}
    }
    vec![]
}

/// Rolls the session back to the highlighted version.
///
/// The list is newest-first, so row `i` maps to version `turn_count - i`.
fn select_version(state: &mut AppState) -> Vec<UiEffect> {
    if state.turn_state.is_busy() {
        state.status = Some(StatusMessage::info("A request is already running"));
        return vec![];
    }
    let count = state.session.turn_count();
    if count == 0 {
        return vec![];
    }

    let version = count - state.selected_version;
    let outcome = state
        .session
        .select_version(version)
        .map(drop)
        .map_err(|err| err.to_string());
    match outcome {
        Ok(()) => {
            state.selected_version = 0;
            state.code_scroll = 0;
            state.status = Some(StatusMessage::info(format!(
                "Rolled back to Version {version}"
            )));
        }
        Err(message) => {
            state.status = Some(StatusMessage::error(message));
        }
    }
    vec![]
}

fn handle_turn_event(state: &mut AppState, event: TurnEvent) -> Vec<UiEffect> {
    state.turn_state = TurnState::Idle;
    match event {
        TurnEvent::Completed {
            label,
            prompt,
            response,
        } => {
            let index = state.session.commit_turn(&label, prompt, response).index;
            state.selected_version = 0;
            state.code_scroll = 0;
            state.status = Some(StatusMessage::info(format!("Version {index} ready")));
        }
        TurnEvent::Failed { kind, message, .. } => {
            state.status = Some(StatusMessage::error(format!("{kind}: {message}")));
        }
        TurnEvent::Interrupted => {
            state.status = Some(StatusMessage::info("Request canceled"));
        }
    }
    vec![]
}
