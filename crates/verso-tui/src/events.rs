//! UI event types.
//!
//! Events flow into the reducer from three sources: crossterm input, the
//! frame tick, and the inbox channel that spawned turn tasks send into.

use tokio_util::sync::CancellationToken;
use verso_core::events::TurnEvent;

/// Events processed by the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// A terminal input event (key press, resize, ...).
    Terminal(crossterm::event::Event),
    /// Periodic tick for spinner animation and render cadence.
    Tick,
    /// A turn task was spawned; carries the token that cancels it.
    TurnSpawned { cancel: CancellationToken },
    /// A turn task finished with this outcome.
    Turn(TurnEvent),
}
