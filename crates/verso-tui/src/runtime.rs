//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Spawned turn tasks send `UiEvent`s directly to `inbox_tx`; the runtime
//! drains `inbox_rx` each frame. This keeps turn execution off the UI thread
//! while the session is only ever mutated here, through the reducer.

use std::io::Stdout;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use verso_core::engine::Engine;
use verso_core::events::TurnMode;
use verso_core::interrupt;
use verso_core::session::ChatMessage;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::{AppState, TurnState};
use crate::{render, terminal, update};

/// Target frame rate while a request is in flight (60fps = ~16ms per frame).
pub const FRAME_DURATION: std::time::Duration = std::time::Duration::from_millis(16);

/// Poll duration when idle. Longer timeout reduces CPU usage when nothing
/// is happening.
pub const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is guaranteed to be restored on drop, panic, or Ctrl+C.
pub struct TuiRuntime {
    /// Terminal instance.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state.
    pub state: AppState,
    /// Turn executor shared with spawned tasks.
    engine: Arc<Engine>,
    /// Inbox sender - turn tasks send events here.
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    /// Inbox receiver - runtime drains this each frame.
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    /// Last time a Tick event was emitted.
    last_tick: std::time::Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime and takes over the terminal.
    ///
    /// # Errors
    /// Returns an error when terminal setup fails.
    pub fn new(engine: Arc<Engine>) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });

        // Reset interrupt flag in case it was set from a previous run
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let state = AppState::new(engine.model().to_string());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            engine,
            inbox_tx,
            inbox_rx,
            last_tick: std::time::Instant::now(),
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error when terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.should_quit {
            // Ctrl+C cancels the in-flight turn; when idle it quits.
            if interrupt::is_interrupted() {
                if self.state.turn_state.is_busy() {
                    self.execute_effect(UiEffect::CancelTurn);
                    interrupt::reset();
                } else {
                    self.state.should_quit = true;
                    break;
                }
            }

            for event in self.collect_events()? {
                // Only Tick triggers render - this caps frame rate at tick
                // cadence; terminal events batch renders to the next Tick.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects events from the inbox and the terminal, emitting a Tick at
    /// the current cadence.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Fast polling only while a request is in flight (spinner animation).
        let tick_interval = if self.state.turn_state.is_busy() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        // Drain inbox - turn task results arrive here
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Poll terminal events:
        // - If we already have events to process, do a non-blocking poll
        // - Otherwise, block until the next tick is due
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            std::time::Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Drain any remaining buffered events (non-blocking)
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = std::time::Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::StartTurn { mode, text } => {
                self.spawn_turn(mode, text);
            }
            UiEffect::CancelTurn => {
                if let TurnState::Busy { cancel } = &self.state.turn_state {
                    cancel.cancel();
                }
            }
        }
    }

    /// Spawns a turn task against a snapshot of the current transcript.
    ///
    /// The task sends its single `TurnEvent` back through the inbox; the
    /// session itself is only touched when the reducer commits that event.
    fn spawn_turn(&mut self, mode: TurnMode, text: String) {
        let transcript: Vec<ChatMessage> = self.state.session.transcript().to_vec();
        let cancel = CancellationToken::new();
        let engine = Arc::clone(&self.engine);
        let tx = self.inbox_tx.clone();

        tracing::debug!(?mode, "spawning turn task");
        let _ = tx.send(UiEvent::TurnSpawned {
            cancel: cancel.clone(),
        });
        tokio::spawn(async move {
            let event = engine.run_turn(&transcript, mode, &text, &cancel).await;
            let _ = tx.send(UiEvent::Turn(event));
        });
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
