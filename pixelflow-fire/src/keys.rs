//! Keyboard control from the terminal.
//!
//! The terminal is put into raw mode for the lifetime of a [`RawTerminal`]
//! so single key presses arrive without Enter. Polling never blocks the
//! frame loop.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the demo to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    HeatUp,
    HeatDown,
    /// Skip seeding for the current frame.
    Pause,
    Quit,
}

/// Map a key event to an action. Key releases are ignored.
pub fn translate(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Up => Some(Action::HeatUp),
        KeyCode::Down => Some(Action::HeatDown),
        KeyCode::Char(' ') => Some(Action::Pause),
        _ => None,
    }
}

/// Raw-mode guard; restores the terminal on drop.
pub struct RawTerminal {
    _private: (),
}

impl RawTerminal {
    pub fn enable() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }

    /// Drain every pending key press without waiting.
    pub fn poll_actions(&self) -> io::Result<Vec<Action>> {
        let mut actions = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                actions.extend(translate(key));
            }
        }
        Ok(actions)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
            tracing::warn!("failed to restore terminal: {e}");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
