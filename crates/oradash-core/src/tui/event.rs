//! Keyboard input.
//!
//! A separate thread blocks on terminal events and reports the first quit key
//! as a [`Signal::Quit`]. It owns no other state.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, warn};

use crate::scheduler::Signal;

/// `Esc`, `q`/`Q`, or `Ctrl-C` (raw mode delivers it as a key).
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Spawns the key listener. The thread exits after sending one signal, or
/// when reading the terminal fails.
pub fn spawn_key_listener(tx: Sender<Signal>) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if is_quit_key(&key) => {
                    debug!(code = ?key.code, "quit key");
                    // The receiver is gone once the dashboard has stopped.
                    let _ = tx.send(Signal::Quit);
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "terminal input closed");
                    break;
                }
            }
        }
    })
}
