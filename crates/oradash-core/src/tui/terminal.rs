use std::io::{self, Stdout, Write};
use std::sync::mpsc::Sender;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use super::event::spawn_key_listener;
use crate::layout::CURSOR_PARK_ROW;
use crate::scheduler::Signal;
use crate::terminal::TerminalControl;

/// Raw mode with a hidden cursor on a real terminal.
///
/// The dashboard draws on the main screen, so the last frame stays visible
/// after exit with the cursor parked below it.
pub struct CrosstermTerminal<W: Write = Stdout> {
    out: W,
    listener: Option<Sender<Signal>>,
}

impl CrosstermTerminal<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermTerminal<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            listener: None,
        }
    }

    /// Starts the quit-key listener on `tx` once raw mode is on.
    ///
    /// Before raw mode the terminal is line-buffered and a lone `q` or `Esc`
    /// would not be delivered.
    pub fn with_key_listener(mut self, tx: Sender<Signal>) -> Self {
        self.listener = Some(tx);
        self
    }
}

impl<W: Write> TerminalControl for CrosstermTerminal<W> {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(self.out, Hide)?;
        if let Some(tx) = self.listener.take() {
            spawn_key_listener(tx);
        }
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        // attempt both even if the first fails
        let raw = disable_raw_mode();
        let screen = execute!(self.out, ResetColor, MoveTo(0, CURSOR_PARK_ROW), Show);
        raw.and(screen)
    }
}
