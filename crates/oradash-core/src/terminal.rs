//! Terminal mode ownership.

use std::io;

use tracing::warn;

/// Switches the terminal into dashboard mode and back.
pub trait TerminalControl {
    fn enter(&mut self) -> io::Result<()>;
    fn restore(&mut self) -> io::Result<()>;
}

/// Holds the terminal in dashboard mode; restores it exactly once.
///
/// Restoring is idempotent, and `Drop` restores whatever an early return or
/// panic left behind.
pub struct TerminalGuard<T: TerminalControl> {
    terminal: T,
    active: bool,
}

impl<T: TerminalControl> TerminalGuard<T> {
    /// Enters dashboard mode. If entering fails half-way, the terminal is
    /// restored before the error is returned.
    pub fn enter(mut terminal: T) -> io::Result<Self> {
        if let Err(e) = terminal.enter() {
            if let Err(restore_err) = terminal.restore() {
                warn!(error = %restore_err, "terminal restore after failed setup");
            }
            return Err(e);
        }
        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.terminal.restore()
    }
}

impl<T: TerminalControl> Drop for TerminalGuard<T> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "terminal restore failed");
        }
    }
}
