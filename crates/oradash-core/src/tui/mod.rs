//! Terminal backends (crossterm + ratatui).
//!
//! - [`AnsiRenderer`] writes escape sequences straight to a `Write` sink.
//! - [`GridRenderer`] paints into an in-memory ratatui buffer; used by tests
//!   and for dumping a frame as text.
//! - [`CrosstermTerminal`] owns raw mode and cursor visibility.
//! - [`spawn_key_listener`] turns quit keys into a [`Signal`](crate::scheduler::Signal).

mod ansi;
mod event;
mod grid;
mod terminal;

pub use ansi::AnsiRenderer;
pub use event::{is_quit_key, spawn_key_listener};
pub use grid::GridRenderer;
pub use terminal::CrosstermTerminal;
