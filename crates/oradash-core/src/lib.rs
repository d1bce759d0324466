//! oradash-core: live Oracle instance dashboard engine.
//!
//! Provides:
//! - `source` - metrics source abstraction (Oracle, scripted mock)
//! - `models` - counter snapshots and activity samples
//! - `rates` - per-second rates from two counter snapshots
//! - `topn` - bounded top-N ranking with window shares
//! - `text` - whitespace normalization for SQL text
//! - `fmt` - shared formatting helpers (rates, shares, truncation)
//! - `layout` - fixed screen grid and field registry
//! - `render` - renderer interface
//! - `view` - per-refresh view model
//! - `scheduler` - bootstrap + refresh loop
//! - `terminal` - terminal mode guard
//! - `config` - environment configuration
//!
//! With `oracle` feature (default):
//! - `source::oracle` - `v$` view queries via the Oracle client
//!
//! With `tui` feature (default):
//! - `tui` - crossterm/ratatui renderers, key listener, terminal control

pub mod config;
pub mod fmt;
pub mod layout;
pub mod models;
pub mod rates;
pub mod render;
pub mod scheduler;
pub mod source;
pub mod terminal;
pub mod text;
pub mod topn;
pub mod view;

#[cfg(feature = "tui")]
pub mod tui;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
