//! Renderer interface.
//!
//! Implementations supply four primitives (cell write, full clear, frame end,
//! layout access). Grid painting and field placement are provided on top of
//! them, so every backend positions values the same way.

use std::io;

use crate::fmt::clip;
use crate::layout::{FieldLayout, TEMPLATE, TITLES};

/// Foreground of borders, labels and values (256-colour palette).
pub const TEXT_FG: u8 = 252;
/// Background of the whole grid.
pub const BACKGROUND: u8 = 235;
/// Foreground of panel titles and the banner.
pub const TITLE_FG: u8 = 230;

pub trait Renderer {
    fn layout(&self) -> &FieldLayout;

    /// Writes `text` starting at (`col`, `row`), overwriting whatever is there.
    fn put(&mut self, col: u16, row: u16, text: &str, fg: u8) -> io::Result<()>;

    /// Resets colours and clears the whole screen.
    fn clear(&mut self) -> io::Result<()>;

    /// Completes a frame: parks the cursor and flushes.
    fn end_frame(&mut self) -> io::Result<()>;

    /// Paints the static grid. The only operation that clears the screen.
    fn draw_fixed_grid(&mut self) -> io::Result<()> {
        self.clear()?;
        for (row, line) in TEMPLATE.iter().enumerate() {
            self.put(0, row as u16, line, TEXT_FG)?;
        }
        for title in TITLES {
            self.put(title.col, title.row, title.text, TITLE_FG)?;
        }
        self.end_frame()
    }

    /// Writes `value` right-justified against the field's right edge.
    ///
    /// Returns `false` when the field is not in the layout. Values longer than
    /// the field keep their leftmost `width` characters. Nothing is cleared
    /// first, so callers pad to the full width to erase older content.
    fn draw_field(&mut self, name: &str, value: &str) -> io::Result<bool> {
        self.draw_field_colored(name, value, TEXT_FG)
    }

    fn draw_field_colored(&mut self, name: &str, value: &str, fg: u8) -> io::Result<bool> {
        let Some(spec) = self.layout().lookup(name).copied() else {
            return Ok(false);
        };
        let text = clip(value, spec.width as usize);
        let len = text.chars().count() as u16;
        self.put(spec.col + spec.width - len, spec.row, text, fg)?;
        Ok(true)
    }

    /// Writes one row per field line, blanking every line past `rows.len()`.
    ///
    /// Rows beyond the field height are dropped.
    fn draw_rows(&mut self, name: &str, rows: &[String]) -> io::Result<bool> {
        let Some(spec) = self.layout().lookup(name).copied() else {
            return Ok(false);
        };
        let width = spec.width as usize;
        for line in 0..spec.height {
            let row = rows.get(line as usize).map(String::as_str).unwrap_or("");
            let text = format!("{:>width$}", clip(row, width));
            self.put(spec.col, spec.row + line, &text, TEXT_FG)?;
        }
        Ok(true)
    }
}
