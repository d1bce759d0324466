use std::io;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use crate::layout::{FieldLayout, GRID_HEIGHT, GRID_WIDTH};
use crate::render::{BACKGROUND, Renderer};

/// Renderer backed by an in-memory cell buffer the size of the grid.
///
/// Writes outside the grid are clipped by the buffer.
pub struct GridRenderer {
    buffer: Buffer,
    layout: FieldLayout,
    clears: usize,
    frames: usize,
}

impl GridRenderer {
    pub fn new(layout: FieldLayout) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, GRID_WIDTH, GRID_HEIGHT)),
            layout,
            clears: 0,
            frames: 0,
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Number of full-screen clears so far.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Number of completed frames so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Text of screen row `row`.
    pub fn row_text(&self, row: u16) -> String {
        self.span_text(0, row, GRID_WIDTH)
    }

    /// Text of line `line` of field `name`, or `None` if either is out of range.
    pub fn field_line(&self, name: &str, line: u16) -> Option<String> {
        let spec = self.layout.lookup(name)?;
        if line >= spec.height {
            return None;
        }
        Some(self.span_text(spec.col, spec.row + line, spec.width))
    }

    /// Whole grid as text, one line per row.
    pub fn dump(&self) -> String {
        (0..GRID_HEIGHT)
            .map(|row| self.row_text(row))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn span_text(&self, col: u16, row: u16, width: u16) -> String {
        let area = self.buffer.area;
        if row >= area.height {
            return String::new();
        }
        let end = (col + width).min(area.width);
        (col..end)
            .map(|x| self.buffer[(x, row)].symbol())
            .collect()
    }
}

impl Renderer for GridRenderer {
    fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    fn put(&mut self, col: u16, row: u16, text: &str, fg: u8) -> io::Result<()> {
        let style = Style::default()
            .fg(Color::Indexed(fg))
            .bg(Color::Indexed(BACKGROUND));
        let area = self.buffer.area;
        if col < area.width && row < area.height {
            self.buffer.set_string(col, row, text, style);
        }
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.buffer.reset();
        self.clears += 1;
        Ok(())
    }

    fn end_frame(&mut self) -> io::Result<()> {
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{EXECS, FieldSpec, TEMPLATE};
    use crate::render::TITLE_FG;

    #[test]
    fn test_fixed_grid_matches_template() {
        let mut r = GridRenderer::new(FieldLayout::standard());
        r.draw_fixed_grid().unwrap();
        for (row, line) in TEMPLATE.iter().enumerate() {
            assert_eq!(r.row_text(row as u16), *line);
        }
        assert_eq!(r.buffer()[(2, 6)].fg, Color::Indexed(TITLE_FG));
        assert_eq!(r.clears(), 1);
        assert_eq!(r.frames(), 1);
    }

    #[test]
    fn test_field_overwrite_without_padding_leaves_stale_chars() {
        let mut r = GridRenderer::new(FieldLayout::standard());
        r.draw_fixed_grid().unwrap();
        r.draw_field("execs", "12345.0").unwrap();
        r.draw_field("execs", "9.0").unwrap();
        assert_eq!(r.field_line("execs", 0).unwrap(), "   12349.0");

        r.draw_field("execs", &format!("{:>10}", "9.0")).unwrap();
        assert_eq!(r.field_line("execs", 0).unwrap(), "       9.0");
        assert_eq!(r.row_text(EXECS.row).chars().count(), GRID_WIDTH as usize);
    }

    #[test]
    fn test_overlong_value_is_truncated() {
        let narrow = FieldSpec::new("n", 2, 1, 8, 1);
        let mut r = GridRenderer::new(FieldLayout::from_fields(&[narrow]));
        r.draw_field("n", "1234567890").unwrap();
        assert_eq!(r.field_line("n", 0).unwrap(), "12345678");
    }

    #[test]
    fn test_rows_shrink_blanks_stale_entries() {
        let mut r = GridRenderer::new(FieldLayout::standard());
        let five: Vec<String> = (1..=5).map(|i| format!("row {i}")).collect();
        r.draw_rows("waitclasses", &five).unwrap();
        assert_eq!(r.field_line("waitclasses", 4).unwrap().trim(), "row 5");

        r.draw_rows("waitclasses", &five[..2]).unwrap();
        assert_eq!(r.field_line("waitclasses", 1).unwrap().trim(), "row 2");
        for line in 2..5 {
            assert_eq!(r.field_line("waitclasses", line).unwrap(), " ".repeat(13));
        }
        assert!(r.field_line("waitclasses", 5).is_none());
    }
}
