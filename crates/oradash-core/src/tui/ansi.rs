use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo};
use crossterm::queue;
use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::layout::{CURSOR_PARK_ROW, FieldLayout};
use crate::render::{BACKGROUND, Renderer, TEXT_FG};

/// Renderer that queues absolute-positioned, 256-colour writes on `out`.
///
/// Output is flushed once per frame by [`Renderer::end_frame`].
pub struct AnsiRenderer<W: Write> {
    out: W,
    layout: FieldLayout,
}

impl<W: Write> AnsiRenderer<W> {
    pub fn new(out: W, layout: FieldLayout) -> Self {
        Self { out, layout }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Renderer for AnsiRenderer<W> {
    fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    fn put(&mut self, col: u16, row: u16, text: &str, fg: u8) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(col, row),
            SetForegroundColor(Color::AnsiValue(fg)),
            SetBackgroundColor(Color::AnsiValue(BACKGROUND)),
            Print(text)
        )
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(Color::AnsiValue(TEXT_FG)),
            SetBackgroundColor(Color::AnsiValue(BACKGROUND)),
            Clear(ClearType::All),
            MoveTo(0, 0)
        )
    }

    fn end_frame(&mut self) -> io::Result<()> {
        queue!(self.out, MoveTo(0, CURSOR_PARK_ROW), Hide)?;
        self.out.flush()
    }
}
