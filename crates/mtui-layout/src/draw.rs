#![forbid(unsafe_code)]

//! Drawing inside a window's rectangle.
//!
//! [`Canvas`] translates window-relative coordinates to screen coordinates
//! and clips output at the window's right edge.

use mtui_core::WindowState;
use mtui_render::Terminal;
use mtui_style::AttrColor;
use mtui_text::char_width;

/// A terminal borrowed for drawing into one window.
pub struct Canvas<'t> {
    term: &'t mut dyn Terminal,
    state: WindowState,
}

impl<'t> Canvas<'t> {
    pub fn new(term: &'t mut dyn Terminal, state: WindowState) -> Self {
        Self { term, state }
    }

    pub fn rows(&self) -> u16 {
        self.state.rows
    }

    pub fn cols(&self) -> u16 {
        self.state.cols
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn terminal(&mut self) -> &mut dyn Terminal {
        &mut *self.term
    }

    fn right_edge(&self) -> u16 {
        self.state.col_offset.saturating_add(self.state.cols)
    }

    /// Move to `(row, col)` relative to the window.
    pub fn move_to(&mut self, row: u16, col: u16) {
        self.term.move_to(
            self.state.row_offset.saturating_add(row),
            self.state.col_offset.saturating_add(col),
        );
    }

    /// Cursor position relative to the window.
    pub fn cursor(&self) -> (u16, u16) {
        let (row, col) = self.term.cursor();
        (
            row.saturating_sub(self.state.row_offset),
            col.saturating_sub(self.state.col_offset),
        )
    }

    pub fn set_color(&mut self, color: AttrColor) {
        self.term.set_color(color);
    }

    /// Draw `ch` if it fits before the right edge; returns the cells used.
    pub fn add_char(&mut self, ch: char) -> u16 {
        let (_, col) = self.term.cursor();
        let w = char_width(ch) as u16;
        if col.saturating_add(w) > self.right_edge() {
            return 0;
        }
        self.term.add_char(ch);
        w
    }

    /// Draw as much of `s` as fits; returns the cells used.
    pub fn add_str(&mut self, s: &str) -> u16 {
        let mut used = 0;
        for ch in s.chars() {
            let w = self.add_char(ch);
            if w == 0 && char_width(ch) > 0 {
                break;
            }
            used += w;
        }
        used
    }

    /// Blank from the cursor to the window's right edge, leaving the cursor
    /// where it was.
    pub fn clear_to_eol(&mut self) {
        let (screen_cols, _) = self.term.size();
        if self.right_edge() >= screen_cols {
            self.term.clear_to_eol();
            return;
        }
        let (row, col) = self.term.cursor();
        for _ in col..self.right_edge() {
            self.term.add_char(' ');
        }
        self.term.move_to(row, col);
    }

    /// Blank window row `row`.
    pub fn clear_line(&mut self, row: u16) {
        self.move_to(row, 0);
        self.clear_to_eol();
    }

    /// Blank the whole window.
    pub fn clear(&mut self) {
        for row in 0..self.state.rows {
            self.clear_line(row);
        }
    }
}
