#![forbid(unsafe_code)]

//! Cell grid storage.
//!
//! Cells are stored row-major (`index = row * width + col`). A wide
//! character occupies its own cell plus one or more *continuation* cells
//! that hold no content of their own.

use mtui_style::AttrColor;
use mtui_text::char_width;

/// One screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub color: AttrColor,
    /// This cell is covered by the wide character to its left.
    pub continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            color: AttrColor::NONE,
            continuation: false,
        }
    }
}

impl Cell {
    pub const fn new(ch: char, color: AttrColor) -> Self {
        Self {
            ch,
            color,
            continuation: false,
        }
    }
}

/// A 2D grid of cells.
///
/// ```
/// use mtui_render::buffer::Buffer;
/// use mtui_style::AttrColor;
///
/// let mut buf = Buffer::new(10, 2);
/// buf.put_str(1, 0, "hi", AttrColor::NONE);
/// assert_eq!(buf.row_text(1), "hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize, keeping the overlapping top-left region.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        let mut next = Buffer::new(width, height);
        for row in 0..height.min(self.height) {
            for col in 0..width.min(self.width) {
                if let Some(cell) = self.get(row, col) {
                    next.set(row, col, *cell);
                }
            }
        }
        *self = next;
    }

    #[inline]
    fn index(&self, row: u16, col: u16) -> Option<usize> {
        (row < self.height && col < self.width)
            .then(|| usize::from(row) * usize::from(self.width) + usize::from(col))
    }

    pub fn get(&self, row: u16, col: u16) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, row: u16, col: u16, cell: Cell) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = cell;
        }
    }

    /// Write `ch` at `(row, col)` and return its width in cells.
    ///
    /// A character that would not fit entirely on the row is not written
    /// and reports width 0.
    pub fn put_char(&mut self, row: u16, col: u16, ch: char, color: AttrColor) -> u16 {
        let w = char_width(ch) as u16;
        if row >= self.height || col.saturating_add(w) > self.width {
            return 0;
        }
        self.set(row, col, Cell::new(ch, color));
        for extra in 1..w {
            self.set(
                row,
                col + extra,
                Cell {
                    ch: ' ',
                    color,
                    continuation: true,
                },
            );
        }
        w
    }

    /// Write a string starting at `(row, col)`; returns the columns used.
    pub fn put_str(&mut self, row: u16, col: u16, s: &str, color: AttrColor) -> u16 {
        let mut x = col;
        for ch in s.chars() {
            let w = self.put_char(row, x, ch, color);
            if w == 0 && char_width(ch) > 0 {
                break;
            }
            x += w;
        }
        x - col
    }

    /// Blank cells `[col, width)` of `row` in `color`.
    pub fn clear_row_from(&mut self, row: u16, col: u16, color: AttrColor) {
        for x in col..self.width {
            self.set(row, x, Cell::new(' ', color));
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn row(&self, row: u16) -> &[Cell] {
        match self.index(row, 0) {
            Some(start) => &self.cells[start..start + usize::from(self.width)],
            None => &[],
        }
    }

    /// The text of `row` with trailing blanks removed.
    pub fn row_text(&self, row: u16) -> String {
        let text: String = self
            .row(row)
            .iter()
            .filter(|c| !c.continuation)
            .map(|c| c.ch)
            .collect();
        text.trim_end().to_string()
    }

    /// All rows joined with newlines, trailing blanks removed.
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|r| self.row_text(r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtui_style::Color;

    #[test]
    fn put_and_read() {
        let mut buf = Buffer::new(6, 2);
        assert_eq!(buf.put_str(0, 0, "abc", AttrColor::NONE), 3);
        assert_eq!(buf.row_text(0), "abc");
        assert_eq!(buf.row_text(1), "");
    }

    #[test]
    fn wide_chars_take_two_cells() {
        let mut buf = Buffer::new(5, 1);
        assert_eq!(buf.put_str(0, 0, "漢字x", AttrColor::NONE), 5);
        assert!(buf.get(0, 1).unwrap().continuation);
        assert_eq!(buf.row_text(0), "漢字x");
    }

    #[test]
    fn clipped_at_edge() {
        let mut buf = Buffer::new(3, 1);
        assert_eq!(buf.put_str(0, 1, "漢字", AttrColor::NONE), 2);
        assert_eq!(buf.put_str(0, 0, "abcdef", AttrColor::NONE), 3);
        assert_eq!(buf.row_text(0), "abc");
        assert_eq!(buf.put_char(5, 0, 'x', AttrColor::NONE), 0);
    }

    #[test]
    fn clear_row_sets_colour() {
        let red = AttrColor::fg(Color::RED);
        let mut buf = Buffer::new(4, 1);
        buf.put_str(0, 0, "abcd", AttrColor::NONE);
        buf.clear_row_from(0, 2, red);
        assert_eq!(buf.row_text(0), "ab");
        assert_eq!(buf.get(0, 3).unwrap().color, red);
    }

    #[test]
    fn resize_keeps_overlap() {
        let mut buf = Buffer::new(4, 2);
        buf.put_str(1, 0, "wxyz", AttrColor::NONE);
        buf.resize(2, 3);
        assert_eq!(buf.row_text(1), "wx");
        assert_eq!(buf.height(), 3);
    }
}
