#![forbid(unsafe_code)]

//! The terminal driver seam.
//!
//! Everything the runtime draws or reads goes through [`Terminal`]: a
//! curses-like surface with a cursor, a current colour, add-char / add-string
//! primitives, clear-to-end-of-line and an explicit refresh. Input is polled
//! with a timeout and arrives as [`Input`] values.
//!
//! Two drivers are provided: [`HeadlessTerminal`](crate::headless::HeadlessTerminal)
//! (an in-memory screen with scripted input) and, on native targets,
//! [`CrosstermTerminal`](crate::crossterm_terminal::CrosstermTerminal).

use std::io;
use std::time::Duration;

use mtui_core::Input;
use mtui_style::{AttrColor, ColorPairs};

/// A curses-like terminal.
pub trait Terminal {
    /// Screen size as `(cols, rows)`.
    fn size(&self) -> (u16, u16);

    /// Move the drawing cursor to an absolute position.
    fn move_to(&mut self, row: u16, col: u16);

    /// The drawing cursor as `(row, col)`.
    fn cursor(&self) -> (u16, u16);

    /// Colour used by subsequent drawing.
    fn set_color(&mut self, color: AttrColor);

    /// Draw one character at the cursor and advance past it.
    fn add_char(&mut self, ch: char);

    /// Draw a string at the cursor.
    fn add_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.add_char(ch);
        }
    }

    /// Blank from the cursor to the end of the row in the current colour.
    fn clear_to_eol(&mut self);

    /// Blank the whole screen.
    fn clear(&mut self);

    /// Show or hide the hardware cursor at the drawing position.
    fn show_cursor(&mut self, visible: bool);

    /// Push pending drawing to the device.
    fn refresh(&mut self) -> io::Result<()>;

    /// Wait up to `timeout` for input.
    fn poll_input(&mut self, timeout: Duration) -> Input;

    /// Discard any typed-ahead input.
    fn flush_input(&mut self);

    /// Set the window title (and icon name) if the terminal supports it.
    fn set_title(&mut self, title: &str) -> io::Result<()>;

    /// The colour pair allocator for this terminal.
    fn color_pairs(&mut self) -> &mut ColorPairs;

    /// Hand the terminal to a child process.
    fn suspend(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Take the terminal back after [`suspend`](Terminal::suspend).
    fn resume(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Audible or visual bell.
    fn beep(&mut self) {}
}
