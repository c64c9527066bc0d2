#![forbid(unsafe_code)]

//! Terminal driver over crossterm.
//!
//! Drawing goes to a back buffer; [`refresh`](Terminal::refresh) diffs it
//! against what was last presented and writes only the changed runs.
//! Style changes use the reset-then-apply strategy: every change emits
//! `SGR 0` followed by the full colour and attribute set.

use std::collections::VecDeque;
use std::io::{self, BufWriter, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self as cte, Event as CtEvent};
use crossterm::style::{self as cts, Attribute};
use crossterm::{cursor, queue, terminal};

use mtui_core::Input;
use mtui_core::event::keycodes_from_crossterm;
use mtui_core::terminal_capabilities::TerminalCapabilities;
use mtui_core::terminal_session::{SessionOptions, TerminalSession};
use mtui_style::{AttrColor, Attrs, Color, ColorPairs};

use crate::buffer::Buffer;
use crate::diff::changed_runs;
use crate::terminal::Terminal;

const BUFFER_CAPACITY: usize = 64 * 1024;

/// A real terminal.
pub struct CrosstermTerminal {
    session: TerminalSession,
    capabilities: TerminalCapabilities,
    writer: BufWriter<Stdout>,
    front: Buffer,
    back: Buffer,
    row: u16,
    col: u16,
    color: AttrColor,
    cursor_visible: bool,
    pending: VecDeque<Input>,
    pairs: ColorPairs,
}

impl std::fmt::Debug for CrosstermTerminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrosstermTerminal")
            .field("size", &(self.back.width(), self.back.height()))
            .field("cursor", &(self.row, self.col))
            .finish_non_exhaustive()
    }
}

impl CrosstermTerminal {
    /// Take over the controlling terminal.
    ///
    /// # Errors
    ///
    /// Fails if raw mode cannot be entered or the size cannot be read.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        let session = TerminalSession::new(options)?;
        let (cols, rows) = session.size()?;
        let capabilities = TerminalCapabilities::detect();
        tracing::info!(cols, rows, term = %capabilities.term, "terminal opened");
        let mut term = Self {
            session,
            capabilities,
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, io::stdout()),
            front: Buffer::new(0, 0),
            back: Buffer::new(cols, rows),
            row: 0,
            col: 0,
            color: AttrColor::NONE,
            cursor_visible: true,
            pending: VecDeque::new(),
            pairs: ColorPairs::default(),
        };
        queue!(term.writer, terminal::Clear(terminal::ClearType::All))?;
        Ok(term)
    }

    pub fn capabilities(&self) -> &TerminalCapabilities {
        &self.capabilities
    }

    fn apply_resize(&mut self, cols: u16, rows: u16) {
        self.back.resize(cols, rows);
        // Force a full repaint on the next refresh.
        self.front = Buffer::new(0, 0);
    }

    fn translate(&mut self, event: CtEvent) -> Option<Input> {
        match event {
            CtEvent::Key(key) => {
                let mut codes = keycodes_from_crossterm(&key).into_iter();
                let first = codes.next()?;
                self.pending.extend(codes.map(Input::Key));
                Some(Input::Key(first))
            }
            CtEvent::Resize(cols, rows) => {
                self.apply_resize(cols, rows);
                Some(Input::Resize { cols, rows })
            }
            _ => None,
        }
    }

    fn emit_style(&mut self, color: AttrColor) -> io::Result<()> {
        queue!(self.writer, cts::SetAttribute(Attribute::Reset))?;
        if !color.fg.is_default() {
            queue!(self.writer, cts::SetForegroundColor(to_crossterm(color.fg)))?;
        }
        if !color.bg.is_default() {
            queue!(self.writer, cts::SetBackgroundColor(to_crossterm(color.bg)))?;
        }
        for (flag, attr) in [
            (Attrs::BOLD, Attribute::Bold),
            (Attrs::UNDERLINE, Attribute::Underlined),
            (Attrs::BLINK, Attribute::SlowBlink),
            (Attrs::REVERSE, Attribute::Reverse),
            (Attrs::STANDOUT, Attribute::Reverse),
            (Attrs::ITALIC, Attribute::Italic),
        ] {
            if color.attrs.contains(flag) {
                queue!(self.writer, cts::SetAttribute(attr))?;
            }
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let runs = changed_runs(&self.front, &self.back);
        tracing::trace!(runs = runs.len(), "presenting");
        let mut current: Option<AttrColor> = None;
        for run in runs {
            queue!(self.writer, cursor::MoveTo(run.x0, run.y))?;
            for x in run.x0..=run.x1 {
                let Some(cell) = self.back.get(run.y, x).copied() else {
                    continue;
                };
                if cell.continuation {
                    continue;
                }
                if current != Some(cell.color) {
                    self.emit_style(cell.color)?;
                    current = Some(cell.color);
                }
                queue!(self.writer, cts::Print(cell.ch))?;
            }
        }
        queue!(self.writer, cts::SetAttribute(Attribute::Reset))?;
        if self.cursor_visible {
            queue!(self.writer, cursor::MoveTo(self.col, self.row), cursor::Show)?;
        } else {
            queue!(self.writer, cursor::Hide)?;
        }
        self.front = self.back.clone();
        self.writer.flush()
    }
}

fn to_crossterm(color: Color) -> cts::Color {
    match color {
        Color::Default => cts::Color::Reset,
        Color::Palette(n) => cts::Color::AnsiValue(n),
        Color::Rgb(rgb) => cts::Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        },
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&self) -> (u16, u16) {
        (self.back.width(), self.back.height())
    }

    fn move_to(&mut self, row: u16, col: u16) {
        self.row = row;
        self.col = col;
    }

    fn cursor(&self) -> (u16, u16) {
        (self.row, self.col)
    }

    fn set_color(&mut self, color: AttrColor) {
        self.color = color;
    }

    fn add_char(&mut self, ch: char) {
        let w = self.back.put_char(self.row, self.col, ch, self.color);
        self.col = self.col.saturating_add(w);
    }

    fn clear_to_eol(&mut self) {
        self.back.clear_row_from(self.row, self.col, self.color);
    }

    fn clear(&mut self) {
        self.back.clear();
    }

    fn show_cursor(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.present()
    }

    fn poll_input(&mut self, timeout: Duration) -> Input {
        let flags = self.session.signal_flags().clone();
        if flags.take_resize() {
            if let Ok((cols, rows)) = self.session.size() {
                self.apply_resize(cols, rows);
                return Input::Resize { cols, rows };
            }
        }
        if flags.take_interrupt() {
            return Input::Interrupt;
        }
        if let Some(input) = self.pending.pop_front() {
            return input;
        }

        let deadline = Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            match cte::poll(left) {
                Ok(true) => match cte::read() {
                    Ok(event) => {
                        if let Some(input) = self.translate(event) {
                            return input;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "terminal read failed");
                        return Input::Closed;
                    }
                },
                Ok(false) => return Input::Timeout,
                Err(err) => {
                    tracing::warn!(error = %err, "terminal poll failed");
                    return Input::Closed;
                }
            }
            if flags.take_interrupt() {
                return Input::Interrupt;
            }
            if left.is_zero() {
                return Input::Timeout;
            }
        }
    }

    fn flush_input(&mut self) {
        self.pending.clear();
        while matches!(cte::poll(Duration::ZERO), Ok(true)) {
            if cte::read().is_err() {
                break;
            }
        }
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        if let Some(seq) = self.capabilities.title_sequence(title) {
            self.writer.write_all(seq.as_bytes())?;
        }
        if let Some(seq) = self.capabilities.icon_sequence(title) {
            self.writer.write_all(seq.as_bytes())?;
        }
        self.writer.flush()
    }

    fn color_pairs(&mut self) -> &mut ColorPairs {
        &mut self.pairs
    }

    fn suspend(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.session.suspend()
    }

    fn resume(&mut self) -> io::Result<()> {
        self.session.resume()?;
        self.front = Buffer::new(0, 0);
        queue!(self.writer, terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn beep(&mut self) {
        let _ = self.writer.write_all(b"\x07");
    }
}
