#![forbid(unsafe_code)]

//! In-memory terminal with scripted input.
//!
//! Drawing lands in a [`Buffer`] that tests (or embedders without a TTY)
//! can inspect. Input is taken from a queue; once the queue is empty every
//! poll returns the configured *exhausted* input, [`Input::Closed`] by
//! default, so a runaway event loop ends instead of spinning.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use mtui_core::event::{KEY_ESC, Keycode};
use mtui_core::Input;
use mtui_style::{AttrColor, ColorPairs};

use crate::buffer::Buffer;
use crate::terminal::Terminal;

/// A terminal that draws into memory.
#[derive(Debug, Clone)]
pub struct HeadlessTerminal {
    screen: Buffer,
    row: u16,
    col: u16,
    color: AttrColor,
    cursor_visible: bool,
    input: VecDeque<Input>,
    exhausted: Input,
    pairs: ColorPairs,
    title: Option<String>,
    refreshes: usize,
    beeps: usize,
    suspended: bool,
}

impl HeadlessTerminal {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            screen: Buffer::new(cols, rows),
            row: 0,
            col: 0,
            color: AttrColor::NONE,
            cursor_visible: true,
            input: VecDeque::new(),
            exhausted: Input::Closed,
            pairs: ColorPairs::default(),
            title: None,
            refreshes: 0,
            beeps: 0,
            suspended: false,
        }
    }

    /// What to return once scripted input runs out.
    #[must_use]
    pub fn with_exhausted(mut self, input: Input) -> Self {
        self.exhausted = input;
        self
    }

    #[must_use]
    pub fn with_color_pairs(mut self, pairs: ColorPairs) -> Self {
        self.pairs = pairs;
        self
    }

    /// Queue one input event.
    pub fn push_input(&mut self, input: Input) {
        self.input.push_back(input);
    }

    /// Queue a key code.
    pub fn push_key(&mut self, key: Keycode) {
        self.input.push_back(Input::Key(key));
    }

    /// Queue the bytes of `text` as individual keys.
    pub fn push_keys(&mut self, text: &str) {
        for b in text.bytes() {
            self.push_key(Keycode::from(b));
        }
    }

    /// Queue an escape-prefixed (Alt) key.
    pub fn push_alt(&mut self, key: Keycode) {
        self.push_key(KEY_ESC);
        self.push_key(key);
    }

    /// Change the screen size and queue the matching resize event.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.screen.resize(cols, rows);
        self.input.push_back(Input::Resize { cols, rows });
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    pub fn screen(&self) -> &Buffer {
        &self.screen
    }

    /// Text of screen row `row`, trailing blanks removed.
    pub fn row_text(&self, row: u16) -> String {
        self.screen.row_text(row)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    pub fn beep_count(&self) -> usize {
        self.beeps
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}

impl Terminal for HeadlessTerminal {
    fn size(&self) -> (u16, u16) {
        (self.screen.width(), self.screen.height())
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
        let w = self.screen.put_char(self.row, self.col, ch, self.color);
        self.col = self.col.saturating_add(w);
    }

    fn clear_to_eol(&mut self) {
        self.screen.clear_row_from(self.row, self.col, self.color);
    }

    fn clear(&mut self) {
        self.screen.clear();
    }

    fn show_cursor(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.refreshes += 1;
        Ok(())
    }

    fn poll_input(&mut self, _timeout: Duration) -> Input {
        self.input.pop_front().unwrap_or(self.exhausted)
    }

    fn flush_input(&mut self) {
        self.input.retain(|i| !matches!(i, Input::Key(_)));
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        self.title = Some(title.to_string());
        Ok(())
    }

    fn color_pairs(&mut self) -> &mut ColorPairs {
        &mut self.pairs
    }

    fn suspend(&mut self) -> io::Result<()> {
        self.suspended = true;
        Ok(())
    }

    fn resume(&mut self) -> io::Result<()> {
        self.suspended = false;
        Ok(())
    }

    fn beep(&mut self) {
        self.beeps += 1;
    }
}
