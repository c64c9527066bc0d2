#![forbid(unsafe_code)]

//! The message line at the bottom of the screen.
//!
//! In passive mode the window shows a coloured text. The text is measured
//! once into per-character descriptions, then laid out into at most
//! [`MAX_ROWS`] rows of same-colour chunks whenever the text or the
//! window's width changes. The window asks for as many rows as the layout
//! used.
//!
//! In active mode a prompt owns the window: it shows a label and an edit
//! buffer and places the cursor.

use mtui_core::WindowState;
use mtui_layout::Canvas;
use mtui_style::{AttrColor, ColorId};
use mtui_text::width::{
    Decoded, EMOJI_PRESENTATION, REPLACEMENT_CHAR, char_width, decode, is_printable, str_width,
    wcwidth,
};

use crate::role::RenderEnv;

/// Most rows the message line grows to.
pub const MAX_ROWS: usize = 3;

/// One measured character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MwChar {
    pub width: u16,
    pub bytes: usize,
    pub color: AttrColor,
}

/// A run of characters on one row sharing a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MwChunk {
    pub offset: usize,
    pub bytes: usize,
    pub width: u16,
    pub color: AttrColor,
}

/// The line being edited by an active prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptLine {
    pub label: String,
    pub buf: Vec<char>,
    pub pos: usize,
}

impl PromptLine {
    pub fn new(label: impl Into<String>, initial: &str) -> Self {
        let buf: Vec<char> = initial.chars().collect();
        Self {
            label: label.into(),
            pos: buf.len(),
            buf,
        }
    }

    pub fn text(&self) -> String {
        self.buf.iter().collect()
    }
}

/// Message window state.
#[derive(Debug, Clone, Default)]
pub struct MessageWindow {
    text: Vec<u8>,
    chars: Vec<MwChar>,
    rows: [Vec<MwChunk>; MAX_ROWS],
    cursor: (u16, u16),
    prompt: Option<PromptLine>,
}

/// Measure `text`, appending one description per character to `chars`.
///
/// Ill-formed bytes count as one replacement glyph. U+FE0F widens the
/// narrow glyph before it.
pub fn measure(chars: &mut Vec<MwChar>, text: &[u8], color: AttrColor) {
    let mut pos = 0;
    while pos < text.len() {
        let (ch, bytes) = match decode(&text[pos..]) {
            Decoded::Char(c, len) => (c, len),
            Decoded::Invalid(_) => (REPLACEMENT_CHAR, 1),
            Decoded::Empty => break,
        };
        if ch == EMOJI_PRESENTATION {
            if let Some(prev) = chars.last_mut() {
                if prev.width == 1 {
                    prev.width = 2;
                }
            }
        }
        let width = wcwidth(ch).unwrap_or(1) as u16;
        chars.push(MwChar {
            width,
            bytes,
            color,
        });
        pos += bytes;
    }
}

impl MessageWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn chars(&self) -> &[MwChar] {
        &self.chars
    }

    pub fn row(&self, row: usize) -> &[MwChunk] {
        self.rows.get(row).map_or(&[], Vec::as_slice)
    }

    /// Where the last repaint left the cursor, as `(row, col)`.
    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    pub fn prompt(&self) -> Option<&PromptLine> {
        self.prompt.as_ref()
    }

    pub fn prompt_mut(&mut self) -> Option<&mut PromptLine> {
        self.prompt.as_mut()
    }

    pub fn set_prompt(&mut self, prompt: Option<PromptLine>) -> Option<PromptLine> {
        std::mem::replace(&mut self.prompt, prompt)
    }

    /// Replace the text. Returns `false` if it was already showing.
    pub fn set_text(&mut self, text: &[u8], color: AttrColor) -> bool {
        if self.text == text {
            return false;
        }
        self.text.clear();
        self.text.extend_from_slice(text);
        self.chars.clear();
        measure(&mut self.chars, &self.text, color);
        true
    }

    /// Append to the text without laying it out.
    pub fn add_text(&mut self, text: &[u8], color: AttrColor) {
        self.text.extend_from_slice(text);
        measure(&mut self.chars, text, color);
    }

    /// Lay the text out in `cols` columns; returns the rows used.
    pub fn calc_rows(&mut self, cols: u16) -> usize {
        for row in &mut self.rows {
            row.clear();
        }
        if self.text.is_empty() {
            return 0;
        }

        let mut width = 0u16;
        let mut offset = 0usize;
        let mut row = 0usize;
        let mut new_row = false;

        for mwc in &self.chars {
            if mwc.bytes == 1 && self.text.get(offset) == Some(&b'\n') {
                new_row = true;
                offset += 1;
                continue;
            }

            let current = &mut self.rows[row];
            if width + mwc.width > cols || new_row {
                new_row = false;
                row += 1;
                if row >= MAX_ROWS {
                    row = MAX_ROWS - 1;
                    break;
                }
                self.rows[row].push(MwChunk {
                    offset,
                    bytes: mwc.bytes,
                    width: mwc.width,
                    color: mwc.color,
                });
                width = 0;
            } else if current.last().is_none_or(|c| c.color != mwc.color) {
                current.push(MwChunk {
                    offset,
                    bytes: mwc.bytes,
                    width: mwc.width,
                    color: mwc.color,
                });
            } else if let Some(chunk) = current.last_mut() {
                chunk.bytes += mwc.bytes;
                chunk.width += mwc.width;
            }
            offset += mwc.bytes;
            width += mwc.width;
        }

        tracing::trace!(rows = row + 1, cols, "message laid out");
        row + 1
    }

    /// Rows to request for `used` laid-out rows.
    pub fn clamp_rows(used: usize) -> u16 {
        used.clamp(1, MAX_ROWS) as u16
    }

    pub fn repaint(&mut self, canvas: &mut Canvas<'_>, env: &RenderEnv<'_>) {
        let normal = env.colors.get(ColorId::Normal);
        if let Some(prompt) = &self.prompt {
            canvas.move_to(0, 0);
            canvas.set_color(env.colors.merged(ColorId::Prompt));
            canvas.add_str(&prompt.label);
            canvas.set_color(normal);
            let col = str_width(&prompt.label)
                + prompt.buf[..prompt.pos].iter().copied().map(char_width).sum::<usize>();
            for &ch in &prompt.buf {
                canvas.add_char(ch);
            }
            canvas.clear_to_eol();
            let col = (col as u16).min(canvas.cols().saturating_sub(1));
            canvas.move_to(0, col);
            self.cursor = (0, col);
            return;
        }

        for row in 0..MAX_ROWS {
            if row as u16 >= canvas.rows() {
                break;
            }
            canvas.move_to(row as u16, 0);
            if self.rows[row].is_empty() {
                break;
            }
            for chunk in &self.rows[row] {
                canvas.set_color(chunk.color);
                draw_bytes(canvas, &self.text[chunk.offset..chunk.offset + chunk.bytes]);
            }
            canvas.set_color(normal);
            canvas.clear_to_eol();
        }
        canvas.set_color(normal);
        canvas.clear_to_eol();
        self.cursor = canvas.cursor();
    }

    pub fn recursor(&self, canvas: &mut Canvas<'_>) -> bool {
        if self.prompt.is_none() {
            return false;
        }
        canvas.move_to(self.cursor.0, self.cursor.1);
        true
    }

    /// React to a geometry change. Returns the rows to request when the
    /// layout must be redone.
    pub fn state_changed(&mut self, state: &WindowState, hidden: bool, resized: bool) -> Option<u16> {
        if hidden {
            self.set_text(b"", AttrColor::NONE);
        }
        if resized || hidden {
            return Some(Self::clamp_rows(self.calc_rows(state.cols)));
        }
        None
    }
}

fn draw_bytes(canvas: &mut Canvas<'_>, bytes: &[u8]) {
    let mut pos = 0;
    while pos < bytes.len() {
        match decode(&bytes[pos..]) {
            Decoded::Char(c, len) => {
                if c == EMOJI_PRESENTATION {
                    // the widened glyph before it was already drawn
                } else if is_printable(c) {
                    canvas.add_char(c);
                } else {
                    canvas.add_char(REPLACEMENT_CHAR);
                }
                pos += len;
            }
            Decoded::Invalid(_) => {
                canvas.add_char(REPLACEMENT_CHAR);
                pos += 1;
            }
            Decoded::Empty => break,
        }
    }
}
