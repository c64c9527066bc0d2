#![forbid(unsafe_code)]

//! Reading a line of text on the message line.

use mtui_core::event::KEY_KEYPAD_ENTER;
use mtui_core::geometry::WindowActions;
use mtui_core::{KeyEvent, Keycode, MenuId, Op};
use mtui_keymap::ops::{
    OP_EDITOR_BACKSPACE, OP_EDITOR_BACKWARD_CHAR, OP_EDITOR_BOL, OP_EDITOR_DELETE_CHAR,
    OP_EDITOR_EOL, OP_EDITOR_FORWARD_CHAR, OP_EDITOR_KILL_EOL, OP_EDITOR_KILL_LINE,
    OP_EDITOR_KILL_WHOLE_LINE, OP_EDITOR_KILL_WORD, OP_REDRAW,
};
use mtui_render::Terminal;

use crate::context::UiContext;
use crate::msgwin::PromptLine;
use crate::role::Role;

impl PromptLine {
    fn insert(&mut self, ch: char) {
        self.buf.insert(self.pos, ch);
        self.pos += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos -= 1;
        self.buf.remove(self.pos);
        true
    }

    fn delete_char(&mut self) -> bool {
        if self.pos >= self.buf.len() {
            return false;
        }
        self.buf.remove(self.pos);
        true
    }

    /// Delete the word before the cursor, and the blanks after it.
    fn kill_word(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        let mut start = self.pos;
        while start > 0 && self.buf[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.buf[start - 1].is_whitespace() {
            start -= 1;
        }
        self.buf.drain(start..self.pos);
        self.pos = start;
        true
    }

    /// Apply an editor operation. Returns `false` if it did nothing.
    fn apply(&mut self, op: Op) -> bool {
        match op {
            OP_EDITOR_BACKSPACE => self.backspace(),
            OP_EDITOR_DELETE_CHAR => self.delete_char(),
            OP_EDITOR_BOL => {
                self.pos = 0;
                true
            }
            OP_EDITOR_EOL => {
                self.pos = self.buf.len();
                true
            }
            OP_EDITOR_BACKWARD_CHAR if self.pos > 0 => {
                self.pos -= 1;
                true
            }
            OP_EDITOR_FORWARD_CHAR if self.pos < self.buf.len() => {
                self.pos += 1;
                true
            }
            OP_EDITOR_KILL_LINE => {
                self.buf.drain(..self.pos);
                self.pos = 0;
                true
            }
            OP_EDITOR_KILL_EOL => {
                self.buf.truncate(self.pos);
                true
            }
            OP_EDITOR_KILL_WHOLE_LINE => {
                self.buf.clear();
                self.pos = 0;
                true
            }
            OP_EDITOR_KILL_WORD => self.kill_word(),
            _ => false,
        }
    }
}

fn is_enter(ch: Keycode) -> bool {
    ch == Keycode::from(b'\n') || ch == Keycode::from(b'\r') || ch == KEY_KEYPAD_ENTER
}

impl<T: Terminal> UiContext<T> {
    /// Ask for a line of text, starting from `initial`.
    ///
    /// The message line becomes a prompt and takes focus until Enter
    /// (returns the text) or abort (returns `None`). Keys go through the
    /// editor menu; queued macro events are held back meanwhile.
    pub fn get_field(&mut self, label: &str, initial: &str) -> Option<String> {
        let msg = self.layout.message;
        let old_focus = self.tree.focus();
        let old_ignore = self.set_ignore_macro(true);

        self.message_clear();
        self.set_prompt(Some(PromptLine::new(label, initial)));
        self.set_focus(msg);

        let result = self.read_field();

        self.set_prompt(None);
        if let Some(win) = old_focus {
            self.set_focus(win);
        }
        self.set_ignore_macro(old_ignore);
        tracing::debug!(label, answered = result.is_some(), "prompt finished");
        result
    }

    fn read_field(&mut self) -> Option<String> {
        let mut pending: Vec<u8> = Vec::new();
        loop {
            self.redraw();
            let KeyEvent { ch, op } = self.dokey(MenuId::EDITOR);
            match op {
                Op::ABORT => return None,
                Op::TIMEOUT | Op::REPAINT => {}
                OP_REDRAW => self.redraw_all(),
                Op::NULL if is_enter(ch) => {
                    return self.prompt_mut().map(|p| p.text());
                }
                Op::NULL if (0x20..0x100).contains(&ch) && ch != 0x7f => {
                    pending.push(ch as u8);
                    match std::str::from_utf8(&pending) {
                        Ok(s) => {
                            let chars: Vec<char> = s.chars().collect();
                            pending.clear();
                            if let Some(p) = self.prompt_mut() {
                                for c in chars {
                                    p.insert(c);
                                }
                            }
                            self.repaint(self.layout.message);
                        }
                        Err(err) if err.error_len().is_some() => {
                            pending.clear();
                            self.term.beep();
                        }
                        Err(_) => {}
                    }
                }
                op => {
                    let done = self.prompt_mut().is_some_and(|p| p.apply(op));
                    if done {
                        self.repaint(self.layout.message);
                    } else {
                        self.term.beep();
                    }
                }
            }
        }
    }

    fn prompt_mut(&mut self) -> Option<&mut PromptLine> {
        match self.tree.data_mut(self.layout.message)? {
            Role::Message(mw) => mw.prompt_mut(),
            _ => None,
        }
    }

    fn set_prompt(&mut self, prompt: Option<PromptLine>) {
        let msg = self.layout.message;
        if let Some(Role::Message(mw)) = self.tree.data_mut(msg) {
            mw.set_prompt(prompt);
            self.tree.request(msg, WindowActions::REPAINT);
        }
    }
}
