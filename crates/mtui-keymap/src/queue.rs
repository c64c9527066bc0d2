#![forbid(unsafe_code)]

//! Pending input that did not come from the terminal.
//!
//! Two stacks feed the key reader ahead of the terminal:
//!
//! - the **unget** stack holds keys handed back by the dispatcher (a partial
//!   key sequence that turned out not to match, a foreign function name);
//! - the **macro** stack holds the expansion of macros and of `push`/`exec`.
//!
//! Both are LIFO: whatever must be read first is pushed last. The unget
//! stack always wins; the macro stack can be ignored while a prompt is
//! reading (see [`EventQueue::pop`]).

use mtui_core::{KeyEvent, Keycode, MenuId, Op};

use crate::error::BindError;
use crate::keys::lookup_key_name;
use crate::ops::OP_END_COND;
use crate::registry::Keymaps;

/// Upper bound on queued macro events; a runaway expansion is dropped.
pub const MAX_QUEUED_EVENTS: usize = 4096;

#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    unget: Vec<KeyEvent>,
    macros: Vec<KeyEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return an event so it is read next.
    pub fn unget(&mut self, ev: KeyEvent) {
        self.unget.push(ev);
    }

    pub fn unget_key(&mut self, ch: Keycode) {
        self.unget(KeyEvent::key(ch));
    }

    pub fn unget_op(&mut self, op: Op) {
        self.unget(KeyEvent::op(op));
    }

    /// Return the bytes of `s` so they are read in order.
    pub fn unget_string(&mut self, s: &str) {
        for b in s.bytes().rev() {
            self.unget_key(Keycode::from(b));
        }
    }

    pub fn push_macro_event(&mut self, ev: KeyEvent) -> bool {
        if self.macros.len() >= MAX_QUEUED_EVENTS {
            tracing::warn!(queued = self.macros.len(), "macro queue full");
            return false;
        }
        self.macros.push(ev);
        true
    }

    pub fn push_macro_op(&mut self, op: Op) -> bool {
        self.push_macro_event(KeyEvent::op(op))
    }

    /// Queue a macro body so it is read in order.
    ///
    /// `<name>` tokens become the named key, or the named function of any
    /// menu; everything else is taken byte by byte. Returns `false`, queuing
    /// nothing, when the body would overflow the queue.
    pub fn push_macro_string(&mut self, text: &str, keymaps: &Keymaps) -> bool {
        let events = tokenize_macro(text, keymaps);
        if self.macros.len() + events.len() > MAX_QUEUED_EVENTS {
            tracing::warn!(
                queued = self.macros.len(),
                adding = events.len(),
                "macro queue full"
            );
            return false;
        }
        self.macros.extend(events.into_iter().rev());
        true
    }

    /// Queue the named functions, resolved in `menu`, to run in order.
    pub fn exec(
        &mut self,
        functions: &[&str],
        menu: MenuId,
        keymaps: &Keymaps,
    ) -> Result<(), BindError> {
        let mut ops = Vec::with_capacity(functions.len());
        for name in functions {
            let op = keymaps
                .resolve_function(menu, name)
                .ok_or_else(|| BindError::NoSuchFunction((*name).to_string()))?;
            ops.push(op);
        }
        for op in ops.into_iter().rev() {
            self.push_macro_op(op);
        }
        Ok(())
    }

    /// Next queued event: ungotten first, then macro events unless
    /// `ignore_macro` is set.
    pub fn pop(&mut self, ignore_macro: bool) -> Option<KeyEvent> {
        if let Some(ev) = self.unget.pop() {
            return Some(ev);
        }
        if ignore_macro {
            return None;
        }
        self.macros.pop()
    }

    /// Drop queued macro events up to and including the next end-cond
    /// marker.
    pub fn flush_to_end_cond(&mut self) {
        while let Some(ev) = self.macros.pop() {
            if ev.op == OP_END_COND {
                break;
            }
        }
    }

    pub fn flush_macros(&mut self) {
        self.macros.clear();
    }

    /// Drop everything.
    pub fn flush(&mut self) {
        self.unget.clear();
        self.macros.clear();
    }

    pub fn unget_len(&self) -> usize {
        self.unget.len()
    }

    pub fn macro_len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unget.is_empty() && self.macros.is_empty()
    }
}

fn tokenize_macro(text: &str, keymaps: &Keymaps) -> Vec<KeyEvent> {
    let mut events = Vec::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            if let Some(end) = rest[1..].find('>') {
                let name = &rest[1..=end];
                let token = lookup_key_name(name)
                    .map(KeyEvent::key)
                    .or_else(|| keymaps.any_function_op(name).map(KeyEvent::op));
                if let Some(ev) = token {
                    events.push(ev);
                    rest = &rest[end + 2..];
                    continue;
                }
            }
        }
        let mut buf = [0u8; 4];
        events.extend(
            c.encode_utf8(&mut buf)
                .bytes()
                .map(|b| KeyEvent::key(Keycode::from(b))),
        );
        rest = &rest[c.len_utf8()..];
    }
    events
}
