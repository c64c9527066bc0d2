#![forbid(unsafe_code)]

//! Turning input into operations.
//!
//! [`UiContext::getch`] reads one event: a key handed back by the
//! dispatcher, a queued macro event, or a key from the terminal. The
//! terminal is polled in slices so the overall timeout and the active
//! menu's keep-alive hook can be serviced while waiting.
//!
//! [`UiContext::dokey`] walks a menu's bindings one key at a time. A full
//! match yields its operation; a macro is expanded onto the queue and the
//! walk restarts. When nothing matches, the keys are handed back and the
//! generic menu gets a try (for menus that inherit it).
//!
//! [`UiContext::next_op`] adds the tag prefix on top.

use std::time::Duration;

use mtui_core::event::KEY_ESC;
use mtui_core::{Event, Input, KeyEvent, Keycode, MenuId, Op};
use mtui_keymap::ops::{OP_END_COND, OP_TAG_PREFIX, OP_TAG_PREFIX_COND};
use mtui_keymap::{Keymap, MatchStep, Matcher};
use mtui_render::Terminal;

use crate::context::UiContext;

/// Macro expansions allowed while resolving a single key.
pub const MACRO_LOOP_LIMIT: usize = 10;

const MIN_POLL: Duration = Duration::from_millis(1);

/// An operation read by [`UiContext::next_op`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatched {
    pub event: KeyEvent,
    /// The tag prefix was active: apply the operation to every tagged entry.
    pub tag: bool,
}

/// What a trie step left us with, detached from the keymap borrow.
enum Step {
    Pending,
    NoMatch,
    Op(Op),
    Macro(String),
}

impl<T: Terminal> UiContext<T> {
    /// Read the next event.
    ///
    /// Ungotten events come first, then macro events (unless macros are
    /// being ignored), then the terminal. Terminal input can also produce
    /// [`KeyEvent::ABORT`] (abort key, interrupt, lost input),
    /// [`KeyEvent::REPAINT`] (resize) and [`KeyEvent::TIMEOUT`].
    pub fn getch(&mut self) -> KeyEvent {
        if let Some(ev) = self.queue.pop(self.ignore_macro) {
            return ev;
        }
        self.read_terminal()
    }

    fn read_terminal(&mut self) -> KeyEvent {
        let timeout = self.config.dispatch.timeout;
        let keep_alive = self.config.dispatch.keep_alive;
        let poll_slice = self.config.dispatch.poll_slice;

        let mut waited = Duration::ZERO;
        let mut since_keep_alive = Duration::ZERO;
        loop {
            let mut slice = poll_slice.min(timeout.saturating_sub(waited));
            if let Some(period) = keep_alive {
                slice = slice.min(period.saturating_sub(since_keep_alive));
            }
            let slice = slice.max(MIN_POLL);

            match self.term.poll_input(slice) {
                Input::Key(ch) => return self.translate_key(ch),
                Input::Resize { cols, rows } => {
                    self.resize(cols, rows);
                    return KeyEvent::REPAINT;
                }
                Input::Interrupt => {
                    tracing::debug!("interrupted");
                    self.term.flush_input();
                    return KeyEvent::ABORT;
                }
                Input::Closed => {
                    tracing::debug!("input closed");
                    return KeyEvent::ABORT;
                }
                Input::Timeout => {
                    waited += slice;
                    since_keep_alive += slice;
                    if keep_alive.is_some_and(|period| since_keep_alive >= period) {
                        self.run_keep_alive();
                        since_keep_alive = Duration::ZERO;
                    }
                    if waited >= timeout {
                        self.send(&Event::Timeout);
                        return KeyEvent::TIMEOUT;
                    }
                }
            }
        }
    }

    fn translate_key(&mut self, ch: Keycode) -> KeyEvent {
        let dispatch = &self.config.dispatch;
        if ch == dispatch.abort_key {
            return KeyEvent::ABORT;
        }
        if dispatch.meta_key && (0x80..0x100).contains(&ch) {
            self.queue.unget_key(ch & 0x7f);
            return KeyEvent::key(KEY_ESC);
        }
        KeyEvent::key(ch)
    }

    fn run_keep_alive(&mut self) {
        let menu = self.current_menu;
        for (m, hook) in &mut self.keep_alive {
            if *m == menu {
                hook();
            }
        }
    }

    /// Read keys until they resolve to something in `menu`.
    ///
    /// Returns an operation, a control event (abort, repaint, timeout), or
    /// a bare key with [`Op::NULL`] when the keys are not bound.
    pub fn dokey(&mut self, menu: MenuId) -> KeyEvent {
        self.current_menu = menu;
        let empty = self.keymaps.keymap(menu).is_none_or(Keymap::is_empty);
        if empty && menu != MenuId::EDITOR {
            return self.retry_generic(menu, &[], None);
        }

        let mut matcher = Matcher::new();
        let mut expansions = 0;
        loop {
            let ev = self.getch();
            if ev.op.is_control() {
                return ev;
            }

            if !ev.op.is_null() {
                if self.keymaps.op_valid(menu, ev.op) {
                    return ev;
                }
                // a function of another menu: feed its name back as keys
                match self.keymaps.any_function_name(ev.op) {
                    Some(name) => {
                        self.queue.unget_key(Keycode::from(b'>'));
                        self.queue.unget_string(name);
                        self.queue.unget_key(Keycode::from(b'<'));
                        continue;
                    }
                    None => return ev,
                }
            }

            let step = match self.keymaps.keymap(menu) {
                Some(map) => match matcher.feed(map, ev.ch) {
                    MatchStep::Pending => Step::Pending,
                    MatchStep::NoMatch => Step::NoMatch,
                    MatchStep::Matched(binding) => match binding.op() {
                        Some(op) => Step::Op(op),
                        None => Step::Macro(binding.macro_text().unwrap_or_default().to_string()),
                    },
                },
                None => return ev,
            };

            match step {
                Step::Pending => {}
                Step::NoMatch => {
                    let keys = matcher.consumed().to_vec();
                    return self.retry_generic(menu, &keys, Some(ev.ch));
                }
                Step::Op(op) => return KeyEvent::new(ev.ch, op),
                Step::Macro(text) => {
                    if self.ignore_macro {
                        return KeyEvent::key(ev.ch);
                    }
                    if expansions == MACRO_LOOP_LIMIT {
                        self.queue.flush();
                        self.term.flush_input();
                        self.error("Macro loop detected.");
                        return KeyEvent::ABORT;
                    }
                    expansions += 1;
                    self.queue.push_macro_string(&text, &self.keymaps);
                    matcher.reset();
                }
            }
        }
    }

    /// Hand the keys read so far back, then let the generic menu try them.
    fn retry_generic(&mut self, menu: MenuId, keys: &[Keycode], last: Option<Keycode>) -> KeyEvent {
        if let Some(ch) = last {
            self.queue.unget_key(ch);
        }
        for &key in keys.iter().rev() {
            self.queue.unget_key(key);
        }

        if menu.inherits_generic() {
            let ev = self.dokey(MenuId::GENERIC);
            self.current_menu = menu;
            return ev;
        }
        if menu == MenuId::PAGER {
            self.queue.flush_macros();
        }
        KeyEvent::key(self.getch().ch)
    }

    /// Report an unbound key.
    pub fn error_key(&mut self, menu: MenuId) {
        let text = self.keymaps.not_bound_message(menu);
        self.error(&text);
    }

    /// Redraw, then read the next operation for `menu`.
    ///
    /// Handles the tag prefix: `tag-prefix` arms it when `tagged` entries
    /// exist, and the next operation comes back with `tag` set. Pressing
    /// the prefix twice, or aborting, disarms it. `tag-prefix-cond` with
    /// nothing tagged drops the rest of the running macro. Unbound keys are
    /// reported and skipped.
    pub fn next_op(&mut self, menu: MenuId, tagged: usize) -> Dispatched {
        loop {
            self.redraw();
            let event = self.dokey(menu);

            if event.op == Op::ABORT && self.tag_prefix {
                self.tag_prefix = false;
                self.message_clear();
                continue;
            }
            if event.op.is_control() {
                return Dispatched { event, tag: false };
            }

            if event.op == OP_TAG_PREFIX || event.op == OP_TAG_PREFIX_COND {
                if self.tag_prefix {
                    self.tag_prefix = false;
                    self.message_clear();
                } else if tagged == 0 {
                    if event.op == OP_TAG_PREFIX {
                        self.error("No tagged entries.");
                    } else {
                        self.queue.flush_to_end_cond();
                        self.message("Nothing to do");
                    }
                } else {
                    self.tag_prefix = true;
                    self.message("Tag-");
                }
                continue;
            }
            if event.op == OP_END_COND {
                continue;
            }
            if event.op.is_null() {
                self.error_key(menu);
                continue;
            }

            let tag = std::mem::take(&mut self.tag_prefix);
            if tag {
                self.message_clear();
            }
            return Dispatched { event, tag };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use mtui_core::event::key_ctrl;
    use mtui_keymap::ops::{OP_EDITOR_BOL, OP_EXIT, OP_HELP, OP_NEXT_LINE, OP_NEXT_PAGE};
    use mtui_render::HeadlessTerminal;

    use super::*;
    use crate::config::{DispatchConfig, UiConfig};

    fn ctx_with(config: UiConfig) -> UiContext<HeadlessTerminal> {
        UiContext::new(HeadlessTerminal::new(40, 10), config)
    }

    fn ctx() -> UiContext<HeadlessTerminal> {
        ctx_with(UiConfig::default())
    }

    #[test]
    fn queue_comes_before_terminal() {
        let mut ctx = ctx();
        ctx.terminal_mut().push_keys("a");
        ctx.queue_mut().push_macro_op(OP_HELP);
        ctx.queue_mut().unget_key(Keycode::from(b'z'));
        assert_eq!(ctx.getch(), KeyEvent::key(Keycode::from(b'z')));
        assert_eq!(ctx.getch(), KeyEvent::op(OP_HELP));
        assert_eq!(ctx.getch(), KeyEvent::key(Keycode::from(b'a')));
        assert_eq!(ctx.getch(), KeyEvent::ABORT);
    }

    #[test]
    fn abort_key_aborts() {
        let mut ctx = ctx();
        ctx.terminal_mut().push_key(key_ctrl(b'G'));
        assert_eq!(ctx.getch(), KeyEvent::ABORT);
    }

    #[test]
    fn meta_key_splits_high_bytes() {
        let mut ctx = ctx_with(UiConfig::default().with_dispatch(
            DispatchConfig::default().with_meta_key(true),
        ));
        ctx.terminal_mut().push_key(0xE1);
        assert_eq!(ctx.getch(), KeyEvent::key(KEY_ESC));
        assert_eq!(ctx.getch(), KeyEvent::key(0x61));
    }

    #[test]
    fn timeout_runs_keep_alive_and_notifies() {
        let config = UiConfig::default().with_dispatch(
            DispatchConfig::default()
                .with_timeout(Duration::from_secs(3))
                .with_keep_alive(Some(Duration::from_secs(1))),
        );
        let mut ctx = UiContext::new(
            HeadlessTerminal::new(40, 10).with_exhausted(Input::Timeout),
            config,
        );
        let beats = Rc::new(Cell::new(0));
        let counter = beats.clone();
        ctx.set_keep_alive(MenuId::PAGER, move || counter.set(counter.get() + 1));
        let timeouts = Rc::new(Cell::new(0));
        let seen = timeouts.clone();
        ctx.observe(mtui_core::EventTypes::TIMEOUT, move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        });

        assert_eq!(ctx.dokey(MenuId::PAGER), KeyEvent::TIMEOUT);
        assert_eq!(beats.get(), 3);
        assert_eq!(timeouts.get(), 1);
    }

    #[test]
    fn resize_is_a_repaint() {
        let mut ctx = ctx();
        ctx.redraw();
        ctx.terminal_mut().resize(50, 12);
        assert_eq!(ctx.getch(), KeyEvent::REPAINT);
        assert_eq!(ctx.tree().state(ctx.tree().root()).unwrap().cols, 50);
    }

    #[test]
    fn bound_key_resolves() {
        let mut ctx = ctx();
        ctx.terminal_mut().push_key(Keycode::from(b' '));
        let ev = ctx.dokey(MenuId::PAGER);
        assert_eq!(ev.op, OP_NEXT_PAGE);
        assert_eq!(ctx.current_menu(), MenuId::PAGER);
    }

    #[test]
    fn inheriting_menu_falls_back_to_generic() {
        let mut ctx = ctx();
        ctx.keymaps_mut().bind("generic", "x", "exit").unwrap();
        ctx.terminal_mut().push_keys("x");
        let ev = ctx.dokey(MenuId::DIALOG);
        assert_eq!(ev, KeyEvent::new(Keycode::from(b'x'), OP_EXIT));
        assert_eq!(ctx.current_menu(), MenuId::DIALOG);
    }

    #[test]
    fn partial_sequence_is_handed_back() {
        let mut ctx = ctx();
        ctx.keymaps_mut().bind("editor", "ab", "bol").unwrap();
        ctx.terminal_mut().push_keys("ac");
        let ev = ctx.dokey(MenuId::EDITOR);
        assert_eq!(ev, KeyEvent::key(Keycode::from(b'a')));
        assert_eq!(ctx.getch(), KeyEvent::key(Keycode::from(b'c')));

        ctx.terminal_mut().push_keys("ab");
        assert_eq!(ctx.dokey(MenuId::EDITOR).op, OP_EDITOR_BOL);
    }

    #[test]
    fn foreign_function_is_spelled_out() {
        let mut ctx = ctx();
        ctx.queue_mut().push_macro_op(OP_EDITOR_BOL);
        let ev = ctx.dokey(MenuId::PAGER);
        assert!(ev.op.is_null());
        assert_eq!(ev.ch, Keycode::from(b'<'));
        assert_eq!(ctx.queue().macro_len(), 0);
    }

    #[test]
    fn macro_expands_to_ops() {
        let mut ctx = ctx();
        ctx.keymaps_mut()
            .macro_bind("pager", "X", "<next-line>", None)
            .unwrap();
        ctx.terminal_mut().push_keys("X");
        assert_eq!(ctx.dokey(MenuId::PAGER).op, OP_NEXT_LINE);
    }

    #[test]
    fn macros_are_inert_while_ignored() {
        let mut ctx = ctx();
        ctx.keymaps_mut()
            .macro_bind("pager", "X", "<next-line>", None)
            .unwrap();
        ctx.terminal_mut().push_keys("X");
        ctx.set_ignore_macro(true);
        assert_eq!(ctx.dokey(MenuId::PAGER), KeyEvent::key(Keycode::from(b'X')));
        assert_eq!(ctx.queue().macro_len(), 0);
    }

    #[test]
    fn tag_prefix_marks_next_op() {
        let mut ctx = ctx();
        ctx.keymaps_mut().bind("dialog", ";", "tag-prefix").unwrap();
        ctx.terminal_mut().push_keys(";q");
        ctx.keymaps_mut().bind("dialog", "q", "exit").unwrap();

        let got = ctx.next_op(MenuId::DIALOG, 2);
        assert_eq!(got.event.op, OP_EXIT);
        assert!(got.tag);
        assert!(!ctx.is_tag_prefix());
    }

    #[test]
    fn tag_prefix_without_tags_is_an_error() {
        let mut ctx = ctx();
        ctx.keymaps_mut().bind("dialog", ";", "tag-prefix").unwrap();
        ctx.keymaps_mut().bind("dialog", "q", "exit").unwrap();
        ctx.terminal_mut().push_keys(";q");

        let got = ctx.next_op(MenuId::DIALOG, 0);
        assert_eq!(got.event.op, OP_EXIT);
        assert!(!got.tag);
        assert_eq!(ctx.message_text(), "No tagged entries.");
    }

    #[test]
    fn abort_cancels_a_pending_prefix() {
        let mut ctx = ctx();
        ctx.keymaps_mut().bind("dialog", ";", "tag-prefix").unwrap();
        ctx.terminal_mut().push_keys(";");
        ctx.terminal_mut().push_key(key_ctrl(b'G'));

        let got = ctx.next_op(MenuId::DIALOG, 1);
        assert_eq!(got.event, KeyEvent::ABORT);
        assert!(!got.tag);
        assert!(!ctx.is_tag_prefix());
    }

    #[test]
    fn unbound_keys_are_reported() {
        let mut ctx = ctx();
        ctx.keymaps_mut().bind("dialog", "q", "exit").unwrap();
        ctx.terminal_mut().push_keys("Yq");
        let got = ctx.next_op(MenuId::DIALOG, 0);
        assert_eq!(got.event.op, OP_EXIT);
        assert!(ctx.message_text().starts_with("Key is not bound."));
    }
}
