#![forbid(unsafe_code)]

//! Key codes, operations and raw terminal input.
//!
//! Keys travel through the runtime as plain integer codes. Codes below
//! `0x100` are bytes exactly as the terminal sent them; named keys
//! (cursor keys, paging keys, function keys) live above that range so the
//! two never collide. A key sequence in a keymap is simply a slice of codes,
//! compared lexicographically.
//!
//! | Range | Meaning |
//! |-------|---------|
//! | `0x000..=0x0FF` | raw bytes (UTF-8 is delivered one byte at a time) |
//! | `0x101..=0x10F` | named navigation and editing keys |
//! | `0x120..=0x147` | Ctrl/Shift/Alt modified navigation keys |
//! | `0x200..=0x2FF` | function keys `F0`..`F255` |
//!
//! An [`Op`] is an opaque operation number. Negative values are reserved for
//! events the dispatcher generates itself (abort, repaint, timeout) and are
//! always returned to the caller immediately.

#[cfg(not(target_arch = "wasm32"))]
use crossterm::event as cte;

/// A key code, see the module docs for the layout.
pub type Keycode = u32;

pub const KEY_UP: Keycode = 0x101;
pub const KEY_DOWN: Keycode = 0x102;
pub const KEY_LEFT: Keycode = 0x103;
pub const KEY_RIGHT: Keycode = 0x104;
pub const KEY_HOME: Keycode = 0x105;
pub const KEY_END: Keycode = 0x106;
pub const KEY_PAGE_UP: Keycode = 0x107;
pub const KEY_PAGE_DOWN: Keycode = 0x108;
pub const KEY_DELETE: Keycode = 0x109;
pub const KEY_INSERT: Keycode = 0x10A;
pub const KEY_BACKSPACE: Keycode = 0x10B;
pub const KEY_KEYPAD_ENTER: Keycode = 0x10C;
pub const KEY_BACK_TAB: Keycode = 0x10D;
pub const KEY_NEXT: Keycode = 0x10E;
pub const KEY_PREV: Keycode = 0x10F;

/// Base code for Ctrl-modified navigation keys, see [`NavKey`].
pub const KEY_CTRL_BASE: Keycode = 0x120;
/// Base code for Shift-modified navigation keys.
pub const KEY_SHIFT_BASE: Keycode = 0x130;
/// Base code for Alt-modified navigation keys.
pub const KEY_ALT_BASE: Keycode = 0x140;

/// Function key zero; `F(n)` is `KEY_F0 + n`.
pub const KEY_F0: Keycode = 0x200;
/// Highest valid key code.
pub const KEY_MAX: Keycode = 0x2FF;

/// Escape byte.
pub const KEY_ESC: Keycode = 0x1B;

/// Code of function key `n`.
#[inline]
#[must_use]
pub const fn key_f(n: u8) -> Keycode {
    KEY_F0 + n as Keycode
}

/// Code of `Ctrl-<c>` for an ASCII letter or one of `@[\]^_?`.
#[inline]
#[must_use]
pub const fn key_ctrl(c: u8) -> Keycode {
    if c == b'?' {
        0x7F
    } else {
        (c.to_ascii_uppercase() & 0x1F) as Keycode
    }
}

/// Navigation keys that have modifier-prefixed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Home = 4,
    End = 5,
    Next = 6,
    Prev = 7,
}

impl NavKey {
    /// All navigation keys, in code order.
    pub const ALL: [NavKey; 8] = [
        NavKey::Up,
        NavKey::Down,
        NavKey::Left,
        NavKey::Right,
        NavKey::Home,
        NavKey::End,
        NavKey::Next,
        NavKey::Prev,
    ];

    /// Name used in `<C-…>` style key strings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            NavKey::Up => "Up",
            NavKey::Down => "Down",
            NavKey::Left => "Left",
            NavKey::Right => "Right",
            NavKey::Home => "Home",
            NavKey::End => "End",
            NavKey::Next => "Next",
            NavKey::Prev => "Prev",
        }
    }

    /// The unmodified code for this key.
    #[must_use]
    pub const fn plain(self) -> Keycode {
        match self {
            NavKey::Up => KEY_UP,
            NavKey::Down => KEY_DOWN,
            NavKey::Left => KEY_LEFT,
            NavKey::Right => KEY_RIGHT,
            NavKey::Home => KEY_HOME,
            NavKey::End => KEY_END,
            NavKey::Next => KEY_PAGE_DOWN,
            NavKey::Prev => KEY_PAGE_UP,
        }
    }

    #[must_use]
    pub const fn ctrl(self) -> Keycode {
        KEY_CTRL_BASE + self as Keycode
    }

    #[must_use]
    pub const fn shift(self) -> Keycode {
        KEY_SHIFT_BASE + self as Keycode
    }

    #[must_use]
    pub const fn alt(self) -> Keycode {
        KEY_ALT_BASE + self as Keycode
    }
}

// ---------------------------------------------------------------------------
// Operations and menus
// ---------------------------------------------------------------------------

/// An operation number produced by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Op(pub i32);

impl Op {
    /// Input timed out.
    pub const TIMEOUT: Op = Op(-4);
    /// The screen must be repainted (terminal resized).
    pub const REPAINT: Op = Op(-3);
    /// The user aborted, or the input source failed.
    pub const ABORT: Op = Op(-1);
    /// No operation; also used to unbind a key.
    pub const NULL: Op = Op(0);

    /// Is this one of the dispatcher's own results (abort, repaint, timeout)?
    #[inline]
    #[must_use]
    pub const fn is_control(self) -> bool {
        self.0 < 0
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Identifier of a menu (a named set of key bindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MenuId(pub u16);

impl MenuId {
    pub const GENERIC: MenuId = MenuId(0);
    pub const DIALOG: MenuId = MenuId(1);
    pub const EDITOR: MenuId = MenuId(2);
    pub const PAGER: MenuId = MenuId(3);

    /// Does this menu fall back to the generic bindings when a key is unbound?
    #[must_use]
    pub const fn inherits_generic(self) -> bool {
        !matches!(self, MenuId::GENERIC | MenuId::EDITOR | MenuId::PAGER)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A key press paired with the operation it resolved to.
///
/// Either part may be empty: a physical key that is not (yet) bound carries
/// `op == Op::NULL`, while an operation pushed by a macro carries `ch == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyEvent {
    pub ch: Keycode,
    pub op: Op,
}

impl KeyEvent {
    pub const ABORT: KeyEvent = KeyEvent::op(Op::ABORT);
    pub const REPAINT: KeyEvent = KeyEvent::op(Op::REPAINT);
    pub const TIMEOUT: KeyEvent = KeyEvent::op(Op::TIMEOUT);

    #[must_use]
    pub const fn new(ch: Keycode, op: Op) -> Self {
        Self { ch, op }
    }

    /// A raw key with no operation attached.
    #[must_use]
    pub const fn key(ch: Keycode) -> Self {
        Self { ch, op: Op::NULL }
    }

    /// An operation with no key attached.
    #[must_use]
    pub const fn op(op: Op) -> Self {
        Self { ch: 0, op }
    }
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// What a terminal driver returns from a single poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A key code.
    Key(Keycode),
    /// The terminal changed size.
    Resize { cols: u16, rows: u16 },
    /// The user pressed the interrupt key (SIGINT).
    Interrupt,
    /// Nothing arrived before the timeout.
    Timeout,
    /// The input source is gone (terminal lost, script exhausted).
    Closed,
}

/// Translate a crossterm key event into the codes the keymap understands.
///
/// Characters outside ASCII become their UTF-8 bytes; `Alt` becomes an
/// escape prefix. Key releases produce nothing.
#[cfg(not(target_arch = "wasm32"))]
#[must_use]
pub fn keycodes_from_crossterm(key: &cte::KeyEvent) -> Vec<Keycode> {
    if key.kind == cte::KeyEventKind::Release {
        return Vec::new();
    }

    let ctrl = key.modifiers.contains(cte::KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(cte::KeyModifiers::SHIFT);
    let alt = key.modifiers.contains(cte::KeyModifiers::ALT);

    let nav = |k: NavKey| {
        if ctrl {
            k.ctrl()
        } else if shift {
            k.shift()
        } else if alt {
            k.alt()
        } else {
            k.plain()
        }
    };

    let mut codes = Vec::with_capacity(4);
    match key.code {
        cte::KeyCode::Char(c) => {
            if alt {
                codes.push(KEY_ESC);
            }
            if ctrl && c.is_ascii() {
                codes.push(key_ctrl(c as u8));
            } else {
                let mut buf = [0u8; 4];
                codes.extend(c.encode_utf8(&mut buf).bytes().map(Keycode::from));
            }
        }
        cte::KeyCode::Enter => codes.push(Keycode::from(b'\n')),
        cte::KeyCode::Tab => codes.push(Keycode::from(b'\t')),
        cte::KeyCode::BackTab => codes.push(KEY_BACK_TAB),
        cte::KeyCode::Backspace => codes.push(KEY_BACKSPACE),
        cte::KeyCode::Esc => codes.push(KEY_ESC),
        cte::KeyCode::Up => codes.push(nav(NavKey::Up)),
        cte::KeyCode::Down => codes.push(nav(NavKey::Down)),
        cte::KeyCode::Left => codes.push(nav(NavKey::Left)),
        cte::KeyCode::Right => codes.push(nav(NavKey::Right)),
        cte::KeyCode::Home => codes.push(nav(NavKey::Home)),
        cte::KeyCode::End => codes.push(nav(NavKey::End)),
        cte::KeyCode::PageDown => codes.push(nav(NavKey::Next)),
        cte::KeyCode::PageUp => codes.push(nav(NavKey::Prev)),
        cte::KeyCode::Delete => codes.push(KEY_DELETE),
        cte::KeyCode::Insert => codes.push(KEY_INSERT),
        cte::KeyCode::F(n) => codes.push(key_f(n)),
        cte::KeyCode::Null => codes.push(0),
        _ => {}
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_do_not_collide_with_bytes() {
        assert!(KEY_UP > 0xFF);
        assert!(NavKey::Prev.alt() < KEY_F0);
        assert_eq!(key_f(255), KEY_MAX);
    }

    #[test]
    fn control_codes() {
        assert_eq!(key_ctrl(b'g'), 7);
        assert_eq!(key_ctrl(b'G'), 7);
        assert_eq!(key_ctrl(b'['), KEY_ESC);
        assert_eq!(key_ctrl(b'?'), 0x7F);
    }

    #[test]
    fn control_ops_are_negative() {
        assert!(Op::ABORT.is_control());
        assert!(Op::TIMEOUT.is_control());
        assert!(!Op::NULL.is_control());
        assert!(Op::NULL.is_null());
    }

    #[test]
    fn generic_inheritance() {
        assert!(!MenuId::GENERIC.inherits_generic());
        assert!(!MenuId::EDITOR.inherits_generic());
        assert!(!MenuId::PAGER.inherits_generic());
        assert!(MenuId::DIALOG.inherits_generic());
        assert!(MenuId(9).inherits_generic());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn crossterm_translation() {
        let ev = |code, mods| cte::KeyEvent::new(code, mods);
        assert_eq!(
            keycodes_from_crossterm(&ev(cte::KeyCode::Char('q'), cte::KeyModifiers::NONE)),
            vec![Keycode::from(b'q')]
        );
        assert_eq!(
            keycodes_from_crossterm(&ev(cte::KeyCode::Char('g'), cte::KeyModifiers::CONTROL)),
            vec![7]
        );
        assert_eq!(
            keycodes_from_crossterm(&ev(cte::KeyCode::Char('x'), cte::KeyModifiers::ALT)),
            vec![KEY_ESC, Keycode::from(b'x')]
        );
        assert_eq!(
            keycodes_from_crossterm(&ev(cte::KeyCode::Up, cte::KeyModifiers::CONTROL)),
            vec![NavKey::Up.ctrl()]
        );
        assert_eq!(
            keycodes_from_crossterm(&ev(cte::KeyCode::F(5), cte::KeyModifiers::NONE)),
            vec![key_f(5)]
        );
        assert_eq!(
            keycodes_from_crossterm(&ev(cte::KeyCode::Char('é'), cte::KeyModifiers::NONE)),
            vec![0xC3, 0xA9]
        );
    }
}
