#![forbid(unsafe_code)]

//! The key-string grammar.
//!
//! | Form | Meaning |
//! |------|---------|
//! | `x` | the character itself (non-ASCII becomes its UTF-8 bytes) |
//! | `^X` | Control-X; `^?` is DEL, a `^` with nothing controllable after it is literal |
//! | `\NNN` | octal code, one to three digits |
//! | `\n` `\r` `\t` `\e` | newline, carriage return, tab, escape; any other escaped character stands for itself |
//! | `<name>` | a symbolic key from [`KEY_NAMES`], `<C-Up>` style modified keys, `<F1>`..`<F255>`, or `<NNN>` octal |
//!
//! Names are matched case-insensitively. A `<` that does not open a
//! well-formed name is literal; a well-formed name nobody knows is an error.

use mtui_core::event::{
    KEY_ALT_BASE, KEY_BACK_TAB, KEY_BACKSPACE, KEY_CTRL_BASE, KEY_DELETE, KEY_DOWN, KEY_END,
    KEY_ESC, KEY_F0, KEY_HOME, KEY_INSERT, KEY_KEYPAD_ENTER, KEY_LEFT, KEY_MAX, KEY_NEXT,
    KEY_PAGE_DOWN, KEY_PAGE_UP, KEY_PREV, KEY_RIGHT, KEY_SHIFT_BASE, KEY_UP, NavKey, key_ctrl,
};
use mtui_core::Keycode;

use crate::error::KeyParseError;

/// Longest key sequence a keymap accepts.
pub const MAX_KEY_SEQUENCE: usize = 8;

/// Symbolic key names. When two names share a code, the first is the one
/// [`key_name`] prints.
pub const KEY_NAMES: &[(&str, Keycode)] = &[
    ("PageUp", KEY_PAGE_UP),
    ("PageDown", KEY_PAGE_DOWN),
    ("Up", KEY_UP),
    ("Down", KEY_DOWN),
    ("Right", KEY_RIGHT),
    ("Left", KEY_LEFT),
    ("Delete", KEY_DELETE),
    ("BackSpace", KEY_BACKSPACE),
    ("Insert", KEY_INSERT),
    ("Home", KEY_HOME),
    ("End", KEY_END),
    ("Enter", b'\n' as Keycode),
    ("Return", b'\r' as Keycode),
    ("KeypadEnter", KEY_KEYPAD_ENTER),
    ("Esc", KEY_ESC),
    ("Tab", b'\t' as Keycode),
    ("Space", b' ' as Keycode),
    ("BackTab", KEY_BACK_TAB),
    ("Next", KEY_NEXT),
    ("Prev", KEY_PREV),
];

const MODIFIERS: [(&str, Keycode); 3] = [
    ("C-", KEY_CTRL_BASE),
    ("S-", KEY_SHIFT_BASE),
    ("A-", KEY_ALT_BASE),
];

/// Look up the code of a symbolic name (without the angle brackets).
///
/// Covers [`KEY_NAMES`], modified navigation keys and function keys. Octal
/// `<NNN>` forms are handled by [`parse_keys`], not here.
#[must_use]
pub fn lookup_key_name(name: &str) -> Option<Keycode> {
    if let Some(&(_, code)) = KEY_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
    {
        return Some(code);
    }
    for (prefix, base) in MODIFIERS {
        let Some(rest) = strip_prefix_ignore_case(name, prefix) else {
            continue;
        };
        if let Some(nav) = NavKey::ALL
            .iter()
            .find(|k| k.name().eq_ignore_ascii_case(rest))
        {
            return Some(base + *nav as Keycode);
        }
    }
    let digits = strip_prefix_ignore_case(name, "F")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u16>() {
        Ok(n @ 1..=255) => Some(KEY_F0 + Keycode::from(n)),
        _ => None,
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

fn name_of(code: Keycode) -> Option<String> {
    if let Some(&(name, _)) = KEY_NAMES.iter().find(|(_, c)| *c == code) {
        return Some(name.to_string());
    }
    for (prefix, base) in MODIFIERS {
        if (base..base + NavKey::ALL.len() as Keycode).contains(&code) {
            let nav = NavKey::ALL[(code - base) as usize];
            return Some(format!("{prefix}{}", nav.name()));
        }
    }
    None
}

fn is_name_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn parse_name(name: &str) -> Result<Keycode, KeyParseError> {
    if let Some(code) = lookup_key_name(name) {
        return Ok(code);
    }
    if name.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return match Keycode::from_str_radix(name, 8) {
            Ok(code) if code <= KEY_MAX => Ok(code),
            _ => Err(KeyParseError::OutOfRange(name.to_string())),
        };
    }
    Err(KeyParseError::UnknownName(name.to_string()))
}

/// Decode a key string into key codes.
///
/// ```
/// use mtui_keymap::keys::parse_keys;
/// use mtui_core::event::{KEY_PAGE_DOWN, key_f};
///
/// assert_eq!(parse_keys("<PageDown>").unwrap(), vec![KEY_PAGE_DOWN]);
/// assert_eq!(parse_keys("^Gx").unwrap(), vec![7, 'x' as u32]);
/// assert_eq!(parse_keys("<f12>").unwrap(), vec![key_f(12)]);
/// assert!(parse_keys("<Bogus>").is_err());
/// ```
pub fn parse_keys(s: &str) -> Result<Vec<Keycode>, KeyParseError> {
    let mut keys = Vec::new();
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];
        match c {
            '<' => {
                if let Some(end) = after.find('>') {
                    let name = &after[..end];
                    if is_name_token(name) {
                        keys.push(parse_name(name)?);
                        rest = &after[end + 1..];
                        continue;
                    }
                }
                keys.push(Keycode::from(b'<'));
                rest = after;
            }
            '\\' => {
                let Some(next) = after.chars().next() else {
                    return Err(KeyParseError::TrailingBackslash);
                };
                let digits = after
                    .bytes()
                    .take(3)
                    .take_while(|b| (b'0'..=b'7').contains(b))
                    .count();
                if digits > 0 {
                    let code = Keycode::from_str_radix(&after[..digits], 8)
                        .map_err(|_| KeyParseError::OutOfRange(after[..digits].to_string()))?;
                    keys.push(code);
                    rest = &after[digits..];
                    continue;
                }
                let code = match next {
                    'n' => Keycode::from(b'\n'),
                    'r' => Keycode::from(b'\r'),
                    't' => Keycode::from(b'\t'),
                    'e' | 'E' => KEY_ESC,
                    other => {
                        push_char(&mut keys, other);
                        rest = &after[other.len_utf8()..];
                        continue;
                    }
                };
                keys.push(code);
                rest = &after[1..];
            }
            '^' => match after.bytes().next() {
                Some(n) if n.is_ascii_alphabetic() || b"@[\\]^_?".contains(&n) => {
                    keys.push(key_ctrl(n));
                    rest = &after[1..];
                }
                _ => {
                    keys.push(Keycode::from(b'^'));
                    rest = after;
                }
            },
            other => {
                push_char(&mut keys, other);
                rest = after;
            }
        }
    }

    if keys.is_empty() {
        return Err(KeyParseError::Empty);
    }
    if keys.len() > MAX_KEY_SEQUENCE {
        return Err(KeyParseError::TooLong(keys.len()));
    }
    Ok(keys)
}

fn push_char(keys: &mut Vec<Keycode>, c: char) {
    let mut buf = [0u8; 4];
    keys.extend(c.encode_utf8(&mut buf).bytes().map(Keycode::from));
}

/// Printable name of a single key code.
///
/// Named keys print as `<Name>`, control characters as `^X`, high bytes as
/// `\NNN` octal, function keys as `<Fn>`, printable ASCII as itself and
/// anything else as `<NNN>` octal.
#[must_use]
pub fn key_name(code: Keycode) -> String {
    if let Some(name) = name_of(code) {
        return format!("<{name}>");
    }
    match code {
        0x00..=0x1F | 0x7F => {
            let shown = ((code + Keycode::from(b'@')) & 0x7F) as u8;
            format!("^{}", char::from(shown))
        }
        0x20..=0x7E => char::from(code as u8).to_string(),
        0x80..=0xFF => format!("\\{code:03o}"),
        c if c > KEY_F0 && c <= KEY_MAX => format!("<F{}>", c - KEY_F0),
        c => format!("<{c:o}>"),
    }
}

/// Printable form of a key sequence that [`parse_keys`] decodes back to the
/// same codes.
#[must_use]
pub fn expand_keys(keys: &[Keycode]) -> String {
    let mut out = String::new();
    for (i, &code) in keys.iter().enumerate() {
        let later = &keys[i + 1..];
        match code {
            0x5C => out.push_str("\\\\"),
            0x5E if !later.is_empty() => out.push_str("\\136"),
            0x3C if later.contains(&Keycode::from(b'>')) => out.push_str("\\074"),
            _ => out.push_str(&key_name(code)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtui_core::event::key_f;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(parse_keys("<pagedown>").unwrap(), vec![KEY_PAGE_DOWN]);
        assert_eq!(parse_keys("<ESC>").unwrap(), vec![KEY_ESC]);
        assert_eq!(parse_keys("<c-up>").unwrap(), vec![NavKey::Up.ctrl()]);
        assert_eq!(parse_keys("<A-Left>").unwrap(), vec![NavKey::Left.alt()]);
    }

    #[test]
    fn function_keys() {
        assert_eq!(parse_keys("<F1>").unwrap(), vec![key_f(1)]);
        assert_eq!(parse_keys("<F255>").unwrap(), vec![key_f(255)]);
        assert!(matches!(
            parse_keys("<F0>"),
            Err(KeyParseError::UnknownName(_))
        ));
        assert!(parse_keys("<F256>").is_err());
    }

    #[test]
    fn octal_forms() {
        assert_eq!(parse_keys("\\033x").unwrap(), vec![KEY_ESC, 'x' as u32]);
        assert_eq!(parse_keys("<1101>").unwrap(), vec![0o1101]);
        assert!(matches!(
            parse_keys("<7777>"),
            Err(KeyParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn control_and_escapes() {
        assert_eq!(parse_keys("^a").unwrap(), vec![1]);
        assert_eq!(parse_keys("^?").unwrap(), vec![0x7F]);
        assert_eq!(parse_keys("^").unwrap(), vec!['^' as u32]);
        assert_eq!(parse_keys("^1").unwrap(), vec!['^' as u32, '1' as u32]);
        assert_eq!(parse_keys("\\n\\t\\e").unwrap(), vec![10, 9, KEY_ESC]);
        assert_eq!(parse_keys("\\\\").unwrap(), vec!['\\' as u32]);
        assert_eq!(parse_keys("x\\"), Err(KeyParseError::TrailingBackslash));
    }

    #[test]
    fn stray_angle_brackets_are_literal() {
        assert_eq!(parse_keys("<").unwrap(), vec!['<' as u32]);
        assert_eq!(
            parse_keys("< >").unwrap(),
            vec!['<' as u32, ' ' as u32, '>' as u32]
        );
        assert!(matches!(
            parse_keys("<Bogus>"),
            Err(KeyParseError::UnknownName(n)) if n == "Bogus"
        ));
    }

    #[test]
    fn limits() {
        assert_eq!(parse_keys(""), Err(KeyParseError::Empty));
        assert_eq!(parse_keys("abcdefghi"), Err(KeyParseError::TooLong(9)));
        assert!(parse_keys("abcdefgh").is_ok());
    }

    #[test]
    fn utf8_becomes_bytes() {
        assert_eq!(parse_keys("é").unwrap(), vec![0xC3, 0xA9]);
    }

    #[test]
    fn printable_names() {
        assert_eq!(key_name('\n' as u32), "<Enter>");
        assert_eq!(key_name(' ' as u32), "<Space>");
        assert_eq!(key_name(7), "^G");
        assert_eq!(key_name(0), "^@");
        assert_eq!(key_name(0x7F), "^?");
        assert_eq!(key_name(0xE9), "\\351");
        assert_eq!(key_name(key_f(3)), "<F3>");
        assert_eq!(key_name(NavKey::End.shift()), "<S-End>");
        assert_eq!(key_name('q' as u32), "q");
        assert_eq!(key_name(KEY_F0), "<1000>");
    }

    #[test]
    fn expansion_reparses() {
        for keys in [
            vec!['^' as u32, 'G' as u32],
            vec!['<' as u32, 'U' as u32, 'p' as u32, '>' as u32],
            vec!['\\' as u32, 'n' as u32],
            vec![KEY_ESC, 0xC3, 0xA9],
            vec![0x150],
        ] {
            let text = expand_keys(&keys);
            assert_eq!(parse_keys(&text).unwrap(), keys, "via {text:?}");
        }
    }
}
