#![forbid(unsafe_code)]

//! Character decoding and display width.
//!
//! Text shown by the runtime is a byte stream that is *usually* UTF-8. The
//! helpers here decode one character at a time, report ill-formed bytes
//! instead of failing, and measure with wcwidth semantics: characters that
//! have no defined width (controls) count as one cell, so layout never goes
//! backwards.

use unicode_width::UnicodeWidthChar;

/// Glyph shown in place of ill-formed or unprintable input.
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Emoji presentation selector; widens the preceding narrow glyph.
pub const EMOJI_PRESENTATION: char = '\u{FE0F}';

/// Result of decoding the start of a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    /// A character occupying `len` bytes.
    Char(char, usize),
    /// A byte that does not start a well-formed sequence.
    Invalid(u8),
    /// The input was empty.
    Empty,
}

impl Decoded {
    /// Number of bytes consumed.
    pub const fn len(self) -> usize {
        match self {
            Decoded::Char(_, len) => len,
            Decoded::Invalid(_) => 1,
            Decoded::Empty => 0,
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Decoded::Empty)
    }
}

/// Decode the first character of `bytes`.
pub fn decode(bytes: &[u8]) -> Decoded {
    let Some(&first) = bytes.first() else {
        return Decoded::Empty;
    };
    if first < 0x80 {
        return Decoded::Char(char::from(first), 1);
    }
    let need = match first {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Decoded::Invalid(first),
    };
    if bytes.len() < need {
        return Decoded::Invalid(first);
    }
    match std::str::from_utf8(&bytes[..need]) {
        Ok(s) => s
            .chars()
            .next()
            .map_or(Decoded::Invalid(first), |c| Decoded::Char(c, need)),
        Err(_) => Decoded::Invalid(first),
    }
}

/// Iterate over the characters of a byte slice.
pub fn decode_all(bytes: &[u8]) -> impl Iterator<Item = Decoded> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || {
        let d = decode(&bytes[pos..]);
        if d.is_empty() {
            None
        } else {
            pos += d.len();
            Some(d)
        }
    })
}

/// Display width of `c` in cells, or `None` if it has no defined width.
#[inline]
pub fn wcwidth(c: char) -> Option<usize> {
    UnicodeWidthChar::width(c)
}

/// Display width with unprintables counted as a single cell.
#[inline]
pub fn char_width(c: char) -> usize {
    wcwidth(c).unwrap_or(1)
}

/// Total width of a string, with [`char_width`] semantics.
pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Is `c` printable (a defined, non-control width)?
#[inline]
pub fn is_printable(c: char) -> bool {
    !c.is_control() && wcwidth(c).is_some()
}

/// Zero-width characters the pager drops entirely.
#[inline]
pub fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{FEFF}')
}

/// Format characters that corrupt the display when passed to a terminal.
pub fn is_display_corrupting(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{200E}'
            | '\u{200F}'
            | '\u{FEFF}'
            | '\u{061C}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2066}'..='\u{2069}'
    )
}

/// Does `s` contain no upper-case characters?
pub fn is_lower(s: &str) -> bool {
    !s.chars().any(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ascii_and_multibyte() {
        assert_eq!(decode(b"a"), Decoded::Char('a', 1));
        assert_eq!(decode("é!".as_bytes()), Decoded::Char('é', 2));
        assert_eq!(decode("漢".as_bytes()), Decoded::Char('漢', 3));
        assert_eq!(decode("😀".as_bytes()), Decoded::Char('😀', 4));
        assert_eq!(decode(b""), Decoded::Empty);
    }

    #[test]
    fn decode_invalid() {
        assert_eq!(decode(b"\xFF"), Decoded::Invalid(0xFF));
        assert_eq!(decode(b"\xC3"), Decoded::Invalid(0xC3));
        assert_eq!(decode(b"\xE6\x41\x41"), Decoded::Invalid(0xE6));
        assert_eq!(decode(b"\x80"), Decoded::Invalid(0x80));
    }

    #[test]
    fn decode_all_covers_every_byte() {
        let bytes = b"a\xFFb\xC3\xA9";
        let total: usize = decode_all(bytes).map(Decoded::len).sum();
        assert_eq!(total, bytes.len());
        assert_eq!(decode_all(bytes).count(), 4);
    }

    #[test]
    fn widths() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('漢'), 2);
        assert_eq!(char_width('\u{7}'), 1);
        assert_eq!(wcwidth('\u{7}'), None);
        assert_eq!(str_width("ab漢"), 4);
        assert!(!is_printable('\t'));
        assert!(is_printable('x'));
    }

    #[test]
    fn filters() {
        assert!(is_zero_width('\u{200B}'));
        assert!(!is_zero_width('a'));
        assert!(is_display_corrupting('\u{202E}'));
        assert!(is_display_corrupting('\u{2067}'));
        assert!(!is_display_corrupting('\u{2070}'));
    }

    #[test]
    fn lower_case_detection() {
        assert!(is_lower("foo bar 12"));
        assert!(!is_lower("Foo"));
        assert!(is_lower(""));
    }
}
