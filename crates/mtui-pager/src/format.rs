#![forbid(unsafe_code)]

//! Fitting one line of raw text into the window.
//!
//! [`format_line`] walks the raw bytes of a line the way they will be
//! drawn: SGR sequences and private markers take no room, backspace
//! overstrike collapses into a bold or underlined character, tabs move to
//! the next multiple of eight, control characters become `^X` and bytes
//! that aren't valid text become `\ooo`. It stops at the newline or at the
//! first glyph that would pass the wrap column.

use mtui_style::Attrs;
use mtui_text::ansi::parse_sgr;
use mtui_text::strip::marker_len;
use mtui_text::width::{is_display_corrupting, is_printable, is_zero_width};
use mtui_text::{AnsiState, Decoded, char_width, decode};

const BACKSPACE: char = '\u{8}';

/// What to draw for one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Char(char),
    /// A control character, drawn as `^` and this letter.
    Caret(char),
    /// A byte drawn as a backslash and three octal digits.
    Octal(u8),
    /// Blanks a tab expands to.
    Blank(usize),
    Replacement,
}

impl Glyph {
    pub fn width(self) -> usize {
        match self {
            Glyph::Char(c) => char_width(c),
            Glyph::Caret(_) => 2,
            Glyph::Octal(_) => 4,
            Glyph::Blank(n) => n,
            Glyph::Replacement => 1,
        }
    }
}

/// A glyph with the state needed to colour it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: Glyph,
    /// Offset in the stripped text of the segment.
    pub vch: usize,
    /// Bold or underline from backspace overstrike.
    pub special: Attrs,
    pub ansi: AnsiState,
}

/// How much of a line fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fitted {
    /// Raw bytes consumed.
    pub consumed: usize,
    /// Raw offset of the last blank seen.
    pub space: Option<usize>,
    /// Columns used, including the start column.
    pub col: usize,
}

/// Layout settings of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    /// Column the text starts at (1 after a continuation marker).
    pub start_col: usize,
    pub wrap_cols: usize,
    /// Apply SGR sequences to the colour state, rather than just skipping them.
    pub allow_ansi: bool,
}

/// Fit `buf` into the line; `cells`, if given, receives every glyph.
///
/// `ansi` carries the SGR state across calls; it is only changed when
/// `fmt.allow_ansi` is set.
pub fn format_line(
    buf: &[u8],
    fmt: &LineFormat,
    ansi: &mut AnsiState,
    mut cells: Option<&mut Vec<Cell>>,
) -> Fitted {
    let wrap = fmt.wrap_cols;
    let mut ch = 0;
    let mut vch = 0;
    let mut col = fmt.start_col;
    let mut space = None;

    while ch < buf.len() {
        while buf.get(ch) == Some(&0x1b) {
            let state = if fmt.allow_ansi { Some(&mut *ansi) } else { None };
            let n = parse_sgr(&buf[ch..], state).max(marker_len(&buf[ch..]));
            if n == 0 {
                break;
            }
            ch += n;
        }
        if ch >= buf.len() {
            break;
        }

        let (mut wc, mut k) = match decode(&buf[ch..]) {
            Decoded::Char(c, len) => (c, len),
            Decoded::Invalid(byte) => {
                if col + 4 > wrap {
                    break;
                }
                push(&mut cells, Glyph::Octal(byte), vch, Attrs::empty(), ansi);
                col += 4;
                ch += 1;
                vch += 1;
                continue;
            }
            Decoded::Empty => break,
        };

        if is_zero_width(wc) || is_display_corrupting(wc) {
            ch += k;
            vch += k;
            continue;
        }

        // backspace overstrike: X\bX is bold, _\bX underlined
        let mut special = Attrs::empty();
        while is_printable(wc) {
            let Decoded::Char(BACKSPACE, k1) = decode(&buf[ch + k..]) else {
                break;
            };
            let Decoded::Char(wc1, k2) = decode(&buf[ch + k + k1..]) else {
                break;
            };
            if !is_printable(wc1) {
                break;
            }
            if wc == wc1 {
                special |= if wc == '_' && special.contains(Attrs::UNDERLINE) {
                    Attrs::UNDERLINE
                } else {
                    Attrs::BOLD
                };
            } else if wc == '_' || wc1 == '_' {
                special |= Attrs::UNDERLINE;
                if wc == '_' {
                    wc = wc1;
                }
            } else {
                wc = wc1;
            }
            ch += k + k1;
            k = k2;
        }

        let glyph = if is_printable(wc) || wc == '\u{a0}' || wc == '\u{202f}' {
            if wc == ' ' {
                space = Some(ch);
            }
            Glyph::Char(wc)
        } else if wc == '\n' || (wc == '\r' && matches!(buf.get(ch + 1), None | Some(b'\n'))) {
            break;
        } else if wc == '\t' {
            space = Some(ch);
            Glyph::Blank((col & !7) + 8 - col)
        } else if (wc as u32) < 0x20 || wc == '\u{7f}' {
            let letter = char::from((b'@'.wrapping_add(wc as u8)) & 0x7f);
            Glyph::Caret(letter)
        } else if (wc as u32) < 0x100 {
            Glyph::Octal(wc as u8)
        } else {
            Glyph::Replacement
        };

        let width = glyph.width();
        if col + width > wrap {
            break;
        }
        push(&mut cells, glyph, vch, special, ansi);
        col += width;
        ch += k;
        vch += k;
    }

    Fitted {
        consumed: ch,
        space,
        col,
    }
}

fn push(cells: &mut Option<&mut Vec<Cell>>, glyph: Glyph, vch: usize, special: Attrs, ansi: &AnsiState) {
    if let Some(cells) = cells.as_deref_mut() {
        cells.push(Cell {
            glyph,
            vch,
            special,
            ansi: *ansi,
        });
    }
}

/// Where a segment ends on screen and where the next one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    /// Raw bytes drawn.
    pub shown: usize,
    /// Raw offset of the next segment.
    pub next: usize,
}

/// Settings for [`split_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapRules {
    /// Break at the last blank instead of mid-word.
    pub smart_wrap: bool,
    /// Header lines are always broken hard.
    pub header: bool,
    /// Skip the blanks a wrapped segment would start with.
    pub skip_blanks: bool,
}

/// Decide where the segment fitted by `fit` ends.
pub fn split_line(raw: &[u8], fit: &Fitted, rules: WrapRules) -> Split {
    let mut shown = fit.consumed;
    let mut next = shown;

    if rules.smart_wrap {
        if let Some(space) = fit.space {
            let mid_word = raw.get(shown).is_some_and(|b| !b.is_ascii_whitespace());
            if mid_word && !rules.header {
                next = space;
                let mut end = space;
                while end > 0 && matches!(raw[end], b' ' | b'\t' | b'\r') {
                    end -= 1;
                }
                if end == 0 {
                    next = shown;
                } else {
                    shown = end + 1;
                }
            }
        }
        if rules.skip_blanks {
            while matches!(raw.get(next), Some(b' ' | b'\t')) {
                next += 1;
            }
        }
    }
    if raw.get(next) == Some(&b'\r') {
        next += 1;
    }
    if raw.get(next) == Some(&b'\n') {
        next += 1;
    }
    Split { shown, next }
}

#[cfg(test)]
mod tests {
    use mtui_style::Color;

    use super::*;

    const WRAP: WrapRules = WrapRules {
        smart_wrap: true,
        header: false,
        skip_blanks: true,
    };

    fn fmt(wrap_cols: usize) -> LineFormat {
        LineFormat {
            start_col: 0,
            wrap_cols,
            allow_ansi: true,
        }
    }

    fn cells(buf: &[u8], wrap_cols: usize) -> (Fitted, Vec<Cell>) {
        let mut out = Vec::new();
        let fit = format_line(buf, &fmt(wrap_cols), &mut AnsiState::default(), Some(&mut out));
        (fit, out)
    }

    fn glyphs(cells: &[Cell]) -> Vec<Glyph> {
        cells.iter().map(|c| c.glyph).collect()
    }

    #[test]
    fn wraps_at_the_last_space() {
        let raw = b"aaa bbbbb ccc\n";
        let fit = format_line(raw, &fmt(10), &mut AnsiState::default(), None);
        assert_eq!(fit.consumed, 10);
        assert_eq!(fit.space, Some(9));
        let split = split_line(raw, &fit, WRAP);
        assert_eq!(split, Split { shown: 9, next: 10 });
    }

    #[test]
    fn hard_break_without_a_space() {
        let raw = b"abcdefghijkl\n";
        let fit = format_line(raw, &fmt(5), &mut AnsiState::default(), None);
        assert_eq!(split_line(raw, &fit, WRAP), Split { shown: 5, next: 5 });
    }

    #[test]
    fn headers_break_hard() {
        let raw = b"To: aaa bbbbbbb\n";
        let fit = format_line(raw, &fmt(10), &mut AnsiState::default(), None);
        let rules = WrapRules { header: true, ..WRAP };
        assert_eq!(split_line(raw, &fit, rules), Split { shown: 10, next: 10 });
    }

    #[test]
    fn newline_ends_the_line() {
        let raw = b"short\r\n";
        let fit = format_line(raw, &fmt(80), &mut AnsiState::default(), None);
        assert_eq!(split_line(raw, &fit, WRAP), Split { shown: 5, next: 7 });
    }

    #[test]
    fn tabs_and_control_characters() {
        let (fit, out) = cells(b"a\tb\x01\n", 80);
        assert_eq!(
            glyphs(&out),
            vec![Glyph::Char('a'), Glyph::Blank(7), Glyph::Char('b'), Glyph::Caret('A')]
        );
        assert_eq!(fit.col, 11);
        assert_eq!(fit.space, Some(1));
    }

    #[test]
    fn tab_past_the_wrap_column_breaks() {
        let fit = format_line(b"abcdef\tx", &fmt(7), &mut AnsiState::default(), None);
        assert_eq!(fit.consumed, 6);
    }

    #[test]
    fn invalid_bytes_are_octal() {
        let (fit, out) = cells(b"a\xffb", 80);
        assert_eq!(glyphs(&out), vec![Glyph::Char('a'), Glyph::Octal(0xff), Glyph::Char('b')]);
        assert_eq!(fit.col, 6);
    }

    #[test]
    fn overstrike_becomes_bold_and_underline() {
        let (_, out) = cells(b"X\x08X_\x08Y", 80);
        assert_eq!(glyphs(&out), vec![Glyph::Char('X'), Glyph::Char('Y')]);
        assert_eq!(out[0].special, Attrs::BOLD);
        assert_eq!(out[1].special, Attrs::UNDERLINE);
        // positions are in the stripped text
        assert_eq!(out[0].vch, 0);
        assert_eq!(out[1].vch, 1);
    }

    #[test]
    fn sgr_takes_no_room_and_sets_colour() {
        let (fit, out) = cells(b"\x1b[31mred\x1b[0m!", 80);
        assert_eq!(fit.col, 4);
        assert_eq!(out[0].ansi.fg, Color::RED);
        assert_eq!(out[3].ansi, AnsiState::default());
        assert_eq!(out[3].vch, 3);
    }

    #[test]
    fn sgr_is_skipped_when_not_allowed() {
        let mut ansi = AnsiState::default();
        let format = LineFormat {
            allow_ansi: false,
            ..fmt(80)
        };
        let fit = format_line(b"\x1b[1mx", &format, &mut ansi, None);
        assert_eq!(fit.col, 1);
        assert!(!ansi.is_set());
    }

    #[test]
    fn wide_characters_do_not_straddle_the_edge() {
        let fit = format_line("ab漢".as_bytes(), &fmt(3), &mut AnsiState::default(), None);
        assert_eq!(fit.consumed, 2);
        assert_eq!(fit.col, 2);
    }

    #[test]
    fn zero_width_characters_are_dropped() {
        let (_, out) = cells("a\u{200b}b".as_bytes(), 80);
        assert_eq!(glyphs(&out), vec![Glyph::Char('a'), Glyph::Char('b')]);
    }

    #[test]
    fn continuation_marker_column_counts() {
        let format = LineFormat {
            start_col: 1,
            ..fmt(4)
        };
        let fit = format_line(b"abcdef", &format, &mut AnsiState::default(), None);
        assert_eq!(fit.consumed, 3);
    }
}
