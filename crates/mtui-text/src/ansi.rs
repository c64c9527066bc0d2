#![forbid(unsafe_code)]

//! ANSI SGR (Select Graphic Rendition) interpreter.
//!
//! Only `ESC [ <digits and ;> m` sequences are recognised; anything else is
//! left for the caller to display. Parameters are applied left to right to
//! an [`AnsiState`]:
//!
//! | Parameter | Effect |
//! |-----------|--------|
//! | `0` (or empty) | reset |
//! | `1` `3` `4` `5` `7` | bold, italic, underline, blink, reverse |
//! | `22` `23` `24` `25` `27` | clear the matching attribute |
//! | `30`-`37`, `40`-`47` | palette foreground / background |
//! | `38;5;n`, `48;5;n` | 256-colour foreground / background |
//! | `38;2;r;g;b`, `48;2;r;g;b` | true colour foreground / background |
//! | `39`, `49` | default foreground / background |
//!
//! Leading zeros are ignored and unknown parameters are skipped.

use mtui_style::{AttrColor, Attrs, Color, Rgb};

/// Attributes and colours accumulated from SGR sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AnsiState {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl AnsiState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Has any SGR changed the state from the default?
    pub fn is_set(&self) -> bool {
        self.to_attr_color().is_set()
    }

    pub fn has_color(&self) -> bool {
        !self.fg.is_default() || !self.bg.is_default()
    }

    pub fn to_attr_color(&self) -> AttrColor {
        AttrColor::new(self.fg, self.bg, self.attrs)
    }

    /// Apply every SGR sequence found in `bytes`, skipping other text.
    pub fn apply_all(&mut self, bytes: &[u8]) {
        let mut pos = 0;
        while pos < bytes.len() {
            let n = parse_sgr(&bytes[pos..], Some(self));
            pos += n.max(1);
        }
    }
}

/// Length of the SGR sequence at the start of `bytes`, or 0 if there is none.
pub fn sgr_len(bytes: &[u8]) -> usize {
    if bytes.len() < 3 || bytes[0] != 0x1B || bytes[1] != b'[' {
        return 0;
    }
    let body = bytes[2..]
        .iter()
        .take_while(|b| b.is_ascii_digit() || **b == b';')
        .count();
    match bytes.get(2 + body) {
        Some(b'm') => body + 3,
        _ => 0,
    }
}

/// Parse the SGR sequence at the start of `bytes` into `state`.
///
/// Returns the number of bytes consumed (0 if `bytes` does not start with an
/// SGR sequence). With `state == None` the sequence is only measured, which
/// is how colour sequences are swallowed when ANSI colour is disabled.
pub fn parse_sgr(bytes: &[u8], state: Option<&mut AnsiState>) -> usize {
    let len = sgr_len(bytes);
    if len == 0 {
        return 0;
    }
    let Some(state) = state else {
        return len;
    };

    let body = &bytes[2..len - 1];
    let params: Vec<Option<u32>> = body
        .split(|b| *b == b';')
        .map(|p| {
            if p.is_empty() {
                None
            } else {
                p.iter()
                    .try_fold(0u32, |acc, d| {
                        acc.checked_mul(10)?.checked_add(u32::from(d - b'0'))
                    })
                    .or(Some(u32::MAX))
            }
        })
        .collect();

    let mut i = 0;
    while i < params.len() {
        let p = params[i];
        i += 1;
        match p {
            None | Some(0) => state.reset(),
            Some(1) => state.attrs |= Attrs::BOLD,
            Some(3) => state.attrs |= Attrs::ITALIC,
            Some(4) => state.attrs |= Attrs::UNDERLINE,
            Some(5) => state.attrs |= Attrs::BLINK,
            Some(7) => state.attrs |= Attrs::REVERSE,
            Some(22) => state.attrs.remove(Attrs::BOLD),
            Some(23) => state.attrs.remove(Attrs::ITALIC),
            Some(24) => state.attrs.remove(Attrs::UNDERLINE),
            Some(25) => state.attrs.remove(Attrs::BLINK),
            Some(27) => state.attrs.remove(Attrs::REVERSE),
            Some(n @ 30..=37) => state.fg = Color::Palette((n - 30) as u8),
            Some(n @ 40..=47) => state.bg = Color::Palette((n - 40) as u8),
            Some(39) => state.fg = Color::Default,
            Some(49) => state.bg = Color::Default,
            Some(n @ (38 | 48)) => {
                let (color, used) = extended_color(&params[i..]);
                i += used;
                if let Some(color) = color {
                    if n == 38 {
                        state.fg = color;
                    } else {
                        state.bg = color;
                    }
                }
            }
            Some(_) => {}
        }
    }
    len
}

/// Decode the parameters following a 38/48. Returns the colour (if valid)
/// and how many parameters were consumed.
fn extended_color(rest: &[Option<u32>]) -> (Option<Color>, usize) {
    match rest.first().copied().flatten() {
        Some(5) => match rest.get(1).copied().flatten() {
            Some(n) if n < 256 => (Some(Color::Palette(n as u8)), 2),
            _ => (None, rest.len().min(2)),
        },
        Some(2) => {
            let channel = |i: usize| {
                rest.get(i)
                    .copied()
                    .flatten()
                    .filter(|v| *v < 256)
                    .map(|v| v as u8)
            };
            match (channel(1), channel(2), channel(3)) {
                (Some(r), Some(g), Some(b)) => (Some(Color::Rgb(Rgb::new(r, g, b))), 4),
                _ => (None, rest.len().min(4)),
            }
        }
        _ => (None, rest.len().min(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(seq: &str) -> AnsiState {
        let mut st = AnsiState::default();
        let n = parse_sgr(seq.as_bytes(), Some(&mut st));
        assert_eq!(n, seq.len(), "{seq:?}");
        st
    }

    #[test]
    fn length() {
        assert_eq!(sgr_len(b"\x1b[0m rest"), 4);
        assert_eq!(sgr_len(b"\x1b[1;31mX"), 7);
        assert_eq!(sgr_len(b"\x1b[m"), 3);
        assert_eq!(sgr_len(b"\x1b[1;31"), 0);
        assert_eq!(sgr_len(b"\x1b[2J"), 0);
        assert_eq!(sgr_len(b"\x1b]9;x\x07"), 0);
        assert_eq!(sgr_len(b"plain"), 0);
    }

    #[test]
    fn basic_attributes_and_colours() {
        let st = apply("\x1b[1;4;31;42m");
        assert_eq!(st.attrs, Attrs::BOLD | Attrs::UNDERLINE);
        assert_eq!(st.fg, Color::RED);
        assert_eq!(st.bg, Color::GREEN);
    }

    #[test]
    fn reset_and_clear() {
        let mut st = apply("\x1b[1;3;5;7;33m");
        parse_sgr(b"\x1b[22;27m", Some(&mut st));
        assert_eq!(st.attrs, Attrs::ITALIC | Attrs::BLINK);
        parse_sgr(b"\x1b[39m", Some(&mut st));
        assert_eq!(st.fg, Color::Default);
        parse_sgr(b"\x1b[0m", Some(&mut st));
        assert_eq!(st, AnsiState::default());
        let mut st = apply("\x1b[1m");
        parse_sgr(b"\x1b[m", Some(&mut st));
        assert_eq!(st, AnsiState::default());
    }

    #[test]
    fn extended_colours() {
        let st = apply("\x1b[38;5;208;48;2;1;2;3m");
        assert_eq!(st.fg, Color::Palette(208));
        assert_eq!(st.bg, Color::Rgb(Rgb::new(1, 2, 3)));
        let st = apply("\x1b[38;5;300;1m");
        assert_eq!(st.fg, Color::Default);
        assert_eq!(st.attrs, Attrs::BOLD);
    }

    #[test]
    fn leading_zeros_and_unknown() {
        let st = apply("\x1b[01;031;99;44m");
        assert_eq!(st.attrs, Attrs::BOLD);
        assert_eq!(st.fg, Color::RED);
        assert_eq!(st.bg, Color::BLUE);
    }

    #[test]
    fn dry_run_only_measures() {
        assert_eq!(parse_sgr(b"\x1b[31mx", None), 5);
    }

    #[test]
    fn apply_all_skips_text() {
        let mut st = AnsiState::default();
        st.apply_all(b"a\x1b[1mb\x1b[34mc");
        assert_eq!(st.attrs, Attrs::BOLD);
        assert_eq!(st.fg, Color::BLUE);
    }
}
