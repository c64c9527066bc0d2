#![forbid(unsafe_code)]

//! Line classification and colour rule matching.
//!
//! Classification runs once per logical line, on its stripped text, the
//! first time the line is scanned in email mode:
//!
//! 1. the first line, any line after a header line, and any line with a
//!    protected-header marker is a header line; a blank line ends the
//!    headers and an indented line continues the field above it;
//! 2. a line starting with an SGR reset is plain text;
//! 3. attachment banners are recognised by their marker or `[-- `;
//! 4. the signature starts at `-- ` and runs while [`check_sig`] holds;
//! 5. lines matching the quote regex, and not a smiley, are quoted;
//! 6. everything else is normal text.

use std::ops::Range;

use mtui_runtime::PagerConfig;
use mtui_style::{AttrColor, ColorConfig, ColorId, RegexColor, RegexColorList};
use mtui_text::regex::compile;
use mtui_text::strip::{ATTACHMENT_MARKER, PROTECTED_HEADER_MARKER};
use regex::bytes::Regex;

use crate::error::PagerError;
use crate::line::{Chunk, Line, LineType};
use crate::quote::QuoteTree;

/// Lines a signature may run before a blank line ends it.
pub const NUM_SIG_LINES: usize = 4;

/// Is the line after `lines[offset]` still part of a signature?
///
/// Counts the signature lines ending at `offset`. Short signatures go on
/// unconditionally; past [`NUM_SIG_LINES`] lines only non-blank text `s`
/// keeps the signature going.
pub fn check_sig(s: &[u8], lines: &[Line], offset: usize) -> bool {
    let mut count = 0;
    let mut at = offset;
    while at > 0 && count <= NUM_SIG_LINES {
        if lines[at].kind != Some(LineType::Signature) {
            break;
        }
        count += 1;
        at -= 1;
    }
    if count == 0 {
        return false;
    }
    if count > NUM_SIG_LINES {
        return s.iter().any(|b| !b.is_ascii_whitespace());
    }
    true
}

/// Text with its line ending removed.
pub fn trim_eol(text: &[u8]) -> &[u8] {
    let text = text.strip_suffix(b"\n").unwrap_or(text);
    text.strip_suffix(b"\r").unwrap_or(text)
}

fn overlay(base: Option<AttrColor>, over: &AttrColor) -> AttrColor {
    base.map_or(*over, |b| b.overlay(over))
}

/// Where `rule` matches in `text` at or after `offset`.
fn rule_match(rule: &RegexColor, text: &[u8], offset: usize) -> Option<Range<usize>> {
    if rule.group == 0 {
        return rule.regex.find_at(text, offset).map(|m| m.range());
    }
    let caps = rule.regex.captures_at(text, offset)?;
    let whole = caps.get(0)?;
    Some(
        caps.get(rule.group)
            .map_or(whole.start()..whole.start(), |m| m.range()),
    )
}

/// Colour chunks from a list of rules.
///
/// At each position the earliest match wins, the longer one on a tie; a
/// later rule matching exactly the same range adds its colour. A rule that
/// fails once is not tried again on this line. Empty matches move on by a
/// byte.
pub fn pattern_chunks(rules: &RegexColorList, text: &[u8], base: Option<AttrColor>) -> Vec<Chunk> {
    let text = text.strip_suffix(b"\n").unwrap_or(text);
    let mut stopped = vec![false; rules.len()];
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut offset = 0;

    while offset < text.len() {
        let mut best: Option<Chunk> = None;
        let mut null_rx = false;
        for (i, rule) in rules.iter().enumerate() {
            if stopped[i] {
                continue;
            }
            let Some(m) = rule_match(rule, text, offset) else {
                stopped[i] = true;
                continue;
            };
            if m.is_empty() {
                null_rx = true;
                continue;
            }
            let color = overlay(base, &rule.attr);
            match &mut best {
                None => {
                    best = Some(Chunk {
                        first: m.start,
                        last: m.end,
                        color,
                    });
                }
                Some(b) if m.start < b.first || (m.start == b.first && m.end > b.last) => {
                    *b = Chunk {
                        first: m.start,
                        last: m.end,
                        color,
                    };
                }
                Some(b) if m.start == b.first && m.end == b.last => {
                    b.color = b.color.overlay(&rule.attr);
                }
                Some(_) => {}
            }
        }
        match best {
            Some(chunk) => {
                offset = chunk.last;
                chunks.push(chunk);
            }
            None if null_rx => offset += 1,
            None => break,
        }
    }
    chunks
}

/// Input to [`Classifier::resolve`] for line `n`.
pub struct ResolveInput<'a> {
    pub n: usize,
    /// Lines fully scanned; `lines[n + 1..used]` were scanned before `n`
    /// was reclassified.
    pub used: usize,
    pub raw: &'a [u8],
    /// `raw` with formatting and markers removed.
    pub text: &'a [u8],
}

/// Compiled classification settings.
#[derive(Debug, Clone)]
pub struct Classifier {
    quote: Regex,
    smileys: Regex,
    header_partial: bool,
}

impl Classifier {
    pub fn new(config: &PagerConfig) -> Result<Self, PagerError> {
        let quote = compile(&config.quote_regex, false).map_err(|source| PagerError::Regex {
            option: "quote_regex",
            source,
        })?;
        let smileys = compile(&config.smileys, false).map_err(|source| PagerError::Regex {
            option: "smileys",
            source,
        })?;
        Ok(Self {
            quote,
            smileys,
            header_partial: config.header_color_partial,
        })
    }

    /// The quoting prefix of `line`, if it is a quoted line.
    ///
    /// A smiley at the very start means the line isn't quoted; one further
    /// in means only the text before it counts.
    pub fn quote_prefix(&self, line: &[u8]) -> Option<Range<usize>> {
        let m = self.quote.find(line)?;
        match self.smileys.find(line) {
            None => Some(m.range()),
            Some(s) if s.start() > 0 => self.quote.find(&line[..s.start()]).map(|m| m.range()),
            Some(_) => None,
        }
    }

    /// Classify line `n` and compute its colour chunks.
    ///
    /// Returns `true` if lines that may already be on screen changed
    /// colour.
    pub fn resolve(
        &self,
        lines: &mut [Line],
        input: ResolveInput<'_>,
        colors: &ColorConfig,
        quotes: &mut QuoteTree,
    ) -> bool {
        let ResolveInput { n, used, raw, text } = input;
        let mut force_redraw = false;
        let prev_kind = n.checked_sub(1).and_then(|p| lines[p].kind);

        if n == 0
            || prev_kind.is_some_and(LineType::is_header)
            || raw.starts_with(PROTECTED_HEADER_MARKER)
        {
            if text.starts_with(b"\n") || text.starts_with(b"\r\n") {
                lines[n].kind = Some(LineType::Normal);
            } else {
                force_redraw |= self.resolve_header(lines, n, text, colors);
            }
        } else if raw.starts_with(b"\x1b[0m") {
            lines[n].kind = Some(LineType::Normal);
        } else if raw.starts_with(ATTACHMENT_MARKER) || text.starts_with(b"[-- ") {
            lines[n].kind = Some(LineType::Attachment);
        } else if text == b"-- \n" || text == b"-- \r\n" {
            lines[n].kind = Some(LineType::Signature);
            let mut i = n + 1;
            while i < used
                && check_sig(text, lines, i - 1)
                && matches!(
                    lines[i].kind,
                    Some(LineType::Normal | LineType::Quoted | LineType::Header)
                )
            {
                lines[i].kind = Some(LineType::Signature);
                lines[i].syntax.clear();
                i += 1;
            }
        } else if n > 0 && check_sig(text, lines, n - 1) {
            lines[n].kind = Some(LineType::Signature);
        } else if let Some(prefix) = self.quote_prefix(text) {
            if lines[n].quote.is_none() {
                let classified = quotes.classify(&text[prefix]);
                lines[n].quote = Some(classified.id);
                force_redraw |= classified.reshaped;
            }
            lines[n].kind = Some(LineType::Quoted);
        } else {
            lines[n].kind = Some(LineType::Normal);
        }

        match lines[n].kind {
            Some(LineType::Normal | LineType::Quoted) => {
                lines[n].syntax = pattern_chunks(&colors.body, text, None);
            }
            Some(LineType::HeaderDefault) if self.header_partial => {
                lines[n].syntax = pattern_chunks(&colors.header, text, None);
            }
            Some(LineType::Attachment) => {
                let base = colors.get(ColorId::Attachment);
                lines[n].syntax = pattern_chunks(&colors.attach_headers, text, Some(base));
            }
            _ => {}
        }
        force_redraw
    }

    fn resolve_header(
        &self,
        lines: &mut [Line],
        n: usize,
        text: &[u8],
        colors: &ColorConfig,
    ) -> bool {
        let folded = n > 0 && matches!(text.first(), Some(b' ' | b'\t'));
        if folded {
            lines[n].kind = lines[n - 1].kind;
            if !self.header_partial {
                lines[n].color = lines[n - 1].color;
                lines[n].cont_header = true;
            }
        } else {
            lines[n].kind = Some(LineType::HeaderDefault);
        }
        if self.header_partial {
            return false;
        }
        let Some(rule) = colors.header.first_match(text) else {
            return false;
        };
        let color = overlay(lines[n].color, &colors.get(ColorId::HdrDefault)).overlay(&rule.attr);
        lines[n].kind = Some(LineType::Header);
        lines[n].color = Some(color);
        if !lines[n].cont_header {
            return false;
        }

        // recolour the rest of the field, back to its first line
        let mut j = n;
        while j > 0 && (lines[j - 1].cont_header || lines[j - 1].cont) {
            j -= 1;
            lines[j].kind = Some(LineType::Header);
            lines[j].color = Some(color);
        }
        if j > 0 {
            lines[j - 1].kind = Some(LineType::Header);
            lines[j - 1].color = Some(color);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use mtui_style::{Attrs, Color};

    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&PagerConfig::default()).unwrap()
    }

    fn rule_list(rules: &[(&str, AttrColor)]) -> RegexColorList {
        let mut list = RegexColorList::new();
        for (pattern, attr) in rules {
            list.add(pattern, Regex::new(pattern).unwrap(), *attr, 0);
        }
        list
    }

    /// Classify `text` line by line; returns the lines and the quote tree.
    fn classify_all(text: &[&str], colors: &ColorConfig) -> (Vec<Line>, QuoteTree) {
        let c = classifier();
        let mut quotes = QuoteTree::new();
        let mut lines: Vec<Line> = (0..=text.len()).map(|i| Line::at(0, i)).collect();
        for (n, t) in text.iter().enumerate() {
            let input = ResolveInput {
                n,
                used: n,
                raw: t.as_bytes(),
                text: t.as_bytes(),
            };
            c.resolve(&mut lines, input, colors, &mut quotes);
        }
        lines.truncate(text.len());
        (lines, quotes)
    }

    fn kinds(lines: &[Line]) -> Vec<LineType> {
        lines.iter().map(|l| l.kind.unwrap()).collect()
    }

    #[test]
    fn quote_prefix_and_smileys() {
        let c = classifier();
        assert_eq!(c.quote_prefix(b"> text\n"), Some(0..1));
        assert_eq!(c.quote_prefix(b" >> x\n"), Some(0..3));
        assert_eq!(c.quote_prefix(b":-) hi\n"), None);
        assert_eq!(c.quote_prefix(b"plain\n"), None);
        // the smiley only trims what counts as the prefix
        assert_eq!(c.quote_prefix(b"> :-)\n"), Some(0..1));
    }

    #[test]
    fn headers_then_body() {
        let (lines, _) = classify_all(
            &["From: a\n", "Subject: b\n", " continued\n", "\n", "body\n"],
            &ColorConfig::default(),
        );
        use LineType::*;
        assert_eq!(
            kinds(&lines),
            vec![HeaderDefault, HeaderDefault, HeaderDefault, Normal, Normal]
        );
        assert!(lines[2].cont_header);
    }

    #[test]
    fn header_rule_recolours_the_whole_field() {
        let mut colors = ColorConfig::default();
        let red = AttrColor::fg(Color::RED);
        colors.header = rule_list(&[("^Subject:", red)]);
        colors.set(ColorId::HdrDefault, AttrColor::attrs(Attrs::BOLD));

        let (lines, _) = classify_all(&["Subject: a\n", "\tb\n", "\n"], &colors);
        assert_eq!(lines[0].kind, Some(LineType::Header));
        assert_eq!(lines[1].kind, Some(LineType::Header));
        let expected = AttrColor::new(Color::RED, Color::Default, Attrs::BOLD);
        assert_eq!(lines[0].color, Some(expected));
        assert_eq!(lines[1].color, Some(expected));
    }

    #[test]
    fn folded_header_matching_a_rule_recolours_its_first_line() {
        let mut colors = ColorConfig::default();
        colors.header = rule_list(&[("urgent", AttrColor::fg(Color::RED))]);
        let (lines, _) = classify_all(&["Subject: x\n", " urgent\n", "\n"], &colors);
        assert_eq!(lines[0].kind, Some(LineType::Header));
        assert_eq!(lines[0].color, lines[1].color);
    }

    #[test]
    fn quoted_lines_build_the_tree() {
        let (lines, quotes) =
            classify_all(&["\n", "A\n", "> B\n", ">> C\n", "> D\n"], &ColorConfig::default());
        use LineType::*;
        assert_eq!(kinds(&lines), vec![Normal, Normal, Quoted, Quoted, Quoted]);
        let one = lines[2].quote.unwrap();
        let two = lines[3].quote.unwrap();
        assert_eq!(lines[4].quote, Some(one));
        assert_eq!(quotes.prefix(one), b">");
        assert_eq!(quotes.prefix(two), b">>");
        assert_eq!(quotes.up(two), Some(one));
        assert_eq!(quotes.level(one), 0);
        assert_eq!(quotes.level(two), 1);
    }

    #[test]
    fn leading_text_is_a_header_block() {
        // without a blank line first, line 0 opens the headers and the
        // rest continue them
        let (lines, _) =
            classify_all(&["A\n", "> B\n", ">> C\n", "> D\n"], &ColorConfig::default());
        use LineType::*;
        assert_eq!(
            kinds(&lines),
            vec![HeaderDefault, HeaderDefault, HeaderDefault, HeaderDefault]
        );
        assert!(lines.iter().all(|l| l.quote.is_none()));
    }

    #[test]
    fn signature_block() {
        let (lines, _) = classify_all(
            &["\n", "text\n", "-- \n", "Name\n", "Phone\n", "\n", "tail\n"],
            &ColorConfig::default(),
        );
        use LineType::*;
        assert_eq!(
            kinds(&lines),
            vec![Normal, Normal, Signature, Signature, Signature, Signature, Signature]
        );
    }

    #[test]
    fn long_signature_ends_at_a_blank_line() {
        let (lines, _) = classify_all(
            &["\n", "-- \n", "1\n", "2\n", "3\n", "4\n", "5\n", "\n", "after\n"],
            &ColorConfig::default(),
        );
        assert_eq!(lines[6].kind, Some(LineType::Signature));
        assert_eq!(lines[7].kind, Some(LineType::Normal));
        assert_eq!(lines[8].kind, Some(LineType::Normal));
    }

    #[test]
    fn attachment_banner() {
        let (lines, _) = classify_all(
            &["\n", "[-- Attachment #1 --]\n"],
            &ColorConfig::default(),
        );
        assert_eq!(lines[1].kind, Some(LineType::Attachment));
    }

    #[test]
    fn body_rules_pick_the_earliest_then_longest_match() {
        let blue = AttrColor::fg(Color::BLUE);
        let red = AttrColor::fg(Color::RED);
        let bold = AttrColor::attrs(Attrs::BOLD);
        let rules = rule_list(&[("bar", blue), ("foobar", red), ("foobar ", bold), ("z", red)]);
        let chunks = pattern_chunks(&rules, b"xx foobar foobar\n", None);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].range(), 3..10);
        assert_eq!(chunks[0].color, bold);
        assert_eq!(chunks[1].range(), 10..16);
        assert_eq!(chunks[1].color, red);
    }

    #[test]
    fn identical_matches_combine_colours() {
        let rules = rule_list(&[
            ("word", AttrColor::fg(Color::RED)),
            ("wor.", AttrColor::attrs(Attrs::BOLD)),
            ("w.rd", AttrColor::attrs(Attrs::UNDERLINE)),
        ]);
        let chunks = pattern_chunks(&rules, b"a word", None);
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].color,
            AttrColor::new(Color::RED, Color::Default, Attrs::BOLD | Attrs::UNDERLINE)
        );
    }

    #[test]
    fn empty_matches_do_not_loop() {
        let rules = rule_list(&[("x*", AttrColor::fg(Color::RED))]);
        let chunks = pattern_chunks(&rules, b"abxxc", None);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].range(), 2..4);
    }

    #[test]
    fn capture_group_colours_only_the_group() {
        let mut rules = RegexColorList::new();
        rules.add("<(.+)>", Regex::new("<(.+)>").unwrap(), AttrColor::fg(Color::GREEN), 1);
        let chunks = pattern_chunks(&rules, b"see <here>", None);
        assert_eq!(chunks[0].range(), 5..9);
    }
}
