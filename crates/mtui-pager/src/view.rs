#![forbid(unsafe_code)]

//! The pager window.
//!
//! A [`PagerView`] streams a file into a [`LineStore`] one screen line at a
//! time. [`PagerView::display_line`] is the single primitive everything
//! else is built on: it reads one segment, classifies it the first time
//! its logical line is seen, decides where the segment wraps and,
//! optionally, draws it.

use std::any::Any;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use bitflags::bitflags;
use mtui_core::WindowState;
use mtui_core::geometry::{WindowActions, wrap_cols};
use mtui_layout::Canvas;
use mtui_runtime::{PagerConfig, RenderEnv, WindowClient};
use mtui_style::{AttrColor, Attrs, Color, ColorConfig, ColorId, ColorPairs, PairId};
use mtui_text::strip::{ATTACHMENT_MARKER, strip_formatting};
use mtui_text::{AnsiState, Decoded, REPLACEMENT_CHAR, decode};
use regex::bytes::Regex;

use crate::classify::{Classifier, ResolveInput, trim_eol};
use crate::error::PagerError;
use crate::format::{Cell, Glyph, LineFormat, WrapRules, format_line, split_line};
use crate::line::{Line, LineStore, LineType, chunk_at, in_ranges};
use crate::quote::QuoteTree;

bitflags! {
    /// How a line is scanned or drawn.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PagerFlags: u16 {
        /// Draw without colour.
        const SHOW_FLAT  = 1 << 0;
        /// Draw with colour.
        const SHOW_COLOR = 1 << 1;
        /// Hide quoted lines.
        const HIDE       = 1 << 2;
        /// Highlight search hits.
        const SEARCH     = 1 << 3;
        /// Classify lines.
        const TYPES      = 1 << 4;
        /// Keep the blanks a wrapped segment starts with.
        const NSKIP      = 1 << 5;
        /// Wrap at the window edge, ignoring `wrap`.
        const NOWRAP     = 1 << 9;

        const SHOW = Self::SHOW_FLAT.bits() | Self::SHOW_COLOR.bits();
    }
}

/// What the pager is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PagerMode {
    /// An email: lines are classified and coloured.
    #[default]
    Email,
    /// The help screen.
    Help,
    /// Anything else; ANSI colours are always honoured.
    Other,
}

/// Result of [`PagerView::display_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    /// Past the end of the file.
    Eof,
    /// Scanned but not drawn.
    Hidden,
    Drawn,
}

/// A seekable byte stream the pager reads from.
pub trait Source: Read + Seek {}

impl<T: Read + Seek> Source for T {}

/// A compiled search.
#[derive(Debug, Clone)]
pub struct ActiveSearch {
    pub pattern: String,
    pub regex: Regex,
}

/// Where the pager is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top: usize,
    pub hide_quoted: bool,
    pub search_shown: bool,
}

type RuleKey = Vec<(String, AttrColor, usize)>;

fn rule_key(colors: &ColorConfig) -> RuleKey {
    [&colors.header, &colors.body, &colors.attach_headers]
        .into_iter()
        .flat_map(|list| list.iter())
        .map(|r| (r.pattern.clone(), r.attr, r.group))
        .collect()
}

/// The pager's window client.
pub struct PagerView {
    reader: BufReader<Box<dyn Source>>,
    pos: u64,
    size: u64,
    mode: PagerMode,
    request: PagerFlags,
    title: String,

    pub(crate) config: PagerConfig,
    pub(crate) colors: ColorConfig,
    rules: RuleKey,
    classifier: Classifier,

    pub(crate) store: LineStore,
    pub(crate) quotes: QuoteTree,
    pub(crate) top: usize,
    pub(crate) cur: usize,
    pub(crate) rows: u16,
    cols: u16,

    pub(crate) has_types: bool,
    pub(crate) hide_quoted: bool,
    pub(crate) search: Option<ActiveSearch>,
    pub(crate) search_back: bool,
    pub(crate) search_shown: bool,
    needs_flow: bool,
    force_redraw: bool,
    ansi_pairs: Vec<((Color, Color), PairId)>,
}

impl PagerView {
    /// A pager over `source`. `flags` may carry [`PagerFlags::SHOW_COLOR`]
    /// and [`PagerFlags::NOWRAP`].
    pub fn new(
        source: impl Source + 'static,
        mode: PagerMode,
        flags: PagerFlags,
        config: &PagerConfig,
        colors: &ColorConfig,
    ) -> Result<Self, PagerError> {
        let mut source: Box<dyn Source> = Box::new(source);
        let size = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(0))?;
        let classifier = Classifier::new(config)?;
        let request = flags & (PagerFlags::SHOW_COLOR | PagerFlags::NOWRAP);

        tracing::debug!(size, ?mode, ?request, "pager view created");
        Ok(Self {
            reader: BufReader::new(source),
            pos: 0,
            size,
            mode,
            request,
            title: String::new(),
            config: config.clone(),
            colors: colors.clone(),
            rules: rule_key(colors),
            classifier,
            store: LineStore::new(),
            quotes: QuoteTree::new(),
            top: 0,
            cur: 0,
            rows: 0,
            cols: 0,
            has_types: mode == PagerMode::Email || flags.contains(PagerFlags::SHOW_COLOR),
            hide_quoted: false,
            search: None,
            search_back: false,
            search_shown: false,
            needs_flow: false,
            force_redraw: false,
            ansi_pairs: Vec::new(),
        })
    }

    /// A pager over the file at `path`, titled with its name.
    pub fn open(
        path: &Path,
        mode: PagerMode,
        flags: PagerFlags,
        config: &PagerConfig,
        colors: &ColorConfig,
    ) -> Result<Self, PagerError> {
        let file = File::open(path).map_err(|source| PagerError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let view = Self::new(file, mode, flags, config, colors)?;
        Ok(view.with_title(path.display().to_string()))
    }

    pub fn from_bytes(
        bytes: Vec<u8>,
        mode: PagerMode,
        flags: PagerFlags,
        config: &PagerConfig,
        colors: &ColorConfig,
    ) -> Result<Self, PagerError> {
        Self::new(Cursor::new(bytes), mode, flags, config, colors)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode(&self) -> PagerMode {
        self.mode
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn store(&self) -> &LineStore {
        &self.store
    }

    pub fn quotes(&self) -> &QuoteTree {
        &self.quotes
    }

    /// First line on screen.
    pub fn top(&self) -> usize {
        self.top
    }

    /// One past the last line on screen.
    pub fn cur(&self) -> usize {
        self.cur
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn is_hiding_quoted(&self) -> bool {
        self.hide_quoted
    }

    pub fn search_pattern(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.pattern.as_str())
    }

    pub fn is_search_shown(&self) -> bool {
        self.search_shown
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            top: self.top,
            hide_quoted: self.hide_quoted,
            search_shown: self.search_shown,
        }
    }

    /// How far through the file the screen reaches: a percentage, `all`
    /// or `end`.
    pub fn progress(&self) -> String {
        let offset = self.store.offset(self.cur);
        if offset + 1 < self.size {
            format!("{}%", 100 * offset / self.size)
        } else if self.top == 0 {
            String::from("all")
        } else {
            String::from("end")
        }
    }

    /// The text of the status bar.
    pub fn status_text(&self) -> String {
        format!("-- {} ({})", self.title, self.progress())
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// Set the window size directly, for use outside a window tree.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols != self.cols {
            self.needs_flow = true;
        }
        self.cols = cols;
        self.rows = rows;
    }

    /// Pick up changed settings. Anything that changes how lines are split
    /// or classified lays the file out again.
    pub fn sync(&mut self, config: &PagerConfig, colors: &ColorConfig) {
        if *config != self.config {
            let old = &self.config;
            if config.quote_regex != old.quote_regex
                || config.smileys != old.smileys
                || config.header_color_partial != old.header_color_partial
            {
                match Classifier::new(config) {
                    Ok(classifier) => {
                        self.classifier = classifier;
                        self.quotes = QuoteTree::new();
                        self.needs_flow = true;
                    }
                    Err(err) => tracing::error!(%err, "keeping the previous line classifier"),
                }
            }
            if config.wrap != old.wrap
                || config.smart_wrap != old.smart_wrap
                || config.markers != old.markers
                || config.allow_ansi != old.allow_ansi
            {
                self.needs_flow = true;
            }
            self.config = config.clone();
        }

        let rules = rule_key(colors);
        if rules != self.rules {
            tracing::debug!("colour rules changed, laying out again");
            self.rules = rules;
            self.quotes = QuoteTree::new();
            self.needs_flow = true;
        }
        self.colors = colors.clone();
    }

    fn allow_ansi(&self) -> bool {
        self.mode == PagerMode::Other || self.config.allow_ansi
    }

    /// Flags lines are scanned with when nothing is drawn.
    pub(crate) fn scan_flags(&self) -> PagerFlags {
        let mut flags = self.request & PagerFlags::NOWRAP;
        if self.has_types {
            flags |= PagerFlags::TYPES;
        }
        flags
    }

    fn show_flags(&self) -> PagerFlags {
        let mut flags = self.scan_flags();
        flags |= if self.has_types || self.request.contains(PagerFlags::SHOW_COLOR) {
            PagerFlags::SHOW_COLOR
        } else {
            PagerFlags::SHOW_FLAT
        };
        if self.hide_quoted {
            flags |= PagerFlags::HIDE;
        }
        if self.search_shown {
            flags |= PagerFlags::SEARCH;
        }
        flags
    }

    // -----------------------------------------------------------------------
    // Scanning
    // -----------------------------------------------------------------------

    fn read_segment(&mut self, offset: u64) -> io::Result<Vec<u8>> {
        if self.pos != offset {
            self.reader.seek(SeekFrom::Start(offset))?;
            self.pos = offset;
        }
        let mut buf = Vec::new();
        let n = self.reader.read_until(b'\n', &mut buf)?;
        self.pos += n as u64;
        Ok(buf)
    }

    /// Scan until line `n` exists. Returns `false` if the file ends first.
    pub(crate) fn ensure_scanned(&mut self, n: usize) -> bool {
        let flags = self.scan_flags();
        while self.store.used() <= n {
            let next = self.store.used();
            if self.display_line(next, flags, None) == Shown::Eof {
                return false;
            }
        }
        true
    }

    /// Scan the rest of the file.
    pub(crate) fn scan_to_end(&mut self) {
        while self.ensure_scanned(self.store.used()) {}
    }

    /// Read, classify, split and maybe draw line `n`.
    ///
    /// `n` may be at most [`LineStore::used`]; scanning the frontier line
    /// records it and opens the next one. The caller positions the cursor
    /// on the row to draw into.
    pub fn display_line(
        &mut self,
        n: usize,
        mut flags: PagerFlags,
        canvas: Option<&mut Canvas<'_>>,
    ) -> Shown {
        if n > self.store.used() {
            return Shown::Eof;
        }
        let new_line = n == self.store.used();
        let offset = self.store.offset(n);
        if offset >= self.size {
            return Shown::Eof;
        }
        let raw = match self.read_segment(offset) {
            Ok(raw) if !raw.is_empty() => raw,
            Ok(_) => return Shown::Eof,
            Err(err) => {
                tracing::warn!(%err, offset, "pager read failed");
                return Shown::Eof;
            }
        };

        let (cont, origin) = self
            .store
            .get(n)
            .map_or((false, n), |l| (l.cont, l.origin));
        let mut stripped: Option<Vec<u8>> = None;

        if flags.intersects(PagerFlags::TYPES | PagerFlags::SHOW_COLOR)
            && !cont
            && self.store.kind(n).is_none()
        {
            let text = strip_formatting(&raw, true);
            if self.mode == PagerMode::Email {
                let input = ResolveInput {
                    n,
                    used: self.store.used(),
                    raw: &raw,
                    text: &text,
                };
                if self.classifier.resolve(
                    self.store.lines_mut(),
                    input,
                    &self.colors,
                    &mut self.quotes,
                ) {
                    self.force_redraw = true;
                }
            } else if let Some(line) = self.store.get_mut(n) {
                line.kind = Some(LineType::Normal);
            }
            self.copy_to_segments(n);
            stripped = Some(text);
        }

        if flags.contains(PagerFlags::HIDE) && self.is_hidden_quote(origin) {
            flags = PagerFlags::empty();
        }

        if !cont && self.search.is_some() && self.store.get(n).is_some_and(|l| l.search.is_none()) {
            let text = stripped.get_or_insert_with(|| strip_formatting(&raw, true));
            let hits = self
                .search
                .as_ref()
                .map(|s| {
                    s.regex
                        .find_iter(trim_eol(text))
                        .map(|m| m.range())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            if let Some(line) = self.store.get_mut(n) {
                line.search = Some(hits);
            }
        }

        if !flags.intersects(PagerFlags::SHOW) && !new_line {
            return Shown::Hidden;
        }
        if flags.contains(PagerFlags::SHOW_COLOR) && self.force_redraw && !new_line {
            return Shown::Drawn;
        }

        let markers = self.config.markers && cont;
        let cols = usize::from(self.cols);
        let wrap = if raw.starts_with(ATTACHMENT_MARKER) {
            cols
        } else {
            let wrap = if flags.contains(PagerFlags::NOWRAP) {
                0
            } else {
                self.config.wrap
            };
            usize::from(wrap_cols(self.cols, wrap))
        };
        let fmt = LineFormat {
            start_col: usize::from(markers),
            wrap_cols: wrap,
            allow_ansi: self.allow_ansi(),
        };
        let fit = format_line(&raw, &fmt, &mut AnsiState::default(), None);
        let kind = self.store.kind(n);
        let mut split = split_line(
            &raw,
            &fit,
            WrapRules {
                smart_wrap: self.config.smart_wrap,
                header: kind.is_some_and(LineType::is_header),
                skip_blanks: !flags.contains(PagerFlags::NSKIP),
            },
        );
        if split.next == 0 {
            // nothing fits: take one character so scanning moves on
            let len = match decode(&raw) {
                Decoded::Char(_, len) => len,
                _ => 1,
            };
            split.shown = len;
            split.next = len;
        }

        if new_line {
            let mut next = Line::at(offset + split.next as u64, n + 1);
            if split.next < raw.len() {
                if let Some(line) = self.store.get(n) {
                    next.cont = true;
                    next.origin = line.origin;
                    next.kind = line.kind;
                    next.color = line.color;
                    next.cont_header = line.cont_header;
                    next.base = line.base + strip_formatting(&raw[..split.next], true).len();
                }
            }
            self.store.advance(next);
        }

        if !flags.intersects(PagerFlags::SHOW) {
            return Shown::Hidden;
        }
        if let Some(canvas) = canvas {
            self.draw_segment(n, &raw[..split.shown], &fmt, flags, canvas);
        }
        Shown::Drawn
    }

    /// Give already-scanned segments of line `n` its classification.
    fn copy_to_segments(&mut self, n: usize) {
        let used = self.store.used();
        let Some((kind, color)) = self.store.get(n).map(|l| (l.kind, l.color)) else {
            return;
        };
        let mut i = n + 1;
        while i < used {
            match self.store.get_mut(i) {
                Some(line) if line.cont => {
                    line.kind = kind;
                    line.color = color;
                }
                _ => break,
            }
            i += 1;
        }
    }

    /// Is `origin` a quoted line deep enough to hide?
    pub(crate) fn is_hidden_quote(&self, origin: usize) -> bool {
        let Some(line) = self.store.get(origin) else {
            return false;
        };
        if line.kind != Some(LineType::Quoted) {
            return false;
        }
        let shown_levels = usize::from(self.config.toggle_quoted_show_levels);
        line.quote
            .is_none_or(|q| self.quotes.level(q) >= shown_levels)
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw_segment(
        &mut self,
        n: usize,
        raw: &[u8],
        fmt: &LineFormat,
        flags: PagerFlags,
        canvas: &mut Canvas<'_>,
    ) {
        let Some(line) = self.store.get(n) else {
            return;
        };
        let base = line.base;
        let cont = line.cont;
        let origin = line.origin;
        let normal = self.colors.get(ColorId::Normal);

        if cont && self.config.markers {
            canvas.set_color(self.colors.merged(ColorId::Markers));
            canvas.add_char('+');
        }

        let mut cells: Vec<Cell> = Vec::new();
        format_line(raw, fmt, &mut AnsiState::default(), Some(&mut cells));

        let mut last = None;
        for cell in &cells {
            if cell.ansi.has_color() {
                self.alloc_pair(canvas.terminal().color_pairs(), &cell.ansi);
            }
            let color = self.resolve_color(origin, cell, base + cell.vch, flags);
            if last != Some(color) {
                canvas.set_color(color);
                last = Some(color);
            }
            match cell.glyph {
                Glyph::Char(c) => {
                    canvas.add_char(c);
                }
                Glyph::Caret(c) => {
                    canvas.add_char('^');
                    canvas.add_char(c);
                }
                Glyph::Octal(b) => {
                    canvas.add_str(&format!("\\{b:03o}"));
                }
                Glyph::Blank(width) => {
                    for _ in 0..width {
                        canvas.add_char(' ');
                    }
                }
                Glyph::Replacement => {
                    canvas.add_char(REPLACEMENT_CHAR);
                }
            }
        }

        // the rest of the row takes the line's own colour
        let eol = if flags.contains(PagerFlags::SHOW_COLOR) {
            normal.overlay(&self.line_color(origin, base + cells.last().map_or(0, |c| c.vch)))
        } else {
            normal
        };
        canvas.set_color(eol);
        canvas.clear_to_eol();
        canvas.set_color(normal);
    }

    /// Colour of line `origin` before syntax chunks, at offset `pos`.
    fn line_color(&self, origin: usize, pos: usize) -> AttrColor {
        let Some(line) = self.store.get(origin) else {
            return AttrColor::NONE;
        };
        match line.kind {
            Some(LineType::Quoted) => {
                let mut quote = line.quote;
                while let Some(q) = quote {
                    if self.quotes.prefix(q).len() <= pos {
                        break;
                    }
                    match self.quotes.up(q) {
                        Some(up) => quote = Some(up),
                        None => break,
                    }
                }
                quote
                    .and_then(|q| self.quotes.color(q, &self.colors.quoted))
                    .unwrap_or_else(|| self.colors.get(ColorId::Quoted))
            }
            Some(kind @ (LineType::Header | LineType::HeaderDefault)) => line
                .color
                .unwrap_or_else(|| self.colors.get(kind.color_id())),
            Some(kind) => self.colors.get(kind.color_id()),
            None => AttrColor::NONE,
        }
    }

    /// The colour of one cell; `pos` is its offset in the logical line.
    fn resolve_color(&self, origin: usize, cell: &Cell, pos: usize, flags: PagerFlags) -> AttrColor {
        let normal = self.colors.get(ColorId::Normal);
        let line = self.store.get(origin);
        let mut color = AttrColor::NONE;

        if flags.contains(PagerFlags::SHOW_COLOR) {
            color = self.line_color(origin, pos);
            if let Some(chunk) = line.and_then(|l| chunk_at(&l.syntax, pos)) {
                color = chunk.color;
            }
        }

        let hit = flags.contains(PagerFlags::SEARCH)
            && line
                .and_then(|l| l.search.as_deref())
                .is_some_and(|hits| in_ranges(hits, pos));
        if hit {
            color = self.colors.get(ColorId::Search);
        }

        if cell.special.contains(Attrs::BOLD) {
            let bold = self.colors.get(ColorId::Bold);
            if bold.is_set() && !hit {
                color = bold;
            } else {
                color.attrs |= Attrs::BOLD;
            }
        } else if cell.special.contains(Attrs::UNDERLINE) {
            let underline = self.colors.get(ColorId::Underline);
            if underline.is_set() && !hit {
                color = underline;
            } else {
                color.attrs |= Attrs::UNDERLINE;
            }
        } else if cell.ansi.is_set() {
            color = cell.ansi.to_attr_color();
        }

        normal.overlay(&color)
    }

    fn alloc_pair(&mut self, pairs: &mut ColorPairs, ansi: &AnsiState) {
        let key = (ansi.fg, ansi.bg);
        if self.ansi_pairs.iter().any(|(k, _)| *k == key) {
            return;
        }
        match pairs.alloc(ansi.fg, ansi.bg) {
            Some(pair) => self.ansi_pairs.push((key, pair)),
            None => tracing::warn!(fg = ?ansi.fg, bg = ?ansi.bg, "out of colour pairs"),
        }
    }

    /// Number of colour pairs held for ANSI sequences.
    pub fn ansi_pair_count(&self) -> usize {
        self.ansi_pairs.len()
    }

    /// Give back the colour pairs allocated for ANSI sequences.
    pub fn release_colors(&mut self, pairs: &mut ColorPairs) {
        for (_, pair) in self.ansi_pairs.drain(..) {
            pairs.free(pair);
        }
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Lay the file out again from the start, keeping the same logical
    /// line at the top.
    fn reflow(&mut self) {
        let target = self.store.logical_before(self.top + 1).saturating_sub(1);
        self.store.reset();
        self.top = 0;
        self.cur = 0;
        self.needs_flow = false;

        let flags = self.scan_flags();
        let mut logical = 0;
        let mut i = 0;
        loop {
            let is_origin = self.store.get(i).is_none_or(|l| !l.cont);
            if is_origin {
                if logical == target {
                    self.top = i;
                    if self.search.is_none() {
                        break;
                    }
                }
                logical += 1;
            }
            if self.display_line(i, flags, None) == Shown::Eof {
                break;
            }
            i += 1;
        }
        tracing::debug!(top = self.top, used = self.store.used(), "pager laid out");
    }

    /// Draw the screen from `top`.
    pub fn paint(&mut self, canvas: &mut Canvas<'_>) {
        self.rows = canvas.rows();
        if self.cols != canvas.cols() {
            self.cols = canvas.cols();
            self.needs_flow = true;
        }
        if self.needs_flow {
            self.reflow();
        }

        let rows = canvas.rows();
        let mut row;
        loop {
            self.force_redraw = false;
            self.cur = self.top;
            row = 0;
            let flags = self.show_flags();
            while row < rows {
                canvas.move_to(row, 0);
                match self.display_line(self.cur, flags, Some(canvas)) {
                    Shown::Eof => break,
                    Shown::Drawn => row += 1,
                    Shown::Hidden => {}
                }
                self.cur += 1;
            }
            if !self.force_redraw {
                break;
            }
        }

        let normal = self.colors.get(ColorId::Normal);
        let tilde = normal.overlay(&self.colors.get(ColorId::Tilde));
        for r in row..rows {
            canvas.move_to(r, 0);
            canvas.set_color(normal);
            canvas.clear_to_eol();
            if self.config.tilde {
                canvas.set_color(tilde);
                canvas.add_char('~');
                canvas.set_color(normal);
            }
        }
    }
}

impl WindowClient for PagerView {
    fn recalc(&mut self, state: &WindowState, env: &RenderEnv<'_>) -> WindowActions {
        self.resize(state.cols, state.rows);
        self.sync(&env.config.pager, env.colors);
        WindowActions::REPAINT
    }

    fn repaint(&mut self, canvas: &mut Canvas<'_>, _env: &RenderEnv<'_>) {
        self.paint(canvas);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use mtui_render::{HeadlessTerminal, Terminal};

    use super::*;

    fn view(text: &str, mode: PagerMode, config: &PagerConfig) -> PagerView {
        PagerView::from_bytes(
            text.as_bytes().to_vec(),
            mode,
            PagerFlags::empty(),
            config,
            &ColorConfig::default(),
        )
        .unwrap()
    }

    fn paint(view: &mut PagerView, term: &mut HeadlessTerminal) {
        let (cols, rows) = term.size();
        let mut canvas = Canvas::new(term, WindowState::new(rows, cols));
        view.paint(&mut canvas);
    }

    #[test]
    fn short_file_fits() {
        let mut v = view("one\ntwo\n", PagerMode::Other, &PagerConfig::default());
        let mut term = HeadlessTerminal::new(20, 5);
        paint(&mut v, &mut term);
        assert_eq!(term.row_text(0), "one");
        assert_eq!(term.row_text(1), "two");
        assert_eq!(term.row_text(2), "");
        assert_eq!(v.store().used(), 2);
        assert_eq!(v.cur(), 2);
        assert_eq!(v.progress(), "all");
    }

    #[test]
    fn tilde_fills_past_the_end() {
        let config = PagerConfig::default().with_tilde(true);
        let mut v = view("one\n", PagerMode::Other, &config);
        let mut term = HeadlessTerminal::new(20, 3);
        paint(&mut v, &mut term);
        assert_eq!(term.row_text(1), "~");
        assert_eq!(term.row_text(2), "~");
    }

    #[test]
    fn long_lines_wrap_with_a_marker() {
        let mut v = view("aaa bbbbb ccc\n", PagerMode::Other, &PagerConfig::default());
        let mut term = HeadlessTerminal::new(10, 4);
        paint(&mut v, &mut term);
        assert_eq!(term.row_text(0), "aaa bbbbb");
        assert_eq!(term.row_text(1), "+ccc");
        let second = v.store().get(1).unwrap();
        assert!(second.cont);
        assert_eq!(second.origin, 0);
        assert_eq!(second.offset, 10);
        assert_eq!(second.base, 10);
    }

    #[test]
    fn control_and_invalid_bytes() {
        let mut v = PagerView::from_bytes(
            b"a\x01b\xffc\n".to_vec(),
            PagerMode::Other,
            PagerFlags::empty(),
            &PagerConfig::default(),
            &ColorConfig::default(),
        )
        .unwrap();
        let mut term = HeadlessTerminal::new(20, 2);
        paint(&mut v, &mut term);
        assert_eq!(term.row_text(0), "a^Ab\\377c");
    }

    #[test]
    fn ansi_colours_allocate_pairs() {
        let mut v = view("\x1b[31mred\x1b[0m plain\n", PagerMode::Other, &PagerConfig::default());
        let mut term = HeadlessTerminal::new(20, 2);
        paint(&mut v, &mut term);
        assert_eq!(term.row_text(0), "red plain");
        assert_eq!(term.screen().get(0, 0).unwrap().color.fg, Color::RED);
        assert_eq!(term.screen().get(0, 4).unwrap().color.fg, Color::Default);
        assert_eq!(v.ansi_pair_count(), 1);
        v.release_colors(term.color_pairs());
        assert_eq!(v.ansi_pair_count(), 0);
        assert!(term.color_pairs().is_empty());
    }

    #[test]
    fn ansi_is_ignored_in_email_mode_by_default() {
        let mut v = view("\x1b[31mred\n", PagerMode::Email, &PagerConfig::default());
        let mut term = HeadlessTerminal::new(20, 2);
        paint(&mut v, &mut term);
        assert_eq!(term.row_text(0), "red");
        assert_ne!(term.screen().get(0, 0).unwrap().color.fg, Color::RED);
    }

    #[test]
    fn overstrike_draws_bold() {
        let mut v = view("B\x08Bold\n", PagerMode::Other, &PagerConfig::default());
        let mut term = HeadlessTerminal::new(20, 2);
        paint(&mut v, &mut term);
        assert_eq!(term.row_text(0), "Bold");
        assert!(term.screen().get(0, 0).unwrap().color.attrs.contains(Attrs::BOLD));
        assert!(!term.screen().get(0, 1).unwrap().color.attrs.contains(Attrs::BOLD));
    }

    #[test]
    fn narrowing_the_window_reflows() {
        let mut v = view("aaaa bbbb\nccc\n", PagerMode::Other, &PagerConfig::default());
        let mut term = HeadlessTerminal::new(20, 4);
        paint(&mut v, &mut term);
        assert_eq!(v.store().used(), 2);

        let mut term = HeadlessTerminal::new(5, 4);
        paint(&mut v, &mut term);
        assert_eq!(term.row_text(0), "aaaa");
        assert_eq!(term.row_text(1), "+bbbb");
        assert_eq!(term.row_text(2), "ccc");
    }

    #[test]
    fn hidden_quotes_are_skipped_on_screen() {
        let text = "From: a\n\nhello\n> quoted\n> more\nbye\n";
        let mut v = view(text, PagerMode::Email, &PagerConfig::default());
        v.hide_quoted = true;
        let mut term = HeadlessTerminal::new(20, 6);
        paint(&mut v, &mut term);
        assert_eq!(term.row_text(2), "hello");
        assert_eq!(term.row_text(3), "bye");
    }

    #[test]
    fn changed_body_rules_reclassify() {
        let mut v = view("From: a\n\nhello world\n", PagerMode::Email, &PagerConfig::default());
        let mut term = HeadlessTerminal::new(20, 4);
        paint(&mut v, &mut term);

        let mut colors = ColorConfig::default();
        colors.body.add(
            "world",
            Regex::new("world").unwrap(),
            AttrColor::fg(Color::GREEN),
            0,
        );
        v.sync(&PagerConfig::default(), &colors);
        paint(&mut v, &mut term);
        assert_eq!(term.screen().get(2, 6).unwrap().color.fg, Color::GREEN);
        assert_eq!(term.screen().get(2, 0).unwrap().color.fg, Color::Default);
    }

    #[test]
    fn bad_quote_regex_keeps_the_old_classifier() {
        let mut v = view("From: x\n\n> a\n", PagerMode::Email, &PagerConfig::default());
        let bad = PagerConfig::default().with_quote_regex("(");
        v.sync(&bad, &ColorConfig::default());
        let mut term = HeadlessTerminal::new(20, 2);
        paint(&mut v, &mut term);
        assert!(v.store().is_quoted(2));
    }
}
