#![forbid(unsafe_code)]

//! Per-line records of a pager session.

use std::ops::Range;

use mtui_style::{AttrColor, ColorId};

use crate::quote::QuoteId;

/// What a logical line was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineType {
    Normal,
    Quoted,
    /// A header line matched by a `color header` rule.
    Header,
    /// A header line no rule matched.
    HeaderDefault,
    Signature,
    /// An attachment banner.
    Attachment,
}

impl LineType {
    pub const fn is_header(self) -> bool {
        matches!(self, LineType::Header | LineType::HeaderDefault)
    }

    /// The simple colour lines of this type are drawn in.
    pub const fn color_id(self) -> ColorId {
        match self {
            LineType::Normal => ColorId::Normal,
            LineType::Quoted => ColorId::Quoted,
            LineType::Header => ColorId::Header,
            LineType::HeaderDefault => ColorId::HdrDefault,
            LineType::Signature => ColorId::Signature,
            LineType::Attachment => ColorId::Attachment,
        }
    }
}

/// A coloured byte range of the stripped text of a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub first: usize,
    pub last: usize,
    pub color: AttrColor,
}

impl Chunk {
    pub fn range(&self) -> Range<usize> {
        self.first..self.last
    }
}

/// The chunk covering `pos`. Chunks are sorted and don't overlap.
pub fn chunk_at(chunks: &[Chunk], pos: usize) -> Option<&Chunk> {
    let idx = chunks.partition_point(|c| c.last <= pos);
    chunks.get(idx).filter(|c| c.first <= pos)
}

/// Does any range contain `pos`?
pub fn in_ranges(ranges: &[Range<usize>], pos: usize) -> bool {
    let idx = ranges.partition_point(|r| r.end <= pos);
    ranges.get(idx).is_some_and(|r| r.start <= pos)
}

/// One screen line: a whole logical line, or one wrapped segment of it.
///
/// Classification, colour chunks, the quote node and search hits live on
/// the first segment of a logical line (the *origin*); continuation
/// segments copy the type and know where they start in the origin's
/// stripped text.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Byte offset of the segment in the file.
    pub offset: u64,
    pub kind: Option<LineType>,
    /// A wrapped continuation of the line before.
    pub cont: bool,
    /// Index of the first segment of this logical line.
    pub origin: usize,
    /// Offset of this segment in the origin's stripped text.
    pub base: usize,
    /// Whole-line colour of header lines.
    pub color: Option<AttrColor>,
    /// Header continuation sharing the colour of the field it continues.
    pub cont_header: bool,
    pub syntax: Vec<Chunk>,
    /// Search hits; `None` until the line has been searched.
    pub search: Option<Vec<Range<usize>>>,
    pub quote: Option<QuoteId>,
}

impl Line {
    pub fn at(offset: u64, index: usize) -> Self {
        Self {
            offset,
            kind: None,
            cont: false,
            origin: index,
            base: 0,
            color: None,
            cont_header: false,
            syntax: Vec::new(),
            search: None,
            quote: None,
        }
    }

    pub fn has_search_hits(&self) -> bool {
        self.search.as_ref().is_some_and(|s| !s.is_empty())
    }
}

/// The lines scanned so far.
///
/// `lines[used]` always exists: its offset is where scanning resumes and
/// nothing else about it is known yet.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStore {
    lines: Vec<Line>,
    used: usize,
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LineStore {
    pub fn new() -> Self {
        Self {
            lines: vec![Line::at(0, 0)],
            used: 0,
        }
    }

    /// Lines fully scanned.
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn get(&self, n: usize) -> Option<&Line> {
        self.lines.get(n)
    }

    pub fn get_mut(&mut self, n: usize) -> Option<&mut Line> {
        self.lines.get_mut(n)
    }

    /// File offset of line `n` (the frontier offset past the end).
    pub fn offset(&self, n: usize) -> u64 {
        self.lines
            .get(n.min(self.used))
            .map_or(0, |l| l.offset)
    }

    /// Kind of the logical line `n` belongs to.
    pub fn kind(&self, n: usize) -> Option<LineType> {
        self.lines.get(n).and_then(|l| l.kind)
    }

    pub fn is_quoted(&self, n: usize) -> bool {
        self.kind(n) == Some(LineType::Quoted)
    }

    pub fn is_header(&self, n: usize) -> bool {
        self.kind(n).is_some_and(LineType::is_header)
    }

    /// Record line `n` as scanned and open the frontier at `next`.
    pub(crate) fn advance(&mut self, next: Line) {
        self.used += 1;
        if self.lines.len() <= self.used {
            self.lines.push(next);
        } else {
            self.lines[self.used] = next;
        }
    }

    pub(crate) fn lines_mut(&mut self) -> &mut [Line] {
        &mut self.lines
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines[..self.used]
    }

    /// Forget every line; scanning restarts from the top of the file.
    pub(crate) fn reset(&mut self) {
        self.lines.clear();
        self.lines.push(Line::at(0, 0));
        self.used = 0;
    }

    /// Number of logical lines starting before `n`.
    pub fn logical_before(&self, n: usize) -> usize {
        self.lines[..n.min(self.used)]
            .iter()
            .filter(|l| !l.cont)
            .count()
    }
}
