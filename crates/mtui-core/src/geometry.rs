#![forbid(unsafe_code)]

//! Window identifiers and geometry.

use bitflags::bitflags;

/// Handle to a node in a window tree.
///
/// Ids are arena indices; a freed id may be reused by a later node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u32);

impl WindowId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Direction in which a container stacks its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Children are stacked top to bottom.
    #[default]
    Vertical,
    /// Children are stacked left to right.
    Horizontal,
}

/// How a window claims space from its parent along the stacking axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizePolicy {
    /// Take the requested size (or whatever is left).
    Fixed,
    /// Share the leftover space with the other maximising siblings.
    #[default]
    Maximise,
    /// Shrink to the natural size of the children.
    Minimise,
}

impl SizePolicy {
    /// Three-letter tag used by the debug serialiser.
    pub const fn tag(self) -> &'static str {
        match self {
            SizePolicy::Fixed => "FIX",
            SizePolicy::Maximise => "MAX",
            SizePolicy::Minimise => "MIN",
        }
    }
}

/// A requested extent: a number of cells or "as much as possible".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Extent {
    Cells(u16),
    #[default]
    Unlimited,
}

impl Extent {
    /// Resolve against the space still available.
    #[inline]
    pub const fn claim(self, available: u16) -> u16 {
        match self {
            Extent::Cells(n) if n < available => n,
            _ => available,
        }
    }
}

/// Computed geometry of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowState {
    /// The window's own visible flag (not the effective visibility).
    pub visible: bool,
    pub rows: u16,
    pub cols: u16,
    pub row_offset: u16,
    pub col_offset: u16,
}

impl WindowState {
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self {
            visible: true,
            rows,
            cols,
            row_offset: 0,
            col_offset: 0,
        }
    }

    /// Extent along the stacking axis of `orient`.
    #[inline]
    pub const fn main(&self, orient: Orientation) -> u16 {
        match orient {
            Orientation::Vertical => self.rows,
            Orientation::Horizontal => self.cols,
        }
    }

    /// Flags describing how `self` differs from `old`, ignoring visibility.
    pub fn diff(&self, old: &WindowState) -> StateFlags {
        let mut flags = StateFlags::empty();
        if self.row_offset != old.row_offset || self.col_offset != old.col_offset {
            flags |= StateFlags::MOVED;
        }
        if self.rows > old.rows {
            flags |= StateFlags::TALLER;
        } else if self.rows < old.rows {
            flags |= StateFlags::SHORTER;
        }
        if self.cols > old.cols {
            flags |= StateFlags::WIDER;
        } else if self.cols < old.cols {
            flags |= StateFlags::NARROWER;
        }
        flags
    }
}

bitflags! {
    /// What changed about a window between two layouts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u8 {
        const TALLER   = 1 << 0;
        const SHORTER  = 1 << 1;
        const WIDER    = 1 << 2;
        const NARROWER = 1 << 3;
        const MOVED    = 1 << 4;
        const VISIBLE  = 1 << 5;
        const HIDDEN   = 1 << 6;
    }
}

bitflags! {
    /// Pending work on a window, cleared by the render cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowActions: u8 {
        const RECALC  = 1 << 0;
        const REPAINT = 1 << 1;
        const REFLOW  = 1 << 2;
    }
}

/// Columns available for text given the window width and a wrap setting.
///
/// A positive `wrap` caps the width, a negative one leaves a right margin,
/// zero uses the full width. The result is never less than 1 unless the
/// window itself has no width.
pub fn wrap_cols(width: u16, wrap: i16) -> u16 {
    if width == 0 {
        return 0;
    }
    if wrap < 0 {
        let margin = wrap.unsigned_abs();
        if margin < width { width - margin } else { width }
    } else if wrap > 0 {
        let w = wrap as u16;
        if w < width { w } else { width }
    } else {
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_claim() {
        assert_eq!(Extent::Cells(10).claim(24), 10);
        assert_eq!(Extent::Cells(30).claim(24), 24);
        assert_eq!(Extent::Unlimited.claim(24), 24);
    }

    #[test]
    fn state_diff() {
        let old = WindowState::new(10, 80);
        let mut new = old;
        new.rows = 12;
        new.cols = 40;
        new.row_offset = 1;
        assert_eq!(
            new.diff(&old),
            StateFlags::TALLER | StateFlags::NARROWER | StateFlags::MOVED
        );
        assert!(old.diff(&old).is_empty());
    }

    #[test]
    fn wrap_columns() {
        assert_eq!(wrap_cols(80, 0), 80);
        assert_eq!(wrap_cols(80, 72), 72);
        assert_eq!(wrap_cols(80, 100), 80);
        assert_eq!(wrap_cols(80, -10), 70);
        assert_eq!(wrap_cols(8, -10), 8);
        assert_eq!(wrap_cols(0, 5), 0);
    }
}
