#![forbid(unsafe_code)]

//! Paging operations.
//!
//! Each operation moves the viewport and reports what the user should be
//! told. Operations read `cur`, the line after the last one on screen, so
//! they expect the view to have been painted since the last move.

use mtui_core::Op;
use mtui_keymap::ops::{
    OP_EXIT, OP_HALF_DOWN, OP_HALF_UP, OP_HELP, OP_NEXT_LINE, OP_NEXT_PAGE, OP_PAGER_BOTTOM,
    OP_PAGER_HIDE_QUOTED, OP_PAGER_SKIP_HEADERS, OP_PAGER_SKIP_QUOTED, OP_PAGER_TOP,
    OP_PREV_LINE, OP_PREV_PAGE, OP_SEARCH_NEXT, OP_SEARCH_OPPOSITE, OP_SEARCH_TOGGLE,
};

use crate::line::LineStore;
use crate::view::{PagerMode, PagerView};

const TOP_SHOWN: &str = "Top of message is shown";
const BOTTOM_SHOWN: &str = "Bottom of message is shown";

/// Something to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Message(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Message(s) | Notice::Warning(s) | Notice::Error(s) => s,
        }
    }
}

/// Result of a pager operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Notice(Notice),
    /// Not the pager's business: the caller gets the operation back.
    Leave,
}

fn message(text: &str) -> Outcome {
    Outcome::Notice(Notice::Message(text.to_string()))
}

fn error(text: &str) -> Outcome {
    Outcome::Notice(Notice::Error(text.to_string()))
}

impl PagerView {
    /// Apply a paging operation.
    ///
    /// Searches that need a pattern are not handled here; see
    /// [`search_for`](Self::search_for).
    pub fn apply(&mut self, op: Op) -> Outcome {
        let out = match op {
            OP_NEXT_LINE => self.next_line(),
            OP_NEXT_PAGE => {
                let ctx = usize::from(self.config.pager_context);
                self.page_down(ctx)
            }
            OP_HALF_DOWN => {
                let half = usize::from(self.rows / 2);
                self.page_down(half)
            }
            OP_PREV_LINE => self.page_up(1),
            OP_PREV_PAGE => {
                let lines = self.rows.saturating_sub(self.config.pager_context);
                self.page_up(usize::from(lines))
            }
            OP_HALF_UP => {
                let lines = self.rows / 2 + self.rows % 2;
                self.page_up(usize::from(lines))
            }
            OP_PAGER_TOP => self.go_top(),
            OP_PAGER_BOTTOM => self.go_bottom(),
            OP_PAGER_HIDE_QUOTED => self.toggle_quoted(),
            OP_PAGER_SKIP_HEADERS => self.skip_headers(),
            OP_PAGER_SKIP_QUOTED => self.skip_quoted(),
            OP_SEARCH_NEXT | OP_SEARCH_OPPOSITE => self.search_next(op),
            OP_SEARCH_TOGGLE => self.toggle_search(),
            OP_HELP if self.mode() == PagerMode::Help => error("Help is currently being shown"),
            OP_EXIT | OP_HELP => Outcome::Leave,
            _ => Outcome::Leave,
        };
        self.top = self.top.min(self.store.used());
        tracing::trace!(op = op.0, top = self.top, ?out, "pager op");
        out
    }

    /// Is there text below the screen?
    pub(crate) fn more_below(&self) -> bool {
        self.store.offset(self.cur) + 1 < self.size()
    }

    /// The line `n` lines above `from`, not counting hidden quotes.
    fn up_n_lines(&self, mut n: usize, mut from: usize) -> usize {
        while from > 0 && n > 0 {
            from -= 1;
            if !self.hide_quoted || !self.store.is_quoted(from) {
                n -= 1;
            }
        }
        from
    }

    /// The first line from `from` on that fails `pred`, or `None` if the
    /// file ends first.
    fn skip_while(&mut self, mut from: usize, pred: fn(&LineStore, usize) -> bool) -> Option<usize> {
        loop {
            if !self.ensure_scanned(from) {
                return None;
            }
            if !pred(&self.store, from) {
                return Some(from);
            }
            from += 1;
        }
    }

    fn next_line(&mut self) -> Outcome {
        if !self.more_below() {
            return message(BOTTOM_SHOWN);
        }
        self.top += 1;
        if self.hide_quoted {
            while self.top < self.store.used() && self.store.is_quoted(self.top) {
                self.top += 1;
            }
        }
        Outcome::Done
    }

    /// Scroll so that `overlap` lines of the old screen stay visible.
    fn page_down(&mut self, overlap: usize) -> Outcome {
        if self.more_below() {
            self.top = self.up_n_lines(overlap, self.cur);
            Outcome::Done
        } else if self.config.pager_stop {
            message(BOTTOM_SHOWN)
        } else {
            Outcome::Leave
        }
    }

    fn page_up(&mut self, lines: usize) -> Outcome {
        if self.top == 0 {
            return message(TOP_SHOWN);
        }
        self.top = self.up_n_lines(lines, self.top);
        Outcome::Done
    }

    fn go_top(&mut self) -> Outcome {
        if self.top == 0 {
            return message(TOP_SHOWN);
        }
        self.top = 0;
        Outcome::Done
    }

    fn go_bottom(&mut self) -> Outcome {
        if !self.more_below() {
            return message(BOTTOM_SHOWN);
        }
        self.scan_to_end();
        self.top = self.up_n_lines(usize::from(self.rows), self.store.used());
        Outcome::Done
    }

    fn toggle_quoted(&mut self) -> Outcome {
        if !self.has_types {
            return Outcome::Done;
        }
        self.hide_quoted = !self.hide_quoted;
        if self.hide_quoted {
            while self.top < self.store.used() && self.store.is_quoted(self.top) {
                self.top += 1;
            }
        }
        Outcome::Done
    }

    fn skip_headers(&mut self) -> Outcome {
        if !self.has_types {
            return Outcome::Done;
        }
        match self.skip_while(0, LineStore::is_header) {
            Some(n) => {
                self.top = n;
                Outcome::Done
            }
            None => Outcome::Notice(Notice::Warning(String::from("No text past headers"))),
        }
    }

    fn skip_quoted(&mut self) -> Outcome {
        const NO_UNQUOTED: &str = "No more unquoted text after quoted text";

        if !self.has_types {
            return Outcome::Done;
        }
        let ctx = usize::from(self.config.pager_skip_quoted_context);
        let mut new = self.top;

        if self.ensure_scanned(new) && self.store.is_header(new) {
            // in the headers: just skip them
            while self.ensure_scanned(new) && self.store.is_header(new) {
                new += 1;
            }
            self.top = new;
            return Outcome::Done;
        }

        let mut num_quoted = 0;
        if ctx > 0 {
            let Some(end) = self.skip_while(new, LineStore::is_quoted) else {
                return error(NO_UNQUOTED);
            };
            num_quoted = end - new;
            new = end;
        }
        if num_quoted <= ctx {
            let Some(quote) = self.skip_while(new, |s, n| !s.is_quoted(n)) else {
                return error("No more quoted text");
            };
            let Some(end) = self.skip_while(quote, LineStore::is_quoted) else {
                return error(NO_UNQUOTED);
            };
            num_quoted = end - quote;
            new = end;
        }
        self.top = new - ctx.min(num_quoted);
        Outcome::Done
    }
}
