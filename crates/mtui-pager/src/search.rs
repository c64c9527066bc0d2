#![forbid(unsafe_code)]

//! Searching the pager.

use mtui_core::Op;
use mtui_keymap::ops::{OP_SEARCH, OP_SEARCH_NEXT, OP_SEARCH_OPPOSITE, OP_SEARCH_REVERSE};
use mtui_text::regex::smart_case;

use crate::error::SearchError;
use crate::ops::{Notice, Outcome};
use crate::view::{ActiveSearch, PagerView, Shown};

impl PagerView {
    /// Does line `n` start a logical line with a visible search hit?
    fn is_hit(&self, n: usize) -> bool {
        self.store.get(n).is_some_and(|l| {
            !l.cont && l.has_search_hits() && !(self.hide_quoted && self.store.is_quoted(n))
        })
    }

    fn search_context(&self) -> usize {
        let ctx = self.config.search_context;
        if ctx < self.rows { usize::from(ctx) } else { 0 }
    }

    fn clear_hits(&mut self) {
        for n in 0..=self.store.used() {
            if let Some(line) = self.store.get_mut(n) {
                line.search = None;
            }
        }
    }

    /// Search for `pattern`: forwards for [`OP_SEARCH`], backwards for
    /// [`OP_SEARCH_REVERSE`].
    ///
    /// Searching again for the current pattern moves to the next hit. An
    /// empty pattern does nothing. The pattern ignores case unless it has
    /// an upper-case letter.
    pub fn search_for(&mut self, pattern: &str, op: Op) -> Result<Outcome, SearchError> {
        if self.search_pattern() == Some(pattern) {
            let next = if op == OP_SEARCH { OP_SEARCH_NEXT } else { OP_SEARCH_OPPOSITE };
            return Ok(self.search_next(next));
        }
        if pattern.is_empty() {
            return Ok(Outcome::Done);
        }

        if op == OP_SEARCH {
            self.search_back = false;
        } else if op == OP_SEARCH_REVERSE {
            self.search_back = true;
        }
        self.clear_hits();

        let regex = match smart_case(pattern) {
            Ok(regex) => regex,
            Err(err) => {
                tracing::debug!(pattern, %err, "bad search pattern");
                self.search = None;
                self.search_shown = false;
                return Err(SearchError::Pattern(err));
            }
        };
        self.search = Some(ActiveSearch {
            pattern: pattern.to_string(),
            regex,
        });

        // scanning fills in the hits of every line, old and new
        let flags = self.scan_flags();
        let mut n = 0;
        while self.display_line(n, flags, None) != Shown::Eof {
            n += 1;
        }
        let used = self.store.used();

        let found = if self.search_back {
            (0..=self.top.min(used.saturating_sub(1))).rev().find(|&n| self.is_hit(n))
        } else {
            (self.top..used).find(|&n| self.is_hit(n))
        };
        if let Some(n) = found {
            self.top = n;
        }

        if !self.is_hit(self.top) {
            self.search_shown = false;
            return Ok(Outcome::Notice(Notice::Error(String::from("Not found"))));
        }
        self.search_shown = true;
        let ctx = self.search_context();
        if self.top > ctx {
            self.top -= ctx;
        }
        Ok(Outcome::Done)
    }

    /// Move to the next hit of the current search: in the search direction
    /// for [`OP_SEARCH_NEXT`], against it for [`OP_SEARCH_OPPOSITE`].
    pub fn search_next(&mut self, op: Op) -> Outcome {
        if self.search.is_none() {
            return Outcome::Done;
        }
        let ctx = self.search_context();
        let forward = (!self.search_back && op == OP_SEARCH_NEXT)
            || (self.search_back && op == OP_SEARCH_OPPOSITE);
        let used = self.store.used();

        let mut notice = None;
        let mut wrapped = false;
        loop {
            let found = if forward {
                let from = if wrapped { 0 } else { self.top + ctx + 1 };
                (from..used).find(|&n| self.is_hit(n))
            } else {
                let from = if wrapped {
                    used.checked_sub(1)
                } else {
                    (self.top + ctx).checked_sub(1)
                };
                from.and_then(|from| (0..=from.min(used.saturating_sub(1))).rev().find(|&n| self.is_hit(n)))
            };
            match found {
                Some(n) => {
                    self.top = n;
                    break;
                }
                None if wrapped || !self.config.wrap_search => {
                    notice = Some(Notice::Error(String::from("Not found")));
                    break;
                }
                None => {
                    let text = if forward { "Search wrapped to top" } else { "Search wrapped to bottom" };
                    notice = Some(Notice::Message(String::from(text)));
                    wrapped = true;
                }
            }
        }

        if self.is_hit(self.top) {
            self.search_shown = true;
            if self.top > ctx {
                self.top -= ctx;
            }
        }
        notice.map_or(Outcome::Done, Outcome::Notice)
    }

    /// Show or hide the highlighting of search hits.
    pub fn toggle_search(&mut self) -> Outcome {
        if self.search.is_some() {
            self.search_shown = !self.search_shown;
        }
        Outcome::Done
    }
}

#[cfg(test)]
mod tests {
    use mtui_runtime::PagerConfig;
    use mtui_style::ColorConfig;

    use super::*;
    use crate::view::{PagerFlags, PagerMode};

    fn numbered(n: usize, hits: &[usize]) -> PagerView {
        let mut text = String::new();
        for i in 0..n {
            if hits.contains(&i) {
                text.push_str(&format!("line {i} x\n"));
            } else {
                text.push_str(&format!("line {i}\n"));
            }
        }
        let mut v = PagerView::from_bytes(
            text.into_bytes(),
            PagerMode::Other,
            PagerFlags::empty(),
            &PagerConfig::default(),
            &ColorConfig::default(),
        )
        .unwrap();
        v.resize(40, 10);
        v
    }

    #[test]
    fn first_hit_from_the_top() {
        let mut v = numbered(20, &[5, 12]);
        assert_eq!(v.search_for("x", OP_SEARCH).unwrap(), Outcome::Done);
        assert_eq!(v.top(), 5);
        assert!(v.is_search_shown());
        assert_eq!(v.search_next(OP_SEARCH_NEXT), Outcome::Done);
        assert_eq!(v.top(), 12);
    }

    #[test]
    fn next_wraps_to_the_top() {
        let mut v = numbered(100, &[5]);
        v.top = 50;
        let out = v.search_for("x", OP_SEARCH).unwrap();
        assert_eq!(out, Outcome::Notice(Notice::Error(String::from("Not found"))));
        assert!(!v.is_search_shown());

        let out = v.search_next(OP_SEARCH_NEXT);
        assert_eq!(out, Outcome::Notice(Notice::Message(String::from("Search wrapped to top"))));
        assert_eq!(v.top(), 5);
        assert!(v.is_search_shown());
    }

    #[test]
    fn no_wrap_without_wrap_search() {
        let mut v = numbered(30, &[5]);
        v.config.wrap_search = false;
        v.search_for("x", OP_SEARCH).unwrap();
        assert_eq!(v.top(), 5);
        let out = v.search_next(OP_SEARCH_NEXT);
        assert_eq!(out, Outcome::Notice(Notice::Error(String::from("Not found"))));
        assert_eq!(v.top(), 5);
    }

    #[test]
    fn reverse_search_and_opposite() {
        let mut v = numbered(30, &[3, 8, 20]);
        v.top = 15;
        v.search_for("x", OP_SEARCH_REVERSE).unwrap();
        assert_eq!(v.top(), 8);
        v.search_next(OP_SEARCH_NEXT);
        assert_eq!(v.top(), 3);
        v.search_next(OP_SEARCH_OPPOSITE);
        assert_eq!(v.top(), 8);
        let out = v.search_next(OP_SEARCH_OPPOSITE);
        assert_eq!(out, Outcome::Done);
        assert_eq!(v.top(), 20);
        let out = v.search_next(OP_SEARCH_NEXT);
        assert_eq!(out, Outcome::Done);
        assert_eq!(v.top(), 8);
    }

    #[test]
    fn same_pattern_means_next() {
        let mut v = numbered(20, &[2, 9]);
        v.search_for("x", OP_SEARCH).unwrap();
        assert_eq!(v.top(), 2);
        v.search_for("x", OP_SEARCH).unwrap();
        assert_eq!(v.top(), 9);
    }

    #[test]
    fn search_context_keeps_lines_above() {
        let mut v = numbered(20, &[9]);
        v.config.search_context = 3;
        v.search_for("x", OP_SEARCH).unwrap();
        assert_eq!(v.top(), 6);
    }

    #[test]
    fn smart_case() {
        let mut v = numbered(10, &[4]);
        assert_eq!(v.search_for("X", OP_SEARCH).unwrap(), Outcome::Notice(Notice::Error(String::from("Not found"))));
        let mut v = numbered(10, &[4]);
        v.search_for("LINE 4", OP_SEARCH).unwrap();
        assert!(!v.is_search_shown());
        v.search_for("line 4", OP_SEARCH).unwrap();
        assert_eq!(v.top(), 4);
    }

    #[test]
    fn bad_pattern_clears_the_search() {
        let mut v = numbered(10, &[4]);
        v.search_for("x", OP_SEARCH).unwrap();
        assert!(v.search_for("(", OP_SEARCH).is_err());
        assert_eq!(v.search_pattern(), None);
        assert!(!v.is_search_shown());
        assert_eq!(v.search_next(OP_SEARCH_NEXT), Outcome::Done);
    }

    #[test]
    fn empty_pattern_does_nothing() {
        let mut v = numbered(10, &[4]);
        assert_eq!(v.search_for("", OP_SEARCH).unwrap(), Outcome::Done);
        assert_eq!(v.search_pattern(), None);
    }

    #[test]
    fn toggle_needs_a_search() {
        let mut v = numbered(10, &[4]);
        v.toggle_search();
        assert!(!v.is_search_shown());
        v.search_for("x", OP_SEARCH).unwrap();
        v.toggle_search();
        assert!(!v.is_search_shown());
        v.toggle_search();
        assert!(v.is_search_shown());
    }
}
