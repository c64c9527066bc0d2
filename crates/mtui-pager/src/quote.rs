#![forbid(unsafe_code)]

//! The quote tree: every distinct quoting prefix seen in a session.
//!
//! Prefixes form a trie by string prefix: `>` is the parent of `>>` and of
//! `> |`. Each node carries a *level*, its index into the quoted colour
//! palette. Levels are handed out in the order prefixes are first seen,
//! except that a newly found shorter prefix takes over the level of the
//! node it adopts and every level at or above it moves up by one.
//!
//! Nodes live in an arena and link to each other by [`QuoteId`], so
//! subtrees can be moved around while lines keep pointing at their node.

use mtui_style::{AttrColor, QuotedPalette};

/// Index of a node in a [`QuoteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuoteId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteNode {
    pub prefix: Vec<u8>,
    pub level: usize,
    pub up: Option<QuoteId>,
    pub down: Option<QuoteId>,
    pub next: Option<QuoteId>,
    pub prev: Option<QuoteId>,
}

/// Result of [`QuoteTree::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub id: QuoteId,
    /// Existing nodes changed level; lines already drawn may need new colours.
    pub reshaped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteTree {
    nodes: Vec<QuoteNode>,
    first: Option<QuoteId>,
    levels: usize,
}

impl QuoteTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of levels handed out so far.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// First top-level node.
    pub fn first(&self) -> Option<QuoteId> {
        self.first
    }

    pub fn node(&self, id: QuoteId) -> Option<&QuoteNode> {
        self.nodes.get(id.0)
    }

    pub fn level(&self, id: QuoteId) -> usize {
        self.nodes[id.0].level
    }

    pub fn prefix(&self, id: QuoteId) -> &[u8] {
        &self.nodes[id.0].prefix
    }

    pub fn up(&self, id: QuoteId) -> Option<QuoteId> {
        self.nodes[id.0].up
    }

    /// Children of `id` in sibling order.
    pub fn children(&self, id: QuoteId) -> Vec<QuoteId> {
        self.siblings_from(self.nodes[id.0].down)
    }

    /// Top-level nodes in order.
    pub fn roots(&self) -> Vec<QuoteId> {
        self.siblings_from(self.first)
    }

    /// Palette colour of `id`.
    pub fn color(&self, id: QuoteId, palette: &QuotedPalette) -> Option<AttrColor> {
        palette.get(self.level(id))
    }

    /// Find the node for `prefix`, creating it (and reshaping the tree) if
    /// this prefix has not been seen before.
    pub fn classify(&mut self, prefix: &[u8]) -> Classified {
        let mut reshaped = false;
        let mut inserted: Option<QuoteId> = None;
        let mut shifted: Option<usize> = None;
        let mut parent: Option<QuoteId> = None;
        let mut cur = self.first;

        while let Some(q) = cur {
            let qlen = self.nodes[q.0].prefix.len();
            if prefix.len() <= qlen {
                if !self.nodes[q.0].prefix.starts_with(prefix) {
                    cur = self.nodes[q.0].next;
                    continue;
                }
                if prefix.len() == qlen {
                    return Classified { id: q, reshaped };
                }
                // a shorter prefix: adopt q
                reshaped = true;
                shifted = Some(self.nodes[q.0].level);
                match inserted {
                    None => {
                        let t = self.alloc(prefix, 0);
                        self.replace(q, t);
                        self.nodes[t.0].down = Some(q);
                        self.nodes[q.0].up = Some(t);
                        inserted = Some(t);
                        cur = self.nodes[t.0].next;
                    }
                    Some(t) => {
                        let save = self.nodes[q.0].next;
                        self.unlink(q);
                        self.append_child(t, q);
                        cur = save;
                    }
                }
            } else if inserted.is_none() && prefix.starts_with(&self.nodes[q.0].prefix) {
                parent = Some(q);
                cur = self.nodes[q.0].down;
            } else {
                cur = self.nodes[q.0].next;
            }
        }

        let id = match inserted {
            Some(t) => {
                if let Some(level) = shifted {
                    self.shift_levels(t, level);
                }
                t
            }
            None => {
                let level = self.levels;
                self.levels += 1;
                let t = self.alloc(prefix, level);
                match parent {
                    Some(p) => self.push_first_child(p, t),
                    None => self.push_top_level(t),
                }
                t
            }
        };
        tracing::trace!(
            prefix = %String::from_utf8_lossy(prefix),
            level = self.nodes[id.0].level,
            reshaped,
            "quote prefix classified"
        );
        Classified { id, reshaped }
    }

    fn siblings_from(&self, start: Option<QuoteId>) -> Vec<QuoteId> {
        let mut out = Vec::new();
        let mut cur = start;
        while let Some(id) = cur {
            out.push(id);
            cur = self.nodes[id.0].next;
        }
        out
    }

    fn alloc(&mut self, prefix: &[u8], level: usize) -> QuoteId {
        self.nodes.push(QuoteNode {
            prefix: prefix.to_vec(),
            level,
            up: None,
            down: None,
            next: None,
            prev: None,
        });
        QuoteId(self.nodes.len() - 1)
    }

    /// Put `t` where `q` is; `q` is left without siblings.
    fn replace(&mut self, q: QuoteId, t: QuoteId) {
        let QuoteNode { up, next, prev, .. } = self.nodes[q.0].clone();
        self.nodes[t.0].up = up;
        self.nodes[t.0].next = next;
        self.nodes[t.0].prev = prev;
        if let Some(n) = next {
            self.nodes[n.0].prev = Some(t);
        }
        if let Some(p) = prev {
            self.nodes[p.0].next = Some(t);
        }
        if let Some(u) = up {
            if self.nodes[u.0].down == Some(q) {
                self.nodes[u.0].down = Some(t);
            }
        }
        if self.first == Some(q) {
            self.first = Some(t);
        }
        self.nodes[q.0].next = None;
        self.nodes[q.0].prev = None;
    }

    fn unlink(&mut self, q: QuoteId) {
        let QuoteNode { up, next, prev, .. } = self.nodes[q.0].clone();
        if let Some(n) = next {
            self.nodes[n.0].prev = prev;
        }
        if let Some(p) = prev {
            self.nodes[p.0].next = next;
        }
        if let Some(u) = up {
            if self.nodes[u.0].down == Some(q) {
                self.nodes[u.0].down = next;
            }
        }
        if self.first == Some(q) {
            self.first = next;
        }
        let node = &mut self.nodes[q.0];
        node.next = None;
        node.prev = None;
        node.up = None;
    }

    fn append_child(&mut self, parent: QuoteId, child: QuoteId) {
        match self.children(parent).last() {
            Some(&last) => {
                self.nodes[last.0].next = Some(child);
                self.nodes[child.0].prev = Some(last);
            }
            None => self.nodes[parent.0].down = Some(child),
        }
        self.nodes[child.0].up = Some(parent);
    }

    fn push_first_child(&mut self, parent: QuoteId, child: QuoteId) {
        if let Some(old) = self.nodes[parent.0].down {
            self.nodes[child.0].next = Some(old);
            self.nodes[old.0].prev = Some(child);
        }
        self.nodes[parent.0].down = Some(child);
        self.nodes[child.0].up = Some(parent);
    }

    /// New top-level nodes go second, after the first one.
    fn push_top_level(&mut self, t: QuoteId) {
        match self.first {
            Some(first) => {
                if let Some(n) = self.nodes[first.0].next {
                    self.nodes[t.0].next = Some(n);
                    self.nodes[n.0].prev = Some(t);
                }
                self.nodes[first.0].next = Some(t);
                self.nodes[t.0].prev = Some(first);
            }
            None => self.first = Some(t),
        }
    }

    /// Give `new` level `level`, moving every other node at or above it up.
    fn shift_levels(&mut self, new: QuoteId, level: usize) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if i != new.0 && node.level >= level {
                node.level += 1;
            }
        }
        self.nodes[new.0].level = level;
        self.levels += 1;
    }
}
