#![forbid(unsafe_code)]

//! A single menu's bindings.
//!
//! Bindings are kept sorted by key sequence, and no sequence is a prefix of
//! another. Each entry caches `eq`, the length of the prefix it shares with
//! the entry after it. [`Matcher`] uses it to step from one entry to the
//! next without re-comparing the keys already typed.

use mtui_core::{Keycode, Op};

/// What a key sequence does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Op(Op),
    /// Keys (and `<function>` tokens) to feed back into the input.
    Macro(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    keys: Vec<Keycode>,
    action: Action,
    description: Option<String>,
    eq: usize,
}

impl KeyBinding {
    #[must_use]
    pub fn new(keys: Vec<Keycode>, action: Action) -> Self {
        Self {
            keys,
            action,
            description: None,
            eq: 0,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn keys(&self) -> &[Keycode] {
        &self.keys
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The bound operation, or `None` for a macro.
    pub fn op(&self) -> Option<Op> {
        match self.action {
            Action::Op(op) => Some(op),
            Action::Macro(_) => None,
        }
    }

    pub fn macro_text(&self) -> Option<&str> {
        match &self.action {
            Action::Macro(text) => Some(text),
            Action::Op(_) => None,
        }
    }

    pub fn is_macro(&self) -> bool {
        matches!(self.action, Action::Macro(_))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Number of leading keys shared with the next entry.
    pub fn eq_len(&self) -> usize {
        self.eq
    }
}

/// Do the two sequences agree for as long as both last?
fn prefix_conflict(a: &[Keycode], b: &[Keycode]) -> bool {
    a.iter().zip(b).all(|(x, y)| x == y)
}

fn common_prefix(a: &[Keycode], b: &[Keycode]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    entries: Vec<KeyBinding>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[KeyBinding] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The binding for exactly `keys`.
    pub fn get(&self, keys: &[Keycode]) -> Option<&KeyBinding> {
        self.entries
            .binary_search_by(|e| e.keys.as_slice().cmp(keys))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// The first (lowest) key sequence bound to `op`.
    pub fn find_op(&self, op: Op) -> Option<&KeyBinding> {
        self.entries.iter().find(|e| e.op() == Some(op))
    }

    /// Insert `binding`, displacing every entry whose keys agree with it up
    /// to the shorter length.
    ///
    /// Returns the displaced sequences whose length differed from the new
    /// one; those were reachable before and no longer are. Binding
    /// [`Op::NULL`] changes nothing.
    pub fn insert(&mut self, binding: KeyBinding) -> Vec<Vec<Keycode>> {
        if binding.action == Action::Op(Op::NULL) || binding.keys.is_empty() {
            return Vec::new();
        }
        let mut shadowed = Vec::new();
        self.entries.retain(|e| {
            if !prefix_conflict(&e.keys, &binding.keys) {
                return true;
            }
            if e.keys.len() != binding.keys.len() {
                shadowed.push(e.keys.clone());
            }
            false
        });
        let at = self
            .entries
            .partition_point(|e| e.keys.as_slice() < binding.keys.as_slice());
        self.entries.insert(at, binding);
        self.fix_eq();
        shadowed
    }

    /// Remove every entry accepted by `filter` whose keys agree with `keys`
    /// up to the shorter length.
    pub fn remove(
        &mut self,
        keys: &[Keycode],
        filter: impl Fn(&KeyBinding) -> bool,
    ) -> Vec<KeyBinding> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for e in self.entries.drain(..) {
            if !keys.is_empty() && prefix_conflict(&e.keys, keys) && filter(&e) {
                removed.push(e);
            } else {
                kept.push(e);
            }
        }
        self.entries = kept;
        self.fix_eq();
        removed
    }

    /// Remove every macro (`macros == true`) or every plain binding.
    pub fn clear(&mut self, macros: bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.is_macro() != macros);
        self.fix_eq();
        before - self.entries.len()
    }

    fn fix_eq(&mut self) {
        let n = self.entries.len();
        for i in 0..n {
            let eq = if i + 1 < n {
                common_prefix(&self.entries[i].keys, &self.entries[i + 1].keys)
            } else {
                0
            };
            self.entries[i].eq = eq;
        }
    }
}

/// Result of feeding one key to a [`Matcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStep<'a> {
    /// The keys so far are a proper prefix of some binding.
    Pending,
    Matched(&'a KeyBinding),
    /// No binding starts with the keys so far plus this one.
    NoMatch,
}

/// Incremental walk of a [`Keymap`] one key at a time.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    index: usize,
    consumed: Vec<Keycode>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.consumed.clear();
    }

    /// Keys accepted since the last reset.
    pub fn consumed(&self) -> &[Keycode] {
        &self.consumed
    }

    pub fn feed<'a>(&mut self, map: &'a Keymap, ch: Keycode) -> MatchStep<'a> {
        let entries = map.entries();
        let pos = self.consumed.len();
        loop {
            let Some(entry) = entries.get(self.index) else {
                return MatchStep::NoMatch;
            };
            let Some(&want) = entry.keys.get(pos) else {
                return MatchStep::NoMatch;
            };
            if ch <= want {
                break;
            }
            if pos > entry.eq || self.index + 1 >= entries.len() {
                return MatchStep::NoMatch;
            }
            self.index += 1;
        }

        let entry = &entries[self.index];
        if entry.keys[pos] != ch {
            return MatchStep::NoMatch;
        }
        self.consumed.push(ch);
        if self.consumed.len() == entry.keys.len() {
            MatchStep::Matched(entry)
        } else {
            MatchStep::Pending
        }
    }
}
