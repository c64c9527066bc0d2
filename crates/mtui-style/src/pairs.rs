#![forbid(unsafe_code)]

//! Reference-counted colour pair allocation.
//!
//! Curses-like terminals only support a fixed number of foreground and
//! background combinations. [`ColorPairs`] hands out pair numbers for
//! `(fg, bg)` combinations, sharing a pair between all users of the same
//! combination and recycling it when the last user frees it. Pair 0 is the
//! terminal default and is never allocated.

use crate::color::Color;

/// A colour pair number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairId(pub u16);

impl PairId {
    pub const DEFAULT: PairId = PairId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    fg: Color,
    bg: Color,
    refs: u32,
}

/// Colour pair allocator.
#[derive(Debug, Clone)]
pub struct ColorPairs {
    slots: Vec<Option<Slot>>,
    capacity: u16,
}

impl Default for ColorPairs {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ColorPairs {
    /// Allocator for a terminal with `capacity` pairs (including pair 0).
    pub fn new(capacity: u16) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    /// Number of pairs in use.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a pair for `(fg, bg)`, sharing an existing one if possible.
    ///
    /// Returns `None` when every pair is in use.
    pub fn alloc(&mut self, fg: Color, bg: Color) -> Option<PairId> {
        if fg.is_default() && bg.is_default() {
            return Some(PairId::DEFAULT);
        }
        if let Some((i, slot)) = self
            .slots
            .iter_mut()
            .enumerate()
            .find_map(|(i, s)| s.as_mut().filter(|s| s.fg == fg && s.bg == bg).map(|s| (i, s)))
        {
            slot.refs += 1;
            return Some(PairId(i as u16 + 1));
        }

        let slot = Some(Slot { fg, bg, refs: 1 });
        if let Some(i) = self.slots.iter().position(Option::is_none) {
            self.slots[i] = slot;
            return Some(PairId(i as u16 + 1));
        }
        if self.slots.len() + 1 >= usize::from(self.capacity) {
            tracing::warn!(capacity = self.capacity, "out of colour pairs");
            return None;
        }
        self.slots.push(slot);
        Some(PairId(self.slots.len() as u16))
    }

    /// Release one reference to `pair`.
    pub fn free(&mut self, pair: PairId) {
        if pair == PairId::DEFAULT {
            return;
        }
        let Some(entry) = self.slots.get_mut(usize::from(pair.0) - 1) else {
            return;
        };
        if let Some(slot) = entry {
            slot.refs -= 1;
            if slot.refs == 0 {
                *entry = None;
            }
        }
    }

    /// The colours of an allocated pair.
    pub fn get(&self, pair: PairId) -> Option<(Color, Color)> {
        if pair == PairId::DEFAULT {
            return Some((Color::Default, Color::Default));
        }
        self.slots
            .get(usize::from(pair.0) - 1)
            .and_then(|s| s.as_ref())
            .map(|s| (s.fg, s.bg))
    }

    /// Current reference count of `pair` (zero if unallocated).
    pub fn refs(&self, pair: PairId) -> u32 {
        if pair == PairId::DEFAULT {
            return 0;
        }
        self.slots
            .get(usize::from(pair.0) - 1)
            .and_then(|s| s.as_ref())
            .map_or(0, |s| s.refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_and_recycles() {
        let mut pairs = ColorPairs::new(8);
        let a = pairs.alloc(Color::RED, Color::Default).unwrap();
        let b = pairs.alloc(Color::RED, Color::Default).unwrap();
        assert_eq!(a, b);
        assert_eq!(pairs.refs(a), 2);
        let c = pairs.alloc(Color::BLUE, Color::BLACK).unwrap();
        assert_ne!(a, c);
        assert_eq!(pairs.len(), 2);

        pairs.free(a);
        pairs.free(a);
        assert_eq!(pairs.refs(a), 0);
        assert_eq!(pairs.get(a), None);

        let d = pairs.alloc(Color::GREEN, Color::Default).unwrap();
        assert_eq!(d, a);
    }

    #[test]
    fn default_pair_is_free() {
        let mut pairs = ColorPairs::new(2);
        assert_eq!(pairs.alloc(Color::Default, Color::Default), Some(PairId::DEFAULT));
        assert!(pairs.is_empty());
        pairs.free(PairId::DEFAULT);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut pairs = ColorPairs::new(3);
        assert!(pairs.alloc(Color::Palette(1), Color::Default).is_some());
        assert!(pairs.alloc(Color::Palette(2), Color::Default).is_some());
        assert!(pairs.alloc(Color::Palette(3), Color::Default).is_none());
    }
}
