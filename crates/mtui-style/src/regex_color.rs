#![forbid(unsafe_code)]

//! Colour rules keyed by a regular expression.
//!
//! Rules match raw bytes: pager text is not guaranteed to be valid UTF-8.

use regex::bytes::Regex;

use crate::color::AttrColor;

/// One `color body/header` style rule.
#[derive(Debug, Clone)]
pub struct RegexColor {
    /// The pattern as the user wrote it; used to replace or remove the rule.
    pub pattern: String,
    pub regex: Regex,
    pub attr: AttrColor,
    /// Capture group to colour (0 = whole match).
    pub group: usize,
}

/// An ordered list of rules. Earlier rules win ties.
#[derive(Debug, Clone, Default)]
pub struct RegexColorList {
    rules: Vec<RegexColor>,
}

impl RegexColorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, or recolour an existing rule with the same pattern.
    pub fn add(&mut self, pattern: &str, regex: Regex, attr: AttrColor, group: usize) {
        if let Some(rule) = self.rules.iter_mut().find(|r| r.pattern == pattern) {
            rule.attr = attr;
            rule.group = group;
            return;
        }
        self.rules.push(RegexColor {
            pattern: pattern.to_string(),
            regex,
            attr,
            group,
        });
    }

    /// Remove the rule for `pattern`, or all rules when `pattern` is `*`.
    pub fn remove(&mut self, pattern: &str) -> bool {
        let before = self.rules.len();
        if pattern == "*" {
            self.rules.clear();
        } else {
            self.rules.retain(|r| r.pattern != pattern);
        }
        self.rules.len() != before
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegexColor> {
        self.rules.iter()
    }

    /// First rule whose regex matches anywhere in `text`.
    pub fn first_match(&self, text: &[u8]) -> Option<&RegexColor> {
        self.rules.iter().find(|r| r.regex.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn re(p: &str) -> Regex {
        Regex::new(p).unwrap()
    }

    #[test]
    fn add_replaces_by_pattern() {
        let mut list = RegexColorList::new();
        list.add("^From:", re("^From:"), AttrColor::fg(Color::RED), 0);
        list.add("^To:", re("^To:"), AttrColor::fg(Color::BLUE), 0);
        list.add("^From:", re("^From:"), AttrColor::fg(Color::GREEN), 0);
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.first_match(b"From: me").map(|r| r.attr.fg),
            Some(Color::GREEN)
        );
    }

    #[test]
    fn remove_one_or_all() {
        let mut list = RegexColorList::new();
        list.add("a", re("a"), AttrColor::NONE, 0);
        list.add("b", re("b"), AttrColor::NONE, 0);
        assert!(list.remove("a"));
        assert!(!list.remove("a"));
        assert!(list.remove("*"));
        assert!(list.is_empty());
    }
}
