#![forbid(unsafe_code)]

//! Regular expression compilation with smart case.

use regex::bytes::{Regex, RegexBuilder};

use crate::width::is_lower;

/// Compile `pattern`, matching case-insensitively when it has no upper-case
/// letters.
pub fn smart_case(pattern: &str) -> Result<Regex, regex::Error> {
    compile(pattern, is_lower(pattern))
}

/// Compile `pattern` for matching raw (possibly non-UTF-8) text.
pub fn compile(pattern: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .unicode(true)
        .build()
}
