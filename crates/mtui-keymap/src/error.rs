#![forbid(unsafe_code)]

use std::fmt;

/// A key string that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    /// The string decodes to no keys at all.
    Empty,
    /// More than [`MAX_KEY_SEQUENCE`](crate::keys::MAX_KEY_SEQUENCE) keys.
    TooLong(usize),
    /// `<name>` is not a known key name.
    UnknownName(String),
    /// An octal code beyond the valid key range.
    OutOfRange(String),
    /// The string ends in a lone backslash.
    TrailingBackslash,
}

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyParseError::Empty => write!(f, "null key sequence"),
            KeyParseError::TooLong(n) => write!(f, "key sequence too long ({n} keys)"),
            KeyParseError::UnknownName(name) => write!(f, "unknown key name '<{name}>'"),
            KeyParseError::OutOfRange(code) => write!(f, "key code {code} out of range"),
            KeyParseError::TrailingBackslash => write!(f, "key sequence ends in '\\'"),
        }
    }
}

impl std::error::Error for KeyParseError {}

/// Failure of a `bind`, `macro`, `unbind` or `exec` request.
///
/// The keymaps are left unchanged when any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    UnknownMenu(String),
    /// `bind` was given a key string that decodes to nothing.
    NullKey,
    /// `macro` was given a key string that decodes to nothing.
    EmptyMacroKey,
    Key(KeyParseError),
    UnknownFunction { function: String, menu: String },
    /// `exec` named a function no menu knows.
    NoSuchFunction(String),
    /// A line of a keymap listing could not be understood.
    Syntax { line: usize, message: String },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::UnknownMenu(name) => write!(f, "{name}: no such menu"),
            BindError::NullKey => write!(f, "null key sequence"),
            BindError::EmptyMacroKey => write!(f, "macro: empty key sequence"),
            BindError::Key(err) => err.fmt(f),
            BindError::UnknownFunction { function, menu } => {
                write!(f, "Function '{function}' not available for menu '{menu}'")
            }
            BindError::NoSuchFunction(name) => write!(f, "{name}: no such function"),
            BindError::Syntax { line, message } => write!(f, "line {line}: {message}"),
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindError::Key(err) => Some(err),
            _ => None,
        }
    }
}

impl From<KeyParseError> for BindError {
    fn from(err: KeyParseError) -> Self {
        BindError::Key(err)
    }
}
