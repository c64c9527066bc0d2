#![forbid(unsafe_code)]

//! Text handling for the mtui runtime.
//!
//! - [`width`] - byte-wise character decoding and wcwidth-style measurement
//! - [`ansi`] - SGR colour sequence interpretation
//! - [`strip`] - removal of SGR, overstrike and private markers
//! - [`regex`] - smart-case regular expressions over raw bytes
//!
//! # Example
//! ```
//! use mtui_text::ansi::{AnsiState, parse_sgr};
//! use mtui_text::strip::strip_formatting;
//! use mtui_text::width::str_width;
//!
//! let mut state = AnsiState::default();
//! assert_eq!(parse_sgr(b"\x1b[1;31m", Some(&mut state)), 7);
//! assert!(state.is_set());
//!
//! assert_eq!(strip_formatting(b"\x1b[1mbold\x1b[0m", false), b"bold");
//! assert_eq!(str_width("漢字"), 4);
//! ```

pub mod ansi;
pub mod regex;
pub mod strip;
pub mod width;

pub use ansi::AnsiState;
pub use width::{Decoded, REPLACEMENT_CHAR, char_width, decode, str_width};
