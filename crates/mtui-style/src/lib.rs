#![forbid(unsafe_code)]

//! Style: colours, attributes, colour pair allocation and colour rules.

pub mod color;
pub mod config;
pub mod pairs;
pub mod regex_color;

pub use color::{AttrColor, Attrs, Color, ColorId, Rgb};
pub use config::{ColorConfig, QuotedPalette};
pub use pairs::{ColorPairs, PairId};
pub use regex_color::{RegexColor, RegexColorList};
