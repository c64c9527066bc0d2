#![forbid(unsafe_code)]

//! Colour configuration: simple colours, regex rules and the quote palette.

use crate::color::{AttrColor, Attrs, Color, ColorId};
use crate::regex_color::RegexColorList;

/// Colours cycled through by quoting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedPalette {
    colors: Vec<AttrColor>,
}

impl Default for QuotedPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                AttrColor::fg(Color::BLUE),
                AttrColor::fg(Color::GREEN),
                AttrColor::fg(Color::YELLOW),
                AttrColor::fg(Color::CYAN),
            ],
        }
    }
}

impl QuotedPalette {
    pub fn new(colors: Vec<AttrColor>) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour for quote level `level`, cycling; `None` for an empty palette.
    pub fn get(&self, level: usize) -> Option<AttrColor> {
        if self.colors.is_empty() {
            None
        } else {
            Some(self.colors[level % self.colors.len()])
        }
    }

    /// Set the colour of `quotedN`, growing the palette as needed.
    pub fn set(&mut self, level: usize, color: AttrColor) {
        if self.colors.len() <= level {
            self.colors.resize(level + 1, AttrColor::NONE);
        }
        self.colors[level] = color;
    }
}

/// All colour settings the runtime and pager read.
#[derive(Debug, Clone)]
pub struct ColorConfig {
    simple: Vec<AttrColor>,
    /// `color header` rules.
    pub header: RegexColorList,
    /// `color body` rules.
    pub body: RegexColorList,
    /// `color attach_headers` rules.
    pub attach_headers: RegexColorList,
    pub quoted: QuotedPalette,
}

impl Default for ColorConfig {
    fn default() -> Self {
        let mut simple = vec![AttrColor::NONE; ColorId::COUNT];
        simple[ColorId::Indicator.index()] = AttrColor::attrs(Attrs::REVERSE);
        simple[ColorId::Search.index()] = AttrColor::attrs(Attrs::REVERSE);
        simple[ColorId::Status.index()] = AttrColor::attrs(Attrs::REVERSE);
        simple[ColorId::Bold.index()] = AttrColor::attrs(Attrs::BOLD);
        simple[ColorId::Underline.index()] = AttrColor::attrs(Attrs::UNDERLINE);
        simple[ColorId::Italic.index()] = AttrColor::attrs(Attrs::ITALIC);
        simple[ColorId::Error.index()] = AttrColor::fg(Color::RED);
        Self {
            simple,
            header: RegexColorList::new(),
            body: RegexColorList::new(),
            attach_headers: RegexColorList::new(),
            quoted: QuotedPalette::default(),
        }
    }
}

impl ColorConfig {
    pub fn get(&self, id: ColorId) -> AttrColor {
        self.simple[id.index()]
    }

    pub fn set(&mut self, id: ColorId, color: AttrColor) {
        self.simple[id.index()] = color;
    }

    /// `id` drawn on top of the normal colour.
    pub fn merged(&self, id: ColorId) -> AttrColor {
        self.get(ColorId::Normal).overlay(&self.get(id))
    }

    /// Restore every colour to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn with_quoted(mut self, palette: QuotedPalette) -> Self {
        self.quoted = palette;
        self
    }

    #[must_use]
    pub fn with_color(mut self, id: ColorId, color: AttrColor) -> Self {
        self.set(id, color);
        self
    }
}
