#![forbid(unsafe_code)]

//! Colours, attributes and the simple colour ids.

use bitflags::bitflags;

/// RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A foreground or background colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default colour.
    #[default]
    Default,
    /// Palette index (0-7 ANSI, 8-15 bright, up to 255).
    Palette(u8),
    /// 24-bit colour.
    Rgb(Rgb),
}

impl Color {
    pub const BLACK: Color = Color::Palette(0);
    pub const RED: Color = Color::Palette(1);
    pub const GREEN: Color = Color::Palette(2);
    pub const YELLOW: Color = Color::Palette(3);
    pub const BLUE: Color = Color::Palette(4);
    pub const MAGENTA: Color = Color::Palette(5);
    pub const CYAN: Color = Color::Palette(6);
    pub const WHITE: Color = Color::Palette(7);

    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Color::Default)
    }
}

bitflags! {
    /// Text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u8 {
        const BOLD      = 1 << 0;
        const UNDERLINE = 1 << 1;
        const BLINK     = 1 << 2;
        const REVERSE   = 1 << 3;
        const ITALIC    = 1 << 4;
        const STANDOUT  = 1 << 5;
    }
}

/// A colour pair plus attributes: the unit everything on screen is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttrColor {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl AttrColor {
    pub const NONE: AttrColor = AttrColor {
        fg: Color::Default,
        bg: Color::Default,
        attrs: Attrs::empty(),
    };

    #[must_use]
    pub const fn new(fg: Color, bg: Color, attrs: Attrs) -> Self {
        Self { fg, bg, attrs }
    }

    #[must_use]
    pub const fn fg(fg: Color) -> Self {
        Self::new(fg, Color::Default, Attrs::empty())
    }

    #[must_use]
    pub const fn attrs(attrs: Attrs) -> Self {
        Self::new(Color::Default, Color::Default, attrs)
    }

    /// Does this colour change anything compared to the default?
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.fg.is_default() || !self.bg.is_default() || !self.attrs.is_empty()
    }

    /// Draw `over` on top of `self`: set colours win, attributes combine.
    #[must_use]
    pub fn overlay(&self, over: &AttrColor) -> AttrColor {
        AttrColor {
            fg: if over.fg.is_default() { self.fg } else { over.fg },
            bg: if over.bg.is_default() { self.bg } else { over.bg },
            attrs: self.attrs | over.attrs,
        }
    }
}

macro_rules! color_ids {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Simple (non-regex) colour slots.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ColorId {
            $($variant),+
        }

        impl ColorId {
            /// Every colour id, in declaration order.
            pub const ALL: &'static [ColorId] = &[$(ColorId::$variant),+];
            pub const COUNT: usize = Self::ALL.len();

            /// Name used in colour commands.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(ColorId::$variant => $name),+
                }
            }

            #[must_use]
            pub fn from_name(name: &str) -> Option<ColorId> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|id| id.name().eq_ignore_ascii_case(name))
            }
        }
    };
}

color_ids! {
    Normal => "normal",
    Attachment => "attachment",
    AttachHeaders => "attach_headers",
    Body => "body",
    Bold => "bold",
    Error => "error",
    HdrDefault => "hdrdefault",
    Header => "header",
    Indicator => "indicator",
    Italic => "italic",
    Markers => "markers",
    Message => "message",
    Prompt => "prompt",
    Quoted => "quoted",
    Search => "search",
    Signature => "signature",
    Status => "status",
    Tilde => "tilde",
    Underline => "underline",
    Warning => "warning",
}

impl ColorId {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}
