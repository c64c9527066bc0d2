#![forbid(unsafe_code)]

//! Terminal capability probe.
//!
//! Detection is based purely on environment variables so that it is
//! deterministic and testable.
//!
//! | Variable | Used for |
//! |----------|----------|
//! | `TERM` | title escape convention, colour depth, dumb terminals |
//! | `COLORTERM` | true colour (`truecolor` / `24bit`) |
//! | `NO_COLOR` | disables colour entirely |
//! | `TMUX`, `STY` | multiplexer detection |
//!
//! # Title escapes
//!
//! | Mode | Title | Icon |
//! |------|-------|------|
//! | [`TitleMode::Osc`] | `ESC ] 0 ; text BEL` | `ESC ] 1 ; text BEL` |
//! | [`TitleMode::StatusLine`] | `ESC _ text ESC \` | same |
//! | [`TitleMode::None`] | nothing | nothing |

/// How (and whether) the terminal accepts a window title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleMode {
    /// xterm-style operating system command.
    Osc,
    /// screen-style "to status line" sequence.
    StatusLine,
    /// The terminal has no title.
    None,
}

/// Colour depth the terminal supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorDepth {
    Mono,
    Ansi16,
    Ansi256,
    TrueColor,
}

/// Detected terminal capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub term: String,
    pub title: TitleMode,
    pub colors: ColorDepth,
    pub in_multiplexer: bool,
}

const OSC_TERMS: &[&str] = &[
    "xterm", "rxvt", "tmux", "alacritty", "kitty", "foot", "wezterm", "gnome", "konsole",
    "putty", "st-",
];

impl TerminalCapabilities {
    /// Probe the process environment.
    pub fn detect() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Probe using a custom environment lookup.
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let term = get_env("TERM").unwrap_or_default();
        let colorterm = get_env("COLORTERM").unwrap_or_default().to_ascii_lowercase();
        let no_color = get_env("NO_COLOR").is_some_and(|v| !v.is_empty());
        let in_multiplexer = get_env("TMUX").is_some() || get_env("STY").is_some();

        let title = title_mode(&term);
        let is_dumb = term.is_empty() || term == "dumb";

        let colors = if no_color || is_dumb {
            ColorDepth::Mono
        } else if colorterm.contains("truecolor") || colorterm.contains("24bit") {
            ColorDepth::TrueColor
        } else if term.contains("256color") || term.contains("kitty") || term.contains("alacritty")
        {
            ColorDepth::Ansi256
        } else {
            ColorDepth::Ansi16
        };

        Self {
            term,
            title,
            colors,
            in_multiplexer,
        }
    }

    /// Escape sequence that sets the window title, if supported.
    pub fn title_sequence(&self, text: &str) -> Option<String> {
        match self.title {
            TitleMode::Osc => Some(format!("\x1b]0;{}\x07", sanitise(text))),
            TitleMode::StatusLine => Some(format!("\x1b_{}\x1b\\", sanitise(text))),
            TitleMode::None => None,
        }
    }

    /// Escape sequence that sets the icon name, if supported.
    pub fn icon_sequence(&self, text: &str) -> Option<String> {
        match self.title {
            TitleMode::Osc => Some(format!("\x1b]1;{}\x07", sanitise(text))),
            TitleMode::StatusLine => Some(format!("\x1b_{}\x1b\\", sanitise(text))),
            TitleMode::None => None,
        }
    }
}

fn title_mode(term: &str) -> TitleMode {
    if term.starts_with("screen") {
        TitleMode::StatusLine
    } else if OSC_TERMS.iter().any(|t| term.starts_with(t)) {
        TitleMode::Osc
    } else {
        TitleMode::None
    }
}

/// Remove control characters that would terminate the escape early.
fn sanitise(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}
