#![forbid(unsafe_code)]

//! Runtime options.
//!
//! Plain structs with `Default` values and `with_*` builders. The context
//! owns one [`UiConfig`]; changing it through
//! [`UiContext::update_config`](crate::UiContext::update_config) sends a
//! config notification naming the option.

use std::time::Duration;

use mtui_core::Keycode;
use mtui_core::event::key_ctrl;

/// How the key reader waits for input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Key that aborts the current operation.
    pub abort_key: Keycode,
    /// Overall wait before the reader reports a timeout.
    pub timeout: Duration,
    /// How often the keep-alive hook runs while waiting.
    pub keep_alive: Option<Duration>,
    /// Longest single terminal poll.
    pub poll_slice: Duration,
    /// Treat bytes with the high bit set as ESC followed by the byte.
    pub meta_key: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            abort_key: key_ctrl(b'G'),
            timeout: Duration::from_secs(600),
            keep_alive: None,
            poll_slice: Duration::from_secs(1),
            meta_key: false,
        }
    }
}

impl DispatchConfig {
    #[must_use]
    pub fn with_abort_key(mut self, key: Keycode) -> Self {
        self.abort_key = key;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_keep_alive(mut self, interval: Option<Duration>) -> Self {
        self.keep_alive = interval;
        self
    }

    #[must_use]
    pub fn with_poll_slice(mut self, slice: Duration) -> Self {
        self.poll_slice = slice;
        self
    }

    #[must_use]
    pub fn with_meta_key(mut self, meta_key: bool) -> Self {
        self.meta_key = meta_key;
        self
    }
}

/// Pager behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerConfig {
    /// Lines of overlap kept when paging.
    pub pager_context: u16,
    /// Don't leave the message when paging past its end.
    pub pager_stop: bool,
    /// Quoted lines kept above the first unquoted line by skip-quoted.
    pub pager_skip_quoted_context: u16,
    /// Lines shown above a search hit.
    pub search_context: u16,
    /// Searches continue from the other end of the file.
    pub wrap_search: bool,
    /// Wrap long lines at word boundaries.
    pub smart_wrap: bool,
    /// Mark wrapped lines with `+`.
    pub markers: bool,
    /// Fill the space past the end of the file with `~`.
    pub tilde: bool,
    /// Interpret ANSI colour sequences in email mode.
    pub allow_ansi: bool,
    /// Wrap width; negative values are a right margin, zero is the screen.
    pub wrap: i16,
    /// Quote levels still shown when quoted text is hidden.
    pub toggle_quoted_show_levels: u16,
    pub quote_regex: String,
    pub smileys: String,
    /// Colour only the matched part of a header line.
    pub header_color_partial: bool,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            pager_context: 0,
            pager_stop: false,
            pager_skip_quoted_context: 0,
            search_context: 0,
            wrap_search: true,
            smart_wrap: true,
            markers: true,
            tilde: false,
            allow_ansi: false,
            wrap: 0,
            toggle_quoted_show_levels: 0,
            quote_regex: String::from("^([ \t]*[|>:}#])+"),
            smileys: String::from(r"(>From )|(:[-^]?[\]\[)(><}{|/DP])"),
            header_color_partial: false,
        }
    }
}

impl PagerConfig {
    #[must_use]
    pub fn with_pager_context(mut self, lines: u16) -> Self {
        self.pager_context = lines;
        self
    }

    #[must_use]
    pub fn with_pager_stop(mut self, stop: bool) -> Self {
        self.pager_stop = stop;
        self
    }

    #[must_use]
    pub fn with_skip_quoted_context(mut self, lines: u16) -> Self {
        self.pager_skip_quoted_context = lines;
        self
    }

    #[must_use]
    pub fn with_search_context(mut self, lines: u16) -> Self {
        self.search_context = lines;
        self
    }

    #[must_use]
    pub fn with_wrap_search(mut self, wrap: bool) -> Self {
        self.wrap_search = wrap;
        self
    }

    #[must_use]
    pub fn with_smart_wrap(mut self, smart: bool) -> Self {
        self.smart_wrap = smart;
        self
    }

    #[must_use]
    pub fn with_markers(mut self, markers: bool) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub fn with_tilde(mut self, tilde: bool) -> Self {
        self.tilde = tilde;
        self
    }

    #[must_use]
    pub fn with_allow_ansi(mut self, allow: bool) -> Self {
        self.allow_ansi = allow;
        self
    }

    #[must_use]
    pub fn with_wrap(mut self, wrap: i16) -> Self {
        self.wrap = wrap;
        self
    }

    #[must_use]
    pub fn with_show_levels(mut self, levels: u16) -> Self {
        self.toggle_quoted_show_levels = levels;
        self
    }

    #[must_use]
    pub fn with_quote_regex(mut self, pattern: impl Into<String>) -> Self {
        self.quote_regex = pattern.into();
        self
    }

    #[must_use]
    pub fn with_smileys(mut self, pattern: impl Into<String>) -> Self {
        self.smileys = pattern.into();
        self
    }

    #[must_use]
    pub fn with_header_color_partial(mut self, partial: bool) -> Self {
        self.header_color_partial = partial;
        self
    }
}

/// Everything the runtime reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    pub dispatch: DispatchConfig,
    pub pager: PagerConfig,
    /// Put status bars above their panels.
    pub status_on_top: bool,
    /// Show the help bar on the top row.
    pub help: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchConfig::default(),
            pager: PagerConfig::default(),
            status_on_top: false,
            help: true,
        }
    }
}

impl UiConfig {
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    #[must_use]
    pub fn with_pager(mut self, pager: PagerConfig) -> Self {
        self.pager = pager;
        self
    }

    #[must_use]
    pub fn with_status_on_top(mut self, on_top: bool) -> Self {
        self.status_on_top = on_top;
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: bool) -> Self {
        self.help = help;
        self
    }
}
