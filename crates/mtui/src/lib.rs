#![forbid(unsafe_code)]

//! mtui public facade crate.
//!
//! Re-exports the types an embedding mail client needs day to day, plus a
//! prelude. The member crates stay reachable under short module names
//! ([`core`], [`keymap`], [`pager`], ...) for anything not lifted here.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use mtui_core::logging::{LogConfig, LogError, init_logging};
pub use mtui_core::notify::PagerEventKind;
pub use mtui_core::terminal_capabilities::TerminalCapabilities;
#[cfg(not(target_arch = "wasm32"))]
pub use mtui_core::terminal_session::{SessionOptions, TerminalSession};
pub use mtui_core::{
    Event, EventTypes, Extent, KeyEvent, Keycode, MenuId, ObserverError, ObserverId, Op,
    Orientation, SizePolicy, WindowId,
};

// --- Render re-exports -----------------------------------------------------

#[cfg(not(target_arch = "wasm32"))]
pub use mtui_render::CrosstermTerminal;
pub use mtui_render::{HeadlessTerminal, Terminal};

// --- Style / layout / keymap re-exports ------------------------------------

pub use mtui_keymap::{BindError, KeyParseError, Keymaps};
pub use mtui_layout::{Canvas, HelpEntry, WindowType};
pub use mtui_style::{AttrColor, Attrs, Color, ColorConfig, ColorId};

// --- Runtime re-exports ----------------------------------------------------

pub use mtui_runtime::{
    DispatchConfig, Dispatched, PagerConfig, Role, SimpleDialog, UiConfig, UiContext,
    WindowClient,
};

// --- Pager re-exports ------------------------------------------------------

#[cfg(feature = "pager")]
pub use mtui_pager::{
    PagerError, PagerFlags, PagerMode, PagerRequest, PagerSession, PagerView, SearchError,
    pager_open,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for mtui embedders.
#[derive(Debug)]
pub enum Error {
    /// I/O failure during terminal operations.
    Io(std::io::Error),
    Log(LogError),
    /// A `bind`, `macro`, `unbind` or `exec` command was rejected.
    Bind(BindError),
    #[cfg(feature = "pager")]
    Pager(PagerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Log(err) => write!(f, "{err}"),
            Self::Bind(err) => write!(f, "{err}"),
            #[cfg(feature = "pager")]
            Self::Pager(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Log(err) => Some(err),
            Self::Bind(err) => Some(err),
            #[cfg(feature = "pager")]
            Self::Pager(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<LogError> for Error {
    fn from(err: LogError) -> Self {
        Self::Log(err)
    }
}

impl From<BindError> for Error {
    fn from(err: BindError) -> Self {
        Self::Bind(err)
    }
}

#[cfg(feature = "pager")]
impl From<PagerError> for Error {
    fn from(err: PagerError) -> Self {
        Self::Pager(err)
    }
}

/// Standard result type for mtui APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ColorId, Error, Event, EventTypes, HeadlessTerminal, KeyEvent, Keycode, MenuId, Op,
        Result, Role, Terminal, UiConfig, UiContext, WindowClient, WindowType,
    };
    #[cfg(feature = "pager")]
    pub use crate::{PagerMode, PagerRequest, pager_open};

    pub use crate::{core, keymap, layout, render, runtime, style, text};
    #[cfg(feature = "pager")]
    pub use crate::pager;
}

pub use mtui_core as core;
pub use mtui_keymap as keymap;
pub use mtui_layout as layout;
#[cfg(feature = "pager")]
pub use mtui_pager as pager;
pub use mtui_render as render;
pub use mtui_runtime as runtime;
pub use mtui_style as style;
pub use mtui_text as text;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::prelude::*;

    #[test]
    fn bind_errors_convert() {
        let mut ctx = UiContext::new(HeadlessTerminal::new(40, 10), UiConfig::default());
        let err: Error = ctx
            .keymaps_mut()
            .bind("nosuchmenu", "x", "exit")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Bind(_)));
        assert!(err.source().is_some());
    }

    #[cfg(feature = "pager")]
    #[test]
    fn pager_errors_convert() {
        let mut ctx = UiContext::new(HeadlessTerminal::new(40, 10), UiConfig::default());
        let dir = std::env::temp_dir().join("mtui-facade-missing-file");
        let err: Error = pager_open(&mut ctx, PagerRequest::new(dir)).unwrap_err().into();
        assert!(matches!(err, Error::Pager(_)));
        assert!(!err.to_string().is_empty());
    }
}
