#![forbid(unsafe_code)]

//! What each window does.
//!
//! A window's payload is a [`Role`]: the runtime's own windows (message
//! line, help bar, status bar) carry their state directly, plain
//! containers carry nothing, and everything an embedder builds is a
//! [`Role::Client`] holding a [`WindowClient`].

use std::any::Any;
use std::fmt;

use mtui_core::geometry::{StateFlags, WindowActions};
use mtui_core::WindowState;
use mtui_keymap::Keymaps;
use mtui_layout::Canvas;
use mtui_style::{ColorConfig, ColorId};

use crate::config::UiConfig;
use crate::helpbar::HelpBar;
use crate::msgwin::MessageWindow;

/// Read-only state handed to window callbacks.
#[derive(Clone, Copy)]
pub struct RenderEnv<'a> {
    pub config: &'a UiConfig,
    pub colors: &'a ColorConfig,
    pub keymaps: &'a Keymaps,
}

/// Behaviour of an embedder-defined window.
pub trait WindowClient {
    /// Bring cached state up to date; returns the actions that follow.
    fn recalc(&mut self, _state: &WindowState, _env: &RenderEnv<'_>) -> WindowActions {
        WindowActions::REPAINT
    }

    /// Draw the window.
    fn repaint(&mut self, canvas: &mut Canvas<'_>, env: &RenderEnv<'_>);

    /// Place the cursor when the window has focus. Returns `false` to hide it.
    fn recursor(&mut self, _canvas: &mut Canvas<'_>) -> bool {
        false
    }

    /// The window's geometry or visibility changed.
    fn state_changed(&mut self, flags: StateFlags) -> WindowActions {
        if flags.is_empty() {
            WindowActions::empty()
        } else {
            WindowActions::RECALC | WindowActions::REPAINT
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

type RepaintFn = Box<dyn FnMut(&mut Canvas<'_>, &RenderEnv<'_>)>;
type RecursorFn = Box<dyn FnMut(&mut Canvas<'_>) -> bool>;

/// A client built from closures.
pub struct FnClient {
    repaint: RepaintFn,
    recursor: Option<RecursorFn>,
}

impl FnClient {
    pub fn new(repaint: impl FnMut(&mut Canvas<'_>, &RenderEnv<'_>) + 'static) -> Self {
        Self {
            repaint: Box::new(repaint),
            recursor: None,
        }
    }

    #[must_use]
    pub fn with_recursor(mut self, recursor: impl FnMut(&mut Canvas<'_>) -> bool + 'static) -> Self {
        self.recursor = Some(Box::new(recursor));
        self
    }
}

impl WindowClient for FnClient {
    fn repaint(&mut self, canvas: &mut Canvas<'_>, env: &RenderEnv<'_>) {
        (self.repaint)(canvas, env);
    }

    fn recursor(&mut self, canvas: &mut Canvas<'_>) -> bool {
        self.recursor.as_mut().is_some_and(|f| f(canvas))
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A one-line bar showing a fixed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBar {
    pub text: String,
}

impl StatusBar {
    pub fn repaint(&self, canvas: &mut Canvas<'_>, env: &RenderEnv<'_>) {
        canvas.move_to(0, 0);
        canvas.set_color(env.colors.merged(ColorId::Status));
        canvas.add_str(&self.text);
        canvas.clear_to_eol();
        canvas.set_color(env.colors.get(ColorId::Normal));
    }
}

/// Window payload.
#[derive(Default)]
pub enum Role {
    /// Draws nothing itself.
    #[default]
    Container,
    Message(MessageWindow),
    HelpBar(HelpBar),
    StatusBar(StatusBar),
    Client(Box<dyn WindowClient>),
}

impl Role {
    pub fn client(client: impl WindowClient + 'static) -> Self {
        Role::Client(Box::new(client))
    }

    pub fn status(text: impl Into<String>) -> Self {
        Role::StatusBar(StatusBar { text: text.into() })
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Role::Container => "container",
            Role::Message(_) => "message",
            Role::HelpBar(_) => "help-bar",
            Role::StatusBar(_) => "status-bar",
            Role::Client(_) => "client",
        }
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Message(m) => f.debug_tuple("Message").field(m).finish(),
            Role::HelpBar(h) => f.debug_tuple("HelpBar").field(h).finish(),
            Role::StatusBar(s) => f.debug_tuple("StatusBar").field(s).finish(),
            other => f.write_str(other.name()),
        }
    }
}
