#![forbid(unsafe_code)]

//! Runtime
//!
//! Ties the window tree, keymaps and terminal driver together into the
//! pieces a mail-client screen is built from.
//!
//! # Key Components
//!
//! - [`UiContext`] - owns the tree, keymaps, event queue, terminal and
//!   configuration; every entry point hangs off it
//! - [`Role`] / [`WindowClient`] - what a window does when recalculated,
//!   repainted or focused
//! - [`MessageWindow`] - the message line and its prompt
//! - [`HelpBar`] - key hints for the focused window
//! - the dialog stack ([`UiContext::push_dialog`], [`UiContext::pop_dialog`])
//! - the dispatcher ([`UiContext::getch`], [`UiContext::dokey`],
//!   [`UiContext::next_op`]) and [`UiContext::get_field`]
//!
//! # Example
//! ```
//! use mtui_core::MenuId;
//! use mtui_keymap::ops::OP_EXIT;
//! use mtui_layout::WindowType;
//! use mtui_render::HeadlessTerminal;
//! use mtui_runtime::{Role, UiConfig, UiContext};
//!
//! let mut term = HeadlessTerminal::new(40, 10);
//! term.push_keys("q");
//! let mut ctx = UiContext::new(term, UiConfig::default());
//!
//! let dlg = ctx.simple_dialog(MenuId::DIALOG, WindowType::Index, Role::Container, Vec::new());
//! ctx.push_dialog(dlg.dialog);
//! ctx.set_status(dlg.status, "-- Demo");
//!
//! let got = ctx.next_op(MenuId::DIALOG, 0);
//! assert_eq!(got.event.op, OP_EXIT);
//! assert_eq!(ctx.terminal().row_text(8), "-- Demo");
//! ```

pub mod config;
pub mod context;
pub mod dialog;
pub mod dispatch;
pub mod helpbar;
pub mod msgwin;
pub mod prompt;
pub mod render;
pub mod role;

pub use config::{DispatchConfig, PagerConfig, UiConfig};
pub use context::{RootLayout, UiContext};
pub use dialog::SimpleDialog;
pub use dispatch::{Dispatched, MACRO_LOOP_LIMIT};
pub use helpbar::{HelpBar, format_help};
pub use msgwin::{MessageWindow, PromptLine};
pub use role::{FnClient, RenderEnv, Role, StatusBar, WindowClient};
