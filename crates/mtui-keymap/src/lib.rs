#![forbid(unsafe_code)]

//! Key bindings: the key-string grammar, per-menu keymaps, function tables,
//! a textual dump format and the queue that macros expand into.
//!
//! # Example
//! ```
//! use mtui_core::MenuId;
//! use mtui_keymap::{Keymaps, ops};
//!
//! let mut km = Keymaps::new();
//! km.bind("pager", "<C-Down>", "half-down").unwrap();
//! assert_eq!(
//!     km.expand_key(MenuId::PAGER, ops::OP_HALF_DOWN).as_deref(),
//!     Some("]")
//! );
//! assert!(km.dump(Some(MenuId::PAGER)).contains("bind pager <C-Down> half-down"));
//! ```

pub mod dump;
pub mod error;
pub mod keymap;
pub mod keys;
pub mod menus;
pub mod ops;
pub mod queue;
pub mod registry;

pub use error::{BindError, KeyParseError};
pub use keymap::{Action, KeyBinding, Keymap, MatchStep, Matcher};
pub use keys::{expand_keys, key_name, parse_keys};
pub use menus::{MenuFuncOp, MenuOpSeq};
pub use queue::EventQueue;
pub use registry::{Keymaps, ShadowWarning};
