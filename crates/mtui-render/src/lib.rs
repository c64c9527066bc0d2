#![forbid(unsafe_code)]

//! Rendering: the [`Terminal`] driver trait, a cell grid, and two drivers.
//!
//! # Example
//! ```
//! use mtui_render::{HeadlessTerminal, Terminal};
//!
//! let mut term = HeadlessTerminal::new(20, 2);
//! term.move_to(0, 0);
//! term.add_str("Subject: hi");
//! term.clear_to_eol();
//! assert_eq!(term.row_text(0), "Subject: hi");
//! ```

pub mod buffer;
#[cfg(not(target_arch = "wasm32"))]
pub mod crossterm_terminal;
pub mod diff;
pub mod headless;
pub mod terminal;

pub use buffer::{Buffer, Cell};
#[cfg(not(target_arch = "wasm32"))]
pub use crossterm_terminal::CrosstermTerminal;
pub use headless::HeadlessTerminal;
pub use terminal::Terminal;
