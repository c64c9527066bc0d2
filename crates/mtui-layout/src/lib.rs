#![forbid(unsafe_code)]

//! Window tree, focus, visibility and reflow.
//!
//! # Example
//! ```
//! use mtui_core::geometry::{Extent, Orientation, SizePolicy};
//! use mtui_layout::{WindowTree, WindowType};
//!
//! let mut tree = WindowTree::new(Orientation::Vertical, 80, 24, ());
//! let body = tree.create(
//!     WindowType::Container,
//!     Orientation::Vertical,
//!     SizePolicy::Maximise,
//!     Extent::Unlimited,
//!     Extent::Unlimited,
//!     (),
//! );
//! let bar = tree.create(
//!     WindowType::StatusBar,
//!     Orientation::Vertical,
//!     SizePolicy::Fixed,
//!     Extent::Unlimited,
//!     Extent::Cells(1),
//!     (),
//! );
//! let root = tree.root();
//! tree.add_child(root, body);
//! tree.add_child(root, bar);
//! tree.reflow_and_notify(root);
//!
//! assert_eq!(
//!     tree.serialise(root),
//!     "<FIX {0x,0y} [80C,24R]<MAX {0x,0y} [80C,23R]><FIX {0x,23y} [80C,1R]>>"
//! );
//! ```

pub mod draw;
pub mod reflow;
pub mod window;

pub use draw::Canvas;
pub use window::{HelpEntry, Window, WindowTree, WindowType};
