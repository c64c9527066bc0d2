#![forbid(unsafe_code)]

//! Pager
//!
//! Shows a file (usually an email) one screen at a time.
//!
//! # Key Components
//!
//! - [`PagerView`] - the window client: reads the file lazily, classifies
//!   and wraps lines, and paints them
//! - [`Classifier`] / [`QuoteTree`] - headers, quoted text, signatures and
//!   attachment markers; quote prefixes form a tree of nesting levels
//! - [`format_line`](format::format_line) - turns raw bytes into screen
//!   cells, handling control characters, tabs, overstrike and ANSI colour
//! - [`PagerSession`] / [`pager_open`] - the pager as a dialog: reads
//!   operations until one leaves it
//!
//! # Example
//! ```
//! use mtui_keymap::ops::{OP_EXIT, OP_PAGER_TOP};
//! use mtui_pager::{Outcome, PagerFlags, PagerMode, PagerView};
//! use mtui_runtime::PagerConfig;
//! use mtui_style::ColorConfig;
//!
//! let text = b"From: someone\n\nhello\n> quoted\n".to_vec();
//! let mut view = PagerView::from_bytes(
//!     text,
//!     PagerMode::Email,
//!     PagerFlags::empty(),
//!     &PagerConfig::default(),
//!     &ColorConfig::default(),
//! )
//! .unwrap()
//! .with_title("pager");
//! view.resize(40, 10);
//! assert_eq!(view.status_text(), "-- pager (0%)");
//! assert!(matches!(view.apply(OP_PAGER_TOP), Outcome::Notice(_)));
//! assert_eq!(view.apply(OP_EXIT), Outcome::Leave);
//! ```

pub mod classify;
pub mod error;
pub mod format;
pub mod line;
pub mod open;
pub mod ops;
pub mod quote;
mod search;
pub mod view;

pub use classify::Classifier;
pub use error::{PagerError, SearchError};
pub use line::{Line, LineStore, LineType};
pub use open::{PagerRequest, PagerSession, Step, pager_open};
pub use ops::{Notice, Outcome};
pub use quote::{QuoteId, QuoteTree};
pub use view::{ActiveSearch, PagerFlags, PagerMode, PagerView, Shown, Source, Viewport};

#[cfg(test)]
pub(crate) mod testing {
    use mtui_core::WindowState;
    use mtui_layout::Canvas;
    use mtui_render::{HeadlessTerminal, Terminal};

    use crate::view::PagerView;

    /// Paint the view over the whole headless screen.
    pub fn paint(view: &mut PagerView, term: &mut HeadlessTerminal) {
        let (cols, rows) = term.size();
        let mut canvas = Canvas::new(term, WindowState::new(rows, cols));
        view.paint(&mut canvas);
    }
}
