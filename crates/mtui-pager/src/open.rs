#![forbid(unsafe_code)]

//! Running a pager session.
//!
//! [`pager_open`] shows a file in a pager dialog and reads operations
//! until one leaves the pager; that operation is returned so the caller
//! can act on it (show the next message, open help, quit).

use std::path::PathBuf;

use mtui_core::geometry::WindowId;
use mtui_core::notify::{Event, PagerEventKind};
use mtui_core::{MenuId, Op};
use mtui_keymap::ops::{
    OP_EXIT, OP_HELP, OP_NEXT_PAGE, OP_PREV_PAGE, OP_REDRAW, OP_SEARCH, OP_SEARCH_NEXT,
    OP_SEARCH_OPPOSITE, OP_SEARCH_REVERSE,
};
use mtui_layout::{HelpEntry, WindowType};
use mtui_render::Terminal;
use mtui_runtime::{Role, UiContext};
use mtui_style::ColorId;

use crate::error::PagerError;
use crate::ops::{Notice, Outcome};
use crate::view::{PagerFlags, PagerMode, PagerView};

/// What to show and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerRequest {
    pub path: PathBuf,
    pub mode: PagerMode,
    /// [`PagerFlags::SHOW_COLOR`] and [`PagerFlags::NOWRAP`] are honoured.
    pub flags: PagerFlags,
    /// Status bar title; the file name if not set.
    pub title: Option<String>,
    /// Show the pager in this window rather than a new dialog. The window's
    /// role is given back when the session closes.
    pub window: Option<WindowId>,
    /// Delete the file when the session closes.
    pub remove_on_exit: bool,
}

impl PagerRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: PagerMode::Email,
            flags: PagerFlags::empty(),
            title: None,
            window: None,
            remove_on_exit: false,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: PagerMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: PagerFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: WindowId) -> Self {
        self.window = Some(window);
        self
    }

    #[must_use]
    pub fn with_remove_on_exit(mut self, remove: bool) -> Self {
        self.remove_on_exit = remove;
        self
    }
}

/// Result of one [`PagerSession::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// The pager is done; this operation is for the caller.
    Exit(Op),
}

fn pager_help() -> Vec<HelpEntry> {
    [
        ("Exit", OP_EXIT),
        ("PrevPg", OP_PREV_PAGE),
        ("NextPg", OP_NEXT_PAGE),
        ("Help", OP_HELP),
    ]
    .into_iter()
    .map(|(label, op)| HelpEntry {
        label: label.to_string(),
        op,
    })
    .collect()
}

/// A pager on screen.
#[derive(Debug)]
pub struct PagerSession {
    body: WindowId,
    status: Option<WindowId>,
    dialog: Option<WindowId>,
    previous: Option<Role>,
    path: PathBuf,
    remove_on_exit: bool,
}

impl PagerSession {
    /// Open the file and put the pager on screen.
    ///
    /// A file that cannot be opened is reported on the message line as
    /// well as returned.
    pub fn open<T: Terminal>(ctx: &mut UiContext<T>, req: PagerRequest) -> Result<Self, PagerError> {
        let config = ctx.config().pager.clone();
        let view = match PagerView::open(&req.path, req.mode, req.flags, &config, ctx.colors()) {
            Ok(view) => view,
            Err(err) => {
                tracing::warn!(path = %req.path.display(), %err, "cannot open pager file");
                ctx.error(&err.to_string());
                return Err(err);
            }
        };
        let view = match req.title {
            Some(title) => view.with_title(title),
            None => view,
        };

        let mut session = match req.window {
            Some(win) if ctx.tree().contains(win) => {
                let previous = ctx
                    .tree_mut()
                    .data_mut(win)
                    .map(|data| std::mem::replace(data, Role::client(view)));
                ctx.recalc(win);
                Self {
                    body: win,
                    status: None,
                    dialog: None,
                    previous,
                    path: req.path,
                    remove_on_exit: req.remove_on_exit,
                }
            }
            _ => {
                let dlg = ctx.simple_dialog(
                    MenuId::PAGER,
                    WindowType::Pager,
                    Role::client(view),
                    pager_help(),
                );
                ctx.push_dialog(dlg.dialog);
                Self {
                    body: dlg.body,
                    status: Some(dlg.status),
                    dialog: Some(dlg.dialog),
                    previous: None,
                    path: req.path,
                    remove_on_exit: req.remove_on_exit,
                }
            }
        };
        ctx.set_focus(session.body);
        session.refresh_status(ctx);
        tracing::debug!(body = session.body.0, path = %session.path.display(), "pager session opened");
        Ok(session)
    }

    /// The window the pager draws in.
    pub fn window(&self) -> WindowId {
        self.body
    }

    pub fn view<'c, T: Terminal>(&self, ctx: &'c mut UiContext<T>) -> Option<&'c mut PagerView> {
        ctx.client_mut::<PagerView>(self.body)
    }

    fn refresh_status<T: Terminal>(&mut self, ctx: &mut UiContext<T>) {
        let Some(status) = self.status else {
            return;
        };
        let Some(text) = self.view(ctx).map(|v| v.status_text()) else {
            return;
        };
        ctx.set_status(status, &text);
    }

    /// Read and handle one operation.
    pub fn step<T: Terminal>(&mut self, ctx: &mut UiContext<T>) -> Step {
        ctx.redraw();
        self.refresh_status(ctx);
        let op = ctx.next_op(MenuId::PAGER, 0).event.op;

        let no_pattern = self.view(ctx).is_some_and(|v| v.search_pattern().is_none());
        match op {
            Op::ABORT | Op::TIMEOUT | Op::REPAINT => Step::Continue,
            OP_REDRAW => {
                ctx.redraw_all();
                Step::Continue
            }
            OP_SEARCH | OP_SEARCH_REVERSE => self.prompt_search(ctx, op),
            OP_SEARCH_NEXT | OP_SEARCH_OPPOSITE if no_pattern => self.prompt_search(ctx, op),
            op => self.apply(ctx, op),
        }
    }

    fn apply<T: Terminal>(&mut self, ctx: &mut UiContext<T>, op: Op) -> Step {
        let Some(view) = self.view(ctx) else {
            return Step::Exit(op);
        };
        let before = view.viewport();
        let out = view.apply(op);
        let changed = view.viewport() != before;
        self.finish(ctx, out, changed, op)
    }

    fn prompt_search<T: Terminal>(&mut self, ctx: &mut UiContext<T>, op: Op) -> Step {
        let initial = self
            .view(ctx)
            .and_then(|v| v.search_pattern().map(str::to_string))
            .unwrap_or_default();
        let label = if op == OP_SEARCH || op == OP_SEARCH_NEXT {
            "Search for: "
        } else {
            "Reverse search for: "
        };
        let Some(pattern) = ctx.get_field(label, &initial) else {
            return Step::Continue;
        };
        let Some(view) = self.view(ctx) else {
            return Step::Continue;
        };
        let before = view.viewport();
        let result = view.search_for(&pattern, op);
        let changed = view.viewport() != before;
        match result {
            Ok(out) => self.finish(ctx, out, changed, op),
            Err(err) => {
                ctx.error(&err.to_string());
                ctx.repaint(self.body);
                Step::Continue
            }
        }
    }

    fn finish<T: Terminal>(&mut self, ctx: &mut UiContext<T>, out: Outcome, changed: bool, op: Op) -> Step {
        if changed {
            ctx.repaint(self.body);
            ctx.send(&Event::Pager {
                kind: PagerEventKind::View,
                win: self.body,
            });
        }
        match out {
            Outcome::Done => Step::Continue,
            Outcome::Notice(Notice::Message(text)) => {
                ctx.message(&text);
                Step::Continue
            }
            Outcome::Notice(Notice::Warning(text)) => {
                ctx.message_set(&text, ColorId::Warning);
                Step::Continue
            }
            Outcome::Notice(Notice::Error(text)) => {
                ctx.error(&text);
                Step::Continue
            }
            Outcome::Leave => Step::Exit(op),
        }
    }

    /// Handle operations until one leaves the pager, then close it.
    pub fn run<T: Terminal>(mut self, ctx: &mut UiContext<T>) -> Op {
        let op = loop {
            if let Step::Exit(op) = self.step(ctx) {
                break op;
            }
        };
        self.close(ctx);
        op
    }

    /// Take the pager off the screen and free what it holds.
    pub fn close<T: Terminal>(mut self, ctx: &mut UiContext<T>) {
        let role = match self.previous.take() {
            Some(previous) => ctx
                .tree_mut()
                .data_mut(self.body)
                .map(|data| std::mem::replace(data, previous)),
            None => ctx.tree_mut().data_mut(self.body).map(std::mem::take),
        };
        if let Some(Role::Client(mut client)) = role {
            if let Some(view) = client.as_any_mut().downcast_mut::<PagerView>() {
                view.release_colors(ctx.terminal_mut().color_pairs());
            }
        }

        match self.dialog {
            Some(dialog) if ctx.top_dialog() == Some(dialog) => {
                ctx.close_dialog();
            }
            Some(dialog) => ctx.tree_mut().free(dialog),
            None => ctx.recalc(self.body),
        }

        if self.remove_on_exit {
            if let Err(err) = std::fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), %err, "cannot remove pager file");
            }
        }
        tracing::debug!(path = %self.path.display(), "pager session closed");
    }
}

/// Show a file in the pager until the user leaves it.
///
/// Returns the operation that ended the session: `exit`, `help`, or a
/// paging operation past the end of the file with `pager_stop` unset.
pub fn pager_open<T: Terminal>(ctx: &mut UiContext<T>, req: PagerRequest) -> Result<Op, PagerError> {
    let session = PagerSession::open(ctx, req)?;
    Ok(session.run(ctx))
}
