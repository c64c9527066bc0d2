#![forbid(unsafe_code)]

//! The render cycle.
//!
//! [`UiContext::redraw`] runs after every operation:
//!
//! 1. reflow the tree and send state-change events, repeating while a
//!    window resized itself in response (the message line does);
//! 2. recalc every visible window that asked for it, top-down;
//! 3. repaint every visible window that asked for it, top-down;
//! 4. let the focused window place the cursor;
//! 5. flush to the terminal.

use mtui_core::geometry::{StateFlags, WindowActions, WindowId};
use mtui_core::notify::{WindowEvent, WindowEventKind};
use mtui_layout::Canvas;
use mtui_render::Terminal;

use crate::context::UiContext;
use crate::role::{RenderEnv, Role};

/// Reflow passes before the layout is taken as settled.
const SETTLE_PASSES: usize = 3;

impl<T: Terminal> UiContext<T> {
    /// Bring the screen up to date.
    pub fn redraw(&mut self) {
        self.flush_notifications();
        let root = self.tree.root();
        for pass in 0..SETTLE_PASSES {
            if pass > 0 && !self.tree.needs_reflow(root) {
                break;
            }
            self.tree.reflow(root);
            clear_reflow(&mut self.tree, root);
            self.tree.notify_all(root);
            self.handle_window_events();
        }

        self.recalc_tree(root);
        self.repaint_tree(root);
        self.recursor();

        if let Err(err) = self.term.refresh() {
            tracing::warn!(error = %err, "terminal refresh failed");
        }
    }

    /// Mark everything dirty and redraw.
    pub fn redraw_all(&mut self) {
        self.term.clear();
        self.tree.invalidate_all();
        let root = self.tree.root();
        self.tree.request(root, WindowActions::REFLOW);
        self.redraw();
    }

    /// Turn the window events logged since the last cycle into actions.
    fn handle_window_events(&mut self) {
        for ev in self.tree.take_events() {
            match ev.kind {
                WindowEventKind::State => self.window_state_changed(ev),
                WindowEventKind::Focus | WindowEventKind::Dialog => self.refresh_help(),
                WindowEventKind::Add | WindowEventKind::Delete => {}
            }
        }
    }

    fn window_state_changed(&mut self, ev: WindowEvent) {
        let Some(state) = self.tree.state(ev.win) else {
            return;
        };
        let mut rows = None;
        let actions = match self.tree.data_mut(ev.win) {
            Some(Role::Message(mw)) => {
                let hidden = ev.flags.contains(StateFlags::HIDDEN);
                let resized = ev.flags.intersects(StateFlags::NARROWER | StateFlags::WIDER);
                rows = mw.state_changed(&state, hidden, resized);
                if rows.is_some() {
                    WindowActions::RECALC | WindowActions::REPAINT
                } else {
                    WindowActions::REPAINT
                }
            }
            Some(Role::Client(client)) => client.state_changed(ev.flags),
            Some(Role::HelpBar(_) | Role::StatusBar(_) | Role::Container) => {
                WindowActions::REPAINT
            }
            None => return,
        };
        self.tree.request(ev.win, actions);
        if let Some(rows) = rows {
            self.set_message_rows(rows);
        }
    }

    fn recalc_tree(&mut self, id: WindowId) {
        let Some(win) = self.tree.get_mut(id) else {
            return;
        };
        if !win.state.visible {
            return;
        }
        if win.actions.contains(WindowActions::RECALC) {
            win.actions.remove(WindowActions::RECALC);
            let env = RenderEnv {
                config: &self.config,
                colors: &self.colors,
                keymaps: &self.keymaps,
            };
            let more = match &mut win.data {
                Role::Client(client) => client.recalc(&win.state, &env),
                Role::HelpBar(help) => {
                    help.recalc(env.keymaps);
                    WindowActions::REPAINT
                }
                Role::Message(_) | Role::StatusBar(_) => WindowActions::REPAINT,
                Role::Container => WindowActions::empty(),
            };
            win.actions |= more;
            tracing::trace!(win = id.0, role = win.data.name(), "recalc");
        }
        let children = win.children().to_vec();
        for c in children {
            self.recalc_tree(c);
        }
    }

    fn repaint_tree(&mut self, id: WindowId) {
        let Some(win) = self.tree.get_mut(id) else {
            return;
        };
        if !win.state.visible {
            return;
        }
        let children = win.children().to_vec();
        if win.actions.contains(WindowActions::REPAINT) {
            win.actions.remove(WindowActions::REPAINT);
            let env = RenderEnv {
                config: &self.config,
                colors: &self.colors,
                keymaps: &self.keymaps,
            };
            let state = win.state;
            let mut canvas = Canvas::new(&mut self.term, state);
            match &mut win.data {
                Role::Client(client) => client.repaint(&mut canvas, &env),
                Role::Message(mw) => mw.repaint(&mut canvas, &env),
                Role::HelpBar(help) => help.repaint(&mut canvas, &env),
                Role::StatusBar(bar) => bar.repaint(&mut canvas, &env),
                Role::Container => {
                    if children.is_empty() {
                        canvas.clear();
                    }
                }
            }
            tracing::trace!(win = id.0, role = win.data.name(), "repaint");
        }
        for c in children {
            self.repaint_tree(c);
        }
    }

    /// Give the focused window the cursor, or hide it.
    fn recursor(&mut self) {
        let focus = self.tree.focus().filter(|&id| self.tree.is_visible(id));
        let shown = match focus.and_then(|id| self.tree.get_mut(id)) {
            Some(win) => {
                let mut canvas = Canvas::new(&mut self.term, win.state);
                match &mut win.data {
                    Role::Client(client) => client.recursor(&mut canvas),
                    Role::Message(mw) => mw.recursor(&mut canvas),
                    _ => false,
                }
            }
            None => false,
        };
        self.term.show_cursor(shown);
    }
}

fn clear_reflow(tree: &mut mtui_layout::WindowTree<Role>, id: WindowId) {
    let children = match tree.get_mut(id) {
        Some(win) => {
            win.actions.remove(WindowActions::REFLOW);
            win.children().to_vec()
        }
        None => return,
    };
    for c in children {
        clear_reflow(tree, c);
    }
}
