#![forbid(unsafe_code)]

//! The dialog stack.
//!
//! Dialogs are the children of the all-dialogs window; the last child is
//! the top of the stack and the only visible one. Pushing hides the old
//! top, pulling focus into the new one; popping reverses that.

use mtui_core::geometry::{Extent, Orientation, SizePolicy, StateFlags, WindowActions, WindowId};
use mtui_core::notify::WindowEventKind;
use mtui_core::MenuId;
use mtui_layout::{HelpEntry, WindowType};
use mtui_render::Terminal;

use crate::context::UiContext;
use crate::role::{Role, StatusBar};

/// The windows of a dialog built by [`UiContext::simple_dialog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleDialog {
    pub dialog: WindowId,
    pub body: WindowId,
    pub status: WindowId,
}

impl<T: Terminal> UiContext<T> {
    /// The dialogs, bottom of the stack first.
    pub fn dialogs(&self) -> &[WindowId] {
        self.tree.children(self.layout.all_dialogs)
    }

    /// The top of the stack.
    pub fn top_dialog(&self) -> Option<WindowId> {
        self.dialogs().last().copied()
    }

    /// Put `dialog` on top of the stack, show it and focus it.
    pub fn push_dialog(&mut self, dialog: WindowId) {
        let all = self.layout.all_dialogs;
        let prev = self.top_dialog();
        if prev == Some(dialog) || !self.tree.add_child(all, dialog) {
            return;
        }
        if let Some(prev) = prev {
            self.tree.set_visible(prev, false);
        }
        self.tree
            .notify(dialog, WindowEventKind::Dialog, StateFlags::VISIBLE);
        self.tree.set_visible(dialog, true);
        self.tree.request(all, WindowActions::REFLOW);
        self.tree.invalidate(dialog);

        let leaf = self.first_leaf(dialog);
        self.set_focus(leaf);
        tracing::debug!(dialog = dialog.0, depth = self.dialogs().len(), "dialog pushed");
    }

    /// Take the top dialog off the stack and return it, detached.
    ///
    /// The dialog below becomes visible and regains focus; with an empty
    /// stack focus is cleared. Popping an empty stack does nothing.
    pub fn pop_dialog(&mut self) -> Option<WindowId> {
        let all = self.layout.all_dialogs;
        let top = self.top_dialog()?;
        self.tree
            .notify(top, WindowEventKind::Dialog, StateFlags::HIDDEN);
        self.tree.set_visible(top, false);
        self.tree.remove_child(all, top);

        match self.top_dialog() {
            Some(next) => {
                self.tree.set_visible(next, true);
                self.tree.invalidate(next);
                let leaf = self.first_leaf(next);
                self.set_focus(leaf);
            }
            None => {
                self.tree.clear_focus();
                self.refresh_help();
            }
        }
        self.tree.request(all, WindowActions::REFLOW);
        self.tree.invalidate(all);
        tracing::debug!(dialog = top.0, depth = self.dialogs().len(), "dialog popped");
        Some(top)
    }

    /// Pop the top dialog and free it.
    pub fn close_dialog(&mut self) -> bool {
        match self.pop_dialog() {
            Some(dlg) => {
                self.tree.free(dlg);
                true
            }
            None => false,
        }
    }

    /// The leaf focus lands on inside `id`: follow its focus pointers, then
    /// the first visible children.
    fn first_leaf(&self, id: WindowId) -> WindowId {
        let mut leaf = self.tree.focus_leaf_under(id);
        while let Some(&child) = self
            .tree
            .children(leaf)
            .iter()
            .find(|&&c| self.tree.get(c).is_some_and(|w| w.state.visible))
        {
            leaf = self.tree.focus_leaf_under(child);
        }
        leaf
    }

    /// Build a dialog in the usual shape: a body window filling the space
    /// and a one-line status bar, placed per `status_on_top`.
    ///
    /// The dialog is detached; push it with [`push_dialog`](Self::push_dialog).
    pub fn simple_dialog(
        &mut self,
        menu: MenuId,
        kind: WindowType,
        body: Role,
        help: Vec<HelpEntry>,
    ) -> SimpleDialog {
        let dialog = self.tree.create(
            WindowType::Dialog,
            Orientation::Vertical,
            SizePolicy::Maximise,
            Extent::Unlimited,
            Extent::Unlimited,
            Role::Container,
        );
        let body = self.tree.create(
            kind,
            Orientation::Vertical,
            SizePolicy::Maximise,
            Extent::Unlimited,
            Extent::Unlimited,
            body,
        );
        let status = self.tree.create(
            WindowType::StatusBar,
            Orientation::Vertical,
            SizePolicy::Fixed,
            Extent::Unlimited,
            Extent::Cells(1),
            Role::StatusBar(StatusBar::default()),
        );
        if self.config.status_on_top {
            self.tree.add_child(dialog, status);
            self.tree.add_child(dialog, body);
        } else {
            self.tree.add_child(dialog, body);
            self.tree.add_child(dialog, status);
        }
        if let Some(win) = self.tree.get_mut(dialog) {
            win.help_menu = Some(menu);
            win.help_data = help;
        }
        self.tree.set_focus(body);
        SimpleDialog {
            dialog,
            body,
            status,
        }
    }

    /// Change the text of a status bar.
    pub fn set_status(&mut self, win: WindowId, text: &str) {
        if let Some(Role::StatusBar(bar)) = self.tree.data_mut(win) {
            if bar.text != text {
                bar.text = text.to_string();
                self.tree.request(win, WindowActions::REPAINT);
            }
        }
    }
}
