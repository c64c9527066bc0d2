#![forbid(unsafe_code)]

//! The window tree.
//!
//! Windows live in an arena owned by [`WindowTree`] and are addressed by
//! [`WindowId`]. Each window carries layout requests (orientation, size
//! policy, requested rows/cols), the computed [`WindowState`] plus the
//! snapshot from the previous layout, pending [`WindowActions`], a focus
//! pointer and a notifier in the tree's [`NotifyBus`].
//!
//! The per-window payload `D` is supplied by the embedder; dropping it is
//! the window's destructor.
//!
//! # Invariants
//!
//! - The tree is a true tree: [`WindowTree::add_child`] refuses to create a
//!   cycle.
//! - A window's focus pointer is `None` or one of its current children.
//! - A window is effectively visible iff it and all its ancestors have the
//!   visible flag set.
//!
//! Every window event sent through the bus is also appended to a log that
//! the owner drains with [`WindowTree::take_events`].

use std::fmt::Write as _;

use mtui_core::MenuId;
use mtui_core::geometry::{
    Extent, Orientation, SizePolicy, StateFlags, WindowActions, WindowId, WindowState,
};
use mtui_core::notify::{Event, NotifierId, NotifyBus, WindowEvent, WindowEventKind};

/// The role of a window in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowType {
    Root,
    AllDialogs,
    Dialog,
    Container,
    Custom,
    HelpBar,
    Index,
    Menu,
    Message,
    MessageContainer,
    Pager,
    Sidebar,
    StatusBar,
}

impl WindowType {
    pub const fn name(self) -> &'static str {
        match self {
            WindowType::Root => "root",
            WindowType::AllDialogs => "all-dialogs",
            WindowType::Dialog => "dialog",
            WindowType::Container => "container",
            WindowType::Custom => "custom",
            WindowType::HelpBar => "help-bar",
            WindowType::Index => "index",
            WindowType::Menu => "menu",
            WindowType::Message => "message",
            WindowType::MessageContainer => "message-container",
            WindowType::Pager => "pager",
            WindowType::Sidebar => "sidebar",
            WindowType::StatusBar => "status-bar",
        }
    }
}

/// One help-bar entry: the label shown and the operation it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub label: String,
    pub op: mtui_core::Op,
}

/// A node of the window tree.
#[derive(Debug)]
pub struct Window<D> {
    pub kind: WindowType,
    pub orient: Orientation,
    pub size: SizePolicy,
    pub req_rows: Extent,
    pub req_cols: Extent,
    /// Geometry from the latest reflow.
    pub state: WindowState,
    /// Geometry at the last state notification.
    pub old: WindowState,
    pub actions: WindowActions,
    /// Menu whose bindings the help bar shows while this window is focused.
    pub help_menu: Option<MenuId>,
    pub help_data: Vec<HelpEntry>,
    pub data: D,
    parent: Option<WindowId>,
    children: Vec<WindowId>,
    focus: Option<WindowId>,
    notifier: NotifierId,
}

impl<D> Window<D> {
    pub fn parent(&self) -> Option<WindowId> {
        self.parent
    }

    pub fn children(&self) -> &[WindowId] {
        &self.children
    }

    /// The child this window's focus points at.
    pub fn focus(&self) -> Option<WindowId> {
        self.focus
    }

    pub fn notifier(&self) -> NotifierId {
        self.notifier
    }
}

/// Arena-backed window tree with a notification bus.
#[derive(Debug)]
pub struct WindowTree<D> {
    nodes: Vec<Option<Window<D>>>,
    free_slots: Vec<u32>,
    root: WindowId,
    bus: NotifyBus,
    events: Vec<WindowEvent>,
}

impl<D> WindowTree<D> {
    /// A tree whose root is a fixed `cols` x `rows` window.
    pub fn new(orient: Orientation, cols: u16, rows: u16, data: D) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            free_slots: Vec::new(),
            root: WindowId(0),
            bus: NotifyBus::new(),
            events: Vec::new(),
        };
        let root = tree.create(
            WindowType::Root,
            orient,
            SizePolicy::Fixed,
            Extent::Cells(cols),
            Extent::Cells(rows),
            data,
        );
        if let Some(win) = tree.get_mut(root) {
            win.state.rows = rows;
            win.state.cols = cols;
        }
        tree.root = root;
        tree
    }

    pub fn root(&self) -> WindowId {
        self.root
    }

    pub fn bus(&self) -> &NotifyBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut NotifyBus {
        &mut self.bus
    }

    /// Create a detached window.
    pub fn create(
        &mut self,
        kind: WindowType,
        orient: Orientation,
        size: SizePolicy,
        cols: Extent,
        rows: Extent,
        data: D,
    ) -> WindowId {
        let notifier = self.bus.create();
        let win = Window {
            kind,
            orient,
            size,
            req_rows: rows,
            req_cols: cols,
            state: WindowState {
                visible: true,
                ..WindowState::default()
            },
            old: WindowState::default(),
            actions: WindowActions::empty(),
            help_menu: None,
            help_data: Vec::new(),
            data,
            parent: None,
            children: Vec::new(),
            focus: None,
            notifier,
        };
        let id = if let Some(slot) = self.free_slots.pop() {
            self.nodes[slot as usize] = Some(win);
            WindowId(slot)
        } else {
            self.nodes.push(Some(win));
            WindowId((self.nodes.len() - 1) as u32)
        };
        tracing::trace!(win = id.0, kind = kind.name(), "window created");
        id
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: WindowId) -> Option<&Window<D>> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window<D>> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn data(&self, id: WindowId) -> Option<&D> {
        self.get(id).map(|w| &w.data)
    }

    pub fn data_mut(&mut self, id: WindowId) -> Option<&mut D> {
        self.get_mut(id).map(|w| &mut w.data)
    }

    pub fn state(&self, id: WindowId) -> Option<WindowState> {
        self.get(id).map(|w| w.state)
    }

    pub fn kind(&self, id: WindowId) -> Option<WindowType> {
        self.get(id).map(|w| w.kind)
    }

    pub fn parent(&self, id: WindowId) -> Option<WindowId> {
        self.get(id).and_then(|w| w.parent)
    }

    pub fn children(&self, id: WindowId) -> &[WindowId] {
        self.get(id).map_or(&[], |w| &w.children)
    }

    /// Number of live windows.
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Is `ancestor` equal to `id` or above it?
    pub fn is_ancestor(&self, ancestor: WindowId, id: WindowId) -> bool {
        let mut cur = Some(id);
        while let Some(w) = cur {
            if w == ancestor {
                return true;
            }
            cur = self.parent(w);
        }
        false
    }

    // -----------------------------------------------------------------------
    // Notification
    // -----------------------------------------------------------------------

    /// Send a window event from `win` and record it.
    pub fn notify(&mut self, win: WindowId, kind: WindowEventKind, flags: StateFlags) {
        let Some(notifier) = self.get(win).map(|w| w.notifier) else {
            return;
        };
        tracing::debug!(
            win = win.0,
            kind = ?kind,
            flags = ?flags,
            name = self.kind(win).map_or("unknown", WindowType::name),
            "window event"
        );
        let ev = WindowEvent { kind, win, flags };
        self.events.push(ev);
        self.bus.send(notifier, &Event::Window(ev));
    }

    /// Send a non-window event from `win`'s notifier.
    pub fn send(&mut self, win: WindowId, event: &Event) -> bool {
        match self.get(win).map(|w| w.notifier) {
            Some(notifier) => self.bus.send(notifier, event),
            None => false,
        }
    }

    /// Drain the log of window events sent since the last call.
    pub fn take_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    /// Append `child` to `parent`'s children.
    ///
    /// A child attached elsewhere is moved. Returns `false` (and changes
    /// nothing) if either window is unknown or the move would create a cycle.
    pub fn add_child(&mut self, parent: WindowId, child: WindowId) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor(child, parent) {
            tracing::warn!(parent = parent.0, child = child.0, "refusing window attach");
            return false;
        }
        if let Some(old) = self.parent(child) {
            self.remove_child(old, child);
        }
        let parent_notifier = match self.get_mut(parent) {
            Some(p) => {
                p.children.push(child);
                p.notifier
            }
            None => return false,
        };
        let child_notifier = match self.get_mut(child) {
            Some(c) => {
                c.parent = Some(parent);
                c.notifier
            }
            None => return false,
        };
        self.bus.set_parent(child_notifier, Some(parent_notifier));
        self.notify(child, WindowEventKind::Add, StateFlags::empty());
        true
    }

    /// Detach `child` from `parent` without freeing it.
    pub fn remove_child(&mut self, parent: WindowId, child: WindowId) -> Option<WindowId> {
        let p = self.get_mut(parent)?;
        let pos = p.children.iter().position(|&c| c == child)?;
        p.children.remove(pos);
        if p.focus == Some(child) {
            p.focus = None;
        }
        let notifier = {
            let c = self.get_mut(child)?;
            c.parent = None;
            c.notifier
        };
        self.bus.set_parent(notifier, None);
        Some(child)
    }

    /// Move `child` to position `index` among its siblings.
    pub fn move_child(&mut self, parent: WindowId, child: WindowId, index: usize) -> bool {
        let Some(p) = self.get_mut(parent) else {
            return false;
        };
        let Some(pos) = p.children.iter().position(|&c| c == child) else {
            return false;
        };
        p.children.remove(pos);
        let index = index.min(p.children.len());
        p.children.insert(index, child);
        true
    }

    /// Free `id` and its subtree.
    ///
    /// Each window announces its deletion before its children are freed,
    /// and its payload is dropped after them. A parent whose focus pointed
    /// at the freed window loses its focus pointer.
    pub fn free(&mut self, id: WindowId) {
        if !self.contains(id) {
            return;
        }
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }
        self.free_detached(id);
    }

    fn free_detached(&mut self, id: WindowId) {
        self.notify(id, WindowEventKind::Delete, StateFlags::empty());
        let children = self.children(id).to_vec();
        for child in children {
            if let Some(c) = self.get_mut(child) {
                c.parent = None;
            }
            self.free_detached(child);
        }
        if let Some(win) = self.nodes.get_mut(id.index()).and_then(Option::take) {
            let notifier = win.notifier;
            drop(win);
            self.bus.free(notifier);
            self.free_slots.push(id.0);
        }
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    pub fn set_visible(&mut self, id: WindowId, visible: bool) {
        if let Some(w) = self.get_mut(id) {
            w.state.visible = visible;
        }
    }

    /// Effective visibility: `id` and every ancestor are visible.
    pub fn is_visible(&self, id: WindowId) -> bool {
        self.all_ancestors(id, |w| w.state.visible)
    }

    /// Effective visibility as of the last state notification.
    pub fn was_visible(&self, id: WindowId) -> bool {
        self.all_ancestors(id, |w| w.old.visible)
    }

    fn all_ancestors(&self, id: WindowId, pred: impl Fn(&Window<D>) -> bool) -> bool {
        let mut cur = Some(id);
        let mut seen = false;
        while let Some(w) = cur.and_then(|c| self.get(c)) {
            if !pred(w) {
                return false;
            }
            seen = true;
            cur = w.parent;
        }
        seen
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Depth-first search of `id`'s subtree (including `id`) for `kind`.
    pub fn find_child(&self, id: WindowId, kind: WindowType) -> Option<WindowId> {
        let win = self.get(id)?;
        if win.kind == kind {
            return Some(id);
        }
        win.children
            .iter()
            .find_map(|&c| self.find_child(c, kind))
    }

    /// The nearest window of type `kind` at or above `id`.
    pub fn find_parent(&self, id: WindowId, kind: WindowType) -> Option<WindowId> {
        let mut cur = Some(id);
        while let Some(w) = cur {
            if self.kind(w)? == kind {
                return Some(w);
            }
            cur = self.parent(w);
        }
        None
    }

    /// Pre-order walk of `id`'s subtree, skipping windows whose own visible
    /// flag is clear (and everything under them).
    pub fn visible_preorder(&self, id: WindowId) -> Vec<WindowId> {
        let mut out = Vec::new();
        self.collect_visible(id, &mut out);
        out
    }

    fn collect_visible(&self, id: WindowId, out: &mut Vec<WindowId>) {
        let Some(win) = self.get(id) else {
            return;
        };
        if !win.state.visible {
            return;
        }
        out.push(id);
        for &c in &win.children {
            self.collect_visible(c, out);
        }
    }

    // -----------------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------------

    /// The focused leaf: follow focus pointers down from the root.
    pub fn focus(&self) -> Option<WindowId> {
        let mut win = self.root;
        let mut hops = 0;
        while let Some(next) = self.get(win).and_then(|w| w.focus) {
            win = next;
            hops += 1;
            if hops > self.nodes.len() {
                break;
            }
        }
        self.contains(win).then_some(win)
    }

    pub fn is_focused(&self, id: WindowId) -> bool {
        self.focus() == Some(id)
    }

    /// Make `id` the focused leaf.
    ///
    /// Points every ancestor's focus at the path down to `id` and clears
    /// `id`'s own focus pointer. Returns the previous focused leaf if the
    /// global focus changed (and sends a focus event), otherwise `None`.
    ///
    /// Focusing inside a detached subtree only sets its pointers, so a
    /// dialog can be prepared before it is pushed.
    pub fn set_focus(&mut self, id: WindowId) -> Option<WindowId> {
        if !self.contains(id) {
            return None;
        }
        let old = self.focus();
        let mut child = id;
        while let Some(parent) = self.parent(child) {
            if let Some(p) = self.get_mut(parent) {
                p.focus = Some(child);
            }
            child = parent;
        }
        if let Some(w) = self.get_mut(id) {
            w.focus = None;
        }
        let new = self.focus();
        if new == old {
            return None;
        }
        if let Some(leaf) = new {
            self.notify(leaf, WindowEventKind::Focus, StateFlags::empty());
        }
        old
    }

    /// Clear the root's focus pointer.
    pub fn clear_focus(&mut self) {
        let root = self.root;
        if let Some(r) = self.get_mut(root) {
            r.focus = None;
        }
    }

    /// Follow focus pointers down from `id`.
    pub fn focus_leaf_under(&self, id: WindowId) -> WindowId {
        let mut win = id;
        let mut hops = 0;
        while let Some(next) = self.get(win).and_then(|w| w.focus) {
            win = next;
            hops += 1;
            if hops > self.nodes.len() {
                break;
            }
        }
        win
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Add `actions` to `id`.
    pub fn request(&mut self, id: WindowId, actions: WindowActions) {
        if let Some(w) = self.get_mut(id) {
            w.actions |= actions;
        }
    }

    /// Mark `id` and its subtree for recalc and repaint.
    pub fn invalidate(&mut self, id: WindowId) {
        let Some(win) = self.get_mut(id) else {
            return;
        };
        win.actions |= WindowActions::RECALC | WindowActions::REPAINT;
        let children = win.children.clone();
        for c in children {
            self.invalidate(c);
        }
    }

    /// Mark every window for recalc and repaint.
    pub fn invalidate_all(&mut self) {
        self.invalidate(self.root);
    }

    /// Does any window in `id`'s subtree want a reflow?
    pub fn needs_reflow(&self, id: WindowId) -> bool {
        let Some(win) = self.get(id) else {
            return false;
        };
        win.actions.contains(WindowActions::REFLOW)
            || win.children.iter().any(|&c| self.needs_reflow(c))
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Emit a state event for every window in `id`'s subtree whose geometry
    /// or effective visibility changed since the last call, then snapshot.
    pub fn notify_all(&mut self, id: WindowId) {
        let Some(win) = self.get(id) else {
            return;
        };
        let mut flags = win.state.diff(&win.old);
        let was = self.was_visible(id);
        let is = self.is_visible(id);
        if was != is {
            flags |= if is {
                StateFlags::VISIBLE
            } else {
                StateFlags::HIDDEN
            };
        }
        if !flags.is_empty() {
            self.notify(id, WindowEventKind::State, flags);
        }
        let children = self.children(id).to_vec();
        for c in children {
            self.notify_all(c);
        }
        if let Some(w) = self.get_mut(id) {
            w.old = w.state;
        }
    }

    /// Resize the root, reflowing if the size changed.
    pub fn set_root_size(&mut self, cols: u16, rows: u16) -> bool {
        let root = self.root;
        let Some(r) = self.get_mut(root) else {
            return false;
        };
        if r.state.cols == cols && r.state.rows == rows {
            return false;
        }
        r.state.cols = cols;
        r.state.rows = rows;
        r.req_cols = Extent::Cells(cols);
        r.req_rows = Extent::Cells(rows);
        self.reflow_and_notify(root);
        true
    }

    /// Put the status bar of `panel` first (`on_top`) or last.
    ///
    /// Returns `false` if the panel already has that arrangement.
    pub fn status_on_top(&mut self, panel: WindowId, on_top: bool) -> bool {
        let children = self.children(panel).to_vec();
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            return false;
        };
        let first_is_status = self.kind(first) == Some(WindowType::StatusBar);
        if on_top == first_is_status {
            return false;
        }
        if on_top {
            self.move_child(panel, last, 0);
        } else {
            self.move_child(panel, first, children.len());
        }
        self.reflow_and_notify(panel);
        self.invalidate_all();
        true
    }

    /// Text dump of the visible windows under `id`, e.g.
    /// `<FIX {0x,0y} [80C,24R]<MAX {0x,0y} [80C,24R]>>`.
    pub fn serialise(&self, id: WindowId) -> String {
        let mut out = String::new();
        self.serialise_into(id, &mut out);
        out
    }

    fn serialise_into(&self, id: WindowId, out: &mut String) {
        if !self.is_visible(id) {
            return;
        }
        let Some(win) = self.get(id) else {
            return;
        };
        let s = &win.state;
        let _ = write!(
            out,
            "<{} {{{}x,{}y}} [{}C,{}R]",
            win.size.tag(),
            s.col_offset,
            s.row_offset,
            s.cols,
            s.rows
        );
        for &c in &win.children {
            self.serialise_into(c, out);
        }
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use mtui_core::notify::EventTypes;

    fn tree() -> WindowTree<&'static str> {
        WindowTree::new(Orientation::Vertical, 80, 24, "root")
    }

    fn leaf(t: &mut WindowTree<&'static str>, name: &'static str) -> WindowId {
        t.create(
            WindowType::Custom,
            Orientation::Vertical,
            SizePolicy::Maximise,
            Extent::Unlimited,
            Extent::Unlimited,
            name,
        )
    }

    #[test]
    fn add_child_sets_parent_and_sends_add() {
        let mut t = tree();
        let a = leaf(&mut t, "a");
        assert!(t.add_child(t.root(), a));
        assert_eq!(t.parent(a), Some(t.root()));
        let events = t.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, WindowEventKind::Add);
        assert_eq!(events[0].win, a);
    }

    #[test]
    fn cycles_are_refused() {
        let mut t = tree();
        let a = leaf(&mut t, "a");
        let b = leaf(&mut t, "b");
        assert!(t.add_child(a, b));
        assert!(!t.add_child(b, a));
        assert!(!t.add_child(a, a));
    }

    #[test]
    fn free_sends_delete_parent_first_and_clears_focus() {
        let mut t = tree();
        let a = leaf(&mut t, "a");
        let b = leaf(&mut t, "b");
        t.add_child(t.root(), a);
        t.add_child(a, b);
        t.set_focus(b);
        t.take_events();

        t.free(a);
        let deleted: Vec<_> = t
            .take_events()
            .into_iter()
            .filter(|e| e.kind == WindowEventKind::Delete)
            .map(|e| e.win)
            .collect();
        assert_eq!(deleted, vec![a, b]);
        assert!(!t.contains(a) && !t.contains(b));
        assert_eq!(t.focus(), Some(t.root()));
        assert!(t.children(t.root()).is_empty());
    }

    #[test]
    fn visibility_requires_all_ancestors() {
        let mut t = tree();
        let a = leaf(&mut t, "a");
        let b = leaf(&mut t, "b");
        t.add_child(t.root(), a);
        t.add_child(a, b);
        assert!(t.is_visible(b));
        t.set_visible(a, false);
        assert!(!t.is_visible(b));
        assert!(t.get(b).unwrap().state.visible);
    }

    #[test]
    fn set_focus_returns_previous_and_emits_once() {
        let mut t = tree();
        let a = leaf(&mut t, "a");
        let b = leaf(&mut t, "b");
        t.add_child(t.root(), a);
        t.add_child(t.root(), b);
        let count = Rc::new(RefCell::new(0));
        let seen = count.clone();
        let root_notifier = t.get(t.root()).unwrap().notifier();
        t.bus_mut().observer_add(
            root_notifier,
            EventTypes::WINDOW,
            Box::new(move |ev| {
                if matches!(ev, Event::Window(w) if w.kind == WindowEventKind::Focus) {
                    *seen.borrow_mut() += 1;
                }
                Ok(())
            }),
        );

        assert_eq!(t.set_focus(a), Some(t.root()));
        assert_eq!(t.set_focus(a), None);
        assert_eq!(t.set_focus(b), Some(a));
        assert_eq!(t.focus(), Some(b));
        assert_eq!(*count.borrow(), 2);

        let detached = leaf(&mut t, "detached");
        let inner = leaf(&mut t, "inner");
        t.add_child(detached, inner);
        assert_eq!(t.set_focus(inner), None);
        assert_eq!(t.focus_leaf_under(detached), inner);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn find_child_and_parent() {
        let mut t = tree();
        let a = leaf(&mut t, "a");
        let pager = t.create(
            WindowType::Pager,
            Orientation::Vertical,
            SizePolicy::Maximise,
            Extent::Unlimited,
            Extent::Unlimited,
            "pager",
        );
        t.add_child(t.root(), a);
        t.add_child(a, pager);
        assert_eq!(t.find_child(t.root(), WindowType::Pager), Some(pager));
        assert_eq!(t.find_parent(pager, WindowType::Root), Some(t.root()));
        assert_eq!(t.find_parent(a, WindowType::Pager), None);
    }

    #[test]
    fn invalidate_all_marks_everything() {
        let mut t = tree();
        let a = leaf(&mut t, "a");
        t.add_child(t.root(), a);
        t.invalidate_all();
        assert!(t
            .get(a)
            .unwrap()
            .actions
            .contains(WindowActions::RECALC | WindowActions::REPAINT));
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut t = tree();
        let a = leaf(&mut t, "a");
        t.free(a);
        let b = leaf(&mut t, "b");
        assert_eq!(a, b);
        assert_eq!(t.data(b), Some(&"b"));
    }
}
