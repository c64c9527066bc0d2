#![forbid(unsafe_code)]

//! The UI context: everything the runtime owns, threaded through every
//! entry point.
//!
//! A context is built around a terminal driver. It creates the root
//! layout (help bar, dialog area, message line), holds the keymaps and the
//! event queue, and keeps the dispatcher's per-session state: the active
//! menu, the macro-suppression flag and the tag prefix.

use std::io;

use mtui_core::geometry::{Extent, Orientation, SizePolicy, WindowActions, WindowId};
use mtui_core::notify::{ColorEvent, ColorEventKind, ConfigEvent, ConfigEventKind, Event};
use mtui_core::{EventTypes, MenuId, ObserverError, ObserverId};
use mtui_keymap::{EventQueue, Keymaps};
use mtui_layout::{WindowTree, WindowType};
use mtui_render::Terminal;
use mtui_style::{AttrColor, ColorConfig, ColorId};

use crate::config::UiConfig;
use crate::helpbar::HelpBar;
use crate::msgwin::MessageWindow;
use crate::role::Role;

/// Windows every context creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootLayout {
    pub help_bar: WindowId,
    pub all_dialogs: WindowId,
    pub message_container: WindowId,
    pub message: WindowId,
}

pub(crate) type KeepAliveFn = Box<dyn FnMut()>;

/// Runtime state for one terminal.
pub struct UiContext<T: Terminal> {
    pub(crate) tree: WindowTree<Role>,
    pub(crate) keymaps: Keymaps,
    pub(crate) queue: EventQueue,
    pub(crate) term: T,
    pub(crate) config: UiConfig,
    pub(crate) colors: ColorConfig,
    pub(crate) layout: RootLayout,
    pub(crate) current_menu: MenuId,
    pub(crate) ignore_macro: bool,
    pub(crate) tag_prefix: bool,
    pub(crate) keep_alive: Vec<(MenuId, KeepAliveFn)>,
}

impl<T: Terminal> UiContext<T> {
    pub fn new(term: T, config: UiConfig) -> Self {
        Self::with_keymaps(term, config, Keymaps::new())
    }

    pub fn with_keymaps(term: T, config: UiConfig, keymaps: Keymaps) -> Self {
        let (cols, rows) = term.size();
        let mut tree = WindowTree::new(Orientation::Vertical, cols, rows, Role::Container);
        let root = tree.root();

        let help_bar = tree.create(
            WindowType::HelpBar,
            Orientation::Vertical,
            SizePolicy::Fixed,
            Extent::Unlimited,
            Extent::Cells(1),
            Role::HelpBar(HelpBar::new()),
        );
        let all_dialogs = tree.create(
            WindowType::AllDialogs,
            Orientation::Vertical,
            SizePolicy::Maximise,
            Extent::Unlimited,
            Extent::Unlimited,
            Role::Container,
        );
        let message_container = tree.create(
            WindowType::MessageContainer,
            Orientation::Vertical,
            SizePolicy::Minimise,
            Extent::Unlimited,
            Extent::Unlimited,
            Role::Container,
        );
        let message = tree.create(
            WindowType::Message,
            Orientation::Vertical,
            SizePolicy::Fixed,
            Extent::Unlimited,
            Extent::Cells(1),
            Role::Message(MessageWindow::new()),
        );

        if config.status_on_top {
            tree.add_child(root, all_dialogs);
            tree.add_child(root, help_bar);
        } else {
            tree.add_child(root, help_bar);
            tree.add_child(root, all_dialogs);
        }
        tree.add_child(message_container, message);
        tree.add_child(root, message_container);
        tree.set_visible(help_bar, config.help);
        tree.request(root, WindowActions::REFLOW);
        tree.invalidate_all();

        tracing::debug!(cols, rows, "ui context created");
        Self {
            tree,
            keymaps,
            queue: EventQueue::new(),
            term,
            config,
            colors: ColorConfig::default(),
            layout: RootLayout {
                help_bar,
                all_dialogs,
                message_container,
                message,
            },
            current_menu: MenuId::GENERIC,
            ignore_macro: false,
            tag_prefix: false,
            keep_alive: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn tree(&self) -> &WindowTree<Role> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WindowTree<Role> {
        &mut self.tree
    }

    pub fn layout(&self) -> RootLayout {
        self.layout
    }

    pub fn keymaps(&self) -> &Keymaps {
        &self.keymaps
    }

    pub fn keymaps_mut(&mut self) -> &mut Keymaps {
        &mut self.keymaps
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut EventQueue {
        &mut self.queue
    }

    pub fn terminal(&self) -> &T {
        &self.term
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.term
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn colors(&self) -> &ColorConfig {
        &self.colors
    }

    /// The menu the dispatcher last read keys for.
    pub fn current_menu(&self) -> MenuId {
        self.current_menu
    }

    pub fn is_tag_prefix(&self) -> bool {
        self.tag_prefix
    }

    pub fn ignore_macro(&self) -> bool {
        self.ignore_macro
    }

    /// Stop (or resume) reading queued macro events. Returns the old value.
    pub fn set_ignore_macro(&mut self, ignore: bool) -> bool {
        std::mem::replace(&mut self.ignore_macro, ignore)
    }

    /// Tear the context down, handing the terminal back.
    pub fn into_terminal(self) -> T {
        self.term
    }

    // -----------------------------------------------------------------------
    // Windows
    // -----------------------------------------------------------------------

    pub fn create_window(
        &mut self,
        kind: WindowType,
        orient: Orientation,
        size: SizePolicy,
        cols: Extent,
        rows: Extent,
        role: Role,
    ) -> WindowId {
        self.tree.create(kind, orient, size, cols, rows, role)
    }

    /// The client of `win`, if it is a `C`.
    pub fn client_mut<C: 'static>(&mut self, win: WindowId) -> Option<&mut C> {
        match self.tree.data_mut(win)? {
            Role::Client(client) => client.as_any_mut().downcast_mut::<C>(),
            _ => None,
        }
    }

    /// Make `win` the focused leaf. Returns the old one if focus moved.
    pub fn set_focus(&mut self, win: WindowId) -> Option<WindowId> {
        let old = self.tree.set_focus(win);
        if old.is_some() {
            self.refresh_help();
        }
        old
    }

    pub fn focus(&self) -> Option<WindowId> {
        self.tree.focus()
    }

    /// Mark `win` for repaint.
    pub fn repaint(&mut self, win: WindowId) {
        self.tree.request(win, WindowActions::REPAINT);
    }

    /// Mark `win` for recalc and repaint.
    pub fn recalc(&mut self, win: WindowId) {
        self.tree.request(win, WindowActions::RECALC | WindowActions::REPAINT);
    }

    /// Point the help bar at the focused window's hints.
    pub(crate) fn refresh_help(&mut self) {
        let mut source = (None, Vec::new());
        let mut cur = self.tree.focus();
        while let Some(win) = cur.and_then(|w| self.tree.get(w)) {
            if win.help_menu.is_some() {
                source = (win.help_menu, win.help_data.clone());
                break;
            }
            cur = win.parent();
        }
        let bar = self.layout.help_bar;
        if let Some(Role::HelpBar(help)) = self.tree.data_mut(bar) {
            if help.set_source(source.0, &source.1) {
                self.tree.request(bar, WindowActions::RECALC | WindowActions::REPAINT);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// Subscribe to events sent anywhere in the window tree.
    pub fn observe(
        &mut self,
        types: EventTypes,
        callback: impl FnMut(&Event) -> Result<(), ObserverError> + 'static,
    ) -> Option<ObserverId> {
        let root = self.tree.root();
        let notifier = self.tree.get(root)?.notifier();
        self.tree
            .bus_mut()
            .observer_add(notifier, types, Box::new(callback))
    }

    pub fn unobserve(&mut self, observer: ObserverId) -> bool {
        let root = self.tree.root();
        match self.tree.get(root).map(|w| w.notifier()) {
            Some(notifier) => self.tree.bus_mut().observer_remove(notifier, observer),
            None => false,
        }
    }

    /// Send a non-window event from the root.
    pub fn send(&mut self, event: &Event) -> bool {
        let root = self.tree.root();
        self.tree.send(root, event)
    }

    /// Forward queued binding changes to the observers.
    pub fn flush_notifications(&mut self) {
        let events = self.keymaps.take_events();
        if events.is_empty() {
            return;
        }
        for ev in events {
            self.send(&Event::Binding(ev));
        }
        self.refresh_help();
        let bar = self.layout.help_bar;
        self.recalc(bar);
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Change the configuration and announce option `name`.
    pub fn update_config(&mut self, name: &str, f: impl FnOnce(&mut UiConfig)) {
        let before = self.config.clone();
        f(&mut self.config);
        if before == self.config {
            return;
        }
        self.apply_config(&before);
        tracing::debug!(option = name, "config changed");
        self.send(&Event::Config(ConfigEvent {
            kind: ConfigEventKind::Set,
            name: name.to_string(),
        }));
    }

    /// Restore the default configuration.
    pub fn reset_config(&mut self) {
        let before = std::mem::take(&mut self.config);
        self.apply_config(&before);
        self.send(&Event::Config(ConfigEvent {
            kind: ConfigEventKind::Reset,
            name: String::from("*"),
        }));
    }

    fn apply_config(&mut self, before: &UiConfig) {
        let root = self.tree.root();
        if before.status_on_top != self.config.status_on_top {
            let on_top = self.config.status_on_top;
            let index = usize::from(on_top);
            self.tree.move_child(root, self.layout.help_bar, index);
            let dialogs = self.tree.children(self.layout.all_dialogs).to_vec();
            for dlg in dialogs {
                self.tree.status_on_top(dlg, on_top);
            }
        }
        if before.help != self.config.help {
            self.tree.set_visible(self.layout.help_bar, self.config.help);
        }
        self.tree.request(root, WindowActions::REFLOW);
        self.tree.invalidate_all();
    }

    pub fn set_color(&mut self, id: ColorId, color: AttrColor) {
        self.colors.set(id, color);
        self.color_changed(ColorEventKind::Set, id);
    }

    pub fn reset_color(&mut self, id: ColorId) {
        self.colors.set(id, ColorConfig::default().get(id));
        self.color_changed(ColorEventKind::Reset, id);
    }

    /// Edit the colour configuration wholesale (regex lists, palette).
    pub fn update_colors(&mut self, f: impl FnOnce(&mut ColorConfig)) {
        f(&mut self.colors);
        self.color_changed(ColorEventKind::Set, ColorId::Normal);
    }

    fn color_changed(&mut self, kind: ColorEventKind, id: ColorId) {
        self.send(&Event::Color(ColorEvent {
            kind,
            color: id.index() as u16,
        }));
        self.tree.invalidate_all();
    }

    // -----------------------------------------------------------------------
    // Message line
    // -----------------------------------------------------------------------

    /// Show `text` on the message line in colour `id`.
    pub fn message_set(&mut self, text: impl AsRef<[u8]>, id: ColorId) {
        let color = self.colors.merged(id);
        let win = self.layout.message;
        let cols = self.tree.state(win).map_or(0, |s| s.cols);
        let Some(Role::Message(mw)) = self.tree.data_mut(win) else {
            return;
        };
        if !mw.set_text(text.as_ref(), color) {
            return;
        }
        let rows = MessageWindow::clamp_rows(mw.calc_rows(cols));
        self.set_message_rows(rows);
        self.recalc(win);
    }

    /// Append to the message line; `None` lays out what was added.
    pub fn message_add(&mut self, text: Option<&[u8]>, color: AttrColor) {
        let win = self.layout.message;
        let cols = self.tree.state(win).map_or(0, |s| s.cols);
        let Some(Role::Message(mw)) = self.tree.data_mut(win) else {
            return;
        };
        match text {
            Some(text) => mw.add_text(text, color),
            None => {
                let rows = MessageWindow::clamp_rows(mw.calc_rows(cols));
                self.set_message_rows(rows);
                self.recalc(win);
            }
        }
    }

    pub fn message_clear(&mut self) {
        self.message_set("", ColorId::Normal);
    }

    pub fn message_text(&self) -> String {
        match self.tree.data(self.layout.message) {
            Some(Role::Message(mw)) => String::from_utf8_lossy(mw.text()).into_owned(),
            _ => String::new(),
        }
    }

    /// Informational message.
    pub fn message(&mut self, text: &str) {
        tracing::debug!(message = text, "message");
        self.message_set(text, ColorId::Message);
    }

    /// Error message.
    pub fn error(&mut self, text: &str) {
        tracing::debug!(error = text, "error message");
        self.message_set(text, ColorId::Error);
    }

    /// Ask for `rows` message rows, reflowing if that changes the layout.
    pub(crate) fn set_message_rows(&mut self, rows: u16) -> bool {
        let win = self.layout.message;
        let Some(w) = self.tree.get_mut(win) else {
            return false;
        };
        if w.req_rows == Extent::Cells(rows) && w.state.rows == rows {
            return false;
        }
        w.req_rows = Extent::Cells(rows);
        let root = self.tree.root();
        self.tree.request(root, WindowActions::REFLOW);
        true
    }

    // -----------------------------------------------------------------------
    // Terminal
    // -----------------------------------------------------------------------

    /// Run `f` with the terminal handed back to the shell, e.g. while an
    /// external command runs. Everything is repainted afterwards.
    pub fn with_terminal_released<R>(&mut self, f: impl FnOnce() -> R) -> io::Result<R> {
        self.term.suspend()?;
        let result = f();
        self.term.resume()?;
        self.term.clear();
        self.tree.invalidate_all();
        Ok(result)
    }

    /// Register a hook run periodically while waiting for keys in `menu`.
    pub fn set_keep_alive(&mut self, menu: MenuId, hook: impl FnMut() + 'static) {
        self.keep_alive.retain(|(m, _)| *m != menu);
        self.keep_alive.push((menu, Box::new(hook)));
    }

    pub fn clear_keep_alive(&mut self, menu: MenuId) {
        self.keep_alive.retain(|(m, _)| *m != menu);
    }

    /// Adopt a new screen size.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if self.tree.set_root_size(cols, rows) {
            self.term.clear();
            self.tree.invalidate_all();
            self.send(&Event::Resize { cols, rows });
        }
    }
}

impl<T: Terminal> std::fmt::Debug for UiContext<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiContext")
            .field("layout", &self.layout)
            .field("current_menu", &self.current_menu)
            .field("ignore_macro", &self.ignore_macro)
            .field("tag_prefix", &self.tag_prefix)
            .finish_non_exhaustive()
    }
}
