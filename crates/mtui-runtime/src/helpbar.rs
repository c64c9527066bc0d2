#![forbid(unsafe_code)]

//! The help bar: a row of `key:Label` hints for the focused window.

use mtui_core::{MenuId, Op};
use mtui_keymap::Keymaps;
use mtui_layout::{Canvas, HelpEntry};
use mtui_style::ColorId;

use crate::role::RenderEnv;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpBar {
    menu: Option<MenuId>,
    entries: Vec<HelpEntry>,
    text: String,
}

impl HelpBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Take the hints of the focused window. Returns `true` if they changed.
    pub fn set_source(&mut self, menu: Option<MenuId>, entries: &[HelpEntry]) -> bool {
        if self.menu == menu && self.entries == entries {
            return false;
        }
        self.menu = menu;
        self.entries = entries.to_vec();
        true
    }

    pub fn recalc(&mut self, keymaps: &Keymaps) {
        self.text = match self.menu {
            Some(menu) => format_help(keymaps, menu, &self.entries),
            None => String::new(),
        };
    }

    pub fn repaint(&self, canvas: &mut Canvas<'_>, env: &RenderEnv<'_>) {
        canvas.move_to(0, 0);
        canvas.set_color(env.colors.merged(ColorId::Status));
        canvas.add_str(&self.text);
        canvas.clear_to_eol();
        canvas.set_color(env.colors.get(ColorId::Normal));
    }
}

fn key_for(keymaps: &Keymaps, menu: MenuId, op: Op) -> Option<String> {
    keymaps.expand_key(menu, op).or_else(|| {
        menu.inherits_generic()
            .then(|| keymaps.expand_key(MenuId::GENERIC, op))
            .flatten()
    })
}

/// `q:Exit  ?:Help` for the entries that have a key in `menu`.
pub fn format_help(keymaps: &Keymaps, menu: MenuId, entries: &[HelpEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let Some(key) = key_for(keymaps, menu, entry.op) else {
            continue;
        };
        if !out.is_empty() {
            out.push_str("  ");
        }
        out.push_str(&key);
        out.push(':');
        out.push_str(&entry.label);
    }
    out
}
