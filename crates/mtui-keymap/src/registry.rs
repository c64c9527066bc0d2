#![forbid(unsafe_code)]

//! Every menu's keymap, plus the commands that edit them.
//!
//! Edits queue [`BindingEvent`]s; the owner drains them with
//! [`Keymaps::take_events`] and forwards them to the notification bus.

use std::fmt;

use mtui_core::notify::{BindingEvent, BindingEventKind};
use mtui_core::{Keycode, MenuId, Op};

use crate::error::{BindError, KeyParseError};
use crate::keymap::{Action, KeyBinding, Keymap};
use crate::keys::{expand_keys, parse_keys};
use crate::menus::{
    DIALOG_DEFAULT_BINDINGS, EDITOR_DEFAULT_BINDINGS, GENERIC_DEFAULT_BINDINGS, MenuFuncOp,
    MenuOpSeq, OP_DIALOG, OP_EDITOR, OP_GENERIC, OP_PAGER, PAGER_DEFAULT_BINDINGS, get_func_name,
    get_op,
};
use crate::ops::{OP_EDITOR_BACKSPACE, OP_ENTER_COMMAND, OP_EXIT, OP_HELP, OP_SELECT_ENTRY};

/// A new binding made an older, different-length one unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowWarning {
    pub menu: String,
    pub keys: String,
    pub shadowed: String,
}

impl fmt::Display for ShadowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Binding '{}' will alias '{}'  Before, try: 'bind {} {} noop'",
            self.keys, self.shadowed, self.menu, self.shadowed
        )
    }
}

#[derive(Debug, Clone)]
struct MenuDef {
    name: String,
    functions: &'static [MenuFuncOp],
    defaults: &'static [MenuOpSeq],
}

/// All menus and their keymaps.
#[derive(Debug, Clone)]
pub struct Keymaps {
    menus: Vec<MenuDef>,
    maps: Vec<Keymap>,
    events: Vec<BindingEvent>,
}

impl Default for Keymaps {
    fn default() -> Self {
        Self::new()
    }
}

impl Keymaps {
    /// The built-in menus (generic, dialog, editor, pager) with their
    /// default bindings.
    pub fn new() -> Self {
        let mut km = Self {
            menus: Vec::new(),
            maps: Vec::new(),
            events: Vec::new(),
        };
        km.register_menu("generic", OP_GENERIC, GENERIC_DEFAULT_BINDINGS);
        km.register_menu("dialog", OP_DIALOG, DIALOG_DEFAULT_BINDINGS);
        km.register_menu("editor", OP_EDITOR, EDITOR_DEFAULT_BINDINGS);
        km.register_menu("pager", OP_PAGER, PAGER_DEFAULT_BINDINGS);
        km
    }

    /// Add a menu and bind its defaults.
    ///
    /// Registering a name twice returns the existing menu unchanged.
    pub fn register_menu(
        &mut self,
        name: &str,
        functions: &'static [MenuFuncOp],
        defaults: &'static [MenuOpSeq],
    ) -> MenuId {
        if let Some(id) = self.menu_id(name) {
            return id;
        }
        let id = MenuId(self.menus.len() as u16);
        self.menus.push(MenuDef {
            name: name.to_string(),
            functions,
            defaults,
        });
        self.maps.push(Keymap::new());
        self.bind_defaults(id);
        tracing::debug!(menu = name, id = id.0, "menu registered");
        id
    }

    fn bind_defaults(&mut self, id: MenuId) {
        let Some(def) = self.menus.get(id.index()) else {
            return;
        };
        for seq in def.defaults {
            match parse_keys(seq.keys) {
                Ok(keys) => {
                    self.maps[id.index()].insert(KeyBinding::new(keys, Action::Op(seq.op)));
                }
                Err(err) => {
                    tracing::error!(menu = %def.name, keys = seq.keys, %err, "bad default binding");
                }
            }
        }
    }

    pub fn menu_id(&self, name: &str) -> Option<MenuId> {
        self.menus
            .iter()
            .position(|m| m.name == name)
            .map(|i| MenuId(i as u16))
    }

    pub fn menu_name(&self, id: MenuId) -> Option<&str> {
        self.menus.get(id.index()).map(|m| m.name.as_str())
    }

    pub fn menu_ids(&self) -> impl Iterator<Item = MenuId> + '_ {
        (0..self.menus.len()).map(|i| MenuId(i as u16))
    }

    pub fn keymap(&self, id: MenuId) -> Option<&Keymap> {
        self.maps.get(id.index())
    }

    /// The menu's own function table.
    pub fn functions(&self, id: MenuId) -> &'static [MenuFuncOp] {
        self.menus.get(id.index()).map_or(&[], |m| m.functions)
    }

    /// The operation `name` means in `menu`.
    ///
    /// Menus that inherit the generic functions look there first.
    pub fn resolve_function(&self, menu: MenuId, name: &str) -> Option<Op> {
        if menu.inherits_generic() {
            if let Some(op) = get_op(OP_GENERIC, name) {
                return Some(op);
            }
        }
        get_op(self.functions(menu), name)
    }

    /// Can `op` be delivered while `menu` is active?
    pub fn op_valid(&self, menu: MenuId, op: Op) -> bool {
        get_func_name(self.functions(menu), op).is_some()
            || (menu.inherits_generic() && get_func_name(OP_GENERIC, op).is_some())
    }

    /// Name of `op` as `menu` knows it.
    pub fn function_name(&self, menu: MenuId, op: Op) -> Option<&'static str> {
        get_func_name(self.functions(menu), op).or_else(|| {
            menu.inherits_generic()
                .then(|| get_func_name(OP_GENERIC, op))
                .flatten()
        })
    }

    /// Name of `op` in whichever menu knows it, generic first.
    pub fn any_function_name(&self, op: Op) -> Option<&'static str> {
        self.menus
            .iter()
            .find_map(|m| get_func_name(m.functions, op))
    }

    /// The operation called `name` in any menu, generic first.
    pub fn any_function_op(&self, name: &str) -> Option<Op> {
        self.menus.iter().find_map(|m| get_op(m.functions, name))
    }

    /// Parse a comma-separated menu list. `*` means every menu when
    /// `allow_all` is set.
    pub fn parse_menus(&self, list: &str, allow_all: bool) -> Result<Vec<MenuId>, BindError> {
        if allow_all && list == "*" {
            return Ok(self.menu_ids().collect());
        }
        let mut ids = Vec::new();
        for name in list.split(',').map(str::trim) {
            let id = self
                .menu_id(name)
                .ok_or_else(|| BindError::UnknownMenu(name.to_string()))?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn insert(&mut self, menu: MenuId, binding: KeyBinding) -> Option<ShadowWarning> {
        let keys = expand_keys(binding.keys());
        let shadowed = self.maps[menu.index()].insert(binding);
        let first = shadowed.first()?;
        let warning = ShadowWarning {
            menu: self.menu_name(menu).unwrap_or_default().to_string(),
            keys,
            shadowed: expand_keys(first),
        };
        tracing::warn!(%warning, "binding shadowed");
        Some(warning)
    }

    /// Bind `keys` to `op` in one menu.
    pub fn bind_op(
        &mut self,
        menu: MenuId,
        keys: &str,
        op: Op,
    ) -> Result<Option<ShadowWarning>, BindError> {
        if menu.index() >= self.maps.len() {
            return Err(BindError::UnknownMenu(format!("#{}", menu.0)));
        }
        let codes = parse_bind_keys(keys)?;
        let warning = self.insert(menu, KeyBinding::new(codes.clone(), Action::Op(op)));
        self.events.push(BindingEvent {
            kind: BindingEventKind::Add,
            menu,
            key: Some(expand_keys(&codes)),
            op,
        });
        Ok(warning)
    }

    /// `bind <menus> <keys> <function>`.
    ///
    /// The function `noop` removes the binding instead.
    pub fn bind(
        &mut self,
        menus: &str,
        keys: &str,
        function: &str,
    ) -> Result<Vec<ShadowWarning>, BindError> {
        let ids = self.parse_menus(menus, false)?;
        let codes = parse_bind_keys(keys)?;

        if function == "noop" {
            for id in ids {
                self.maps[id.index()].remove(&codes, |_| true);
                self.push_key_event(BindingEventKind::Delete, id, &codes);
            }
            return Ok(Vec::new());
        }

        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            let op = self
                .resolve_function(id, function)
                .ok_or_else(|| BindError::UnknownFunction {
                    function: function.to_string(),
                    menu: self.menu_name(id).unwrap_or_default().to_string(),
                })?;
            resolved.push((id, op));
        }

        let mut warnings = Vec::new();
        for (id, op) in resolved {
            warnings.extend(self.insert(id, KeyBinding::new(codes.clone(), Action::Op(op))));
            tracing::debug!(menu = self.menu_name(id), keys, function, "bind");
            self.events.push(BindingEvent {
                kind: BindingEventKind::Add,
                menu: id,
                key: Some(expand_keys(&codes)),
                op,
            });
        }
        Ok(warnings)
    }

    /// `macro <menus> <keys> <text> [description]`.
    pub fn macro_bind(
        &mut self,
        menus: &str,
        keys: &str,
        text: &str,
        description: Option<&str>,
    ) -> Result<Vec<ShadowWarning>, BindError> {
        let ids = self.parse_menus(menus, false)?;
        let codes = parse_keys(keys).map_err(|err| match err {
            KeyParseError::Empty => BindError::EmptyMacroKey,
            other => BindError::Key(other),
        })?;

        let mut warnings = Vec::new();
        for id in ids {
            let mut binding = KeyBinding::new(codes.clone(), Action::Macro(text.to_string()));
            if let Some(desc) = description {
                binding = binding.with_description(desc);
            }
            warnings.extend(self.insert(id, binding));
            tracing::debug!(menu = self.menu_name(id), keys, "macro");
            self.push_key_event(BindingEventKind::MacroAdd, id, &codes);
        }
        Ok(warnings)
    }

    /// `unbind <menus|*> [keys]`.
    ///
    /// Without keys every plain binding in the menus goes, after which a
    /// minimal set (select, enter-command, help, exit, editor backspace) is
    /// restored so the interface stays usable.
    pub fn unbind(&mut self, menus: &str, keys: Option<&str>) -> Result<(), BindError> {
        self.unbind_impl(menus, keys, false)
    }

    /// `unmacro <menus|*> [keys]`: like [`unbind`](Self::unbind) for macros,
    /// without the restore step.
    pub fn unmacro(&mut self, menus: &str, keys: Option<&str>) -> Result<(), BindError> {
        self.unbind_impl(menus, keys, true)
    }

    fn unbind_impl(
        &mut self,
        menus: &str,
        keys: Option<&str>,
        macros: bool,
    ) -> Result<(), BindError> {
        let ids = self.parse_menus(menus, true)?;
        let codes = keys.map(parse_bind_keys).transpose()?;

        for id in ids {
            match &codes {
                Some(codes) => {
                    self.maps[id.index()].remove(codes, |e| e.is_macro() == macros);
                    let kind = if macros {
                        BindingEventKind::MacroDelete
                    } else {
                        BindingEventKind::Delete
                    };
                    self.push_key_event(kind, id, codes);
                }
                None => {
                    let removed = self.maps[id.index()].clear(macros);
                    tracing::debug!(menu = self.menu_name(id), removed, macros, "unbind all");
                    if !macros {
                        self.restore_minimal(id);
                    }
                    self.events.push(BindingEvent {
                        kind: if macros {
                            BindingEventKind::MacroDeleteAll
                        } else {
                            BindingEventKind::DeleteAll
                        },
                        menu: id,
                        key: None,
                        op: Op::NULL,
                    });
                }
            }
        }
        Ok(())
    }

    fn restore_minimal(&mut self, id: MenuId) {
        let mut quiet = |menu: MenuId, keys: &str, op: Op| {
            if let Ok(codes) = parse_keys(keys) {
                self.maps[menu.index()].insert(KeyBinding::new(codes, Action::Op(op)));
            }
        };
        quiet(MenuId::GENERIC, "<enter>", OP_SELECT_ENTRY);
        quiet(MenuId::GENERIC, "<return>", OP_SELECT_ENTRY);
        quiet(MenuId::EDITOR, "<backspace>", OP_EDITOR_BACKSPACE);
        quiet(MenuId::EDITOR, "^?", OP_EDITOR_BACKSPACE);
        quiet(MenuId::GENERIC, ":", OP_ENTER_COMMAND);
        quiet(MenuId::PAGER, ":", OP_ENTER_COMMAND);
        if id != MenuId::EDITOR {
            quiet(id, "?", OP_HELP);
            quiet(id, "q", OP_EXIT);
        }
    }

    fn push_key_event(&mut self, kind: BindingEventKind, menu: MenuId, codes: &[Keycode]) {
        self.events.push(BindingEvent {
            kind,
            menu,
            key: Some(expand_keys(codes)),
            op: Op::NULL,
        });
    }

    /// First binding of `op` in `menu`.
    pub fn find_func(&self, menu: MenuId, op: Op) -> Option<&KeyBinding> {
        self.keymap(menu)?.find_op(op)
    }

    /// Printable key string for `op` in `menu`.
    pub fn expand_key(&self, menu: MenuId, op: Op) -> Option<String> {
        self.find_func(menu, op).map(|b| expand_keys(b.keys()))
    }

    /// The message shown when an unbound key is pressed.
    pub fn not_bound_message(&self, menu: MenuId) -> String {
        let help = self.expand_key(menu, OP_HELP).or_else(|| {
            (menu != MenuId::EDITOR && menu != MenuId::PAGER)
                .then(|| self.expand_key(MenuId::GENERIC, OP_HELP))
                .flatten()
        });
        match help {
            Some(key) => format!("Key is not bound.  Press '{key}' for help."),
            None => "Key is not bound.".to_string(),
        }
    }

    /// Drain the queued binding notifications.
    pub fn take_events(&mut self) -> Vec<BindingEvent> {
        std::mem::take(&mut self.events)
    }
}

fn parse_bind_keys(keys: &str) -> Result<Vec<Keycode>, BindError> {
    parse_keys(keys).map_err(|err| match err {
        KeyParseError::Empty => BindError::NullKey,
        other => BindError::Key(other),
    })
}
