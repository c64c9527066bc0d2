#![forbid(unsafe_code)]

//! Function tables and default bindings of the built-in menus.

use mtui_core::Op;

use crate::ops::*;

/// A function name a menu understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuFuncOp {
    pub name: &'static str,
    pub op: Op,
}

/// A default binding, as a key string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuOpSeq {
    pub op: Op,
    pub keys: &'static str,
}

const fn f(name: &'static str, op: Op) -> MenuFuncOp {
    MenuFuncOp { name, op }
}

const fn b(op: Op, keys: &'static str) -> MenuOpSeq {
    MenuOpSeq { op, keys }
}

/// The operation a table calls `name`.
pub fn get_op(funcs: &[MenuFuncOp], name: &str) -> Option<Op> {
    funcs.iter().find(|f| f.name == name).map(|f| f.op)
}

/// The first name a table gives `op`.
pub fn get_func_name(funcs: &[MenuFuncOp], op: Op) -> Option<&'static str> {
    funcs.iter().find(|f| f.op == op).map(|f| f.name)
}

/// Functions shared by every menu except the editor and the pager.
pub static OP_GENERIC: &[MenuFuncOp] = &[
    f("bottom-page", OP_BOTTOM_PAGE),
    f("check-stats", OP_CHECK_STATS),
    f("current-bottom", OP_CURRENT_BOTTOM),
    f("current-middle", OP_CURRENT_MIDDLE),
    f("current-top", OP_CURRENT_TOP),
    f("end-cond", OP_END_COND),
    f("enter-command", OP_ENTER_COMMAND),
    f("exit", OP_EXIT),
    f("first-entry", OP_FIRST_ENTRY),
    f("half-down", OP_HALF_DOWN),
    f("half-up", OP_HALF_UP),
    f("help", OP_HELP),
    f("jump", OP_JUMP),
    f("last-entry", OP_LAST_ENTRY),
    f("middle-page", OP_MIDDLE_PAGE),
    f("next-entry", OP_NEXT_ENTRY),
    f("next-line", OP_NEXT_LINE),
    f("next-page", OP_NEXT_PAGE),
    f("previous-entry", OP_PREV_ENTRY),
    f("previous-line", OP_PREV_LINE),
    f("previous-page", OP_PREV_PAGE),
    f("refresh", OP_REDRAW),
    f("search", OP_SEARCH),
    f("search-next", OP_SEARCH_NEXT),
    f("search-opposite", OP_SEARCH_OPPOSITE),
    f("search-reverse", OP_SEARCH_REVERSE),
    f("select-entry", OP_SELECT_ENTRY),
    f("shell-escape", OP_SHELL_ESCAPE),
    f("tag-entry", OP_TAG),
    f("tag-prefix", OP_TAG_PREFIX),
    f("tag-prefix-cond", OP_TAG_PREFIX_COND),
    f("top-page", OP_TOP_PAGE),
    f("what-key", OP_WHAT_KEY),
];

pub static GENERIC_DEFAULT_BINDINGS: &[MenuOpSeq] = &[
    b(OP_BOTTOM_PAGE, "L"),
    b(OP_ENTER_COMMAND, ":"),
    b(OP_EXIT, "q"),
    b(OP_FIRST_ENTRY, "<home>"),
    b(OP_FIRST_ENTRY, "="),
    b(OP_HALF_DOWN, "]"),
    b(OP_HALF_UP, "["),
    b(OP_HELP, "?"),
    b(OP_LAST_ENTRY, "*"),
    b(OP_LAST_ENTRY, "<end>"),
    b(OP_MIDDLE_PAGE, "M"),
    b(OP_NEXT_ENTRY, "<down>"),
    b(OP_NEXT_ENTRY, "j"),
    b(OP_NEXT_LINE, ">"),
    b(OP_NEXT_PAGE, "<pagedown>"),
    b(OP_NEXT_PAGE, "<right>"),
    b(OP_NEXT_PAGE, "z"),
    b(OP_PREV_ENTRY, "<up>"),
    b(OP_PREV_ENTRY, "k"),
    b(OP_PREV_LINE, "<"),
    b(OP_PREV_PAGE, "<left>"),
    b(OP_PREV_PAGE, "<pageup>"),
    b(OP_PREV_PAGE, "Z"),
    b(OP_REDRAW, "^L"),
    b(OP_SEARCH, "/"),
    b(OP_SEARCH_NEXT, "n"),
    b(OP_SEARCH_REVERSE, "\\e/"),
    b(OP_SELECT_ENTRY, "<enter>"),
    b(OP_SELECT_ENTRY, "<return>"),
    b(OP_SELECT_ENTRY, "<keypadenter>"),
    b(OP_SHELL_ESCAPE, "!"),
    b(OP_TAG, "t"),
    b(OP_TAG_PREFIX, ";"),
    b(OP_TOP_PAGE, "H"),
];

/// Simple list dialogs use the generic functions only.
pub static OP_DIALOG: &[MenuFuncOp] = &[];
pub static DIALOG_DEFAULT_BINDINGS: &[MenuOpSeq] = &[];

pub static OP_EDITOR: &[MenuFuncOp] = &[
    f("backspace", OP_EDITOR_BACKSPACE),
    f("backward-char", OP_EDITOR_BACKWARD_CHAR),
    f("backward-word", OP_EDITOR_BACKWARD_WORD),
    f("bol", OP_EDITOR_BOL),
    f("capitalize-word", OP_EDITOR_CAPITALIZE_WORD),
    f("complete", OP_EDITOR_COMPLETE),
    f("complete-query", OP_EDITOR_COMPLETE_QUERY),
    f("delete-char", OP_EDITOR_DELETE_CHAR),
    f("downcase-word", OP_EDITOR_DOWNCASE_WORD),
    f("eol", OP_EDITOR_EOL),
    f("forward-char", OP_EDITOR_FORWARD_CHAR),
    f("forward-word", OP_EDITOR_FORWARD_WORD),
    f("help", OP_HELP),
    f("history-down", OP_EDITOR_HISTORY_DOWN),
    f("history-search", OP_EDITOR_HISTORY_SEARCH),
    f("history-up", OP_EDITOR_HISTORY_UP),
    f("kill-eol", OP_EDITOR_KILL_EOL),
    f("kill-eow", OP_EDITOR_KILL_EOW),
    f("kill-line", OP_EDITOR_KILL_LINE),
    f("kill-whole-line", OP_EDITOR_KILL_WHOLE_LINE),
    f("kill-word", OP_EDITOR_KILL_WORD),
    f("quote-char", OP_EDITOR_QUOTE_CHAR),
    f("redraw-screen", OP_REDRAW),
    f("transpose-chars", OP_EDITOR_TRANSPOSE_CHARS),
    f("upcase-word", OP_EDITOR_UPCASE_WORD),
];

pub static EDITOR_DEFAULT_BINDINGS: &[MenuOpSeq] = &[
    b(OP_EDITOR_BACKSPACE, "<backspace>"),
    b(OP_EDITOR_BACKSPACE, "^H"),
    b(OP_EDITOR_BACKSPACE, "^?"),
    b(OP_EDITOR_BACKWARD_CHAR, "<left>"),
    b(OP_EDITOR_BACKWARD_CHAR, "^B"),
    b(OP_EDITOR_BACKWARD_WORD, "\\eb"),
    b(OP_EDITOR_BOL, "<home>"),
    b(OP_EDITOR_BOL, "^A"),
    b(OP_EDITOR_CAPITALIZE_WORD, "\\ec"),
    b(OP_EDITOR_COMPLETE, "<tab>"),
    b(OP_EDITOR_COMPLETE_QUERY, "^T"),
    b(OP_EDITOR_DELETE_CHAR, "<delete>"),
    b(OP_EDITOR_DELETE_CHAR, "^D"),
    b(OP_EDITOR_DOWNCASE_WORD, "\\el"),
    b(OP_EDITOR_EOL, "<end>"),
    b(OP_EDITOR_EOL, "^E"),
    b(OP_EDITOR_FORWARD_CHAR, "<right>"),
    b(OP_EDITOR_FORWARD_CHAR, "^F"),
    b(OP_EDITOR_FORWARD_WORD, "\\ef"),
    b(OP_EDITOR_HISTORY_DOWN, "<down>"),
    b(OP_EDITOR_HISTORY_DOWN, "^N"),
    b(OP_EDITOR_HISTORY_SEARCH, "^R"),
    b(OP_EDITOR_HISTORY_UP, "<up>"),
    b(OP_EDITOR_HISTORY_UP, "^P"),
    b(OP_EDITOR_KILL_EOL, "^K"),
    b(OP_EDITOR_KILL_EOW, "\\ed"),
    b(OP_EDITOR_KILL_LINE, "^U"),
    b(OP_EDITOR_KILL_WORD, "^W"),
    b(OP_EDITOR_QUOTE_CHAR, "^V"),
    b(OP_EDITOR_UPCASE_WORD, "\\eu"),
    b(OP_HELP, "\\e?"),
    b(OP_REDRAW, "^L"),
];

pub static OP_PAGER: &[MenuFuncOp] = &[
    f("bottom", OP_PAGER_BOTTOM),
    f("enter-command", OP_ENTER_COMMAND),
    f("exit", OP_EXIT),
    f("half-down", OP_HALF_DOWN),
    f("half-up", OP_HALF_UP),
    f("help", OP_HELP),
    f("next-entry", OP_NEXT_ENTRY),
    f("next-line", OP_NEXT_LINE),
    f("next-page", OP_NEXT_PAGE),
    f("previous-entry", OP_PREV_ENTRY),
    f("previous-line", OP_PREV_LINE),
    f("previous-page", OP_PREV_PAGE),
    f("redraw-screen", OP_REDRAW),
    f("search", OP_SEARCH),
    f("search-next", OP_SEARCH_NEXT),
    f("search-opposite", OP_SEARCH_OPPOSITE),
    f("search-reverse", OP_SEARCH_REVERSE),
    f("search-toggle", OP_SEARCH_TOGGLE),
    f("shell-escape", OP_SHELL_ESCAPE),
    f("skip-headers", OP_PAGER_SKIP_HEADERS),
    f("skip-quoted", OP_PAGER_SKIP_QUOTED),
    f("toggle-quoted", OP_PAGER_HIDE_QUOTED),
    f("top", OP_PAGER_TOP),
    f("what-key", OP_WHAT_KEY),
];

pub static PAGER_DEFAULT_BINDINGS: &[MenuOpSeq] = &[
    b(OP_ENTER_COMMAND, ":"),
    b(OP_EXIT, "i"),
    b(OP_EXIT, "q"),
    b(OP_EXIT, "x"),
    b(OP_HALF_DOWN, "]"),
    b(OP_HALF_UP, "["),
    b(OP_HELP, "?"),
    b(OP_NEXT_ENTRY, "J"),
    b(OP_NEXT_LINE, "<down>"),
    b(OP_NEXT_LINE, "<enter>"),
    b(OP_NEXT_LINE, "<keypadenter>"),
    b(OP_NEXT_LINE, "<return>"),
    b(OP_NEXT_PAGE, "<pagedown>"),
    b(OP_NEXT_PAGE, "<space>"),
    b(OP_PAGER_BOTTOM, "<end>"),
    b(OP_PAGER_BOTTOM, "$"),
    b(OP_PAGER_HIDE_QUOTED, "T"),
    b(OP_PAGER_SKIP_HEADERS, "H"),
    b(OP_PAGER_SKIP_QUOTED, "S"),
    b(OP_PAGER_TOP, "<home>"),
    b(OP_PAGER_TOP, "^"),
    b(OP_PREV_ENTRY, "K"),
    b(OP_PREV_LINE, "<backspace>"),
    b(OP_PREV_LINE, "<up>"),
    b(OP_PREV_PAGE, "-"),
    b(OP_PREV_PAGE, "<pageup>"),
    b(OP_REDRAW, "^L"),
    b(OP_SEARCH, "/"),
    b(OP_SEARCH_NEXT, "n"),
    b(OP_SEARCH_REVERSE, "\\e/"),
    b(OP_SEARCH_TOGGLE, "\\\\"),
    b(OP_SHELL_ESCAPE, "!"),
];
