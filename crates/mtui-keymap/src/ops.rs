#![forbid(unsafe_code)]

//! Operation numbers for the built-in menus.
//!
//! Embedders that register their own menus allocate operations from
//! [`FIRST_USER_OP`] upwards.

use mtui_core::Op;

// Generic
pub const OP_BOTTOM_PAGE: Op = Op(1);
pub const OP_CHECK_STATS: Op = Op(2);
pub const OP_CURRENT_BOTTOM: Op = Op(3);
pub const OP_CURRENT_MIDDLE: Op = Op(4);
pub const OP_CURRENT_TOP: Op = Op(5);
/// Marks the end of a conditional macro block, see
/// [`EventQueue::flush_to_end_cond`](crate::EventQueue::flush_to_end_cond).
pub const OP_END_COND: Op = Op(6);
pub const OP_ENTER_COMMAND: Op = Op(7);
pub const OP_EXIT: Op = Op(8);
pub const OP_FIRST_ENTRY: Op = Op(9);
pub const OP_HALF_DOWN: Op = Op(10);
pub const OP_HALF_UP: Op = Op(11);
pub const OP_HELP: Op = Op(12);
pub const OP_JUMP: Op = Op(13);
pub const OP_LAST_ENTRY: Op = Op(14);
pub const OP_MIDDLE_PAGE: Op = Op(15);
pub const OP_NEXT_ENTRY: Op = Op(16);
pub const OP_NEXT_LINE: Op = Op(17);
pub const OP_NEXT_PAGE: Op = Op(18);
pub const OP_PREV_ENTRY: Op = Op(19);
pub const OP_PREV_LINE: Op = Op(20);
pub const OP_PREV_PAGE: Op = Op(21);
pub const OP_REDRAW: Op = Op(22);
pub const OP_SEARCH: Op = Op(23);
pub const OP_SEARCH_NEXT: Op = Op(24);
pub const OP_SEARCH_OPPOSITE: Op = Op(25);
pub const OP_SEARCH_REVERSE: Op = Op(26);
pub const OP_SELECT_ENTRY: Op = Op(27);
pub const OP_SHELL_ESCAPE: Op = Op(28);
pub const OP_TAG: Op = Op(29);
pub const OP_TAG_PREFIX: Op = Op(30);
pub const OP_TAG_PREFIX_COND: Op = Op(31);
pub const OP_TOP_PAGE: Op = Op(32);
pub const OP_WHAT_KEY: Op = Op(33);

// Editor
pub const OP_EDITOR_BACKSPACE: Op = Op(100);
pub const OP_EDITOR_BACKWARD_CHAR: Op = Op(101);
pub const OP_EDITOR_BACKWARD_WORD: Op = Op(102);
pub const OP_EDITOR_BOL: Op = Op(103);
pub const OP_EDITOR_CAPITALIZE_WORD: Op = Op(104);
pub const OP_EDITOR_COMPLETE: Op = Op(105);
pub const OP_EDITOR_COMPLETE_QUERY: Op = Op(106);
pub const OP_EDITOR_DELETE_CHAR: Op = Op(107);
pub const OP_EDITOR_DOWNCASE_WORD: Op = Op(108);
pub const OP_EDITOR_EOL: Op = Op(109);
pub const OP_EDITOR_FORWARD_CHAR: Op = Op(110);
pub const OP_EDITOR_FORWARD_WORD: Op = Op(111);
pub const OP_EDITOR_HISTORY_DOWN: Op = Op(112);
pub const OP_EDITOR_HISTORY_SEARCH: Op = Op(113);
pub const OP_EDITOR_HISTORY_UP: Op = Op(114);
pub const OP_EDITOR_KILL_EOL: Op = Op(115);
pub const OP_EDITOR_KILL_EOW: Op = Op(116);
pub const OP_EDITOR_KILL_LINE: Op = Op(117);
pub const OP_EDITOR_KILL_WHOLE_LINE: Op = Op(118);
pub const OP_EDITOR_KILL_WORD: Op = Op(119);
pub const OP_EDITOR_QUOTE_CHAR: Op = Op(120);
pub const OP_EDITOR_TRANSPOSE_CHARS: Op = Op(121);
pub const OP_EDITOR_UPCASE_WORD: Op = Op(122);

// Pager
pub const OP_PAGER_BOTTOM: Op = Op(200);
pub const OP_PAGER_HIDE_QUOTED: Op = Op(201);
pub const OP_PAGER_SKIP_HEADERS: Op = Op(202);
pub const OP_PAGER_SKIP_QUOTED: Op = Op(203);
pub const OP_PAGER_TOP: Op = Op(204);
pub const OP_SEARCH_TOGGLE: Op = Op(205);

/// First operation number free for embedder menus.
pub const FIRST_USER_OP: Op = Op(1000);
