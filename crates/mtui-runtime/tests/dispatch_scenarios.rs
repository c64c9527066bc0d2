use mtui_core::event::key_f;
use mtui_core::{KeyEvent, Keycode, MenuId};
use mtui_keymap::ops::{OP_EXIT, OP_HELP, OP_NEXT_LINE};
use mtui_render::HeadlessTerminal;
use mtui_runtime::{UiConfig, UiContext};

fn ctx() -> UiContext<HeadlessTerminal> {
    UiContext::new(HeadlessTerminal::new(80, 24), UiConfig::default())
}

#[test]
fn self_referencing_macro_is_stopped() {
    let mut ctx = ctx();
    ctx.keymaps_mut()
        .macro_bind("pager", "<F1>", "<F1>", None)
        .unwrap();
    ctx.terminal_mut().push_key(key_f(1));
    ctx.terminal_mut().push_keys("q");

    assert_eq!(ctx.dokey(MenuId::PAGER), KeyEvent::ABORT);
    assert_eq!(ctx.message_text(), "Macro loop detected.");
    assert!(ctx.queue().is_empty());
    // typed-ahead keys were discarded with the loop
    assert_eq!(ctx.terminal().pending_input(), 0);
}

#[test]
fn macro_chain_within_the_limit_completes() {
    let mut ctx = ctx();
    let km = ctx.keymaps_mut();
    km.macro_bind("pager", "a", "b", None).unwrap();
    km.macro_bind("pager", "b", "c", None).unwrap();
    km.macro_bind("pager", "c", "<next-line>", None).unwrap();
    ctx.terminal_mut().push_keys("a");
    assert_eq!(ctx.dokey(MenuId::PAGER).op, OP_NEXT_LINE);
}

#[test]
fn exec_runs_functions_in_order() {
    let mut ctx = ctx();
    let keymaps = ctx.keymaps().clone();
    ctx.queue_mut()
        .exec(&["help", "exit"], MenuId::PAGER, &keymaps)
        .unwrap();
    assert_eq!(ctx.dokey(MenuId::PAGER).op, OP_HELP);
    assert_eq!(ctx.dokey(MenuId::PAGER).op, OP_EXIT);
}

#[test]
fn push_string_is_read_as_keys() {
    let mut ctx = ctx();
    let keymaps = ctx.keymaps().clone();
    ctx.queue_mut().push_macro_string("?q", &keymaps);
    assert_eq!(ctx.dokey(MenuId::PAGER), KeyEvent::new(Keycode::from(b'?'), OP_HELP));
    assert_eq!(ctx.dokey(MenuId::PAGER), KeyEvent::new(Keycode::from(b'q'), OP_EXIT));
}

#[test]
fn prompt_does_not_eat_queued_macros() {
    let mut ctx = ctx();
    let keymaps = ctx.keymaps().clone();
    ctx.queue_mut().push_macro_string("q", &keymaps);
    ctx.terminal_mut().push_keys("yes\n");
    assert_eq!(ctx.get_field("Continue? ", "").as_deref(), Some("yes"));
    assert_eq!(ctx.dokey(MenuId::PAGER).op, OP_EXIT);
}
