//! Dialog stack pushes, pops and focus.

use std::cell::RefCell;
use std::rc::Rc;

use mtui_core::geometry::{Extent, Orientation, SizePolicy, WindowId};
use mtui_core::notify::WindowEventKind;
use mtui_core::{Event, EventTypes, MenuId};
use mtui_layout::WindowType;
use mtui_render::HeadlessTerminal;
use mtui_runtime::{Role, UiConfig, UiContext};
use proptest::prelude::*;

fn ctx() -> UiContext<HeadlessTerminal> {
    UiContext::new(HeadlessTerminal::new(80, 24), UiConfig::default())
}

fn leaf(ctx: &mut UiContext<HeadlessTerminal>) -> WindowId {
    ctx.create_window(
        WindowType::Custom,
        Orientation::Vertical,
        SizePolicy::Maximise,
        Extent::Unlimited,
        Extent::Unlimited,
        Role::Container,
    )
}

#[test]
fn push_moves_focus_into_the_new_dialog() {
    let mut ctx = ctx();

    // a panel with two windows, the first focused
    let panel = ctx.simple_dialog(MenuId::DIALOG, WindowType::Index, Role::Container, Vec::new());
    let a = leaf(&mut ctx);
    let b = leaf(&mut ctx);
    ctx.tree_mut().add_child(panel.body, a);
    ctx.tree_mut().add_child(panel.body, b);
    ctx.push_dialog(panel.dialog);
    ctx.set_focus(a);
    ctx.redraw();
    assert_eq!(ctx.focus(), Some(a));

    let focused = Rc::new(RefCell::new(Vec::new()));
    let seen = focused.clone();
    ctx.observe(EventTypes::WINDOW, move |ev| {
        if let Event::Window(w) = ev {
            if w.kind == WindowEventKind::Focus {
                seen.borrow_mut().push(w.win);
            }
        }
        Ok(())
    });

    let d = ctx.simple_dialog(MenuId::PAGER, WindowType::Pager, Role::Container, Vec::new());
    ctx.push_dialog(d.dialog);
    ctx.redraw();

    assert_eq!(ctx.focus(), Some(d.body));
    assert_eq!(*focused.borrow(), vec![d.body]);
    assert!(ctx.tree().is_visible(d.dialog));
    assert!(!ctx.tree().is_visible(a));
    assert!(!ctx.tree().is_visible(b));

    // and back again
    ctx.pop_dialog();
    assert_eq!(ctx.focus(), Some(a));
    assert!(ctx.tree().is_visible(a));
    assert!(ctx.tree().is_visible(b));
}

#[test]
fn popped_dialog_can_be_pushed_again() {
    let mut ctx = ctx();
    let d = ctx.simple_dialog(MenuId::DIALOG, WindowType::Index, Role::Container, Vec::new());
    ctx.push_dialog(d.dialog);
    assert_eq!(ctx.pop_dialog(), Some(d.dialog));
    assert!(ctx.tree().contains(d.dialog));
    ctx.push_dialog(d.dialog);
    assert_eq!(ctx.dialogs(), &[d.dialog]);
    assert_eq!(ctx.focus(), Some(d.body));
}

#[test]
fn refused_push_keeps_the_top_shown() {
    let mut ctx = ctx();
    let a = ctx.simple_dialog(MenuId::DIALOG, WindowType::Index, Role::Container, Vec::new());
    ctx.push_dialog(a.dialog);
    let b = ctx.simple_dialog(MenuId::PAGER, WindowType::Pager, Role::Container, Vec::new());
    ctx.tree_mut().free(b.dialog);

    ctx.push_dialog(b.dialog);
    ctx.redraw();
    assert_eq!(ctx.dialogs(), &[a.dialog]);
    assert!(ctx.tree().is_visible(a.dialog));
    assert_eq!(ctx.focus(), Some(a.body));
}

#[derive(Debug, Clone, Copy)]
enum StackOp {
    Push,
    Pop,
}

fn stack_op() -> impl Strategy<Value = StackOp> {
    prop_oneof![Just(StackOp::Push), Just(StackOp::Pop)]
}

proptest! {
    #[test]
    fn exactly_one_dialog_is_visible(ops in prop::collection::vec(stack_op(), 0..30)) {
        let mut ctx = ctx();
        let mut model: Vec<WindowId> = Vec::new();
        for op in ops {
            match op {
                StackOp::Push => {
                    let d = ctx.simple_dialog(
                        MenuId::DIALOG,
                        WindowType::Index,
                        Role::Container,
                        Vec::new(),
                    );
                    ctx.push_dialog(d.dialog);
                    model.push(d.dialog);
                }
                StackOp::Pop => {
                    let popped = ctx.pop_dialog();
                    prop_assert_eq!(popped, model.pop());
                    if let Some(dlg) = popped {
                        ctx.tree_mut().free(dlg);
                    }
                }
            }
            ctx.redraw();

            prop_assert_eq!(ctx.dialogs(), model.as_slice());
            let visible = ctx
                .dialogs()
                .iter()
                .filter(|&&d| ctx.tree().is_visible(d))
                .count();
            prop_assert_eq!(visible, usize::from(!model.is_empty()));
            if let Some(&top) = model.last() {
                prop_assert!(ctx.tree().is_visible(top));
                let focus = ctx.focus().unwrap();
                prop_assert!(ctx.tree().is_ancestor(top, focus));
            }
        }
    }
}
