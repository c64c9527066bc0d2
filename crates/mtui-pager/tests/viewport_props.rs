//! Property tests for the pager viewport.

use mtui_core::{Op, WindowState};
use mtui_keymap::ops::{
    OP_HALF_DOWN, OP_HALF_UP, OP_NEXT_LINE, OP_NEXT_PAGE, OP_PAGER_BOTTOM, OP_PAGER_HIDE_QUOTED,
    OP_PAGER_SKIP_HEADERS, OP_PAGER_SKIP_QUOTED, OP_PAGER_TOP, OP_PREV_LINE, OP_PREV_PAGE,
};
use mtui_layout::Canvas;
use mtui_pager::{PagerFlags, PagerMode, PagerView};
use mtui_render::{HeadlessTerminal, Terminal};
use mtui_runtime::PagerConfig;
use mtui_style::ColorConfig;
use proptest::prelude::*;

const OPS: &[Op] = &[
    OP_NEXT_LINE,
    OP_PREV_LINE,
    OP_NEXT_PAGE,
    OP_PREV_PAGE,
    OP_HALF_DOWN,
    OP_HALF_UP,
    OP_PAGER_TOP,
    OP_PAGER_BOTTOM,
    OP_PAGER_HIDE_QUOTED,
    OP_PAGER_SKIP_HEADERS,
    OP_PAGER_SKIP_QUOTED,
];

fn paint(view: &mut PagerView, term: &mut HeadlessTerminal) {
    let (cols, rows) = term.size();
    let mut canvas = Canvas::new(term, WindowState::new(rows, cols));
    view.paint(&mut canvas);
}

fn body_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,30}",
        "> [a-z ]{0,20}",
        ">> [a-z ]{0,20}",
        Just(String::new()),
    ]
}

fn message() -> impl Strategy<Value = String> {
    proptest::collection::vec(body_line(), 0..60).prop_map(|lines| {
        let mut text = String::from("From: a\nSubject: b\n\n");
        for line in lines {
            text.push_str(&line);
            text.push('\n');
        }
        text
    })
}

proptest! {
    #[test]
    fn viewport_stays_inside_the_file(
        text in message(),
        ops in proptest::collection::vec(proptest::sample::select(OPS), 0..40),
        cols in 5u16..30,
        rows in 1u16..12,
    ) {
        let mut view = PagerView::from_bytes(
            text.into_bytes(),
            PagerMode::Email,
            PagerFlags::empty(),
            &PagerConfig::default().with_pager_stop(true),
            &ColorConfig::default(),
        )
        .unwrap();
        let mut term = HeadlessTerminal::new(cols, rows);
        paint(&mut view, &mut term);

        for op in ops {
            view.apply(op);
            paint(&mut view, &mut term);
            let used = view.store().used();
            prop_assert!(view.top() <= used);
            prop_assert!(view.top() <= view.cur());
            prop_assert!(view.cur() <= used);
        }
    }
}
