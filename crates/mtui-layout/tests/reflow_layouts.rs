use mtui_core::geometry::{Extent, Orientation, SizePolicy, WindowId};
use mtui_layout::{WindowTree, WindowType};
use proptest::prelude::*;

const H: Orientation = Orientation::Horizontal;
const V: Orientation = Orientation::Vertical;

/// Compact description of a window for building test trees.
enum Shape {
    Fix(u16, Vec<Shape>),
    Max(Vec<Shape>),
    Min(Vec<Shape>),
    Hidden,
}

fn build(t: &mut WindowTree<()>, parent: WindowId, orient: Orientation, shape: &Shape) {
    let along = |n: u16| match orient {
        Orientation::Vertical => (Extent::Unlimited, Extent::Cells(n)),
        Orientation::Horizontal => (Extent::Cells(n), Extent::Unlimited),
    };
    let (size, (cols, rows), kids, visible) = match shape {
        Shape::Fix(n, kids) => (SizePolicy::Fixed, along(*n), kids.as_slice(), true),
        Shape::Max(kids) => (
            SizePolicy::Maximise,
            (Extent::Unlimited, Extent::Unlimited),
            kids.as_slice(),
            true,
        ),
        Shape::Min(kids) => (
            SizePolicy::Minimise,
            (Extent::Cells(0), Extent::Cells(0)),
            kids.as_slice(),
            true,
        ),
        Shape::Hidden => (SizePolicy::Fixed, along(20), &[][..], false),
    };
    let id = t.create(WindowType::Custom, orient, size, cols, rows, ());
    t.set_visible(id, visible);
    t.add_child(parent, id);
    for k in kids {
        build(t, id, orient, k);
    }
}

fn layout(orient: Orientation, specs: Vec<Shape>) -> String {
    let mut t = WindowTree::new(orient, 80, 24, ());
    let root = t.root();
    for s in &specs {
        build(&mut t, root, orient, s);
    }
    t.reflow(root);
    t.serialise(root)
}

use Shape::{Fix, Hidden, Max, Min};

#[test]
fn horizontal_layouts() {
    let cases: Vec<(Vec<Shape>, &str)> = vec![
        (
            vec![Fix(40, vec![])],
            "<FIX {0x,0y} [80C,24R]<FIX {0x,0y} [40C,24R]>>",
        ),
        (
            vec![Max(vec![])],
            "<FIX {0x,0y} [80C,24R]<MAX {0x,0y} [80C,24R]>>",
        ),
        (
            vec![Min(vec![Fix(20, vec![])])],
            "<FIX {0x,0y} [80C,24R]<MIN {0x,0y} [20C,24R]<FIX {0x,0y} [20C,24R]>>>",
        ),
        (
            vec![Min(vec![Fix(20, vec![]), Hidden])],
            "<FIX {0x,0y} [80C,24R]<MIN {0x,0y} [20C,24R]<FIX {0x,0y} [20C,24R]>>>",
        ),
        (
            vec![Min(vec![Fix(20, vec![]), Fix(10, vec![])])],
            "<FIX {0x,0y} [80C,24R]<MIN {0x,0y} [30C,24R]<FIX {0x,0y} [20C,24R]><FIX {20x,0y} [10C,24R]>>>",
        ),
        (
            vec![Fix(35, vec![]), Hidden, Max(vec![]), Hidden],
            "<FIX {0x,0y} [80C,24R]<FIX {0x,0y} [35C,24R]><MAX {35x,0y} [45C,24R]>>",
        ),
        (
            vec![Max(vec![]), Max(vec![]), Max(vec![]), Max(vec![])],
            "<FIX {0x,0y} [80C,24R]<MAX {0x,0y} [20C,24R]><MAX {20x,0y} [20C,24R]><MAX {40x,0y} [20C,24R]><MAX {60x,0y} [20C,24R]>>",
        ),
        (
            vec![Fix(40, vec![]), Fix(60, vec![]), Fix(20, vec![])],
            "<FIX {0x,0y} [80C,24R]<FIX {0x,0y} [40C,24R]><FIX {40x,0y} [40C,24R]><FIX {80x,0y} [0C,24R]>>",
        ),
        (
            vec![Fix(35, vec![Max(vec![]), Fix(10, vec![])]), Max(vec![])],
            "<FIX {0x,0y} [80C,24R]<FIX {0x,0y} [35C,24R]<MAX {0x,0y} [25C,24R]><FIX {25x,0y} [10C,24R]>><MAX {35x,0y} [45C,24R]>>",
        ),
    ];
    for (specs, expected) in cases {
        assert_eq!(layout(H, specs), expected);
    }
}

#[test]
fn vertical_layouts() {
    let cases: Vec<(Vec<Shape>, &str)> = vec![
        (
            vec![Fix(15, vec![]), Max(vec![])],
            "<FIX {0x,0y} [80C,24R]<FIX {0x,0y} [80C,15R]><MAX {0x,15y} [80C,9R]>>",
        ),
        (
            vec![Max(vec![]), Fix(15, vec![])],
            "<FIX {0x,0y} [80C,24R]<MAX {0x,0y} [80C,9R]><FIX {0x,9y} [80C,15R]>>",
        ),
        (
            vec![Min(vec![Fix(10, vec![]), Fix(5, vec![])])],
            "<FIX {0x,0y} [80C,24R]<MIN {0x,0y} [80C,15R]<FIX {0x,0y} [80C,10R]><FIX {0x,10y} [80C,5R]>>>",
        ),
        (
            vec![Fix(10, vec![]), Fix(12, vec![]), Fix(15, vec![])],
            "<FIX {0x,0y} [80C,24R]<FIX {0x,0y} [80C,10R]><FIX {0x,10y} [80C,12R]><FIX {0x,22y} [80C,2R]>>",
        ),
        (
            vec![Max(vec![Max(vec![]), Fix(10, vec![])]), Fix(5, vec![])],
            "<FIX {0x,0y} [80C,24R]<MAX {0x,0y} [80C,19R]<MAX {0x,0y} [80C,9R]><FIX {0x,9y} [80C,10R]>><FIX {0x,19y} [80C,5R]>>",
        ),
    ];
    for (specs, expected) in cases {
        assert_eq!(layout(V, specs), expected);
    }
}

#[test]
fn index_and_pager_panels() {
    let mut t = WindowTree::new(V, 80, 24, ());
    let root = t.root();
    let mk = |t: &mut WindowTree<()>, o, s, c, r| t.create(WindowType::Custom, o, s, c, r, ());
    let u = Extent::Unlimited;

    let help = mk(&mut t, V, SizePolicy::Fixed, u, Extent::Cells(1));
    let dialogs = mk(&mut t, V, SizePolicy::Maximise, u, u);
    let message = mk(&mut t, V, SizePolicy::Fixed, u, Extent::Cells(1));
    t.add_child(root, help);
    t.add_child(root, dialogs);
    t.add_child(root, message);

    let index_dlg = mk(&mut t, H, SizePolicy::Maximise, u, u);
    let sidebar = mk(&mut t, H, SizePolicy::Fixed, Extent::Cells(15), u);
    let right = mk(&mut t, V, SizePolicy::Maximise, u, u);
    t.add_child(dialogs, index_dlg);
    t.add_child(index_dlg, sidebar);
    t.add_child(index_dlg, right);

    let index_panel = mk(&mut t, V, SizePolicy::Minimise, Extent::Cells(0), Extent::Cells(0));
    let index = mk(&mut t, V, SizePolicy::Fixed, u, Extent::Cells(5));
    let index_bar = mk(&mut t, V, SizePolicy::Fixed, u, Extent::Cells(1));
    t.add_child(index_panel, index);
    t.add_child(index_panel, index_bar);

    let pager_panel = mk(&mut t, V, SizePolicy::Maximise, u, u);
    let pager = mk(&mut t, V, SizePolicy::Maximise, u, u);
    let pager_bar = mk(&mut t, V, SizePolicy::Fixed, u, Extent::Cells(1));
    t.add_child(pager_panel, pager);
    t.add_child(pager_panel, pager_bar);

    t.add_child(right, index_panel);
    t.add_child(right, pager_panel);

    t.reflow(root);
    assert_eq!(
        t.serialise(root),
        "<FIX {0x,0y} [80C,24R]<FIX {0x,0y} [80C,1R]><MAX {0x,1y} [80C,22R]<MAX {0x,1y} [80C,22R]<FIX {0x,1y} [15C,22R]><MAX {15x,1y} [65C,22R]<MIN {15x,1y} [65C,6R]<FIX {15x,1y} [65C,5R]><FIX {15x,6y} [65C,1R]>><MAX {15x,7y} [65C,16R]<MAX {15x,7y} [65C,15R]><FIX {15x,22y} [65C,1R]>>>>><FIX {0x,23y} [80C,1R]>>"
    );
}

#[test]
fn status_bar_moves_to_top_and_back() {
    let mut t = WindowTree::new(V, 80, 24, ());
    let root = t.root();
    let body = t.create(WindowType::Index, V, SizePolicy::Maximise, Extent::Unlimited, Extent::Unlimited, ());
    let bar = t.create(WindowType::StatusBar, V, SizePolicy::Fixed, Extent::Unlimited, Extent::Cells(1), ());
    t.add_child(root, body);
    t.add_child(root, bar);
    t.reflow_and_notify(root);

    assert!(t.status_on_top(root, true));
    assert_eq!(t.children(root), &[bar, body]);
    assert_eq!(t.state(bar).unwrap().row_offset, 0);
    assert!(!t.status_on_top(root, true));

    assert!(t.status_on_top(root, false));
    assert_eq!(t.children(root), &[body, bar]);
    assert_eq!(t.state(bar).unwrap().row_offset, 23);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Child {
    Fixed(u16),
    Max,
    Hidden,
}

fn child() -> impl Strategy<Value = Child> {
    prop_oneof![
        (0u16..40).prop_map(Child::Fixed),
        Just(Child::Max),
        Just(Child::Hidden),
    ]
}

proptest! {
    #[test]
    fn children_fit_their_parent(
        vertical in any::<bool>(),
        cols in 1u16..200,
        rows in 1u16..100,
        kids in proptest::collection::vec(child(), 0..8),
    ) {
        let orient = if vertical { V } else { H };
        let mut t = WindowTree::new(orient, cols, rows, ());
        let root = t.root();
        let mut ids = Vec::new();
        for k in &kids {
            let (size, req) = match k {
                Child::Fixed(n) => (SizePolicy::Fixed, Extent::Cells(*n)),
                Child::Max => (SizePolicy::Maximise, Extent::Unlimited),
                Child::Hidden => (SizePolicy::Fixed, Extent::Cells(5)),
            };
            let id = t.create(WindowType::Custom, orient, size, req, req, ());
            if matches!(k, Child::Hidden) {
                t.set_visible(id, false);
            }
            t.add_child(root, id);
            ids.push((id, k.clone()));
        }
        t.reflow(root);

        let parent = t.state(root).unwrap();
        let mut remaining = parent.main(orient);
        let mut sum = 0u32;
        for (id, k) in &ids {
            if matches!(k, Child::Hidden) {
                continue;
            }
            let s = t.state(*id).unwrap();
            sum += u32::from(s.main(orient));
            match orient {
                Orientation::Vertical => prop_assert_eq!(s.cols, parent.cols),
                Orientation::Horizontal => prop_assert_eq!(s.rows, parent.rows),
            }
            if let Child::Fixed(n) = k {
                prop_assert_eq!(s.main(orient), (*n).min(remaining));
                remaining -= s.main(orient);
            } else {
                remaining = remaining.saturating_sub(1);
            }
        }
        prop_assert!(sum <= u32::from(parent.main(orient)));
    }

    #[test]
    fn visibility_is_the_ancestor_conjunction(flags in proptest::collection::vec(any::<bool>(), 1..8)) {
        let mut t = WindowTree::new(V, 10, 10, ());
        let mut parent = t.root();
        let mut chain = Vec::new();
        for &visible in &flags {
            let id = t.create(WindowType::Container, V, SizePolicy::Maximise, Extent::Unlimited, Extent::Unlimited, ());
            t.set_visible(id, visible);
            t.add_child(parent, id);
            chain.push(id);
            parent = id;
        }
        for (depth, &id) in chain.iter().enumerate() {
            let expected = flags[..=depth].iter().all(|&v| v);
            prop_assert_eq!(t.is_visible(id), expected);
        }
    }
}
