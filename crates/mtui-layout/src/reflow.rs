#![forbid(unsafe_code)]

//! Reflow: turn size requests into geometry.
//!
//! A container lays out its visible children along its own orientation in
//! three passes:
//!
//! 1. **Claim.** Fixed children take `min(remaining, requested)`. Minimise
//!    children are laid out against the container's full size and claim
//!    what they end up using. Maximise children claim one cell each while
//!    space remains.
//! 2. **Share.** Leftover space is split between the maximise children,
//!    `ceil(left / count)` each, so earlier children get the remainder.
//! 3. **Place.** Children get consecutive offsets along the axis, the
//!    container's offset and extent across it, and are laid out in turn.
//!
//! A minimise container then gives back whatever space was left over.
//!
//! Invisible children take no space and are not laid out.

use mtui_core::geometry::{Orientation, SizePolicy, WindowActions, WindowId};

use crate::window::WindowTree;

impl<D> WindowTree<D> {
    /// Lay out `id`'s subtree from its current geometry.
    pub fn reflow(&mut self, id: WindowId) {
        let Some(win) = self.get_mut(id) else {
            return;
        };
        win.actions.remove(WindowActions::REFLOW);
        let orient = win.orient;
        let parent = win.state;
        let policy = win.size;
        let children: Vec<WindowId> = win.children().to_vec();

        let axis_len = i32::from(parent.main(orient));
        let mut space = axis_len;
        let mut max_count = 0i32;

        // Pass one: minimal allocation.
        for &c in &children {
            let Some(child) = self.get_mut(c) else {
                continue;
            };
            if !child.state.visible {
                continue;
            }
            match child.size {
                SizePolicy::Fixed => {
                    let available = space.max(0) as u16;
                    let req = match orient {
                        Orientation::Vertical => child.req_rows,
                        Orientation::Horizontal => child.req_cols,
                    };
                    let claim = req.claim(available);
                    set_extents(&mut child.state, orient, claim, &parent);
                    space -= i32::from(claim);
                }
                SizePolicy::Maximise => {
                    let claim = u16::from(space > 0);
                    set_extents(&mut child.state, orient, claim, &parent);
                    max_count += 1;
                    space -= i32::from(claim);
                }
                SizePolicy::Minimise => {
                    child.state.rows = parent.rows;
                    child.state.cols = parent.cols;
                    child.state.row_offset = parent.row_offset;
                    child.state.col_offset = parent.col_offset;
                    self.reflow(c);
                    if let Some(child) = self.get(c) {
                        space -= i32::from(child.state.main(orient));
                    }
                }
            }
        }

        // Pass two: share the surplus.
        if max_count > 0 && space > 0 {
            let mut alloc = (space + max_count - 1) / max_count;
            for &c in &children {
                if space <= 0 {
                    break;
                }
                let Some(child) = self.get_mut(c) else {
                    continue;
                };
                if !child.state.visible || child.size != SizePolicy::Maximise {
                    continue;
                }
                alloc = alloc.min(space);
                let grow = alloc as u16;
                match orient {
                    Orientation::Vertical => child.state.rows += grow,
                    Orientation::Horizontal => child.state.cols += grow,
                }
                space -= alloc;
            }
        }

        // Pass three: position and recurse.
        let mut offset = match orient {
            Orientation::Vertical => parent.row_offset,
            Orientation::Horizontal => parent.col_offset,
        };
        for &c in &children {
            let Some(child) = self.get_mut(c) else {
                continue;
            };
            if !child.state.visible {
                continue;
            }
            match orient {
                Orientation::Vertical => {
                    child.state.row_offset = offset;
                    child.state.col_offset = parent.col_offset;
                    offset = offset.saturating_add(child.state.rows);
                }
                Orientation::Horizontal => {
                    child.state.col_offset = offset;
                    child.state.row_offset = parent.row_offset;
                    offset = offset.saturating_add(child.state.cols);
                }
            }
            self.reflow(c);
        }

        if space > 0 && policy == SizePolicy::Minimise {
            if let Some(win) = self.get_mut(id) {
                let shrink = space as u16;
                match orient {
                    Orientation::Vertical => win.state.rows -= shrink,
                    Orientation::Horizontal => win.state.cols -= shrink,
                }
            }
        }
        tracing::trace!(win = id.0, ?orient, "reflowed");
    }

    /// Reflow and notify twice, so windows that resize themselves in
    /// response to the first layout are settled by the second.
    pub fn reflow_and_notify(&mut self, id: WindowId) {
        self.reflow(id);
        self.notify_all(id);
        self.reflow(id);
        self.notify_all(id);
    }
}

fn set_extents(
    state: &mut mtui_core::WindowState,
    orient: Orientation,
    main: u16,
    parent: &mtui_core::WindowState,
) {
    match orient {
        Orientation::Vertical => {
            state.rows = main;
            state.cols = parent.cols;
        }
        Orientation::Horizontal => {
            state.cols = main;
            state.rows = parent.rows;
        }
    }
}

#[cfg(test)]
mod tests {
    use mtui_core::geometry::{Extent, StateFlags};
    use mtui_core::notify::WindowEventKind;

    use super::*;
    use crate::window::WindowType;

    fn window(t: &mut WindowTree<()>, size: SizePolicy, rows: Extent) -> WindowId {
        t.create(
            WindowType::Custom,
            Orientation::Vertical,
            size,
            Extent::Unlimited,
            rows,
            (),
        )
    }

    #[test]
    fn three_maximise_children_share_evenly() {
        let mut t = WindowTree::new(Orientation::Vertical, 80, 24, ());
        let root = t.root();
        let kids: Vec<_> = (0..3)
            .map(|_| window(&mut t, SizePolicy::Maximise, Extent::Unlimited))
            .collect();
        for &k in &kids {
            t.add_child(root, k);
        }
        t.reflow(root);
        for (i, &k) in kids.iter().enumerate() {
            let s = t.state(k).unwrap();
            assert_eq!((s.rows, s.cols, s.row_offset), (8, 80, 8 * i as u16));
        }
    }

    #[test]
    fn last_maximise_child_takes_the_shortfall() {
        let mut t = WindowTree::new(Orientation::Vertical, 80, 25, ());
        let root = t.root();
        let kids: Vec<_> = (0..3)
            .map(|_| window(&mut t, SizePolicy::Maximise, Extent::Unlimited))
            .collect();
        for &k in &kids {
            t.add_child(root, k);
        }
        t.reflow(root);
        let rows: Vec<u16> = kids.iter().map(|&k| t.state(k).unwrap().rows).collect();
        assert_eq!(rows, vec![9, 9, 7]);
    }

    #[test]
    fn state_events_follow_reflow() {
        let mut t = WindowTree::new(Orientation::Vertical, 80, 24, ());
        let root = t.root();
        let a = window(&mut t, SizePolicy::Fixed, Extent::Cells(5));
        t.add_child(root, a);
        t.reflow_and_notify(root);
        t.take_events();

        t.set_root_size(80, 3);
        let events: Vec<_> = t
            .take_events()
            .into_iter()
            .filter(|e| e.kind == WindowEventKind::State)
            .collect();
        let for_a: Vec<_> = events.iter().filter(|e| e.win == a).collect();
        assert_eq!(for_a.len(), 1);
        assert!(for_a[0].flags.contains(StateFlags::SHORTER));
    }

    #[test]
    fn hiding_reports_hidden() {
        let mut t = WindowTree::new(Orientation::Vertical, 80, 24, ());
        let root = t.root();
        let a = window(&mut t, SizePolicy::Maximise, Extent::Unlimited);
        t.add_child(root, a);
        t.reflow_and_notify(root);
        t.take_events();

        t.set_visible(a, false);
        t.reflow_and_notify(root);
        let ev = t.take_events();
        assert!(
            ev.iter()
                .any(|e| e.win == a && e.flags.contains(StateFlags::HIDDEN))
        );
    }

    #[test]
    fn reflow_clears_the_request() {
        let mut t = WindowTree::new(Orientation::Vertical, 10, 10, ());
        let root = t.root();
        t.request(root, WindowActions::REFLOW);
        assert!(t.needs_reflow(root));
        t.reflow(root);
        assert!(!t.needs_reflow(root));
    }
}
