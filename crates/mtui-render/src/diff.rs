#![forbid(unsafe_code)]

//! Row-major cell diff between two buffers of the same size.

use crate::buffer::Buffer;

/// A horizontal run of changed cells on one row, `x0..=x1` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    pub y: u16,
    pub x0: u16,
    pub x1: u16,
}

/// Changed runs from `old` to `new`.
///
/// A size mismatch reports every cell of `new` as changed.
pub fn changed_runs(old: &Buffer, new: &Buffer) -> Vec<ChangeRun> {
    let full = old.width() != new.width() || old.height() != new.height();
    let mut runs = Vec::new();
    for y in 0..new.height() {
        let new_row = new.row(y);
        let old_row = if full { &[][..] } else { old.row(y) };
        let mut start: Option<u16> = None;
        for (x, cell) in new_row.iter().enumerate() {
            let x = x as u16;
            let same = old_row.get(usize::from(x)) == Some(cell);
            match (same, start) {
                (false, None) => start = Some(x),
                (true, Some(x0)) => {
                    runs.push(ChangeRun { y, x0, x1: x - 1 });
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(x0) = start {
            runs.push(ChangeRun {
                y,
                x0,
                x1: new.width() - 1,
            });
        }
    }
    runs
}
