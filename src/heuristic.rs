use crate::cell::CellPos;

/// Manhattan distance between two cells.
///
/// Never overestimates the remaining cost of 4-directional unit moves, and
/// changes by at most 1 per move, so A* stays optimal with it.
pub fn manhattan(a: CellPos, b: CellPos) -> u32 {
    (a.row.abs_diff(b.row) + a.col.abs_diff(b.col)) as u32
}
