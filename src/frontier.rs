use crate::cell::CellPos;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// A queued cell with its priority and insertion order
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    priority: u32,
    sequence: u64,
    cell: CellPos,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .priority
            .cmp(&self.priority)
            // Tie-breaker: earlier insertion first
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-priority queue of cells ordered by `(priority, sequence)`
///
/// Pushing a cell that is already pending leaves the old entry in the heap;
/// the lower priority pops first and the leftover is skipped later because the
/// cell is no longer a member.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    members: HashSet<CellPos>,
    next_sequence: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `cell`, assigning the next sequence number
    pub fn push(&mut self, priority: u32, cell: CellPos) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(FrontierEntry {
            priority,
            sequence,
            cell,
        });
        self.members.insert(cell);
    }

    /// Remove and return the pending cell with the lowest priority
    pub fn pop_min(&mut self) -> Option<CellPos> {
        while let Some(entry) = self.heap.pop() {
            if self.members.remove(&entry.cell) {
                return Some(entry.cell);
            }
        }
        None
    }

    pub fn contains(&self, cell: &CellPos) -> bool {
        self.members.contains(cell)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of pending cells (stale heap entries are not counted)
    pub fn len(&self) -> usize {
        self.members.len()
    }
}
