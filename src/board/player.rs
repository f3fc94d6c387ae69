//! Per-player turn state (spec §3, §9 "Player record finalization deferral").

use super::cell::Pos;

/// The 0/1/2-card progression of a player's current (or just-finished,
/// pending-finalization) turn.
///
/// A plain `Option<Pos>` cannot express "two cells pending finalization
/// after a mismatch," so this is a small fixed-capacity list instead.
#[derive(Debug, Clone, Default)]
pub struct ControlledCells {
    slots: [Option<Pos>; 2],
}

impl ControlledCells {
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> Option<Pos> {
        self.slots[0]
    }

    pub fn second(&self) -> Option<Pos> {
        self.slots[1]
    }

    pub fn as_slice(&self) -> Vec<Pos> {
        self.slots.iter().filter_map(|s| *s).collect()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.slots.contains(&Some(pos))
    }

    /// Append a position. Panics if already at capacity 2; callers only push
    /// after checking `len()`, so this is a programmer-error guard, not a
    /// recoverable condition.
    pub fn push(&mut self, pos: Pos) {
        for slot in self.slots.iter_mut() {
            if slot.is_none() {
                *slot = Some(pos);
                return;
            }
        }
        unreachable!("ControlledCells::push called with no free slot");
    }

    pub fn clear(&mut self) {
        self.slots = [None, None];
    }

    /// Replace the whole record with exactly these two positions (mismatch
    /// finalization deferral, spec §4.2 case |controlled|=1).
    pub fn set_two(&mut self, a: Pos, b: Pos) {
        self.slots = [Some(a), Some(b)];
    }
}

/// A player's record. Created lazily on that player's first Flip (spec §9,
/// resolved open question).
#[derive(Debug, Clone, Default)]
pub struct PlayerRecord {
    pub controlled: ControlledCells,
}
