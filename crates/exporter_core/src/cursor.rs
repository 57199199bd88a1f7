use std::time::Instant;

use crate::MessageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn flipped(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Per-run scroll bookkeeping: where we push next and how long we have been stuck.
#[derive(Debug, Clone)]
pub struct ScrollCursor<N> {
    scroller: N,
    direction: Direction,
    last_change: Instant,
    stall_count: u32,
    last_first_id: Option<MessageId>,
    last_seen_count: usize,
}

impl<N> ScrollCursor<N> {
    pub fn new(
        scroller: N,
        now: Instant,
        seen_count: usize,
        first_id: Option<MessageId>,
    ) -> Self {
        Self {
            scroller,
            direction: Direction::Up,
            last_change: now,
            stall_count: 0,
            last_first_id: first_id,
            last_seen_count: seen_count,
        }
    }

    pub fn scroller(&self) -> &N {
        &self.scroller
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn stall_count(&self) -> u32 {
        self.stall_count
    }

    /// Offset to write this tick: the top, unless we are nudging toward the bottom.
    pub fn target_offset(&self, before: u64, bottom: u64) -> u64 {
        if self.direction == Direction::Up || before == 0 {
            0
        } else {
            bottom
        }
    }

    /// Direction update after the write. Sitting at the true top never alternates.
    pub fn record_movement(&mut self, before: u64, after: u64) {
        if after != before {
            self.direction = Direction::Up;
        } else if before != 0 {
            self.direction = self.direction.flipped();
        }
    }

    /// `true` when the seen count or the first visible identity moved since last time.
    pub fn observe(&mut self, seen_count: usize, first_id: Option<&MessageId>) -> bool {
        let first_changed = first_id.is_some() && first_id != self.last_first_id.as_ref();
        if seen_count == self.last_seen_count && !first_changed {
            return false;
        }
        self.last_seen_count = seen_count;
        if let Some(id) = first_id {
            self.last_first_id = Some(id.clone());
        }
        true
    }

    /// Growth-only variant used by the mutation fast path.
    pub fn observe_growth(&mut self, seen_count: usize) -> bool {
        if seen_count == self.last_seen_count {
            return false;
        }
        self.last_seen_count = seen_count;
        true
    }

    pub fn mark_progress(&mut self, now: Instant) {
        self.last_change = now;
        self.stall_count = 0;
    }

    pub fn reset_stalls(&mut self) {
        self.stall_count = 0;
    }

    /// Counts a stall only when the write left us parked at offset 0.
    pub fn record_stall(&mut self, before: u64, after: u64) {
        if after == before && after == 0 {
            self.stall_count += 1;
        } else {
            self.stall_count = 0;
        }
    }

    pub fn since_change(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.last_change)
    }
}
