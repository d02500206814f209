use std::time::Instant;

use crate::ResolutionTicket;

/// A queue of delayed pair resolutions, ordered by deadline.
///
/// Nothing runs on its own: the owner polls [`take_due()`](Self::take_due)
/// from its event loop.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    // Sorted by deadline, earliest first
    pending: Vec<(Instant, ResolutionTicket)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Instant, ticket: ResolutionTicket) {
        let idx = self.pending.partition_point(|&(d, _)| d <= due);
        self.pending.insert(idx, (due, ticket));
    }

    /// Removes and returns every ticket whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<ResolutionTicket> {
        let num_due = self.pending.partition_point(|&(d, _)| d <= now);
        self.pending
            .drain(..num_due)
            .map(|(_, ticket)| ticket)
            .collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|&(d, _)| d)
    }

    /// Drops all pending tickets and returns how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let num = self.pending.len();
        self.pending.clear();
        num
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
