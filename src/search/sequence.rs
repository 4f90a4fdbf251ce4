//! Request sequence tagging
//!
//! Async lookups may complete out of order. Each request takes a ticket from
//! a `SequenceGate`; only the holder of the most recent ticket may publish.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct SequenceGate {
    latest: AtomicU64,
}

impl SequenceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a new ticket, superseding every earlier one
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Supersede all outstanding tickets without starting a request
    pub fn invalidate(&self) {
        self.issue();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_wins() {
        let gate = SequenceGate::new();
        let first = gate.issue();
        let second = gate.issue();

        assert!(second > first);
        assert!(!gate.is_latest(first));
        assert!(gate.is_latest(second));
    }

    #[test]
    fn test_invalidate_supersedes_outstanding() {
        let gate = SequenceGate::new();
        let ticket = gate.issue();
        gate.invalidate();
        assert!(!gate.is_latest(ticket));
    }
}
