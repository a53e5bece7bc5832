//! Monotonic request sequencing.
//!
//! Every collection read is stamped with a ticket from a [`RequestSequence`].
//! A response may only replace local state if its ticket is still the newest
//! one issued, so reads that resolve out of order cannot overwrite a fresher
//! snapshot.

use serde::{Deserialize, Serialize};

/// Identifies one issued read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A monotonically increasing counter of issued requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSequence {
    counter: u64,
    closed: bool,
}

impl RequestSequence {
    /// Create a sequence with no requests issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket. Every earlier ticket becomes stale.
    pub fn next(&mut self) -> RefreshTicket {
        self.counter += 1;
        RefreshTicket(self.counter)
    }

    /// Check whether a response carrying `ticket` may still be applied.
    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        !self.closed && ticket.0 == self.counter
    }

    /// Make every outstanding and future ticket stale.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of tickets issued so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sequence_issued_nothing() {
        let seq = RequestSequence::new();
        assert_eq!(seq.issued(), 0);
        assert!(!seq.is_closed());
    }

    #[test]
    fn next_increments() {
        let mut seq = RequestSequence::new();
        assert_eq!(seq.next().value(), 1);
        assert_eq!(seq.next().value(), 2);
        assert_eq!(seq.issued(), 2);
    }

    #[test]
    fn only_latest_ticket_is_current() {
        let mut seq = RequestSequence::new();
        let first = seq.next();
        assert!(seq.is_current(first));

        let second = seq.next();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(first < second);
    }

    #[test]
    fn close_invalidates_everything() {
        let mut seq = RequestSequence::new();
        let ticket = seq.next();
        seq.close();
        assert!(!seq.is_current(ticket));

        let later = seq.next();
        assert!(!seq.is_current(later));
    }
}
