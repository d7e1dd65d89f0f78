//! Monotonic request tickets so only the newest response for a slice is applied.

use std::sync::atomic::{AtomicU64, Ordering};

use super::state::Slice;

/// Identifies one request for a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ticket(u64);

/// Issues tickets for one slice and remembers the newest.
#[derive(Debug, Default)]
pub(crate) struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub(crate) fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no request has been issued since `ticket`.
    pub(crate) fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[derive(Debug, Default)]
pub(crate) struct SliceSequences {
    profile: RequestSequence,
    balance: RequestSequence,
    transactions: RequestSequence,
}

impl SliceSequences {
    pub(crate) fn get(&self, slice: Slice) -> &RequestSequence {
        match slice {
            Slice::Profile => &self.profile,
            Slice::Balance => &self.balance,
            Slice::Transactions => &self.transactions,
        }
    }
}
