//! fence.rs: Request tokens for discarding stale fetch responses
//!
//! Invariants:
//! - Tickets are issued in strictly increasing order, starting at 1.
//! - Only the most recently issued ticket is current; issuing a new one makes
//!   every older ticket stale for good.
//! - Cheap to clone; all clones share the same counter.
//!
//! Usage:
//! - Call `issue()` right before starting a fetch and keep the ticket.
//! - When the response arrives, apply it only if `is_current(ticket)`.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Token identifying one fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct FetchTicket(u64);

impl FetchTicket {
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Shared generation counter fencing out stale responses.
#[derive(Debug, Clone, Default)]
pub struct FetchFence(Arc<AtomicU64>);

impl FetchFence {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    /// Issue a new ticket, making all earlier tickets stale.
    pub fn issue(&self) -> FetchTicket {
        FetchTicket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[inline]
    /// Whether `ticket` is the latest one issued.
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }

    #[inline]
    /// Latest ticket issued, if any.
    pub fn latest(&self) -> Option<FetchTicket> {
        match self.0.load(Ordering::SeqCst) {
            0 => None,
            n => Some(FetchTicket(n)),
        }
    }
}
