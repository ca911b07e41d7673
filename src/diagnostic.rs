//! Diagnostic counters for frames the dispatcher drops on purpose.
//!
//! The protocol is intentionally permissive: responses with no matching waiter
//! and frames with unrecognized tags are silently ignored. These counters make
//! the drops observable without changing that behavior.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Internal counters, updated by the dispatcher.
#[derive(Debug, Default)]
pub(crate) struct BridgeCounters {
    /// Responses whose id matched no pending request.
    pub unmatched_responses: AtomicU64,
    /// Frames whose tag matched no known channel, or arrived inbound on an
    /// outbound-only channel.
    pub ignored_frames: AtomicU64,
}

impl BridgeCounters {
    pub fn snapshot(&self, pending_requests: usize) -> BridgeStats {
        BridgeStats {
            pending_requests,
            unmatched_responses: self.unmatched_responses.load(Ordering::Relaxed),
            ignored_frames: self.ignored_frames.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of bridge diagnostic state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BridgeStats {
    /// Requests still waiting for a response.
    pub pending_requests: usize,
    /// Responses dropped because their id matched no pending request.
    pub unmatched_responses: u64,
    /// Inbound frames ignored for forward compatibility.
    pub ignored_frames: u64,
}
