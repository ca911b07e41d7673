//! Correlation table: pending request ids mapped to single-shot completions.
//!
//! Each request-style send registers a [`tokio::sync::oneshot`] sender keyed
//! by a freshly allocated id and hands the receiver back to the caller. Using
//! a oneshot channel makes "the completion fires at most once" structural: the
//! sender is consumed by delivery, and removal from the map happens before the
//! send, so a completion that re-enters the bridge and registers a new request
//! never observes inconsistent table state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;

/// Pending response waiters for one bridge instance.
///
/// Ids are strictly increasing for the lifetime of the table and start at 0.
/// Entries are removed when resolved; an entry whose response never arrives
/// stays in the map until the bridge is dropped, which the protocol accepts
/// since the underlying channel is assumed reliable.
pub struct CorrelationTable {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, oneshot::Sender<serde_json::Value>>>,
}

impl CorrelationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Allocate the next id and register a completion under it.
    ///
    /// Never fails. The receiver completes when a matching response is
    /// resolved, or errors if the table is dropped first.
    pub fn register(&self) -> (u64, oneshot::Receiver<serde_json::Value>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);
        (id, rx)
    }

    /// Deliver `response` to the completion registered under `id`.
    ///
    /// Returns `true` if a waiter was found and removed. An unknown id is not
    /// an error: a late reply after the consumer stopped caring, or an id from
    /// a previous bridge instance, is dropped and the caller decides whether
    /// to count it.
    pub fn resolve(&self, id: u64, response: serde_json::Value) -> bool {
        let waiter = self.pending.lock().remove(&id);
        match waiter {
            Some(tx) => {
                // The receiver may already be gone if the caller gave up;
                // delivery is still "resolved" for table purposes.
                let _ = tx.send(response);
                true
            }
            None => false,
        }
    }

    /// Number of requests still waiting for a response.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}

impl Default for CorrelationTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_start_at_zero_and_strictly_increase() {
        let table = CorrelationTable::new();
        let (a, _rx_a) = table.register();
        let (b, _rx_b) = table.register();
        let (c, _rx_c) = table.register();
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(table.pending(), 3);
    }

    #[test]
    fn resolve_delivers_exactly_once_and_removes() {
        let table = CorrelationTable::new();
        let (id, mut rx) = table.register();

        assert!(table.resolve(id, json!({"ok": true})));
        assert_eq!(rx.try_recv().unwrap(), json!({"ok": true}));
        assert_eq!(table.pending(), 0);

        // Second resolve with the same id is a no-op.
        assert!(!table.resolve(id, json!({"ok": false})));
    }

    #[test]
    fn resolve_unknown_id_is_noop() {
        let table = CorrelationTable::new();
        let (_id, mut rx) = table.register();

        assert!(!table.resolve(42, json!(null)));
        assert_eq!(table.pending(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn resolve_out_of_declared_order() {
        let table = CorrelationTable::new();
        let (first, mut rx_first) = table.register();
        let (second, mut rx_second) = table.register();

        assert!(table.resolve(second, json!("second")));
        assert!(table.resolve(first, json!("first")));

        assert_eq!(rx_first.try_recv().unwrap(), json!("first"));
        assert_eq!(rx_second.try_recv().unwrap(), json!("second"));
    }

    #[test]
    fn registration_during_resolution_keeps_ids_increasing() {
        let table = CorrelationTable::new();
        let (a, mut rx_a) = table.register();

        assert!(table.resolve(a, json!(1)));
        // A completion may immediately issue a new request; the id sequence
        // continues and the new entry is independent of the resolved one.
        let (b, _rx_b) = table.register();
        assert!(b > a);
        assert_eq!(rx_a.try_recv().unwrap(), json!(1));
        assert_eq!(table.pending(), 1);
    }

    #[test]
    fn dropped_receiver_still_counts_as_resolved() {
        let table = CorrelationTable::new();
        let (id, rx) = table.register();
        drop(rx);

        assert!(table.resolve(id, json!(null)));
        assert_eq!(table.pending(), 0);
    }
}
