//! Reveal journal
//!
//! An append-only record of what the engine did and when, stamped with the
//! engine's clock. Hosts read it for diagnostics; the test suites use it to
//! check ordering and monotonicity without sampling the tree mid-flight.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::node::NodeId;

/// What happened.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Animated border started on a container.
    BorderStarted { length: f64 },
    /// One stroke frame; `offset` is the still-hidden length.
    StrokeFrame { offset: f64 },
    /// Animated border reached its final style (or was skipped as degenerate).
    BorderFinished { skipped: bool },
    /// Static border drawn after a container resized.
    BorderRestored { height: f64 },
    /// Element reveal started.
    RevealStarted,
    /// Typed text step; `visible` characters are on screen.
    TextStep { visible: usize },
    /// Element reveal finished.
    RevealFinished,
    /// Dynamic slot content has been filled and revealed.
    SlotFilled { entries: usize },
}

/// One journal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Clock time in milliseconds.
    pub at: f64,
    /// Node the event concerns.
    pub node: NodeId,
    pub kind: EventKind,
}

/// Shared, append-only event log.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    inner: Arc<Mutex<Vec<Event>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, at: f64, node: NodeId, kind: EventKind) {
        self.inner.lock().push(Event { at, node, kind });
    }

    /// Copy of every event so far.
    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().clone()
    }

    /// Events concerning one node, in order.
    pub fn for_node(&self, node: NodeId) -> Vec<Event> {
        self.inner.lock().iter().filter(|e| e.node == node).cloned().collect()
    }

    /// Time of the first event for `node` matching `predicate`.
    pub fn first_at<F>(&self, node: NodeId, predicate: F) -> Option<f64>
    where
        F: Fn(&EventKind) -> bool,
    {
        self.inner
            .lock()
            .iter()
            .find(|e| e.node == node && predicate(&e.kind))
            .map(|e| e.at)
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_query() {
        let journal = Journal::new();
        let a = NodeId::from_raw(1);
        let b = NodeId::from_raw(2);

        journal.record(0.0, a, EventKind::RevealStarted);
        journal.record(10.0, b, EventKind::RevealStarted);
        journal.record(20.0, a, EventKind::RevealFinished);

        assert_eq!(journal.len(), 3);
        assert_eq!(journal.for_node(a).len(), 2);
        assert_eq!(journal.first_at(a, |k| *k == EventKind::RevealFinished), Some(20.0));
        assert_eq!(journal.first_at(b, |k| *k == EventKind::RevealFinished), None);
    }

    #[test]
    fn test_clones_share_the_log() {
        let journal = Journal::new();
        let handle = journal.clone();
        handle.record(1.0, NodeId::from_raw(0), EventKind::SlotFilled { entries: 2 });
        assert!(!journal.is_empty());
    }
}
