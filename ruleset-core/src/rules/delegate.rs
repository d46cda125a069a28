//! Delegates
//!
//! A delegate is a terminal observer. It is registered as a dependent of one
//! or more source nodes and hands their current values to an external
//! callback.
//!
//! # Firing Rule
//!
//! Every change notification that reaches the delegate from any one of its
//! sources invokes the callback exactly once, with the values of *all*
//! sources in declaration order. Notifications are not coalesced: if two
//! sources change during one cascade, the callback runs twice.
//!
//! Delegates also fire once when they are created, so the callback always
//! observes the starting tuple before any transition.

use smallvec::SmallVec;

use crate::graph::NodeId;
use crate::value::Value;

/// Callback invoked with source values in declaration order.
pub type DelegateFn = Box<dyn FnMut(&[Value]) + Send>;

pub(crate) struct Delegate {
    sources: SmallVec<[NodeId; 2]>,
    callback: DelegateFn,
    fire_count: usize,
}

impl Delegate {
    pub(crate) fn new(sources: &[NodeId], callback: DelegateFn) -> Self {
        Self {
            sources: SmallVec::from_slice(sources),
            callback,
            fire_count: 0,
        }
    }

    pub(crate) fn sources(&self) -> &[NodeId] {
        &self.sources
    }

    pub(crate) fn fire(&mut self, values: &[Value]) {
        self.fire_count += 1;
        (self.callback)(values);
    }

    pub(crate) fn fire_count(&self) -> usize {
        self.fire_count
    }
}

impl std::fmt::Debug for Delegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delegate")
            .field("sources", &self.sources)
            .field("fire_count", &self.fire_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    #[test]
    fn fire_passes_values_and_counts() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let mut delegate = Delegate::new(
            &[NodeId::new(0, 0)],
            Box::new(move |values: &[Value]| seen_clone.lock().push(values.to_vec())),
        );
        assert_eq!(delegate.fire_count(), 0);

        delegate.fire(&[Value::Int(4)]);
        delegate.fire(&[Value::Int(5)]);

        assert_eq!(delegate.fire_count(), 2);
        assert_eq!(*seen.lock(), vec![vec![Value::Int(4)], vec![Value::Int(5)]]);
    }
}
