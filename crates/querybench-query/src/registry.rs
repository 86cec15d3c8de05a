//! Cancellation bookkeeping

use std::collections::HashSet;

use crate::session::SessionId;

/// Sessions whose cancellation was requested but whose backend call has not
/// settled yet.
///
/// An id enters on `cancel` and leaves exactly once, through [`Self::take`],
/// when its call settles. `take` is what closes a cancelled session's lifecycle.
#[derive(Debug, Default)]
pub struct CancellationRegistry {
    pending: HashSet<SessionId>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as cancelled. Returns false if it was already marked.
    pub fn insert(&mut self, id: SessionId) -> bool {
        self.pending.insert(id)
    }

    /// Remove `id`, returning whether it had been cancelled
    pub fn take(&mut self, id: SessionId) -> bool {
        self.pending.remove(&id)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.pending.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_removes_exactly_once() {
        let mut registry = CancellationRegistry::new();
        let id = SessionId::new();

        assert!(registry.insert(id));
        assert!(!registry.insert(id));
        assert!(registry.contains(id));

        assert!(registry.take(id));
        assert!(!registry.take(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unrelated_ids_are_not_cancelled() {
        let mut registry = CancellationRegistry::new();
        registry.insert(SessionId::new());

        assert!(!registry.take(SessionId::new()));
        assert_eq!(registry.len(), 1);
    }
}
