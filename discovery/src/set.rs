//! Duplicate-free collection of raw image references.

use std::collections::BTreeSet;

use parking_lot::Mutex;

/// Raw references gathered from every manifest in one run.
///
/// Both extractors insert through a shared reference; inserts are
/// serialized by an internal lock so files can be processed concurrently.
#[derive(Debug, Default)]
pub struct ReferenceSet {
    references: Mutex<BTreeSet<String>>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reference. Returns `false` if it was already present.
    pub fn insert(&self, reference: impl Into<String>) -> bool {
        self.references.lock().insert(reference.into())
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.references.lock().contains(reference)
    }

    pub fn len(&self) -> usize {
        self.references.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.lock().is_empty()
    }

    /// Sorted copy of the current contents.
    pub fn snapshot(&self) -> Vec<String> {
        self.references.lock().iter().cloned().collect()
    }

    /// Take every reference out of the set, sorted.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.references.lock())
            .into_iter()
            .collect()
    }
}

impl FromIterator<String> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            references: Mutex::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_insert_is_idempotent() {
        let set = ReferenceSet::new();
        assert!(set.insert("quay.io/org/app:v2"));
        for _ in 0..5 {
            assert!(!set.insert("quay.io/org/app:v2"));
        }
        assert_eq!(set.len(), 1);
        assert!(set.contains("quay.io/org/app:v2"));
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a: ReferenceSet = ["b/x:1", "a/y:2", "b/x:1"].iter().map(|s| s.to_string()).collect();
        let b: ReferenceSet = ["a/y:2", "b/x:1"].iter().map(|s| s.to_string()).collect();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_drain_empties_set() {
        let set = ReferenceSet::new();
        set.insert("r/b:2");
        set.insert("r/a:1");
        assert_eq!(set.drain(), vec!["r/a:1".to_string(), "r/b:2".to_string()]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_concurrent_inserts() {
        let set = Arc::new(ReferenceSet::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let set = Arc::clone(&set);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        set.insert(format!("registry.local/app{}:{}", i % 10, t % 2));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(set.len(), 20);
    }
}
