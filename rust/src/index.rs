//! Dense node ids for task codes.
//!
//! The graph is an arena addressed by index; this maps task codes to those
//! indices so per-task data lives in plain vectors.

use rustc_hash::FxHashMap;

/// Index of a node in the task graph arena.
pub type NodeId = usize;

/// Bidirectional mapping between task codes and node ids.
///
/// Ids are assigned in insertion order, starting at 0.
#[derive(Debug, Clone)]
pub struct TaskIndex<'a> {
    to_id: FxHashMap<&'a str, NodeId>,
    from_id: Vec<&'a str>,
}

impl<'a> TaskIndex<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_id: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_id: Vec::with_capacity(capacity),
        }
    }

    /// Register a code and return its new id.
    ///
    /// Returns `Err` with the existing id if the code is already registered;
    /// the index is left unchanged in that case.
    pub fn insert(&mut self, code: &'a str) -> Result<NodeId, NodeId> {
        if let Some(&existing) = self.to_id.get(code) {
            return Err(existing);
        }
        let id = self.from_id.len();
        self.from_id.push(code);
        self.to_id.insert(code, id);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, code: &str) -> Option<NodeId> {
        self.to_id.get(code).copied()
    }

    #[inline]
    pub fn resolve(&self, id: NodeId) -> Option<&'a str> {
        self.from_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.from_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_id.is_empty()
    }
}

impl Default for TaskIndex<'_> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_resolve() {
        let mut index = TaskIndex::with_capacity(4);

        let a = index.insert("task_a").unwrap();
        let b = index.insert("task_b").unwrap();

        assert_eq!((a, b), (0, 1));
        assert_eq!(index.resolve(a), Some("task_a"));
        assert_eq!(index.get("task_b"), Some(b));
        assert_eq!(index.get("nonexistent"), None);
        assert_eq!(index.resolve(7), None);
    }

    #[test]
    fn test_duplicate_insert_reports_existing() {
        let mut index = TaskIndex::default();

        let first = index.insert("a").unwrap();
        assert_eq!(index.insert("a"), Err(first));
        assert_eq!(index.len(), 1);
    }
}
