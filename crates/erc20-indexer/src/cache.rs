use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::types::query::CachedQueryResult;

/// Address-keyed memo of completed queries.
///
/// Keys are matched exactly: no case folding or trimming. Entries are never
/// evicted. Stored results are shared and never mutated.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<String, Arc<CachedQueryResult>>,
    /// Most recently inserted first.
    recent: VecDeque<String>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the result stored for `address`.
    pub fn get(&self, address: &str) -> Option<Arc<CachedQueryResult>> {
        self.entries.get(address).cloned()
    }

    /// Insert or overwrite the entry for `address` and move it to the front
    /// of the recent list.
    pub fn put(&mut self, address: &str, result: Arc<CachedQueryResult>) {
        if self.entries.insert(address.to_string(), result).is_some() {
            self.recent.retain(|a| a != address);
        }
        self.recent.push_front(address.to_string());
    }

    /// Every cached address, most recently inserted first.
    pub fn recent_addresses(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
