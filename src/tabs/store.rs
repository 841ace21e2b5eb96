use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::{TabId, TabResult};

/// Per-tab classification results. Entries live until the tab closes; a new
/// response for the same tab overwrites unconditionally, so the last response
/// to arrive wins.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: Mutex<HashMap<TabId, TabResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, tab: TabId, result: TabResult) {
        self.results.lock().insert(tab, result);
    }

    /// Absence means the tab has not been classified yet.
    pub fn get(&self, tab: TabId) -> Option<TabResult> {
        self.results.lock().get(&tab).copied()
    }

    pub fn remove(&self, tab: TabId) -> Option<TabResult> {
        self.results.lock().remove(&tab)
    }

    pub fn len(&self) -> usize {
        self.results.lock().len()
    }
}
