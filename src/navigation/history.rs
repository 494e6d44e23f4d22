use std::sync::{Arc, Mutex, PoisonError};

/// Navigation history collaborator. The synchronizer only ever pushes new
/// entries; moving through history is the host's concern, surfaced back to
/// the core as an external address change.
pub trait History: Send + Sync {
    fn push(&self, path: &str);
    fn current(&self) -> Option<String>;
}

pub type SharedHistory = Arc<dyn History>;

#[derive(Debug, Default)]
struct HistoryState {
    entries: Vec<String>,
    cursor: usize,
}

/// In-memory history stack with a cursor, used by tests and demo wiring.
/// Pushing while back in the stack drops the forward entries, matching
/// browser history semantics.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    state: Mutex<HistoryState>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the cursor one entry back and return the address now current.
    pub fn back(&self) -> Option<String> {
        let mut state = self.lock();
        if state.cursor == 0 || state.entries.is_empty() {
            return None;
        }
        state.cursor -= 1;
        state.entries.get(state.cursor).cloned()
    }

    /// Move the cursor one entry forward and return the address now current.
    pub fn forward(&self) -> Option<String> {
        let mut state = self.lock();
        if state.cursor + 1 >= state.entries.len() {
            return None;
        }
        state.cursor += 1;
        state.entries.get(state.cursor).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

impl History for InMemoryHistory {
    fn push(&self, path: &str) {
        let mut state = self.lock();
        let next = state.cursor.saturating_add(1);
        let truncate_to = if state.entries.is_empty() { 0 } else { next };
        state.entries.truncate(truncate_to);
        state.entries.push(path.to_string());
        state.cursor = state.entries.len() - 1;
    }

    fn current(&self) -> Option<String> {
        let state = self.lock();
        state.entries.get(state.cursor).cloned()
    }
}
