use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Serializes administrative writes across both stores.
///
/// Holding the guard spans validation, persistence and cache invalidation,
/// so no cycle check ever observes a graph another writer is changing.
/// Clones share the same lock.
#[derive(Debug, Clone, Default)]
pub struct AdminWriteGate {
    lock: Arc<Mutex<()>>,
}

impl AdminWriteGate {
    /// Creates an unlocked gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive write access.
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}
