use tokio::task::JoinHandle;

/// RAII guard for a spawned task.
///
/// Invariants:
/// - The task is aborted exactly once, on Drop, unless it already finished
/// - Dropping the owner (e.g. an aborted driver) therefore tears the task down too
#[derive(Debug)]
pub(crate) struct TaskGuard {
    handle: JoinHandle<()>,
}

impl TaskGuard {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    pub(crate) fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
