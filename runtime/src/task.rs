use tokio::task::AbortHandle;

/// An owned, cancellable handle to one background task.
///
/// The form keeps one slot per kind of task (in-flight submission, pending
/// auto-reset) and cancels both on teardown.
#[derive(Debug, Default)]
pub(crate) struct TaskSlot {
    handle: Option<AbortHandle>,
}

impl TaskSlot {
    /// Stores `handle`, aborting whatever the slot held before.
    pub(crate) fn arm(&mut self, handle: AbortHandle) {
        if let Some(previous) = self.handle.replace(handle) {
            previous.abort();
        }
    }

    /// Forgets the handle without aborting. Called by the task itself when it settles.
    pub(crate) fn disarm(&mut self) {
        self.handle = None;
    }

    /// Aborts the task, if any. Returns whether one was armed.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_task() {
        let task = tokio::spawn(tokio::time::sleep(Duration::from_secs(60)));
        let mut slot = TaskSlot::default();
        slot.arm(task.abort_handle());

        assert!(slot.cancel());
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(!slot.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_aborts_previous() {
        let first = tokio::spawn(tokio::time::sleep(Duration::from_secs(60)));
        let second = tokio::spawn(tokio::time::sleep(Duration::from_millis(10)));
        let mut slot = TaskSlot::default();
        slot.arm(first.abort_handle());
        slot.arm(second.abort_handle());

        assert!(first.await.unwrap_err().is_cancelled());
        second.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_leaves_task_running() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            5
        });
        let mut slot = TaskSlot::default();
        slot.arm(task.abort_handle());
        slot.disarm();
        assert!(!slot.cancel());
        assert_eq!(task.await.unwrap(), 5);
    }
}
