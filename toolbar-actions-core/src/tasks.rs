//! Keyed async tasks for the editor's network calls and timers
//!
//! At most one task runs per [`TaskKey`]. Starting a task with a key that is
//! already running aborts the old one first, so a superseded save never
//! reports back. Finished tasks send their result action through the
//! editor's completion channel.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::action::Action;

/// The editor's task slots.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TaskKey {
    SaveAction,
    DeleteAction,
    TooltipDismiss,
}

impl TaskKey {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKey::SaveAction => "save_action",
            TaskKey::DeleteAction => "delete_action",
            TaskKey::TooltipDismiss => "tooltip_dismiss",
        }
    }
}

/// Spawns, replaces and cancels keyed tasks.
///
/// Tasks run on the current tokio runtime. Outside one, starting a task
/// logs a warning and does nothing.
pub struct TaskManager<A> {
    tasks: HashMap<TaskKey, AbortHandle>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A: Action> TaskManager<A> {
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            tasks: HashMap::new(),
            action_tx,
        }
    }

    /// Run `future` now, replacing any task under the same key.
    pub fn spawn<F>(&mut self, key: TaskKey, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.start(key, None, future)
    }

    /// Run `future` after `delay`. A newer call with the same key restarts the wait.
    pub fn debounce<F>(&mut self, key: TaskKey, delay: Duration, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.start(key, Some(delay), future)
    }

    fn start<F>(&mut self, key: TaskKey, delay: Option<Duration>, future: F) -> &mut Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.cancel(&key);

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(task = key.name(), "No tokio runtime, task not started");
            return self;
        };
        let tx = self.action_tx.clone();
        let handle = runtime.spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let action = future.await;
            // Receiver gone means the editor was dropped
            let _ = tx.send(action);
        });
        tracing::trace!(task = key.name(), ?delay, "Task started");

        self.tasks.insert(key, handle.abort_handle());
        self
    }

    /// Abort the task under `key`, if any.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(handle) = self.tasks.remove(key) {
            if !handle.is_finished() {
                tracing::trace!(task = key.name(), "Task aborted");
            }
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    /// True while the task under `key` has not finished.
    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.tasks
            .get(key)
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
