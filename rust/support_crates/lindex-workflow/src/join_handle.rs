//! Handles for waiting on tasks submitted to a [`WorkerPool`](crate::worker_pool::WorkerPool).
//!
//! A task's outcome travels back over a oneshot channel. A task that panics
//! does not take its worker down with it: the panic is captured and surfaces
//! here as [`JoinError::Panicked`].

use std::any::Any;

use crate::oneshot::OneshotReceiver;

/// Outcome of a task as delivered by the worker: the return value, or the
/// payload of the panic that aborted it.
pub(crate) type TaskOutcome<R> = std::thread::Result<R>;

/// Waits for the result of one submitted task.
pub struct JoinHandle<R>(OneshotReceiver<TaskOutcome<R>>);

impl<R> JoinHandle<R> {
    pub(crate) fn new(rx: OneshotReceiver<TaskOutcome<R>>) -> JoinHandle<R> {
        JoinHandle(rx)
    }

    /// Blocks until the task has finished and returns its result.
    pub fn join(self) -> Result<R, JoinError> {
        Self::resolve(self.0.recv())
    }

    /// Joins every handle, returning the results in iteration order.
    pub fn join_all(
        handles: impl IntoIterator<Item = JoinHandle<R>>,
    ) -> Vec<Result<R, JoinError>> {
        handles.into_iter().map(JoinHandle::join).collect()
    }

    fn resolve(outcome: Option<TaskOutcome<R>>) -> Result<R, JoinError> {
        match outcome {
            Some(Ok(value)) => Ok(value),
            Some(Err(payload)) => Err(JoinError::Panicked(panic_message(payload.as_ref()))),
            None => Err(JoinError::Cancelled),
        }
    }
}

/// Reason a task did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// The task panicked; carries the panic message when it was a string.
    Panicked(String),
    /// The task was dropped before it ran.
    Cancelled,
}

impl std::fmt::Display for JoinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinError::Panicked(msg) => write!(f, "task panicked: {msg}"),
            JoinError::Cancelled => write!(f, "task was cancelled before it ran"),
        }
    }
}

impl std::error::Error for JoinError {}

/// Extracts a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
