//! Fixed-size worker pool with drain-and-join shutdown.
//!
//! Tasks are closures submitted through [`WorkerPool::submit`]. They are placed
//! on a shared [`TaskQueue`] in acceptance order and picked up by whichever
//! worker becomes free first, so no execution order is guaranteed across
//! workers. Idle workers block on the queue.
//!
//! [`WorkerPool::shutdown`] closes the queue, lets the workers finish every
//! task that was already accepted, and joins all worker threads. Dropping the
//! pool does the same.

use std::{
    io,
    panic::{self, AssertUnwindSafe},
    sync::Mutex,
    thread,
};

use crate::{join_handle::JoinHandle, oneshot, task_queue::TaskQueue};

/// A boxed function that can be executed by a worker thread.
type TaskFn = Box<dyn FnOnce() + Send + 'static>;

/// A pool of `num_threads` worker threads executing submitted tasks.
///
/// All methods take `&self`; share the pool between threads with an `Arc`.
pub struct WorkerPool {
    queue: TaskQueue<TaskFn>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    num_threads: usize,
}

impl WorkerPool {
    /// Creates a pool with `num_threads` unnamed workers.
    ///
    /// # Panics
    ///
    /// Panics if `num_threads` is 0.
    pub fn new(num_threads: usize) -> io::Result<Self> {
        Self::with_thread_name(num_threads, |_| String::new())
    }

    /// Creates a pool whose workers are named by `thread_name(index)`.
    ///
    /// An empty name leaves the thread unnamed. If any worker fails to spawn,
    /// the workers started so far are shut down and the spawn error is returned.
    ///
    /// # Panics
    ///
    /// Panics if `num_threads` is 0.
    pub fn with_thread_name(
        num_threads: usize,
        thread_name: impl Fn(usize) -> String,
    ) -> io::Result<Self> {
        assert_ne!(num_threads, 0);

        let pool = WorkerPool {
            queue: TaskQueue::new(),
            workers: Mutex::new(Vec::new()),
            num_threads,
        };

        for i in 0..num_threads {
            let queue = pool.queue.clone();
            let mut builder = thread::Builder::new();
            let name = thread_name(i);
            if !name.is_empty() {
                builder = builder.name(name);
            }
            // On error `pool` is dropped here, which joins the workers already running.
            let worker = builder.spawn(move || Self::thread_fn(queue))?;
            pool.workers.lock().unwrap().push(worker);
        }

        Ok(pool)
    }

    /// Submits a task and returns a handle to wait for its result.
    ///
    /// Returns [`SubmitError::ShutDown`] if the pool no longer accepts work.
    pub fn submit<F, R>(&self, f: F) -> Result<JoinHandle<R>, SubmitError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx_result, rx_result) = oneshot::channel();
        let task: TaskFn = Box::new(move || {
            tx_result.send(panic::catch_unwind(AssertUnwindSafe(f)));
        });
        self.queue.push(task).map_err(|_| SubmitError::ShutDown)?;
        Ok(JoinHandle::new(rx_result))
    }

    /// Stops accepting tasks, waits for every queued and running task to
    /// finish, and joins all worker threads. Idempotent.
    ///
    /// When called from one of the pool's own workers, that worker is not
    /// joined (it exits on its own once the queue is drained).
    pub fn shutdown(&self) {
        self.queue.close();
        let workers = std::mem::take(&mut *self.workers.lock().unwrap());
        let current = thread::current().id();
        for worker in workers {
            if worker.thread().id() != current {
                // Tasks run under catch_unwind, a worker never panics.
                let _ = worker.join();
            }
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.queue.is_closed()
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    fn thread_fn(queue: TaskQueue<TaskFn>) {
        while let Some(task) = queue.pop() {
            task();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Error returned by [`WorkerPool::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The pool has been shut down and accepts no more tasks.
    ShutDown,
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::ShutDown => write!(f, "worker pool has been shut down"),
        }
    }
}

impl std::error::Error for SubmitError {}
