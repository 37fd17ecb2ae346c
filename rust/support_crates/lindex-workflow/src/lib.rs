//! Threading primitives for the two-phase indexing pipeline.
//!
//! # Key Components
//!
//! - [`worker_pool::WorkerPool`] - A fixed-size pool of worker threads fed by a
//!   shared task queue, with drain-and-join shutdown semantics
//! - [`phase_barrier::PhaseBarrier`] - A one-shot gate that releases every waiting
//!   thread once a phase has completed
//! - [`join_handle::JoinHandle`] - A handle for waiting on the result of a task
//!   submitted to the pool
//! - [`oneshot`] - Single-value communication between threads
//! - [`task_queue`] - The blocking multi-consumer queue the pool workers pull from

pub mod join_handle;
pub mod oneshot;
pub mod phase_barrier;
pub mod task_queue;
pub mod worker_pool;
