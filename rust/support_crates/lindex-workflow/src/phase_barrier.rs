//! One-shot gate separating two phases of work.
//!
//! Threads of the second phase call [`PhaseBarrier::await_done`] and block
//! until the coordinator calls [`PhaseBarrier::signal_done`]. Once open, the
//! barrier stays open: late arrivals return immediately, and a signal sent
//! before anyone waits is never lost.
//!
//! The done flag lives under a mutex, so everything the signalling thread
//! wrote before [`signal_done`](PhaseBarrier::signal_done) is visible to every
//! thread returning from [`await_done`](PhaseBarrier::await_done).

use std::sync::{Condvar, Mutex};

#[derive(Default)]
pub struct PhaseBarrier {
    done: Mutex<bool>,
    condvar: Condvar,
}

impl PhaseBarrier {
    pub fn new() -> PhaseBarrier {
        PhaseBarrier::default()
    }

    /// Opens the barrier and wakes every waiting thread.
    ///
    /// Returns `true` if this call opened the barrier, `false` if it was
    /// already open.
    pub fn signal_done(&self) -> bool {
        let mut done = self.done.lock().unwrap();
        let opened = !*done;
        *done = true;
        drop(done);
        self.condvar.notify_all();
        opened
    }

    /// Blocks until the barrier is open.
    pub fn await_done(&self) {
        let done = self.done.lock().unwrap();
        let _done = self.condvar.wait_while(done, |done| !*done).unwrap();
    }

    pub fn is_done(&self) -> bool {
        *self.done.lock().unwrap()
    }
}
