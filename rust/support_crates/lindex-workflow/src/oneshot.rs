//! Single-value handoff between two threads.
//!
//! The pool uses it to hand a task's outcome back to the submitter's
//! [`JoinHandle`](crate::join_handle::JoinHandle). The channel closes exactly
//! once: either when the sender delivers its value or when it is dropped
//! without sending. A receiver blocked in [`OneshotReceiver::recv`] wakes up
//! in both cases.

use std::sync::{Arc, Condvar, Mutex};

/// Creates a connected sender/receiver pair.
pub fn channel<T>() -> (OneshotSender<T>, OneshotReceiver<T>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(SlotState {
            value: None,
            closed: false,
        }),
        closed: Condvar::new(),
    });
    (OneshotSender(slot.clone()), OneshotReceiver(slot))
}

/// The sending half. Consumed by [`send`](Self::send); dropping it unsent
/// closes the channel empty.
pub struct OneshotSender<T>(Arc<Slot<T>>);

impl<T> OneshotSender<T> {
    pub fn send(self, value: T) {
        self.0.close_with(Some(value));
    }
}

impl<T> Drop for OneshotSender<T> {
    fn drop(&mut self) {
        // No-op after `send`: the channel is already closed.
        self.0.close_with(None);
    }
}

/// The receiving half.
pub struct OneshotReceiver<T>(Arc<Slot<T>>);

impl<T> OneshotReceiver<T> {
    /// Blocks until the channel closes, then takes the value. Returns `None`
    /// if the sender was dropped unsent or the value was already taken.
    pub fn recv(&self) -> Option<T> {
        let state = self.0.state.lock().unwrap();
        let mut state = self.0.closed.wait_while(state, |s| !s.closed).unwrap();
        state.value.take()
    }
}

struct Slot<T> {
    state: Mutex<SlotState<T>>,
    closed: Condvar,
}

struct SlotState<T> {
    value: Option<T>,
    closed: bool,
}

impl<T> Slot<T> {
    fn close_with(&self, value: Option<T>) {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return;
        }
        state.value = value;
        state.closed = true;
        drop(state);
        self.closed.notify_all();
    }
}
