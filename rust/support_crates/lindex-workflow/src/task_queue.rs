//! A blocking, unbounded, multi-producer multi-consumer queue.
//!
//! Items are dequeued in the order they were accepted. The queue can be
//! closed: after [`TaskQueue::close`] no new item is accepted, consumers keep
//! draining what is left, and once the queue is empty every blocked or
//! subsequent [`TaskQueue::pop`] returns `None`.

use std::{
    collections::VecDeque,
    sync::{Arc, Condvar, Mutex, MutexGuard},
};

/// Handle to a shared queue. Clones refer to the same queue.
pub struct TaskQueue<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    backlog: Mutex<Backlog<T>>,
    available: Condvar,
}

struct Backlog<T> {
    items: VecDeque<T>,
    accepting: bool,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        TaskQueue {
            shared: Arc::new(Shared {
                backlog: Mutex::new(Backlog {
                    items: VecDeque::new(),
                    accepting: true,
                }),
                available: Condvar::new(),
            }),
        }
    }

    /// Appends an item, waking one blocked consumer. Hands the item back if
    /// the queue is closed.
    pub fn push(&self, item: T) -> Result<(), T> {
        {
            let mut backlog = self.backlog();
            if !backlog.accepting {
                return Err(item);
            }
            backlog.items.push_back(item);
        }
        self.shared.available.notify_one();
        Ok(())
    }

    /// Takes the oldest item, blocking while the queue is open and empty.
    pub fn pop(&self) -> Option<T> {
        let backlog = self.backlog();
        let mut backlog = self
            .shared
            .available
            .wait_while(backlog, |b| b.items.is_empty() && b.accepting)
            .unwrap();
        backlog.items.pop_front()
    }

    /// Stops accepting items and wakes every blocked consumer. Idempotent.
    pub fn close(&self) {
        self.backlog().accepting = false;
        self.shared.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        !self.backlog().accepting
    }

    pub fn len(&self) -> usize {
        self.backlog().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn backlog(&self) -> MutexGuard<'_, Backlog<T>> {
        self.shared.backlog.lock().unwrap()
    }
}

impl<T> Clone for TaskQueue<T> {
    fn clone(&self) -> Self {
        TaskQueue {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        TaskQueue::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::*;

    #[test]
    fn test_items_come_out_in_push_order() {
        let queue = TaskQueue::new();
        for letter in 'a'..='z' {
            queue.push(letter).unwrap();
        }
        assert_eq!(queue.len(), 26);
        let drained: String = (0..26).map(|_| queue.pop().unwrap()).collect();
        assert_eq!(drained, "abcdefghijklmnopqrstuvwxyz");
    }

    #[test]
    fn test_consumer_waits_for_producer() {
        let queue = TaskQueue::new();
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.pop())
        };
        thread::sleep(Duration::from_millis(30));
        queue.push(String::from("late")).unwrap();
        assert_eq!(consumer.join().unwrap().as_deref(), Some("late"));
    }

    #[test]
    fn test_closed_queue_drains_and_rejects() {
        let queue = TaskQueue::new();
        queue.push(10).unwrap();
        queue.close();
        queue.close();

        assert!(queue.is_closed());
        assert_eq!(queue.push(11), Err(11));
        assert_eq!(queue.pop(), Some(10));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_close_releases_idle_consumers() {
        let queue = TaskQueue::<()>::new();
        let idle: Vec<_> = (0..4)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || queue.pop().is_none())
            })
            .collect();
        thread::sleep(Duration::from_millis(30));
        queue.close();
        assert!(idle.into_iter().all(|c| c.join().unwrap()));
    }

    #[test]
    fn test_every_item_consumed_once() {
        let queue = TaskQueue::new();
        let total: u64 = thread::scope(|s| {
            let consumers: Vec<_> = (0..3)
                .map(|_| {
                    let queue = &queue;
                    s.spawn(move || {
                        let mut sum = 0u64;
                        while let Some(n) = queue.pop() {
                            sum += n;
                        }
                        sum
                    })
                })
                .collect();
            let producers: Vec<_> = (0..2u64)
                .map(|p| {
                    let queue = &queue;
                    s.spawn(move || {
                        for n in 1..=500 {
                            queue.push(p * 500 + n).unwrap();
                        }
                    })
                })
                .collect();
            for producer in producers {
                producer.join().unwrap();
            }
            queue.close();
            consumers.into_iter().map(|c| c.join().unwrap()).sum()
        });
        assert_eq!(total, (1..=1000).sum());
    }
}
