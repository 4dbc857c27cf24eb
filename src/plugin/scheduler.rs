//! Cooperative one-shot task scheduler.
//!
//! Nothing runs on its own: the host's main loop calls [`Scheduler::take_due`]
//! once per tick and acts on whatever comes back. Tasks fire at most once.

use std::time::{Duration, Instant};

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

#[derive(Debug)]
struct Scheduled<T> {
    id: TaskId,
    due: Instant,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    tasks: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to fire once `delay` has elapsed from now.
    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TaskId {
        self.schedule_at(Instant::now() + delay, task)
    }

    pub fn schedule_at(&mut self, due: Instant, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        // Keep the queue sorted by due time; equal times stay in insertion order.
        let index = self.tasks.partition_point(|s| s.due <= due);
        self.tasks.insert(index, Scheduled { id, due, task });
        trace!("Scheduled {} ({} pending)", id, self.tasks.len());
        id
    }

    /// Returns false when the task already fired or was never scheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().position(|s| s.id == id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let split = self.tasks.partition_point(|s| s.due <= now);
        self.tasks.drain(..split).map(|s| s.task).collect()
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// When the earliest pending task becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.first().map(|s| s.due)
    }
}
