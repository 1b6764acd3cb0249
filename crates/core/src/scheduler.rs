//! Scheduler module - virtual clock and delayed continuations
//!
//! Every suspension point of the session (start delay, spawn cooldown, purge
//! stagger, settle wait, reset delay) is a [`Task`] scheduled here. The session
//! advances the clock once per tick and runs each due task at its exact due
//! time, so a large `elapsed` behaves the same as many small ones.

use arrayvec::ArrayVec;

/// Upper bound on simultaneously pending continuations.
///
/// The session never has more than two in flight (a spawn plus a purge or
/// reload step); the rest is headroom.
pub const MAX_PENDING_TASKS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Spawn the next current piece.
    SpawnNext,
    /// Hide the next piece of the game-over snapshot.
    PurgeStep,
    /// Record the best score and show the end screen.
    FinishGameOver,
    /// Rebuild the session from scratch.
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    due_ms: u64,
    seq: u64,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    pending: ArrayVec<Pending, MAX_PENDING_TASKS>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` `delay_ms` after the current time.
    ///
    /// Returns `false` (and drops the task) if the queue is full.
    pub fn schedule(&mut self, delay_ms: u32, task: Task) -> bool {
        let pending = Pending {
            due_ms: self.now_ms + delay_ms as u64,
            seq: self.next_seq,
            task,
        };
        self.next_seq += 1;
        if self.pending.try_push(pending).is_err() {
            log::warn!("scheduler full, dropping {:?}", task);
            return false;
        }
        true
    }

    /// Pop the earliest task due at or before `until_ms`, moving the clock to its due time.
    ///
    /// Ties run in scheduling order. Call [`Scheduler::advance_to`] afterwards
    /// to land on `until_ms`.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Task> {
        let (index, pending) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.seq))
            .map(|(i, p)| (i, *p))?;

        self.pending.remove(index);
        self.now_ms = self.now_ms.max(pending.due_ms);
        Some(pending.task)
    }

    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    pub fn is_pending(&self, task: Task) -> bool {
        self.pending.iter().any(|p| p.task == task)
    }

    /// Time left until `task` runs, if it is pending.
    pub fn remaining_ms(&self, task: Task) -> Option<u64> {
        self.pending
            .iter()
            .filter(|p| p.task == task)
            .map(|p| p.due_ms.saturating_sub(self.now_ms))
            .min()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop every pending task; the clock keeps running.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_runs_before_due() {
        let mut s = Scheduler::new();
        s.schedule(500, Task::SpawnNext);
        assert_eq!(s.pop_due(499), None);
        assert_eq!(s.pop_due(500), Some(Task::SpawnNext));
        assert_eq!(s.now_ms(), 500);
    }

    #[test]
    fn due_tasks_run_in_time_order_then_fifo() {
        let mut s = Scheduler::new();
        s.schedule(300, Task::FinishGameOver);
        s.schedule(100, Task::PurgeStep);
        s.schedule(100, Task::SpawnNext);

        assert_eq!(s.pop_due(1000), Some(Task::PurgeStep));
        assert_eq!(s.pop_due(1000), Some(Task::SpawnNext));
        assert_eq!(s.pop_due(1000), Some(Task::FinishGameOver));
        assert_eq!(s.now_ms(), 300);
        assert_eq!(s.pop_due(1000), None);

        s.advance_to(1000);
        assert_eq!(s.now_ms(), 1000);
    }

    #[test]
    fn tasks_scheduled_mid_catch_up_are_relative_to_their_parent() {
        let mut s = Scheduler::new();
        s.schedule(100, Task::PurgeStep);

        let task = s.pop_due(1000).unwrap();
        assert_eq!(task, Task::PurgeStep);
        s.schedule(100, Task::PurgeStep);
        assert_eq!(s.remaining_ms(Task::PurgeStep), Some(100));
        assert_eq!(s.pop_due(1000), Some(Task::PurgeStep));
        assert_eq!(s.now_ms(), 200);
    }

    #[test]
    fn full_queue_rejects_new_tasks() {
        let mut s = Scheduler::new();
        for _ in 0..MAX_PENDING_TASKS {
            assert!(s.schedule(10, Task::SpawnNext));
        }
        assert!(!s.schedule(10, Task::Reload));
        assert!(!s.is_pending(Task::Reload));
    }

    #[test]
    fn clear_keeps_clock() {
        let mut s = Scheduler::new();
        s.advance_to(40);
        s.schedule(10, Task::Reload);
        s.clear();
        assert_eq!(s.pending_len(), 0);
        assert_eq!(s.now_ms(), 40);
    }
}
