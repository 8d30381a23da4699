//! Deferred work as data.
//!
//! Every timeout the simulation needs is described by a [`TimerTask`] and
//! handed to a [`Scheduler`]. The host fires it later by calling
//! `SimulationContext::on_timer`. Keeping the task as a plain value lets the
//! browser back this with `setTimeout` while tests drive a virtual clock.

use crate::overlay::NoteId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTask {
    /// No qualifying input for the whole idle window.
    IdleElapsed,
    /// Open the next autoplay note (or retry the candidate search).
    AutoplayStep,
    /// Close the note autoplay is holding open, then wait for the next step.
    AutoplayRelease { index: usize },
    /// Auto-close requested when the note was opened.
    NoteAutoClose { index: usize, note: NoteId },
    /// Drop a concealed note element once its exit transition is over.
    NoteRemove { note: NoteId },
}

pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32, task: TimerTask) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

#[derive(Clone, Debug)]
struct Pending {
    id: TimerId,
    due_ms: u64,
    task: TimerTask,
}

/// Virtual-clock scheduler. Nothing fires on its own; the owner pulls due
/// timers with [`pop_due`](Self::pop_due).
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: i32,
    pending: Vec<Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    pub fn pending_tasks(&self) -> impl Iterator<Item = (TimerId, TimerTask)> + '_ {
        self.pending.iter().map(|p| (p.id, p.task))
    }

    /// Remove and return the earliest timer due at or before `until_ms`,
    /// moving the clock to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, TimerTask)> {
        let (pos, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(i, p)| (p.due_ms, *i))?;
        let p = self.pending.remove(pos);
        self.now_ms = self.now_ms.max(p.due_ms);
        Some((p.id, p.task))
    }

    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: u32, task: TimerTask) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Pending {
            id,
            due_ms: self.now_ms + delay_ms as u64,
            task,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|p| p.id != id);
    }
}
