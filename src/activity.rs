//! Idle detection and the autoplay loop.
//!
//! Any qualifying input restarts the idle window. When the window elapses
//! the context enters autoplay and cycles through visible message particles:
//! open one, hold, close, pause, repeat. Input halts the cycle at once.

use crate::camera::project;
use crate::constants::*;
use crate::context::SimulationContext;
use crate::overlay::{NoteSurface, OpenOutcome};
use crate::timers::{Scheduler, TimerId, TimerTask};
use instant::Instant;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityPhase {
    Active,
    Autoplaying,
}

#[derive(Debug, Default)]
struct Autoplay {
    running: bool,
    cursor: usize,
    step_timer: Option<TimerId>,
    // particle whose note the loop is currently holding open
    holding: Option<usize>,
}

#[derive(Debug, Default)]
pub struct ActivityState {
    last_input: Option<Instant>,
    idle_timer: Option<TimerId>,
    autoplay: Autoplay,
}

impl ActivityState {
    pub fn phase(&self) -> ActivityPhase {
        if self.autoplay.running {
            ActivityPhase::Autoplaying
        } else {
            ActivityPhase::Active
        }
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.running
    }

    pub fn idle_timer(&self) -> Option<TimerId> {
        self.idle_timer
    }

    pub fn step_timer(&self) -> Option<TimerId> {
        self.autoplay.step_timer
    }

    /// Particle whose note autoplay is holding open, if any.
    pub fn held_note(&self) -> Option<usize> {
        self.autoplay.holding
    }

    pub fn idle_for(&self) -> Option<Duration> {
        self.last_input.map(|t| t.elapsed())
    }
}

impl<S: Scheduler, O: NoteSurface> SimulationContext<S, O> {
    /// Restart the idle window and halt autoplay if it is running.
    pub fn bump_activity(&mut self) {
        self.activity.last_input = Some(Instant::now());
        if let Some(t) = self.activity.idle_timer.take() {
            self.scheduler.cancel(t);
        }
        self.activity.idle_timer = Some(self.scheduler.schedule(IDLE_MS, TimerTask::IdleElapsed));
        if self.activity.autoplay.running {
            self.stop_autoplay();
        }
    }

    pub(crate) fn on_idle_elapsed(&mut self, id: TimerId) {
        if self.activity.idle_timer != Some(id) {
            return;
        }
        self.activity.idle_timer = None;
        self.start_autoplay();
    }

    pub fn start_autoplay(&mut self) {
        self.stop_autoplay();
        log::info!("[autoplay] start");
        self.activity.autoplay.running = true;
        self.activity.autoplay.cursor = 0;
        self.ensure_visible_messages(AUTOPLAY_MIN_VISIBLE);
        self.run_autoplay_step();
    }

    pub fn stop_autoplay(&mut self) {
        let ap = &mut self.activity.autoplay;
        if let Some(t) = ap.step_timer.take() {
            self.scheduler.cancel(t);
        }
        let holding = ap.holding.take();
        if ap.running {
            ap.running = false;
            log::info!("[autoplay] stop");
        }
        if let Some(index) = holding {
            self.notes.close(index, &mut self.scheduler);
        }
    }

    pub(crate) fn on_autoplay_step(&mut self, id: TimerId) {
        if !self.take_step_timer(id) {
            return;
        }
        self.run_autoplay_step();
    }

    pub(crate) fn on_autoplay_release(&mut self, id: TimerId, index: usize) {
        if !self.take_step_timer(id) {
            return;
        }
        if self.activity.autoplay.holding == Some(index) {
            self.activity.autoplay.holding = None;
            self.notes.close(index, &mut self.scheduler);
        }
        self.activity.autoplay.step_timer =
            Some(self.scheduler.schedule(AUTO_GAP_MS, TimerTask::AutoplayStep));
    }

    fn take_step_timer(&mut self, id: TimerId) -> bool {
        let ap = &mut self.activity.autoplay;
        if !ap.running || ap.step_timer != Some(id) {
            return false;
        }
        ap.step_timer = None;
        true
    }

    fn run_autoplay_step(&mut self) {
        if !self.activity.autoplay.running {
            return;
        }
        let mut candidates = self.visible_message_particles();
        if candidates.is_empty() {
            self.ensure_visible_messages(AUTOPLAY_MIN_VISIBLE);
            candidates = self.visible_message_particles();
        }
        if candidates.is_empty() {
            log::debug!("[autoplay] no visible notes, retrying");
            self.activity.autoplay.step_timer =
                Some(self.scheduler.schedule(AUTOPLAY_RETRY_MS, TimerTask::AutoplayStep));
            return;
        }
        let ap = &mut self.activity.autoplay;
        let index = candidates[ap.cursor % candidates.len()];
        ap.cursor = ap.cursor.wrapping_add(1);

        let opened = match self.field.get(index) {
            Some(p) if !self.notes.is_open(index) => {
                let placement = self.placement_for(index);
                self.notes.open(index, p, placement, None, &mut self.scheduler)
            }
            _ => OpenOutcome::Ignored,
        };
        if let OpenOutcome::Opened(_) = opened {
            self.activity.autoplay.holding = Some(index);
        }
        self.activity.autoplay.step_timer = Some(
            self.scheduler
                .schedule(AUTO_OPEN_MS, TimerTask::AutoplayRelease { index }),
        );
    }

    /// Message particles within the viewport plus a small margin.
    pub fn visible_message_particles(&self) -> Vec<usize> {
        self.field
            .particles()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.has_message())
            .filter(|(_, p)| {
                let s = project(p, &self.camera, &self.viewport).screen;
                self.viewport.contains(s, AUTOPLAY_PICK_MARGIN_PX)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Give on-screen particles messages until at least `min_count` visible
    /// particles carry one, or candidates run out. Returns how many were added.
    pub fn ensure_visible_messages(&mut self, min_count: usize) -> usize {
        let mut with_message = 0usize;
        let mut without = Vec::new();
        for (i, p) in self.field.particles().iter().enumerate() {
            let s = project(p, &self.camera, &self.viewport).screen;
            if !self.viewport.contains(s, 0.0) {
                continue;
            }
            if p.has_message() {
                with_message += 1;
            } else {
                without.push(i);
            }
        }
        if with_message >= min_count {
            return 0;
        }
        self.field
            .assign_random_messages(without, min_count - with_message)
    }
}
