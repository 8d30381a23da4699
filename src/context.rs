use crate::activity::ActivityState;
use crate::camera::{project, CameraState, Viewport};
use crate::constants::{FOV_SCALE, MANUAL_CLOSE_MS};
use crate::core::ParticleField;
use crate::input::{wheel_delta, CameraDelta, GestureController};
use crate::overlay::{hit_test, NoteId, NoteOverlay, NoteSurface, OpenOutcome, Placement};
use crate::render::{self, DrawStats, DrawSurface};
use crate::timers::{ManualScheduler, Scheduler, TimerId, TimerTask};
use glam::Vec2;

/// All mutable simulation state for one canvas.
///
/// Every host callback lands on one of the `on_*` methods, which run
/// camera update, field advance, draw, note reposition and activity reset
/// synchronously in that order.
pub struct SimulationContext<S: Scheduler, O: NoteSurface> {
    pub(crate) field: ParticleField,
    pub(crate) camera: CameraState,
    pub(crate) viewport: Viewport,
    pub(crate) gestures: GestureController,
    pub(crate) notes: NoteOverlay<O>,
    pub(crate) activity: ActivityState,
    pub(crate) scheduler: S,
}

impl<S: Scheduler, O: NoteSurface> SimulationContext<S, O> {
    pub fn new(field: ParticleField, scheduler: S, notes: Option<O>) -> Self {
        Self {
            field,
            camera: CameraState::default(),
            viewport: Viewport::default(),
            gestures: GestureController::new(),
            notes: NoteOverlay::new(notes),
            activity: ActivityState::default(),
            scheduler,
        }
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn notes(&self) -> &NoteOverlay<O> {
        &self.notes
    }

    pub fn activity(&self) -> &ActivityState {
        &self.activity
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn placement_for(&self, index: usize) -> Placement {
        let screen = self
            .field
            .get(index)
            .map(|p| project(p, &self.camera, &self.viewport).screen)
            .unwrap_or_else(|| self.viewport.center());
        Placement::for_screen(screen, &self.viewport)
    }

    pub fn resize<D: DrawSurface>(&mut self, width: f32, height: f32, surface: &mut D) {
        self.viewport = Viewport::new(width, height);
        self.camera.fov = width.min(height) * FOV_SCALE;
        if self.field.needs_regeneration(width, height) {
            // old notes point at particles that are about to disappear
            self.notes.close_all(&mut self.scheduler);
            self.field.resize(width, height);
        }
        self.redraw(surface);
    }

    /// Draw, then move notes to follow their particles and restart the idle
    /// window. Rendering only happens in response to input or resize.
    pub fn redraw<D: DrawSurface>(&mut self, surface: &mut D) -> DrawStats {
        let stats = render::draw(surface, &self.field, &self.camera, &self.viewport);
        self.notes
            .reposition_all(&self.field, &self.camera, &self.viewport);
        self.bump_activity();
        stats
    }

    /// Pan, advance and redraw. Notes on respawned particles are closed.
    pub fn apply<D: DrawSurface>(&mut self, delta: CameraDelta, surface: &mut D) {
        self.camera.pan += delta.pan;
        for index in self.field.advance(delta.advance) {
            self.notes.close(index, &mut self.scheduler);
        }
        self.redraw(surface);
    }

    pub fn on_wheel<D: DrawSurface>(
        &mut self,
        delta_y: f32,
        pinch_emulation: bool,
        surface: &mut D,
    ) {
        // apply() redraws, which restarts the idle window
        self.apply(wheel_delta(delta_y, pinch_emulation), surface);
    }

    pub fn on_pointer_down(&mut self, id: i32, pos: Vec2) {
        self.gestures.pointer_down(id, pos);
        self.bump_activity();
    }

    /// Returns true when the move drove a gesture (the host should then
    /// prevent the default browser action).
    pub fn on_pointer_move<D: DrawSurface>(
        &mut self,
        id: i32,
        pos: Vec2,
        surface: &mut D,
    ) -> bool {
        if !self.gestures.is_tracking(id) {
            return false;
        }
        match self.gestures.pointer_move(id, pos, self.camera.fov) {
            Some(delta) => self.apply(delta, surface),
            None => self.bump_activity(),
        }
        true
    }

    pub fn on_pointer_up(&mut self, id: i32) {
        self.gestures.pointer_up(id);
        self.bump_activity();
    }

    pub fn on_touch_start(&mut self, touches: &[Vec2]) {
        self.bump_activity();
        self.gestures.touch_start(touches);
    }

    pub fn on_touch_move<D: DrawSurface>(&mut self, touches: &[Vec2], surface: &mut D) -> bool {
        match self.gestures.touch_move(touches, self.camera.fov) {
            Some(delta) => {
                self.apply(delta, surface);
                true
            }
            None => {
                self.bump_activity();
                false
            }
        }
    }

    pub fn on_touch_end(&mut self, remaining: &[Vec2]) {
        self.gestures.touch_end(remaining);
        self.bump_activity();
    }

    /// Hit-test a click and open the nearest note, if any is close enough.
    pub fn on_click(&mut self, pos: Vec2) -> Option<OpenOutcome> {
        // stopping autoplay closes its note, so remember which one it was
        let held = self.activity.held_note();
        self.bump_activity();
        let Some(index) = hit_test(&self.field, &self.camera, &self.viewport, pos) else {
            log::debug!("[notes] click at ({:.0},{:.0}) hit nothing", pos.x, pos.y);
            return None;
        };
        if held == Some(index) {
            return Some(OpenOutcome::Toggled);
        }
        let placement = self.placement_for(index);
        let particle = self.field.get(index)?;
        Some(self.notes.open(
            index,
            particle,
            placement,
            Some(MANUAL_CLOSE_MS),
            &mut self.scheduler,
        ))
    }

    pub fn on_note_clicked(&mut self, note: NoteId) {
        self.bump_activity();
        self.notes.close_note(note, &mut self.scheduler);
    }

    pub fn on_timer(&mut self, id: TimerId, task: TimerTask) {
        match task {
            TimerTask::IdleElapsed => self.on_idle_elapsed(id),
            TimerTask::AutoplayStep => self.on_autoplay_step(id),
            TimerTask::AutoplayRelease { index } => self.on_autoplay_release(id, index),
            TimerTask::NoteAutoClose { index, note } => {
                self.notes.expire(index, note, id, &mut self.scheduler);
            }
            TimerTask::NoteRemove { note } => self.notes.remove_element(note),
        }
    }

    /// Open a note directly (no hit test), e.g. from a host shortcut.
    pub fn open_note(&mut self, index: usize, auto_close_ms: Option<u32>) -> OpenOutcome {
        let placement = self.placement_for(index);
        match self.field.get(index) {
            Some(p) => self
                .notes
                .open(index, p, placement, auto_close_ms, &mut self.scheduler),
            None => OpenOutcome::Ignored,
        }
    }

    pub fn close_note(&mut self, index: usize) -> bool {
        self.notes.close(index, &mut self.scheduler)
    }
}

impl<O: NoteSurface> SimulationContext<ManualScheduler, O> {
    /// Move the virtual clock forward, firing due timers in deadline order,
    /// including ones scheduled while firing.
    pub fn advance_clock(&mut self, ms: u64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some((id, task)) = self.scheduler.pop_due(until) {
            self.on_timer(id, task);
        }
        self.scheduler.set_now(until);
    }
}
