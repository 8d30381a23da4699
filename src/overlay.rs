//! Text notes anchored to message-bearing particles.
//!
//! Notes are keyed by particle index. The overlay only tracks which notes are
//! open and their timers; the visible element lives behind [`NoteSurface`].

use crate::camera::{project, CameraState, Viewport};
use crate::constants::{
    HIT_RADIUS_PX, NOTE_ANCHOR_OFFSET_PX, NOTE_EDGE_PAD_PX, NOTE_REMOVE_DELAY_MS,
};
use crate::core::{Particle, ParticleField};
use crate::timers::{Scheduler, TimerId, TimerTask};
use fnv::FnvHashMap;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoteId(pub u32);

/// Which side of the particle the note extends towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub left: f32,
    pub top: f32,
    pub anchor: Anchor,
}

impl Placement {
    /// Notes left of centre extend right and vice versa, so they stay on screen.
    pub fn for_screen(screen: Vec2, viewport: &Viewport) -> Self {
        let to_right = screen.x < viewport.width * 0.5;
        let x = if to_right {
            screen.x + NOTE_ANCHOR_OFFSET_PX
        } else {
            screen.x - NOTE_ANCHOR_OFFSET_PX
        };
        Self {
            left: x.min(viewport.width - NOTE_EDGE_PAD_PX).max(NOTE_EDGE_PAD_PX),
            top: screen.y.min(viewport.height - NOTE_EDGE_PAD_PX).max(NOTE_EDGE_PAD_PX),
            anchor: if to_right { Anchor::Right } else { Anchor::Left },
        }
    }
}

/// Host side of the overlay: a container that holds one element per note.
pub trait NoteSurface {
    fn create(&mut self, note: NoteId, text: &str);
    fn place(&mut self, note: NoteId, placement: &Placement);
    /// Switch to the open presentation on the next paint, so a transition runs.
    fn reveal(&mut self, note: NoteId);
    fn conceal(&mut self, note: NoteId);
    fn remove(&mut self, note: NoteId);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened(NoteId),
    /// The particle already had a note; it was closed instead.
    Toggled,
    Ignored,
}

#[derive(Clone, Copy, Debug)]
struct OpenNote {
    id: NoteId,
    auto_close: Option<TimerId>,
}

pub struct NoteOverlay<O: NoteSurface> {
    surface: Option<O>,
    open: FnvHashMap<usize, OpenNote>,
    next_id: u32,
}

impl<O: NoteSurface> NoteOverlay<O> {
    pub fn new(surface: Option<O>) -> Self {
        Self {
            surface,
            open: FnvHashMap::default(),
            next_id: 0,
        }
    }

    pub fn surface(&self) -> Option<&O> {
        self.surface.as_ref()
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.contains_key(&index)
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn note_for(&self, index: usize) -> Option<NoteId> {
        self.open.get(&index).map(|n| n.id)
    }

    pub fn auto_close_timer(&self, index: usize) -> Option<TimerId> {
        self.open.get(&index).and_then(|n| n.auto_close)
    }

    pub fn open_indices(&self) -> Vec<usize> {
        self.open.keys().copied().collect()
    }

    pub fn open<S: Scheduler>(
        &mut self,
        index: usize,
        particle: &Particle,
        placement: Placement,
        auto_close_ms: Option<u32>,
        scheduler: &mut S,
    ) -> OpenOutcome {
        let Some(text) = particle.message.as_deref() else {
            return OpenOutcome::Ignored;
        };
        let Some(surface) = self.surface.as_mut() else {
            return OpenOutcome::Ignored;
        };
        if self.open.contains_key(&index) {
            self.close(index, scheduler);
            return OpenOutcome::Toggled;
        }
        self.next_id = self.next_id.wrapping_add(1);
        let id = NoteId(self.next_id);
        surface.create(id, text);
        surface.place(id, &placement);
        surface.reveal(id);
        let auto_close = auto_close_ms
            .filter(|ms| *ms > 0)
            .map(|ms| scheduler.schedule(ms, TimerTask::NoteAutoClose { index, note: id }));
        self.open.insert(index, OpenNote { id, auto_close });
        log::debug!("[notes] open #{} for particle {}", id.0, index);
        OpenOutcome::Opened(id)
    }

    /// Returns false when no note was open for `index`.
    pub fn close<S: Scheduler>(&mut self, index: usize, scheduler: &mut S) -> bool {
        let Some(note) = self.open.remove(&index) else {
            return false;
        };
        if let Some(timer) = note.auto_close {
            scheduler.cancel(timer);
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.conceal(note.id);
        }
        scheduler.schedule(NOTE_REMOVE_DELAY_MS, TimerTask::NoteRemove { note: note.id });
        log::debug!("[notes] close #{} for particle {}", note.id.0, index);
        true
    }

    pub fn close_all<S: Scheduler>(&mut self, scheduler: &mut S) {
        for index in self.open_indices() {
            self.close(index, scheduler);
        }
    }

    /// Close by note id (click on the note element). Stale ids are ignored.
    pub fn close_note<S: Scheduler>(&mut self, note: NoteId, scheduler: &mut S) -> bool {
        match self.open.iter().find(|(_, n)| n.id == note).map(|(i, _)| *i) {
            Some(index) => self.close(index, scheduler),
            None => false,
        }
    }

    /// Auto-close timer fired. Only acts if it is still the timer for that note.
    pub fn expire<S: Scheduler>(
        &mut self,
        index: usize,
        note: NoteId,
        timer: TimerId,
        scheduler: &mut S,
    ) -> bool {
        let current = self.open.get(&index);
        if current.is_some_and(|n| n.id == note && n.auto_close == Some(timer)) {
            if let Some(n) = self.open.get_mut(&index) {
                n.auto_close = None;
            }
            self.close(index, scheduler)
        } else {
            false
        }
    }

    pub fn remove_element(&mut self, note: NoteId) {
        if let Some(surface) = self.surface.as_mut() {
            surface.remove(note);
        }
    }

    pub fn reposition_all(
        &mut self,
        field: &ParticleField,
        camera: &CameraState,
        viewport: &Viewport,
    ) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        for (index, note) in &self.open {
            if let Some(p) = field.get(*index) {
                let proj = project(p, camera, viewport);
                surface.place(note.id, &Placement::for_screen(proj.screen, viewport));
            }
        }
    }
}

/// Nearest message-bearing particle to `point`, if within the hit radius.
pub fn hit_test(
    field: &ParticleField,
    camera: &CameraState,
    viewport: &Viewport,
    point: Vec2,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, p) in field.particles().iter().enumerate() {
        if !p.has_message() {
            continue;
        }
        let d2 = project(p, camera, viewport).screen.distance_squared(point);
        match best {
            Some((_, bd)) if d2 >= bd => {}
            _ => best = Some((i, d2)),
        }
    }
    best.filter(|(_, d2)| *d2 <= HIT_RADIUS_PX * HIT_RADIUS_PX)
        .map(|(i, _)| i)
}
