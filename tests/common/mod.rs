// Recording fakes for the host surfaces, shared by the integration tests.

#![allow(dead_code)]
use glam::{Vec2, Vec3};
use starfield::{
    DrawSurface, FieldParams, ManualScheduler, NoteId, NoteSurface, Particle, ParticleField,
    ParticleKind, Placement, Rgba, SimulationContext, Viewport,
};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    Circle { center: Vec2, radius: f32, color: Rgba },
    Sprite { center: Vec2, size: f32, alpha: f32 },
}

#[derive(Default)]
pub struct RecordingSurface {
    pub sprite_ready: bool,
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn circles(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
            .count()
    }

    pub fn sprites(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Sprite { .. }))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, _viewport: &Viewport) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear);
    }

    fn sprite_ready(&self) -> bool {
        self.sprite_ready
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_sprite(&mut self, center: Vec2, size: f32, alpha: f32) {
        self.calls.push(DrawCall::Sprite {
            center,
            size,
            alpha,
        });
    }
}

#[derive(Clone, Debug)]
pub struct FakeNote {
    pub text: String,
    pub placement: Option<Placement>,
    pub revealed: bool,
    pub concealed: bool,
}

#[derive(Default)]
pub struct RecordingNotes {
    pub notes: HashMap<NoteId, FakeNote>,
    pub removed: Vec<NoteId>,
}

impl RecordingNotes {
    pub fn visible(&self) -> usize {
        self.notes
            .values()
            .filter(|n| n.revealed && !n.concealed)
            .count()
    }
}

impl NoteSurface for RecordingNotes {
    fn create(&mut self, note: NoteId, text: &str) {
        self.notes.insert(
            note,
            FakeNote {
                text: text.to_owned(),
                placement: None,
                revealed: false,
                concealed: false,
            },
        );
    }

    fn place(&mut self, note: NoteId, placement: &Placement) {
        if let Some(n) = self.notes.get_mut(&note) {
            n.placement = Some(*placement);
        }
    }

    fn reveal(&mut self, note: NoteId) {
        if let Some(n) = self.notes.get_mut(&note) {
            n.revealed = true;
        }
    }

    fn conceal(&mut self, note: NoteId) {
        if let Some(n) = self.notes.get_mut(&note) {
            n.concealed = true;
        }
    }

    fn remove(&mut self, note: NoteId) {
        self.notes.remove(&note);
        self.removed.push(note);
    }
}

pub type TestSim = SimulationContext<ManualScheduler, RecordingNotes>;

pub fn phrases() -> Vec<String> {
    vec!["eu te amo".to_string(), "minha morada".to_string()]
}

/// Params with no random messages or sprites, so tests place their own.
pub fn quiet_params() -> FieldParams {
    FieldParams {
        message_rate: 0.0,
        decorative_rate: 0.0,
        ..FieldParams::default()
    }
}

pub fn field(params: FieldParams) -> ParticleField {
    ParticleField::new(params, phrases(), 7).expect("valid params")
}

/// 1000x800 viewport (fov 960) with a quiet field already sized.
pub fn sim() -> (TestSim, RecordingSurface) {
    let mut surface = RecordingSurface::default();
    let mut sim = SimulationContext::new(
        field(quiet_params()),
        ManualScheduler::new(),
        Some(RecordingNotes::default()),
    );
    sim.resize(1000.0, 800.0, &mut surface);
    (sim, surface)
}

pub fn message_particle(x: f32, y: f32, z: f32, text: &str) -> Particle {
    Particle::new(Vec3::new(x, y, z), ParticleKind::Plain, Some(text.to_string()))
}

pub fn plain_particle(x: f32, y: f32, z: f32) -> Particle {
    Particle::new(Vec3::new(x, y, z), ParticleKind::Plain, None)
}

/// Push every particle far off-screen so only explicitly placed ones matter.
pub fn clear_screen(sim: &mut TestSim) {
    for i in 0..sim.field().len() {
        sim.field_mut()
            .set_particle(i, plain_particle(1.0, 1.0, 0.02))
            .expect("in range");
    }
}
