//! Particle storage and depth recycling.
//!
//! The field owns a fixed-size set of particles spread over `[-1, 1]` in x/y
//! and `(NEAR_Z, FAR_Z]` in depth. Moving the camera is expressed as shifting
//! every particle along z; particles that cross either depth boundary are
//! respawned on the opposite side so the field looks unbounded.

use super::constants::*;
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Plain,
    Decorative,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// x/y in `[-1, 1]`, z in `(NEAR_Z, FAR_Z]`.
    pub pos: Vec3,
    pub kind: ParticleKind,
    pub message: Option<String>,
}

impl Particle {
    pub fn new(pos: Vec3, kind: ParticleKind, message: Option<String>) -> Self {
        Self { pos, kind, message }
    }

    #[inline]
    pub fn has_message(&self) -> bool {
        self.message.is_some()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("phrase list is empty")]
    NoPhrases,
    #[error("density must be finite and positive, got {0}")]
    InvalidDensity(f32),
    #[error("{name} rate must be within [0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f32 },
    #[error("depth {0} is outside the simulated depth range")]
    DepthOutOfRange(f32),
    #[error("particle index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Clone, Debug)]
pub struct FieldParams {
    pub density: f32,
    pub min_count: usize,
    pub decorative_rate: f32,
    pub message_rate: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            min_count: MIN_PARTICLES,
            decorative_rate: DECORATIVE_RATE,
            message_rate: MESSAGE_RATE,
        }
    }
}

impl FieldParams {
    pub fn validate(&self) -> Result<(), FieldError> {
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(FieldError::InvalidDensity(self.density));
        }
        for (name, value) in [
            ("decorative", self.decorative_rate),
            ("message", self.message_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FieldError::InvalidRate { name, value });
            }
        }
        Ok(())
    }

    /// Number of particles wanted for a viewport of `width` x `height` CSS pixels.
    pub fn target_count(&self, width: f32, height: f32) -> usize {
        let area = (width.max(0.0) * height.max(0.0)) as f64;
        let wanted = (area * self.density as f64).floor() as usize;
        wanted.max(self.min_count)
    }
}

/// Map any depth back into `(NEAR_Z, FAR_Z]`, keeping the overshoot past the
/// boundary so continuous motion does not pop.
#[inline]
pub fn wrap_depth(z: f32) -> f32 {
    let mut offset = (z - NEAR_Z).rem_euclid(DEPTH_SPAN);
    if offset <= 0.0 || offset > DEPTH_SPAN {
        offset = DEPTH_SPAN;
    }
    (NEAR_Z + offset).clamp(NEAR_Z + DEPTH_EPSILON, FAR_Z)
}

#[inline]
pub fn depth_in_range(z: f32) -> bool {
    z > NEAR_Z && z <= FAR_Z
}

pub struct ParticleField {
    particles: Vec<Particle>,
    params: FieldParams,
    phrases: Vec<String>,
    rng: StdRng,
}

impl ParticleField {
    /// Create an empty field; it is populated by the first [`resize`](Self::resize).
    pub fn new(params: FieldParams, phrases: Vec<String>, seed: u64) -> Result<Self, FieldError> {
        params.validate()?;
        if phrases.is_empty() {
            return Err(FieldError::NoPhrases);
        }
        Ok(Self {
            particles: Vec::new(),
            params,
            phrases,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// True when a viewport of this size would change the particle count.
    pub fn needs_regeneration(&self, width: f32, height: f32) -> bool {
        self.params.target_count(width, height) != self.particles.len()
    }

    /// Resize to a new viewport. The whole set is regenerated only when the
    /// target count changes; otherwise existing particles are kept as-is.
    /// Returns whether regeneration happened.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let target = self.params.target_count(width, height);
        if target == self.particles.len() {
            return false;
        }
        let mut particles = Vec::with_capacity(target);
        for _ in 0..target {
            let z = self.biased_depth();
            particles.push(self.spawn(z));
        }
        self.particles = particles;
        log::info!(
            "[field] regenerated {} particles for {:.0}x{:.0}",
            target,
            width,
            height
        );
        true
    }

    /// Move every particle by `-delta_z` (positive moves the camera forward).
    /// Returns the indices of particles that wrapped and were respawned.
    pub fn advance(&mut self, delta_z: f32) -> SmallVec<[usize; 8]> {
        let mut respawned = SmallVec::new();
        if delta_z == 0.0 {
            return respawned;
        }
        if !delta_z.is_finite() {
            log::warn!("[field] ignoring non-finite advance {}", delta_z);
            return respawned;
        }
        for i in 0..self.particles.len() {
            let z = self.particles[i].pos.z - delta_z;
            if depth_in_range(z) {
                self.particles[i].pos.z = z;
            } else {
                self.particles[i] = self.spawn(wrap_depth(z));
                respawned.push(i);
            }
        }
        respawned
    }

    /// Replace one particle, e.g. to pin a known message in place.
    pub fn set_particle(&mut self, index: usize, particle: Particle) -> Result<(), FieldError> {
        let len = self.particles.len();
        if !depth_in_range(particle.pos.z) {
            return Err(FieldError::DepthOutOfRange(particle.pos.z));
        }
        let slot = self
            .particles
            .get_mut(index)
            .ok_or(FieldError::IndexOutOfRange { index, len })?;
        *slot = particle;
        Ok(())
    }

    /// Give up to `wanted` randomly chosen candidates a random message.
    /// Candidates that already carry one are skipped. Returns how many were assigned.
    pub fn assign_random_messages(&mut self, mut candidates: Vec<usize>, wanted: usize) -> usize {
        candidates.retain(|&i| self.particles.get(i).is_some_and(|p| !p.has_message()));
        let take = wanted.min(candidates.len());
        let (chosen, _) = candidates.partial_shuffle(&mut self.rng, take);
        let chosen = chosen.to_vec();
        for i in &chosen {
            let message = self.random_phrase();
            self.particles[*i].message = Some(message);
        }
        chosen.len()
    }

    fn biased_depth(&mut self) -> f32 {
        // (0, 1] so the bias never lands exactly on NEAR_Z
        let u = 1.0 - self.rng.gen::<f32>();
        let z = NEAR_Z + u.powf(DEPTH_BIAS_EXPONENT) * DEPTH_SPAN;
        z.clamp(NEAR_Z + DEPTH_EPSILON, FAR_Z)
    }

    fn spawn(&mut self, z: f32) -> Particle {
        let x = self.rng.gen_range(-1.0..=1.0);
        let y = self.rng.gen_range(-1.0..=1.0);
        let kind = if self.rng.gen_bool(self.params.decorative_rate as f64) {
            ParticleKind::Decorative
        } else {
            ParticleKind::Plain
        };
        let message = if self.rng.gen_bool(self.params.message_rate as f64) {
            Some(self.random_phrase())
        } else {
            None
        };
        Particle::new(Vec3::new(x, y, z), kind, message)
    }

    fn random_phrase(&mut self) -> String {
        self.phrases
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default()
    }
}
