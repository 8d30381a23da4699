use crate::core::Particle;
use glam::Vec2;

/// Pan offset and perspective scale shared by projection, rendering and picking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// World-unit offset added to every particle's x/y before projection.
    pub pan: Vec2,
    /// Screen-unit scale, recomputed on resize.
    pub fov: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            fov: 600.0,
        }
    }
}

/// Drawing area size in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Whether `p` lies inside the viewport grown by `margin` on every side.
    #[inline]
    pub fn contains(&self, p: Vec2, margin: f32) -> bool {
        p.x >= -margin
            && p.x <= self.width + margin
            && p.y >= -margin
            && p.y <= self.height + margin
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub screen: Vec2,
    pub inv_depth: f32,
}

/// Perspective-project a particle to CSS-pixel screen coordinates.
///
/// Precondition: `particle.pos.z` is non-zero. The field keeps every depth in
/// `(NEAR_Z, FAR_Z]`, so particles taken from it always satisfy this.
#[inline]
pub fn project(particle: &Particle, camera: &CameraState, viewport: &Viewport) -> Projection {
    let inv_depth = 1.0 / particle.pos.z;
    let world = particle.pos.truncate() + camera.pan;
    Projection {
        screen: viewport.center() + world * camera.fov * inv_depth,
        inv_depth,
    }
}
