use crate::camera::{project, CameraState, Viewport};
use crate::constants::*;
use crate::core::{ParticleField, ParticleKind};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
    }
}

/// Minimal 2D drawing target. Coordinates are CSS pixels.
pub trait DrawSurface {
    fn clear(&mut self, viewport: &Viewport);
    /// Whether the decorative sprite can be drawn right now. Checked on every
    /// draw; a sprite that never loads keeps the plain fallback forever.
    fn sprite_ready(&self) -> bool;
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn draw_sprite(&mut self, center: Vec2, size: f32, alpha: f32);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub circles: usize,
    pub sprites: usize,
    pub culled: usize,
}

#[inline]
pub fn star_radius(inv_depth: f32) -> f32 {
    (STAR_RADIUS_SCALE * inv_depth).clamp(STAR_RADIUS_MIN, STAR_RADIUS_MAX)
}

#[inline]
pub fn star_alpha(inv_depth: f32) -> f32 {
    (STAR_ALPHA_BASE + STAR_ALPHA_SCALE * inv_depth).min(1.0)
}

#[inline]
fn channel(v: f32) -> u8 {
    v.floor().clamp(0.0, 255.0) as u8
}

/// Plain particle colour; warmer (more red/green, less blue) as depth shrinks.
#[inline]
pub fn star_color(inv_depth: f32) -> Rgba {
    Rgba {
        r: channel(TINT_RED_BASE + TINT_RED_SCALE * inv_depth),
        g: channel(TINT_GREEN_BASE + TINT_GREEN_SCALE * inv_depth),
        b: channel(TINT_BLUE_BASE + TINT_BLUE_SCALE * (1.0 - inv_depth)),
        a: star_alpha(inv_depth),
    }
}

#[inline]
pub fn sprite_size(radius: f32) -> f32 {
    (radius * SPRITE_SIZE_SCALE).clamp(SPRITE_SIZE_MIN, SPRITE_SIZE_MAX)
}

/// Paint the whole field. Particles are drawn in storage order; size and
/// opacity carry the depth cue so no sort is done.
pub fn draw<S: DrawSurface>(
    surface: &mut S,
    field: &ParticleField,
    camera: &CameraState,
    viewport: &Viewport,
) -> DrawStats {
    surface.clear(viewport);
    let sprites_ok = surface.sprite_ready();
    let mut stats = DrawStats::default();
    for p in field.particles() {
        let proj = project(p, camera, viewport);
        if !viewport.contains(proj.screen, CULL_MARGIN_PX) {
            stats.culled += 1;
            continue;
        }
        let r = star_radius(proj.inv_depth);
        if p.kind == ParticleKind::Decorative && sprites_ok {
            let alpha = (star_alpha(proj.inv_depth) + SPRITE_ALPHA_BOOST).min(1.0);
            surface.draw_sprite(proj.screen, sprite_size(r), alpha);
            stats.sprites += 1;
        } else {
            surface.fill_circle(proj.screen, r, star_color(proj.inv_depth));
            stats.circles += 1;
        }
    }
    stats
}
