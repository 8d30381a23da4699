// Host-side tests for projection and the draw pass.

mod common;

use common::*;
use glam::Vec2;
use starfield::constants::*;
use starfield::render::{draw, sprite_size, star_alpha, star_color, star_radius};
use starfield::{project, CameraState, ParticleKind, Viewport};

fn camera_960() -> CameraState {
    CameraState {
        pan: Vec2::ZERO,
        fov: 960.0,
    }
}

#[test]
fn centered_particle_projects_to_viewport_center() {
    let p = message_particle(0.0, 0.0, 1.0, "eu te amo");
    let proj = project(&p, &camera_960(), &Viewport::new(1000.0, 800.0));
    assert_eq!(proj.screen, Vec2::new(500.0, 400.0));
    assert_eq!(proj.inv_depth, 1.0);
}

#[test]
fn projection_is_pure() {
    let p = plain_particle(0.3, -0.2, 0.4);
    let cam = CameraState {
        pan: Vec2::new(0.1, 0.05),
        fov: 720.0,
    };
    let vp = Viewport::new(800.0, 600.0);
    let a = project(&p, &cam, &vp);
    let b = project(&p, &cam, &vp);
    assert_eq!(a, b);
}

#[test]
fn projection_scales_with_inverse_depth_and_pan() {
    let vp = Viewport::new(1000.0, 800.0);
    let p = plain_particle(0.1, 0.0, 0.5);
    let proj = project(&p, &camera_960(), &vp);
    // 500 + 0.1 * 960 * 2
    assert!((proj.screen.x - 692.0).abs() < 1e-3);
    assert_eq!(proj.inv_depth, 2.0);

    let panned = CameraState {
        pan: Vec2::new(-0.1, 0.0),
        fov: 960.0,
    };
    let proj = project(&p, &panned, &vp);
    assert!((proj.screen.x - 500.0).abs() < 1e-3);
}

#[test]
fn nearer_particles_are_bigger_brighter_and_warmer() {
    let far = 1.0 / 0.8;
    let near = 1.0 / 0.05;
    assert!(star_radius(near) > star_radius(far));
    assert!(star_alpha(near) >= star_alpha(far));
    let (cf, cn) = (star_color(far), star_color(near));
    assert!(cn.r >= cf.r);
    assert!(cn.b <= cf.b);
}

#[test]
fn size_and_alpha_are_clamped() {
    assert_eq!(star_radius(0.0), STAR_RADIUS_MIN);
    assert_eq!(star_radius(1000.0), STAR_RADIUS_MAX);
    assert_eq!(star_alpha(100.0), 1.0);
    assert_eq!(sprite_size(0.1), SPRITE_SIZE_MIN);
    assert_eq!(sprite_size(100.0), SPRITE_SIZE_MAX);
    let c = star_color(100.0);
    assert_eq!((c.r, c.g, c.b), (255, 255, 0));
}

#[test]
fn css_color_format() {
    let c = star_color(1.0);
    assert_eq!(c.to_css(), "rgba(255,255,200,1.000)");
}

#[test]
fn offscreen_particles_are_culled() {
    let (mut sim, mut surface) = sim();
    clear_screen(&mut sim);
    sim.field_mut()
        .set_particle(0, plain_particle(0.0, 0.0, 0.5))
        .unwrap();
    let stats = sim.redraw(&mut surface);
    assert_eq!(stats.circles, 1);
    assert_eq!(stats.culled, sim.field().len() - 1);
    assert_eq!(surface.circles(), 1);
}

#[test]
fn cull_margin_keeps_particles_just_outside() {
    let mut f = field(quiet_params());
    f.resize(1000.0, 800.0);
    let vp = Viewport::new(1000.0, 800.0);
    let cam = camera_960();
    for i in 0..f.len() {
        f.set_particle(i, plain_particle(1.0, 1.0, 0.02)).unwrap();
    }
    // x = 500 + 0.45 * 960 / 0.8 = 1040, inside the 50px margin
    f.set_particle(0, plain_particle(0.45, 0.0, 0.8)).unwrap();
    let mut surface = RecordingSurface::default();
    let stats = draw(&mut surface, &f, &cam, &vp);
    assert_eq!(stats.circles, 1);
}

#[test]
fn decorative_particles_fall_back_until_sprite_is_ready() {
    let (mut sim, mut surface) = sim();
    clear_screen(&mut sim);
    let mut p = plain_particle(0.0, 0.0, 0.5);
    p.kind = ParticleKind::Decorative;
    sim.field_mut().set_particle(0, p).unwrap();

    let stats = sim.redraw(&mut surface);
    assert_eq!((stats.sprites, stats.circles), (0, 1));

    surface.sprite_ready = true;
    let stats = sim.redraw(&mut surface);
    assert_eq!((stats.sprites, stats.circles), (1, 0));
    assert_eq!(surface.sprites(), 1);
}

#[test]
fn draw_clears_first_and_keeps_storage_order() {
    let (mut sim, mut surface) = sim();
    clear_screen(&mut sim);
    sim.field_mut()
        .set_particle(0, plain_particle(0.0, 0.0, 0.7))
        .unwrap();
    sim.field_mut()
        .set_particle(1, plain_particle(0.0, 0.0, 0.1))
        .unwrap();
    sim.redraw(&mut surface);
    assert_eq!(surface.calls[0], DrawCall::Clear);
    let radii: Vec<f32> = surface
        .calls
        .iter()
        .filter_map(|c| match c {
            DrawCall::Circle { radius, .. } => Some(*radius),
            _ => None,
        })
        .collect();
    // far one first even though the near one would occlude it
    assert_eq!(radii.len(), 2);
    assert!(radii[0] < radii[1]);
}
