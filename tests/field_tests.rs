// Host-side tests for particle storage and depth recycling.

mod common;

use common::*;
use starfield::core::{wrap_depth, DEPTH_SPAN, FAR_Z, NEAR_Z};
use starfield::{FieldError, FieldParams, ParticleField, ParticleKind};

fn sized_field(params: FieldParams, w: f32, h: f32) -> ParticleField {
    let mut f = field(params);
    f.resize(w, h);
    f
}

fn all_in_range(f: &ParticleField) -> bool {
    f.particles().iter().all(|p| p.pos.z > NEAR_Z && p.pos.z <= FAR_Z)
}

#[test]
fn count_follows_area_and_density() {
    let f = sized_field(FieldParams::default(), 1000.0, 800.0);
    assert_eq!(f.len(), 1600);
}

#[test]
fn count_never_drops_below_minimum() {
    let f = sized_field(FieldParams::default(), 100.0, 100.0);
    assert_eq!(f.len(), FieldParams::default().min_count);
}

#[test]
fn initial_positions_are_within_bounds() {
    let f = sized_field(FieldParams::default(), 1000.0, 800.0);
    assert!(all_in_range(&f));
    for p in f.particles() {
        assert!((-1.0..=1.0).contains(&p.pos.x));
        assert!((-1.0..=1.0).contains(&p.pos.y));
    }
}

#[test]
fn initial_depth_is_biased_towards_camera() {
    let f = sized_field(FieldParams::default(), 1000.0, 800.0);
    let mean = f.particles().iter().map(|p| p.pos.z).sum::<f32>() / f.len() as f32;
    // uniform would average the middle of the range; u^2.4 averages ~0.29 of the span
    assert!(mean < NEAR_Z + DEPTH_SPAN * 0.4, "mean depth {}", mean);
}

#[test]
fn resize_with_same_count_keeps_particles() {
    let mut f = sized_field(FieldParams::default(), 1000.0, 800.0);
    let before = f.particles().to_vec();
    // 800x1000 has the same area, so the same target count
    assert!(!f.needs_regeneration(800.0, 1000.0));
    assert!(!f.resize(800.0, 1000.0));
    assert_eq!(f.particles(), &before[..]);
}

#[test]
fn resize_with_new_count_regenerates() {
    let mut f = sized_field(FieldParams::default(), 1000.0, 800.0);
    assert!(f.resize(1200.0, 800.0));
    assert_eq!(f.len(), 1920);
}

#[test]
fn advance_zero_is_a_noop() {
    let mut f = sized_field(FieldParams::default(), 1000.0, 800.0);
    let before = f.particles().to_vec();
    let respawned = f.advance(0.0);
    assert!(respawned.is_empty());
    assert_eq!(f.particles(), &before[..]);
}

#[test]
fn advance_non_finite_is_ignored() {
    let mut f = sized_field(FieldParams::default(), 1000.0, 800.0);
    let before = f.particles().to_vec();
    assert!(f.advance(f32::NAN).is_empty());
    assert!(f.advance(f32::INFINITY).is_empty());
    assert_eq!(f.particles(), &before[..]);
}

#[test]
fn depth_stays_in_range_over_many_advances() {
    let mut f = sized_field(FieldParams::default(), 640.0, 480.0);
    let steps = [0.013, -0.2, 0.79, 1.7, -3.1, 0.0001, -0.0001, 0.5, -0.79, 12.0];
    for _ in 0..20 {
        for dz in steps {
            f.advance(dz);
            assert!(all_in_range(&f), "out of range after advance({})", dz);
        }
    }
}

#[test]
fn wrap_preserves_offset_past_near_boundary() {
    let mut f = sized_field(quiet_params(), 1000.0, 800.0);
    f.set_particle(0, plain_particle(0.0, 0.0, NEAR_Z + 0.001)).unwrap();
    let respawned = f.advance(DEPTH_SPAN);
    assert!(respawned.contains(&0));
    let z = f.get(0).unwrap().pos.z;
    let expected = FAR_Z - DEPTH_SPAN + 0.001;
    assert!((z - expected).abs() < 1e-4, "z = {}, expected {}", z, expected);
    assert!(z > NEAR_Z && z <= FAR_Z);
}

#[test]
fn wrap_past_far_boundary_moves_near() {
    let mut f = sized_field(quiet_params(), 1000.0, 800.0);
    f.set_particle(0, plain_particle(0.0, 0.0, FAR_Z - 0.01)).unwrap();
    let respawned = f.advance(-0.02);
    assert!(respawned.contains(&0));
    let z = f.get(0).unwrap().pos.z;
    assert!((z - (FAR_Z + 0.01 - DEPTH_SPAN)).abs() < 1e-4, "z = {}", z);
}

#[test]
fn wrap_depth_lands_on_far_when_exactly_near() {
    assert!((wrap_depth(NEAR_Z) - FAR_Z).abs() < 1e-6);
    assert!(wrap_depth(-100.0) > NEAR_Z);
    assert!(wrap_depth(100.0) <= FAR_Z);
}

#[test]
fn respawn_rerolls_position() {
    let mut f = sized_field(quiet_params(), 1000.0, 800.0);
    f.set_particle(3, plain_particle(0.5, 0.5, NEAR_Z + 0.0005)).unwrap();
    let respawned = f.advance(0.001);
    assert!(respawned.contains(&3));
    let p = f.get(3).unwrap();
    assert!((-1.0..=1.0).contains(&p.pos.x));
    assert!(p.pos.z > NEAR_Z);
}

#[test]
fn rates_force_kinds_and_messages() {
    let params = FieldParams {
        decorative_rate: 1.0,
        message_rate: 1.0,
        ..FieldParams::default()
    };
    let f = sized_field(params, 300.0, 300.0);
    assert!(f
        .particles()
        .iter()
        .all(|p| p.kind == ParticleKind::Decorative && p.has_message()));

    let f = sized_field(quiet_params(), 300.0, 300.0);
    assert!(f
        .particles()
        .iter()
        .all(|p| p.kind == ParticleKind::Plain && !p.has_message()));
}

#[test]
fn same_seed_gives_same_field() {
    let a = sized_field(FieldParams::default(), 500.0, 500.0);
    let b = sized_field(FieldParams::default(), 500.0, 500.0);
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn set_particle_rejects_bad_depth_and_index() {
    let mut f = sized_field(quiet_params(), 300.0, 300.0);
    assert_eq!(
        f.set_particle(0, plain_particle(0.0, 0.0, NEAR_Z)),
        Err(FieldError::DepthOutOfRange(NEAR_Z))
    );
    assert!(f.set_particle(0, plain_particle(0.0, 0.0, FAR_Z)).is_ok());
    let len = f.len();
    assert_eq!(
        f.set_particle(len, plain_particle(0.0, 0.0, 0.5)),
        Err(FieldError::IndexOutOfRange { index: len, len })
    );
}

#[test]
fn invalid_params_are_rejected() {
    assert_eq!(
        ParticleField::new(FieldParams::default(), Vec::new(), 1).err(),
        Some(FieldError::NoPhrases)
    );
    let bad_density = FieldParams {
        density: 0.0,
        ..FieldParams::default()
    };
    assert!(matches!(
        ParticleField::new(bad_density, phrases(), 1),
        Err(FieldError::InvalidDensity(_))
    ));
    let bad_rate = FieldParams {
        message_rate: 1.5,
        ..FieldParams::default()
    };
    assert!(matches!(
        ParticleField::new(bad_rate, phrases(), 1),
        Err(FieldError::InvalidRate { name: "message", .. })
    ));
}

#[test]
fn assign_random_messages_respects_candidates() {
    let mut f = sized_field(quiet_params(), 300.0, 300.0);
    f.set_particle(1, message_particle(0.0, 0.0, 0.5, "minha morada"))
        .unwrap();
    let assigned = f.assign_random_messages(vec![0, 1, 2], 5);
    // index 1 already had a message
    assert_eq!(assigned, 2);
    assert!(f.get(0).unwrap().has_message());
    assert!(f.get(2).unwrap().has_message());
    assert_eq!(f.get(1).unwrap().message.as_deref(), Some("minha morada"));
    assert!(!f.get(3).unwrap().has_message());
}
