//! Impact Tests - Ring Buffer, Ripples and Drops
//!
//! Behavior of the impact ring as seen through the meadow field, the ripple
//! formula and the falling-drop stand-in.

use approx::assert_relative_eq;
use meadow_engine::config::MeadowConfig;
use meadow_engine::impact::{
    DropScheduler, IMPACT_CAPACITY, Impact, ImpactBus, ImpactRing, RippleParams,
    ripple_displacement, total_displacement,
};
use meadow_engine::terrain::{FlatTerrain, NoiseTerrain};
use meadow_engine::MeadowField;

fn tiny_field() -> MeadowField<FlatTerrain> {
    let mut config = MeadowConfig::default();
    config.field.blade_count = 10;
    config.field.ground_segments = 2;
    MeadowField::with_terrain(config, FlatTerrain::default())
}

// ============================================================================
// ImpactRing Tests
// ============================================================================

#[test]
fn test_ring_keeps_most_recent() {
    let mut ring = ImpactRing::new();
    for i in 0..10 {
        ring.emit(i as f32, 0.0, 1.0, i as f32 * 0.1);
    }

    let active = ring.active();
    assert_eq!(active.len(), IMPACT_CAPACITY);
    let xs: Vec<f32> = active.iter().map(|imp| imp.x).collect();
    assert_eq!(xs, vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    assert_eq!(ring.total_emitted(), 10);
}

#[test]
fn test_ring_overwrites_live_impacts() {
    // Overwrite happens regardless of whether the old ripple has decayed
    let mut ring = ImpactRing::new();
    for i in 0..=IMPACT_CAPACITY {
        ring.emit(i as f32, 0.0, 1.0, 0.0);
    }
    assert_eq!(ring.live(0.1, 2.5).len(), IMPACT_CAPACITY);
    assert!(ring.active().iter().all(|imp| imp.x != 0.0));
}

#[test]
fn test_uniform_array_empty_slots_zero() {
    let mut ring = ImpactRing::new();
    ring.emit(1.0, 2.0, 0.5, 3.0);
    let packed = ring.as_uniform_array();
    assert_eq!(packed[0], [1.0, 2.0, 3.0, 0.5]);
    assert!(packed[1..].iter().all(|slot| slot[3] == 0.0));
}

#[test]
fn test_field_ring_through_uniforms() {
    let mut field = tiny_field();
    for i in 0..10 {
        field.update(i as f32);
        field.emit_impact(i as f32, -(i as f32), 0.8);
    }

    let u = field.uniforms(glam::Mat4::IDENTITY.to_cols_array_2d(), [0.0; 3], false);
    let mut xs: Vec<f32> = u.impacts.iter().map(|slot| slot[0]).collect();
    xs.sort_by(f32::total_cmp);
    assert_eq!(xs, vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    for slot in &u.impacts {
        // Start time is the field clock at emission
        assert_eq!(slot[2], slot[0]);
    }
}

#[test]
fn test_bus_feeds_field() {
    let mut field = tiny_field();
    let mut bus = ImpactBus::new();
    let rx = bus.subscribe();

    field.update(2.0);
    bus.emit(1.0, 1.0, 0.4);
    bus.emit(-1.0, 3.0, 2.0);
    while let Ok(event) = rx.try_recv() {
        field.handle_event(event);
    }

    let active = field.impacts().active();
    assert_eq!(active.len(), 2);
    assert_eq!(active[1].strength, 1.0);
    assert!(active.iter().all(|imp| imp.start == 2.0));
}

#[test]
fn test_dropped_receiver_unsubscribes() {
    let mut bus = ImpactBus::new();
    let rx = bus.subscribe();
    drop(rx);
    assert_eq!(bus.emit(0.0, 0.0, 1.0), 0);
    assert_eq!(bus.subscriber_count(), 0);
}

// ============================================================================
// Ripple Tests
// ============================================================================

#[test]
fn test_ripple_zero_before_start_and_after_lifetime() {
    let params = RippleParams::default();
    let impact = Impact::new(0.0, 0.0, 5.0, 1.0);
    assert_eq!(ripple_displacement(&impact, 0.5, 0.0, 4.0, &params), 0.0);
    assert_eq!(
        ripple_displacement(&impact, 0.5, 0.0, 5.0 + params.lifetime + 0.1, &params),
        0.0
    );
}

#[test]
fn test_ripple_decays_with_distance() {
    let params = RippleParams::default();
    let impact = Impact::new(0.0, 0.0, 0.0, 1.0);
    // Quarter period, sin = 1
    let t = std::f32::consts::FRAC_PI_2 / params.frequency;
    let near = ripple_displacement(&impact, 0.0, 0.0, t, &params);
    let far = ripple_displacement(&impact, 4.0, 0.0, t, &params);

    let expected_near = (1.0 - t / params.lifetime) * params.amplitude;
    assert_relative_eq!(near, expected_near, epsilon = 1e-4);
    assert_relative_eq!(far, expected_near * (-4.0 * params.falloff).exp(), epsilon = 1e-4);
}

#[test]
fn test_total_displacement_sums_ring() {
    let params = RippleParams::default();
    let mut ring = ImpactRing::new();
    ring.emit(0.0, 0.0, 1.0, 0.0);
    ring.emit(2.0, 0.0, 0.5, 0.0);

    let t = 0.1;
    let expected: f32 = ring
        .active()
        .iter()
        .map(|imp| ripple_displacement(imp, 1.0, 0.0, t, &params))
        .sum();
    assert_relative_eq!(total_displacement(&ring.active(), 1.0, 0.0, t, &params), expected);
}

// ============================================================================
// Falling Drop Tests
// ============================================================================

#[test]
fn test_scheduler_lands_each_drop_once() {
    let terrain = NoiseTerrain::default();
    let mut drops = DropScheduler::new(0.5, 5.0, 15.0);
    let mut landings = Vec::new();

    // 10 simulated seconds at 60 Hz
    for _ in 0..600 {
        landings.extend(drops.update(1.0 / 60.0, &terrain));
    }

    // One spawn every half second; each takes ~1s to fall 5m
    assert!(landings.len() >= 17, "only {} landings", landings.len());
    assert!(landings.len() <= 20);
    for (point, strength) in &landings {
        assert!((point.x * point.x + point.z * point.z).sqrt() <= 15.0 + 1e-3);
        assert!((0.0..=1.0).contains(strength));
    }
}
