// Single-particle motion laws.

use glam::Vec2;
use heart_core::{DrawCmd, DrawList, Kind, ParamVector, Particle, SmoothNoise, Tick, Variant};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn params(turbulence: f32) -> ParamVector {
    ParamVector::particle(120.0, 50.0, 50.0, 18.0, turbulence)
}

fn tick(time: f32, dt: f32, noise: &SmoothNoise) -> Tick<'_> {
    Tick { time, dt, noise }
}

fn spawn(variant: Variant, start: Vec2, target: Vec2) -> Particle {
    let mut rng = StdRng::seed_from_u64(1);
    Particle::spawn(variant, start, target, 7, 1, &params(0.0), &mut rng)
}

#[test]
fn variant_names_resolve_with_a_silent_fallback() {
    assert_eq!(Variant::from_name("squares"), Variant::Square);
    assert_eq!(Variant::from_name(" Dots "), Variant::Dot);
    assert_eq!(Variant::from_name("satellite"), Variant::Satellite);
    assert_eq!(Variant::from_name("glitter"), Variant::Base);
    for v in Variant::ALL {
        assert_eq!(Variant::from_name(v.name()), v);
    }
}

#[test]
fn zero_dt_update_is_a_no_op() {
    let noise = SmoothNoise::new(3);
    let mut p = spawn(Variant::Strip, Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0));
    let before = p.clone();
    p.update(&params(80.0), &tick(10.0, 0.0, &noise));
    assert_eq!(p.position, before.position);
    assert_eq!(p.velocity, before.velocity);
    assert_eq!(p.kind, before.kind);
}

#[test]
fn spring_pulls_particles_home() {
    let noise = SmoothNoise::new(3);
    let target = Vec2::new(100.0, 100.0);
    let mut p = spawn(Variant::Base, Vec2::new(60.0, 140.0), target);
    let start = p.position.distance(target);
    for i in 0..300 {
        let step = tick(i as f32, 1.0, &noise);
        p.update(&params(0.0), &step);
    }
    assert!(p.position.distance(target) < start * 0.01);
}

#[test]
fn turbulence_keeps_particles_near_but_not_on_target() {
    let noise = SmoothNoise::new(5);
    let target = Vec2::new(0.0, 0.0);
    let mut p = spawn(Variant::Square, target, target);
    for i in 0..600 {
        let step = tick(i as f32, 1.0, &noise);
        p.update(&params(100.0), &step);
        assert!(p.position.distance(target) < 40.0, "wandered off at step {i}");
    }
}

#[test]
fn hue_drifts_within_a_few_degrees() {
    let noise = SmoothNoise::new(1);
    let mut p = spawn(Variant::Dot, Vec2::ZERO, Vec2::ZERO);
    for i in 0..200 {
        let step = tick(i as f32 * 5.0, 1.0, &noise);
        p.update(&params(0.0), &step);
        assert!((p.hue - 120.0).abs() <= 5.0 + 1e-3, "hue {}", p.hue);
    }
}

#[test]
fn satellites_circle_their_anchor() {
    let noise = SmoothNoise::new(2);
    let target = Vec2::new(200.0, 200.0);
    let mut p = spawn(Variant::Satellite, target, target);
    let mut angles = Vec::new();
    for i in 0..50 {
        let step = tick(i as f32, 1.0, &noise);
        p.update(&params(0.0), &step);
        assert!((p.position.distance(target) - 54.0).abs() < 1e-2);
        if let Kind::Satellite { orbit_angle, .. } = p.kind {
            angles.push(orbit_angle);
        }
    }
    assert!(angles.windows(2).all(|w| w[1] > w[0]), "orbit must advance");
}

#[test]
fn strips_draw_three_layered_lines() {
    let noise = SmoothNoise::new(2);
    let p = spawn(Variant::Strip, Vec2::splat(30.0), Vec2::splat(30.0));
    let mut list = DrawList::new();
    p.display(&mut list, &tick(0.0, 0.0, &noise));
    let widths: Vec<f32> = list
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCmd::Line { width, .. } => Some(*width),
            _ => None,
        })
        .collect();
    assert_eq!(widths, vec![6.0, 3.0, 1.0]);
}

#[test]
fn dots_draw_glow_body_and_core() {
    let noise = SmoothNoise::new(2);
    let p = spawn(Variant::Dot, Vec2::splat(30.0), Vec2::splat(30.0));
    let mut list = DrawList::new();
    p.display(&mut list, &tick(0.0, 0.0, &noise));
    let radii: Vec<f32> = list
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCmd::Circle { radius, .. } => Some(*radius),
            _ => None,
        })
        .collect();
    assert_eq!(radii.len(), 3);
    assert!(radii[0] > radii[1] && radii[1] > radii[2]);
}
