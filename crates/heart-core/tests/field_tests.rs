// Particle field generation, stepping and regeneration.

use glam::Vec2;
use heart_core::{
    DrawList, FieldConfig, HeartError, ParamName, ParamVector, ParticleField, SampleMode,
    ShapeSource, Variant, Viewport,
};
use image::{Rgba, RgbaImage};
use std::rc::Rc;
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);

fn viewport() -> Viewport {
    Viewport::new(800.0, 600.0)
}

fn trust_params() -> ParamVector {
    ParamVector::particle(180.0, 30.0, 95.0, 18.0, 10.0)
}

fn word_field(word: &str, variant: Variant, params: ParamVector) -> ParticleField {
    ParticleField::new(
        ShapeSource::text(word, 128.0, Vec2::new(400.0, 200.0)),
        variant,
        params,
        FieldConfig::text(),
        viewport(),
        11,
    )
    .expect("valid field config")
}

fn body_mask() -> Rc<RgbaImage> {
    Rc::new(RgbaImage::from_fn(20, 40, |x, y| {
        let inside = (4..16).contains(&x) && (2..38).contains(&y);
        Rgba([255, 255, 255, if inside { 255 } else { 0 }])
    }))
}

#[test]
fn trust_at_amount_95_fills_the_text_range() {
    let field = word_field("TRUST", Variant::Dot, trust_params());
    let n = field.particle_count();
    assert!((2000..=10000).contains(&n), "count {n} outside 2000..=10000");
    assert_eq!(n, 2000 + (8000.0_f32 * 0.95).floor() as usize);
    assert!(field.particles().iter().all(|p| p.variant() == Variant::Dot));
}

#[test]
fn count_scales_with_amount() {
    let field = word_field("HI", Variant::Base, trust_params());
    assert_eq!(field.count_for_amount(0.0), 2000);
    assert_eq!(field.count_for_amount(50.0), 6000);
    assert_eq!(field.count_for_amount(100.0), 10000);
    assert_eq!(field.count_for_amount(250.0), 10000);
}

#[test]
fn spawn_positions_stay_within_the_jitter_of_their_targets() {
    let field = word_field("HEART", Variant::Square, trust_params());
    for p in field.particles() {
        let d = p.position - p.target;
        assert!(d.x.abs() <= 10.0 && d.y.abs() <= 10.0, "spawn offset {d}");
        assert_eq!(p.velocity, Vec2::ZERO);
    }
}

#[test]
fn zero_dt_leaves_every_particle_in_place() {
    let mut field = word_field("RAGE", Variant::Reaction, trust_params());
    let before: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
    field.update(Duration::ZERO);
    let after: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
    assert_eq!(before, after);
    assert_eq!(field.time(), 0.0);
}

#[test]
fn particles_settle_onto_their_targets() {
    let calm = ParamVector::particle(0.0, 50.0, 0.0, 6.0, 0.0);
    let mut field = word_field("T", Variant::Base, calm);
    for _ in 0..400 {
        field.update(FRAME);
    }
    for p in field.particles() {
        let d = p.position.distance(p.target);
        assert!(d < 0.5, "particle still {d} from its target");
    }
}

#[test]
fn long_frames_are_clamped() {
    let mut field = word_field("A", Variant::Base, trust_params());
    field.update(Duration::from_secs(2));
    assert!((field.time() - 3.0).abs() < 1e-4);
}

#[test]
fn regeneration_replaces_every_particle() {
    let mut field = word_field("ENVY", Variant::Dither, trust_params());
    assert_eq!(field.generation(), 1);
    assert!(field.particles().iter().all(|p| p.epoch == 1));

    field.regenerate(Some(trust_params().with(ParamName::Amount, 10.0)));
    assert_eq!(field.generation(), 2);
    assert!(field.particles().iter().all(|p| p.epoch == 2));
    assert_eq!(field.particle_count(), 2800);
}

#[test]
fn regeneration_with_the_same_params_still_replaces_particles() {
    let mut field = word_field("TRUST", Variant::Square, trust_params());
    let count = field.particle_count();

    field.regenerate(None);
    assert_eq!(field.generation(), 2);
    assert_eq!(field.params(), &trust_params());
    assert_eq!(field.particle_count(), count);
    assert!(field.particles().iter().all(|p| p.epoch == 2));

    field.set_variant(Variant::Square);
    assert_eq!(field.generation(), 3);
    assert!(field.particles().iter().all(|p| p.epoch == 3));
}

#[test]
fn small_amount_changes_keep_the_current_particles() {
    let mut field = word_field("HEART", Variant::Strip, trust_params());
    assert!(!field.update_params(trust_params().with(ParamName::Amount, 80.0)));
    assert_eq!(field.generation(), 1);
    assert_eq!(field.params().amount(), 80.0);

    assert!(field.update_params(trust_params().with(ParamName::Amount, 70.0)));
    assert_eq!(field.generation(), 2);
}

#[test]
fn regeneration_threshold_is_configurable() {
    let mut field = ParticleField::new(
        ShapeSource::text("H", 64.0, Vec2::new(100.0, 100.0)),
        Variant::Base,
        trust_params(),
        FieldConfig::text().with_regen_threshold(5.0),
        viewport(),
        3,
    )
    .expect("valid field config");
    assert!(field.update_params(trust_params().with(ParamName::Amount, 88.0)));
}

#[test]
fn empty_shapes_give_empty_fields() {
    let mut field = word_field("", Variant::Square, trust_params());
    assert_eq!(field.particle_count(), 0);
    field.update(FRAME);
    let mut list = DrawList::new();
    field.display(&mut list);
    assert!(list.is_empty());

    field.set_shape(ShapeSource::text("~", 128.0, Vec2::ZERO));
    assert_eq!(field.particle_count(), 0);
}

#[test]
fn unknown_variant_names_fall_back_to_base() {
    let field = word_field("OK", Variant::from_name("confetti"), trust_params());
    assert!(field.particles().iter().all(|p| p.variant() == Variant::Base));
}

#[test]
fn particles_outside_the_margin_are_skipped() {
    let mut field = ParticleField::new(
        ShapeSource::text("H", 64.0, Vec2::new(-500.0, -500.0)),
        Variant::Base,
        trust_params(),
        FieldConfig::text(),
        viewport(),
        5,
    )
    .expect("valid field config");
    let before: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
    field.update(FRAME);
    let after: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
    assert_eq!(before, after);

    let mut list = DrawList::new();
    field.display(&mut list);
    assert!(list.is_empty());
}

#[test]
fn silhouette_fields_sample_the_outline_sparsely() {
    let config = FieldConfig::silhouette();
    assert_eq!(config.sample_mode, SampleMode::Outline);
    let field = ParticleField::new(
        ShapeSource::image(body_mask(), Vec2::new(400.0, 300.0), Vec2::new(100.0, 200.0)),
        Variant::Satellite,
        trust_params(),
        config,
        viewport(),
        9,
    )
    .expect("valid field config");
    assert_eq!(field.particle_count(), 30 + (170.0_f32 * 0.95).floor() as usize);
    assert!(field.particles().iter().all(|p| p.id >= 1000));
}

#[test]
fn display_emits_finite_commands_for_every_variant() {
    for variant in Variant::ALL {
        let mut field = word_field("HEART", variant, trust_params().with(ParamName::Amount, 0.0));
        for _ in 0..5 {
            field.update(FRAME);
        }
        let mut list = DrawList::new();
        field.display(&mut list);
        assert!(list.len() >= field.particle_count(), "{variant:?} drew too little");
        assert!(list.commands().iter().all(|c| c.is_finite()), "{variant:?} drew NaN");
    }
}

#[test]
fn invalid_configs_are_rejected() {
    let mut config = FieldConfig::text();
    assert!(config.validate().is_ok());
    config.count_range = (10, 5);
    assert_eq!(
        config.validate(),
        Err(HeartError::InvalidCountRange { min: 10, max: 5 })
    );
    let config = FieldConfig::silhouette().with_regen_threshold(-1.0);
    assert!(matches!(
        config.validate(),
        Err(HeartError::InvalidSetting {
            name: "regen_threshold",
            ..
        })
    ));

    let field = ParticleField::new(
        ShapeSource::text("H", 64.0, Vec2::new(100.0, 100.0)),
        Variant::Base,
        trust_params(),
        config,
        viewport(),
        1,
    );
    assert!(field.is_err());
}
