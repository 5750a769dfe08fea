// Parameter ranges, commands and smoothing.

use heart_core::{HeartError, ParamFamily, ParamName, ParamRange, ParamVector, ParameterState};

fn particle_state() -> ParameterState {
    ParameterState::new(ParamVector::particle(60.0, 50.0, 95.0, 18.0, 20.0))
}

#[test]
fn targets_are_clamped_or_wrapped_into_range() {
    let mut s = particle_state();
    s.set_target(ParamName::Energy, 180.0);
    assert_eq!(s.target_value(ParamName::Energy), Some(100.0));
    s.set_target(ParamName::Energy, -5.0);
    assert_eq!(s.target_value(ParamName::Energy), Some(0.0));
    s.set_target(ParamName::Radius, 1.0);
    assert_eq!(s.target_value(ParamName::Radius), Some(2.0));

    s.set_target(ParamName::Hue, 370.0);
    assert!((s.target_value(ParamName::Hue).unwrap() - 10.0).abs() < 1e-4);
    s.set_target(ParamName::Hue, -10.0);
    assert!((s.target_value(ParamName::Hue).unwrap() - 350.0).abs() < 1e-4);
}

#[test]
fn non_finite_commands_land_on_the_range_minimum() {
    let mut s = particle_state();
    s.set_target(ParamName::Amount, f32::NAN);
    assert_eq!(s.target_value(ParamName::Amount), Some(0.0));
}

#[test]
fn increment_wraps_instead_of_clamping() {
    let mut s = particle_state();
    s.increment(ParamName::Amount, 10.0);
    assert!(
        (s.target_value(ParamName::Amount).unwrap() - 5.0).abs() < 1e-4,
        "95 + 10 on 0-100 should wrap to 5"
    );

    s.set_target(ParamName::Radius, 40.0);
    s.increment(ParamName::Radius, 2.0);
    assert!((s.target_value(ParamName::Radius).unwrap() - 4.0).abs() < 1e-4);

    s.set_target(ParamName::Hue, 355.0);
    s.increment(ParamName::Hue, 10.0);
    assert!((s.target_value(ParamName::Hue).unwrap() - 5.0).abs() < 1e-4);
}

#[test]
fn wrap_add_below_minimum_adds_the_span() {
    let r = ParamRange::Linear {
        min: 0.0,
        max: 100.0,
    };
    assert!((r.wrap_add(5.0, -10.0) - 95.0).abs() < 1e-4);
    assert_eq!(r.wrap_add(50.0, 10.0), 60.0);
}

#[test]
fn tick_contracts_the_gap_geometrically() {
    let mut s = particle_state();
    s.set_target(ParamName::Energy, 100.0);
    let mut gap = 50.0_f32;
    for _ in 0..10 {
        assert!(s.tick());
        let next = 100.0 - s.current_value(ParamName::Energy).unwrap();
        assert!(next < gap, "gap must shrink every tick: {next} >= {gap}");
        assert!((next - gap * 0.85).abs() < 1e-3);
        gap = next;
    }
}

#[test]
fn settled_state_reports_no_change() {
    let mut s = particle_state();
    assert!(!s.tick());
    assert!(!s.has_changed(0.01));
}

#[test]
fn hue_takes_the_shortest_arc() {
    let mut s = ParameterState::new(ParamVector::particle(350.0, 50.0, 50.0, 10.0, 10.0));
    s.set_target(ParamName::Hue, 10.0);
    s.tick();
    let hue = s.current_value(ParamName::Hue).unwrap();
    assert!((hue - 353.0).abs() < 1e-3, "expected 350 + 0.15 * 20, got {hue}");

    for _ in 0..80 {
        s.tick();
    }
    let hue = s.current_value(ParamName::Hue).unwrap();
    assert!(hue < 10.5 || hue > 359.5, "hue should settle near 10, got {hue}");
}

#[test]
fn regeneration_flag_fires_once_then_tracks_settling() {
    let mut s = particle_state();
    assert!(!s.needs_regeneration());

    s.set_target(ParamName::Turbulence, 21.0);
    assert!(s.needs_regeneration(), "a command always requests regeneration");
    assert!(!s.needs_regeneration(), "a 1.0 gap is already settled");

    s.set_target(ParamName::Turbulence, 80.0);
    assert!(s.needs_regeneration());
    assert!(s.needs_regeneration(), "still settling");
    for _ in 0..60 {
        s.tick();
    }
    assert!(!s.needs_regeneration());
}

#[test]
fn tiny_commands_do_not_mark_dirty() {
    let mut s = particle_state();
    s.set_target(ParamName::Energy, 50.05);
    assert!(!s.needs_regeneration());
}

#[test]
fn names_outside_the_family_are_ignored() {
    let mut s = ParameterState::new(ParamVector::neutral(ParamFamily::Texture));
    s.set_target(ParamName::Hue, 200.0);
    assert_eq!(s.target_value(ParamName::Hue), None);
    assert!(!s.needs_regeneration());
}

#[test]
fn presets_jump_or_animate() {
    let mut s = particle_state();
    let preset = ParamVector::particle(180.0, 30.0, 40.0, 10.0, 10.0);

    s.command_preset(preset);
    assert_eq!(s.target(), preset);
    assert_eq!(s.current_value(ParamName::Energy), Some(50.0));

    s.load_preset(preset);
    assert_eq!(s.current(), preset);
    assert!(s.needs_regeneration());

    s.set_target(ParamName::Energy, 90.0);
    s.reset();
    assert_eq!(s.target_value(ParamName::Energy), Some(30.0));
}

#[test]
fn parameter_names_parse_case_insensitively() {
    assert_eq!("Turbulence".parse::<ParamName>(), Ok(ParamName::Turbulence));
    assert_eq!(" hue ".parse::<ParamName>(), Ok(ParamName::Hue));
    assert_eq!(
        "loudness".parse::<ParamName>(),
        Err(HeartError::UnknownParameter("loudness".into()))
    );
}

#[test]
fn vectors_expose_the_count_driver() {
    assert_eq!(ParamVector::particle(0.0, 0.0, 42.0, 5.0, 0.0).amount(), 42.0);
    assert_eq!(ParamVector::texture(77.0, 0.0, 0.0, 0.0, 0.0).amount(), 77.0);
    assert_eq!(
        ParamVector::texture(61.0, 62.0, 63.0, 3.0, 100.0).rounded(5.0),
        [60, 60, 65, 5, 100]
    );
}
