// Shape rasterization and point selection.

use glam::Vec2;
use heart_core::{SampleMode, SamplerConfig, ShapeSampler, ShapeSource};
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::rc::Rc;

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn heart_text() -> ShapeSource {
    ShapeSource::text("HEART", 64.0, Vec2::new(300.0, 200.0))
}

/// 10×10 mask whose left half is opaque.
fn half_mask() -> Rc<RgbaImage> {
    Rc::new(RgbaImage::from_fn(10, 10, |x, _| {
        if x < 5 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    }))
}

#[test]
fn candidate_count_is_bounded_by_the_stride_grid() {
    let sampler = ShapeSampler::default();
    let coverage = sampler.rasterize(&heart_text());
    let (w, h) = coverage.buffer.dimensions();
    let s = sampler.config().stride;
    let bound = (w.div_ceil(s) * h.div_ceil(s)) as usize;
    let candidates = sampler.candidates_in(&coverage, SampleMode::Interior);
    assert!(!candidates.is_empty(), "HEART must produce candidates");
    assert!(candidates.len() <= bound, "{} > {}", candidates.len(), bound);
}

#[test]
fn text_candidates_sit_around_the_anchor() {
    let sampler = ShapeSampler::default();
    let anchor = Vec2::new(300.0, 200.0);
    let candidates = sampler.candidates(&heart_text(), SampleMode::Interior);
    for p in &candidates {
        assert!((p.y - anchor.y).abs() <= 64.0, "{p} too far from the text line");
        assert!((p.x - anchor.x).abs() <= 5.0 * 64.0 * 0.7, "{p} outside the word");
    }
    let mean = candidates.iter().copied().sum::<Vec2>() / candidates.len() as f32;
    assert!(mean.distance(anchor) < 20.0, "word is not centered: {mean}");
}

#[test]
fn sample_returns_exactly_the_requested_count() {
    let sampler = ShapeSampler::default();
    let mut r = rng();
    for n in [1, 5, 500, 20_000] {
        let pts = sampler.sample(&heart_text(), n, SampleMode::Interior, &mut r);
        assert_eq!(pts.len(), n);
    }
}

#[test]
fn undersampled_draws_come_from_the_candidate_set() {
    let sampler = ShapeSampler::default();
    let candidates = sampler.candidates(&heart_text(), SampleMode::Interior);
    let pts = sampler.select(&candidates, 50, &mut rng());
    for p in pts {
        assert!(candidates.contains(&p));
    }
}

#[test]
fn oversampled_draws_stay_within_the_jitter() {
    let sampler = ShapeSampler::new(SamplerConfig {
        duplicate_jitter: 1.0,
        ..SamplerConfig::default()
    });
    let candidates = vec![Vec2::new(10.0, 10.0), Vec2::new(40.0, 40.0)];
    let pts = sampler.select(&candidates, 100, &mut rng());
    assert_eq!(pts.len(), 100);
    for p in pts {
        let near = candidates
            .iter()
            .any(|c| (p.x - c.x).abs() <= 1.0 && (p.y - c.y).abs() <= 1.0);
        assert!(near, "{p} drifted more than the jitter");
    }
}

#[test]
fn empty_shapes_give_no_points() {
    let sampler = ShapeSampler::default();
    let mut r = rng();
    let blank = ShapeSource::text("", 64.0, Vec2::ZERO);
    assert!(sampler.sample(&blank, 100, SampleMode::Interior, &mut r).is_empty());

    let unsupported = ShapeSource::text("~~~", 64.0, Vec2::ZERO);
    assert!(sampler
        .sample(&unsupported, 100, SampleMode::Interior, &mut r)
        .is_empty());

    let clear = Rc::new(RgbaImage::new(8, 8));
    let image = ShapeSource::image(clear, Vec2::splat(50.0), Vec2::splat(40.0));
    assert!(sampler.sample(&image, 100, SampleMode::Outline, &mut r).is_empty());
}

#[test]
fn image_masks_are_scaled_into_their_placement_rect() {
    let sampler = ShapeSampler::default();
    let center = Vec2::new(100.0, 100.0);
    let shape = ShapeSource::image(half_mask(), center, Vec2::new(40.0, 40.0));
    let candidates = sampler.candidates(&shape, SampleMode::Interior);
    assert!(!candidates.is_empty());
    for p in &candidates {
        assert!(p.x >= 80.0 && p.x < 100.0, "{p} outside the opaque half");
        assert!(p.y >= 80.0 && p.y < 120.0, "{p} outside the rect");
    }
}

#[test]
fn outline_is_a_thinner_subset_of_the_interior() {
    let sampler = ShapeSampler::default();
    let shape = ShapeSource::image(half_mask(), Vec2::new(100.0, 100.0), Vec2::new(80.0, 80.0));
    let interior = sampler.candidates(&shape, SampleMode::Interior);
    let outline = sampler.candidates(&shape, SampleMode::Outline);
    assert!(!outline.is_empty());
    assert!(outline.len() < interior.len());
    for p in &outline {
        assert!(interior.contains(p));
    }
}
