use noise::{NoiseFn, Perlin};

// Perlin noise is zero on integer lattice points; shifting every query keeps
// particles whose ids land on the lattice from freezing in place.
const LATTICE_OFFSET: f64 = 0.371;

/// Seeded coherent noise remapped to \[0, 1\].
#[derive(Clone, Debug)]
pub struct SmoothNoise {
    perlin: Perlin,
}

impl SmoothNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    pub fn sample2(&self, x: f32, y: f32) -> f32 {
        let v = self
            .perlin
            .get([x as f64 + LATTICE_OFFSET, y as f64 + LATTICE_OFFSET]);
        unit(v)
    }

    pub fn sample3(&self, x: f32, y: f32, z: f32) -> f32 {
        let v = self.perlin.get([
            x as f64 + LATTICE_OFFSET,
            y as f64 + LATTICE_OFFSET,
            z as f64 + LATTICE_OFFSET,
        ]);
        unit(v)
    }
}

#[inline]
fn unit(v: f64) -> f32 {
    if v.is_finite() {
        (v * 0.5 + 0.5).clamp(0.0, 1.0) as f32
    } else {
        0.5
    }
}
