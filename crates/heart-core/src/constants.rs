// Shared simulation and rendering tuning constants.

// Timing
pub const NOMINAL_FPS: f32 = 60.0; // one simulation "frame" of motion per 1/60 s
pub const MAX_STEP_FRAMES: f32 = 3.0; // clamp for long frames so springs stay stable

// Parameter interpolation
pub const SMOOTHING: f32 = 0.15; // fraction of remaining distance covered per tick
pub const DIRTY_EPSILON: f32 = 0.1; // target change that marks a command as significant
pub const TICK_EPSILON: f32 = 0.1; // current change that counts as "still moving"
pub const SETTLING_THRESHOLD: f32 = 2.0; // |current - target| that keeps regeneration flagged

// Particle dynamics
pub const SPRING_STRENGTH: f32 = 0.15; // pull toward the target anchor
pub const DAMPING: f32 = 0.9; // velocity retained per frame
pub const TURBULENCE_FORCE_MAX: f32 = 2.0; // drift force at turbulence 100
pub const NOISE_ID_SCALE: f32 = 0.1; // noise-space distance between neighbouring ids
pub const NOISE_TIME_SCALE: f32 = 0.001; // noise-space time step at energy 50
pub const NOISE_Y_OFFSET: f32 = 100.0; // decorrelates the y drift channel from x
pub const ROTATION_SPEED_MAX: f32 = 0.02; // radians per frame at energy 50
pub const HUE_DRIFT_DEGREES: f32 = 5.0; // amplitude of the per-particle hue wobble
pub const HUE_DRIFT_RATE: f32 = 0.01; // radians of wobble phase per frame

// Variant shaping
pub const SPARKLE_CHANCE: f32 = 0.02; // fraction of squares sparkling in a window
pub const SPARKLE_WINDOW_FRAMES: f32 = 8.0; // how long a sparkle lasts
pub const STRIP_TURN_RATE: f32 = 0.1; // max strip angle change per frame at energy 50
pub const SATELLITE_ORBIT_FACTOR: f32 = 3.0; // orbit radius as a multiple of particle size
pub const SATELLITE_TURBULENCE_MAX: f32 = 10.0; // orbit wobble at turbulence 100
pub const SATELLITE_TRAIL_RADIANS: f32 = 0.5; // angular length of the trail segment

// Field defaults
pub const TEXT_PARTICLES_MIN: usize = 2000;
pub const TEXT_PARTICLES_MAX: usize = 10000;
pub const SILHOUETTE_PARTICLES_MIN: usize = 30;
pub const SILHOUETTE_PARTICLES_MAX: usize = 200;
pub const TEXT_SPAWN_JITTER: f32 = 10.0; // entrance offset in canvas units
pub const SILHOUETTE_SPAWN_JITTER: f32 = 15.0;
pub const SILHOUETTE_ID_OFFSET: u32 = 1000; // keeps body noise seeds apart from text seeds
pub const REGEN_AMOUNT_THRESHOLD: f32 = 20.0; // amount delta that forces regeneration
pub const CULL_MARGIN: f32 = 50.0; // generous margin around the viewport

// Sampling
pub const SAMPLE_STRIDE: u32 = 2; // scan every n-th pixel in both axes
pub const TEXT_BRIGHTNESS_THRESHOLD: u8 = 200;
pub const IMAGE_ALPHA_THRESHOLD: u8 = 128;
pub const DUPLICATE_JITTER: f32 = 1.0; // max offset for oversampled duplicates
pub const TEXT_CHAR_WIDTH_FACTOR: f32 = 0.7; // estimated advance per font-size unit
pub const TEXT_BUFFER_MARGIN: f32 = 2.0; // buffer size relative to the estimated text box

// Texture tiles
pub const TILE_SIZE: u32 = 100;
pub const TILE_CACHE_CAPACITY: usize = 50;
pub const TILE_KEY_ROUNDING: f32 = 5.0; // parameters snap to this step in cache keys

// Volume fill
pub const VOLUME_MIN: f32 = 0.01; // microphone level treated as silence
pub const VOLUME_MAX: f32 = 0.4; // microphone level treated as shouting
pub const FILL_SPEED_MIN: f32 = 0.2; // fill units per frame at VOLUME_MIN
pub const FILL_SPEED_MAX: f32 = 5.0; // fill units per frame at VOLUME_MAX
pub const FILL_LEVEL_MAX: f32 = 100.0;

// Keys
pub const KEY_DEBOUNCE_MS: u64 = 200;

// Scene layout
pub const TEXT_SIZE: f32 = 128.0; // emotion word font size in pixels
pub const TEXT_Y_FACTOR: f32 = 0.3; // word center as a fraction of viewport height
pub const BODY_Y_FACTOR: f32 = 0.65; // silhouette center as a fraction of viewport height
pub const BODY_HEIGHT: f32 = 400.0; // silhouette placement height; width is half
pub const HOTSPOT_DIAMETER_MIN: f32 = 55.0;
pub const HOTSPOT_DIAMETER_MAX: f32 = 65.0;
pub const HOTSPOT_MIN_FILL: f32 = 5.0; // fill level below which the hotspot stays hidden
pub const BREATHING_FREQUENCY: f32 = 0.003; // radians per millisecond

/// Linear remap of `value` from `[in_min, in_max]` to `[out_min, out_max]`, unclamped.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if (in_max - in_min).abs() < f32::EPSILON {
        return out_min;
    }
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// Nominal frames covered by `dt`, clamped to [`MAX_STEP_FRAMES`].
#[inline]
pub fn step_frames(dt: std::time::Duration) -> f32 {
    (dt.as_secs_f32() * NOMINAL_FPS).min(MAX_STEP_FRAMES)
}
