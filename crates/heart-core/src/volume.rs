use crate::constants::*;

/// Liquid level of the letter, raised by microphone loudness.
#[derive(Clone, Debug, Default)]
pub struct VolumeFill {
    level: f32,
    volume: f32,
}

impl VolumeFill {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest microphone level (RMS amplitude, roughly 0–1).
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() { volume.max(0.0) } else { 0.0 };
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Fill speed in level units per frame, never negative.
    pub fn speed(&self) -> f32 {
        remap(self.volume, VOLUME_MIN, VOLUME_MAX, FILL_SPEED_MIN, FILL_SPEED_MAX).max(0.0)
    }

    /// Raise the level by `speed * frames`, saturating at full.
    pub fn advance(&mut self, frames: f32) {
        if !(frames > 0.0) {
            return;
        }
        self.level = (self.level + self.speed() * frames).clamp(0.0, FILL_LEVEL_MAX);
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
    }

    /// 0–100.
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_full(&self) -> bool {
        self.level >= FILL_LEVEL_MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_only_rises_and_saturates() {
        let mut f = VolumeFill::new();
        f.set_volume(0.0);
        f.advance(1.0);
        // silence still trickles in slowly
        assert!(f.level() > 0.0 && f.level() < FILL_SPEED_MIN);
        f.set_volume(0.4);
        for _ in 0..40 {
            f.advance(1.0);
        }
        assert!(f.is_full());
        assert_eq!(f.level(), FILL_LEVEL_MAX);
    }
}
