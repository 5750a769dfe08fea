//! The five recognized emotions and everything keyed off them.

use crate::canvas::Color;
use crate::error::HeartError;
use crate::params::ParamVector;
use crate::particle::Variant;
use glam::Vec2;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    Happiness,
    Envy,
    Anger,
    Rage,
    Trust,
}

impl Emotion {
    /// Lookup order for [`Emotion::from_word`].
    pub const ALL: [Emotion; 5] = [
        Emotion::Happiness,
        Emotion::Envy,
        Emotion::Anger,
        Emotion::Rage,
        Emotion::Trust,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Emotion::Happiness => "happiness",
            Emotion::Envy => "envy",
            Emotion::Anger => "anger",
            Emotion::Rage => "rage",
            Emotion::Trust => "trust",
        }
    }

    /// Glyph of the liquid-letter display; in `ALL` order the five spell HEART.
    pub fn letter(self) -> char {
        match self {
            Emotion::Happiness => 'H',
            Emotion::Envy => 'E',
            Emotion::Anger => 'A',
            Emotion::Rage => 'R',
            Emotion::Trust => 'T',
        }
    }

    pub fn rgb(self) -> [u8; 3] {
        match self {
            Emotion::Happiness => [0xFF, 0xD7, 0x00],
            Emotion::Envy => [0xFF, 0x45, 0x00],
            Emotion::Anger => [0xFF, 0x8C, 0x00],
            Emotion::Rage => [0xFF, 0x00, 0x00],
            Emotion::Trust => [0x20, 0xB2, 0xAA],
        }
    }

    pub fn color(self) -> Color {
        Color::from_rgb8(self.rgb())
    }

    /// Where the feeling sits on the body, relative to the silhouette center.
    pub fn body_offset(self) -> Vec2 {
        match self {
            Emotion::Happiness => Vec2::new(0.0, -80.0),
            Emotion::Envy => Vec2::new(0.0, -110.0),
            Emotion::Anger => Vec2::new(0.0, -90.0),
            Emotion::Rage => Vec2::new(0.0, -120.0),
            Emotion::Trust => Vec2::new(0.0, -40.0),
        }
    }

    pub fn variant(self) -> Variant {
        match self {
            Emotion::Happiness => Variant::Square,
            Emotion::Trust => Variant::Dot,
            Emotion::Envy => Variant::Dither,
            Emotion::Rage => Variant::Reaction,
            Emotion::Anger => Variant::Strip,
        }
    }

    /// Particle parameters: hue, energy, amount, radius, turbulence.
    pub fn particle_preset(self) -> ParamVector {
        match self {
            Emotion::Happiness => ParamVector::particle(60.0, 70.0, 95.0, 18.0, 15.0),
            Emotion::Trust => ParamVector::particle(180.0, 30.0, 95.0, 18.0, 10.0),
            Emotion::Envy => ParamVector::particle(15.0, 60.0, 95.0, 18.0, 20.0),
            Emotion::Rage => ParamVector::particle(0.0, 100.0, 95.0, 20.0, 30.0),
            Emotion::Anger => ParamVector::particle(30.0, 90.0, 95.0, 18.0, 25.0),
        }
    }

    /// Texture parameters: density, energy, amplitude, roughness, turbulence.
    pub fn texture_preset(self) -> ParamVector {
        match self {
            Emotion::Happiness => ParamVector::texture(60.0, 75.0, 50.0, 20.0, 30.0),
            Emotion::Envy => ParamVector::texture(80.0, 40.0, 35.0, 60.0, 70.0),
            Emotion::Anger => ParamVector::texture(70.0, 85.0, 65.0, 75.0, 50.0),
            Emotion::Rage => ParamVector::texture(90.0, 95.0, 80.0, 85.0, 90.0),
            Emotion::Trust => ParamVector::texture(40.0, 25.0, 45.0, 15.0, 20.0),
        }
    }

    /// First emotion whose key appears anywhere in `utterance`.
    pub fn from_word(utterance: &str) -> Option<Emotion> {
        let lower = utterance.to_lowercase();
        Emotion::ALL.into_iter().find(|e| lower.contains(e.key()))
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Emotion {
    type Err = HeartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|e| e.key() == lower)
            .ok_or_else(|| HeartError::UnknownEmotion(s.to_string()))
    }
}
