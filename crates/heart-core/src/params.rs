//! Named scalar parameters with a commanded target and a smoothed current value.

use crate::constants::*;
use crate::error::HeartError;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamName {
    Density,
    Energy,
    Amplitude,
    Roughness,
    Turbulence,
    Hue,
    Amount,
    Radius,
}

impl ParamName {
    pub const ALL: [ParamName; 8] = [
        ParamName::Density,
        ParamName::Energy,
        ParamName::Amplitude,
        ParamName::Roughness,
        ParamName::Turbulence,
        ParamName::Hue,
        ParamName::Amount,
        ParamName::Radius,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::Density => "density",
            ParamName::Energy => "energy",
            ParamName::Amplitude => "amplitude",
            ParamName::Roughness => "roughness",
            ParamName::Turbulence => "turbulence",
            ParamName::Hue => "hue",
            ParamName::Amount => "amount",
            ParamName::Radius => "radius",
        }
    }

    pub fn range(self) -> ParamRange {
        match self {
            ParamName::Hue => ParamRange::Cyclic { period: 360.0 },
            ParamName::Radius => ParamRange::Linear {
                min: 2.0,
                max: 40.0,
            },
            _ => ParamRange::Linear {
                min: 0.0,
                max: 100.0,
            },
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = HeartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ParamName::ALL
            .into_iter()
            .find(|n| n.as_str() == lower)
            .ok_or_else(|| HeartError::UnknownParameter(s.to_string()))
    }
}

/// Declared value range of a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamRange {
    /// Commands clamp into `[min, max]`.
    Linear { min: f32, max: f32 },
    /// Commands wrap into `[0, period)`.
    Cyclic { period: f32 },
}

impl ParamRange {
    pub fn normalize(self, value: f32) -> f32 {
        let value = if value.is_finite() { value } else { self.min() };
        match self {
            ParamRange::Linear { min, max } => value.clamp(min, max),
            ParamRange::Cyclic { period } => {
                let v = value.rem_euclid(period);
                // rem_euclid can round up to exactly `period` for tiny negatives
                if v >= period {
                    0.0
                } else {
                    v
                }
            }
        }
    }

    /// `value + amount`, wrapped modularly instead of clamped.
    pub fn wrap_add(self, value: f32, amount: f32) -> f32 {
        match self {
            ParamRange::Linear { min, max } => {
                let span = max - min;
                let v = value + amount;
                if span <= 0.0 || !v.is_finite() {
                    min
                } else if v > max {
                    min + (v - max).rem_euclid(span)
                } else if v < min {
                    max - (min - v).rem_euclid(span)
                } else {
                    v
                }
            }
            ParamRange::Cyclic { .. } => self.normalize(value + amount),
        }
    }

    /// Signed distance from `from` to `to`; the shortest arc for cyclic ranges.
    pub fn delta(self, from: f32, to: f32) -> f32 {
        match self {
            ParamRange::Linear { .. } => to - from,
            ParamRange::Cyclic { period } => {
                let d = (to - from).rem_euclid(period);
                if d > period * 0.5 {
                    d - period
                } else {
                    d
                }
            }
        }
    }

    pub fn min(self) -> f32 {
        match self {
            ParamRange::Linear { min, .. } => min,
            ParamRange::Cyclic { .. } => 0.0,
        }
    }

    pub fn max(self) -> f32 {
        match self {
            ParamRange::Linear { max, .. } => max,
            ParamRange::Cyclic { period } => period,
        }
    }
}

/// Which five parameters a vector carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamFamily {
    /// density, energy, amplitude, roughness, turbulence
    Texture,
    /// hue, energy, amount, radius, turbulence
    Particle,
}

impl ParamFamily {
    pub fn names(self) -> [ParamName; 5] {
        match self {
            ParamFamily::Texture => [
                ParamName::Density,
                ParamName::Energy,
                ParamName::Amplitude,
                ParamName::Roughness,
                ParamName::Turbulence,
            ],
            ParamFamily::Particle => [
                ParamName::Hue,
                ParamName::Energy,
                ParamName::Amount,
                ParamName::Radius,
                ParamName::Turbulence,
            ],
        }
    }
}

/// Snapshot of five named parameter values, each inside its declared range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamVector {
    family: ParamFamily,
    values: [f32; 5],
}

impl ParamVector {
    pub fn new(family: ParamFamily, values: [f32; 5]) -> Self {
        let names = family.names();
        let mut normalized = values;
        for (v, name) in normalized.iter_mut().zip(names) {
            *v = name.range().normalize(*v);
        }
        Self {
            family,
            values: normalized,
        }
    }

    pub fn texture(
        density: f32,
        energy: f32,
        amplitude: f32,
        roughness: f32,
        turbulence: f32,
    ) -> Self {
        Self::new(
            ParamFamily::Texture,
            [density, energy, amplitude, roughness, turbulence],
        )
    }

    pub fn particle(hue: f32, energy: f32, amount: f32, radius: f32, turbulence: f32) -> Self {
        Self::new(ParamFamily::Particle, [hue, energy, amount, radius, turbulence])
    }

    /// Values used before any emotion is selected.
    pub fn neutral(family: ParamFamily) -> Self {
        match family {
            ParamFamily::Texture => Self::texture(50.0, 50.0, 50.0, 50.0, 50.0),
            ParamFamily::Particle => Self::particle(60.0, 50.0, 70.0, 6.0, 40.0),
        }
    }

    pub fn family(&self) -> ParamFamily {
        self.family
    }

    fn index_of(&self, name: ParamName) -> Option<usize> {
        self.family.names().iter().position(|n| *n == name)
    }

    pub fn get(&self, name: ParamName) -> Option<f32> {
        self.index_of(name).map(|i| self.values[i])
    }

    pub fn value_or(&self, name: ParamName, default: f32) -> f32 {
        self.get(name).unwrap_or(default)
    }

    /// Copy with one value replaced; names outside the family are ignored.
    pub fn with(mut self, name: ParamName, value: f32) -> Self {
        if let Some(i) = self.index_of(name) {
            self.values[i] = name.range().normalize(value);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamName, f32)> + '_ {
        self.family.names().into_iter().zip(self.values)
    }

    pub fn values(&self) -> [f32; 5] {
        self.values
    }

    /// The count-driving parameter: `amount`, or `density` for texture vectors.
    pub fn amount(&self) -> f32 {
        self.get(ParamName::Amount)
            .or_else(|| self.get(ParamName::Density))
            .unwrap_or(50.0)
    }

    /// Values snapped to multiples of `step`, for cache keys.
    pub fn rounded(&self, step: f32) -> [i32; 5] {
        self.values.map(|v| ((v / step).round() * step) as i32)
    }
}

#[derive(Clone, Debug)]
struct Slot {
    name: ParamName,
    range: ParamRange,
    current: f32,
    target: f32,
}

/// Smoothed parameter set.
///
/// `target` only changes through commands and is always inside its range;
/// `current` only changes through [`ParameterState::tick`], which moves it a
/// fixed fraction of the way toward `target`.
#[derive(Clone, Debug)]
pub struct ParameterState {
    family: ParamFamily,
    slots: SmallVec<[Slot; 5]>,
    defaults: ParamVector,
    smoothing: f32,
    dirty: bool,
}

impl ParameterState {
    pub fn new(preset: ParamVector) -> Self {
        Self {
            family: preset.family(),
            slots: Self::slots_from(&preset),
            defaults: preset,
            smoothing: SMOOTHING,
            dirty: false,
        }
    }

    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(f32::EPSILON, 1.0);
        self
    }

    fn slots_from(preset: &ParamVector) -> SmallVec<[Slot; 5]> {
        preset
            .iter()
            .map(|(name, v)| Slot {
                name,
                range: name.range(),
                current: v,
                target: v,
            })
            .collect()
    }

    fn slot_mut(&mut self, name: ParamName) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.name == name)
    }

    pub fn family(&self) -> ParamFamily {
        self.family
    }

    pub fn set_target(&mut self, name: ParamName, value: f32) {
        let family = self.family;
        let Some(slot) = self.slot_mut(name) else {
            log::debug!("[params] ignoring {name} for {family:?} parameters");
            return;
        };
        let old = slot.target;
        slot.target = slot.range.normalize(value);
        if slot.range.delta(old, slot.target).abs() > DIRTY_EPSILON {
            self.dirty = true;
        }
    }

    pub fn increment(&mut self, name: ParamName, amount: f32) {
        let Some(slot) = self.slots.iter().find(|s| s.name == name) else {
            return;
        };
        let next = slot.range.wrap_add(slot.target, amount);
        self.set_target(name, next);
    }

    /// Advance every `current` toward its `target`; true if anything moved
    /// more than [`TICK_EPSILON`].
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        for slot in self.slots.iter_mut() {
            let step = slot.range.delta(slot.current, slot.target) * self.smoothing;
            let next = match slot.range {
                ParamRange::Linear { .. } => slot.current + step,
                ParamRange::Cyclic { .. } => slot.range.normalize(slot.current + step),
            };
            if step.abs() > TICK_EPSILON {
                changed = true;
            }
            slot.current = next;
        }
        changed
    }

    /// Any `|current - target|` above `threshold`.
    pub fn has_changed(&self, threshold: f32) -> bool {
        self.slots
            .iter()
            .any(|s| s.range.delta(s.current, s.target).abs() > threshold)
    }

    /// True once after a command, and for as long as values are still settling.
    pub fn needs_regeneration(&mut self) -> bool {
        if std::mem::take(&mut self.dirty) {
            return true;
        }
        self.has_changed(SETTLING_THRESHOLD)
    }

    /// Jump straight to `preset` (current and target); used for a new shape.
    pub fn load_preset(&mut self, preset: ParamVector) {
        self.family = preset.family();
        self.slots = Self::slots_from(&preset);
        self.defaults = preset;
        self.dirty = true;
    }

    /// Animate toward `preset`; only the targets change.
    pub fn command_preset(&mut self, preset: ParamVector) {
        for (name, v) in preset.iter() {
            self.set_target(name, v);
        }
    }

    /// Animate back to the values this state was created or loaded with.
    pub fn reset(&mut self) {
        let defaults = self.defaults;
        self.command_preset(defaults);
        self.dirty = true;
    }

    pub fn current(&self) -> ParamVector {
        self.snapshot(|s| s.current)
    }

    pub fn target(&self) -> ParamVector {
        self.snapshot(|s| s.target)
    }

    fn snapshot(&self, pick: impl Fn(&Slot) -> f32) -> ParamVector {
        let mut values = [0.0; 5];
        for (v, slot) in values.iter_mut().zip(self.slots.iter()) {
            *v = pick(slot);
        }
        ParamVector::new(self.family, values)
    }

    pub fn current_value(&self, name: ParamName) -> Option<f32> {
        self.slots.iter().find(|s| s.name == name).map(|s| s.current)
    }

    pub fn target_value(&self, name: ParamName) -> Option<f32> {
        self.slots.iter().find(|s| s.name == name).map(|s| s.target)
    }
}
