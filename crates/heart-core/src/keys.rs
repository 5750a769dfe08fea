//! H/E/A/R/T parameter keys.

use crate::constants::KEY_DEBOUNCE_MS;
use crate::params::{ParamFamily, ParamName, ParameterState};
use fnv::FnvHashMap;
use instant::Instant;
use std::time::Duration;

/// Parameter bound to a key for the given family.
#[inline]
pub fn param_for_key(key: char, family: ParamFamily) -> Option<ParamName> {
    let index = match key.to_ascii_lowercase() {
        'h' => 0,
        'e' => 1,
        'a' => 2,
        'r' => 3,
        't' => 4,
        _ => return None,
    };
    Some(family.names()[index])
}

/// Upper-case key bound to `name` in `family`.
pub fn key_for_param(name: ParamName, family: ParamFamily) -> Option<char> {
    let index = family.names().iter().position(|n| *n == name)?;
    ['H', 'E', 'A', 'R', 'T'].get(index).copied()
}

/// Increment applied per key press.
#[inline]
pub fn step_for(name: ParamName) -> f32 {
    match name {
        ParamName::Radius => 2.0,
        _ => 10.0,
    }
}

/// Applies key presses to a [`ParameterState`], ignoring repeats of the same
/// key inside the debounce window.
pub struct ParameterController {
    debounce: Duration,
    last_press: FnvHashMap<char, Instant>,
}

impl Default for ParameterController {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterController {
    pub fn new() -> Self {
        Self {
            debounce: Duration::from_millis(KEY_DEBOUNCE_MS),
            last_press: FnvHashMap::default(),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    fn is_debounced(&self, key: char, now: Instant) -> bool {
        self.last_press
            .get(&key)
            .is_some_and(|last| now.saturating_duration_since(*last) < self.debounce)
    }

    /// Increment the bound parameter's target (wrapping at its range ends).
    /// Returns the parameter that changed, or `None` for unbound or debounced keys.
    pub fn handle_key(
        &mut self,
        key: char,
        now: Instant,
        state: &mut ParameterState,
    ) -> Option<ParamName> {
        let key = key.to_ascii_lowercase();
        let name = param_for_key(key, state.family())?;
        if self.is_debounced(key, now) {
            log::debug!("[keys] '{key}' debounced");
            return None;
        }
        self.last_press.insert(key, now);

        let step = step_for(name);
        state.increment(name, step);
        log::info!(
            "[keys] {name} +{step} -> {:.1}",
            state.target_value(name).unwrap_or_default()
        );
        Some(name)
    }
}
