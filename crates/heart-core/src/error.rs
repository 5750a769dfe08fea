use thiserror::Error;

/// Errors from the parsing and validation entry points.
///
/// Runtime paths (sampling, simulation, tile generation) never fail; they
/// absorb bad input with a deterministic fallback instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HeartError {
    #[error("unknown parameter name: {0:?}")]
    UnknownParameter(String),

    #[error("unknown emotion: {0:?}")]
    UnknownEmotion(String),

    #[error("invalid particle count range {min}..={max}")]
    InvalidCountRange { min: usize, max: usize },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidSetting { name: &'static str, value: f32 },

    #[error("texture cache capacity must be at least 1")]
    ZeroCacheCapacity,
}

pub type Result<T> = std::result::Result<T, HeartError>;
