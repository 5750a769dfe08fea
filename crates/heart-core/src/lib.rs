pub mod canvas;
pub mod constants;
pub mod emotion;
pub mod error;
pub mod field;
pub mod glyphs;
pub mod keys;
pub mod params;
pub mod particle;
pub mod raster;
pub mod sampler;
pub mod scene;
pub mod smooth_noise;
pub mod texture;
pub mod volume;

pub use canvas::{Canvas, Color, DrawCmd, DrawList, Paint, Pattern};
pub use emotion::Emotion;
pub use error::{HeartError, Result};
pub use field::{FieldConfig, ParticleField, Viewport};
pub use keys::ParameterController;
pub use params::{ParamFamily, ParamName, ParamRange, ParamVector, ParameterState};
pub use particle::{Kind, Particle, Tick, Variant};
pub use raster::Raster;
pub use sampler::{SampleMode, SamplePoint, SamplerConfig, ShapeSampler, ShapeSource};
pub use scene::{Scene, SceneConfig};
pub use smooth_noise::SmoothNoise;
pub use texture::{Motif, TextureTile, TextureTileGenerator, TileKey};
pub use volume::VolumeFill;
