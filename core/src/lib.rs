// landscape holds the noise, banding, filtering and mesh-building algorithms
// plus the dirty-flag scheduler that reruns them
pub mod bands;
pub mod config;
pub mod error;
pub mod filter;
pub mod fractal;
pub mod mesh;
pub mod params;
pub mod perlin2;
pub mod scheduler;

pub use bands::{TerrainBand, TerrainPalette};
pub use config::LandscapeConfig;
pub use error::TerrainError;
pub use filter::{FilterKind, HeightFilter};
pub use fractal::FractalNoise;
pub use mesh::{BuildStats, TerrainMesh, TerrainMeshBuilder};
pub use params::{GenerationParameters, ParamValue, Parameter, ParameterStore, RegenState};
pub use perlin2::Perlin2D;
pub use scheduler::RegenerationScheduler;

// Single-octave 2D noise that the fractal sampler stacks into octaves.
// Implementations must be deterministic: same (x, y), same value.
pub trait NoiseSource {
    fn sample2(&self, x: f64, y: f64) -> f64;
}
