//! Procedural heightfield terrain: generation, sculpting, picking and mesh
//! topology

pub mod config;
pub mod noise;
pub mod heightfield;
pub mod sculptor;
pub mod probe;
pub mod mesh;
pub mod terrain;

pub use config::TerrainConfig;
pub use self::noise::{NoiseParams, NoiseSynthesizer, NoiseType};
pub use heightfield::{HeightField, HeightTextureSink};
pub use sculptor::{sculpt, Brush, Kernel};
pub use probe::{ProbeConfig, ProbeHit, TerrainProbe};
pub use mesh::{GridMesh, MeshVertex};
pub use terrain::{ExportSnapshot, Terrain};
