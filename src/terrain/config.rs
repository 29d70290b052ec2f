//! Terrain configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::core::Error;
use super::heightfield::MAX_RESOLUTION;
use super::noise::NoiseParams;
use super::probe::ProbeConfig;
use super::sculptor::Brush;

/// Everything needed to build a terrain and drive its editing tools
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Half-width in world units
    pub size: f32,
    /// Samples per axis
    pub resolution: usize,
    /// Noise seed
    pub seed: u32,
    /// Height synthesis parameters
    pub noise: NoiseParams,
    /// Initial brush settings
    pub brush: Brush,
    /// Cursor picking limits
    pub probe: ProbeConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 256.0,
            resolution: 512,
            seed: 42,
            noise: NoiseParams::default(),
            brush: Brush::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Parse from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded terrain config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no terrain can be built from
    pub fn validate(&self) -> Result<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(Error::Config(format!("size must be finite and positive, got {}", self.size)));
        }
        if !(2..=MAX_RESOLUTION).contains(&self.resolution) {
            return Err(Error::Config(format!(
                "resolution must be in 2..={}, got {}", MAX_RESOLUTION, self.resolution
            )));
        }
        if !self.noise.amplitude.is_finite() || !self.noise.frequency.is_finite() {
            return Err(Error::Config("noise amplitude and frequency must be finite".into()));
        }
        if !self.brush.strength.is_finite() {
            return Err(Error::Config(format!("brush strength must be finite, got {}", self.brush.strength)));
        }
        if !(0.0..=1.0).contains(&self.brush.inner_radius_ratio) {
            return Err(Error::Config(format!(
                "brush inner_radius_ratio must be in [0, 1], got {}", self.brush.inner_radius_ratio
            )));
        }
        if !(self.probe.epsilon > 0.0) || self.probe.max_steps == 0 {
            return Err(Error::Config("probe needs a positive epsilon and step budget".into()));
        }
        Ok(())
    }
}
