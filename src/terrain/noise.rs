//! Noise-based height synthesis
//!
//! Heights are sampled at normalized grid coordinates in `[-1, 1]²`. The
//! coherent-noise primitive works in world scale: a normalized coordinate is
//! multiplied by the terrain half-width and [`BASE_FREQUENCY`] before it
//! reaches the noise function, so larger terrains show more features.

use noise::{Fbm, MultiFractal, NoiseFn, Simplex};
use serde::{Deserialize, Serialize};

/// World-units to noise-space scale applied under every sample
pub const BASE_FREQUENCY: f32 = 0.01;

/// Octaves used by both synthesis algorithms
pub const OCTAVES: usize = 5;

/// Per-octave frequency multiplier of the ridged synthesis
pub const RIDGE_LACUNARITY: f32 = 1.9;

/// Per-octave amplitude multiplier of the ridged synthesis
pub const RIDGE_GAIN: f32 = 0.5;

/// Height synthesis algorithm
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseType {
    /// Simplex fBm scaled by amplitude
    #[default]
    Fractal,
    /// Ridged multi-octave mountains with a radial falloff toward the edges
    Ridged,
}

impl NoiseType {
    /// Map a UI combo-box index to a noise type
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(NoiseType::Fractal),
            1 => Some(NoiseType::Ridged),
            _ => None,
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            NoiseType::Fractal => "Fractal",
            NoiseType::Ridged => "Ridged",
        }
    }
}

/// Parameters controlling height synthesis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Vertical scale of the output
    pub amplitude: f32,
    /// Sample-space scale (larger = busier terrain)
    pub frequency: f32,
    /// Which algorithm to run
    pub noise_type: NoiseType,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            amplitude: 80.0,
            frequency: 0.25,
            noise_type: NoiseType::Fractal,
        }
    }
}

/// Seeded height sampler
///
/// Holds one fractal source and one plain simplex source built from the same
/// seed; the ridged algorithm does its own octave accumulation over the plain
/// source.
pub struct NoiseSynthesizer {
    seed: u32,
    fractal: Fbm<Simplex>,
    simplex: Simplex,
}

impl NoiseSynthesizer {
    /// Create a synthesizer for the given seed
    pub fn new(seed: u32) -> Self {
        let fractal = Fbm::<Simplex>::new(seed)
            .set_octaves(OCTAVES)
            .set_frequency(1.0)
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        Self {
            seed,
            fractal,
            simplex: Simplex::new(seed),
        }
    }

    /// Current seed
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Rebuild the noise sources for a new seed (no-op if unchanged)
    pub fn reseed(&mut self, seed: u32) {
        if seed != self.seed {
            *self = Self::new(seed);
        }
    }

    /// Sample a height at normalized coordinate `(x, y)` for a terrain of
    /// half-width `size`
    pub fn sample(&self, x: f32, y: f32, size: f32, params: &NoiseParams) -> f32 {
        match params.noise_type {
            NoiseType::Fractal => {
                let f = params.frequency;
                Self::eval(&self.fractal, x * f, y * f, size) * params.amplitude
            }
            NoiseType::Ridged => self.ridged(x, y, size, params.frequency) * params.amplitude,
        }
    }

    /// Ridged fBm with inter-octave coherence and central falloff, before the
    /// outer amplitude is applied
    fn ridged(&self, x: f32, y: f32, size: f32, frequency: f32) -> f32 {
        let mut sum = 0.0;
        let mut freq = frequency;
        let mut amplitude = 0.5;
        let mut prev = 1.0;

        for _ in 0..OCTAVES {
            let sample = Self::eval(&self.simplex, x * freq, y * freq, size);
            let ridge = shape_ridge((1.0 - sample.abs()).max(0.0));

            sum += ridge * amplitude * prev;
            prev = ridge;

            freq *= RIDGE_LACUNARITY;
            amplitude *= RIDGE_GAIN;
        }

        sum * radial_falloff(x, y)
    }

    fn eval<N: NoiseFn<f64, 2>>(source: &N, x: f32, y: f32, size: f32) -> f32 {
        let scale = (size * BASE_FREQUENCY) as f64;
        source.get([x as f64 * scale, y as f64 * scale]) as f32
    }
}

impl std::fmt::Debug for NoiseSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseSynthesizer")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// Valleys are cube-smoothed toward 0, peaks sharpened toward 1
fn shape_ridge(ridge: f32) -> f32 {
    if ridge < 0.5 {
        4.0 * ridge * ridge * ridge
    } else {
        let t = 2.0 * ridge - 2.0;
        (ridge - 1.0) * t * t + 1.0
    }
}

/// Smoothstep of the distance to the grid center, 1 at the center and 0 at
/// the corners
fn radial_falloff(x: f32, y: f32) -> f32 {
    let max_distance = std::f32::consts::SQRT_2;
    let distance = (x * x + y * y).sqrt();
    let linear = (1.0 - distance / max_distance).clamp(0.0, 1.0);
    smoothstep(linear)
}

#[inline]
pub(crate) fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}
