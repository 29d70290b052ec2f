//! Dense height grid with noise generation, bounds tracking and sampling
//!
//! Grid cell `(x, z)` lives at `z * resolution + x` and maps to world space
//! through `world = (index / (resolution - 1) * 2 - 1) * size`, so the grid
//! spans `[-size, size]` on both horizontal axes with samples on the edges.

use std::time::Instant;

use crate::core::types::{Result, Vec3};
use crate::core::Error;
use crate::math::Aabb;
use super::noise::{NoiseParams, NoiseSynthesizer};

/// Largest accepted grid resolution
///
/// 8192² heights is 256 MiB, and every vertex index stays well within `u32`.
pub const MAX_RESOLUTION: usize = 8192;

/// Receiver of the full height buffer, typically a GPU texture
///
/// Heights are handed over as a single-channel 32-bit float image of
/// `width × height` texels, row-major by `z`.
pub trait HeightTextureSink {
    fn write_r32f(&mut self, width: u32, height: u32, texels: &[u8]);
}

/// Height grid owned by a terrain
pub struct HeightField {
    size: f32,
    resolution: usize,
    heights: Vec<f32>,
    params: NoiseParams,
    synth: NoiseSynthesizer,
    min_height: f32,
    max_height: f32,
}

impl HeightField {
    /// Create and generate a height field
    ///
    /// `size` is the half-width in world units; `resolution` is the number of
    /// samples per axis.
    pub fn new(size: f32, resolution: usize, seed: u32, params: NoiseParams) -> Result<Self> {
        validate_dimensions(size, resolution)?;

        let mut field = Self {
            size,
            resolution,
            heights: vec![0.0; resolution * resolution],
            params,
            synth: NoiseSynthesizer::new(seed),
            min_height: 0.0,
            max_height: 0.0,
        };
        field.generate(params, None);
        Ok(field)
    }

    /// Resynthesize every sample
    ///
    /// `Some(seed)` re-seeds the noise first; `None` keeps the current seed so
    /// amplitude or frequency can be re-rolled over the same terrain family.
    /// Bounds are rebuilt from scratch.
    pub fn generate(&mut self, params: NoiseParams, seed: Option<u32>) {
        let start = Instant::now();

        if let Some(seed) = seed {
            self.synth.reseed(seed);
        }
        self.params = params;
        self.min_height = f32::INFINITY;
        self.max_height = f32::NEG_INFINITY;

        let res = self.resolution;
        let last = (res - 1) as f32;
        for z in 0..res {
            let v = z as f32 / last * 2.0 - 1.0;
            for x in 0..res {
                let u = x as f32 / last * 2.0 - 1.0;
                let h = self.synth.sample(u, v, self.size, &self.params);
                self.heights[z * res + x] = h;
                self.min_height = self.min_height.min(h);
                self.max_height = self.max_height.max(h);
            }
        }

        log::debug!(
            "Generated {}x{} {} height field (seed {}) in {:.1}ms, range [{:.2}, {:.2}]",
            res,
            res,
            self.params.noise_type.name(),
            self.synth.seed(),
            start.elapsed().as_secs_f32() * 1000.0,
            self.min_height,
            self.max_height,
        );
    }

    /// Change world size and grid resolution, then regenerate with the
    /// current seed and parameters
    pub fn resize(&mut self, size: f32, resolution: usize) -> Result<()> {
        validate_dimensions(size, resolution)?;

        log::info!(
            "Resizing height field: size {} -> {}, resolution {} -> {}",
            self.size, size, self.resolution, resolution
        );
        self.size = size;
        if resolution != self.resolution {
            self.resolution = resolution;
            self.heights = vec![0.0; resolution * resolution];
        }
        self.generate(self.params, None);
        Ok(())
    }

    /// Half-width in world units
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Samples per axis
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn seed(&self) -> u32 {
        self.synth.seed()
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Raw row-major heights
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// World distance between neighbouring samples
    pub fn cell_spacing(&self) -> f32 {
        2.0 * self.size / (self.resolution - 1) as f32
    }

    /// World-space box covering the terrain and its current height range
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            Vec3::new(-self.size, self.min_height, -self.size),
            Vec3::new(self.size, self.max_height, self.size),
        )
    }

    /// Continuous grid coordinate of a world coordinate
    pub fn world_to_grid(&self, world: f32) -> f32 {
        (world / self.size + 1.0) * 0.5 * (self.resolution - 1) as f32
    }

    /// World coordinate of a (possibly fractional) grid coordinate
    pub fn grid_to_world(&self, grid: f32) -> f32 {
        (grid / (self.resolution - 1) as f32 * 2.0 - 1.0) * self.size
    }

    /// Height of cell `(x, z)`, or `0.0` outside the grid
    pub fn height(&self, x: i32, z: i32) -> f32 {
        self.index(x, z).map_or(0.0, |i| self.heights[i])
    }

    /// Overwrite cell `(x, z)`; writes outside the grid or of non-finite
    /// heights are ignored
    pub fn set_height(&mut self, x: i32, z: i32, height: f32) {
        if !height.is_finite() {
            return;
        }
        if let Some(i) = self.index(x, z) {
            if self.store(i, height) {
                self.recompute_bounds();
            }
        }
    }

    /// Height of the surface at world `(x, z)`
    ///
    /// Bilinearly interpolates the four surrounding samples, matching a
    /// linearly filtered height texture. Points off the terrain read `0.0`.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let gx = self.world_to_grid(x);
        let gz = self.world_to_grid(z);
        let last = (self.resolution - 1) as f32;
        if !(gx >= 0.0 && gx <= last && gz >= 0.0 && gz <= last) {
            return 0.0;
        }

        let res = self.resolution;
        let x0 = (gx.floor() as usize).min(res - 2);
        let z0 = (gz.floor() as usize).min(res - 2);
        let tx = gx - x0 as f32;
        let tz = gz - z0 as f32;

        let row0 = z0 * res;
        let row1 = row0 + res;
        let h00 = self.heights[row0 + x0];
        let h10 = self.heights[row0 + x0 + 1];
        let h01 = self.heights[row1 + x0];
        let h11 = self.heights[row1 + x0 + 1];

        let near = h00 + (h10 - h00) * tx;
        let far = h01 + (h11 - h01) * tx;
        near + (far - near) * tz
    }

    /// Rebuild `min_height`/`max_height` by scanning every sample
    pub fn recompute_bounds(&mut self) {
        let (min, max) = self.heights.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(min, max), &h| (min.min(h), max.max(h)),
        );
        self.min_height = min;
        self.max_height = max;
    }

    /// Push the whole buffer to the texture sink
    pub fn upload(&self, sink: &mut impl HeightTextureSink) {
        let res = self.resolution as u32;
        sink.write_r32f(res, res, bytemuck::cast_slice(&self.heights));
    }

    /// Flat index of `(x, z)` if it lies on the grid
    pub(crate) fn index(&self, x: i32, z: i32) -> Option<usize> {
        let res = self.resolution;
        if x < 0 || z < 0 || x as usize >= res || z as usize >= res {
            return None;
        }
        Some(z as usize * res + x as usize)
    }

    pub(crate) fn get(&self, index: usize) -> f32 {
        self.heights[index]
    }

    /// Write one sample and widen the bounds to cover it.
    ///
    /// Returns `true` when the overwritten value held a bound and moved
    /// inward, meaning the bounds may now be loose and need a rescan.
    pub(crate) fn store(&mut self, index: usize, height: f32) -> bool {
        let old = std::mem::replace(&mut self.heights[index], height);
        let loosened = (old == self.min_height && height > old)
            || (old == self.max_height && height < old);

        self.min_height = self.min_height.min(height);
        self.max_height = self.max_height.max(height);
        loosened
    }
}

impl std::fmt::Debug for HeightField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightField")
            .field("size", &self.size)
            .field("resolution", &self.resolution)
            .field("params", &self.params)
            .field("seed", &self.synth.seed())
            .field("min_height", &self.min_height)
            .field("max_height", &self.max_height)
            .finish_non_exhaustive()
    }
}

fn validate_dimensions(size: f32, resolution: usize) -> Result<()> {
    if !(size.is_finite() && size > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "terrain size must be finite and positive, got {}", size
        )));
    }
    if !(2..=MAX_RESOLUTION).contains(&resolution) {
        return Err(Error::InvalidParameter(format!(
            "resolution must be in 2..={}, got {}", MAX_RESOLUTION, resolution
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::noise::NoiseType;

    fn flat(size: f32, resolution: usize) -> HeightField {
        let params = NoiseParams { amplitude: 0.0, ..Default::default() };
        HeightField::new(size, resolution, 1, params).unwrap()
    }

    fn scan(field: &HeightField) -> (f32, f32) {
        field.heights().iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(min, max), &h| (min.min(h), max.max(h)),
        )
    }

    #[test]
    fn test_new_allocates_full_grid() {
        let field = HeightField::new(64.0, 33, 42, NoiseParams::default()).unwrap();
        assert_eq!(field.heights().len(), 33 * 33);
        assert_eq!(field.resolution(), 33);
        assert_eq!(field.size(), 64.0);
        assert_eq!(field.seed(), 42);
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        let params = NoiseParams::default();
        assert!(matches!(HeightField::new(0.0, 16, 1, params), Err(Error::InvalidParameter(_))));
        assert!(matches!(HeightField::new(-4.0, 16, 1, params), Err(Error::InvalidParameter(_))));
        assert!(matches!(HeightField::new(f32::NAN, 16, 1, params), Err(Error::InvalidParameter(_))));
        assert!(matches!(HeightField::new(10.0, 1, 1, params), Err(Error::InvalidParameter(_))));
        assert!(matches!(HeightField::new(10.0, 0, 1, params), Err(Error::InvalidParameter(_))));
        assert!(matches!(
            HeightField::new(10.0, MAX_RESOLUTION + 1, 1, params),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_generation_is_deterministic() {
        for noise_type in [NoiseType::Fractal, NoiseType::Ridged] {
            let params = NoiseParams { noise_type, ..Default::default() };
            let a = HeightField::new(128.0, 65, 42, params).unwrap();
            let b = HeightField::new(128.0, 65, 42, params).unwrap();
            assert_eq!(a.heights(), b.heights());
            assert_eq!(a.min_height(), b.min_height());
            assert_eq!(a.max_height(), b.max_height());
        }
    }

    #[test]
    fn test_generation_bounds_are_exact() {
        for noise_type in [NoiseType::Fractal, NoiseType::Ridged] {
            let params = NoiseParams { noise_type, ..Default::default() };
            let field = HeightField::new(128.0, 65, 7, params).unwrap();
            assert_eq!(scan(&field), (field.min_height(), field.max_height()));
            assert!(field.max_height() > field.min_height());
        }
    }

    #[test]
    fn test_regenerate_keeps_seed_when_not_reseeded() {
        let mut field = HeightField::new(128.0, 33, 5, NoiseParams::default()).unwrap();
        let before = field.heights().to_vec();

        let louder = NoiseParams { amplitude: 160.0, ..Default::default() };
        field.generate(louder, None);
        assert_eq!(field.seed(), 5);
        for (a, b) in before.iter().zip(field.heights()) {
            assert!((a * 2.0 - b).abs() < 1e-3);
        }

        field.generate(NoiseParams::default(), None);
        assert_eq!(field.heights(), &before[..]);
    }

    #[test]
    fn test_regenerate_with_new_seed() {
        let mut field = HeightField::new(128.0, 33, 5, NoiseParams::default()).unwrap();
        let fresh = HeightField::new(128.0, 33, 6, NoiseParams::default()).unwrap();
        field.generate(NoiseParams::default(), Some(6));
        assert_eq!(field.seed(), 6);
        assert_eq!(field.heights(), fresh.heights());
    }

    #[test]
    fn test_regenerate_resets_bounds() {
        let mut field = HeightField::new(128.0, 33, 5, NoiseParams::default()).unwrap();
        field.set_height(3, 3, 10_000.0);
        assert_eq!(field.max_height(), 10_000.0);

        field.generate(NoiseParams::default(), None);
        assert!(field.max_height() < 10_000.0);
        assert_eq!(scan(&field), (field.min_height(), field.max_height()));
    }

    #[test]
    fn test_height_out_of_range_reads_zero() {
        let field = HeightField::new(32.0, 17, 3, NoiseParams::default()).unwrap();
        assert_eq!(field.height(-1, 0), 0.0);
        assert_eq!(field.height(0, -1), 0.0);
        assert_eq!(field.height(17, 0), 0.0);
        assert_eq!(field.height(0, 17), 0.0);
        assert_eq!(field.height(2, 5), field.heights()[5 * 17 + 2]);
    }

    #[test]
    fn test_set_height_out_of_range_is_ignored() {
        let mut field = flat(32.0, 17);
        field.set_height(-1, 3, 99.0);
        field.set_height(3, 17, 99.0);
        assert!(field.heights().iter().all(|&h| h == 0.0));
        assert_eq!(field.max_height(), 0.0);
    }

    #[test]
    fn test_set_height_non_finite_is_ignored() {
        let mut field = flat(32.0, 17);
        field.set_height(2, 2, 4.0);
        field.set_height(2, 2, f32::NAN);
        field.set_height(3, 3, f32::INFINITY);
        assert_eq!(field.height(2, 2), 4.0);
        assert_eq!(field.height(3, 3), 0.0);
        assert_eq!((field.min_height(), field.max_height()), (0.0, 4.0));
    }

    #[test]
    fn test_set_height_keeps_bounds_exact() {
        let mut field = flat(32.0, 17);
        field.set_height(4, 4, 12.0);
        field.set_height(5, 5, -3.0);
        assert_eq!((field.min_height(), field.max_height()), (-3.0, 12.0));

        // Pull the only extremes back to the plane
        field.set_height(4, 4, 1.0);
        assert_eq!(field.max_height(), 1.0);
        field.set_height(5, 5, 0.0);
        assert_eq!(field.min_height(), 0.0);
        assert_eq!(scan(&field), (field.min_height(), field.max_height()));
    }

    #[test]
    fn test_grid_world_mapping() {
        let field = flat(100.0, 11);
        assert_eq!(field.grid_to_world(0.0), -100.0);
        assert_eq!(field.grid_to_world(10.0), 100.0);
        assert_eq!(field.grid_to_world(5.0), 0.0);
        assert_eq!(field.world_to_grid(-100.0), 0.0);
        assert_eq!(field.world_to_grid(100.0), 10.0);
        assert_eq!(field.cell_spacing(), 20.0);
        for i in 0..11 {
            let g = field.world_to_grid(field.grid_to_world(i as f32));
            assert!((g - i as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sample_hits_grid_values() {
        let field = HeightField::new(100.0, 11, 9, NoiseParams::default()).unwrap();
        for (x, z) in [(0, 0), (3, 7), (10, 10), (10, 0)] {
            let wx = field.grid_to_world(x as f32);
            let wz = field.grid_to_world(z as f32);
            assert!((field.sample(wx, wz) - field.height(x, z)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_sample_interpolates_between_cells() {
        let mut field = flat(100.0, 11);
        field.set_height(5, 5, 10.0);
        // Halfway between cell (5,5) and (6,5)
        let wx = field.grid_to_world(5.5);
        let wz = field.grid_to_world(5.0);
        assert!((field.sample(wx, wz) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_sample_off_terrain_reads_zero() {
        let mut field = flat(10.0, 5);
        field.set_height(4, 4, 7.0);
        assert_eq!(field.sample(10.5, 0.0), 0.0);
        assert_eq!(field.sample(0.0, -11.0), 0.0);
        assert_eq!(field.sample(f32::NAN, 0.0), 0.0);
        assert_eq!(field.sample(10.0, 10.0), 7.0);
    }

    #[test]
    fn test_resize_reallocates_and_regenerates() {
        let mut field = HeightField::new(64.0, 17, 11, NoiseParams::default()).unwrap();
        field.resize(128.0, 33).unwrap();
        assert_eq!(field.heights().len(), 33 * 33);
        assert_eq!(field.seed(), 11);

        let fresh = HeightField::new(128.0, 33, 11, NoiseParams::default()).unwrap();
        assert_eq!(field.heights(), fresh.heights());
        assert!(field.resize(128.0, 1).is_err());
        assert_eq!(field.resolution(), 33);
    }

    #[test]
    fn test_bounds_box() {
        let field = HeightField::new(50.0, 17, 2, NoiseParams::default()).unwrap();
        let bounds = field.bounds();
        assert_eq!(bounds.min, Vec3::new(-50.0, field.min_height(), -50.0));
        assert_eq!(bounds.max, Vec3::new(50.0, field.max_height(), 50.0));
        assert_eq!(bounds.size().x, 100.0);
        assert_eq!(bounds.center().x, 0.0);
    }

    #[derive(Default)]
    struct RecordingSink {
        width: u32,
        height: u32,
        texels: Vec<u8>,
    }

    impl HeightTextureSink for RecordingSink {
        fn write_r32f(&mut self, width: u32, height: u32, texels: &[u8]) {
            self.width = width;
            self.height = height;
            self.texels = texels.to_vec();
        }
    }

    #[test]
    fn test_upload_sends_full_buffer() {
        let field = HeightField::new(16.0, 9, 4, NoiseParams::default()).unwrap();
        let mut sink = RecordingSink::default();
        field.upload(&mut sink);

        assert_eq!((sink.width, sink.height), (9, 9));
        assert_eq!(sink.texels.len(), 9 * 9 * 4);
        let first = f32::from_ne_bytes(sink.texels[0..4].try_into().unwrap());
        assert_eq!(first, field.height(0, 0));
    }
}
