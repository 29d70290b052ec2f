//! Terrain aggregate: one height field, its mesh, and the editing tools

use crate::core::types::{Mat4, Result, Vec2, Vec3};
use crate::math::Ray;
use super::config::TerrainConfig;
use super::heightfield::{HeightField, HeightTextureSink};
use super::mesh::GridMesh;
use super::noise::NoiseParams;
use super::probe::{ProbeConfig, ProbeHit, TerrainProbe};
use super::sculptor::{self, Brush};

/// An editable terrain
///
/// Owns its height field exclusively. Sculpting and regeneration mark the GPU
/// copy stale; [`Terrain::upload`] pushes it once per batch of edits.
#[derive(Debug)]
pub struct Terrain {
    field: HeightField,
    mesh: GridMesh,
    probe: TerrainProbe,
    dirty: bool,
}

impl Terrain {
    /// Build a terrain from configuration
    pub fn new(config: &TerrainConfig) -> Result<Self> {
        config.validate()?;
        let field = HeightField::new(config.size, config.resolution, config.seed, config.noise)?;
        let mesh = GridMesh::build(config.size, config.resolution);

        log::info!(
            "Created terrain: size {}, resolution {}, seed {}, {} triangles",
            config.size,
            config.resolution,
            config.seed,
            mesh.triangle_count()
        );

        Ok(Self {
            field,
            mesh,
            probe: TerrainProbe::new(config.probe),
            dirty: true,
        })
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn mesh(&self) -> &GridMesh {
        &self.mesh
    }

    pub fn set_probe_config(&mut self, config: ProbeConfig) {
        self.probe = TerrainProbe::new(config);
    }

    /// Resynthesize all heights (see [`HeightField::generate`])
    pub fn regenerate(&mut self, params: NoiseParams, seed: Option<u32>) {
        self.field.generate(params, seed);
        self.dirty = true;
    }

    /// Change size and resolution, regenerating heights and rebuilding the
    /// mesh
    pub fn resize(&mut self, size: f32, resolution: usize) -> Result<()> {
        self.field.resize(size, resolution)?;
        if self.mesh.size != size || self.mesh.resolution != resolution {
            self.mesh = GridMesh::build(size, resolution);
        }
        self.dirty = true;
        Ok(())
    }

    /// Apply a brush at world `(center.x, center.y)` and return the number of
    /// cells changed
    pub fn sculpt(&mut self, center: Vec2, brush: &Brush) -> usize {
        let modified = sculptor::sculpt(&mut self.field, center, brush);
        if modified > 0 {
            self.dirty = true;
        }
        modified
    }

    /// Surface height at world `(x, z)`
    pub fn height_at_world(&self, x: f32, z: f32) -> f32 {
        self.field.sample(x, z)
    }

    /// Intersect a world-space ray with the surface
    pub fn pick(&self, ray: &Ray) -> Option<ProbeHit> {
        self.probe.cast(&self.field, ray)
    }

    /// Intersect the ray under a cursor at normalized device coordinate `ndc`
    pub fn pick_screen(&self, camera: Vec3, ndc: Vec2, projection: Mat4, view: Mat4) -> Option<ProbeHit> {
        self.pick(&Ray::from_ndc(camera, ndc, projection, view))
    }

    /// Whether heights changed since the last upload
    pub fn needs_upload(&self) -> bool {
        self.dirty
    }

    /// Push heights to the sink if they changed since the last upload.
    /// Returns whether an upload happened.
    pub fn upload(&mut self, sink: &mut impl HeightTextureSink) -> bool {
        if !self.dirty {
            return false;
        }
        self.field.upload(sink);
        self.dirty = false;
        true
    }

    /// Mesh triangle indices
    pub fn indices(&self) -> &[u32] {
        &self.mesh.indices
    }

    /// Copy heights and indices for an exporter running off the edit thread
    pub fn snapshot(&self) -> ExportSnapshot {
        ExportSnapshot {
            size: self.field.size(),
            resolution: self.field.resolution(),
            heights: self.field.heights().to_vec(),
            indices: self.mesh.indices.clone(),
        }
    }
}

/// Immutable copy of a terrain's geometry
///
/// Owns its data, so it can be moved to a worker thread while editing
/// continues on the live terrain.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportSnapshot {
    size: f32,
    resolution: usize,
    heights: Vec<f32>,
    indices: Vec<u32>,
}

impl ExportSnapshot {
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Height of cell `(x, z)`, or `0.0` outside the grid
    pub fn height(&self, x: i32, z: i32) -> f32 {
        let res = self.resolution;
        if x < 0 || z < 0 || x as usize >= res || z as usize >= res {
            return 0.0;
        }
        self.heights[z as usize * res + x as usize]
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// World position of mesh vertex `index` with its height applied
    ///
    /// Mesh vertex `i * resolution + j` lies over grid cell `(x = i, z = j)`.
    pub fn vertex(&self, index: u32) -> Vec3 {
        let res = self.resolution;
        let i = index as usize / res;
        let j = index as usize % res;
        let last = (res - 1) as f32;
        Vec3::new(
            (i as f32 / last * 2.0 - 1.0) * self.size,
            self.height(i as i32, j as i32),
            (j as f32 / last * 2.0 - 1.0) * self.size,
        )
    }
}
