//! Brush sculpting of a height field
//!
//! A brush adds `strength * intensity` to every grid cell within `radius` of
//! its world-space center. Intensity comes from a falloff kernel evaluated on
//! the cell's distance: full strength inside `inner_radius`, easing to zero at
//! `radius`.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use super::heightfield::HeightField;
use super::noise::smoothstep;

/// Default ratio of the full-strength core to the brush radius
pub const DEFAULT_INNER_RADIUS_RATIO: f32 = 1.0 / 3.0;

/// Falloff profile of a brush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    /// Hard disk of radius `inner_radius`
    #[default]
    Step,
    /// Straight ramp from the core to the rim
    LinearFalloff,
    /// Smooth ease-in/out ramp
    LinearSmoothstep,
    /// Sharp near the core, fast falloff
    Polynomial,
    /// Gradual, long tail
    Logarithmic,
}

impl Kernel {
    pub const ALL: [Kernel; 5] = [
        Kernel::Step,
        Kernel::LinearFalloff,
        Kernel::LinearSmoothstep,
        Kernel::Polynomial,
        Kernel::Logarithmic,
    ];

    /// Map a UI combo-box index to a kernel
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Kernel::Step => "Step",
            Kernel::LinearFalloff => "Linear Falloff",
            Kernel::LinearSmoothstep => "Linear Smoothstep",
            Kernel::Polynomial => "Polynomial",
            Kernel::Logarithmic => "Logarithmic",
        }
    }

    /// Edit intensity in `[0, 1]` at `distance` from the brush center
    pub fn intensity(self, distance: f32, radius: f32, inner_radius: f32) -> f32 {
        if self == Kernel::Step || radius <= inner_radius {
            return if distance <= inner_radius { 1.0 } else { 0.0 };
        }

        let linear = (1.0 - (distance - inner_radius) / (radius - inner_radius)).clamp(0.0, 1.0);
        match self {
            Kernel::Step | Kernel::LinearFalloff => linear,
            Kernel::LinearSmoothstep => smoothstep(linear),
            Kernel::Polynomial => linear.powf(2.5),
            Kernel::Logarithmic => (1.0 + linear.powf(0.75) * 9.0).ln() / 10.0_f32.ln(),
        }
    }
}

/// Brush settings supplied by the editor for one sculpt call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brush {
    pub kernel: Kernel,
    /// Height added at full intensity; negative lowers the terrain
    pub strength: f32,
    /// Outer radius in world units
    pub radius: f32,
    /// Full-strength core as a fraction of `radius`
    pub inner_radius_ratio: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            kernel: Kernel::Step,
            strength: 0.5,
            radius: 20.0,
            inner_radius_ratio: DEFAULT_INNER_RADIUS_RATIO,
        }
    }
}

impl Brush {
    pub fn new(kernel: Kernel, strength: f32, radius: f32) -> Self {
        Self {
            kernel,
            strength,
            radius,
            inner_radius_ratio: DEFAULT_INNER_RADIUS_RATIO,
        }
    }

    /// Radius of the full-strength core
    ///
    /// A non-finite ratio falls back to [`DEFAULT_INNER_RADIUS_RATIO`].
    pub fn inner_radius(&self) -> f32 {
        let ratio = if self.inner_radius_ratio.is_finite() {
            self.inner_radius_ratio.clamp(0.0, 1.0)
        } else {
            DEFAULT_INNER_RADIUS_RATIO
        };
        self.radius * ratio
    }
}

/// Apply `brush` centered at world `(center.x, center.y)` (the y component is
/// the world z axis) and return the number of cells changed.
///
/// Cells off the grid are skipped. A non-positive radius or a non-finite
/// strength changes nothing.
/// Bounds stay exact: they widen as cells are written, and the field is
/// rescanned once at the end only if an edit moved a bounding cell inward.
pub fn sculpt(field: &mut HeightField, center: Vec2, brush: &Brush) -> usize {
    let radius = brush.radius;
    if !(radius > 0.0 && radius.is_finite()) || !center.is_finite() || !brush.strength.is_finite() {
        return 0;
    }
    let inner_radius = brush.inner_radius();

    // Square box of cells around the center, clipped to the grid
    let last = field.resolution() as i64 - 1;
    let radius_cells = radius / field.cell_spacing();
    let gx = field.world_to_grid(center.x);
    let gz = field.world_to_grid(center.y);
    let start_x = ((gx - radius_cells).floor() as i64).max(0);
    let end_x = ((gx + radius_cells).ceil() as i64).min(last);
    let start_z = ((gz - radius_cells).floor() as i64).max(0);
    let end_z = ((gz + radius_cells).ceil() as i64).min(last);

    let mut modified = 0;
    let mut loosened = false;
    for z in start_z..=end_z {
        let world_z = field.grid_to_world(z as f32);
        for x in start_x..=end_x {
            let world_x = field.grid_to_world(x as f32);
            let distance = Vec2::new(world_x, world_z).distance(center);
            if distance > radius {
                continue;
            }

            let delta = brush.strength * brush.kernel.intensity(distance, radius, inner_radius);
            if delta == 0.0 {
                continue;
            }

            let Some(index) = field.index(x as i32, z as i32) else {
                continue;
            };
            loosened |= field.store(index, field.get(index) + delta);
            modified += 1;
        }
    }

    if loosened {
        field.recompute_bounds();
    }

    log::trace!(
        "Sculpted {} cells with {} brush at ({:.2}, {:.2}), radius {:.2}, strength {:.2}",
        modified,
        brush.kernel.name(),
        center.x,
        center.y,
        radius,
        brush.strength,
    );
    modified
}
