//! Ray marching against a height field
//!
//! The march steps along the ray by the vertical gap between the current
//! point and the surface below it. This is not a true distance bound: on
//! steep slopes or grazing rays it can overshoot the first crossing or fail
//! to settle, in which case the probe reports no hit. A miss is an ordinary
//! outcome for cursor picking, not an error.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;
use crate::math::Ray;
use super::heightfield::HeightField;

/// Marching limits
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Step budget before giving up
    pub max_steps: u32,
    /// Vertical gap under which the ray counts as touching the surface
    pub epsilon: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_steps: 2000,
            epsilon: 0.001,
        }
    }
}

/// A successful probe
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeHit {
    /// World-space point on (or within epsilon of) the surface
    pub position: Vec3,
    /// Marching steps taken
    pub steps: u32,
}

/// Finds where rays meet a height field
#[derive(Clone, Copy, Debug, Default)]
pub struct TerrainProbe {
    config: ProbeConfig,
}

impl TerrainProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// March `ray` against `field`, returning the first point where the
    /// vertical gap drops below epsilon, or `None` once the step budget is
    /// spent.
    pub fn cast(&self, field: &HeightField, ray: &Ray) -> Option<ProbeHit> {
        let mut position = ray.origin;

        for step in 1..=self.config.max_steps {
            let gap = position.y - field.sample(position.x, position.z);
            position += ray.direction * gap;

            if !position.is_finite() {
                log::trace!("Probe diverged after {} steps", step);
                return None;
            }
            if gap < self.config.epsilon {
                return Some(ProbeHit { position, steps: step });
            }
        }

        log::trace!(
            "Probe from {:?} along {:?} missed after {} steps",
            ray.origin,
            ray.direction,
            self.config.max_steps
        );
        None
    }
}
