//! Ray type and screen-space unprojection

use crate::core::types::{Mat4, Vec2, Vec3, Vec4};

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Build a world-space ray through a normalized device coordinate.
    ///
    /// The NDC point is placed on the near plane, unprojected into view space,
    /// forced to point down the view axis, and rotated into world space by the
    /// inverse view matrix. `origin` is usually the camera position.
    pub fn from_ndc(origin: Vec3, ndc: Vec2, projection: Mat4, view: Mat4) -> Self {
        let clip = Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let mut eye = projection.inverse() * clip;
        eye.z = -1.0;
        eye.w = 0.0;

        let world = view.inverse() * eye;
        Self::new(origin, world.truncate().normalize())
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
