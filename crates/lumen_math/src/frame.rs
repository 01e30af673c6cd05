//! Orthonormal shading frame built around a surface normal.

use crate::{UnitVector, Vec3};

/// Orthonormal basis `(u, v, w)` with `w` along a given unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Frame {
    /// Build a frame whose `w` axis is `normal`.
    ///
    /// The helper axis is world-up when the normal has a sizeable x
    /// component and world-x otherwise, so it is never parallel to `normal`.
    pub fn from_normal(normal: Vec3) -> Self {
        let w = normal;
        let helper = if w.x.abs() > 0.1 { Vec3::Y } else { Vec3::X };
        let u = helper.cross(w).unit();
        let v = w.cross(u);
        Self { u, v, w }
    }

    /// Transform local coordinates into world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.u * local.x + self.v * local.y + self.w * local.z
    }
}
