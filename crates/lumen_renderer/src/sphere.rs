//! Sphere primitive for ray tracing.

use crate::{Color, Material};
use lumen_math::{Interval, Ray, Vec3};

/// A sphere primitive with its light transport properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    radius: f64,
    center: Vec3,
    emission: Color,
    reflectance: Color,
    material: Material,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// - `emission`: radiance emitted by the surface (zero for non-lights)
    /// - `reflectance`: per-channel albedo, conventionally in [0, 1]
    pub fn new(
        radius: f64,
        center: Vec3,
        emission: Color,
        reflectance: Color,
        material: Material,
    ) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive, got {radius}");
        Self {
            radius,
            center,
            emission,
            reflectance,
            material,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn emission(&self) -> Color {
        self.emission
    }

    #[inline]
    pub fn reflectance(&self) -> Color {
        self.reflectance
    }

    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }

    /// Intersect a unit-direction ray with the sphere.
    ///
    /// Returns the smallest root strictly inside `ray_t`, or `None`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f64> {
        let op = self.center - ray.origin();
        let b = op.dot(ray.direction());
        let det = b * b - op.dot(op) + self.radius * self.radius;
        if det < 0.0 {
            return None;
        }

        let det = det.sqrt();

        // Find the nearest root in the acceptable range
        let near = b - det;
        if ray_t.surrounds(near) {
            return Some(near);
        }
        let far = b + det;
        if ray_t.surrounds(far) {
            return Some(far);
        }
        None
    }
}
