//! The fixed set of spheres a frame is rendered from.

use crate::{Color, Material, Sphere};
use lumen_math::{Interval, Ray, Vec3};

/// Rays must travel at least this far before they can hit anything, so a
/// bounce does not re-hit the surface it left from.
pub const RAY_EPSILON: f64 = 1e-4;

/// Nearest intersection of a ray with the scene.
///
/// Borrows the sphere from the scene; it never outlives the scene.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Distance along the ray to the hit point
    pub distance: f64,
    /// The sphere that was hit
    pub sphere: &'a Sphere,
}

/// An immutable, ordered collection of spheres.
///
/// Order only matters for tie-breaking: when two spheres are hit at the same
/// distance the earlier one wins.
#[derive(Debug, Clone)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Create a scene from an ordered list of spheres.
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// The closed box with two walls, a mirror ball, a glass ball and a
    /// spherical ceiling light.
    pub fn cornell_box() -> Self {
        let black = Color::ZERO;
        let red = Color::new(0.75, 0.25, 0.25);
        let blue = Color::new(0.25, 0.25, 0.75);
        let grey = Color::new(0.75, 0.75, 0.75);
        let white = Color::splat(0.999);

        Self::new(vec![
            // Left wall
            Sphere::new(1e5, Vec3::new(1e5 + 1.0, 40.8, 81.6), black, red, Material::Diffuse),
            // Right wall
            Sphere::new(1e5, Vec3::new(-1e5 + 99.0, 40.8, 81.6), black, blue, Material::Diffuse),
            // Back wall
            Sphere::new(1e5, Vec3::new(50.0, 40.8, 1e5), black, grey, Material::Diffuse),
            // Front wall, behind the camera
            Sphere::new(1e5, Vec3::new(50.0, 40.8, -1e5 + 170.0), black, black, Material::Diffuse),
            // Floor
            Sphere::new(1e5, Vec3::new(50.0, 1e5, 81.6), black, grey, Material::Diffuse),
            // Ceiling
            Sphere::new(1e5, Vec3::new(50.0, -1e5 + 81.6, 81.6), black, grey, Material::Diffuse),
            Sphere::new(16.5, Vec3::new(27.0, 16.5, 47.0), black, white, Material::Specular),
            Sphere::new(16.5, Vec3::new(73.0, 16.5, 78.0), black, white, Material::Dielectric),
            // Light
            Sphere::new(600.0, Vec3::new(50.0, 681.33, 81.6), Color::splat(12.0), black, Material::Diffuse),
        ])
    }

    /// Find the nearest sphere hit by `ray`, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        let mut closest: Option<Hit<'_>> = None;
        let mut ray_t = Interval::new(RAY_EPSILON, f64::INFINITY);

        for sphere in &self.spheres {
            if let Some(distance) = sphere.intersect(ray, ray_t) {
                // Strict upper bound keeps the first of two equidistant hits
                ray_t = ray_t.with_max(distance);
                closest = Some(Hit { distance, sphere });
            }
        }

        closest
    }

    /// The spheres in scene order.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }
}
