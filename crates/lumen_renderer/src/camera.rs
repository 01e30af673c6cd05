//! Pinhole camera for ray generation.

use crate::gen_f64;
use lumen_math::{Ray, UnitVector, Vec2, Vec3};
use rand::RngCore;

/// Half-extent of the film plane along each basis vector at unit distance.
pub const FOV_SCALE: f64 = 0.5135;

/// Distance the ray origin is pushed forward along the sample direction,
/// which places it inside the closed box in front of the camera.
pub const FILM_DISTANCE: f64 = 130.0;

/// Fixed pinhole camera.
///
/// `cx` and `cy` span the film plane and define the field of view. `direction`
/// is the offset from the origin to the film center and is not necessarily
/// unit length; sample rays are normalized. Film coordinates have their
/// origin at the bottom-left, so callers that write images top-down flip
/// the row.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    origin: Vec3,
    direction: Vec3,
    cx: Vec3,
    cy: Vec3,
}

impl Camera {
    /// Create a camera at `origin` looking along `direction`.
    pub fn new(origin: Vec3, direction: Vec3, image_width: u32, image_height: u32) -> Self {
        let cx = Vec3::new(
            image_width as f64 * FOV_SCALE / image_height as f64,
            0.0,
            0.0,
        );
        let cy = cx.cross(direction).unit() * FOV_SCALE;

        Self {
            image_width,
            image_height,
            origin,
            direction,
            cx,
            cy,
        }
    }

    /// The camera looking into the open side of [`Scene::cornell_box`].
    ///
    /// [`Scene::cornell_box`]: crate::Scene::cornell_box
    pub fn cornell_box(image_width: u32, image_height: u32) -> Self {
        Self::new(
            Vec3::new(50.0, 52.0, 295.6),
            Vec3::new(0.0, -0.042612, -1.0),
            image_width,
            image_height,
        )
    }

    /// Camera position.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Viewing direction as given, unnormalized.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Generate the ray through one cell of the 2x2 sub-pixel grid.
    ///
    /// `(film_x, film_y)` is the pixel with `film_y = 0` at the bottom,
    /// `(sub_x, sub_y)` the cell in `{0, 1}` and `jitter` the tent-filtered
    /// offset from [`sample_tent`].
    pub fn get_ray(&self, film_x: u32, film_y: u32, sub_x: u32, sub_y: u32, jitter: Vec2) -> Ray {
        let fx = ((sub_x as f64 + 0.5 + jitter.x) / 2.0 + film_x as f64) / self.image_width as f64
            - 0.5;
        let fy = ((sub_y as f64 + 0.5 + jitter.y) / 2.0 + film_y as f64) / self.image_height as f64
            - 0.5;

        let d = self.cx * fx + self.cy * fy + self.direction;
        Ray::new(self.origin + d * FILM_DISTANCE, d.unit())
    }
}

/// Tent filter mapping `u` in [0, 2) to an offset in [-1, 1).
///
/// Offsets concentrate near zero with linear falloff towards the edges.
#[inline]
pub fn tent(u: f64) -> f64 {
    if u < 1.0 {
        u.sqrt() - 1.0
    } else {
        1.0 - (2.0 - u).sqrt()
    }
}

/// Draw a tent-filtered sub-pixel jitter.
pub fn sample_tent(rng: &mut dyn RngCore) -> Vec2 {
    let dx = tent(2.0 * gen_f64(rng));
    let dy = tent(2.0 * gen_f64(rng));
    Vec2::new(dx, dy)
}
