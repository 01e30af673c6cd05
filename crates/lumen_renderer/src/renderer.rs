//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with a hard depth cap
//! - Russian roulette termination past a configurable depth
//! - Diffuse, mirror and glass transport
//! - 2x2 stratified, tent-filtered sub-pixel sampling

use crate::camera::sample_tent;
use crate::error::{RenderError, RenderResult};
use crate::material::{diffuse_direction, reflect, refract};
use crate::{gen_f64, Camera, Color, Material, Scene};
use lumen_math::{Ray, UnitVector};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// At or below this depth a glass hit traces both the reflected and the
/// refracted ray instead of picking one.
pub const DIELECTRIC_SPLIT_DEPTH: u32 = 2;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per sub-pixel cell; each pixel gets four times this many
    pub samples_per_pixel: u32,
    /// Paths deeper than this return black
    pub max_depth: u32,
    /// Russian roulette starts once depth exceeds this
    pub roulette_depth: u32,
    /// Edge length of the square buckets handed to worker threads
    pub bucket_size: u32,
    /// Base seed for the per-bucket random streams
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            samples_per_pixel: 16,
            max_depth: 20,
            roulette_depth: 5,
            bucket_size: crate::DEFAULT_BUCKET_SIZE,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set samples per sub-pixel cell.
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    /// Set the depth cap and the depth where Russian roulette begins.
    pub fn with_depth(mut self, max_depth: u32, roulette_depth: u32) -> Self {
        self.max_depth = max_depth;
        self.roulette_depth = roulette_depth;
        self
    }

    /// Set the bucket edge length.
    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Number of pixels in the frame, or `None` if it does not fit in `u32`.
    pub fn pixel_count(&self) -> Option<u32> {
        self.width.checked_mul(self.height)
    }

    /// Paths traced per pixel: four sub-pixel cells times the samples per cell.
    pub fn paths_per_pixel(&self) -> u64 {
        4 * u64::from(self.samples_per_pixel)
    }

    /// Check that the configuration describes a renderable frame.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "resolution must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        // Pixel indices are computed from u32 coordinates
        if self.pixel_count().is_none() {
            return Err(RenderError::InvalidConfig(format!(
                "resolution {}x{} has more than {} pixels",
                self.width,
                self.height,
                u32::MAX
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(RenderError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig(
                "bucket_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The Cornell box camera at this configuration's resolution.
    pub fn camera(&self) -> Camera {
        Camera::cornell_box(self.width, self.height)
    }
}

/// Estimate the radiance arriving along `ray`.
///
/// `depth` is the number of bounces already taken; camera rays start at 0.
/// The call stack never holds more than `config.max_depth + 1` frames.
pub fn radiance(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // Background is black
    let Some(hit) = scene.intersect(ray) else {
        return Color::ZERO;
    };

    let sphere = hit.sphere;
    let x = ray.at(hit.distance);
    let n = (x - sphere.center()).unit();
    let nl = if n.dot(ray.direction()) < 0.0 { n } else { -n };
    let emission = sphere.emission();
    let mut f = sphere.reflectance();

    let depth = depth + 1;
    if depth > config.max_depth {
        return Color::ZERO;
    }
    if depth > config.roulette_depth {
        let p = f.max_element();
        if gen_f64(rng) < p {
            f /= p;
        } else {
            return emission;
        }
    }

    match sphere.material() {
        Material::Diffuse => {
            let r1 = gen_f64(rng);
            let r2 = gen_f64(rng);
            let bounce = Ray::new(x, diffuse_direction(nl, r1, r2));
            emission + f * radiance(&bounce, scene, depth, config, rng)
        }
        Material::Specular => {
            let bounce = Ray::new(x, reflect(ray.direction(), n));
            emission + f * radiance(&bounce, scene, depth, config, rng)
        }
        Material::Dielectric => {
            let refl_ray = Ray::new(x, reflect(ray.direction(), n));
            let Some(refraction) = refract(ray.direction(), n, nl) else {
                // Total internal reflection
                return emission + f * radiance(&refl_ray, scene, depth, config, rng);
            };
            let refr_ray = Ray::new(x, refraction.direction);
            let re = refraction.reflectance;
            let tr = refraction.transmittance();

            let transported = if depth > DIELECTRIC_SPLIT_DEPTH {
                let p = 0.25 + 0.5 * re;
                if gen_f64(rng) < p {
                    radiance(&refl_ray, scene, depth, config, rng) * (re / p)
                } else {
                    radiance(&refr_ray, scene, depth, config, rng) * (tr / (1.0 - p))
                }
            } else {
                radiance(&refl_ray, scene, depth, config, rng) * re
                    + radiance(&refr_ray, scene, depth, config, rng) * tr
            };
            emission + f * transported
        }
    }
}

/// Render a single pixel with stratified multi-sampling.
///
/// `(x, y)` is in image space with `y = 0` the top row.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let film_y = camera.image_height - 1 - y;
    let mut pixel_color = Color::ZERO;

    for sub_y in 0..2 {
        for sub_x in 0..2 {
            for _ in 0..config.samples_per_pixel {
                let jitter = sample_tent(rng);
                let ray = camera.get_ray(x, film_y, sub_x, sub_y, jitter);
                pixel_color += radiance(&ray, scene, 0, config, rng);
            }
        }
    }

    // Average the samples
    pixel_color / config.paths_per_pixel() as f64
}

/// Linear radiance per pixel, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width as usize).saturating_mul(height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }
}

/// Render the entire scene to an image buffer.
///
/// Single-threaded and driven by one generator, so a seeded `rng` makes the
/// result fully reproducible.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        for x in 0..camera.image_width {
            let color = render_pixel(camera, scene, x, y, config, rng);
            image.set(x, y, color);
        }
    }

    image
}
