//! Lumen Renderer - CPU Path Tracing
//!
//! An unbiased (up to the depth cap) Monte Carlo path tracer for a fixed
//! scene of spheres. Diffuse, mirror and glass surfaces, Russian roulette
//! past a configurable depth, and bucketed parallel rendering.

mod bucket;
mod camera;
mod error;
mod material;
mod output;
mod renderer;
mod scene;
mod sphere;
mod tonemap;

pub use bucket::{
    bucket_stream, generate_buckets, render_bucket, render_parallel, render_parallel_with, Bucket,
    BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use camera::{sample_tent, tent, Camera, FILM_DISTANCE, FOV_SCALE};
pub use error::{RenderError, RenderResult};
pub use material::{
    diffuse_direction, reflect, refract, schlick, Color, Material, Refraction, AIR_IOR, GLASS_IOR,
};
pub use output::{save, save_png, save_ppm, write, write_png, write_ppm, OutputFormat};
pub use renderer::{
    radiance, render, render_pixel, ImageBuffer, RenderConfig, DIELECTRIC_SPLIT_DEPTH,
};
pub use scene::{Hit, Scene, RAY_EPSILON};
pub use sphere::Sphere;
pub use tonemap::{color_to_rgb, tone_map, DisplayImage, DISPLAY_GAMMA};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Draw a uniform sample in [0, 1).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}
