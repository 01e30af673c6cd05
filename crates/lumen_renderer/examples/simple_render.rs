//! Simple path tracer example.
//!
//! Renders a small Cornell box on a single thread and saves it as PPM.

use lumen_renderer::{render, save_ppm, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    println!("Lumen Path Tracer - Simple Example");
    println!("==================================");

    let scene = Scene::cornell_box();
    let config = RenderConfig::default()
        .with_resolution(160, 120)
        .with_samples(8)
        .with_seed(1);
    let camera = config.camera();

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width,
        camera.image_height,
        config.paths_per_pixel()
    );

    let start = std::time::Instant::now();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let image = render(&camera, &scene, &config, &mut rng);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&image.to_display(), filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}
