use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{render, render_parallel, save, write, OutputFormat, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Render the Cornell box scene with Monte Carlo path tracing
#[derive(Parser, Debug)]
#[command(name = "lumen", version, about)]
struct Cli {
    /// Samples per sub-pixel cell (each pixel traces four times this many paths)
    samples: Option<u32>,

    /// Image width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Base seed for the random streams
    #[arg(long)]
    seed: Option<u64>,

    /// Bucket edge length in pixels
    #[arg(long)]
    bucket_size: Option<u32>,

    /// JSON render configuration; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output image path, or `-` for standard output
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,

    /// Output format (inferred from the output extension when omitted)
    #[arg(short, long, value_enum)]
    format: Option<CliFormat>,

    /// Render on the current thread with a single random stream
    #[arg(long)]
    serial: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliFormat {
    /// Plain-text PPM
    Ppm,
    /// PNG
    Png,
}

impl From<CliFormat> for OutputFormat {
    fn from(f: CliFormat) -> Self {
        match f {
            CliFormat::Ppm => OutputFormat::Ppm,
            CliFormat::Png => OutputFormat::Png,
        }
    }
}

impl Cli {
    fn writes_to_stdout(&self) -> bool {
        self.output == Path::new("-")
    }

    /// Start from the config file (or defaults) and apply flag overrides.
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(bucket_size) = self.bucket_size {
            config.bucket_size = bucket_size;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = cli.render_config()?;
    let format = cli
        .format
        .map(OutputFormat::from)
        .unwrap_or_else(|| OutputFormat::from_path(&cli.output));

    log::info!("Starting Lumen");
    let scene = Scene::cornell_box();
    let camera = config.camera();
    log::info!(
        "Scene has {} spheres, {}x{} @ {} samples",
        scene.spheres().len(),
        config.width,
        config.height,
        config.samples_per_pixel
    );

    let start = Instant::now();
    let image = if cli.serial {
        let mut rng = StdRng::seed_from_u64(config.seed);
        render(&camera, &scene, &config, &mut rng)
    } else {
        render_parallel(&camera, &scene, &config)
    };
    log::info!("Frame finished in {:?}", start.elapsed());

    let display = image.to_display();
    if cli.writes_to_stdout() {
        write(&display, BufWriter::new(io::stdout().lock()), format)
            .context("Failed to write image to stdout")?;
    } else {
        save(&display, &cli.output, format)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    }

    Ok(())
}
