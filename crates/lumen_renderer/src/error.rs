//! Errors surfaced by the renderer's outer layer.
//!
//! Numerical edge cases inside the estimator (missed rays, total internal
//! reflection, roulette termination) are ordinary branches and never show up
//! here. Only configuration and output problems do.

use thiserror::Error;

/// Errors that can occur while configuring a render or writing its output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config parsing error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
