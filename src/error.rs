use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The homogeneous `w` of a mapped point was zero (or not finite), so the
    /// projective divide has no finite result.
    #[error("degenerate transform: point ({x}, {y}) maps to w = {w}")]
    DegenerateW { x: f64, y: f64, w: f64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "im-io")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
