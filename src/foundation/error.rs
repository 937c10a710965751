use std::path::PathBuf;

/// Convenience result type used across img2video.
pub type Img2VideoResult<T> = Result<T, Img2VideoError>;

/// Top-level error taxonomy. Every pipeline stage surfaces its own variant so callers can tell
/// which precondition broke.
#[derive(thiserror::Error, Debug)]
pub enum Img2VideoError {
    /// Input path is missing or is not a directory.
    #[error("directory not found: '{}'", .0.display())]
    DirectoryNotFound(PathBuf),

    /// No regular file in the input directory matched the extension filter.
    #[error("no '{ext}' images found in '{}'", dir.display())]
    EmptyImageSet {
        /// Directory that was scanned.
        dir: PathBuf,
        /// Extension filter that was applied.
        ext: String,
    },

    /// A source image could not be read or decoded.
    #[error("image decode error: '{}': {reason}", path.display())]
    ImageDecode {
        /// Offending image.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// `round(fps * interval)` is zero, which would drop images from the output.
    #[error(
        "degenerate interval: {interval_secs}s at {fps} fps rounds to zero frames per image"
    )]
    DegenerateInterval {
        /// Configured frame rate.
        fps: f64,
        /// Configured per-image interval.
        interval_secs: f64,
    },

    /// Strict aspect policy found an image whose aspect ratio differs from the first image.
    #[error(
        "mixed aspect ratio: '{}' is {width}x{height}, expected aspect {expected:.4}",
        path.display()
    )]
    MixedAspectRatio {
        /// Offending image.
        path: PathBuf,
        /// Its native width.
        width: u32,
        /// Its native height.
        height: u32,
        /// Aspect ratio of the first image.
        expected: f64,
    },

    /// Invalid configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while opening, feeding, or finalizing a frame sink.
    #[error("video write error: {0}")]
    VideoWrite(String),

    /// The compatibility transcode did not produce its destination file.
    #[error("transcode error: {0}")]
    Transcode(String),

    /// Errors while reading back video metadata.
    #[error("probe error: {0}")]
    Probe(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Img2VideoError {
    /// Build an [`Img2VideoError::ImageDecode`] value.
    pub fn image_decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ImageDecode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`Img2VideoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`Img2VideoError::VideoWrite`] value.
    pub fn video_write(msg: impl Into<String>) -> Self {
        Self::VideoWrite(msg.into())
    }

    /// Build an [`Img2VideoError::Transcode`] value.
    pub fn transcode(msg: impl Into<String>) -> Self {
        Self::Transcode(msg.into())
    }

    /// Build an [`Img2VideoError::Probe`] value.
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
