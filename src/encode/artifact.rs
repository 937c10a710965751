use std::path::PathBuf;

use crate::foundation::core::Fps;

/// A video file the pipeline produced, described by what was written to it.
///
/// Use [`crate::probe::inspect`] to read back what the encoder actually stored.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VideoArtifact {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub frame_count: u64,
    pub duration_secs: f64,
}

impl VideoArtifact {
    /// Describe `frame_count` frames of `width`x`height` at `fps`; duration is derived.
    pub fn new(
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        fps: Fps,
        frame_count: u64,
    ) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            fps,
            frame_count,
            duration_secs: fps.frames_to_secs(frame_count),
        }
    }
}
