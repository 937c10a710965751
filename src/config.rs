//! Run configuration.
//!
//! A [`VideoConfig`] is built once (from JSON, CLI flags, or code), validated, and then passed
//! by reference into every pipeline stage. Stages never mutate it.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::Fps;
use crate::foundation::error::{Img2VideoError, Img2VideoResult};

/// Container extension used for both the intermediate and the final artifact.
pub const CONTAINER_EXT: &str = "mp4";

/// Suffix appended to the base name of the intermediate (raw) artifact.
pub const INTERMEDIATE_SUFFIX: &str = "_tmp";

/// How images whose aspect ratio differs from the first image are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectPolicy {
    /// Resize every image to the size derived from the first one, distorting as needed.
    #[default]
    Stretch,
    /// Reject the run before any video is written if any image's aspect ratio differs.
    Strict,
}

/// Everything one slideshow run needs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    /// Directory scanned for source images.
    pub input_dir: PathBuf,
    /// Directory that receives the produced video(s). Created if missing.
    pub output_dir: PathBuf,
    /// Output base file name, without extension.
    pub name: String,
    /// Output frame rate.
    pub fps: Fps,
    /// Output width in pixels. Height is derived from the first image.
    pub width: u32,
    /// Display duration of each image, in seconds.
    pub interval_secs: f64,
    /// Extension filter for source images, with or without a leading dot.
    pub extension: String,
    /// Run the compatibility transcode after writing the raw container.
    pub transcode: bool,
    /// Mixed aspect ratio handling.
    pub aspect_policy: AspectPolicy,
    /// Background (RGBA8, straight alpha) that transparent pixels are flattened over.
    pub bg_rgba: [u8; 4],
    /// Overwrite existing output files.
    pub overwrite: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::from("."),
            name: "animation".to_string(),
            fps: Fps { num: 2, den: 1 },
            width: 480,
            interval_secs: 0.5,
            extension: "png".to_string(),
            transcode: true,
            aspect_policy: AspectPolicy::Stretch,
            bg_rgba: [0, 0, 0, 255],
            overwrite: true,
        }
    }
}

impl VideoConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Img2VideoResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Img2VideoResult<()> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(Img2VideoError::validation("input_dir must be set"));
        }
        if self.name.trim().is_empty() {
            return Err(Img2VideoError::validation("output name must be non-empty"));
        }
        if self.name.contains(['/', '\\']) {
            return Err(Img2VideoError::validation(format!(
                "output name '{}' must not contain path separators",
                self.name
            )));
        }
        if self.width == 0 {
            return Err(Img2VideoError::validation("width must be non-zero"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.interval_secs.is_finite() || self.interval_secs <= 0.0 {
            return Err(Img2VideoError::validation(format!(
                "interval must be a positive number of seconds, got {}",
                self.interval_secs
            )));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(Img2VideoError::validation("extension must be non-empty"));
        }
        Ok(())
    }

    /// How many consecutive frames each image occupies: `round(fps * interval)`.
    ///
    /// Zero is an error rather than a silently dropped image.
    pub fn frames_per_image(&self) -> Img2VideoResult<u64> {
        let repeat = self.fps.secs_to_frames_round(self.interval_secs);
        if repeat == 0 {
            return Err(Img2VideoError::DegenerateInterval {
                fps: self.fps.as_f64(),
                interval_secs: self.interval_secs,
            });
        }
        Ok(repeat)
    }

    /// `<output_dir>/<name>.mp4`
    pub fn final_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.{CONTAINER_EXT}", self.name))
    }

    /// `<output_dir>/<name>_tmp.mp4`
    pub fn intermediate_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}{INTERMEDIATE_SUFFIX}.{CONTAINER_EXT}", self.name))
    }

    /// Where the raw container is written: the intermediate path for two-stage runs, the final
    /// path otherwise.
    pub fn raw_path(&self) -> PathBuf {
        if self.transcode {
            self.intermediate_path()
        } else {
            self.final_path()
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
