use std::path::Path;

use anyhow::Context as _;

use crate::assets::normalize::{self, DecodedImage};
use crate::assets::resolve::OrderedImageSet;
use crate::config::{AspectPolicy, VideoConfig};
use crate::encode::artifact::VideoArtifact;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{Img2VideoError, Img2VideoResult};

/// What [`assemble`] pushed into its sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assembly {
    /// Output frame size, derived from the first image.
    pub canvas: Canvas,
    pub fps: Fps,
    /// Consecutive copies written per image.
    pub frames_per_image: u64,
    /// Total frames pushed.
    pub frame_count: u64,
}

impl Assembly {
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frame_count)
    }

    pub fn into_artifact(self, path: impl Into<std::path::PathBuf>) -> VideoArtifact {
        VideoArtifact::new(
            path,
            self.canvas.width,
            self.canvas.height,
            self.fps,
            self.frame_count,
        )
    }
}

/// Write every image of `images`, in order, into `sink`, each held for
/// `round(fps * interval)` frames.
///
/// All checks that can fail without touching pixels (config, interval, first-image decode,
/// strict aspect) run before the output directory is created and before `sink.begin`. A failure
/// after `begin` leaves whatever the sink already wrote.
#[tracing::instrument(skip_all, fields(images = images.len()))]
pub fn assemble(
    images: &OrderedImageSet,
    cfg: &VideoConfig,
    sink: &mut dyn FrameSink,
) -> Img2VideoResult<Assembly> {
    cfg.validate()?;
    let frames_per_image = cfg.frames_per_image()?;

    let first = normalize::decode(images.first())?;
    let (native_w, native_h) = first.native_size();
    let canvas = Canvas::from_width_and_aspect(cfg.width, native_w, native_h)?;
    tracing::info!(
        native_width = native_w,
        native_height = native_h,
        width = canvas.width,
        height = canvas.height,
        "derived output size from first image"
    );

    if cfg.aspect_policy == AspectPolicy::Strict {
        check_uniform_aspect(images, cfg.width, canvas, (native_w, native_h))?;
    }

    std::fs::create_dir_all(&cfg.output_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            cfg.output_dir.display()
        )
    })?;

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: cfg.fps,
    })?;

    let mut first: Option<DecodedImage> = Some(first);
    let mut next_idx = 0u64;
    for image in images {
        tracing::debug!(path = %image.path().display(), "normalizing");
        let frame = match first.take() {
            Some(decoded) => decoded.into_frame(canvas, cfg.bg_rgba)?,
            None => normalize::normalize(image, canvas, cfg.bg_rgba)?,
        };
        for _ in 0..frames_per_image {
            sink.push_frame(FrameIndex(next_idx), &frame)?;
            next_idx += 1;
        }
    }

    sink.end()?;

    let assembly = Assembly {
        canvas,
        fps: cfg.fps,
        frames_per_image,
        frame_count: next_idx,
    };
    tracing::info!(
        frames = assembly.frame_count,
        frames_per_image,
        duration_secs = assembly.duration_secs(),
        "assembled video"
    );
    Ok(assembly)
}

/// Under the strict policy, every image must map to the same derived height as the first.
fn check_uniform_aspect(
    images: &OrderedImageSet,
    width: u32,
    canvas: Canvas,
    first_native: (u32, u32),
) -> Img2VideoResult<()> {
    let expected = f64::from(first_native.0) / f64::from(first_native.1);
    for image in images.iter().skip(1) {
        let (w, h) = normalize::native_size(image)?;
        let derived = Canvas::from_width_and_aspect(width, w, h)?;
        if derived != canvas {
            return Err(Img2VideoError::MixedAspectRatio {
                path: image.path().to_path_buf(),
                width: w,
                height: h,
                expected,
            });
        }
    }
    Ok(())
}

/// Assemble into a raw container at `out_path` via the system `ffmpeg`.
pub fn assemble_to_file(
    images: &OrderedImageSet,
    cfg: &VideoConfig,
    out_path: &Path,
) -> Img2VideoResult<VideoArtifact> {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: out_path.to_path_buf(),
        overwrite: cfg.overwrite,
    });
    let assembly = assemble(images, cfg, &mut sink)?;
    Ok(assembly.into_artifact(sink.out_path()))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/assemble.rs"]
mod tests;
