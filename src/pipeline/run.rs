use crate::assets::resolve::{OrderedImageSet, resolve_images};
use crate::config::VideoConfig;
use crate::encode::artifact::VideoArtifact;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::FrameSink;
use crate::encode::transcode::{FfmpegTranscoder, RawOutput, Transcoder};
use crate::foundation::error::{Img2VideoError, Img2VideoResult};
use crate::pipeline::assemble::assemble;
use crate::probe::{VideoInfo, inspect};

/// Artifacts of one [`render`] call.
#[derive(Clone, Debug)]
pub struct Rendered {
    pub images: OrderedImageSet,
    /// The raw container. Already deleted when `final_video` is `Some`.
    pub raw: VideoArtifact,
    /// The transcoded delivery file, for two-stage runs.
    pub final_video: Option<VideoArtifact>,
}

impl Rendered {
    /// The artifact the caller should treat as the run's output.
    pub fn output(&self) -> &VideoArtifact {
        self.final_video.as_ref().unwrap_or(&self.raw)
    }
}

/// Ground-truth report of one [`run`].
#[derive(Clone, Debug)]
pub struct RunReport {
    pub images: OrderedImageSet,
    /// What was declared for the raw container, before any transcode.
    pub raw: VideoArtifact,
    /// Probed metadata of the raw container, read before it was retired.
    pub raw_info: VideoInfo,
    /// Probed metadata of the transcoded delivery file.
    pub final_info: Option<VideoInfo>,
}

/// Resolve, assemble into `sink` (which must write `cfg.raw_path()`), then transcode and
/// commit when `cfg.transcode` is set.
///
/// `after_raw` sees the raw artifact after it is complete and before it is handed to the
/// transcoder. With `overwrite` off, an existing final file fails the run before any frame
/// is written.
pub fn render(
    cfg: &VideoConfig,
    sink: &mut dyn FrameSink,
    transcoder: &dyn Transcoder,
    mut after_raw: impl FnMut(&VideoArtifact) -> Img2VideoResult<()>,
) -> Img2VideoResult<Rendered> {
    cfg.validate()?;
    let final_path = cfg.final_path();
    if !cfg.overwrite && final_path.exists() {
        return Err(Img2VideoError::validation(format!(
            "output file '{}' already exists",
            final_path.display()
        )));
    }
    let images = resolve_images(&cfg.input_dir, &cfg.extension)?;
    tracing::info!(count = images.len(), dir = %cfg.input_dir.display(), "resolved images");

    let raw = assemble(&images, cfg, sink)?.into_artifact(cfg.raw_path());
    tracing::info!(path = %raw.path.display(), frames = raw.frame_count, "wrote raw video");
    after_raw(&raw)?;

    if !cfg.transcode {
        return Ok(Rendered {
            images,
            raw,
            final_video: None,
        });
    }

    let verified = RawOutput::new(raw.clone()).transcode(transcoder, &final_path)?;
    let final_video = verified.commit()?;
    tracing::info!(path = %final_video.path.display(), "wrote final video");

    Ok(Rendered {
        images,
        raw,
        final_video: Some(final_video),
    })
}

/// Full pipeline with the system `ffmpeg`/`ffprobe`: raw container, optional compatibility
/// transcode, and a probe of each produced file.
#[tracing::instrument(skip_all, fields(input = %cfg.input_dir.display(), name = %cfg.name))]
pub fn run(cfg: &VideoConfig) -> Img2VideoResult<RunReport> {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: cfg.raw_path(),
        overwrite: cfg.overwrite,
    });
    let transcoder = FfmpegTranscoder {
        overwrite: cfg.overwrite,
    };

    let mut raw_info = None;
    let rendered = render(cfg, &mut sink, &transcoder, |raw| {
        raw_info = Some(inspect(&raw.path)?);
        Ok(())
    })?;

    tracing::info!(path = %rendered.output().path.display(), "render finished");
    let final_info = match &rendered.final_video {
        Some(v) => Some(inspect(&v.path)?),
        None => None,
    };

    Ok(RunReport {
        images: rendered.images,
        raw: rendered.raw,
        raw_info: raw_info.ok_or_else(|| {
            Img2VideoError::probe("raw video was never inspected")
        })?,
        final_info,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
