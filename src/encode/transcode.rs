//! Second-pass compatibility encode and the raw → final commit.
//!
//! The commit is a typestate chain so the intermediate file can only be deleted after the
//! destination was verified:
//!
//! ```text
//! RawOutput --transcode()--> VerifiedOutput --commit()--> VideoArtifact (final)
//! ```
//!
//! Any failure before `commit` leaves the raw file where it was.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::encode::artifact::VideoArtifact;
use crate::encode::ffmpeg::{ensure_parent_dir, is_ffmpeg_on_path};
use crate::foundation::core::Canvas;
use crate::foundation::error::{Img2VideoError, Img2VideoResult};

/// External re-encoding capability.
pub trait Transcoder {
    /// Re-encode `src` into `dst`. Must not touch `src`.
    fn transcode(&self, src: &Path, dst: &Path) -> Img2VideoResult<()>;

    /// Frame size this transcoder stores for an input of `input` size.
    fn output_canvas(&self, input: Canvas) -> Canvas {
        input
    }
}

/// Transcoder backed by the system `ffmpeg`: H.264, yuv420p, `+faststart` MP4.
#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    /// Overwrite `dst` if it already exists.
    pub overwrite: bool,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, src: &Path, dst: &Path) -> Img2VideoResult<()> {
        if !is_ffmpeg_on_path() {
            return Err(Img2VideoError::transcode(
                "ffmpeg is required for transcoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null()).stdout(Stdio::null());
        cmd.arg(if self.overwrite { "-y" } else { "-n" });
        cmd.args(["-loglevel", "error", "-i"])
            .arg(src)
            .args([
                "-an",
                // yuv420p needs even dimensions; pad odd sizes by one pixel.
                "-vf",
                "pad=ceil(iw/2)*2:ceil(ih/2)*2",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ])
            .arg(dst);

        let output = cmd.output().map_err(|e| {
            Img2VideoError::transcode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        if !output.status.success() {
            return Err(Img2VideoError::transcode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    fn output_canvas(&self, input: Canvas) -> Canvas {
        input.padded_to_even()
    }
}

/// Raw artifact that has been fully written and is waiting to be transcoded.
#[derive(Debug)]
pub struct RawOutput {
    raw: VideoArtifact,
}

/// Transcode finished and the destination file was checked.
#[derive(Debug)]
pub struct VerifiedOutput {
    raw: VideoArtifact,
    final_path: PathBuf,
    final_canvas: Canvas,
}

impl RawOutput {
    /// Wrap a completely written raw artifact.
    pub fn new(raw: VideoArtifact) -> Self {
        Self { raw }
    }

    /// Run `transcoder` into `dst` and verify that `dst` now holds data.
    ///
    /// A file already at `dst` is removed first, so only output of this transcode can pass
    /// verification. On error the raw artifact is untouched.
    #[tracing::instrument(skip(self, transcoder), fields(src = %self.raw.path.display()))]
    pub fn transcode(
        self,
        transcoder: &dyn Transcoder,
        dst: &Path,
    ) -> Img2VideoResult<VerifiedOutput> {
        if dst == self.raw.path {
            return Err(Img2VideoError::transcode(format!(
                "transcode destination '{}' is the raw artifact itself",
                dst.display()
            )));
        }
        ensure_parent_dir(dst)?;
        if dst.is_file() {
            std::fs::remove_file(dst)
                .with_context(|| format!("remove stale output '{}'", dst.display()))?;
            tracing::debug!(dst = %dst.display(), "removed stale transcode output");
        }

        if let Err(e) = transcoder.transcode(&self.raw.path, dst) {
            tracing::warn!(raw = %self.raw.path.display(), "transcode failed; raw artifact kept");
            return Err(e);
        }

        let produced = std::fs::metadata(dst).map(|m| m.is_file() && m.len() > 0);
        if !matches!(produced, Ok(true)) {
            tracing::warn!(
                raw = %self.raw.path.display(),
                "transcode produced no output; raw artifact kept"
            );
            return Err(Img2VideoError::transcode(format!(
                "transcoder did not produce '{}'",
                dst.display()
            )));
        }

        let final_canvas = transcoder.output_canvas(Canvas {
            width: self.raw.width,
            height: self.raw.height,
        });
        Ok(VerifiedOutput {
            raw: self.raw,
            final_path: dst.to_path_buf(),
            final_canvas,
        })
    }
}

impl VerifiedOutput {
    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Delete the raw artifact and return the final one.
    pub fn commit(self) -> Img2VideoResult<VideoArtifact> {
        std::fs::remove_file(&self.raw.path).with_context(|| {
            format!("remove intermediate artifact '{}'", self.raw.path.display())
        })?;
        tracing::debug!(raw = %self.raw.path.display(), "removed intermediate artifact");
        Ok(VideoArtifact {
            path: self.final_path,
            width: self.final_canvas.width,
            height: self.final_canvas.height,
            ..self.raw
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/transcode.rs"]
mod tests;
