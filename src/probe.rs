//! Read back what an encoder actually stored.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::core::Fps;
use crate::foundation::error::{Img2VideoError, Img2VideoResult};

/// Ground-truth metadata of a video file's first video stream.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VideoInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub frame_count: u64,
    /// `frame_count / fps`.
    pub duration_secs: f64,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    nb_read_frames: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

/// Inspect `path` with `ffprobe`. Read-only.
#[tracing::instrument]
pub fn inspect(path: &Path) -> Img2VideoResult<VideoInfo> {
    if !path.is_file() {
        return Err(Img2VideoError::probe(format!(
            "video file '{}' does not exist",
            path.display()
        )));
    }

    let stream = run_ffprobe(path, false)?;
    let frame_count = match parse_count(stream.nb_frames.as_deref()) {
        Some(n) => n,
        // Containers without a frame count in the header need a counting pass.
        None => parse_count(run_ffprobe(path, true)?.nb_read_frames.as_deref())
            .ok_or_else(|| Img2VideoError::probe("ffprobe did not report a frame count"))?,
    };

    info_from_stream(path, &stream, frame_count)
}

fn run_ffprobe(path: &Path, count_frames: bool) -> Img2VideoResult<ProbeStream> {
    let mut cmd = Command::new("ffprobe");
    cmd.args(["-v", "error", "-select_streams", "v:0"]);
    if count_frames {
        cmd.arg("-count_frames");
    }
    cmd.args(["-print_format", "json", "-show_streams"]).arg(path);

    let out = cmd
        .output()
        .map_err(|e| Img2VideoError::probe(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(Img2VideoError::probe(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_json(&out.stdout)
}

fn parse_probe_json(bytes: &[u8]) -> Img2VideoResult<ProbeStream> {
    let parsed: ProbeOut = serde_json::from_slice(bytes)
        .map_err(|e| Img2VideoError::probe(format!("ffprobe json parse failed: {e}")))?;
    parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| Img2VideoError::probe("no video stream found"))
}

fn info_from_stream(
    path: &Path,
    stream: &ProbeStream,
    frame_count: u64,
) -> Img2VideoResult<VideoInfo> {
    let width = stream
        .width
        .ok_or_else(|| Img2VideoError::probe("missing video width from ffprobe"))?;
    let height = stream
        .height
        .ok_or_else(|| Img2VideoError::probe("missing video height from ffprobe"))?;

    let (num, den) = [stream.avg_frame_rate.as_deref(), stream.r_frame_rate.as_deref()]
        .into_iter()
        .flatten()
        .find_map(parse_ff_ratio)
        .ok_or_else(|| Img2VideoError::probe("invalid video frame rate from ffprobe"))?;
    let fps = Fps::new(num, den)?;

    Ok(VideoInfo {
        path: path.to_path_buf(),
        width,
        height,
        fps,
        frame_count,
        duration_secs: fps.frames_to_secs(frame_count),
    })
}

fn parse_count(s: Option<&str>) -> Option<u64> {
    s?.trim().parse::<u64>().ok()
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if a == 0 || b == 0 {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
#[path = "../tests/unit/probe.rs"]
mod tests;
