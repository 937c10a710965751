use crate::assets::normalize::{BGR_BYTES_PER_PIXEL, FrameBuffer};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{Img2VideoError, Img2VideoResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming normalized frames in playback order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex` values,
/// starting at zero, between one `begin` and one `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> Img2VideoResult<()>;
    /// Push one frame in strictly increasing playback order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameBuffer) -> Img2VideoResult<()>;
    /// Called once after the last frame is pushed. Releases the underlying writer.
    fn end(&mut self) -> Img2VideoResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    ended: bool,
    /// Frames in playback order.
    pub(crate) frames: Vec<(FrameIndex, FrameBuffer)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameBuffer)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> Img2VideoResult<()> {
        self.cfg = Some(cfg);
        self.ended = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameBuffer) -> Img2VideoResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| Img2VideoError::video_write("in-memory sink not started"))?;
        check_frame_size(cfg, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> Img2VideoResult<()> {
        self.ended = true;
        Ok(())
    }
}

pub(crate) fn check_frame_size(cfg: &SinkConfig, frame: &FrameBuffer) -> Img2VideoResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(Img2VideoError::video_write(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != frame.canvas().pixel_count() * BGR_BYTES_PER_PIXEL {
        return Err(Img2VideoError::video_write(
            "frame.data size mismatch with width*height*3",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
