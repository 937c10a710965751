//! img2video turns a directory of still images into a slideshow video.
//!
//! - Resolve a directory into an [`OrderedImageSet`]
//! - [`assemble`] each image, held for `round(fps * interval)` frames, into a [`FrameSink`]
//! - Optionally transcode the raw container for delivery ([`RawOutput`] → [`VerifiedOutput`])
//! - [`inspect`] what was actually written
//!
//! [`run`] does all of it with the system `ffmpeg` and `ffprobe`.
#![forbid(unsafe_code)]

mod foundation;

/// Source image discovery and normalization.
pub mod assets;
/// Run configuration.
pub mod config;
/// Frame sinks and transcoding.
pub mod encode;
/// Pipeline stages.
pub mod pipeline;
/// Video metadata read-back.
pub mod probe;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{Img2VideoError, Img2VideoResult};

pub use crate::assets::normalize::{FrameBuffer, normalize};
pub use crate::assets::resolve::{ImageRef, OrderedImageSet, resolve_images};
pub use crate::config::{AspectPolicy, VideoConfig};
pub use crate::encode::artifact::VideoArtifact;
pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path, is_ffprobe_on_path,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::transcode::{FfmpegTranscoder, RawOutput, Transcoder, VerifiedOutput};
pub use crate::pipeline::assemble::{Assembly, assemble, assemble_to_file};
pub use crate::pipeline::run::{Rendered, RunReport, render, run};
pub use crate::probe::{VideoInfo, inspect};
