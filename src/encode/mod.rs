//! Encoding: frame sinks, the raw-container writer, and the compatibility transcode.

/// Record of a produced video file.
pub mod artifact;
/// `ffmpeg`-based raw-container sink.
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
/// Compatibility transcode and the raw → final commit.
pub mod transcode;
