//! Stage orchestration: assemble frames into a raw container, then (optionally) transcode it.

/// Frame assembly: derive output size, duplicate frames, feed a sink.
pub mod assemble;
/// Resolve → assemble → transcode → inspect.
pub mod run;
