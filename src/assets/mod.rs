//! Source image discovery and per-image normalization.

/// Decode, metadata stripping, channel-order conversion, and resize.
pub mod normalize;
/// Directory scanning into an ordered image set.
pub mod resolve;
