use std::str::FromStr;

use crate::foundation::error::{Img2VideoError, Img2VideoResult};

/// Zero-based position of a frame in the output stream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Rational frame rate `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    /// Validated, reduced frame rate. Both parts must be non-zero.
    pub fn new(num: u32, den: u32) -> Img2VideoResult<Self> {
        if den == 0 {
            return Err(Img2VideoError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(Img2VideoError::validation("Fps num must be > 0"));
        }
        let g = gcd(num, den);
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Length of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Playback time of `frames` frames.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Number of frames that cover `secs`, rounded half away from zero.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

impl std::fmt::Display for Fps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Accepts `30`, `29.97` or `30000/1001`. Decimals keep up to three fractional digits.
impl FromStr for Fps {
    type Err = Img2VideoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((num, den)) = s.split_once('/') {
            let num = num
                .trim()
                .parse::<u32>()
                .map_err(|e| Img2VideoError::validation(format!("invalid fps '{s}': {e}")))?;
            let den = den
                .trim()
                .parse::<u32>()
                .map_err(|e| Img2VideoError::validation(format!("invalid fps '{s}': {e}")))?;
            return Self::new(num, den);
        }

        let v = s
            .parse::<f64>()
            .map_err(|e| Img2VideoError::validation(format!("invalid fps '{s}': {e}")))?;
        if !v.is_finite() || v <= 0.0 || v > f64::from(u32::MAX) / 1000.0 {
            return Err(Img2VideoError::validation(format!(
                "fps must be a positive finite number, got '{s}'"
            )));
        }
        if v.fract() == 0.0 {
            return Self::new(v as u32, 1);
        }
        Self::new((v * 1000.0).round() as u32, 1000)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// Output frame size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Canvas of `width` whose height follows the `native_width:native_height` aspect ratio,
    /// i.e. `round(width / (native_width / native_height))`, never below one pixel.
    pub fn from_width_and_aspect(
        width: u32,
        native_width: u32,
        native_height: u32,
    ) -> Img2VideoResult<Self> {
        if native_width == 0 || native_height == 0 {
            return Err(Img2VideoError::validation(format!(
                "cannot derive aspect ratio from a {native_width}x{native_height} image"
            )));
        }
        let aspect = f64::from(native_width) / f64::from(native_height);
        let height = (f64::from(width) / aspect).round().max(1.0);
        if height > f64::from(u32::MAX) {
            return Err(Img2VideoError::validation(format!(
                "derived height {height} is out of range"
            )));
        }
        Ok(Self {
            width,
            height: height as u32,
        })
    }

    /// Number of pixels in one frame.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Round both sides up to the next even number, as 4:2:0 chroma subsampling requires.
    pub fn padded_to_even(self) -> Self {
        Self {
            width: self.width.saturating_add(self.width % 2),
            height: self.height.saturating_add(self.height % 2),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
