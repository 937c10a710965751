use image::imageops::FilterType;

use crate::assets::resolve::ImageRef;
use crate::foundation::core::Canvas;
use crate::foundation::error::{Img2VideoError, Img2VideoResult};
use crate::foundation::math::over_opaque_u8;

/// Bytes per pixel of [`FrameBuffer::data`].
pub const BGR_BYTES_PER_PIXEL: usize = 3;

/// Opaque packed BGR24 frame, row-major, tightly packed. This is the channel order the raw
/// video sink feeds to the encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameBuffer {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// Pixels of one decoded source image, copied out of the decoder.
///
/// Only straight RGBA8 samples survive; orientation tags, color profiles, and any other
/// container metadata stay behind with the dropped decoder handle.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    rgba: image::RgbaImage,
}

impl DecodedImage {
    pub fn native_size(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }

    /// Flatten alpha over `bg_rgba`, swap to BGR, and resample to exactly `canvas`.
    pub fn into_frame(self, canvas: Canvas, bg_rgba: [u8; 4]) -> Img2VideoResult<FrameBuffer> {
        let (w, h) = self.rgba.dimensions();
        let bgr = rgba_to_bgr_over_bg(self.rgba.as_raw(), bg_rgba);
        drop(self.rgba);

        let data = if (w, h) == (canvas.width, canvas.height) {
            bgr
        } else {
            // Resampling is channel-order agnostic, so the BGR bytes ride in an `Rgb` buffer.
            let buf = image::ImageBuffer::<image::Rgb<u8>, Vec<u8>>::from_raw(w, h, bgr)
                .ok_or_else(|| {
                    Img2VideoError::validation("decoded buffer size mismatch (unexpected)")
                })?;
            image::imageops::resize(&buf, canvas.width, canvas.height, FilterType::Triangle)
                .into_raw()
        };

        Ok(FrameBuffer {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }
}

/// Decode `image` into a fresh metadata-free RGBA buffer.
pub fn decode(image: &ImageRef) -> Img2VideoResult<DecodedImage> {
    let path = image.path();
    let reader = image::ImageReader::open(path)
        .map_err(|e| Img2VideoError::image_decode(path, e))?
        .with_guessed_format()
        .map_err(|e| Img2VideoError::image_decode(path, e))?;
    let handle = reader
        .decode()
        .map_err(|e| Img2VideoError::image_decode(path, e))?;
    let rgba = handle.to_rgba8();
    drop(handle);
    Ok(DecodedImage { rgba })
}

/// Decode, flatten, convert and resize one image to `canvas`.
pub fn normalize(
    image: &ImageRef,
    canvas: Canvas,
    bg_rgba: [u8; 4],
) -> Img2VideoResult<FrameBuffer> {
    decode(image)?.into_frame(canvas, bg_rgba)
}

/// Native pixel size read from the image header, without decoding pixel data.
pub fn native_size(image: &ImageRef) -> Img2VideoResult<(u32, u32)> {
    image::image_dimensions(image.path())
        .map_err(|e| Img2VideoError::image_decode(image.path(), e))
}

fn rgba_to_bgr_over_bg(rgba: &[u8], bg_rgba: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * BGR_BYTES_PER_PIXEL);
    for px in rgba.chunks_exact(4) {
        let a = px[3];
        if a == 255 {
            out.extend_from_slice(&[px[2], px[1], px[0]]);
            continue;
        }
        out.extend_from_slice(&[
            over_opaque_u8(px[2], a, bg_rgba[2]),
            over_opaque_u8(px[1], a, bg_rgba[1]),
            over_opaque_u8(px[0], a, bg_rgba[0]),
        ]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/normalize.rs"]
mod tests;
