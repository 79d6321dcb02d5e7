//! Image decoding from memory, always to RGBA8.

/// Decoded pixels of one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

/// Bytes per decoded pixel. Every part is expanded to RGBA so composite
/// textures share one pixel format regardless of the source channel count.
pub const CHANNELS: usize = 4;

/// Decode encoded image bytes (PNG, JPEG) into RGBA8.
///
/// Returns `None` for empty, truncated or unsupported input.
#[must_use]
pub fn decode_rgba(bytes: &[u8]) -> Option<DecodedImage> {
    if bytes.is_empty() {
        return None;
    }
    let image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(e) => {
            log::debug!("image decode failed: {e}");
            return None;
        }
    };
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Some(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
