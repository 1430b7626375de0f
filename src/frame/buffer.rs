use crate::foundation::error::{FlashguardError, FlashguardResult};

/// Bytes per pixel of a [`PixelBuffer`] (straight RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// One captured frame sample: straight (non-premultiplied) RGBA8, row-major, tightly packed.
///
/// The length invariant `bytes.len() == width * height * 4` is checked on construction, so
/// every `PixelBuffer` in circulation is well-formed. Buffers are never mutated by the analyzer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap captured RGBA8 bytes, validating dimensions and length.
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> FlashguardResult<Self> {
        if width == 0 || height == 0 {
            return Err(FlashguardError::invalid_buffer(format!(
                "dimensions must be non-zero (got {width}x{height})"
            )));
        }
        let expected = expected_len(width, height)?;
        if bytes.len() != expected {
            return Err(FlashguardError::invalid_buffer(format!(
                "expected {expected} bytes for {width}x{height} rgba8, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// Build a buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> FlashguardResult<Self> {
        let len = expected_len(width, height)?;
        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len / BYTES_PER_PIXEL {
            bytes.extend_from_slice(&rgba);
        }
        Self::new(width, height, bytes)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count (`width * height`).
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// RGB channels of the pixel at linear index `i` (row-major).
    pub(crate) fn rgb_at(&self, i: usize) -> [u8; 3] {
        let o = i * BYTES_PER_PIXEL;
        [self.bytes[o], self.bytes[o + 1], self.bytes[o + 2]]
    }

    /// Return `true` when both buffers have the same `width`/`height`.
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }
}

fn expected_len(width: u32, height: u32) -> FlashguardResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| FlashguardError::invalid_buffer("buffer size overflow"))
}
