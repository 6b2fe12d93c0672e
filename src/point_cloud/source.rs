use std::path::Path;

use crate::error::ReliefError;

/// A decoded bitmap: row-major, top-down RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SourceImage {
    /// Wrap raw RGBA8 bytes. The buffer is expected to hold
    /// `width * height * 4` bytes; shorter buffers are accepted and only
    /// their complete pixels are used by the builder.
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Solid-color image, mostly useful for tests and placeholders.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels = rgba.iter().copied().cycle().take(count * 4).collect();
        Self::new(width, height, pixels)
    }

    /// Open and decode an image file (PNG, JPEG, BMP, GIF, WebP).
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::ImageDecode`] when the file cannot be read or
    /// its format is not recognized.
    pub fn open(path: &Path) -> Result<Self, ReliefError> {
        let decoded = image::open(path)?;
        let rgba = decoded.to_rgba8();
        log::info!(
            "decoded {} ({}x{})",
            path.display(),
            rgba.width(),
            rgba.height()
        );
        Ok(Self::new(rgba.width(), rgba.height(), rgba.into_raw()))
    }

    /// Decode an in-memory encoded image.
    ///
    /// # Errors
    ///
    /// Returns [`ReliefError::ImageDecode`] if the bytes are not a supported
    /// image.
    pub fn decode(bytes: &[u8]) -> Result<Self, ReliefError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::new(rgba.width(), rgba.height(), rgba.into_raw()))
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// `true` when either dimension is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
