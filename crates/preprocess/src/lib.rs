pub mod config;
pub mod cpu;

use ndarray::Array3;
use thiserror::Error;

pub use config::{ChannelOrder, DEFAULT_INPUT_SIZE, DEFAULT_MEAN};
pub use cpu::CpuPreProcessor;

/// Network input: `(channels, height, width)` planes of `f32`.
pub type Tensor = Array3<f32>;

/// Borrowed, decoded pixel buffer in interleaved HWC layout, RGB channel order.
#[derive(Debug, Clone, Copy)]
pub struct RawImage<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl<'a> RawImage<'a> {
    pub fn new(pixels: &'a [u8], width: u32, height: u32, channels: u32) -> Self {
        Self {
            pixels,
            width,
            height,
            channels,
        }
    }

    /// Interleaved 3-channel RGB buffer.
    pub fn rgb(pixels: &'a [u8], width: u32, height: u32) -> Self {
        Self::new(pixels, width, height, 3)
    }

    /// Check the invariants every preprocessor relies on.
    pub fn validate(&self) -> Result<(), PreprocessError> {
        if self.width == 0 || self.height == 0 {
            return Err(PreprocessError::InvalidImage(format!(
                "empty image ({}x{})",
                self.width, self.height
            )));
        }

        if self.channels != 3 {
            return Err(PreprocessError::InvalidImage(format!(
                "expected 3 channels, got {}",
                self.channels
            )));
        }

        let expected = self.width as usize * self.height as usize * 3;
        if self.pixels.len() != expected {
            return Err(PreprocessError::InvalidImage(format!(
                "buffer size mismatch: expected {} bytes for {}x{} RGB, got {}",
                expected,
                self.width,
                self.height,
                self.pixels.len()
            )));
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("image buffer error: {0}")]
    Buffer(#[from] fast_image_resize::ImageBufferError),

    #[error("resize failed: {0}")]
    Resize(#[from] fast_image_resize::ResizeError),

    #[error("tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Trait for image preprocessing implementations
pub trait Preprocess {
    /// Turn a decoded image into a network input tensor.
    ///
    /// The output always has shape `(3, input_height, input_width)` whatever the
    /// size of the source image.
    fn preprocess(&self, image: &RawImage) -> Result<Tensor, PreprocessError>;

    /// Get the input size this preprocessor targets, as `(width, height)`
    fn input_size(&self) -> (u32, u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let image = RawImage::rgb(&[], 0, 10);
        assert!(matches!(
            image.validate(),
            Err(PreprocessError::InvalidImage(_))
        ));

        let image = RawImage::rgb(&[], 10, 0);
        assert!(matches!(
            image.validate(),
            Err(PreprocessError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_validate_rejects_wrong_channel_count() {
        let pixels = vec![0u8; 4 * 4 * 4];
        let image = RawImage::new(&pixels, 4, 4, 4);

        let err = image.validate().unwrap_err();
        assert!(
            err.to_string().contains("expected 3 channels"),
            "unexpected message: {err}"
        );
    }

    #[test]
    fn test_validate_rejects_short_buffer() {
        let pixels = vec![0u8; 200];
        let image = RawImage::rgb(&pixels, 10, 10);

        let err = image.validate().unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn test_validate_accepts_well_formed_image() {
        let pixels = vec![0u8; 2 * 3 * 3];
        assert!(RawImage::rgb(&pixels, 2, 3).validate().is_ok());
    }
}
