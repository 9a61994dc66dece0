use crate::config::{ChannelOrder, DEFAULT_INPUT_SIZE, DEFAULT_MEAN};
use crate::{Preprocess, PreprocessError, RawImage, Tensor};
use common::span;
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
    images::{Image, ImageRef},
};
use ndarray::Array3;

/// Bilinear resize to a fixed size followed by per-channel mean subtraction.
///
/// Holds configuration only, so one instance can serve any number of calls.
#[derive(Debug, Clone)]
pub struct CpuPreProcessor {
    pub input_size: (u32, u32),
    pub mean: [f32; 3],
    pub channel_order: ChannelOrder,
}

impl CpuPreProcessor {
    pub fn new(input_size: (u32, u32), mean: [f32; 3], channel_order: ChannelOrder) -> Self {
        Self {
            input_size,
            mean,
            channel_order,
        }
    }

    fn resize(&self, image: &RawImage) -> Result<Image<'static>, PreprocessError> {
        let _s = span!("resize");

        let src = ImageRef::new(image.width, image.height, image.pixels, PixelType::U8x3)?;
        let mut resized = Image::new(self.input_size.0, self.input_size.1, PixelType::U8x3);

        Resizer::new().resize(
            &src,
            &mut resized,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        )?;

        Ok(resized)
    }

    fn normalize(&self, image: &Image) -> Result<Tensor, PreprocessError> {
        let _s = span!("normalize");

        let width = image.width() as usize;
        let height = image.height() as usize;
        let spatial = width * height;

        let mut output = vec![0.0f32; 3 * spatial];
        let source = self.channel_order.source_indices();

        for (i, px) in image.buffer().chunks_exact(3).enumerate() {
            for (plane, &channel) in source.iter().enumerate() {
                output[plane * spatial + i] = px[channel] as f32 - self.mean[plane];
            }
        }

        Ok(Array3::from_shape_vec((3, height, width), output)?)
    }
}

impl Preprocess for CpuPreProcessor {
    fn preprocess(&self, image: &RawImage) -> Result<Tensor, PreprocessError> {
        let _s = span!("preprocess");

        tracing::trace!(
            width = image.width,
            height = image.height,
            pixel_bytes = image.pixels.len(),
            "Preprocessing image"
        );

        image.validate()?;

        let resized = self.resize(image)?;
        self.normalize(&resized)
    }

    fn input_size(&self) -> (u32, u32) {
        self.input_size
    }
}

impl Default for CpuPreProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE, DEFAULT_MEAN, ChannelOrder::default())
    }
}
