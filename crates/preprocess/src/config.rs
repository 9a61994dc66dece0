/// SqueezeNet v1.1 input resolution, `(width, height)`.
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (227, 227);

/// Caffe-style per-channel means in BGR order.
pub const DEFAULT_MEAN: [f32; 3] = [104.0, 117.0, 123.0];

/// Order of the colour planes in the output tensor.
///
/// The mean vector is always given in this same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    Rgb,
    #[default]
    Bgr,
}

impl ChannelOrder {
    /// Index of the source RGB channel feeding each output plane.
    pub fn source_indices(self) -> [usize; 3] {
        match self {
            ChannelOrder::Rgb => [0, 1, 2],
            ChannelOrder::Bgr => [2, 1, 0],
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "rgb" => Some(ChannelOrder::Rgb),
            "bgr" => Some(ChannelOrder::Bgr),
            _ => None,
        }
    }
}
