use ndarray::ArrayView3;

/// BT.601 luma weights, the conversion most decoders apply for "grayscale".
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// A decoded raster: contiguous bytes in row-major order.
///
/// `channels` is 1 for grayscale and 3 for RGB. Format conversion happens at
/// I/O boundaries and through [`Frame::to_grayscale`] / [`Frame::to_rgb`];
/// the domain layer otherwise treats pixel data as opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn is_grayscale(&self) -> bool {
        self.channels == 1
    }

    /// Single-channel copy of this frame. Grayscale frames are cloned as-is.
    pub fn to_grayscale(&self) -> Frame {
        if self.is_grayscale() {
            return self.clone();
        }
        let step = self.channels as usize;
        let data = self
            .data
            .chunks_exact(step)
            .map(|px| {
                let luma = LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32;
                luma.round().clamp(0.0, 255.0) as u8
            })
            .collect();
        Frame::new(data, self.width, self.height, 1)
    }

    /// Three-channel copy of this frame; a gray value is replicated into R, G and B.
    pub fn to_rgb(&self) -> Frame {
        match self.channels {
            3 => self.clone(),
            1 => {
                let data = self.data.iter().flat_map(|&v| [v, v, v]).collect();
                Frame::new(data, self.width, self.height, 3)
            }
            n => {
                let data = self
                    .data
                    .chunks_exact(n as usize)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect();
                Frame::new(data, self.width, self.height, 3)
            }
        }
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
