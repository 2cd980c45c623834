use crate::foundation::error::{LightFieldError, LightFieldResult};

/// Straight-alpha RGBA `f32` pixels, row-major, rows top to bottom.
///
/// Values are nominally in `[0, 1]`. Two buffers blend only if their dimensions match exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Wrap `data`; its length must be `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> LightFieldResult<Self> {
        let expected = expected_len(width, height)?;
        if data.len() != expected {
            return Err(LightFieldError::validation(format!(
                "pixel buffer {width}x{height} expects {expected} floats, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [f32; 4]) -> Self {
        let n = width as usize * height as usize;
        let mut data = Vec::with_capacity(n * 4);
        for _ in 0..n {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Fully transparent black buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize * 4],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Flat RGBA samples.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable flat RGBA samples.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume into the flat RGBA samples.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Iterate pixels as RGBA quadruples.
    pub fn pixels(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.data.chunks_exact(4)
    }

    /// Whether the alpha channel is exactly zero everywhere.
    pub fn is_fully_transparent(&self) -> bool {
        self.pixels().all(|px| px[3] == 0.0)
    }

    /// Whether both buffers have the same dimensions.
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
    }
}

fn expected_len(width: u32, height: u32) -> LightFieldResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LightFieldError::validation("pixel buffer size overflow"))
}
