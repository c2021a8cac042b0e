use chroma_detection::color::{hsv_to_rgb, rgb_to_hsv};
use ndarray::Array2;
use thiserror::Error;

// An image frame with raw pixel data and dimensions. The detection core
// borrows frames for the duration of a call and never keeps them.
#[derive(Clone, Debug)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

// Describes how pixels are laid out and how many bytes each uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    RGB8,  // 3 bytes per pixel (R, G, B)
    RGBA8, // 4 bytes per pixel (R, G, B, A); alpha is carried but ignored
    BGR8,  // 3 bytes per pixel (B, G, R)
    HSV8,  // 3 bytes per pixel (H, S, V), full-range bytes
}

impl PixelFormat {
    pub const fn bytes_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::RGB8 | PixelFormat::BGR8 | PixelFormat::HSV8 => 3,
            PixelFormat::RGBA8 => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("buffer holds {actual} bytes but {expected} are required")]
    BufferSize { expected: usize, actual: usize },

    #[error("frame dimensions are zero")]
    ZeroDimensions,
}

pub struct FrameConfig {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl Frame {
    // Validates buffer size against dimensions and constructs a frame.
    pub fn new(config: FrameConfig) -> Result<Self, FrameError> {
        if config.width == 0 || config.height == 0 {
            return Err(FrameError::ZeroDimensions);
        }

        let expected = config.width as usize
            * config.height as usize
            * config.format.bytes_per_pixel() as usize;
        if config.data.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                actual: config.data.len(),
            });
        }

        Ok(Self {
            data: config.data,
            width: config.width,
            height: config.height,
            format: config.format,
        })
    }

    // Returns the pixel bytes at (x, y) if inside bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bytes_per_pixel = self.format.bytes_per_pixel() as usize;
        let index = ((y * self.width + x) as usize) * bytes_per_pixel;
        self.data.get(index..index + bytes_per_pixel)
    }

    // Returns the pixel at (x, y) as an RGB triple, whatever the layout.
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        self.get_pixel(x, y).map(|px| self.extract_rgb(px))
    }

    // Converts the frame into an 8-bit RGB frame.
    pub fn to_rgb8(&self) -> Frame {
        if self.format == PixelFormat::RGB8 {
            return self.clone();
        }

        let bytes_per_pixel = self.format.bytes_per_pixel() as usize;
        let mut new_data = Vec::with_capacity((self.height * self.width * 3) as usize);
        for pixel in self.data.chunks_exact(bytes_per_pixel) {
            let (r, g, b) = self.extract_rgb(pixel);
            new_data.extend([r, g, b]);
        }

        Frame {
            data: new_data,
            width: self.width,
            height: self.height,
            format: PixelFormat::RGB8,
        }
    }

    // Converts the frame into full-range HSV pixel format.
    pub fn to_hsv(&self) -> Frame {
        if self.format == PixelFormat::HSV8 {
            return self.clone();
        }

        let bytes_per_pixel = self.format.bytes_per_pixel() as usize;
        let mut new_data = Vec::with_capacity((self.height * self.width * 3) as usize);
        for pixel in self.data.chunks_exact(bytes_per_pixel) {
            let (r, g, b) = self.extract_rgb(pixel);
            let (h, s, v) = rgb_to_hsv(r, g, b);
            new_data.extend([h, s, v]);
        }

        Frame {
            data: new_data,
            width: self.width,
            height: self.height,
            format: PixelFormat::HSV8,
        }
    }

    // Copies the frame into a (height, width) RGB array, reallocating the
    // destination only when the frame size changed since the last call.
    pub fn write_rgb_array(&self, dst: &mut Array2<[u8; 3]>) {
        let dim = (self.height as usize, self.width as usize);
        if dst.dim() != dim {
            *dst = Array2::from_elem(dim, [0u8; 3]);
        }

        let bytes_per_pixel = self.format.bytes_per_pixel() as usize;
        for (out, pixel) in dst.iter_mut().zip(self.data.chunks_exact(bytes_per_pixel)) {
            let (r, g, b) = self.extract_rgb(pixel);
            *out = [r, g, b];
        }
    }

    // Normalizes a pixel into (r, g, b) ordering regardless of source format.
    fn extract_rgb(&self, pixel: &[u8]) -> (u8, u8, u8) {
        match self.format {
            PixelFormat::RGB8 | PixelFormat::RGBA8 => (pixel[0], pixel[1], pixel[2]),
            PixelFormat::BGR8 => (pixel[2], pixel[1], pixel[0]),
            PixelFormat::HSV8 => hsv_to_rgb(pixel[0], pixel[1], pixel[2]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_frame(width: u32, height: u32, fill: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend(fill);
        }
        Frame::new(FrameConfig {
            data,
            width,
            height,
            format: PixelFormat::RGB8,
        })
        .unwrap()
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = Frame::new(FrameConfig {
            data: Vec::new(),
            width: 0,
            height: 4,
            format: PixelFormat::RGB8,
        })
        .unwrap_err();
        assert!(matches!(err, FrameError::ZeroDimensions));
    }

    #[test]
    fn buffer_size_must_match_dimensions() {
        let err = Frame::new(FrameConfig {
            data: vec![0; 10],
            width: 2,
            height: 2,
            format: PixelFormat::RGB8,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            FrameError::BufferSize {
                expected: 12,
                actual: 10
            }
        ));
    }

    #[test]
    fn bgr_pixels_come_back_in_rgb_order() {
        let frame = Frame::new(FrameConfig {
            data: vec![10, 20, 30],
            width: 1,
            height: 1,
            format: PixelFormat::BGR8,
        })
        .unwrap();
        assert_eq!(frame.rgb_at(0, 0), Some((30, 20, 10)));
    }

    #[test]
    fn alpha_byte_is_ignored() {
        let frame = Frame::new(FrameConfig {
            data: vec![10, 20, 30, 99],
            width: 1,
            height: 1,
            format: PixelFormat::RGBA8,
        })
        .unwrap();
        assert_eq!(frame.rgb_at(0, 0), Some((10, 20, 30)));
    }

    #[test]
    fn get_pixel_is_bounds_checked() {
        let frame = rgb_frame(2, 2, [1, 2, 3]);
        assert!(frame.get_pixel(1, 1).is_some());
        assert!(frame.get_pixel(2, 0).is_none());
        assert!(frame.get_pixel(0, 2).is_none());
    }

    #[test]
    fn batch_hsv_round_trips_within_rounding() {
        let frame = rgb_frame(3, 2, [200, 64, 30]);
        let back = frame.to_hsv().to_rgb8();
        assert_eq!(back.format, PixelFormat::RGB8);
        for (orig, conv) in frame.data.iter().zip(back.data.iter()) {
            assert!((*orig as i32 - *conv as i32).abs() <= 4);
        }
    }

    #[test]
    fn write_rgb_array_matches_frame_layout() {
        let mut frame = rgb_frame(3, 2, [0, 0, 0]);
        // Pixel (2, 1) in a 3-wide frame starts at byte 15.
        frame.data[15..18].copy_from_slice(&[7, 8, 9]);

        let mut arr = Array2::from_elem((0, 0), [0u8; 3]);
        frame.write_rgb_array(&mut arr);
        assert_eq!(arr.dim(), (2, 3));
        assert_eq!(arr[(1, 2)], [7, 8, 9]);
        assert_eq!(arr[(0, 0)], [0, 0, 0]);
    }
}
