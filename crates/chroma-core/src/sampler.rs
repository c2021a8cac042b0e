use crate::frame::Frame;
use chroma_detection::color::rgb_to_hsv;
use thiserror::Error;

// Half-width of the square sampled around a touch point.
pub const TOUCH_MARGIN: u32 = 4;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("sampling rectangle has zero area")]
    InvalidRegion,

    #[error("sampling rectangle escapes the frame bounds")]
    OutOfBounds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    // Builds the sampling square around a touch point, pulled in at the
    // frame edges so the region stays fully inside the frame. Returns None
    // for a touch outside the frame.
    pub fn around_touch(x: u32, y: u32, frame_width: u32, frame_height: u32) -> Option<Rect> {
        if x >= frame_width || y >= frame_height {
            return None;
        }
        let left = x.saturating_sub(TOUCH_MARGIN);
        let top = y.saturating_sub(TOUCH_MARGIN);
        let right = (x + TOUCH_MARGIN).min(frame_width);
        let bottom = (y + TOUCH_MARGIN).min(frame_height);
        Some(Rect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }
}

// Channel-wise mean HSV over a rectangle of the frame. Every pixel converts
// to HSV first, channel sums divide by the pixel count with truncation, so
// identical regions always produce bit-identical means.
pub fn sample_mean_hsv(frame: &Frame, rect: Rect) -> Result<[u8; 3], SampleError> {
    if rect.width == 0 || rect.height == 0 {
        return Err(SampleError::InvalidRegion);
    }
    if rect.x + rect.width > frame.width || rect.y + rect.height > frame.height {
        return Err(SampleError::OutOfBounds);
    }

    let mut sums = [0u64; 3];
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            let (r, g, b) = frame.rgb_at(x, y).ok_or(SampleError::OutOfBounds)?;
            let (h, s, v) = rgb_to_hsv(r, g, b);
            sums[0] += h as u64;
            sums[1] += s as u64;
            sums[2] += v as u64;
        }
    }

    let count = rect.width as u64 * rect.height as u64;
    Ok([
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    ])
}
