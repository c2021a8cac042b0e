use crate::FOREGROUND;
use ndarray::{Array2, ArrayView2};

// Inclusive per-channel HSV bounds used for mask thresholding.
//
// Bounds are i16 so that saturation/value bounds derived from a center near
// the domain edge may leave [0, 255]; membership then degenerates to
// always-true on that side. Hue bounds are always clamped to [0, 255] and
// never wrap around the hue circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorRange {
    pub lower: [i16; 3],
    pub upper: [i16; 3],
}

impl ColorRange {
    // Derives bounds from a center color and a per-channel radius.
    pub fn around(center: [u8; 3], radius: [u8; 3]) -> Self {
        let h = center[0] as i16;
        let s = center[1] as i16;
        let v = center[2] as i16;
        let rh = radius[0] as i16;
        let rs = radius[1] as i16;
        let rv = radius[2] as i16;

        // Hue clamps at the domain edges instead of wrapping.
        ColorRange {
            lower: [(h - rh).max(0), s - rs, v - rv],
            upper: [(h + rh).min(255), s + rs, v + rv],
        }
    }

    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        let (h, s, v) = (h as i16, s as i16, v as i16);
        h >= self.lower[0]
            && h <= self.upper[0]
            && s >= self.lower[1]
            && s <= self.upper[1]
            && v >= self.lower[2]
            && v <= self.upper[2]
    }

    // Width of the selected hue band, zero when the range is degenerate.
    pub fn hue_span(&self) -> u8 {
        (self.upper[0] - self.lower[0]).max(0) as u8
    }

    pub fn hue_lower(&self) -> u8 {
        self.lower[0].clamp(0, 255) as u8
    }
}

// Converts an RGB triple to HSV components scaled to bytes.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let h = if h < 0.0 { h + 360.0 } else { h };
    let h_byte = (h * 255.0 / 360.0).round() as u8;

    let s = if max == 0.0 { 0.0 } else { delta / max };
    let s_byte = (s * 255.0).round() as u8;
    let v_byte = (max * 255.0).round() as u8;

    (h_byte, s_byte, v_byte)
}

// Converts full-range byte HSV back to an RGB triple.
pub fn hsv_to_rgb(h_byte: u8, s_byte: u8, v_byte: u8) -> (u8, u8, u8) {
    let h = (h_byte as f32) * 360.0 / 255.0;
    let s = s_byte as f32 / 255.0;
    let v = v_byte as f32 / 255.0;

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r_prime, g_prime, b_prime) = match (h as i32) / 60 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        5 => (c, 0.0, x),
        _ => (0.0, 0.0, 0.0),
    };

    let r = ((r_prime + m) * 255.0).round() as u8;
    let g = ((g_prime + m) * 255.0).round() as u8;
    let b = ((b_prime + m) * 255.0).round() as u8;

    (r, g, b)
}

// Converts a whole RGB array to HSV, reallocating dst only on size change.
pub fn hsv_map(rgb: ArrayView2<[u8; 3]>, dst: &mut Array2<[u8; 3]>) {
    if dst.dim() != rgb.dim() {
        *dst = Array2::from_elem(rgb.dim(), [0u8; 3]);
    }
    for (out, px) in dst.iter_mut().zip(rgb.iter()) {
        let (h, s, v) = rgb_to_hsv(px[0], px[1], px[2]);
        *out = [h, s, v];
    }
}

// Marks pixels whose HSV value falls inside the range.
pub fn threshold(hsv: ArrayView2<[u8; 3]>, range: &ColorRange, mask: &mut Array2<u8>) {
    if mask.dim() != hsv.dim() {
        *mask = Array2::zeros(hsv.dim());
    }
    for (out, px) in mask.iter_mut().zip(hsv.iter()) {
        *out = if range.contains(px[0], px[1], px[2]) {
            FOREGROUND
        } else {
            0
        };
    }
}
