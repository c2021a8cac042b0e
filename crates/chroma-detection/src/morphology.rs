use crate::FOREGROUND;
use ndarray::{Array2, ArrayView2};

// One pass of 3x3 binary dilation. Out-of-bounds neighbors count as
// background, and dst is reallocated only when the mask size changes.
pub fn dilate(src: ArrayView2<u8>, dst: &mut Array2<u8>) {
    let (height, width) = src.dim();
    if dst.dim() != (height, width) {
        *dst = Array2::zeros((height, width));
    }

    for y in 0..height {
        for x in 0..width {
            let mut hit = false;
            'scan: for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let ny = y as i32 + dy;
                    let nx = x as i32 + dx;
                    if ny < 0 || nx < 0 || ny >= height as i32 || nx >= width as i32 {
                        continue;
                    }
                    if src[(ny as usize, nx as usize)] == FOREGROUND {
                        hit = true;
                        break 'scan;
                    }
                }
            }
            dst[(y, x)] = if hit { FOREGROUND } else { 0 };
        }
    }
}
