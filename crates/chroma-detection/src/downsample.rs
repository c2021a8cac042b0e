use ndarray::{Array2, ArrayView2};

// Halves each axis with a 2x2 box mean, so thin colored features survive
// the reduction instead of aliasing away. A trailing odd row/column is
// discarded. Channel sums truncate on divide.
pub fn halve(src: ArrayView2<[u8; 3]>, dst: &mut Array2<[u8; 3]>) {
    let (height, width) = src.dim();
    let out = (height / 2, width / 2);
    if dst.dim() != out {
        *dst = Array2::from_elem(out, [0u8; 3]);
    }

    for y in 0..out.0 {
        for x in 0..out.1 {
            let mut acc = [0u16; 3];
            for sy in 0..2 {
                for sx in 0..2 {
                    let px = src[(2 * y + sy, 2 * x + sx)];
                    for c in 0..3 {
                        acc[c] += px[c] as u16;
                    }
                }
            }
            dst[(y, x)] = [(acc[0] / 4) as u8, (acc[1] / 4) as u8, (acc[2] / 4) as u8];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_each_2x2_block() {
        let mut src = Array2::from_elem((4, 4), [0u8; 3]);
        // Top-left block: 4 distinct reds averaging to 150.
        src[(0, 0)] = [100, 0, 0];
        src[(0, 1)] = [200, 0, 0];
        src[(1, 0)] = [120, 0, 0];
        src[(1, 1)] = [180, 0, 0];
        // Bottom-right block: solid green.
        for p in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            src[p] = [0, 255, 0];
        }

        let mut dst = Array2::from_elem((0, 0), [0u8; 3]);
        halve(src.view(), &mut dst);

        assert_eq!(dst.dim(), (2, 2));
        assert_eq!(dst[(0, 0)], [150, 0, 0]);
        assert_eq!(dst[(1, 1)], [0, 255, 0]);
        assert_eq!(dst[(0, 1)], [0, 0, 0]);
    }

    #[test]
    fn truncates_odd_edges() {
        let src = Array2::from_elem((5, 7), [10u8, 20, 30]);
        let mut dst = Array2::from_elem((0, 0), [0u8; 3]);
        halve(src.view(), &mut dst);
        assert_eq!(dst.dim(), (2, 3));
        assert_eq!(dst[(1, 2)], [10, 20, 30]);
    }

    #[test]
    fn division_truncates_toward_zero() {
        let mut src = Array2::from_elem((2, 2), [0u8; 3]);
        src[(0, 0)] = [3, 0, 0];
        let mut dst = Array2::from_elem((1, 1), [0u8; 3]);
        halve(src.view(), &mut dst);
        // (3 + 0 + 0 + 0) / 4 truncates to 0.
        assert_eq!(dst[(0, 0)], [0, 0, 0]);
    }
}
