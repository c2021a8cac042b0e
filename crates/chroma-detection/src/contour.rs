use crate::FOREGROUND;
use ndarray::{Array2, ArrayView2};

pub struct Contour {
    pub points: Vec<(i32, i32)>,
    pub area: f64,
}

impl Contour {
    pub fn bounding_box(&self) -> Option<(i32, i32, i32, i32)> {
        let first = *self.points.first()?;
        let mut bbox = (first.0, first.1, first.0, first.1);
        for &(x, y) in &self.points {
            bbox.0 = bbox.0.min(x);
            bbox.1 = bbox.1.min(y);
            bbox.2 = bbox.2.max(x);
            bbox.3 = bbox.3.max(y);
        }
        Some(bbox)
    }
}

// 8-neighborhood in clockwise order starting east (y grows downward).
const NEIGHBORS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

// Traces the outer boundary of every connected foreground region.
//
// Regions are discovered in row-major scan order, so the output order is
// stable within a call. Only the outer boundary of each region is traced;
// hole boundaries are not reported. Boundary runs along a single direction
// are compressed to their endpoints, and the enclosed area comes from the
// shoelace formula over the compressed polygon.
pub fn contours_from_mask(mask: ArrayView2<u8>) -> Vec<Contour> {
    let (height, width) = mask.dim();
    let mut visited: Array2<u8> = Array2::zeros((height, width));
    let mut contours = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if mask[(y, x)] != FOREGROUND || visited[(y, x)] != 0 {
                continue;
            }
            let points = trace_boundary(mask, (x, y));
            flood_mark(mask, &mut visited, (y, x));

            let points = compress_collinear(points);
            let area = polygon_area(&points);
            contours.push(Contour { points, area });
        }
    }
    contours
}

// Moore-neighbor tracing from a region's scan anchor. The anchor is the
// topmost-leftmost pixel of its region, so its west neighbor is guaranteed
// background and the walk can start with a synthetic west backtrack.
fn trace_boundary(mask: ArrayView2<u8>, start: (usize, usize)) -> Vec<(i32, i32)> {
    let start = (start.0 as i32, start.1 as i32);
    let mut points = Vec::new();

    // First move out of the anchor; an isolated pixel has no neighbors.
    let first = match next_step(mask, start, 4) {
        Some(step) => step,
        None => return vec![start],
    };
    let first_dir = first.1;

    let mut curr = start;
    let mut backtrack = 4;
    // The walk around a region touches each boundary pixel a bounded number
    // of times; the cap only guards against a malformed mask view.
    let max_steps = 4 * mask.len() + 4;

    for _ in 0..max_steps {
        let (next, dir) = match next_step(mask, curr, backtrack) {
            Some(step) => step,
            None => break,
        };
        // Finished once the walk would repeat its first move from the anchor.
        if curr == start && dir == first_dir && !points.is_empty() {
            break;
        }
        points.push(curr);
        curr = next;
        backtrack = (dir + 4) % 8;
    }
    points
}

// Scans the neighborhood clockwise starting just past the backtrack
// direction and returns the first foreground neighbor with its direction.
fn next_step(
    mask: ArrayView2<u8>,
    (x, y): (i32, i32),
    backtrack: usize,
) -> Option<((i32, i32), usize)> {
    let (height, width) = mask.dim();
    for k in 1..=8 {
        let dir = (backtrack + k) % 8;
        let (dx, dy) = NEIGHBORS[dir];
        let nx = x + dx;
        let ny = y + dy;
        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
            continue;
        }
        if mask[(ny as usize, nx as usize)] == FOREGROUND {
            return Some(((nx, ny), dir));
        }
    }
    None
}

// Marks the whole 8-connected region so later scan rows cannot re-anchor it.
fn flood_mark(mask: ArrayView2<u8>, visited: &mut Array2<u8>, seed: (usize, usize)) {
    let (height, width) = mask.dim();
    let mut stack = vec![seed];
    visited[seed] = 1;

    while let Some((y, x)) = stack.pop() {
        for (dx, dy) in NEIGHBORS {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                continue;
            }
            let p = (ny as usize, nx as usize);
            if mask[p] == FOREGROUND && visited[p] == 0 {
                visited[p] = 1;
                stack.push(p);
            }
        }
    }
}

// Drops intermediate points of straight chain-code runs, keeping corners.
fn compress_collinear(points: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
    let n = points.len();
    if n < 3 {
        return points;
    }
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];
        let into = (curr.0 - prev.0, curr.1 - prev.1);
        let out_of = (next.0 - curr.0, next.1 - curr.1);
        if into != out_of {
            out.push(curr);
        }
    }
    out
}

// Shoelace area over pixel centers; degenerate polygons enclose nothing.
pub fn polygon_area(points: &[(i32, i32)]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0i64;
    for i in 0..points.len() {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % points.len()];
        sum += x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64;
    }
    sum.abs() as f64 / 2.0
}

// Keeps contours larger than a fraction of the largest one found this call.
// The threshold adapts to the dominant region, so isolated noise blobs drop
// out while the largest region always survives for fractions below one.
pub fn filter_by_relative_area(contours: Vec<Contour>, min_fraction: f64) -> Vec<Contour> {
    let max_area = contours.iter().fold(0.0f64, |acc, c| acc.max(c.area));
    contours
        .into_iter()
        .filter(|c| c.area > min_fraction * max_area)
        .collect()
}

// Maps working-resolution coordinates back into original-frame space.
pub fn scale_points(contour: &mut Contour, factor: i32) {
    for p in &mut contour.points {
        p.0 *= factor;
        p.1 *= factor;
    }
    contour.area *= (factor as f64) * (factor as f64);
}
