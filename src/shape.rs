use crate::im::Im;
use clipper2::{One, Path, Paths, Point};

pub type IntPoint = Point<One>;
pub type IntPath = Path<One>;
pub type IntPaths = Paths<One>;

/// A polygon with holes in integer fixed-point coordinates.
///
/// Rings are kept in input order: the exterior first, then holes. Coordinates
/// come from arbitrary transforms, so they may lie far outside any image the
/// shape is rasterized into; both raster paths clip to the image first.
#[derive(Clone, Debug)]
pub struct Shape {
    paths: IntPaths,
}

/// A non-horizontal ring edge, stored lower endpoint first.
struct Edge {
    y_lo: i64,
    y_hi: i64,
    x_lo: f64,
    dx_dy: f64,
}

impl Edge {
    fn new(a: [i64; 2], b: [i64; 2]) -> Option<Self> {
        if a[1] == b[1] {
            return None;
        }
        let (lo, hi) = if a[1] < b[1] { (a, b) } else { (b, a) };
        Some(Self {
            y_lo: lo[1],
            y_hi: hi[1],
            x_lo: lo[0] as f64,
            dx_dy: (hi[0] as f64 - lo[0] as f64) / (hi[1] as f64 - lo[1] as f64),
        })
    }

    // Half-open in y so shared vertices are counted once.
    #[inline]
    fn x_at(&self, y: i64) -> Option<f64> {
        (y >= self.y_lo && y < self.y_hi).then(|| self.x_lo + (y - self.y_lo) as f64 * self.dx_dy)
    }
}

fn ring_coords(path: &IntPath) -> Vec<[i64; 2]> {
    path.iter().map(|pt| [pt.x_scaled(), pt.y_scaled()]).collect()
}

/// Consecutive vertex pairs of a closed ring, including last -> first.
fn ring_segments(ring: &[[i64; 2]]) -> impl Iterator<Item = ([i64; 2], [i64; 2])> + '_ {
    let n = ring.len();
    (0..if n < 2 { 0 } else { n }).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// Liang-Barsky clip of segment `a`-`b` to `[0, max_x] x [0, max_y]`.
fn clip_segment(a: [f64; 2], b: [f64; 2], max_x: f64, max_y: f64) -> Option<([f64; 2], [f64; 2])> {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [(-dx, a[0]), (dx, max_x - a[0]), (-dy, a[1]), (dy, max_y - a[1])] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        [a[0] + t0 * dx, a[1] + t0 * dy],
        [a[0] + t1 * dx, a[1] + t1 * dy],
    ))
}

impl Shape {
    pub fn new(paths: Vec<IntPath>) -> Self {
        Self {
            paths: IntPaths::new(paths),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntPath> {
        self.paths.iter()
    }

    /// Sum of the ring signed areas in fixed-point units squared.
    ///
    /// Counter-clockwise (y-up) rings count positive, so a reflected shape
    /// flips sign.
    pub fn signed_area(&self) -> f64 {
        self.paths.iter().map(|p| p.signed_area()).sum()
    }

    /// Even-odd scanline fill over all rings, so holes subtract.
    ///
    /// `callback(im, x_start, x_end, y)` gets spans already clipped to the
    /// image, with `x_end` exclusive and greater than `x_start`.
    pub fn raster<T, const N_CH: usize, F>(&self, im: &mut Im<T, N_CH>, mut callback: F)
    where
        T: Copy + Default,
        F: FnMut(&mut Im<T, N_CH>, usize, usize, usize),
    {
        let (w, h) = (im.w as i64, im.h as i64);
        let edges: Vec<Edge> = self
            .paths
            .iter()
            .flat_map(|path| {
                let ring = ring_coords(path);
                ring_segments(&ring)
                    .filter_map(|(a, b)| Edge::new(a, b))
                    .collect::<Vec<_>>()
            })
            .filter(|e| e.y_hi > 0 && e.y_lo < h)
            .collect();

        let mut xs: Vec<i64> = Vec::new();
        for y in 0..h {
            xs.clear();
            // Clamping is monotonic, so clamp before sorting.
            xs.extend(
                edges
                    .iter()
                    .filter_map(|e| e.x_at(y))
                    .map(|x| (x.round() as i64).clamp(0, w)),
            );
            if xs.len() < 2 {
                continue;
            }
            xs.sort_unstable();

            for pair in xs.chunks_exact(2) {
                if pair[0] < pair[1] {
                    callback(im, pair[0] as usize, pair[1] as usize, y as usize);
                }
            }
        }
    }

    /// Outlines every ring with Bresenham lines. Each edge is clipped to the
    /// image before stepping, so the work per edge is bounded by `w + h`.
    pub fn raster_edges<T, const N_CH: usize, F>(&self, im: &mut Im<T, N_CH>, mut callback: F)
    where
        T: Copy + Default,
        F: FnMut(&mut Im<T, N_CH>, usize, usize),
    {
        if im.w == 0 || im.h == 0 {
            return;
        }
        let (max_x, max_y) = ((im.w - 1) as f64, (im.h - 1) as f64);

        for path in self.paths.iter() {
            let ring = ring_coords(path);
            for (a, b) in ring_segments(&ring) {
                let a = [a[0] as f64, a[1] as f64];
                let b = [b[0] as f64, b[1] as f64];
                let Some((a, b)) = clip_segment(a, b, max_x, max_y) else {
                    continue;
                };

                let (x1, y1) = (a[0].round() as i64, a[1].round() as i64);
                let (x2, y2) = (b[0].round() as i64, b[1].round() as i64);
                let dx = (x2 - x1).abs();
                let dy = -(y2 - y1).abs();
                let sx = if x1 < x2 { 1 } else { -1 };
                let sy = if y1 < y2 { 1 } else { -1 };
                let mut err = dx + dy;
                let (mut x, mut y) = (x1, y1);

                loop {
                    if x >= 0 && x < im.w as i64 && y >= 0 && y < im.h as i64 {
                        callback(im, x as usize, y as usize);
                    }
                    if x == x2 && y == y2 {
                        break;
                    }
                    let e2 = 2 * err;
                    if e2 >= dy {
                        err += dy;
                        x += sx;
                    }
                    if e2 <= dx {
                        err += dx;
                        y += sy;
                    }
                }
            }
        }
    }
}
