use crate::desc::ShapeDesc;
use crate::im::{Im, MaskIm, RGBAIm, copy_mask_im_to_rgba_im};
use crate::mat3::Mat3;
use crate::point::Point;
use crate::shape::Shape;

const BACKGROUND: [u8; 4] = [24, 24, 24, 255];
const BEFORE_RGB: (u8, u8, u8) = (60, 110, 200);
const AFTER_RGB: (u8, u8, u8) = (230, 140, 40);
const EDGE: [u8; 4] = [240, 240, 240, 255];

/// World window of a plot: `center` lands in the middle of a `w` x `h`
/// image, y points up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotParams {
    pub w: usize,
    pub h: usize,
    pub center: Point,
    pub pixels_per_unit: f64,
}

impl PlotParams {
    /// Chooses a window that holds every ring of `shape` (holes included)
    /// both before and after `xform`, plus `points` and their images, with a
    /// 10% margin. Images that are not finite are left out.
    pub fn fit(shape: &ShapeDesc, points: &[Point], xform: &Mat3, w: usize, h: usize) -> Self {
        let before = shape.vertices().chain(points.iter().copied());
        let all: Vec<Point> = before
            .flat_map(|p| [p, xform.transform_point(p)])
            .filter(Point::is_finite)
            .collect();

        let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for p in &all {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        if all.is_empty() {
            (x0, y0, x1, y1) = (-1.0, -1.0, 1.0, 1.0);
        }

        let span_x = (x1 - x0).max(1e-9) * 1.2;
        let span_y = (y1 - y0).max(1e-9) * 1.2;
        let pixels_per_unit = (w as f64 / span_x).min(h as f64 / span_y);

        Self {
            w,
            h,
            center: Point::new((x0 + x1) / 2.0, (y0 + y1) / 2.0),
            pixels_per_unit,
        }
    }

    /// World to pixel map: `T(w/2, h/2) * S(ppu, -ppu) * T(-cx, -cy)`.
    pub fn view(&self) -> Mat3 {
        Mat3::translation(self.w as f64 / 2.0, self.h as f64 / 2.0)
            * Mat3::scaling(self.pixels_per_unit, -self.pixels_per_unit)
            * Mat3::translation(-self.center.x, -self.center.y)
    }
}

fn fill_shape(shape: &Shape, w: usize, h: usize) -> MaskIm {
    let mut mask = MaskIm::new(w, h);
    shape.raster(&mut mask, |im, x_start, x_end, y| {
        for x in x_start..x_end {
            im.put(x, y, [255]);
        }
    });
    mask
}

fn draw_edges(shape: &Shape, im: &mut RGBAIm) {
    shape.raster_edges(im, |im, x, y| im.put(x, y, EDGE));
}

fn draw_cross(im: &mut Im<u8, 4>, p: Point, rgb: (u8, u8, u8)) {
    if !p.is_finite() {
        return;
    }
    let (cx, cy) = (p.x.round() as i64, p.y.round() as i64);
    for d in -2..=2_i64 {
        for (x, y) in [(cx + d, cy), (cx, cy + d)] {
            if x >= 0 && y >= 0 {
                im.put(x as usize, y as usize, [rgb.0, rgb.1, rgb.2, 255]);
            }
        }
    }
}

/// Renders `shape` and `points` before (blue) and after (orange) `xform`.
pub fn plot_before_after(
    shape: &ShapeDesc,
    points: &[Point],
    xform: &Mat3,
    params: &PlotParams,
) -> RGBAIm {
    let view = params.view();
    let before = shape.to_shape(&view, 1.0);
    let after = shape.to_shape(&(view * *xform), 1.0);

    let mut im = RGBAIm::new(params.w, params.h);
    im.fill(BACKGROUND);

    let (r, g, b) = BEFORE_RGB;
    copy_mask_im_to_rgba_im(&fill_shape(&before, params.w, params.h), &mut im, r, g, b);
    let (r, g, b) = AFTER_RGB;
    copy_mask_im_to_rgba_im(&fill_shape(&after, params.w, params.h), &mut im, r, g, b);

    draw_edges(&before, &mut im);
    draw_edges(&after, &mut im);

    for &p in points {
        draw_cross(&mut im, view * p, BEFORE_RGB);
        draw_cross(&mut im, view * (*xform * p), AFTER_RGB);
    }

    im
}
