use crate::im::MaskIm;
use crate::mat3::Mat3;
use crate::point::Point;
use approx::abs_diff_eq;

pub fn sample_points() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(-3.5, 2.0),
        Point::new(10.0, -7.25),
        Point::new(0.001, 1e4),
    ]
}

pub fn assert_point_near(actual: Point, expected: Point, eps: f64) {
    assert!(
        abs_diff_eq!(actual.x, expected.x, epsilon = eps)
            && abs_diff_eq!(actual.y, expected.y, epsilon = eps),
        "point mismatch: actual {actual}, expected {expected} (eps {eps})"
    );
}

pub fn assert_mat_near(actual: &Mat3, expected: &Mat3, eps: f64) {
    for row in 0..3 {
        for col in 0..3 {
            assert!(
                abs_diff_eq!(actual[(row, col)], expected[(row, col)], epsilon = eps),
                "entry [{row}][{col}] mismatch:\nactual:\n{actual}expected:\n{expected}"
            );
        }
    }
}

pub fn mask_to_ascii(mask: &MaskIm) -> String {
    let mut out = String::new();
    for y in 0..mask.h {
        for x in 0..mask.w {
            let v = mask.arr[y * mask.s + x];
            out.push(if v > 0 { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

pub fn ascii_to_rows(grid: &str) -> String {
    let mut out = String::new();
    for row in grid.lines().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        out.push_str(row);
        out.push('\n');
    }
    out
}
