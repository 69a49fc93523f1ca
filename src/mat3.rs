use crate::error::{Error, Result};
use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, Mul};

/// A 3x3 matrix acting on 2D points in homogeneous coordinates.
///
/// Affine maps keep the bottom row at `[0, 0, 1]`:
///
/// ```text
/// | a  b  tx |
/// | c  d  ty |
/// | 0  0  1  |
/// ```
///
/// Nothing enforces that shape. `custom` and `from_rows` accept any nine
/// entries, and products of such matrices are general projective maps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mat3 {
    // Row-major, indexed [row][col].
    m: [[f64; 3]; 3],
}

pub type Transform3x3 = Mat3;

impl Mat3 {
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub const fn from_rows(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    /// Fills all nine entries in row-major order. No validity check.
    #[allow(clippy::too_many_arguments)]
    pub const fn custom(
        m00: f64,
        m01: f64,
        m02: f64,
        m10: f64,
        m11: f64,
        m12: f64,
        m20: f64,
        m21: f64,
        m22: f64,
    ) -> Self {
        Self {
            m: [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]],
        }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        let mut out = Self::identity();
        out.m[0][2] = tx;
        out.m[1][2] = ty;
        out
    }

    /// Counter-clockwise rotation (y-up) by `angle` degrees about the origin.
    pub fn rotation(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        let mut out = Self::identity();
        out.m[0][0] = cos;
        out.m[0][1] = -sin;
        out.m[1][0] = sin;
        out.m[1][1] = cos;
        out
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        let mut out = Self::identity();
        out.m[0][0] = sx;
        out.m[1][1] = sy;
        out
    }

    /// `over_x` flips across the X axis (negates y), `over_y` flips across the
    /// Y axis (negates x). Both false is the identity.
    pub fn reflection(over_x: bool, over_y: bool) -> Self {
        let mut out = Self::identity();
        if over_x {
            out.m[1][1] = -1.0;
        }
        if over_y {
            out.m[0][0] = -1.0;
        }
        out
    }

    /// `x' = x + shx*y`, `y' = shy*x + y`.
    pub fn shear(shx: f64, shy: f64) -> Self {
        let mut out = Self::identity();
        out.m[0][1] = shx;
        out.m[1][0] = shy;
        out
    }

    // Pivot-relative variants
    // -----------------------------------------------------------------------------

    /// Conjugates `inner` by a translation so that it acts about `(px, py)`:
    /// `T(px, py) * inner * T(-px, -py)`.
    pub fn around_point(inner: Self, px: f64, py: f64) -> Self {
        Self::translation(px, py) * inner * Self::translation(-px, -py)
    }

    pub fn rotation_around_point(angle: f64, px: f64, py: f64) -> Self {
        Self::around_point(Self::rotation(angle), px, py)
    }

    pub fn scaling_around_point(sx: f64, sy: f64, px: f64, py: f64) -> Self {
        Self::around_point(Self::scaling(sx, sy), px, py)
    }

    pub fn reflection_around_point(over_x: bool, over_y: bool, px: f64, py: f64) -> Self {
        Self::around_point(Self::reflection(over_x, over_y), px, py)
    }

    pub fn shear_around_point(shx: f64, shy: f64, px: f64, py: f64) -> Self {
        Self::around_point(Self::shear(shx, shy), px, py)
    }

    // Accessors
    // -----------------------------------------------------------------------------

    pub fn is_affine(&self) -> bool {
        self.m[2] == [0.0, 0.0, 1.0]
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    // Composition
    // -----------------------------------------------------------------------------

    /// Matrix product `self * rhs`. The result applies `rhs` first, then `self`.
    pub fn compose(&self, rhs: &Self) -> Self {
        let mut out = Self { m: [[0.0; 3]; 3] };
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] = (0..3).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        out
    }

    /// Returns a transform that applies this matrix, then translates by `(tx, ty)`.
    ///
    /// This is equivalent to left-multiplying by a translation matrix `T(tx, ty)`.
    #[inline]
    pub fn then_translate(self, tx: f64, ty: f64) -> Self {
        let mut out = self;
        for j in 0..3 {
            out.m[0][j] += tx * self.m[2][j];
            out.m[1][j] += ty * self.m[2][j];
        }
        out
    }

    // Application
    // -----------------------------------------------------------------------------

    #[inline]
    fn homogeneous(&self, p: Point) -> (f64, f64, f64) {
        let x = self.m[0][0] * p.x + self.m[0][1] * p.y + self.m[0][2];
        let y = self.m[1][0] * p.x + self.m[1][1] * p.y + self.m[1][2];
        let w = self.m[2][0] * p.x + self.m[2][1] * p.y + self.m[2][2];
        (x, y, w)
    }

    /// Maps `p` through `M * (x, y, 1)` followed by the divide by `w`.
    ///
    /// When `w == 0` the result is not finite. Use `try_transform_point` to
    /// have that reported instead.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        let (x, y, w) = self.homogeneous(p);
        Point::new(x / w, y / w)
    }

    pub fn try_transform_point(&self, p: Point) -> Result<Point> {
        let (x, y, w) = self.homogeneous(p);
        if w == 0.0 || !w.is_finite() {
            return Err(Error::DegenerateW { x: p.x, y: p.y, w });
        }
        Ok(Point::new(x / w, y / w))
    }

    pub fn transform_points(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.transform_point(p)).collect()
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<(usize, usize)> for Mat3 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.m[row][col]
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        self.compose(&rhs)
    }
}

impl Mul<Point> for Mat3 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        self.transform_point(rhs)
    }
}

/// One row per line, entries separated by single spaces.
impl fmt::Display for Mat3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.m {
            writeln!(f, "{} {} {}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}
