use crate::error::Result;
use crate::mat3::Mat3;
use crate::point::Point;
use crate::shape::{IntPath, IntPoint, Shape};
use serde::{Deserialize, Serialize};
use std::path::Path;

// A ring as [x0, y0, x1, y1, ...] in world units.
type FlatVerts = Vec<f64>;

/// One named factory call in a chain.
///
/// Entries with a `pivot` build the corresponding `*_around_point` transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum TransformDesc {
    Identity,
    Translation {
        tx: f64,
        ty: f64,
    },
    Rotation {
        angle: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pivot: Option<Point>,
    },
    Scaling {
        sx: f64,
        sy: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pivot: Option<Point>,
    },
    Shear {
        shx: f64,
        shy: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pivot: Option<Point>,
    },
    Reflection {
        #[serde(default)]
        over_x: bool,
        #[serde(default)]
        over_y: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pivot: Option<Point>,
    },
    Custom {
        m: [[f64; 3]; 3],
    },
}

impl TransformDesc {
    pub fn to_mat3(&self) -> Mat3 {
        let primitive = match *self {
            TransformDesc::Identity => Mat3::identity(),
            TransformDesc::Translation { tx, ty } => Mat3::translation(tx, ty),
            TransformDesc::Rotation { angle, .. } => Mat3::rotation(angle),
            TransformDesc::Scaling { sx, sy, .. } => Mat3::scaling(sx, sy),
            TransformDesc::Shear { shx, shy, .. } => Mat3::shear(shx, shy),
            TransformDesc::Reflection { over_x, over_y, .. } => Mat3::reflection(over_x, over_y),
            TransformDesc::Custom { m } => {
                let custom = Mat3::from_rows(m);
                if !custom.is_affine() {
                    log::warn!("custom matrix is not affine; bottom row is {:?}", m[2]);
                }
                custom
            }
        };

        match self.pivot() {
            Some(p) => Mat3::around_point(primitive, p.x, p.y),
            None => primitive,
        }
    }

    fn pivot(&self) -> Option<Point> {
        match *self {
            TransformDesc::Rotation { pivot, .. }
            | TransformDesc::Scaling { pivot, .. }
            | TransformDesc::Shear { pivot, .. }
            | TransformDesc::Reflection { pivot, .. } => pivot,
            TransformDesc::Identity
            | TransformDesc::Translation { .. }
            | TransformDesc::Custom { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDesc {
    pub exterior: FlatVerts,
    #[serde(default)]
    pub holes: Vec<FlatVerts>,
}

impl ShapeDesc {
    pub fn unit_square() -> Self {
        Self {
            exterior: vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0],
            holes: Vec::new(),
        }
    }

    /// Every ring as world points, exterior first. A trailing odd coordinate
    /// is ignored.
    pub fn rings(&self) -> impl Iterator<Item = Vec<Point>> + '_ {
        std::iter::once(&self.exterior)
            .chain(self.holes.iter())
            .map(|flat| {
                flat.chunks_exact(2)
                    .map(|xy| Point::new(xy[0], xy[1]))
                    .collect::<Vec<Point>>()
            })
    }

    /// Vertices of every ring, holes included.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        self.rings().flatten()
    }

    /// Maps every ring through `xform`, then into fixed-point units
    /// (`units_per_one` integer units per world unit).
    ///
    /// Rings with fewer than three vertices, or with a vertex whose image is
    /// not finite, are dropped. Finite images are clamped to `FIXED_LIMIT`.
    pub fn to_shape(&self, xform: &Mat3, units_per_one: f64) -> Shape {
        let paths = self
            .rings()
            .filter(|ring| ring.len() >= 3)
            .filter_map(|ring| {
                let mapped: Option<Vec<IntPoint>> = ring
                    .iter()
                    .map(|&p| to_fixed(p, xform.transform_point(p), units_per_one))
                    .collect();
                mapped.map(IntPath::new)
            })
            .collect();

        Shape::new(paths)
    }
}

// Largest fixed-point magnitude kept exact through f64 (2^52).
const FIXED_LIMIT: f64 = 4_503_599_627_370_496.0;

fn to_fixed(src: Point, mapped: Point, units_per_one: f64) -> Option<IntPoint> {
    let fixed = Point::new(mapped.x * units_per_one, mapped.y * units_per_one);
    if !fixed.is_finite() {
        log::warn!("dropping ring: vertex {src} maps to {mapped}");
        return None;
    }
    let clamp = |v: f64| v.round().clamp(-FIXED_LIMIT, FIXED_LIMIT) as i64;
    Some(IntPoint::from_scaled(clamp(fixed.x), clamp(fixed.y)))
}

/// A transform chain plus the geometry to push through it.
///
/// `chain` is listed in composition order: the composed matrix is
/// `chain[0] * chain[1] * ... * chain[n-1]`, so the last entry acts on a
/// point first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainDesc {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeDesc>,
    #[serde(default)]
    pub chain: Vec<TransformDesc>,
}

impl ChainDesc {
    /// The hardcoded driver scenario: `(1, 1)` through
    /// `T(2, 3) * R(45) * S(2, 2) * Sh(1, 0) * Refl(over_x)`.
    pub fn demo() -> Self {
        Self {
            points: vec![Point::new(1.0, 1.0)],
            shape: None,
            chain: vec![
                TransformDesc::Translation { tx: 2.0, ty: 3.0 },
                TransformDesc::Rotation { angle: 45.0, pivot: None },
                TransformDesc::Scaling { sx: 2.0, sy: 2.0, pivot: None },
                TransformDesc::Shear { shx: 1.0, shy: 0.0, pivot: None },
                TransformDesc::Reflection { over_x: true, over_y: false, pivot: None },
            ],
        }
    }

    pub fn composed(&self) -> Mat3 {
        let m = self
            .chain
            .iter()
            .fold(Mat3::identity(), |acc, t| acc * t.to_mat3());
        log::debug!("composed {} transform(s) into\n{m}", self.chain.len());
        m
    }
}

pub fn parse_chain_json(json_text: &str) -> Result<ChainDesc> {
    Ok(serde_json::from_str(json_text)?)
}

pub fn load_chain_json<P: AsRef<Path>>(path: P) -> Result<ChainDesc> {
    parse_chain_json(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_helpers::{assert_mat_near, assert_point_near};
    use std::f64::consts::SQRT_2;

    #[test]
    fn chain_json_deserializes_every_op() {
        let sample = r#"
        {
            "points": [{ "x": 1, "y": 1 }, { "x": -2, "y": 0.5 }],
            "shape": { "exterior": [0,0, 1,0, 1,1, 0,1] },
            "chain": [
                { "op": "identity" },
                { "op": "translation", "tx": 2, "ty": 3 },
                { "op": "rotation", "angle": 45 },
                { "op": "rotation", "angle": 30, "pivot": { "x": 1, "y": 1 } },
                { "op": "scaling", "sx": 2, "sy": 0.5 },
                { "op": "shear", "shx": 1, "shy": 0, "pivot": { "x": 0, "y": 2 } },
                { "op": "reflection", "over_x": true },
                { "op": "custom", "m": [[1,0,0],[0,1,0],[0,0,1]] }
            ]
        }
        "#;

        let desc = parse_chain_json(sample).expect("sample json should deserialize");
        assert_eq!(desc.points.len(), 2);
        assert_eq!(desc.points[1], Point::new(-2.0, 0.5));
        assert_eq!(desc.shape.as_ref().map(|s| s.holes.len()), Some(0));
        assert_eq!(desc.chain.len(), 8);
        assert_eq!(
            desc.chain[3],
            TransformDesc::Rotation { angle: 30.0, pivot: Some(Point::new(1.0, 1.0)) }
        );
        assert_eq!(
            desc.chain[6],
            TransformDesc::Reflection { over_x: true, over_y: false, pivot: None }
        );
    }

    #[test]
    fn unknown_op_is_rejected() {
        let err = parse_chain_json(r#"{ "chain": [{ "op": "perspective" }] }"#);
        assert!(matches!(err, Err(Error::Json(_))), "got {err:?}");
    }

    #[test]
    fn empty_chain_composes_to_identity() {
        let desc = parse_chain_json("{}").unwrap();
        assert!(desc.points.is_empty());
        assert_eq!(desc.composed(), Mat3::identity());
    }

    #[test]
    fn pivot_selects_around_point_factories() {
        let cases = [
            (
                TransformDesc::Rotation { angle: 30.0, pivot: Some(Point::new(1.0, 2.0)) },
                Mat3::rotation_around_point(30.0, 1.0, 2.0),
            ),
            (
                TransformDesc::Scaling { sx: 2.0, sy: 3.0, pivot: Some(Point::new(-1.0, 0.0)) },
                Mat3::scaling_around_point(2.0, 3.0, -1.0, 0.0),
            ),
            (
                TransformDesc::Shear { shx: 0.5, shy: 0.0, pivot: Some(Point::new(0.0, 4.0)) },
                Mat3::shear_around_point(0.5, 0.0, 0.0, 4.0),
            ),
            (
                TransformDesc::Reflection {
                    over_x: false,
                    over_y: true,
                    pivot: Some(Point::new(3.0, 3.0)),
                },
                Mat3::reflection_around_point(false, true, 3.0, 3.0),
            ),
        ];
        for (desc, expected) in cases {
            assert_mat_near(&desc.to_mat3(), &expected, 1e-12);
        }
    }

    #[test]
    fn demo_chain_matches_direct_api() {
        let desc = ChainDesc::demo();
        let direct = Mat3::translation(2.0, 3.0)
            * Mat3::rotation(45.0)
            * Mat3::scaling(2.0, 2.0)
            * Mat3::shear(1.0, 0.0)
            * Mat3::reflection(true, false);

        let composed = desc.composed();
        assert_eq!(composed, direct);
        assert_point_near(
            composed * desc.points[0],
            Point::new(2.0 + SQRT_2, 3.0 - SQRT_2),
            1e-12,
        );
    }

    #[test]
    fn demo_chain_survives_json_round_trip() {
        let json = serde_json::to_string(&ChainDesc::demo()).unwrap();
        let back = parse_chain_json(&json).unwrap();
        assert_eq!(back, ChainDesc::demo());
    }

    #[test]
    fn shape_area_scales_by_determinant() {
        let square = ShapeDesc {
            exterior: vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0],
            holes: vec![vec![2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 4.0, 2.0]],
        };
        let base = square.to_shape(&Mat3::identity(), 1.0).signed_area();
        assert_eq!(base, 100.0 - 4.0);

        let scaled = square.to_shape(&Mat3::scaling(3.0, 2.0), 1.0).signed_area();
        assert_eq!(scaled, base * 6.0);

        let reflected = square.to_shape(&Mat3::reflection(true, false), 1.0).signed_area();
        assert_eq!(reflected, -base);
    }

    #[test]
    fn to_shape_applies_fixed_point_scale() {
        let shape = ShapeDesc::unit_square().to_shape(&Mat3::translation(0.5, 0.0), 100.0);
        let ext = shape.iter().next().expect("exterior path should exist");
        let pts: Vec<(i64, i64)> = ext.iter().map(|pt| (pt.x_scaled(), pt.y_scaled())).collect();
        assert_eq!(pts, vec![(50, 0), (150, 0), (150, 100), (50, 100)]);
    }

    #[test]
    fn to_shape_drops_short_and_degenerate_rings() {
        let desc = ShapeDesc {
            exterior: vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 7.0],
            holes: vec![vec![0.0, 0.0, 1.0, 1.0]],
        };
        let shape = desc.to_shape(&Mat3::identity(), 1.0);
        assert_eq!(shape.len(), 1, "odd trailing value is ignored, short hole is dropped");
        assert_eq!(shape.iter().next().map(|p| p.len()), Some(3));

        // Every vertex with x = 0 hits w = 0 under this matrix.
        let projective = Mat3::custom(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0);
        assert!(ShapeDesc::unit_square().to_shape(&projective, 1.0).is_empty());
    }

    #[test]
    fn vertices_include_holes() {
        let desc = ShapeDesc {
            exterior: vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            holes: vec![vec![40.0, 0.2, 0.5, 0.5, 0.2, 0.2]],
        };
        let verts: Vec<Point> = desc.vertices().collect();
        assert_eq!(verts.len(), 6);
        assert!(verts.contains(&Point::new(40.0, 0.2)));
    }

    #[test]
    fn to_shape_clamps_huge_finite_images() {
        let desc = ShapeDesc {
            exterior: vec![0.0, 0.0, 1e300, 0.0, 0.0, 1.0],
            holes: Vec::new(),
        };
        let shape = desc.to_shape(&Mat3::identity(), 1000.0);
        let ext = shape.iter().next().expect("exterior path should exist");
        let xs: Vec<i64> = ext.iter().map(|pt| pt.x_scaled()).collect();
        assert_eq!(xs, vec![0, FIXED_LIMIT as i64, 0]);
    }

    #[test]
    fn load_chain_json_reads_file_and_reports_io() {
        let path = std::env::temp_dir().join(format!("homog2d_chain_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&ChainDesc::demo()).unwrap()).unwrap();
        let loaded = load_chain_json(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.unwrap(), ChainDesc::demo());

        let missing = load_chain_json(std::env::temp_dir().join("homog2d_no_such_chain.json"));
        assert!(matches!(missing, Err(Error::Io(_))), "got {missing:?}");
    }
}
