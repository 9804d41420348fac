use nalgebra::{Vector2, Vector3};

use crate::math::affine::Point;

use super::{ConversionError, ModelMeta, ToObj, ToVec};

/// Magnitude below which a homogeneous coordinate is treated as zero.
pub const PROJECTIVE_EPSILON: f64 = 1e-12;

/// Projective model of the plane.
///
/// A planar point `(x, y)` is stored as the homogeneous vector `(x, y, 1)`.
/// Any vector `(X, Y, w)` with a non-vanishing `w` represents the point
/// `(X / w, Y / w)`. Points are read and returned in canonic coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Projective;

impl ModelMeta for Projective {
    const STORDIM: usize = 3;
}

impl ToVec<Point<2>, 3> for Projective {
    fn to_vec(&self, point: &Point<2>) -> Result<Vector3<f64>, ConversionError> {
        let coords = point.canonical_coords();
        Ok(Vector3::new(coords.x, coords.y, 1.0))
    }
}

impl ToObj<Point<2>, 3> for Projective {
    fn to_obj(&self, vec: &Vector3<f64>) -> Result<Point<2>, ConversionError> {
        let w = vec[2];
        if w.is_nan() || w.abs() <= PROJECTIVE_EPSILON {
            return Err(ConversionError::PointAtInfinity);
        }
        Ok(Point::canonical(Vector2::new(vec[0] / w, vec[1] / w)))
    }
}
