use nalgebra::SVector;

use crate::support::constraint::{Constrained, ConstraintError, NonNegative};

use super::Point;

/// Hypersphere of a `D`-dimensional affine space.
///
/// The radius is a scalar attached to the center; it is not rescaled when
/// the center is re-expressed in another frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Hypersphere<const D: usize> {
    center: Point<D>,
    radius: Constrained<f64, NonNegative>,
}

impl<const D: usize> Hypersphere<D> {
    /// Creates a hypersphere.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the radius is negative or `NaN`.
    pub fn new(center: Point<D>, radius: f64) -> Result<Self, ConstraintError> {
        Ok(Self {
            center,
            radius: NonNegative::new(radius)?,
        })
    }

    #[must_use]
    pub fn center(&self) -> &Point<D> {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        *self.radius.as_ref()
    }

    /// Canonic coordinates of the center.
    #[must_use]
    pub fn canonical_center(&self) -> SVector<f64, D> {
        self.center.canonical_coords()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra::Vector2;

    #[test]
    fn radius_must_not_be_negative() {
        let center = Point::canonical(Vector2::new(0.0, 1.0));
        assert!(Hypersphere::new(center.clone(), 0.0).is_ok());
        assert_eq!(
            Hypersphere::new(center, -1.0).unwrap_err(),
            ConstraintError::Negative
        );
    }

    #[test]
    fn accessors() {
        let sphere = Hypersphere::new(Point::canonical(Vector2::new(2.0, 1.0)), 0.75).unwrap();
        assert_eq!(sphere.radius(), 0.75);
        assert_eq!(sphere.canonical_center(), Vector2::new(2.0, 1.0));
    }
}
