mod basis;

use nalgebra::{Const, Dyn, OMatrix, RowDVector, SMatrix, SVector};
use tracing::debug;

use crate::{
    math::ConstructionError,
    support::constraint::{Constrained, NonDecreasing},
};

use super::Application;

pub use basis::{bspline_basis, bspline_basis_derivative};

use basis::Knots;

/// B-spline curve from a scalar parameter to a `D`-dimensional point.
///
/// The curve is defined by a control-point matrix (`D × N`), a non-decreasing
/// node vector (`1 × M`) and a degree `d`, with `N + d = M + 1`. See
/// [`bspline_basis`] for the node vector convention.
///
/// # Domain
///
/// The curve is defined on [`domain`](Bspline::domain), which is
/// `[first node, last node]` for clamped node vectors. Parameters outside the
/// domain are clamped to it: the curve extends as a constant, and its Jacobian
/// there is zero.
///
/// # Example
///
/// ```
/// use nalgebra::{Matrix2xX, RowDVector, Vector2};
/// use twine_skeleton::math::application::{Bspline, Curve};
///
/// // Quadratic Bézier arc.
/// let ctrlpt = Matrix2xX::from_column_slice(&[0.0, 0.0, 1.0, 2.0, 2.0, 0.0]);
/// let nodes = RowDVector::from_row_slice(&[0.0, 0.0, 1.0, 1.0]);
/// let curve = Bspline::new(ctrlpt, nodes, 2).unwrap();
///
/// assert_eq!(curve.domain(), (0.0, 1.0));
/// assert_eq!(curve.evaluate_at(0.5), Vector2::new(1.0, 1.0));
/// assert_eq!(curve.evaluate_at(2.0), Vector2::new(2.0, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Bspline<const D: usize> {
    ctrlpt: OMatrix<f64, Const<D>, Dyn>,
    nodevec: Constrained<RowDVector<f64>, NonDecreasing>,
    degree: usize,
}

impl<const D: usize> Bspline<D> {
    /// Creates a B-spline curve.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if:
    /// - there is no control point, or the node vector is empty,
    /// - `#ctrlpt + degree ≠ #nodes + 1`,
    /// - the node vector is not finite and non-decreasing,
    /// - the resulting domain is empty.
    pub fn new(
        ctrlpt: OMatrix<f64, Const<D>, Dyn>,
        nodevec: RowDVector<f64>,
        degree: usize,
    ) -> Result<Self, ConstructionError> {
        let control_points = ctrlpt.ncols();
        let nodes = nodevec.ncols();

        if control_points == 0 {
            return Err(ConstructionError::NoControlPoints);
        }
        if nodes == 0 {
            return Err(ConstructionError::EmptyNodeVector);
        }
        if control_points.checked_add(degree) != Some(nodes + 1) {
            debug!(control_points, degree, nodes, "rejected b-spline counts");
            return Err(ConstructionError::ControlPointCount {
                control_points,
                degree,
                nodes,
            });
        }

        let nodevec = NonDecreasing::new(nodevec)?;

        let (start, end) = Knots::new(nodevec.as_ref().as_slice(), degree).domain();
        if start >= end {
            debug!(start, end, "rejected b-spline with empty domain");
            return Err(ConstructionError::ParameterRange { start, end });
        }

        Ok(Self {
            ctrlpt,
            nodevec,
            degree,
        })
    }

    /// Control points, one per column.
    #[must_use]
    pub fn ctrlpt(&self) -> &OMatrix<f64, Const<D>, Dyn> {
        &self.ctrlpt
    }

    #[must_use]
    pub fn nodevec(&self) -> &RowDVector<f64> {
        self.nodevec.as_ref()
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Parameter interval on which the curve is defined.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        self.knots().domain()
    }

    /// Weights of every control point at parameter `t` (clamped to the domain).
    ///
    /// Inside the domain the weights sum to one.
    #[must_use]
    pub fn basis(&self, t: f64) -> Vec<f64> {
        self.knots().values(self.clamp(t))
    }

    fn knots(&self) -> Knots<'_> {
        Knots::new(self.nodevec().as_slice(), self.degree)
    }

    fn clamp(&self, t: f64) -> f64 {
        let (start, end) = self.domain();
        t.clamp(start, end)
    }

    fn weighted_sum(&self, weights: &[f64]) -> SVector<f64, D> {
        let mut res = SVector::<f64, D>::zeros();
        for (column, weight) in self.ctrlpt.column_iter().zip(weights) {
            res += column * *weight;
        }
        res
    }
}

impl<const D: usize> Application<D, 1> for Bspline<D> {
    fn evaluate(&self, input: &SVector<f64, 1>) -> SVector<f64, D> {
        self.weighted_sum(&self.basis(input[0]))
    }

    fn jacobian(&self, input: &SVector<f64, 1>) -> SMatrix<f64, D, 1> {
        let t = input[0];
        let (start, end) = self.domain();
        if t < start || t > end {
            return SMatrix::zeros();
        }
        self.weighted_sum(&self.knots().derivatives(t))
    }
}
