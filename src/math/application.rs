//! Differentiable maps ("applications").
//!
//! An [`Application<OUT, IN>`] maps an `IN`-dimensional vector to an
//! `OUT`-dimensional vector and exposes its Jacobian, the `OUT × IN` matrix of
//! partial derivatives. Jacobians are always analytic, never finite
//! differences, so that composing maps with a [`Compositor`] yields exact
//! derivatives through the chain rule.
//!
//! Scalar parameters are the one-dimensional case (`IN = 1`); the [`Curve`]
//! extension trait offers `f64` entry points for those maps.
//!
//! # Provided maps
//!
//! - [`LinearApp`]: Constant matrix multiplication
//! - [`Bspline`]: B-spline curve from a scalar parameter to a point
//! - [`Compositor`]: Chain of maps, outermost first

mod bspline;
mod compositor;
mod linear;

use std::sync::Arc;

use nalgebra::{SMatrix, SVector, Vector1};

pub use bspline::{Bspline, bspline_basis, bspline_basis_derivative};
pub use compositor::{Compositor, Stage};
pub use linear::LinearApp;

/// A differentiable map from `IN`-dimensional to `OUT`-dimensional vectors.
///
/// Implementations must be pure: repeated calls with identical input return
/// identical results, and no call mutates the map. This makes every
/// application safely shareable across threads.
pub trait Application<const OUT: usize, const IN: usize> {
    /// Evaluates the map at `input`.
    fn evaluate(&self, input: &SVector<f64, IN>) -> SVector<f64, OUT>;

    /// Returns the Jacobian of the map at `input`.
    fn jacobian(&self, input: &SVector<f64, IN>) -> SMatrix<f64, OUT, IN>;
}

impl<A, const OUT: usize, const IN: usize> Application<OUT, IN> for &A
where
    A: Application<OUT, IN> + ?Sized,
{
    fn evaluate(&self, input: &SVector<f64, IN>) -> SVector<f64, OUT> {
        (**self).evaluate(input)
    }

    fn jacobian(&self, input: &SVector<f64, IN>) -> SMatrix<f64, OUT, IN> {
        (**self).jacobian(input)
    }
}

impl<A, const OUT: usize, const IN: usize> Application<OUT, IN> for Arc<A>
where
    A: Application<OUT, IN> + ?Sized,
{
    fn evaluate(&self, input: &SVector<f64, IN>) -> SVector<f64, OUT> {
        (**self).evaluate(input)
    }

    fn jacobian(&self, input: &SVector<f64, IN>) -> SMatrix<f64, OUT, IN> {
        (**self).jacobian(input)
    }
}

/// Scalar-parameter entry points for maps with a one-dimensional input.
///
/// Implemented for every `Application<OUT, 1>`.
///
/// # Example
///
/// ```
/// use nalgebra::{Matrix3x1, Vector3};
/// use twine_skeleton::math::application::{Curve, LinearApp};
///
/// let line = LinearApp::new(Matrix3x1::new(1.0, 2.0, 3.0));
/// assert_eq!(line.evaluate_at(2.0), Vector3::new(2.0, 4.0, 6.0));
/// assert_eq!(line.derivative_at(2.0), Vector3::new(1.0, 2.0, 3.0));
/// ```
pub trait Curve<const OUT: usize>: Application<OUT, 1> {
    /// Evaluates the map at parameter `t`.
    fn evaluate_at(&self, t: f64) -> SVector<f64, OUT> {
        self.evaluate(&Vector1::new(t))
    }

    /// Returns the derivative with respect to the parameter at `t`.
    fn derivative_at(&self, t: f64) -> SVector<f64, OUT> {
        self.jacobian(&Vector1::new(t))
    }
}

impl<A, const OUT: usize> Curve<OUT> for A where A: Application<OUT, 1> + ?Sized {}
