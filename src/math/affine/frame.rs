use nalgebra::SVector;

use crate::math::vectorial::Basis;

/// Affine reference frame of a `D`-dimensional space.
///
/// Local coordinates `x` map to canonic coordinates `origin + B·x`, where `B`
/// is the basis matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<const D: usize> {
    origin: SVector<f64, D>,
    basis: Basis<D>,
}

impl<const D: usize> Frame<D> {
    /// Creates a frame from its origin and basis, both in canonic coordinates.
    #[must_use]
    pub fn new(origin: SVector<f64, D>, basis: Basis<D>) -> Self {
        Self { origin, basis }
    }

    /// Returns the canonic frame (zero origin, canonic basis).
    #[must_use]
    pub fn canonical() -> Self {
        Self::new(SVector::zeros(), Basis::identity())
    }

    #[must_use]
    pub fn origin(&self) -> &SVector<f64, D> {
        &self.origin
    }

    #[must_use]
    pub fn basis(&self) -> &Basis<D> {
        &self.basis
    }

    /// Converts coordinates expressed in this frame into canonic coordinates.
    #[must_use]
    pub fn to_canonical(&self, local: &SVector<f64, D>) -> SVector<f64, D> {
        self.origin + self.basis.matrix() * local
    }

    /// Converts canonic coordinates into coordinates expressed in this frame.
    #[must_use]
    pub fn to_local(&self, canonical: &SVector<f64, D>) -> SVector<f64, D> {
        self.basis.inverse_matrix() * (canonical - self.origin)
    }
}

impl<const D: usize> Default for Frame<D> {
    fn default() -> Self {
        Self::canonical()
    }
}
