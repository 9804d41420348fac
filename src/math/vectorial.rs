//! Vectorial tools.

use nalgebra::{Const, DimMin, SMatrix, SVector, Vector2, Vector3};
use tracing::debug;

use super::ConstructionError;

/// Tolerance on the squared determinant below which a basis is singular.
pub const DUMMY_PRECISION: f64 = 1e-12;

/// Basis of a `D`-dimensional vector space.
///
/// The basis stores its matrix (basis vectors as columns, expressed in the
/// canonic basis) together with the inverse matrix (canonic basis expressed in
/// this basis). A `Basis` is immutable once built.
///
/// # Example
///
/// ```
/// use nalgebra::Vector2;
/// use twine_skeleton::math::vectorial::Basis;
///
/// let basis = Basis::new_2d(Vector2::new(2.0, 0.0), Vector2::new(0.0, 4.0)).unwrap();
/// assert_eq!(basis.inverse_matrix()[(1, 1)], 0.25);
///
/// assert!(Basis::new_2d(Vector2::new(1.0, 1.0), Vector2::new(2.0, 2.0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis<const D: usize> {
    matrix: SMatrix<f64, D, D>,
    matrix_inv: SMatrix<f64, D, D>,
}

impl<const D: usize> Basis<D> {
    /// Returns the canonic basis.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: SMatrix::identity(),
            matrix_inv: SMatrix::identity(),
        }
    }

    /// Builds a basis from a full-rank matrix whose columns are the basis vectors.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::SingularBasis`] if the determinant is not
    /// finite or its square does not exceed [`DUMMY_PRECISION`].
    pub fn new(matrix: SMatrix<f64, D, D>) -> Result<Self, ConstructionError>
    where
        Const<D>: DimMin<Const<D>, Output = Const<D>>,
    {
        let determinant = matrix.determinant();
        if !determinant.is_finite() || determinant * determinant <= DUMMY_PRECISION {
            debug!(determinant, dim = D, "rejected singular basis");
            return Err(ConstructionError::SingularBasis { determinant });
        }

        let matrix_inv = matrix
            .try_inverse()
            .ok_or(ConstructionError::SingularBasis { determinant })?;

        Ok(Self { matrix, matrix_inv })
    }

    /// Builds a basis from its `D` column vectors.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::SingularBasis`] if the vectors are
    /// (numerically) linearly dependent.
    pub fn from_columns(columns: &[SVector<f64, D>; D]) -> Result<Self, ConstructionError>
    where
        Const<D>: DimMin<Const<D>, Output = Const<D>>,
    {
        Self::new(SMatrix::from_columns(columns))
    }

    /// Basis matrix in the canonic basis.
    #[must_use]
    pub fn matrix(&self) -> &SMatrix<f64, D, D> {
        &self.matrix
    }

    /// Canonic basis matrix in this basis.
    #[must_use]
    pub fn inverse_matrix(&self) -> &SMatrix<f64, D, D> {
        &self.matrix_inv
    }
}

impl<const D: usize> Default for Basis<D> {
    fn default() -> Self {
        Self::identity()
    }
}

impl Basis<2> {
    /// Builds a 2D basis from two vectors.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::SingularBasis`] if the vectors are collinear.
    pub fn new_2d(vec1: Vector2<f64>, vec2: Vector2<f64>) -> Result<Self, ConstructionError> {
        Self::from_columns(&[vec1, vec2])
    }
}

impl Basis<3> {
    /// Builds a 3D basis from three vectors.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::SingularBasis`] if the vectors are coplanar.
    pub fn new_3d(
        vec1: Vector3<f64>,
        vec2: Vector3<f64>,
        vec3: Vector3<f64>,
    ) -> Result<Self, ConstructionError> {
        Self::from_columns(&[vec1, vec2, vec3])
    }
}
