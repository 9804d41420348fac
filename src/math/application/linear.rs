use nalgebra::{SMatrix, SVector};

use super::Application;

/// Linear map `x ↦ M·x`.
///
/// The Jacobian is the matrix itself, independent of the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearApp<const OUT: usize, const IN: usize> {
    matrix: SMatrix<f64, OUT, IN>,
}

impl<const OUT: usize, const IN: usize> LinearApp<OUT, IN> {
    #[must_use]
    pub fn new(matrix: SMatrix<f64, OUT, IN>) -> Self {
        Self { matrix }
    }

    #[must_use]
    pub fn matrix(&self) -> &SMatrix<f64, OUT, IN> {
        &self.matrix
    }
}

impl<const OUT: usize, const IN: usize> Application<OUT, IN> for LinearApp<OUT, IN> {
    fn evaluate(&self, input: &SVector<f64, IN>) -> SVector<f64, OUT> {
        self.matrix * input
    }

    fn jacobian(&self, _input: &SVector<f64, IN>) -> SMatrix<f64, OUT, IN> {
        self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use nalgebra::{Matrix2x3, Vector2, Vector3};

    #[test]
    fn evaluation_and_constant_jacobian() {
        let matrix = Matrix2x3::new(1.0, 0.0, 2.0, 0.0, -1.0, 0.5);
        let app = LinearApp::new(matrix);

        let x = Vector3::new(1.0, 2.0, 4.0);
        assert_eq!(app.evaluate(&x), Vector2::new(9.0, 0.0));
        assert_eq!(app.jacobian(&x), matrix);
        assert_eq!(app.jacobian(&Vector3::zeros()), matrix);
    }
}
