mod stage;

use nalgebra::{DMatrix, DVector, SMatrix, SVector};
use tracing::debug;

use crate::math::ConstructionError;

use super::Application;

pub use stage::Stage;

/// Composition of a chain of applications, `F1 ∘ F2 ∘ … ∘ Fn`.
///
/// Stages are given outermost first: evaluating at `x` computes
/// `F1(F2(…Fn(x)))`. The Jacobian follows the chain rule,
/// `J_F1(F2(…)) · J_F2(…) · … · J_Fn(x)`.
///
/// The chain input dimension `IN` is the input dimension of `Fn`, the output
/// dimension `OUT` that of `F1`. Adjacent dimensions are checked once at
/// construction. A compositor with a single stage behaves as that stage.
///
/// # Example
///
/// ```
/// use nalgebra::{Matrix2, Matrix2x1, Vector2};
/// use twine_skeleton::math::application::{Compositor, Curve, LinearApp, Stage};
///
/// let scale = LinearApp::new(Matrix2::new(2.0, 0.0, 0.0, 3.0));
/// let line = LinearApp::new(Matrix2x1::new(1.0, 1.0));
///
/// let chain = Compositor::<2, 1>::new(vec![Stage::new(scale), Stage::new(line)]).unwrap();
/// assert_eq!(chain.evaluate_at(1.5), Vector2::new(3.0, 4.5));
/// assert_eq!(chain.derivative_at(0.0), Vector2::new(2.0, 3.0));
/// ```
#[derive(Debug, Clone)]
pub struct Compositor<const OUT: usize, const IN: usize> {
    stages: Vec<Stage>,
}

impl<const OUT: usize, const IN: usize> Compositor<OUT, IN> {
    /// Composes `stages`, given outermost first.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::EmptyChain`] if `stages` is empty, and
    /// [`ConstructionError::ChainDimension`] if the output dimension of a stage
    /// is not the input dimension of the stage before it, or if the chain does
    /// not map `IN` to `OUT` dimensions.
    pub fn new(stages: Vec<Stage>) -> Result<Self, ConstructionError> {
        let (Some(first), Some(last)) = (stages.first(), stages.last()) else {
            return Err(ConstructionError::EmptyChain);
        };

        if first.out_dim() != OUT {
            return Err(mismatch(0, OUT, first.out_dim()));
        }

        for (index, pair) in stages.windows(2).enumerate() {
            let (outer, inner) = (&pair[0], &pair[1]);
            if inner.out_dim() != outer.in_dim() {
                return Err(mismatch(index + 1, outer.in_dim(), inner.out_dim()));
            }
        }

        if last.in_dim() != IN {
            return Err(mismatch(stages.len() - 1, IN, last.in_dim()));
        }

        Ok(Self { stages })
    }

    /// Composes two maps whose dimensions are checked by the type system.
    #[must_use]
    pub fn pair<F, G, const MID: usize>(outer: F, inner: G) -> Self
    where
        F: Application<OUT, MID> + Send + Sync + 'static,
        G: Application<MID, IN> + Send + Sync + 'static,
    {
        Self {
            stages: vec![Stage::new(outer), Stage::new(inner)],
        }
    }

    /// The composed stages, outermost first.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Outermost stage (`F1`).
    #[must_use]
    pub fn first(&self) -> &Stage {
        &self.stages[0]
    }

    /// Stages following the outermost one (`F2 ∘ … ∘ Fn`), if any.
    #[must_use]
    pub fn next(&self) -> Option<&[Stage]> {
        self.stages.get(1..).filter(|rest| !rest.is_empty())
    }
}

fn mismatch(stage: usize, expected: usize, found: usize) -> ConstructionError {
    debug!(stage, expected, found, "rejected compositor chain");
    ConstructionError::ChainDimension {
        stage,
        expected,
        found,
    }
}

impl<const OUT: usize, const IN: usize> Application<OUT, IN> for Compositor<OUT, IN> {
    fn evaluate(&self, input: &SVector<f64, IN>) -> SVector<f64, OUT> {
        let output = self
            .stages
            .iter()
            .rev()
            .fold(DVector::from_column_slice(input.as_slice()), |x, stage| {
                stage.evaluate(&x)
            });
        SVector::from_column_slice(output.as_slice())
    }

    fn jacobian(&self, input: &SVector<f64, IN>) -> SMatrix<f64, OUT, IN> {
        let mut x = DVector::from_column_slice(input.as_slice());
        let mut jac: Option<DMatrix<f64>> = None;

        for stage in self.stages.iter().rev() {
            let local = stage.jacobian(&x);
            jac = Some(match jac {
                Some(inner) => local * inner,
                None => local,
            });
            x = stage.evaluate(&x);
        }

        match jac {
            Some(jac) => SMatrix::from_column_slice(jac.as_slice()),
            None => SMatrix::zeros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Matrix3xX, RowDVector, Vector2, Vector3};
    use proptest::prelude::*;

    use crate::math::application::{Bspline, Curve, LinearApp};

    fn mat_lin() -> Matrix3<f64> {
        Matrix3::new(0.0, 2.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 3.0)
    }

    fn bsp() -> Bspline<3> {
        let ctrlpt = Matrix3xX::from_row_slice(&[
            0.0, 1.0, 1.0, 0.0, //
            0.0, 0.0, 1.0, 1.0, //
            0.0, 0.0, 0.0, 0.0,
        ]);
        let nodevec = RowDVector::from_row_slice(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        Bspline::new(ctrlpt, nodevec, 3).unwrap()
    }

    /// Lift onto a paraboloid, as a nonlinear stage.
    struct Paraboloid;

    impl Application<3, 3> for Paraboloid {
        fn evaluate(&self, x: &Vector3<f64>) -> Vector3<f64> {
            Vector3::new(x[0], x[1], x[0] * x[0] + x[1] * x[1] + x[2])
        }

        fn jacobian(&self, x: &Vector3<f64>) -> Matrix3<f64> {
            Matrix3::new(
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                2.0 * x[0], 2.0 * x[1], 1.0,
            )
        }
    }

    #[test]
    fn linear_after_bspline() {
        let comp = Compositor::<3, 1>::new(vec![
            Stage::new(LinearApp::new(mat_lin())),
            Stage::new(bsp()),
        ])
        .unwrap();
        let curve = bsp();

        for i in 0..101 {
            let t = f64::from(i) * 0.01;
            let vecres = comp.evaluate_at(t);
            let vecref = mat_lin() * curve.evaluate_at(t);
            assert!((vecres - vecref).norm() <= f64::EPSILON, "t = {t}");
        }
    }

    #[test]
    fn chain_rule() {
        let comp = Compositor::pair(LinearApp::new(mat_lin()), bsp());
        let curve = bsp();

        for i in 0..=20 {
            let t = f64::from(i) * 0.05;
            assert_relative_eq!(
                comp.derivative_at(t),
                mat_lin() * curve.derivative_at(t),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn three_stages_with_nonlinear_map() {
        let comp = Compositor::<3, 1>::new(vec![
            Stage::new(LinearApp::new(mat_lin())),
            Stage::new(Paraboloid),
            Stage::new(bsp()),
        ])
        .unwrap();
        let curve = bsp();

        for i in 0..=10 {
            let t = f64::from(i) * 0.1;
            let p = curve.evaluate_at(t);
            let expected = mat_lin() * Paraboloid.evaluate(&p);
            assert_relative_eq!(comp.evaluate_at(t), expected, epsilon = 1e-12);

            let jac = mat_lin() * Paraboloid.jacobian(&p) * curve.derivative_at(t);
            assert_relative_eq!(comp.derivative_at(t), jac, epsilon = 1e-12);
        }
    }

    #[test]
    fn single_stage_degenerates_to_the_map() {
        let comp = Compositor::<3, 1>::new(vec![Stage::new(bsp())]).unwrap();
        let curve = bsp();
        assert_eq!(comp.evaluate_at(0.3), curve.evaluate_at(0.3));
        assert_eq!(comp.derivative_at(0.3), curve.derivative_at(0.3));
        assert!(comp.next().is_none());
    }

    #[test]
    fn next_borrows_the_inner_stages() {
        let comp = Compositor::<3, 1>::new(vec![
            Stage::new(LinearApp::new(mat_lin())),
            Stage::new(Paraboloid),
            Stage::new(bsp()),
        ])
        .unwrap();

        let rest = comp.next().unwrap();
        assert_eq!(rest.len(), 2);
        assert!(rest[1].downcast_ref::<Bspline<3>>().is_some());

        let inner = Compositor::<3, 1>::new(rest.to_vec()).unwrap();
        let curve = bsp();
        assert_relative_eq!(
            inner.evaluate_at(0.3),
            Paraboloid.evaluate(&curve.evaluate_at(0.3)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn nested_compositors() {
        let inner =
            Compositor::<3, 1>::new(vec![Stage::new(Paraboloid), Stage::new(bsp())]).unwrap();
        let outer = Compositor::pair(LinearApp::new(mat_lin()), inner.clone());
        let flat = Compositor::<3, 1>::new(vec![
            Stage::new(LinearApp::new(mat_lin())),
            Stage::new(Paraboloid),
            Stage::new(bsp()),
        ])
        .unwrap();

        assert_relative_eq!(outer.evaluate_at(0.42), flat.evaluate_at(0.42), epsilon = 1e-12);
        assert_relative_eq!(outer.derivative_at(0.42), flat.derivative_at(0.42), epsilon = 1e-12);
    }

    #[test]
    fn empty_chain_is_rejected() {
        assert_eq!(
            Compositor::<3, 1>::new(Vec::new()).unwrap_err(),
            ConstructionError::EmptyChain
        );
    }

    #[test]
    fn dimension_mismatches_are_rejected() {
        let planar = LinearApp::new(nalgebra::Matrix2x3::<f64>::identity());

        // 2-D output where 3-D is expected.
        assert_eq!(
            Compositor::<3, 1>::new(vec![Stage::new(planar), Stage::new(bsp())]).unwrap_err(),
            ConstructionError::ChainDimension {
                stage: 0,
                expected: 3,
                found: 2,
            }
        );

        // Inner stage produces 3-D, outer one expects 2-D.
        let reduce = LinearApp::new(nalgebra::Matrix3x2::<f64>::identity());
        assert_eq!(
            Compositor::<3, 1>::new(vec![Stage::new(reduce), Stage::new(bsp())]).unwrap_err(),
            ConstructionError::ChainDimension {
                stage: 1,
                expected: 2,
                found: 3,
            }
        );

        // Chain input is 1-D, not 2-D.
        assert!(Compositor::<3, 2>::new(vec![Stage::new(bsp())]).is_err());
    }

    #[test]
    fn stages_are_downcastable() {
        let comp = Compositor::pair(LinearApp::new(mat_lin()), bsp());
        let [outer, inner] = comp.stages() else {
            panic!("expected two stages");
        };

        assert_eq!(outer.downcast_ref::<LinearApp<3, 3>>().unwrap().matrix(), &mat_lin());
        assert_eq!(inner.downcast_ref::<Bspline<3>>().unwrap().degree(), 3);
        assert!(inner.downcast_ref::<LinearApp<3, 3>>().is_none());
        assert_eq!((inner.out_dim(), inner.in_dim()), (3, 1));
    }

    #[test]
    fn planar_chain() {
        let rotate = LinearApp::new(nalgebra::Matrix2::new(0.0, -1.0, 1.0, 0.0));
        let line = LinearApp::new(nalgebra::Matrix2x1::new(1.0, 0.0));
        let comp = Compositor::pair(rotate, line);
        assert_eq!(comp.evaluate_at(2.0), Vector2::new(0.0, 2.0));
    }

    proptest! {
        #[test]
        fn repeated_calls_are_bit_identical(t in 0.0..=1.0f64) {
            let comp = Compositor::pair(LinearApp::new(mat_lin()), bsp());
            prop_assert_eq!(comp.evaluate_at(t), comp.evaluate_at(t));
            prop_assert_eq!(comp.derivative_at(t), comp.derivative_at(t));
        }
    }
}
