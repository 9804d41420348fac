use std::{convert::Infallible, fmt, sync::Arc};

use nalgebra::{SVector, Vector1};
use tracing::trace;
use twine_core::Model;

use crate::math::{
    ConstructionError,
    application::{Application, Bspline},
};

use super::model::{ConversionError, ModelMeta, Stor, ToObj};

/// Shared handle on a branch, as held by skeletons.
pub type SharedBranch<M, const S: usize> = Arc<GraphBranch<M, S>>;

/// Continuous piece of a skeleton.
///
/// A branch maps a scalar parameter `t` in its [`range`](GraphBranch::range)
/// to a storage vector of dimension `S` through a differentiable map. The
/// model `M` gives those vectors a geometric meaning; its storage dimension
/// must be `S`, which is checked at compile time.
///
/// Branches are immutable once built and are meant to be shared (see
/// [`SharedBranch`]): the model and the map are reference counted, so cloning
/// a branch is cheap.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use nalgebra::{Matrix4xX, RowDVector};
/// use twine_skeleton::math::{affine::Hypersphere, application::Bspline};
/// use twine_skeleton::skeleton::{ReconstructionBranch, model::Classic};
///
/// // A cone: unit sphere at the origin shrinking to a point at x = 2.
/// let ctrlpt = Matrix4xX::from_column_slice(&[0.0, 0.0, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0]);
/// let nodes = RowDVector::from_row_slice(&[0.0, 1.0]);
/// let curve = Bspline::new(ctrlpt, nodes, 1).unwrap();
///
/// let branch = ReconstructionBranch::from_bspline(Arc::new(Classic::default()), curve);
/// let sphere: Hypersphere<3> = branch.object_at(0.5).unwrap();
/// assert_eq!(sphere.radius(), 0.5);
/// assert_eq!(sphere.canonical_center()[0], 1.0);
/// ```
pub struct GraphBranch<M, const S: usize> {
    model: Arc<M>,
    function: Arc<dyn Application<S, 1> + Send + Sync>,
    start: f64,
    end: f64,
}

impl<M: ModelMeta, const S: usize> GraphBranch<M, S> {
    /// Creates a branch from a map defined on `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::ParameterRange`] unless `start < end` and
    /// both bounds are finite.
    pub fn new<F>(model: Arc<M>, function: F, start: f64, end: f64) -> Result<Self, ConstructionError>
    where
        F: Application<S, 1> + Send + Sync + 'static,
    {
        Self::from_shared(model, Arc::new(function), start, end)
    }

    /// Creates a branch from a map shared with other owners.
    ///
    /// # Errors
    ///
    /// Same as [`GraphBranch::new`].
    pub fn from_shared(
        model: Arc<M>,
        function: Arc<dyn Application<S, 1> + Send + Sync>,
        start: f64,
        end: f64,
    ) -> Result<Self, ConstructionError> {
        const {
            assert!(
                M::STORDIM == S,
                "branch storage dimension must be the model storage dimension"
            );
        };

        if !(start.is_finite() && end.is_finite() && start < end) {
            return Err(ConstructionError::ParameterRange { start, end });
        }

        Ok(Self {
            model,
            function,
            start,
            end,
        })
    }

    /// Creates a branch over the whole domain of a B-spline.
    #[must_use]
    pub fn from_bspline(model: Arc<M>, curve: Bspline<S>) -> Self {
        const {
            assert!(
                M::STORDIM == S,
                "branch storage dimension must be the model storage dimension"
            );
        };

        let (start, end) = curve.domain();
        Self {
            model,
            function: Arc::new(curve),
            start,
            end,
        }
    }

    #[must_use]
    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    /// Map from the parameter to storage vectors.
    #[must_use]
    pub fn function(&self) -> &Arc<dyn Application<S, 1> + Send + Sync> {
        &self.function
    }

    /// Parameter interval `(start, end)`.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Whether `t` lies in the parameter range.
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Storage vector at parameter `t`.
    ///
    /// Parameters outside the range are passed to the map unchanged; maps such
    /// as [`Bspline`] clamp them.
    #[must_use]
    pub fn evaluate_at(&self, t: f64) -> Stor<S> {
        self.function.evaluate(&Vector1::new(t))
    }

    /// Derivative of the storage vector with respect to `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Stor<S> {
        self.function.jacobian(&Vector1::new(t))
    }

    /// Object represented at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if the storage vector at `t` is not a
    /// valid `Obj`.
    pub fn object_at<Obj>(&self, t: f64) -> Result<Obj, ConversionError>
    where
        M: ToObj<Obj, S>,
    {
        self.model.to_obj(&self.evaluate_at(t))
    }

    /// `samples` parameters evenly spread over the range, both ends included.
    #[must_use]
    pub fn parameters(&self, samples: usize) -> Vec<f64> {
        match samples {
            0 => Vec::new(),
            1 => vec![self.start],
            _ => {
                let last = samples - 1;
                (0..samples)
                    .map(|i| {
                        if i == last {
                            self.end
                        } else {
                            self.start + (self.end - self.start) * (i as f64 / last as f64)
                        }
                    })
                    .collect()
            }
        }
    }

    /// Objects at `samples` parameters evenly spread over the range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`] raised by a sample.
    pub fn discretize<Obj>(&self, samples: usize) -> Result<Vec<Obj>, ConversionError>
    where
        M: ToObj<Obj, S>,
    {
        trace!(samples, start = self.start, end = self.end, "discretizing branch");
        self.parameters(samples)
            .into_iter()
            .map(|t| self.object_at(t))
            .collect()
    }
}

impl<M, const S: usize> Clone for GraphBranch<M, S> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            function: Arc::clone(&self.function),
            start: self.start,
            end: self.end,
        }
    }
}

impl<M: fmt::Debug, const S: usize> fmt::Debug for GraphBranch<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBranch")
            .field("model", &self.model)
            .field("start", &self.start)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

/// Branches are maps themselves and can be composed.
impl<M, const S: usize> Application<S, 1> for GraphBranch<M, S> {
    fn evaluate(&self, input: &SVector<f64, 1>) -> SVector<f64, S> {
        self.function.evaluate(input)
    }

    fn jacobian(&self, input: &SVector<f64, 1>) -> SVector<f64, S> {
        self.function.jacobian(input)
    }
}

/// A branch is a [`Model`] from the parameter to the storage vector.
impl<M: ModelMeta, const S: usize> Model for GraphBranch<M, S> {
    type Input = f64;
    type Output = Stor<S>;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self.evaluate_at(*input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::{Matrix4xX, RowDVector, Vector3, Vector4};
    use proptest::prelude::*;

    use crate::{
        math::{
            affine::{Hypersphere, Point},
            application::LinearApp,
        },
        skeleton::model::{Classic, Projective},
    };

    fn cone() -> GraphBranch<Classic<3>, 4> {
        let ctrlpt = Matrix4xX::from_columns(&[
            Vector4::new(0.0, 0.0, 0.0, 1.0),
            Vector4::new(2.0, 0.0, 0.0, 0.0),
        ]);
        let nodes = RowDVector::from_row_slice(&[0.0, 1.0]);
        let curve = Bspline::new(ctrlpt, nodes, 1).unwrap();
        GraphBranch::from_bspline(Arc::new(Classic::default()), curve)
    }

    #[test]
    fn range_comes_from_the_bspline_domain() {
        let branch = cone();
        assert_eq!(branch.range(), (0.0, 1.0));
        assert!(branch.contains(0.5));
        assert!(!branch.contains(1.5));
    }

    #[test]
    fn objects_along_the_branch() {
        let branch = cone();

        let sphere: Hypersphere<3> = branch.object_at(0.25).unwrap();
        assert_relative_eq!(sphere.canonical_center(), Vector3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(sphere.radius(), 0.75);

        let center: Point<3> = branch.object_at(0.25).unwrap();
        assert_eq!(center, *sphere.center());

        assert_relative_eq!(branch.tangent_at(0.5), Vector4::new(2.0, 0.0, 0.0, -1.0));
    }

    #[test]
    fn discretize_includes_both_ends() {
        let branch = cone();
        let spheres: Vec<Hypersphere<3>> = branch.discretize(5).unwrap();

        assert_eq!(spheres.len(), 5);
        assert_eq!(spheres[0].radius(), 1.0);
        assert_eq!(spheres[4].radius(), 0.0);
        assert_relative_eq!(spheres[2].canonical_center(), Vector3::new(1.0, 0.0, 0.0));

        assert!(branch.discretize::<Point<3>>(0).unwrap().is_empty());
        assert_eq!(branch.parameters(1), vec![0.0]);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        let model = Arc::new(Projective);

        for (start, end) in [(1.0, 1.0), (2.0, 1.0), (0.0, f64::INFINITY), (f64::NAN, 1.0)] {
            let res = GraphBranch::<_, 3>::new(
                Arc::clone(&model),
                LinearApp::new(Vector3::new(1.0, 1.0, 1.0)),
                start,
                end,
            );
            assert!(matches!(
                res.unwrap_err(),
                ConstructionError::ParameterRange { .. }
            ));
        }
    }

    #[test]
    fn projective_branch_from_a_linear_map() {
        // t ↦ (t, 2t, 1 + t), the planar curve (t / (1 + t), 2t / (1 + t)).
        let lifted = Lifted(LinearApp::new(Vector3::new(1.0, 2.0, 1.0)));
        let branch = GraphBranch::new(Arc::new(Projective), lifted, 0.0, 1.0).unwrap();

        let point: Point<2> = branch.object_at(1.0).unwrap();
        assert_relative_eq!(point.coords().x, 0.5);
        assert_relative_eq!(point.coords().y, 1.0);
    }

    /// Affine lift `t ↦ A·t + (0, 0, 1)`.
    struct Lifted(LinearApp<3, 1>);

    impl Application<3, 1> for Lifted {
        fn evaluate(&self, input: &SVector<f64, 1>) -> SVector<f64, 3> {
            self.0.evaluate(input) + Vector3::z()
        }

        fn jacobian(&self, input: &SVector<f64, 1>) -> SVector<f64, 3> {
            self.0.jacobian(input)
        }
    }

    #[test]
    fn branch_is_a_model() {
        let branch = cone();
        assert_eq!(branch.call(&0.5).unwrap(), Vector4::new(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn clones_share_the_map() {
        let branch = cone();
        let copy = branch.clone();
        assert!(Arc::ptr_eq(branch.function(), copy.function()));
        assert!(Arc::ptr_eq(branch.model(), copy.model()));
    }

    proptest! {
        #[test]
        fn parameters_stay_in_range(samples in 2usize..200) {
            let branch = cone();
            let params = branch.parameters(samples);
            prop_assert_eq!(params.len(), samples);
            prop_assert!(params.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(params.iter().all(|&t| branch.contains(t)));
        }
    }
}
