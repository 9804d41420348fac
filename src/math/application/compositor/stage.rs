use std::{any::Any, fmt, sync::Arc};

use nalgebra::{DMatrix, DVector, SVector};

use crate::math::application::Application;

/// Dimension-erased view of an application, used to chain maps whose
/// intermediate dimensions differ.
trait ErasedApplication: Send + Sync {
    fn in_dim(&self) -> usize;
    fn out_dim(&self) -> usize;
    fn evaluate(&self, input: &DVector<f64>) -> DVector<f64>;
    fn jacobian(&self, input: &DVector<f64>) -> DMatrix<f64>;
    fn as_any(&self) -> &dyn Any;
}

struct Erased<A, const OUT: usize, const IN: usize> {
    app: A,
}

impl<A, const OUT: usize, const IN: usize> ErasedApplication for Erased<A, OUT, IN>
where
    A: Application<OUT, IN> + Send + Sync + 'static,
{
    fn in_dim(&self) -> usize {
        IN
    }

    fn out_dim(&self) -> usize {
        OUT
    }

    fn evaluate(&self, input: &DVector<f64>) -> DVector<f64> {
        let input = SVector::<f64, IN>::from_column_slice(input.as_slice());
        DVector::from_column_slice(self.app.evaluate(&input).as_slice())
    }

    fn jacobian(&self, input: &DVector<f64>) -> DMatrix<f64> {
        let input = SVector::<f64, IN>::from_column_slice(input.as_slice());
        DMatrix::from_column_slice(OUT, IN, self.app.jacobian(&input).as_slice())
    }

    fn as_any(&self) -> &dyn Any {
        &self.app
    }
}

/// One map of a [`Compositor`](super::Compositor) chain.
///
/// A stage owns its map behind a shared pointer, so cloning a stage (or a
/// compositor) never copies the underlying map. The concrete map can be
/// recovered with [`Stage::downcast_ref`], e.g. to serialize a chain.
#[derive(Clone)]
pub struct Stage {
    inner: Arc<dyn ErasedApplication>,
}

impl Stage {
    /// Wraps an application into a stage.
    #[must_use]
    pub fn new<A, const OUT: usize, const IN: usize>(app: A) -> Self
    where
        A: Application<OUT, IN> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Erased::<A, OUT, IN> { app }),
        }
    }

    /// Input dimension of the wrapped map.
    #[must_use]
    pub fn in_dim(&self) -> usize {
        self.inner.in_dim()
    }

    /// Output dimension of the wrapped map.
    #[must_use]
    pub fn out_dim(&self) -> usize {
        self.inner.out_dim()
    }

    /// Returns the wrapped map if it is of type `A`.
    #[must_use]
    pub fn downcast_ref<A: 'static>(&self) -> Option<&A> {
        self.inner.as_any().downcast_ref::<A>()
    }

    /// Callers guarantee that `input` has `in_dim()` entries.
    pub(super) fn evaluate(&self, input: &DVector<f64>) -> DVector<f64> {
        debug_assert_eq!(input.len(), self.in_dim());
        self.inner.evaluate(input)
    }

    /// Callers guarantee that `input` has `in_dim()` entries.
    pub(super) fn jacobian(&self, input: &DVector<f64>) -> DMatrix<f64> {
        debug_assert_eq!(input.len(), self.in_dim());
        self.inner.jacobian(input)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("out_dim", &self.out_dim())
            .field("in_dim", &self.in_dim())
            .finish()
    }
}
