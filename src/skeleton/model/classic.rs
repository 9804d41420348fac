use std::sync::Arc;

use crate::math::affine::{Frame, Hypersphere, Point};

use super::{ConversionError, ModelMeta, Stor, ToObj, ToVec};

/// Classic skeletal model: points and hyperspheres in a `D`-dimensional
/// affine space.
///
/// Storage vectors have `D + 1` entries: the `D` coordinates of the point (or
/// of the hypersphere center) in the model frame, followed by the radius.
/// Points are stored with a zero radius.
///
/// Conversions are implemented for any storage dimension `S`; using one other
/// than `D + 1` fails at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct Classic<const D: usize> {
    frame: Arc<Frame<D>>,
}

impl<const D: usize> Classic<D> {
    /// Creates a model whose storage vectors are expressed in `frame`.
    #[must_use]
    pub fn new(frame: Arc<Frame<D>>) -> Self {
        Self { frame }
    }

    #[must_use]
    pub fn with_frame(frame: Frame<D>) -> Self {
        Self::new(Arc::new(frame))
    }

    #[must_use]
    pub fn frame(&self) -> &Arc<Frame<D>> {
        &self.frame
    }

    fn point<const S: usize>(&self, vec: &Stor<S>) -> Point<D> {
        Point::new(vec.fixed_rows::<D>(0).into_owned(), Arc::clone(&self.frame))
    }

    fn store<const S: usize>(&self, point: &Point<D>, scalar: f64) -> Stor<S> {
        let local = point.expressed_in(&self.frame);
        let mut vec = Stor::<S>::zeros();
        vec.fixed_rows_mut::<D>(0).copy_from(local.coords());
        vec[D] = scalar;
        vec
    }
}

impl<const D: usize> Default for Classic<D> {
    fn default() -> Self {
        Self::with_frame(Frame::canonical())
    }
}

impl<const D: usize> ModelMeta for Classic<D> {
    const STORDIM: usize = D + 1;
}

impl<const D: usize, const S: usize> ToVec<Point<D>, S> for Classic<D> {
    fn to_vec(&self, point: &Point<D>) -> Result<Stor<S>, ConversionError> {
        const { assert!(S == D + 1, "classic storage holds D coordinates and a radius") };
        Ok(self.store(point, 0.0))
    }
}

impl<const D: usize, const S: usize> ToObj<Point<D>, S> for Classic<D> {
    fn to_obj(&self, vec: &Stor<S>) -> Result<Point<D>, ConversionError> {
        const { assert!(S == D + 1, "classic storage holds D coordinates and a radius") };
        Ok(self.point(vec))
    }
}

impl<const D: usize, const S: usize> ToVec<Hypersphere<D>, S> for Classic<D> {
    fn to_vec(&self, sphere: &Hypersphere<D>) -> Result<Stor<S>, ConversionError> {
        const { assert!(S == D + 1, "classic storage holds D coordinates and a radius") };
        Ok(self.store(sphere.center(), sphere.radius()))
    }
}

impl<const D: usize, const S: usize> ToObj<Hypersphere<D>, S> for Classic<D> {
    fn to_obj(&self, vec: &Stor<S>) -> Result<Hypersphere<D>, ConversionError> {
        const { assert!(S == D + 1, "classic storage holds D coordinates and a radius") };
        Ok(Hypersphere::new(self.point(vec), vec[D])?)
    }
}
