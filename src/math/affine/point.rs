use std::sync::Arc;

use nalgebra::SVector;

use super::Frame;

/// Point of a `D`-dimensional affine space, expressed in a shared [`Frame`].
#[derive(Debug, Clone)]
pub struct Point<const D: usize> {
    coords: SVector<f64, D>,
    frame: Arc<Frame<D>>,
}

impl<const D: usize> Point<D> {
    /// Creates a point from its coordinates in `frame`.
    #[must_use]
    pub fn new(coords: SVector<f64, D>, frame: Arc<Frame<D>>) -> Self {
        Self { coords, frame }
    }

    /// Creates a point from canonic coordinates.
    #[must_use]
    pub fn canonical(coords: SVector<f64, D>) -> Self {
        Self::new(coords, Arc::new(Frame::canonical()))
    }

    /// Coordinates in the point's own frame.
    #[must_use]
    pub fn coords(&self) -> &SVector<f64, D> {
        &self.coords
    }

    #[must_use]
    pub fn frame(&self) -> &Arc<Frame<D>> {
        &self.frame
    }

    #[must_use]
    pub fn canonical_coords(&self) -> SVector<f64, D> {
        self.frame.to_canonical(&self.coords)
    }

    /// Returns the same point expressed in another frame.
    ///
    /// No conversion happens when `frame` is the point's own frame.
    #[must_use]
    pub fn expressed_in(&self, frame: &Arc<Frame<D>>) -> Self {
        if same_frame(&self.frame, frame) {
            return Self::new(self.coords, Arc::clone(frame));
        }
        Self::new(frame.to_local(&self.canonical_coords()), Arc::clone(frame))
    }
}

/// Two points are equal when they have the same coordinates in equal frames.
impl<const D: usize> PartialEq for Point<D> {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords && same_frame(&self.frame, &other.frame)
    }
}

pub(crate) fn same_frame<const D: usize>(a: &Arc<Frame<D>>, b: &Arc<Frame<D>>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::math::vectorial::Basis;

    fn scaled_frame() -> Arc<Frame<3>> {
        let basis = Basis::new_3d(
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, 2.0),
        )
        .unwrap();
        Arc::new(Frame::new(Vector3::new(1.0, 0.0, 0.0), basis))
    }

    #[test]
    fn canonical_coordinates() {
        let point = Point::new(Vector3::new(1.0, 1.0, 0.5), scaled_frame());
        assert_relative_eq!(point.canonical_coords(), Vector3::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn change_of_frame_keeps_the_location() {
        let point = Point::canonical(Vector3::new(3.0, 2.0, 1.0));
        let moved = point.expressed_in(&scaled_frame());

        assert_relative_eq!(*moved.coords(), Vector3::new(1.0, 1.0, 0.5), epsilon = 1e-12);
        assert_relative_eq!(moved.canonical_coords(), point.canonical_coords(), epsilon = 1e-12);
    }

    #[test]
    fn equality_compares_frames() {
        let a = Point::canonical(Vector3::new(1.0, 2.0, 3.0));
        let b = Point::canonical(Vector3::new(1.0, 2.0, 3.0));
        let c = Point::new(Vector3::new(1.0, 2.0, 3.0), scaled_frame());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
