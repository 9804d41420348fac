//! Affine tools.
//!
//! A [`Frame`] anchors coordinates: an origin plus a [`Basis`](super::vectorial::Basis).
//! Geometric objects keep a shared handle on the frame they are expressed in,
//! so a single frame can be referenced by any number of points, models and
//! skeletons; it lives as long as its longest holder.

mod frame;
mod hypersphere;
mod point;

pub use frame::Frame;
pub use hypersphere::Hypersphere;
pub use point::Point;
