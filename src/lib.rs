//! # Twine Skeleton
//!
//! Parametric geometric skeletons for
//! [Twine](https://github.com/isentropic-dev/twine): branches built from
//! differentiable maps and interpreted through coordinate models.
//!
//! ## Crate layout
//!
//! - [`math`]: Vector spaces, affine frames and differentiable maps
//!   ([`Bspline`](math::application::Bspline), [`Compositor`](math::application::Compositor), …).
//! - [`skeleton`]: Coordinate models, branches and skeleton graphs.
//! - [`support`]: Supporting utilities.
//!
//! ## Storage vectors
//!
//! Branches produce plain storage vectors. A model turns a storage vector into
//! a geometric object and back; its storage dimension is a compile-time
//! constant, so a branch cannot be paired with a model of another dimension.
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.

pub mod math;
pub mod skeleton;
pub mod support;
