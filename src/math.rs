//! Mathematical substrate for parametric skeletons.
//!
//! - [`vectorial`]: Linear tools, namely invertible [`Basis`](vectorial::Basis) changes.
//! - [`affine`]: Reference [`Frame`](affine::Frame)s and the geometric objects
//!   expressed in them ([`Point`](affine::Point), [`Hypersphere`](affine::Hypersphere)).
//! - [`application`]: Differentiable maps ("applications") that can be
//!   evaluated and differentiated, and their composition.

mod error;

pub mod affine;
pub mod application;
pub mod vectorial;

pub use error::ConstructionError;
