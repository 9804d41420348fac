//! Skeleton representations.
//!
//! A skeleton is a graph of branches. Each [`GraphBranch`] holds a
//! differentiable map from a scalar parameter to a storage vector, and a
//! coordinate [`model`] that gives those storage vectors a geometric meaning
//! (a point, a hypersphere, …). The storage dimension of every sample on a
//! branch is fixed by the model through [`ModelMeta::STORDIM`](model::ModelMeta::STORDIM).
//!
//! - [`model`]: Coordinate models ([`Classic`](model::Classic), [`Projective`](model::Projective))
//! - [`GraphBranch`]: One continuous, independently parametrized piece of a skeleton
//! - [`GraphSkeleton`]: Parent/child linkage between shared branches

mod branch;
mod graph;
mod locate;

pub mod model;

pub use branch::{GraphBranch, SharedBranch};
pub use graph::{BranchId, GraphError, GraphSkeleton};
pub use locate::{LocateConfig, LocateError};

use model::Classic;

/// Branch of a 3D skeleton made of spheres (center and radius).
pub type ReconstructionBranch = GraphBranch<Classic<3>, 4>;

/// 3D skeleton made of sphere branches.
pub type ReconstructionSkeleton = GraphSkeleton<Classic<3>, 4>;
