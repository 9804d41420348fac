use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// Errors raised while converting between storage vectors and objects.
///
/// This enum is marked `#[non_exhaustive]` and may include additional variants
/// in future releases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// The storage data does not have the model's storage dimension.
    #[error("storage vector has {found} entries, model expects {expected}")]
    StorageDimension { expected: usize, found: usize },

    /// A homogeneous vector with a vanishing last coordinate has no affine point.
    #[error("homogeneous coordinate vanishes: point at infinity")]
    PointAtInfinity,

    /// The stored radius is not a valid hypersphere radius.
    #[error("invalid radius")]
    Radius(#[from] ConstraintError),
}
