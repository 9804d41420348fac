use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// Errors raised while building a mathematical object.
///
/// Construction is fail-fast: when one of these is returned, no partially
/// valid object exists.
///
/// This enum is marked `#[non_exhaustive]` and may include additional variants
/// in future releases.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConstructionError {
    /// The basis matrix is not invertible.
    ///
    /// The squared determinant did not exceed [`DUMMY_PRECISION`](super::vectorial::DUMMY_PRECISION).
    #[error("basis matrix not invertible: determinant={determinant}")]
    SingularBasis { determinant: f64 },

    /// The B-spline counts do not satisfy `#ctrlpt + degree = #nodes + 1`.
    #[error(
        "b-spline requires #ctrlpt + degree = #nodes + 1: \
         ctrlpt={control_points}, degree={degree}, nodes={nodes}"
    )]
    ControlPointCount {
        control_points: usize,
        degree: usize,
        nodes: usize,
    },

    /// A B-spline was given no control point at all.
    #[error("b-spline requires at least one control point")]
    NoControlPoints,

    /// A B-spline was given an empty node vector.
    #[error("b-spline requires at least one node")]
    EmptyNodeVector,

    /// The node vector is not a finite, non-decreasing sequence.
    #[error("invalid node vector")]
    NodeVector(#[from] ConstraintError),

    /// A compositor was given no map to compose.
    #[error("compositor requires at least one map")]
    EmptyChain,

    /// Two adjacent maps of a compositor chain do not share a dimension.
    ///
    /// `stage` is the index (outermost first) of the map whose dimension
    /// does not match what the chain expects at that position.
    #[error("compositor stage {stage} has dimension {found}, expected {expected}")]
    ChainDimension {
        stage: usize,
        expected: usize,
        found: usize,
    },

    /// A parameter range is empty, reversed, or not finite.
    #[error("invalid parameter range [{start}, {end}]")]
    ParameterRange { start: f64, end: f64 },
}
