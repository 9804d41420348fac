//! Type-level numeric constraints checked once at construction.
//!
//! Geometric data carries invariants that must hold before any evaluation
//! takes place: a hypersphere radius cannot be negative, and the nodes of a
//! B-spline must never decrease. The types in this module encode those
//! invariants so the checks happen exactly once, when the value is built.
//!
//! # Provided constraints
//!
//! - [`NonNegative`]: Zero or greater
//! - [`NonDecreasing`]: A finite sequence whose entries never decrease
//!
//! Each marker is used with the generic [`Constrained<T, C>`] wrapper,
//! where `C` is the marker type implementing [`Constraint<T>`].
//!
//! # Extending
//!
//! Custom invariants are added by implementing [`Constraint<T>`] for a new
//! zero-sized marker type.

mod non_decreasing;
mod non_negative;

use std::marker::PhantomData;

use thiserror::Error;

pub use non_decreasing::NonDecreasing;
pub use non_negative::NonNegative;

/// A trait for enforcing invariants at construction time.
pub trait Constraint<T> {
    /// Checks that the given value satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if the value does not satisfy the constraint.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// An error returned when a [`Constraint`] is violated.
///
/// This enum is marked `#[non_exhaustive]` and may include additional variants
/// in future releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is not finite")]
    NotFinite,
    #[error("sequence decreases at index {index}")]
    Decreasing { index: usize },
}

/// A wrapper enforcing a constraint at construction time.
///
/// # Example
///
/// ```
/// use twine_skeleton::support::constraint::{Constrained, NonNegative};
///
/// let radius = Constrained::<_, NonNegative>::new(0.5).unwrap();
/// assert_eq!(radius.into_inner(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Constructs a new constrained value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Returns a reference to the inner unconstrained value.
impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
