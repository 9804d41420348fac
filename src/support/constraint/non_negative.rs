use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is non-negative (zero or greater).
///
/// Hypersphere radii are stored as `Constrained<f64, NonNegative>`.
///
/// # Examples
///
/// ```
/// use twine_skeleton::support::constraint::{Constrained, NonNegative};
///
/// let r = NonNegative::new(0.0).unwrap();
/// assert_eq!(r.into_inner(), 0.0);
///
/// assert!(NonNegative::new(-0.25).is_err());
/// assert!(NonNegative::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs a [`Constrained<T, NonNegative>`] if the value is non-negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::<T, NonNegative>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater | Ordering::Equal) => Ok(()),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats() {
        assert!(Constrained::<f64, NonNegative>::new(1.0).is_ok());
        assert!(NonNegative::new(0.0).is_ok());
        assert_eq!(NonNegative::new(-1e-9), Err(ConstraintError::Negative));
        assert_eq!(NonNegative::new(f64::NAN), Err(ConstraintError::NotANumber));
    }
}
