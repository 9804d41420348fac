use nalgebra::RowDVector;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a sequence of reals is finite and never decreases.
///
/// B-spline node vectors must satisfy this constraint; repeated entries
/// (multiple knots) are allowed.
///
/// # Examples
///
/// ```
/// use nalgebra::RowDVector;
/// use twine_skeleton::support::constraint::{ConstraintError, NonDecreasing};
///
/// let nodes = RowDVector::from_row_slice(&[0.0, 0.0, 0.5, 1.0]);
/// assert!(NonDecreasing::new(nodes).is_ok());
///
/// let nodes = RowDVector::from_row_slice(&[0.0, 1.0, 0.5]);
/// assert_eq!(
///     NonDecreasing::new(nodes).unwrap_err(),
///     ConstraintError::Decreasing { index: 2 },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonDecreasing;

impl NonDecreasing {
    /// Constructs a [`Constrained<T, NonDecreasing>`] if the sequence never decreases.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry is not finite or is smaller than its predecessor.
    pub fn new<T>(value: T) -> Result<Constrained<T, NonDecreasing>, ConstraintError>
    where
        NonDecreasing: Constraint<T>,
    {
        Constrained::<T, NonDecreasing>::new(value)
    }

    fn check_slice(values: &[f64]) -> Result<(), ConstraintError> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(if bad.is_nan() {
                ConstraintError::NotANumber
            } else {
                ConstraintError::NotFinite
            });
        }

        match values.windows(2).position(|pair| pair[1] < pair[0]) {
            Some(position) => Err(ConstraintError::Decreasing {
                index: position + 1,
            }),
            None => Ok(()),
        }
    }
}

impl Constraint<RowDVector<f64>> for NonDecreasing {
    fn check(value: &RowDVector<f64>) -> Result<(), ConstraintError> {
        Self::check_slice(value.as_slice())
    }
}
