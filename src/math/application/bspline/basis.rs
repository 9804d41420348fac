//! B-spline basis functions (Cox–de Boor recursion).
//!
//! A B-spline with `N` control points and degree `d` stores `M = N + d - 1`
//! nodes. The standard knot vector has `N + d + 1` entries; it is obtained by
//! repeating the first and the last node once more:
//!
//! ```text
//! u_0 = node_0,  u_j = node_{j-1} (1 ≤ j ≤ M),  u_{M+1} = node_{M-1}
//! ```
//!
//! With a node vector made of `d` zeros followed by `d` ones, the knot vector is
//! the clamped Bézier one and the basis functions are the Bernstein polynomials.
//!
//! Degree-0 functions are indicators of the half-open knot spans
//! `[u_j, u_{j+1})`, except at the end of the curve domain `u_N`, which belongs
//! to the last non-empty span ending there. Terms whose denominator vanishes
//! (repeated knots) are dropped.

use nalgebra::RowDVector;

/// Knot vector view over a node vector, for a given top-level degree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Knots<'a> {
    nodes: &'a [f64],
    degree: usize,
}

impl<'a> Knots<'a> {
    /// Creates a knot view.
    ///
    /// The node slice must not be empty and must satisfy `#nodes + 1 ≥ degree + 1`.
    pub(crate) fn new(nodes: &'a [f64], degree: usize) -> Self {
        debug_assert!(!nodes.is_empty());
        debug_assert!(nodes.len() >= degree);
        Self { nodes, degree }
    }

    /// Number of basis functions (control points) of the top-level degree.
    pub(crate) fn count(&self) -> usize {
        self.nodes.len() + 1 - self.degree
    }

    /// Knot `u_j` of the extended knot vector, for `0 ≤ j ≤ M + 1`.
    pub(crate) fn knot(&self, j: usize) -> f64 {
        let last = self.nodes.len() - 1;
        self.nodes[j.saturating_sub(1).min(last)]
    }

    /// Curve domain `[u_d, u_N]`.
    pub(crate) fn domain(&self) -> (f64, f64) {
        (self.knot(self.degree), self.knot(self.count()))
    }

    /// Degree-0 basis function of span `j`.
    fn indicator(&self, j: usize, t: f64) -> f64 {
        let (lo, hi) = (self.knot(j), self.knot(j + 1));
        let end = self.domain().1;
        let inside = if t == end {
            lo < hi && hi == end
        } else {
            lo <= t && t < hi
        };
        if inside { 1.0 } else { 0.0 }
    }

    /// Cox–de Boor step: combines `B_{i,k-1}` and `B_{i+1,k-1}` into `B_{i,k}`.
    fn combine(&self, i: usize, k: usize, t: f64, left: f64, right: f64) -> f64 {
        let mut res = 0.0;

        let (ui, uik) = (self.knot(i), self.knot(i + k));
        if uik > ui {
            res += (t - ui) / (uik - ui) * left;
        }

        let (ui1, uik1) = (self.knot(i + 1), self.knot(i + k + 1));
        if uik1 > ui1 {
            res += (uik1 - t) / (uik1 - ui1) * right;
        }

        res
    }

    /// Derivative step: `d/dt B_{i,k}` from `B_{i,k-1}` and `B_{i+1,k-1}`.
    fn combine_derivative(&self, i: usize, k: usize, left: f64, right: f64) -> f64 {
        let k_f = k as f64;
        let mut res = 0.0;

        let (ui, uik) = (self.knot(i), self.knot(i + k));
        if uik > ui {
            res += k_f / (uik - ui) * left;
        }

        let (ui1, uik1) = (self.knot(i + 1), self.knot(i + k + 1));
        if uik1 > ui1 {
            res -= k_f / (uik1 - ui1) * right;
        }

        res
    }

    /// Recursive evaluation of a single basis function `B_{i,k}`.
    pub(crate) fn basis(&self, i: usize, k: usize, t: f64) -> f64 {
        if k == 0 {
            return self.indicator(i, t);
        }
        let left = self.basis(i, k - 1, t);
        let right = self.basis(i + 1, k - 1, t);
        self.combine(i, k, t, left, right)
    }

    /// Recursive evaluation of `d/dt B_{i,k}`.
    pub(crate) fn basis_derivative(&self, i: usize, k: usize, t: f64) -> f64 {
        if k == 0 {
            return 0.0;
        }
        let left = self.basis(i, k - 1, t);
        let right = self.basis(i + 1, k - 1, t);
        self.combine_derivative(i, k, left, right)
    }

    /// All basis functions of degree `k ≤ degree` at `t`, as a triangular sweep.
    ///
    /// Returns `M + 1 - k` values; for `k = degree` these are the `N` weights
    /// of the control points.
    fn sweep(&self, k: usize, t: f64) -> Vec<f64> {
        let spans = self.nodes.len() + 1;
        let mut values: Vec<f64> = (0..spans).map(|j| self.indicator(j, t)).collect();

        for level in 1..=k {
            values = (0..spans - level)
                .map(|i| self.combine(i, level, t, values[i], values[i + 1]))
                .collect();
        }

        values
    }

    /// Values of the `N` top-degree basis functions at `t`.
    pub(crate) fn values(&self, t: f64) -> Vec<f64> {
        self.sweep(self.degree, t)
    }

    /// Derivatives of the `N` top-degree basis functions at `t`.
    pub(crate) fn derivatives(&self, t: f64) -> Vec<f64> {
        if self.degree == 0 {
            return vec![0.0; self.count()];
        }
        let lower = self.sweep(self.degree - 1, t);
        (0..self.count())
            .map(|i| self.combine_derivative(i, self.degree, lower[i], lower[i + 1]))
            .collect()
    }
}

/// Value at `t` of the degree-`degree` basis function attached to control
/// point `index`, for the given node vector.
///
/// Returns `0.0` when the node vector is empty or `index` does not name a
/// control point (`index + degree > #nodes`).
///
/// # Example
///
/// ```
/// use nalgebra::RowDVector;
/// use twine_skeleton::math::application::bspline_basis;
///
/// // Clamped quadratic: Bernstein polynomial 2·(1 − t)·t.
/// let nodes = RowDVector::from_row_slice(&[0.0, 0.0, 1.0, 1.0]);
/// let value = bspline_basis(0.25, 2, 1, &nodes);
/// assert!((value - 0.375).abs() < 1e-15);
/// ```
#[must_use]
pub fn bspline_basis(t: f64, degree: usize, index: usize, nodes: &RowDVector<f64>) -> f64 {
    if nodes.is_empty() || index + degree > nodes.len() {
        return 0.0;
    }
    Knots::new(nodes.as_slice(), degree).basis(index, degree, t)
}

/// Derivative at `t` of the basis function returned by [`bspline_basis`].
#[must_use]
pub fn bspline_basis_derivative(
    t: f64,
    degree: usize,
    index: usize,
    nodes: &RowDVector<f64>,
) -> f64 {
    if nodes.is_empty() || index + degree > nodes.len() {
        return 0.0;
    }
    Knots::new(nodes.as_slice(), degree).basis_derivative(index, degree, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn binomial(n: u64, k: u64) -> f64 {
        (1..=k).fold(1.0, |acc, i| acc * (n + 1 - i) as f64 / i as f64)
    }

    /// `degree` zeros followed by `degree` ones.
    fn clamped_single_segment(degree: usize) -> RowDVector<f64> {
        RowDVector::from_fn(2 * degree, |_, j| if j < degree { 0.0 } else { 1.0 })
    }

    #[test]
    fn matches_bernstein_polynomials() {
        let fraction = 100;
        for degree in 1..5 {
            let nodes = clamped_single_segment(degree);
            for index in 0..=degree {
                for i in 0..fraction {
                    let t = f64::from(i) * (1.0 / f64::from(fraction));
                    let res = bspline_basis(t, degree, index, &nodes);
                    let reference = binomial(degree as u64, index as u64)
                        * (1.0 - t).powi((degree - index) as i32)
                        * t.powi(index as i32);
                    assert_relative_eq!(res, reference, epsilon = f64::EPSILON);
                }
            }
        }
    }

    #[test]
    fn derivative_matches_bernstein_derivative() {
        // d/dt 3·(1 − t)²·t = 3·(1 − t)·(1 − 3t)
        let nodes = clamped_single_segment(3);
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            let reference = 3.0 * (1.0 - t) * (1.0 - 3.0 * t);
            assert_relative_eq!(
                bspline_basis_derivative(t, 3, 1, &nodes),
                reference,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn last_node_belongs_to_the_last_span() {
        let nodes = clamped_single_segment(2);
        assert_eq!(bspline_basis(1.0, 2, 2, &nodes), 1.0);
        assert_eq!(bspline_basis(1.0, 2, 0, &nodes), 0.0);
    }

    #[test]
    fn degree_zero_indicators() {
        // Three control points, degree 0: nodes split [0, 3] into unit spans.
        let nodes = RowDVector::from_row_slice(&[1.0, 2.0]);
        let knots = Knots::new(nodes.as_slice(), 0);
        assert_eq!(knots.domain(), (1.0, 2.0));
        assert_eq!(knots.values(1.5), vec![0.0, 1.0, 0.0]);
        assert_eq!(knots.values(2.0), vec![0.0, 1.0, 0.0]);
        assert_eq!(knots.derivatives(1.5), vec![0.0; 3]);
    }

    #[test]
    fn out_of_range_index_is_zero() {
        let nodes = clamped_single_segment(2);
        assert_eq!(bspline_basis(0.5, 2, 3, &nodes), 0.0);
        assert_eq!(bspline_basis(0.5, 2, 0, &RowDVector::zeros(0)), 0.0);
    }

    #[test]
    fn sweep_agrees_with_recursion() {
        let nodes = [0.0, 0.0, 0.2, 0.5, 0.5, 0.9, 1.0, 1.0];
        let knots = Knots::new(&nodes, 3);
        for i in 0..=20 {
            let t = f64::from(i) / 20.0;
            let values = knots.values(t);
            let derivatives = knots.derivatives(t);
            for (index, (value, derivative)) in values.iter().zip(&derivatives).enumerate() {
                assert_eq!(*value, knots.basis(index, 3, t));
                assert_relative_eq!(
                    *derivative,
                    knots.basis_derivative(index, 3, t),
                    epsilon = 1e-12
                );
            }
        }
    }

    proptest! {
        #[test]
        fn partition_of_unity(
            degree in 1usize..=4,
            mut interior in prop::collection::vec(0.0..1.0f64, 0..6),
            t in 0.0..=1.0f64,
        ) {
            interior.sort_by(f64::total_cmp);
            let mut nodes = vec![0.0; degree];
            nodes.extend(interior);
            nodes.extend(std::iter::repeat_n(1.0, degree));

            let knots = Knots::new(&nodes, degree);
            let sum: f64 = knots.values(t).iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-12, "sum = {sum}");
        }
    }
}
