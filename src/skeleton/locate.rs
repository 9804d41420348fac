//! Parameter search along a branch.

use std::convert::Infallible;

use thiserror::Error;
use tracing::debug;
use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;

use super::{
    GraphBranch,
    model::{ModelMeta, Stor},
};

/// Solver configuration for [`GraphBranch::locate`].
#[derive(Debug, Clone, Copy)]
pub struct LocateConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the parameter.
    pub parameter_tol: f64,

    /// Absolute tolerance on the component residual (value - target).
    pub residual_tol: f64,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            parameter_tol: 1e-12,
            residual_tol: 1e-12,
        }
    }
}

impl LocateConfig {
    /// Converts this configuration into a bisection solver configuration.
    fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.parameter_tol,
            x_rel_tol: 0.0,
            residual_tol: self.residual_tol,
        }
    }
}

/// Errors that can occur while locating a parameter on a branch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LocateError {
    /// The requested component is not a storage component.
    #[error("component {component} is out of range for storage dimension {stordim}")]
    Component { component: usize, stordim: usize },

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual}")]
    MaxIters {
        /// Best residual achieved.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}

/// Storage vector together with the parameter it was sampled at.
#[derive(Debug, Clone)]
struct Sample<const S: usize> {
    parameter: f64,
    stor: Stor<S>,
}

/// Model adapter exposing the sampled parameter in the output.
struct SampleModel<'a, M, const S: usize> {
    branch: &'a GraphBranch<M, S>,
}

impl<M: ModelMeta, const S: usize> Model for SampleModel<'_, M, S> {
    type Input = f64;
    type Output = Sample<S>;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(Sample {
            parameter: *input,
            stor: self.branch.evaluate_at(*input),
        })
    }
}

/// Residual of one storage component against a target value.
struct LevelProblem<const S: usize> {
    component: usize,
    target: f64,
}

impl<const S: usize> EquationProblem<1> for LevelProblem<S> {
    type Input = f64;
    type Output = Sample<S>;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.stor[self.component] - self.target])
    }
}

impl<M: ModelMeta, const S: usize> GraphBranch<M, S> {
    /// Finds the parameter at which storage component `component` equals `target`.
    ///
    /// The component must take values on both sides of `target` at the ends of
    /// the branch range, e.g. the parameter where a sphere branch reaches a
    /// given radius.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::Component`] if `component >= S`, a
    /// [`LocateError::Bisection`] if the range does not bracket `target`, and
    /// [`LocateError::MaxIters`] if the solver does not converge.
    pub fn locate(
        &self,
        component: usize,
        target: f64,
        config: &LocateConfig,
    ) -> Result<f64, LocateError> {
        if component >= S {
            return Err(LocateError::Component {
                component,
                stordim: S,
            });
        }

        let model = SampleModel { branch: self };
        let problem = LevelProblem::<S> { component, target };
        let (start, end) = self.range();

        let solution = bisection::solve(
            &model,
            &problem,
            [start, end],
            &config.bisection(),
            |_event: &bisection::Event<'_, _, _>| None,
        )?;

        if solution.status != bisection::Status::Converged {
            return Err(LocateError::MaxIters {
                residual: solution.residual,
                iters: solution.iters,
            });
        }

        debug!(
            component,
            target,
            iters = solution.iters,
            "located parameter on branch"
        );
        Ok(solution.snapshot.output.parameter)
    }
}
