//! Error types for inversion solves.

use crate::inversion::InputPair;
use df_core::CoreError;
use df_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while inverting the fluid relation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// State derivation or surrogate query failed.
    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    /// The Newton Jacobian cannot be inverted.
    #[error("Singular Jacobian for {pair} at iteration {iteration}: determinant {determinant:e}")]
    SingularJacobian {
        pair: InputPair,
        iteration: usize,
        determinant: f64,
    },

    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    #[error("Settings error: {message}")]
    Settings { message: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// Whether the failure is a numerically zero divisor, either in the state
    /// derivation or in the Newton step.
    pub fn is_singular(&self) -> bool {
        match self {
            SolverError::Fluid(err) => err.is_singular(),
            SolverError::SingularJacobian { .. } => true,
            _ => false,
        }
    }

    /// Whether the surrogate backend rejected a query.
    pub fn is_backend(&self) -> bool {
        matches!(self, SolverError::Fluid(err) if err.is_backend())
    }
}

impl From<CoreError> for SolverError {
    fn from(err: CoreError) -> Self {
        SolverError::Fluid(err.into())
    }
}
