//! Fluid property errors.

use df_core::CoreError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur while querying a surrogate or deriving a state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// A derivative used as a divisor is numerically zero.
    #[error("Singular state: {what} is numerically zero ({value:e})")]
    SingularState { what: &'static str, value: f64 },

    /// An input or derived quantity is NaN or infinite.
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// The surrogate was queried outside its admissible domain.
    #[error("Surrogate queried out of domain at rho={density}, e={energy}: {what}")]
    OutOfDomain {
        what: &'static str,
        density: f64,
        energy: f64,
    },

    /// Backend (emulator/table) error.
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Non-physical model parameter (negative heat capacity, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl FluidError {
    /// Whether this error marks a singular divisor in the state derivation.
    pub fn is_singular(&self) -> bool {
        matches!(self, FluidError::SingularState { .. })
    }

    /// Whether the surrogate backend rejected the query.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            FluidError::OutOfDomain { .. } | FluidError::Backend { .. }
        )
    }
}

impl From<CoreError> for FluidError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NearZero { what, value } => FluidError::SingularState { what, value },
            CoreError::NonFinite { what, value } => FluidError::NonFinite { what, value },
            CoreError::InvalidArg { what } => FluidError::InvalidArg { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::SingularState {
            what: "ds/de|rho",
            value: 0.0,
        };
        assert!(err.to_string().contains("ds/de|rho"));

        let err = FluidError::Backend {
            message: "emulator failed".into(),
        };
        assert!(err.to_string().contains("emulator"));
    }

    #[test]
    fn core_error_maps_to_fluid_error() {
        let near_zero: FluidError = CoreError::NearZero {
            what: "dT/de|rho",
            value: 1e-20,
        }
        .into();
        assert!(near_zero.is_singular());

        let non_finite: FluidError = CoreError::NonFinite {
            what: "pressure",
            value: f64::NAN,
        }
        .into();
        assert!(matches!(non_finite, FluidError::NonFinite { .. }));
        assert!(!non_finite.is_singular());
    }

    #[test]
    fn backend_classification() {
        let err = FluidError::OutOfDomain {
            what: "density must be positive",
            density: -1.0,
            energy: 1.0,
        };
        assert!(err.is_backend());
        assert!(!FluidError::NonPhysical { what: "cv" }.is_backend());
    }
}
