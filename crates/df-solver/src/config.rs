//! Solver configuration: tolerances, iteration cap, seed and relaxation.

use crate::error::{SolverError, SolverResult};
use serde::{Deserialize, Serialize};

/// Absolute convergence tolerances, one per physical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverTolerances {
    /// Pressure residual tolerance (Pa)
    pub pressure: f64,
    /// Temperature residual tolerance (K)
    pub temperature: f64,
    /// Specific enthalpy residual tolerance (J/kg)
    pub enthalpy: f64,
    /// Specific entropy residual tolerance (J/(kg·K))
    pub entropy: f64,
}

impl Default for SolverTolerances {
    fn default() -> Self {
        Self {
            pressure: 10.0,
            temperature: 1.0,
            enthalpy: 10.0,
            entropy: 1.0,
        }
    }
}

impl SolverTolerances {
    /// Same tolerance for every quantity.
    pub fn uniform(tol: f64) -> Self {
        Self {
            pressure: tol,
            temperature: tol,
            enthalpy: tol,
            entropy: tol,
        }
    }

    pub fn validate(&self) -> SolverResult<()> {
        for (what, value) in [
            ("pressure tolerance", self.pressure),
            ("temperature tolerance", self.temperature),
            ("enthalpy tolerance", self.enthalpy),
            ("entropy tolerance", self.entropy),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SolverError::InvalidConfig {
                    what: format!("{what} must be positive and finite (got {value})"),
                });
            }
        }
        Ok(())
    }
}

/// Newton iteration settings shared by every inversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum Newton updates before giving up
    pub max_iterations: usize,
    pub tolerances: SolverTolerances,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerances: SolverTolerances::default(),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfig {
                what: "max_iterations must be at least 1".to_string(),
            });
        }
        self.tolerances.validate()
    }
}

/// Canonical (density, energy) seed for every iterative solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialGuess {
    /// Density (kg/m³)
    pub density: f64,
    /// Specific internal energy (J/kg)
    pub energy: f64,
}

impl InitialGuess {
    pub fn new(density: f64, energy: f64) -> SolverResult<Self> {
        let guess = Self { density, energy };
        guess.validate()?;
        Ok(guess)
    }

    pub fn validate(&self) -> SolverResult<()> {
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(SolverError::InvalidConfig {
                what: format!("initial density must be positive (got {})", self.density),
            });
        }
        if !self.energy.is_finite() || self.energy <= 0.0 {
            return Err(SolverError::InvalidConfig {
                what: format!("initial energy must be positive (got {})", self.energy),
            });
        }
        Ok(())
    }
}

/// Newton step damping factor in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Relaxation(f64);

impl Relaxation {
    /// Undamped Newton.
    pub const FULL: Relaxation = Relaxation(1.0);

    pub fn new(value: f64) -> SolverResult<Self> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(SolverError::InvalidConfig {
                what: format!("relaxation must lie in (0, 1] (got {value})"),
            })
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Relaxation {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<f64> for Relaxation {
    type Error = SolverError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Relaxation> for f64 {
    fn from(relaxation: Relaxation) -> Self {
        relaxation.0
    }
}

/// Where each iterative solve starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Always start from the configured initial guess.
    #[default]
    Fixed,
    /// Start from the last converged state, falling back to the initial guess.
    WarmStart,
}
