//! YAML settings for building a fluid facade.

use crate::config::{InitialGuess, Relaxation, SeedPolicy, SolverConfig};
use crate::error::{SolverError, SolverResult};
use crate::fluid::DataDrivenFluid;
use df_fluids::{
    EntropySurrogate, ExtrapolationPolicy, IdealGasSurrogate, SurrogateResult, TabulatedSurrogate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Surrogate backend selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendDef {
    /// Analytic ideal gas, s = cv·ln e − R·ln ρ.
    IdealGas { cv: f64, gas_constant: f64 },
    /// Inline (ρ, e) table with row-major node values.
    Table {
        density: Vec<f64>,
        energy: Vec<f64>,
        nodes: Vec<SurrogateResult>,
        #[serde(default)]
        extrapolation: ExtrapolationPolicy,
    },
}

impl BackendDef {
    pub fn build(&self) -> SolverResult<Arc<dyn EntropySurrogate>> {
        let surrogate: Arc<dyn EntropySurrogate> = match self {
            BackendDef::IdealGas { cv, gas_constant } => {
                Arc::new(IdealGasSurrogate::new(*cv, *gas_constant)?)
            }
            BackendDef::Table {
                density,
                energy,
                nodes,
                extrapolation,
            } => Arc::new(
                TabulatedSurrogate::new(density.clone(), energy.clone(), nodes.clone())?
                    .with_extrapolation(*extrapolation),
            ),
        };
        Ok(surrogate)
    }
}

/// Everything needed to construct a [`DataDrivenFluid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidSettings {
    pub backend: BackendDef,
    pub initial_guess: InitialGuess,
    #[serde(default)]
    pub relaxation: Relaxation,
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    #[serde(default)]
    pub solver: SolverConfig,
}

impl FluidSettings {
    /// Ideal-gas air near ambient conditions.
    pub fn ideal_air() -> Self {
        Self {
            backend: BackendDef::IdealGas {
                cv: 718.0,
                gas_constant: 287.0,
            },
            initial_guess: InitialGuess {
                density: 1.2,
                energy: 215_000.0,
            },
            relaxation: Relaxation::default(),
            seed_policy: SeedPolicy::default(),
            solver: SolverConfig::default(),
        }
    }

    pub fn from_yaml_str(text: &str) -> SolverResult<Self> {
        let settings: Self = serde_yaml::from_str(text).map_err(|e| SolverError::Settings {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml_string(&self) -> SolverResult<String> {
        serde_yaml::to_string(self).map_err(|e| SolverError::Settings {
            message: e.to_string(),
        })
    }

    pub fn load_yaml(path: &Path) -> SolverResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SolverError::Settings {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> SolverResult<()> {
        self.initial_guess.validate()?;
        self.solver.validate()
    }

    /// Build the backend and the facade.
    pub fn build(&self) -> SolverResult<DataDrivenFluid> {
        let surrogate = self.backend.build()?;
        Ok(
            DataDrivenFluid::new(surrogate, self.initial_guess, self.relaxation)?
                .with_config(self.solver)?
                .with_seed_policy(self.seed_policy),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_uses_defaults() {
        let yaml = r#"
backend:
  kind: ideal_gas
  cv: 718.0
  gas_constant: 287.0
initial_guess: { density: 1.0, energy: 200000.0 }
"#;
        let settings = FluidSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.relaxation, Relaxation::default());
        assert_eq!(settings.seed_policy, SeedPolicy::Fixed);
        assert_eq!(settings.solver, SolverConfig::default());

        let fluid = settings.build().unwrap();
        assert_eq!(fluid.backend_name(), "ideal-gas");
    }

    #[test]
    fn full_yaml() {
        let yaml = r#"
backend:
  kind: ideal_gas
  cv: 0.7
  gas_constant: 0.3
initial_guess: { density: 1.0, energy: 2.0 }
relaxation: 0.5
seed_policy: warm_start
solver:
  max_iterations: 50
  tolerances: { pressure: 1.0e-6, temperature: 1.0e-6 }
"#;
        let settings = FluidSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.relaxation.get(), 0.5);
        assert_eq!(settings.seed_policy, SeedPolicy::WarmStart);
        assert_eq!(settings.solver.max_iterations, 50);
        assert_eq!(settings.solver.tolerances.pressure, 1.0e-6);
        // Unlisted tolerances keep their defaults.
        assert_eq!(settings.solver.tolerances.enthalpy, 10.0);
    }

    #[test]
    fn out_of_range_relaxation_is_rejected() {
        let yaml = r#"
backend: { kind: ideal_gas, cv: 0.7, gas_constant: 0.3 }
initial_guess: { density: 1.0, energy: 2.0 }
relaxation: 2.0
"#;
        let err = FluidSettings::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, SolverError::Settings { .. }));
    }

    #[test]
    fn inline_table_backend() {
        let gas = IdealGasSurrogate::new(0.7, 0.3).unwrap();
        let node = |rho: f64, e: f64| gas.evaluate(rho, e).unwrap();
        let settings = FluidSettings {
            backend: BackendDef::Table {
                density: vec![1.0, 2.0],
                energy: vec![1.0, 2.0],
                nodes: vec![node(1.0, 1.0), node(1.0, 2.0), node(2.0, 1.0), node(2.0, 2.0)],
                extrapolation: ExtrapolationPolicy::Clamp,
            },
            initial_guess: InitialGuess {
                density: 1.5,
                energy: 1.5,
            },
            relaxation: Relaxation::default(),
            seed_policy: SeedPolicy::Fixed,
            solver: SolverConfig::default(),
        };

        let text = settings.to_yaml_string().unwrap();
        let parsed = FluidSettings::from_yaml_str(&text).unwrap();
        assert_eq!(parsed, settings);
        assert!(parsed.build().is_ok());
    }

    #[test]
    fn malformed_table_fails_to_build() {
        let settings = FluidSettings {
            backend: BackendDef::Table {
                density: vec![1.0, 2.0],
                energy: vec![1.0, 2.0],
                nodes: vec![],
                extrapolation: ExtrapolationPolicy::Reject,
            },
            ..FluidSettings::ideal_air()
        };
        assert!(settings.build().is_err());
    }
}
