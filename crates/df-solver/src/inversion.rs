//! Residual/Jacobian strategies for each supported input pair.
//!
//! Every strategy works on the canonical unknowns (ρ, e). Two-variable pairs
//! iterate on both; pairs that fix the density iterate on energy alone.

use crate::config::SolverTolerances;
use crate::error::SolverError;
use crate::newton::InversionProblem;
use df_fluids::FluidState;
use nalgebra::{Matrix1, Matrix2, Vector1, Vector2};
use std::fmt;
use std::str::FromStr;

/// Input pair used to specify a thermodynamic state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputPair {
    /// Density and internal energy (direct, no iteration)
    RhoE,
    /// Pressure and temperature
    PT,
    /// Pressure and density
    PRho,
    /// Density and temperature
    RhoT,
    /// Enthalpy and entropy
    HS,
    /// Pressure and entropy
    PS,
}

impl InputPair {
    pub const ALL: [InputPair; 6] = [
        InputPair::RhoE,
        InputPair::PT,
        InputPair::PRho,
        InputPair::RhoT,
        InputPair::HS,
        InputPair::PS,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::RhoE => "rho-e",
            Self::PT => "P-T",
            Self::PRho => "P-rho",
            Self::RhoT => "rho-T",
            Self::HS => "h-s",
            Self::PS => "P-s",
        }
    }

    pub fn first_label(&self) -> &'static str {
        match self {
            Self::RhoE | Self::RhoT => "Density [kg/m³]",
            Self::PT | Self::PRho | Self::PS => "Pressure [Pa]",
            Self::HS => "Enthalpy [J/kg]",
        }
    }

    pub fn second_label(&self) -> &'static str {
        match self {
            Self::RhoE => "Internal energy [J/kg]",
            Self::PT | Self::RhoT => "Temperature [K]",
            Self::PRho => "Density [kg/m³]",
            Self::HS | Self::PS => "Entropy [J/(kg·K)]",
        }
    }

    /// Whether this pair needs an iterative solve.
    pub fn is_iterative(&self) -> bool {
        !matches!(self, Self::RhoE)
    }
}

impl fmt::Display for InputPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InputPair {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "rhoe" => Ok(Self::RhoE),
            "pt" => Ok(Self::PT),
            "prho" => Ok(Self::PRho),
            "rhot" => Ok(Self::RhoT),
            "hs" => Ok(Self::HS),
            "ps" => Ok(Self::PS),
            _ => Err(SolverError::InvalidConfig {
                what: format!("unknown input pair '{s}'"),
            }),
        }
    }
}

/// Target pressure and temperature.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PressureTemperature {
    pub pressure: f64,
    pub temperature: f64,
}

impl InversionProblem<2> for PressureTemperature {
    fn pair(&self) -> InputPair {
        InputPair::PT
    }

    fn unknowns(&self, density: f64, energy: f64) -> Vector2<f64> {
        Vector2::new(density, energy)
    }

    fn canonical(&self, x: &Vector2<f64>) -> (f64, f64) {
        (x[0], x[1])
    }

    fn residual(&self, state: &FluidState) -> Vector2<f64> {
        Vector2::new(
            state.pressure() - self.pressure,
            state.temperature() - self.temperature,
        )
    }

    fn tolerance(&self, tol: &SolverTolerances) -> Vector2<f64> {
        Vector2::new(tol.pressure, tol.temperature)
    }

    fn jacobian(&self, state: &FluidState) -> Matrix2<f64> {
        Matrix2::new(
            state.dp_drho_e(),
            state.dp_de_rho(),
            state.dt_drho_e(),
            state.dt_de_rho(),
        )
    }
}

/// Target pressure at a fixed density; solves for energy only.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PressureDensity {
    pub pressure: f64,
    pub density: f64,
}

impl InversionProblem<1> for PressureDensity {
    fn pair(&self) -> InputPair {
        InputPair::PRho
    }

    fn unknowns(&self, _density: f64, energy: f64) -> Vector1<f64> {
        Vector1::new(energy)
    }

    fn canonical(&self, x: &Vector1<f64>) -> (f64, f64) {
        (self.density, x[0])
    }

    fn residual(&self, state: &FluidState) -> Vector1<f64> {
        Vector1::new(state.pressure() - self.pressure)
    }

    fn tolerance(&self, tol: &SolverTolerances) -> Vector1<f64> {
        Vector1::new(tol.pressure)
    }

    fn jacobian(&self, state: &FluidState) -> Matrix1<f64> {
        Matrix1::new(state.dp_de_rho())
    }
}

/// Target temperature at a fixed density; solves for energy only.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DensityTemperature {
    pub density: f64,
    pub temperature: f64,
}

impl InversionProblem<1> for DensityTemperature {
    fn pair(&self) -> InputPair {
        InputPair::RhoT
    }

    fn unknowns(&self, _density: f64, energy: f64) -> Vector1<f64> {
        Vector1::new(energy)
    }

    fn canonical(&self, x: &Vector1<f64>) -> (f64, f64) {
        (self.density, x[0])
    }

    fn residual(&self, state: &FluidState) -> Vector1<f64> {
        Vector1::new(state.temperature() - self.temperature)
    }

    fn tolerance(&self, tol: &SolverTolerances) -> Vector1<f64> {
        Vector1::new(tol.temperature)
    }

    fn jacobian(&self, state: &FluidState) -> Matrix1<f64> {
        Matrix1::new(state.dt_de_rho())
    }
}

/// Target specific enthalpy and entropy.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EnthalpyEntropy {
    pub enthalpy: f64,
    pub entropy: f64,
}

impl InversionProblem<2> for EnthalpyEntropy {
    fn pair(&self) -> InputPair {
        InputPair::HS
    }

    fn unknowns(&self, density: f64, energy: f64) -> Vector2<f64> {
        Vector2::new(density, energy)
    }

    fn canonical(&self, x: &Vector2<f64>) -> (f64, f64) {
        (x[0], x[1])
    }

    fn residual(&self, state: &FluidState) -> Vector2<f64> {
        Vector2::new(
            state.enthalpy() - self.enthalpy,
            state.entropy() - self.entropy,
        )
    }

    fn tolerance(&self, tol: &SolverTolerances) -> Vector2<f64> {
        Vector2::new(tol.enthalpy, tol.entropy)
    }

    fn jacobian(&self, state: &FluidState) -> Matrix2<f64> {
        Matrix2::new(
            state.dh_drho_e(),
            state.dh_de_rho(),
            state.ds_drho_e(),
            state.ds_de_rho(),
        )
    }
}

/// Target pressure and specific entropy.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PressureEntropy {
    pub pressure: f64,
    pub entropy: f64,
}

impl InversionProblem<2> for PressureEntropy {
    fn pair(&self) -> InputPair {
        InputPair::PS
    }

    fn unknowns(&self, density: f64, energy: f64) -> Vector2<f64> {
        Vector2::new(density, energy)
    }

    fn canonical(&self, x: &Vector2<f64>) -> (f64, f64) {
        (x[0], x[1])
    }

    fn residual(&self, state: &FluidState) -> Vector2<f64> {
        Vector2::new(
            state.pressure() - self.pressure,
            state.entropy() - self.entropy,
        )
    }

    fn tolerance(&self, tol: &SolverTolerances) -> Vector2<f64> {
        Vector2::new(tol.pressure, tol.entropy)
    }

    fn jacobian(&self, state: &FluidState) -> Matrix2<f64> {
        Matrix2::new(
            state.dp_drho_e(),
            state.dp_de_rho(),
            state.ds_drho_e(),
            state.ds_de_rho(),
        )
    }
}
