//! Thermodynamic state definitions.

use df_core::units::{Density, Pressure, SpecHeatCapacity, Temperature, Velocity};
use df_core::units::{j_per_kg_k, k, kg_m3, mps, pa};

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
pub type SpecEntropy = f64;

/// Specific internal energy [J/kg].
pub type SpecEnergy = f64;

/// Complete thermodynamic state at one (density, energy) point.
///
/// Only [`derive_state`](crate::derive_state) constructs a `FluidState`, and
/// it always fills every field from a single surrogate result, so a state is
/// never partially updated.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidState {
    pub(crate) density: f64,
    pub(crate) energy: SpecEnergy,
    pub(crate) entropy: SpecEntropy,
    pub(crate) temperature: f64,
    pub(crate) pressure: f64,
    pub(crate) cp: f64,
    pub(crate) cv: f64,
    pub(crate) gamma: f64,
    pub(crate) gas_constant: f64,
    pub(crate) sound_speed2: f64,
    pub(crate) dt_de_rho: f64,
    pub(crate) dt_drho_e: f64,
    pub(crate) dp_de_rho: f64,
    pub(crate) dp_drho_e: f64,
    pub(crate) extrapolated: bool,
}

impl FluidState {
    /// Density [kg/m³].
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Specific internal energy [J/kg].
    pub fn energy(&self) -> SpecEnergy {
        self.energy
    }

    /// Specific entropy [J/(kg·K)].
    pub fn entropy(&self) -> SpecEntropy {
        self.entropy
    }

    /// Temperature [K].
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Pressure [Pa].
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Specific enthalpy h = e + P/ρ [J/kg].
    pub fn enthalpy(&self) -> SpecEnthalpy {
        self.energy + self.pressure / self.density
    }

    /// Isobaric heat capacity [J/(kg·K)].
    pub fn cp(&self) -> f64 {
        self.cp
    }

    /// Isochoric heat capacity [J/(kg·K)].
    pub fn cv(&self) -> f64 {
        self.cv
    }

    /// Ratio of specific heats cp/cv.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn gamma_minus_one(&self) -> f64 {
        self.gamma - 1.0
    }

    /// Gas constant cp − cv [J/(kg·K)].
    pub fn gas_constant(&self) -> f64 {
        self.gas_constant
    }

    /// Squared speed of sound [m²/s²].
    pub fn speed_of_sound_squared(&self) -> f64 {
        self.sound_speed2
    }

    /// Speed of sound [m/s], or `None` where c² is negative.
    pub fn speed_of_sound(&self) -> Option<f64> {
        (self.sound_speed2 >= 0.0).then(|| self.sound_speed2.sqrt())
    }

    /// ∂T/∂e at constant density.
    pub fn dt_de_rho(&self) -> f64 {
        self.dt_de_rho
    }

    /// ∂T/∂ρ at constant energy.
    pub fn dt_drho_e(&self) -> f64 {
        self.dt_drho_e
    }

    /// ∂P/∂e at constant density.
    pub fn dp_de_rho(&self) -> f64 {
        self.dp_de_rho
    }

    /// ∂P/∂ρ at constant energy.
    pub fn dp_drho_e(&self) -> f64 {
        self.dp_drho_e
    }

    /// ∂s/∂e at constant density, recovered as 1/T.
    pub fn ds_de_rho(&self) -> f64 {
        1.0 / self.temperature
    }

    /// ∂s/∂ρ at constant energy, recovered as −P/(ρ²T).
    pub fn ds_drho_e(&self) -> f64 {
        -self.pressure / (self.density * self.density * self.temperature)
    }

    /// ∂h/∂e at constant density.
    pub fn dh_de_rho(&self) -> f64 {
        1.0 + self.dp_de_rho / self.density
    }

    /// ∂h/∂ρ at constant energy.
    pub fn dh_drho_e(&self) -> f64 {
        -self.pressure / (self.density * self.density) + self.dp_drho_e / self.density
    }

    /// Whether the surrogate extrapolated to produce this state.
    pub fn is_extrapolated(&self) -> bool {
        self.extrapolated
    }

    /// Unit-typed view of the headline properties.
    pub fn property_pack(&self) -> ThermoPropertyPack {
        ThermoPropertyPack {
            p: pa(self.pressure),
            t: k(self.temperature),
            rho: kg_m3(self.density),
            h: self.enthalpy(),
            s: self.entropy,
            cp: j_per_kg_k(self.cp),
            cv: j_per_kg_k(self.cv),
            gamma: self.gamma,
            a: self.speed_of_sound().map(mps),
        }
    }
}

/// Unit-typed snapshot of a [`FluidState`], used for reporting.
#[derive(Clone, Debug)]
pub struct ThermoPropertyPack {
    /// Pressure [Pa]
    pub p: Pressure,

    /// Temperature [K]
    pub t: Temperature,

    /// Density [kg/m³]
    pub rho: Density,

    /// Specific enthalpy [J/kg]
    pub h: SpecEnthalpy,

    /// Specific entropy [J/(kg·K)]
    pub s: SpecEntropy,

    /// Specific heat capacity at constant pressure
    pub cp: SpecHeatCapacity,

    /// Specific heat capacity at constant volume
    pub cv: SpecHeatCapacity,

    /// Heat capacity ratio γ = cp/cv (dimensionless)
    pub gamma: f64,

    /// Speed of sound, absent where c² < 0
    pub a: Option<Velocity>,
}

impl ThermoPropertyPack {
    /// Return a summary string of all contained properties (for debugging).
    pub fn summary(&self) -> String {
        let a = self
            .a
            .map(|a| format!("{:.1}m/s", a.value))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "Pack(P={:.1}Pa,T={:.2}K,ρ={:.4}kg/m³,h={:.1}J/kg,s={:.3}J/kg·K,cp={:.2},cv={:.2},γ={:.4},a={})",
            self.p.value,
            self.t.value,
            self.rho.value,
            self.h,
            self.s,
            self.cp.value,
            self.cv.value,
            self.gamma,
            a
        )
    }
}
