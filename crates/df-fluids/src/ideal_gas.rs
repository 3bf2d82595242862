//! Analytic ideal-gas entropy surface.
//!
//! `IdealGasSurrogate` implements the surrogate interface with the closed form
//!
//! ```text
//! s(ρ, e) = s₀ + cv·ln(e / e₀) − R·ln(ρ / ρ₀)
//! ```
//!
//! It stands in for a trained emulator wherever a surrogate with a known
//! answer is needed: tests, demos, and as a sampling source for tables.

use crate::error::{FluidError, FluidResult};
use crate::surrogate::{EntropySurrogate, SurrogateResult};
use df_core::ensure_positive;

/// Calorically perfect ideal gas expressed as an entropy surface in (ρ, e).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealGasSurrogate {
    cv: f64,
    gas_constant: f64,
    reference_density: f64,
    reference_energy: f64,
    reference_entropy: f64,
}

impl IdealGasSurrogate {
    /// Create an ideal-gas surface with unit reference density and energy.
    ///
    /// # Errors
    ///
    /// Returns [`FluidError::NonPhysical`] if `cv` or `gas_constant` is not
    /// strictly positive and finite.
    pub fn new(cv: f64, gas_constant: f64) -> FluidResult<Self> {
        let cv = ensure_positive(cv, "cv").map_err(|_| FluidError::NonPhysical {
            what: "cv must be positive and finite",
        })?;
        let gas_constant =
            ensure_positive(gas_constant, "gas constant").map_err(|_| FluidError::NonPhysical {
                what: "gas constant must be positive and finite",
            })?;

        Ok(Self {
            cv,
            gas_constant,
            reference_density: 1.0,
            reference_energy: 1.0,
            reference_entropy: 0.0,
        })
    }

    /// Shift the entropy datum so that s(ρ₀, e₀) = s₀.
    pub fn with_reference(
        mut self,
        density: f64,
        energy: f64,
        entropy: f64,
    ) -> FluidResult<Self> {
        self.reference_density = ensure_positive(density, "reference density")?;
        self.reference_energy = ensure_positive(energy, "reference energy")?;
        self.reference_entropy = df_core::ensure_finite(entropy, "reference entropy")?;
        Ok(self)
    }

    pub fn cv(&self) -> f64 {
        self.cv
    }

    pub fn gas_constant(&self) -> f64 {
        self.gas_constant
    }
}

impl EntropySurrogate for IdealGasSurrogate {
    fn name(&self) -> &str {
        "ideal-gas"
    }

    fn evaluate(&self, density: f64, energy: f64) -> FluidResult<SurrogateResult> {
        if !(density.is_finite() && density > 0.0) {
            return Err(FluidError::OutOfDomain {
                what: "density must be positive",
                density,
                energy,
            });
        }
        if !(energy.is_finite() && energy > 0.0) {
            return Err(FluidError::OutOfDomain {
                what: "energy must be positive",
                density,
                energy,
            });
        }

        let (cv, r) = (self.cv, self.gas_constant);
        let entropy = self.reference_entropy + cv * (energy / self.reference_energy).ln()
            - r * (density / self.reference_density).ln();

        Ok(SurrogateResult::new(
            entropy,
            cv / energy,
            -r / density,
            -cv / (energy * energy),
            0.0,
            r / (density * density),
        ))
    }
}
