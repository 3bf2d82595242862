//! Surrogate query interface.
//!
//! A surrogate stands in for a closed-form equation of state. Given the
//! canonical pair (density, internal energy) it returns specific entropy and
//! its partial derivatives up to second order. Everything else in this
//! workspace is derived from that entropy surface.

use crate::error::FluidResult;

/// Entropy and its partial derivatives at one (density, energy) point.
///
/// Produced fresh on every query; never cached across Newton iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurrogateResult {
    /// Specific entropy s
    pub entropy: f64,
    /// ∂s/∂e at constant density
    pub ds_de: f64,
    /// ∂s/∂ρ at constant energy
    pub ds_drho: f64,
    /// ∂²s/∂e²
    pub d2s_de2: f64,
    /// ∂²s/∂e∂ρ
    pub d2s_dedrho: f64,
    /// ∂²s/∂ρ²
    pub d2s_drho2: f64,
    /// Set when the backend evaluated outside its data range.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing))]
    pub extrapolated: bool,
}

impl SurrogateResult {
    /// Build a result from the six surrogate outputs.
    pub fn new(
        entropy: f64,
        ds_de: f64,
        ds_drho: f64,
        d2s_de2: f64,
        d2s_dedrho: f64,
        d2s_drho2: f64,
    ) -> Self {
        Self {
            entropy,
            ds_de,
            ds_drho,
            d2s_de2,
            d2s_dedrho,
            d2s_drho2,
            extrapolated: false,
        }
    }

    /// Mark this result as an out-of-range evaluation.
    pub fn mark_extrapolated(mut self) -> Self {
        self.extrapolated = true;
        self
    }

    /// Outputs in storage order: s, ds/de, ds/dρ, d²s/de², d²s/dedρ, d²s/dρ².
    pub(crate) fn to_array(self) -> [f64; 6] {
        [
            self.entropy,
            self.ds_de,
            self.ds_drho,
            self.d2s_de2,
            self.d2s_dedrho,
            self.d2s_drho2,
        ]
    }

    pub(crate) fn from_array(values: [f64; 6]) -> Self {
        let [entropy, ds_de, ds_drho, d2s_de2, d2s_dedrho, d2s_drho2] = values;
        Self::new(entropy, ds_de, ds_drho, d2s_de2, d2s_dedrho, d2s_drho2)
    }
}

/// Capability shared by every surrogate backend (emulator, table, analytic).
///
/// Implementations must be thread-safe (Send + Sync) so one backend can be
/// shared behind an `Arc` by several per-worker fluid instances.
pub trait EntropySurrogate: Send + Sync {
    /// Backend name (for debugging/logging).
    fn name(&self) -> &str;

    /// Evaluate entropy and its derivatives at (density, energy).
    ///
    /// Backends that cannot answer outside their domain return
    /// [`FluidError::OutOfDomain`](crate::FluidError::OutOfDomain); backends
    /// that can extrapolate set [`SurrogateResult::extrapolated`] instead.
    fn evaluate(&self, density: f64, energy: f64) -> FluidResult<SurrogateResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_order_matches_fields() {
        let r = SurrogateResult::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(r.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(SurrogateResult::from_array(r.to_array()), r);
    }

    #[test]
    fn extrapolated_flag() {
        let r = SurrogateResult::new(0.0, 1.0, -1.0, -1.0, 0.0, 1.0);
        assert!(!r.extrapolated);
        assert!(r.mark_extrapolated().extrapolated);
    }
}
