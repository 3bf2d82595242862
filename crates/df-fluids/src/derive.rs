//! State derivation from the entropy surface.
//!
//! With entropy expressed in the canonical variables (ρ, e), the fundamental
//! relation gives 1/T = ∂s/∂e|ρ and P = −ρ²T·∂s/∂ρ|e. Every other quantity
//! below follows from those two identities and the surrogate's curvature
//! terms.

use crate::error::FluidResult;
use crate::state::FluidState;
use crate::surrogate::{EntropySurrogate, SurrogateResult};
use df_core::{ensure_finite, ensure_nonzero};

/// Query `surrogate` at (ρ, e) and derive the full state.
pub fn evaluate_state(
    surrogate: &dyn EntropySurrogate,
    density: f64,
    energy: f64,
) -> FluidResult<FluidState> {
    ensure_finite(density, "density")?;
    ensure_finite(energy, "energy")?;
    let result = surrogate.evaluate(density, energy)?;
    derive_state(density, energy, &result)
}

/// Derive the thermodynamic state at (ρ, e) from a surrogate result.
///
/// ∂T/∂ρ|e is taken as zero: in the canonical form the density dependence of
/// temperature only enters through pressure. This is a modelling assumption of
/// the entropy-based formulation, not a general thermodynamic identity.
///
/// # Errors
///
/// - [`FluidError::SingularState`](crate::FluidError::SingularState) if ∂s/∂e|ρ, ∂T/∂e|ρ, ρ or cv is
///   numerically zero.
/// - [`FluidError::NonFinite`](crate::FluidError::NonFinite) if any input or derived value is NaN/Inf.
pub fn derive_state(
    density: f64,
    energy: f64,
    result: &SurrogateResult,
) -> FluidResult<FluidState> {
    let rho = ensure_nonzero(density, "density")?;
    let energy = ensure_finite(energy, "energy")?;
    let entropy = ensure_finite(result.entropy, "entropy")?;
    let ds_de = ensure_nonzero(result.ds_de, "ds/de|rho")?;
    let ds_drho = ensure_finite(result.ds_drho, "ds/drho|e")?;
    let d2s_de2 = ensure_finite(result.d2s_de2, "d2s/de2")?;
    let d2s_dedrho = ensure_finite(result.d2s_dedrho, "d2s/dedrho")?;
    let d2s_drho2 = ensure_finite(result.d2s_drho2, "d2s/drho2")?;

    let inv_ds_de = 1.0 / ds_de;

    let blue = ds_drho * (2.0 - rho * inv_ds_de * d2s_dedrho) + rho * d2s_drho2;
    let green = -inv_ds_de * d2s_de2 * ds_drho + d2s_dedrho;
    let sound_speed2 = -rho * inv_ds_de * (blue - rho * green * (ds_drho * inv_ds_de));

    let temperature = inv_ds_de;
    let pressure = -rho * rho * temperature * ds_drho;

    let dt_de_rho = -inv_ds_de * inv_ds_de * d2s_de2;
    let dt_drho_e = 0.0;

    let dp_de_rho = -rho * rho * dt_de_rho * ds_drho;
    let dp_drho_e = -2.0 * rho * temperature * ds_drho - rho * rho * temperature * d2s_drho2;

    let cv = 1.0 / ensure_nonzero(dt_de_rho, "dT/de|rho")?;
    let cp = cv * (1.0 + dp_de_rho / rho);
    let gamma = cp / ensure_nonzero(cv, "cv")?;
    let gas_constant = cp - cv;

    Ok(FluidState {
        density: rho,
        energy,
        entropy,
        temperature: ensure_finite(temperature, "temperature")?,
        pressure: ensure_finite(pressure, "pressure")?,
        cp: ensure_finite(cp, "cp")?,
        cv: ensure_finite(cv, "cv")?,
        gamma: ensure_finite(gamma, "gamma")?,
        gas_constant: ensure_finite(gas_constant, "gas constant")?,
        sound_speed2: ensure_finite(sound_speed2, "speed of sound squared")?,
        dt_de_rho: ensure_finite(dt_de_rho, "dT/de|rho")?,
        dt_drho_e,
        dp_de_rho: ensure_finite(dp_de_rho, "dP/de|rho")?,
        dp_drho_e: ensure_finite(dp_drho_e, "dP/drho|e")?,
        extrapolated: result.extrapolated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FluidError;
    use crate::IdealGasSurrogate;
    use df_core::{Tolerances, nearly_equal};

    const CV: f64 = 0.7;
    const R: f64 = 0.3;

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-12,
            rel: 1e-10,
        }
    }

    fn ideal() -> IdealGasSurrogate {
        IdealGasSurrogate::new(CV, R).unwrap()
    }

    #[test]
    fn ideal_gas_identities() {
        let (rho, e) = (1.3, 4.2);
        let state = evaluate_state(&ideal(), rho, e).unwrap();

        let t = e / CV;
        assert!(nearly_equal(state.temperature(), t, tol()));
        assert!(nearly_equal(state.pressure(), rho * R * t, tol()));
        assert!(nearly_equal(state.cv(), CV, tol()));
        assert!(nearly_equal(state.cp(), CV + R, tol()));
        assert!(nearly_equal(state.gas_constant(), R, tol()));
        assert!(nearly_equal(state.gamma(), (CV + R) / CV, tol()));
        assert!(nearly_equal(state.dt_de_rho(), 1.0 / CV, tol()));
        assert_eq!(state.dt_drho_e(), 0.0);
        assert!(nearly_equal(state.dp_de_rho(), rho * R / CV, tol()));
        assert!(nearly_equal(state.dp_drho_e(), R * t, tol()));
    }

    #[test]
    fn ideal_gas_speed_of_sound_is_gamma_r_t() {
        let (rho, e) = (0.8, 7.0);
        let state = evaluate_state(&ideal(), rho, e).unwrap();
        let gamma = (CV + R) / CV;
        let expected = gamma * R * (e / CV);
        assert!(nearly_equal(state.speed_of_sound_squared(), expected, tol()));
        let a = state.speed_of_sound().unwrap();
        assert!(nearly_equal(a, expected.sqrt(), tol()));
    }

    #[test]
    fn entropy_partials_round_trip_through_state() {
        let (rho, e) = (2.0, 3.0);
        let raw = ideal().evaluate(rho, e).unwrap();
        let state = derive_state(rho, e, &raw).unwrap();
        assert!(nearly_equal(state.ds_de_rho(), raw.ds_de, tol()));
        assert!(nearly_equal(state.ds_drho_e(), raw.ds_drho, tol()));
        assert!(nearly_equal(
            state.enthalpy(),
            e + state.pressure() / rho,
            tol()
        ));
    }

    #[test]
    fn zero_ds_de_is_singular() {
        let raw = SurrogateResult::new(1.0, 0.0, -0.3, -0.1, 0.0, 0.2);
        let err = derive_state(1.0, 1.0, &raw).unwrap_err();
        assert!(matches!(
            err,
            FluidError::SingularState {
                what: "ds/de|rho",
                ..
            }
        ));
    }

    #[test]
    fn near_zero_ds_de_is_singular() {
        let raw = SurrogateResult::new(1.0, 1e-18, -0.3, -0.1, 0.0, 0.2);
        assert!(derive_state(1.0, 1.0, &raw).unwrap_err().is_singular());
    }

    #[test]
    fn flat_temperature_is_singular() {
        // d2s/de2 = 0 makes dT/de vanish, so cv = 1/(dT/de) is undefined.
        let raw = SurrogateResult::new(1.0, 0.5, -0.3, 0.0, 0.0, 0.2);
        let err = derive_state(1.0, 1.0, &raw).unwrap_err();
        assert!(matches!(
            err,
            FluidError::SingularState {
                what: "dT/de|rho",
                ..
            }
        ));
    }

    #[test]
    fn nan_input_is_rejected() {
        let raw = SurrogateResult::new(f64::NAN, 0.5, -0.3, -0.1, 0.0, 0.2);
        let err = derive_state(1.0, 1.0, &raw).unwrap_err();
        assert!(matches!(err, FluidError::NonFinite { what: "entropy", .. }));
    }

    #[test]
    fn extrapolated_flag_is_carried() {
        let raw = ideal().evaluate(1.0, 1.0).unwrap().mark_extrapolated();
        let state = derive_state(1.0, 1.0, &raw).unwrap();
        assert!(state.is_extrapolated());
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = evaluate_state(&ideal(), 1.7, 2.9).unwrap();
        let b = evaluate_state(&ideal(), 1.7, 2.9).unwrap();
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::IdealGasSurrogate;
    use df_core::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cp_minus_cv_is_gas_constant(
            rho in 0.1_f64..10.0,
            e in 1.0_f64..10.0,
            cv in 0.3_f64..3.0,
            r in 0.05_f64..1.0,
        ) {
            let surrogate = IdealGasSurrogate::new(cv, r).unwrap();
            let state = evaluate_state(&surrogate, rho, e).unwrap();
            let tol = Tolerances { abs: 1e-12, rel: 1e-9 };
            prop_assert!(nearly_equal(state.cp() - state.cv(), state.gas_constant(), tol));
            prop_assert!(nearly_equal(state.gas_constant(), r, tol));
        }
    }
}
