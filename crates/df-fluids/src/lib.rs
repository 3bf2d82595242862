//! df-fluids: entropy-surrogate fluid properties.
//!
//! Provides:
//! - The surrogate query interface (`EntropySurrogate`, `SurrogateResult`)
//! - Surrogate backends: analytic ideal gas and tabulated manifold
//! - State derivation from the entropy surface (`derive_state`)
//! - The derived thermodynamic state (`FluidState`)
//!
//! # Architecture
//!
//! A surrogate only knows entropy and its first and second derivatives in the
//! canonical variables (density, internal energy). Temperature, pressure, heat
//! capacities, speed of sound and the partials needed for inversion are all
//! derived here. Inverting the relation for other input pairs lives in
//! `df-solver`.
//!
//! # Example
//!
//! ```
//! use df_fluids::{IdealGasSurrogate, evaluate_state};
//!
//! let gas = IdealGasSurrogate::new(718.0, 287.0).unwrap();
//! let state = evaluate_state(&gas, 1.2, 215_000.0).unwrap();
//! assert!(state.pressure() > 0.0);
//! println!("{}", state.property_pack().summary());
//! ```

pub mod derive;
pub mod error;
pub mod ideal_gas;
pub mod state;
pub mod surrogate;
pub mod table;

// Re-exports for ergonomics
pub use derive::{derive_state, evaluate_state};
pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGasSurrogate;
pub use state::{FluidState, SpecEnergy, SpecEnthalpy, SpecEntropy, ThermoPropertyPack};
pub use surrogate::{EntropySurrogate, SurrogateResult};
pub use table::{ExtrapolationPolicy, TabulatedSurrogate};
