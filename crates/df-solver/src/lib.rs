//! Inversion of an entropy-surrogate equation of state.
//!
//! The surrogate is queried in the canonical variables (ρ, e). This crate
//! answers state queries posed in other pairs, (P,T), (P,ρ), (ρ,T), (h,s)
//! and (P,s), by damped Newton-Raphson on (ρ, e). The analytic Jacobian comes
//! from the partial derivatives carried by each derived state.

pub mod config;
pub mod error;
pub mod fluid;
pub mod inversion;
pub mod newton;
pub mod settings;
pub mod sweep;

pub use config::{InitialGuess, Relaxation, SeedPolicy, SolverConfig, SolverTolerances};
pub use error::{SolverError, SolverResult};
pub use fluid::DataDrivenFluid;
pub use inversion::InputPair;
pub use newton::{SolveReport, SolveStatus};
pub use settings::{BackendDef, FluidSettings};
pub use sweep::{
    BatchPoint, BatchResult, SweepDefinition, SweepSpacing, solve_batch, sweep_second,
};
