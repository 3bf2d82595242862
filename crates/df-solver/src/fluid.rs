//! Fluid state facade backed by an entropy surrogate.

use crate::config::{InitialGuess, Relaxation, SeedPolicy, SolverConfig};
use crate::error::SolverResult;
use crate::inversion::{
    DensityTemperature, EnthalpyEntropy, InputPair, PressureDensity, PressureEntropy,
    PressureTemperature,
};
use crate::newton::{InversionProblem, SolveReport, damped_newton};
use df_core::ensure_finite;
use df_fluids::{EntropySurrogate, FluidState, evaluate_state};
use nalgebra::{Const, DimMin};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Thermodynamic state holder that answers queries in any supported input
/// pair by inverting the surrogate's entropy relation.
///
/// Every setter replaces the whole state at once. If a query fails the
/// previous state is kept. A query that runs out of iterations still succeeds:
/// the state then holds the last iterate and the returned [`SolveReport`] says
/// so.
///
/// # Threading
///
/// One instance serves one thread: setters take `&mut self`. The surrogate is
/// shared behind an `Arc`, so cloning a facade per worker is cheap and is how
/// batch work is parallelised (see [`crate::sweep::solve_batch`]).
#[derive(Clone)]
pub struct DataDrivenFluid {
    surrogate: Arc<dyn EntropySurrogate>,
    initial_guess: InitialGuess,
    relaxation: Relaxation,
    config: SolverConfig,
    seed_policy: SeedPolicy,
    state: FluidState,
    last_converged: Option<(f64, f64)>,
    last_report: Option<SolveReport>,
}

impl DataDrivenFluid {
    /// Create a facade and evaluate the initial guess so a valid state is
    /// available immediately.
    pub fn new(
        surrogate: Arc<dyn EntropySurrogate>,
        initial_guess: InitialGuess,
        relaxation: Relaxation,
    ) -> SolverResult<Self> {
        initial_guess.validate()?;
        let state = evaluate_state(
            surrogate.as_ref(),
            initial_guess.density,
            initial_guess.energy,
        )?;
        debug!(
            backend = surrogate.name(),
            density = initial_guess.density,
            energy = initial_guess.energy,
            relaxation = relaxation.get(),
            "data-driven fluid ready"
        );
        Ok(Self {
            surrogate,
            initial_guess,
            relaxation,
            config: SolverConfig::default(),
            seed_policy: SeedPolicy::default(),
            state,
            last_converged: None,
            last_report: None,
        })
    }

    pub fn with_config(mut self, config: SolverConfig) -> SolverResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_seed_policy(mut self, seed_policy: SeedPolicy) -> Self {
        self.seed_policy = seed_policy;
        self
    }

    /// Current thermodynamic state.
    pub fn state(&self) -> &FluidState {
        &self.state
    }

    /// Report of the most recent successful query, if any.
    pub fn last_report(&self) -> Option<&SolveReport> {
        self.last_report.as_ref()
    }

    pub fn initial_guess(&self) -> InitialGuess {
        self.initial_guess
    }

    pub fn relaxation(&self) -> Relaxation {
        self.relaxation
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn seed_policy(&self) -> SeedPolicy {
        self.seed_policy
    }

    pub fn backend_name(&self) -> &str {
        self.surrogate.name()
    }

    /// Set the state directly from density and specific internal energy.
    pub fn set_state_rhoe(&mut self, density: f64, energy: f64) -> SolverResult<()> {
        let state = evaluate_state(self.surrogate.as_ref(), density, energy)?;
        self.last_converged = Some((density, energy));
        self.state = state;
        self.last_report = Some(SolveReport::direct());
        Ok(())
    }

    /// Set the state from pressure (Pa) and temperature (K).
    pub fn set_state_pt(&mut self, pressure: f64, temperature: f64) -> SolverResult<SolveReport> {
        ensure_finite(pressure, "target pressure")?;
        ensure_finite(temperature, "target temperature")?;
        self.run(&PressureTemperature {
            pressure,
            temperature,
        })
    }

    /// Set the state from pressure (Pa) and density (kg/m³).
    pub fn set_state_prho(&mut self, pressure: f64, density: f64) -> SolverResult<SolveReport> {
        ensure_finite(pressure, "target pressure")?;
        ensure_finite(density, "target density")?;
        self.run(&PressureDensity { pressure, density })
    }

    /// Set the state from density (kg/m³) and temperature (K).
    pub fn set_state_rhot(&mut self, density: f64, temperature: f64) -> SolverResult<SolveReport> {
        ensure_finite(density, "target density")?;
        ensure_finite(temperature, "target temperature")?;
        self.run(&DensityTemperature {
            density,
            temperature,
        })
    }

    /// Set the state from specific enthalpy (J/kg) and entropy (J/(kg·K)).
    pub fn set_state_hs(&mut self, enthalpy: f64, entropy: f64) -> SolverResult<SolveReport> {
        ensure_finite(enthalpy, "target enthalpy")?;
        ensure_finite(entropy, "target entropy")?;
        self.run(&EnthalpyEntropy { enthalpy, entropy })
    }

    /// Set the state from pressure (Pa) and specific entropy (J/(kg·K)).
    pub fn set_state_ps(&mut self, pressure: f64, entropy: f64) -> SolverResult<SolveReport> {
        ensure_finite(pressure, "target pressure")?;
        ensure_finite(entropy, "target entropy")?;
        self.run(&PressureEntropy { pressure, entropy })
    }

    /// Specific internal energy matching `pressure` at `density`.
    ///
    /// Runs the same energy-only solve as [`Self::set_state_prho`] and leaves
    /// the resulting state in place.
    pub fn energy_from_prho(
        &mut self,
        pressure: f64,
        density: f64,
    ) -> SolverResult<(f64, SolveReport)> {
        let report = self.set_state_prho(pressure, density)?;
        Ok((self.state.energy(), report))
    }

    /// Dispatch on a tagged input pair.
    pub fn solve(&mut self, pair: InputPair, first: f64, second: f64) -> SolverResult<SolveReport> {
        match pair {
            InputPair::RhoE => {
                self.set_state_rhoe(first, second)?;
                Ok(SolveReport::direct())
            }
            InputPair::PT => self.set_state_pt(first, second),
            InputPair::PRho => self.set_state_prho(first, second),
            InputPair::RhoT => self.set_state_rhot(first, second),
            InputPair::HS => self.set_state_hs(first, second),
            InputPair::PS => self.set_state_ps(first, second),
        }
    }

    fn seed(&self) -> (f64, f64) {
        match (self.seed_policy, self.last_converged) {
            (SeedPolicy::WarmStart, Some(seed)) => seed,
            _ => (self.initial_guess.density, self.initial_guess.energy),
        }
    }

    fn run<P, const N: usize>(&mut self, problem: &P) -> SolverResult<SolveReport>
    where
        P: InversionProblem<N>,
        Const<N>: DimMin<Const<N>, Output = Const<N>>,
    {
        let outcome = damped_newton(
            self.surrogate.as_ref(),
            problem,
            self.seed(),
            self.relaxation,
            &self.config,
        )?;
        if outcome.report.converged() {
            self.last_converged = Some((outcome.state.density(), outcome.state.energy()));
        }
        self.state = outcome.state;
        self.last_report = Some(outcome.report);
        Ok(outcome.report)
    }
}

impl fmt::Debug for DataDrivenFluid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataDrivenFluid")
            .field("backend", &self.surrogate.name())
            .field("initial_guess", &self.initial_guess)
            .field("relaxation", &self.relaxation)
            .field("config", &self.config)
            .field("seed_policy", &self.seed_policy)
            .field("state", &self.state)
            .finish()
    }
}
