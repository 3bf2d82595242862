//! Damped Newton-Raphson inversion shared by every input pair.

use crate::config::{Relaxation, SolverConfig, SolverTolerances};
use crate::error::{SolverError, SolverResult};
use crate::inversion::InputPair;
use df_core::DIVISOR_EPS;
use df_fluids::{EntropySurrogate, FluidState, evaluate_state};
use nalgebra::{Const, DimMin, SMatrix, SVector};
use tracing::{debug, trace, warn};

/// A fixed-size inversion posed on the canonical (ρ, e) variables.
pub(crate) trait InversionProblem<const N: usize> {
    fn pair(&self) -> InputPair;

    /// Unknown vector for the canonical point.
    fn unknowns(&self, density: f64, energy: f64) -> SVector<f64, N>;

    /// Canonical point for the unknown vector.
    fn canonical(&self, x: &SVector<f64, N>) -> (f64, f64);

    /// Signed residual, zero at the target.
    fn residual(&self, state: &FluidState) -> SVector<f64, N>;

    /// Absolute tolerance per residual component.
    fn tolerance(&self, tol: &SolverTolerances) -> SVector<f64, N>;

    /// Residual derivatives with respect to the unknowns.
    fn jacobian(&self, state: &FluidState) -> SMatrix<f64, N, N>;
}

/// How an iterative solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Converged,
    /// The iteration cap was reached; the state is the last iterate.
    MaxIterationsExceeded,
}

/// Outcome summary of one facade query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    pub pair: InputPair,
    pub status: SolveStatus,
    /// Newton updates applied
    pub iterations: usize,
    /// max |rᵢ| / tolᵢ at the returned state; below 1 means converged
    pub max_scaled_residual: f64,
}

impl SolveReport {
    /// Report for a state set directly from (ρ, e).
    pub fn direct() -> Self {
        Self {
            pair: InputPair::RhoE,
            status: SolveStatus::Converged,
            iterations: 0,
            max_scaled_residual: 0.0,
        }
    }

    pub fn converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

#[derive(Debug)]
pub(crate) struct NewtonOutcome {
    pub state: FluidState,
    pub report: SolveReport,
}

fn max_scaled<const N: usize>(residual: &SVector<f64, N>, tol: &SVector<f64, N>) -> f64 {
    residual
        .iter()
        .zip(tol.iter())
        .map(|(r, t)| r.abs() / t)
        .fold(0.0, f64::max)
}

/// Runs damped Newton from `seed` until every residual is inside its
/// tolerance or `config.max_iterations` updates have been applied.
///
/// Each iteration evaluates the surrogate once. Surrogate and derivation
/// errors abort the solve; hitting the cap does not.
pub(crate) fn damped_newton<P, const N: usize>(
    surrogate: &dyn EntropySurrogate,
    problem: &P,
    seed: (f64, f64),
    relaxation: Relaxation,
    config: &SolverConfig,
) -> SolverResult<NewtonOutcome>
where
    P: InversionProblem<N>,
    Const<N>: DimMin<Const<N>, Output = Const<N>>,
{
    let pair = problem.pair();
    let tol = problem.tolerance(&config.tolerances);
    let omega = relaxation.get();
    let mut x = problem.unknowns(seed.0, seed.1);

    for iteration in 0..config.max_iterations {
        let (density, energy) = problem.canonical(&x);
        let state = evaluate_state(surrogate, density, energy)?;
        let residual = problem.residual(&state);
        let scaled = max_scaled(&residual, &tol);

        trace!(%pair, iteration, density, energy, scaled_residual = scaled, "newton iterate");

        if scaled < 1.0 {
            debug!(%pair, iterations = iteration, density, energy, "inversion converged");
            return Ok(NewtonOutcome {
                state,
                report: SolveReport {
                    pair,
                    status: SolveStatus::Converged,
                    iterations: iteration,
                    max_scaled_residual: scaled,
                },
            });
        }

        let jacobian = problem.jacobian(&state);
        let determinant = jacobian.determinant();
        if !determinant.is_finite() || determinant.abs() < DIVISOR_EPS {
            return Err(SolverError::SingularJacobian {
                pair,
                iteration,
                determinant,
            });
        }

        let step = jacobian
            .lu()
            .solve(&residual)
            .ok_or(SolverError::SingularJacobian {
                pair,
                iteration,
                determinant,
            })?;
        x -= step * omega;
    }

    let (density, energy) = problem.canonical(&x);
    let state = evaluate_state(surrogate, density, energy)?;
    let scaled = max_scaled(&problem.residual(&state), &tol);
    let status = if scaled < 1.0 {
        SolveStatus::Converged
    } else {
        warn!(
            %pair,
            max_iterations = config.max_iterations,
            scaled_residual = scaled,
            density,
            energy,
            "inversion hit the iteration cap"
        );
        SolveStatus::MaxIterationsExceeded
    };

    Ok(NewtonOutcome {
        state,
        report: SolveReport {
            pair,
            status,
            iterations: config.max_iterations,
            max_scaled_residual: scaled,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inversion::{DensityTemperature, PressureTemperature};
    use df_fluids::IdealGasSurrogate;

    fn gas() -> IdealGasSurrogate {
        IdealGasSurrogate::new(0.7, 0.3).unwrap()
    }

    #[test]
    fn converges_on_ideal_gas_pt() {
        let problem = PressureTemperature {
            pressure: 101_325.0,
            temperature: 300.0,
        };
        let out = damped_newton(
            &gas(),
            &problem,
            (1.0, 200.0),
            Relaxation::FULL,
            &SolverConfig::default(),
        )
        .unwrap();

        assert!(out.report.converged());
        assert!(out.report.iterations < 10);
        assert!((out.state.pressure() - 101_325.0).abs() < 10.0);
        assert!((out.state.temperature() - 300.0).abs() < 1.0);
    }

    #[test]
    fn seed_already_converged_takes_no_steps() {
        let seed = evaluate_state(&gas(), 1.5, 3.0).unwrap();
        let problem = PressureTemperature {
            pressure: seed.pressure(),
            temperature: seed.temperature(),
        };
        let out = damped_newton(
            &gas(),
            &problem,
            (1.5, 3.0),
            Relaxation::FULL,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(out.report.iterations, 0);
        assert_eq!(out.state, seed);
    }

    #[test]
    fn cap_returns_last_iterate() {
        let problem = DensityTemperature {
            density: 1.0,
            temperature: 1.0e6,
        };
        let config = SolverConfig {
            max_iterations: 3,
            tolerances: SolverTolerances::uniform(1e-12),
        };
        let out = damped_newton(
            &gas(),
            &problem,
            (1.0, 5.0),
            Relaxation::new(0.01).unwrap(),
            &config,
        )
        .unwrap();

        assert_eq!(out.report.status, SolveStatus::MaxIterationsExceeded);
        assert_eq!(out.report.iterations, 3);
        assert!(out.report.max_scaled_residual > 1.0);
        assert!(out.state.energy() > 5.0);
    }

    #[test]
    fn surrogate_error_aborts() {
        // The first step drives density negative; the ideal gas rejects it.
        let problem = PressureTemperature {
            pressure: -1.0e9,
            temperature: 300.0,
        };
        let err = damped_newton(
            &gas(),
            &problem,
            (1.0, 200.0),
            Relaxation::FULL,
            &SolverConfig::default(),
        )
        .unwrap_err();
        assert!(err.is_backend());
    }

    #[test]
    fn scaled_residual_is_max_ratio() {
        let r = SVector::<f64, 2>::new(-20.0, 0.5);
        let t = SVector::<f64, 2>::new(10.0, 1.0);
        assert_eq!(max_scaled(&r, &t), 2.0);
    }
}
