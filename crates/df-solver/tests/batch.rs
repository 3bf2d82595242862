//! Parallel batch solves and sweeps.

use df_fluids::{IdealGasSurrogate, evaluate_state};
use df_solver::{
    DataDrivenFluid, FluidSettings, InitialGuess, InputPair, Relaxation, SolverConfig,
    SolverTolerances, SweepDefinition, SweepSpacing, solve_batch, sweep_second,
};
use std::sync::Arc;

fn template() -> DataDrivenFluid {
    DataDrivenFluid::new(
        Arc::new(IdealGasSurrogate::new(0.7, 0.3).unwrap()),
        InitialGuess::new(1.0, 5.5).unwrap(),
        Relaxation::new(0.5).unwrap(),
    )
    .unwrap()
    .with_config(SolverConfig {
        max_iterations: 500,
        tolerances: SolverTolerances::uniform(1e-10),
    })
    .unwrap()
}

#[test]
fn batch_preserves_target_order() {
    let gas = IdealGasSurrogate::new(0.7, 0.3).unwrap();
    let canonical: Vec<(f64, f64)> = (0..32)
        .map(|i| (0.5 + 0.25 * i as f64, 1.0 + 0.2 * i as f64))
        .collect();
    let targets: Vec<(f64, f64)> = canonical
        .iter()
        .map(|&(rho, e)| {
            let s = evaluate_state(&gas, rho, e).unwrap();
            (s.pressure(), s.temperature())
        })
        .collect();

    let result = solve_batch(&template(), InputPair::PT, &targets);
    assert_eq!(result.pair, InputPair::PT);
    assert_eq!(result.targets, targets);
    assert_eq!(result.num_successful(), targets.len());
    assert_eq!(result.num_converged(), targets.len());
    assert_eq!(result.num_failed(), 0);

    for (state, &(rho, e)) in result.states().into_iter().zip(&canonical) {
        let state = state.unwrap();
        assert!((state.density() - rho).abs() / rho < 1e-6);
        assert!((state.energy() - e).abs() / e < 1e-6);
    }
}

#[test]
fn failures_are_counted_not_fatal() {
    let targets = vec![(1.0, 2.0), (-1.0e9, 3.0), (2.0, 4.0)];
    let result = solve_batch(&template(), InputPair::PT, &targets);

    assert_eq!(result.num_successful(), 2);
    assert_eq!(result.num_failed(), 1);
    assert!(result.outcomes[1].as_ref().unwrap_err().is_backend());
    assert!(result.states()[1].is_none());
}

#[test]
fn temperature_sweep_at_fixed_density() {
    let sweep = SweepDefinition::new(2.0, 6.0, 9, SweepSpacing::Linear).unwrap();
    let result = sweep_second(&template(), InputPair::RhoT, 1.2, &sweep);

    assert_eq!(result.num_converged(), 9);
    for (state, expected) in result.states().into_iter().zip(sweep.generate_points()) {
        let state = state.unwrap();
        assert_eq!(state.density(), 1.2);
        assert!((state.temperature() - expected).abs() < 1e-9);
    }
}

#[test]
fn settings_built_fluid_runs_batches() {
    let fluid = FluidSettings::ideal_air().build().unwrap();
    let sweep = SweepDefinition::new(1.0e5, 1.0e6, 4, SweepSpacing::Logarithmic).unwrap();
    let result = sweep_second(&fluid, InputPair::PRho, 0.0, &sweep);

    // ρ = 0 is outside the ideal-gas domain at every point.
    assert_eq!(result.num_failed(), 4);

    let targets: Vec<(f64, f64)> = sweep
        .generate_points()
        .into_iter()
        .map(|p| (p, 300.0))
        .collect();
    let result = solve_batch(&fluid, InputPair::PT, &targets);
    assert_eq!(result.num_converged(), 4);
}
