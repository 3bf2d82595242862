//! Parameter sweeps and parallel batch solves.
//!
//! A batch hands each rayon worker its own clone of a template facade, so
//! the surrogate is shared while the mutable state is not.

use crate::error::{SolverError, SolverResult};
use crate::fluid::DataDrivenFluid;
use crate::inversion::InputPair;
use crate::newton::SolveReport;
use df_fluids::FluidState;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepSpacing {
    /// Uniformly spaced points
    #[default]
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// A one-dimensional sweep of a target value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    #[serde(default)]
    pub spacing: SweepSpacing,
}

impl SweepDefinition {
    pub fn new(start: f64, end: f64, num_points: usize, spacing: SweepSpacing) -> SolverResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SolverError::InvalidConfig {
                what: "sweep bounds must be finite".to_string(),
            });
        }
        if num_points < 2 {
            return Err(SolverError::InvalidConfig {
                what: "sweep must have at least 2 points".to_string(),
            });
        }
        if (start - end).abs() < 1e-12 {
            return Err(SolverError::InvalidConfig {
                what: "sweep start and end must differ".to_string(),
            });
        }
        if spacing == SweepSpacing::Logarithmic && (start <= 0.0 || end <= 0.0) {
            return Err(SolverError::InvalidConfig {
                what: "logarithmic sweep bounds must be positive".to_string(),
            });
        }
        Ok(Self {
            start,
            end,
            num_points,
            spacing,
        })
    }

    /// Generate all points in the sweep. The last point is exactly `end`.
    pub fn generate_points(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }
        let last = (self.num_points - 1) as f64;
        let mut points: Vec<f64> = match self.spacing {
            SweepSpacing::Linear => {
                let delta = (self.end - self.start) / last;
                (0..self.num_points)
                    .map(|i| self.start + i as f64 * delta)
                    .collect()
            }
            SweepSpacing::Logarithmic => {
                let (a, b) = (self.start.ln(), self.end.ln());
                let delta = (b - a) / last;
                (0..self.num_points)
                    .map(|i| (a + i as f64 * delta).exp())
                    .collect()
            }
        };
        points[self.num_points - 1] = self.end;
        points
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spacing = match self.spacing {
            SweepSpacing::Linear => "linear",
            SweepSpacing::Logarithmic => "log",
        };
        write!(
            f,
            "sweep {} .. {} ({} points, {})",
            self.start, self.end, self.num_points, spacing
        )
    }
}

/// One solved batch point.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPoint {
    pub state: FluidState,
    pub report: SolveReport,
}

/// Results of a batch solve, in target order.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub pair: InputPair,
    pub targets: Vec<(f64, f64)>,
    pub outcomes: Vec<SolverResult<BatchPoint>>,
}

impl BatchResult {
    /// Points that returned a state (converged or capped).
    pub fn num_successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn num_failed(&self) -> usize {
        self.outcomes.len() - self.num_successful()
    }

    /// Points that returned a state within tolerance.
    pub fn num_converged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Ok(point) if point.report.converged()))
            .count()
    }

    /// States of successful points, `None` where the solve failed.
    pub fn states(&self) -> Vec<Option<&FluidState>> {
        self.outcomes
            .iter()
            .map(|o| o.as_ref().ok().map(|point| &point.state))
            .collect()
    }
}

/// Solve every `(first, second)` target for `pair` in parallel.
///
/// Each worker clones `template` once and reuses it for the targets it
/// handles. With [`crate::SeedPolicy::WarmStart`] the seed for a point then
/// depends on scheduling; use the fixed policy for reproducible batches.
pub fn solve_batch(
    template: &DataDrivenFluid,
    pair: InputPair,
    targets: &[(f64, f64)],
) -> BatchResult {
    let outcomes: Vec<SolverResult<BatchPoint>> = targets
        .par_iter()
        .map_init(
            || template.clone(),
            |fluid, &(first, second)| -> SolverResult<BatchPoint> {
                let report = fluid.solve(pair, first, second)?;
                Ok(BatchPoint {
                    state: fluid.state().clone(),
                    report,
                })
            },
        )
        .collect();

    let result = BatchResult {
        pair,
        targets: targets.to_vec(),
        outcomes,
    };
    debug!(
        %pair,
        points = targets.len(),
        successful = result.num_successful(),
        failed = result.num_failed(),
        "batch solve finished"
    );
    result
}

/// Sweep the second input of `pair` with the first held at `first`.
pub fn sweep_second(
    template: &DataDrivenFluid,
    pair: InputPair,
    first: f64,
    sweep: &SweepDefinition,
) -> BatchResult {
    let targets: Vec<(f64, f64)> = sweep
        .generate_points()
        .into_iter()
        .map(|second| (first, second))
        .collect();
    solve_batch(template, pair, &targets)
}
