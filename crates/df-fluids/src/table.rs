//! Tabulated entropy manifold.
//!
//! `TabulatedSurrogate` stores the six surrogate outputs on a rectilinear
//! (density, energy) grid and answers queries by bilinear interpolation within
//! the enclosing cell. Reading table files is left to the caller; a table is
//! built from in-memory axes and node values, or sampled from another
//! surrogate.

use crate::error::{FluidError, FluidResult};
use crate::surrogate::{EntropySurrogate, SurrogateResult};

/// Behavior for queries outside the tabulated range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ExtrapolationPolicy {
    /// Fail the query with [`FluidError::OutOfDomain`].
    #[default]
    Reject,
    /// Clamp to the nearest edge and flag the result as extrapolated.
    ///
    /// Only the surrogate outputs are clamped. A state derived from a clamped
    /// result keeps the requested (ρ, e), so its pressure and temperature
    /// combine edge derivatives with the off-table point and match neither
    /// the edge state nor the true surface there.
    Clamp,
}

/// Entropy surface tabulated on a rectilinear (ρ, e) grid.
#[derive(Debug, Clone)]
pub struct TabulatedSurrogate {
    density: Vec<f64>,
    energy: Vec<f64>,
    /// Row-major by density: node (i, j) lives at `i * energy.len() + j`.
    nodes: Vec<[f64; 6]>,
    policy: ExtrapolationPolicy,
}

impl TabulatedSurrogate {
    /// Build a table from axes and row-major node values.
    ///
    /// # Errors
    ///
    /// Returns [`FluidError::InvalidArg`] if an axis has fewer than two
    /// points, is not strictly increasing, or if the node count does not
    /// match the grid.
    pub fn new(
        density: Vec<f64>,
        energy: Vec<f64>,
        nodes: Vec<SurrogateResult>,
    ) -> FluidResult<Self> {
        validate_axis(&density, "density axis must be finite, strictly increasing, len >= 2")?;
        validate_axis(&energy, "energy axis must be finite, strictly increasing, len >= 2")?;
        if nodes.len() != density.len() * energy.len() {
            return Err(FluidError::InvalidArg {
                what: "table node count must equal density.len() * energy.len()",
            });
        }

        Ok(Self {
            density,
            energy,
            nodes: nodes.into_iter().map(SurrogateResult::to_array).collect(),
            policy: ExtrapolationPolicy::default(),
        })
    }

    /// Tabulate `source` on the given grid.
    pub fn sample(
        source: &dyn EntropySurrogate,
        density: Vec<f64>,
        energy: Vec<f64>,
    ) -> FluidResult<Self> {
        let mut nodes = Vec::with_capacity(density.len() * energy.len());
        for &rho in &density {
            for &e in &energy {
                nodes.push(source.evaluate(rho, e)?);
            }
        }
        tracing::debug!(
            source = source.name(),
            n_density = density.len(),
            n_energy = energy.len(),
            "sampled entropy table"
        );
        Self::new(density, energy, nodes)
    }

    pub fn with_extrapolation(mut self, policy: ExtrapolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn extrapolation(&self) -> ExtrapolationPolicy {
        self.policy
    }

    /// Tabulated density range (min, max).
    pub fn density_range(&self) -> (f64, f64) {
        axis_range(&self.density)
    }

    /// Tabulated energy range (min, max).
    pub fn energy_range(&self) -> (f64, f64) {
        axis_range(&self.energy)
    }

    fn node(&self, i: usize, j: usize) -> &[f64; 6] {
        &self.nodes[i * self.energy.len() + j]
    }
}

impl EntropySurrogate for TabulatedSurrogate {
    fn name(&self) -> &str {
        "table"
    }

    fn evaluate(&self, density: f64, energy: f64) -> FluidResult<SurrogateResult> {
        if !density.is_finite() || !energy.is_finite() {
            return Err(FluidError::OutOfDomain {
                what: "table query must be finite",
                density,
                energy,
            });
        }

        let (rho_min, rho_max) = self.density_range();
        let (e_min, e_max) = self.energy_range();
        let outside = density < rho_min || density > rho_max || energy < e_min || energy > e_max;

        let (rho, e) = match (outside, self.policy) {
            (false, _) => (density, energy),
            (true, ExtrapolationPolicy::Reject) => {
                return Err(FluidError::OutOfDomain {
                    what: "query lies outside the tabulated range",
                    density,
                    energy,
                });
            }
            (true, ExtrapolationPolicy::Clamp) => {
                tracing::trace!(density, energy, "table query clamped to edge");
                (
                    density.clamp(rho_min, rho_max),
                    energy.clamp(e_min, e_max),
                )
            }
        };

        let (i, tr) = locate(&self.density, rho);
        let (j, te) = locate(&self.energy, e);

        let w00 = (1.0 - tr) * (1.0 - te);
        let w01 = (1.0 - tr) * te;
        let w10 = tr * (1.0 - te);
        let w11 = tr * te;

        let (n00, n01, n10, n11) = (
            self.node(i, j),
            self.node(i, j + 1),
            self.node(i + 1, j),
            self.node(i + 1, j + 1),
        );

        let mut values = [0.0; 6];
        for (k, v) in values.iter_mut().enumerate() {
            *v = w00 * n00[k] + w01 * n01[k] + w10 * n10[k] + w11 * n11[k];
        }

        let result = SurrogateResult::from_array(values);
        Ok(if outside {
            result.mark_extrapolated()
        } else {
            result
        })
    }
}

fn validate_axis(axis: &[f64], what: &'static str) -> FluidResult<()> {
    let increasing = axis.windows(2).all(|w| w[1] > w[0]);
    if axis.len() < 2 || !increasing || axis.iter().any(|v| !v.is_finite()) {
        return Err(FluidError::InvalidArg { what });
    }
    Ok(())
}

fn axis_range(axis: &[f64]) -> (f64, f64) {
    (axis[0], axis[axis.len() - 1])
}

/// Cell index and local coordinate in [0, 1] for an in-range `x`.
fn locate(axis: &[f64], x: f64) -> (usize, f64) {
    let i = axis
        .partition_point(|&a| a <= x)
        .saturating_sub(1)
        .min(axis.len() - 2);
    let t = (x - axis[i]) / (axis[i + 1] - axis[i]);
    (i, t)
}
