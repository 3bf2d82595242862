use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Magnitude below which a divisor is treated as zero.
pub const DIVISOR_EPS: Real = Real::EPSILON;

/// Absolute/relative tolerance pair for float comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Returns `v` if it is finite and usable as a divisor.
///
/// Values with magnitude below [`DIVISOR_EPS`] are rejected so that the
/// caller never produces Inf/NaN from a division.
pub fn ensure_nonzero(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v.abs() < DIVISOR_EPS {
        return Err(CoreError::NearZero { what, value: v });
    }
    Ok(v)
}

/// Returns `v` if it is finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v <= 0.0 {
        return Err(CoreError::InvalidArg { what });
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_nonzero_rejects_tiny_divisors() {
        assert!(ensure_nonzero(1e-3, "d").is_ok());
        assert!(ensure_nonzero(-2.5, "d").is_ok());

        let err = ensure_nonzero(1e-17, "ds/de").unwrap_err();
        assert!(matches!(err, CoreError::NearZero { what: "ds/de", .. }));
        assert!(matches!(
            ensure_nonzero(0.0, "d").unwrap_err(),
            CoreError::NearZero { .. }
        ));
        assert!(matches!(
            ensure_nonzero(Real::INFINITY, "d").unwrap_err(),
            CoreError::NonFinite { .. }
        ));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert_eq!(ensure_positive(2.0, "rho").unwrap(), 2.0);
        assert!(ensure_positive(0.0, "rho").is_err());
        assert!(ensure_positive(-1.0, "rho").is_err());
        assert!(ensure_positive(Real::NAN, "rho").is_err());
    }
}
