use crate::AsmError;

/// Floating point type used throughout system
pub type Real = f64;

/// √3, the star/delta line-to-phase factor.
pub const SQRT_3: Real = 1.732_050_807_568_877_2;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
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

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, AsmError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AsmError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, AsmError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(AsmError::NonPositive { what, value: v })
    }
}

/// Round to a fixed number of decimals (half away from zero).
pub fn round_to(v: Real, decimals: u32) -> Real {
    let scale = 10_f64.powi(decimals as i32);
    (v * scale).round() / scale
}

/// Whole-number comparison used for no-op detection of operating targets.
///
/// `round_to` is not used here so that e.g. 399.6 and 400.4 both land on 400.
pub fn same_rounded(a: Real, b: Real) -> bool {
    #[allow(clippy::float_cmp)]
    {
        a.round() == b.round()
    }
}

/// Relative change in percent, rounded to one decimal: `(result/initial - 1) * 100`.
pub fn percent_change(initial: Real, result: Real) -> Result<Real, AsmError> {
    let initial = ensure_finite(initial, "percent change baseline")?;
    if initial == 0.0 {
        return Err(AsmError::InvalidArg {
            what: "percent change baseline is zero",
        });
    }
    let change = ensure_finite((result / initial - 1.0) * 100.0, "percent change")?;
    Ok(round_to(change, 1))
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
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "power").is_err());
        assert!(ensure_positive(-1.0, "power").is_err());
        assert_eq!(ensure_positive(2.5, "power").unwrap(), 2.5);
    }

    #[test]
    fn sqrt3_constant_matches_std() {
        assert!(nearly_equal(SQRT_3, 3_f64.sqrt(), Tolerances::default()));
    }

    #[test]
    fn round_to_decimals() {
        assert_eq!(round_to(692.820_323, 1), 692.8);
        assert_eq!(round_to(0.855, 0), 1.0);
        assert_eq!(round_to(-2.25, 1), -2.3);
    }

    #[test]
    fn same_rounded_whole_numbers() {
        assert!(same_rounded(399.6, 400.4));
        assert!(!same_rounded(399.4, 400.6));
    }

    #[test]
    fn percent_change_rounds_to_one_decimal() {
        assert_eq!(percent_change(100.0, 100.0).unwrap(), 0.0);
        assert_eq!(percent_change(400.0, 230.94).unwrap(), -42.3);
        assert!(percent_change(0.0, 1.0).is_err());
    }
}
