use crate::{LdError, LdResult};

/// Floating point type used throughout system
pub type Real = f64;

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

/// Rejects NaN and infinities, naming the offending quantity.
pub fn ensure_finite(value: Real, what: &'static str) -> LdResult<Real> {
    if value.is_finite() {
        return Ok(value);
    }
    Err(LdError::NonFinite { what, value })
}

/// Finite and strictly positive.
pub fn ensure_positive(value: Real, what: &'static str) -> LdResult<Real> {
    let value = ensure_finite(value, what)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(LdError::OutOfRange {
            what,
            value,
            bound: "> 0",
        })
    }
}

/// Finite and zero or above.
pub fn ensure_non_negative(value: Real, what: &'static str) -> LdResult<Real> {
    let value = ensure_finite(value, what)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(LdError::OutOfRange {
            what,
            value,
            bound: ">= 0",
        })
    }
}

/// Maximum over finite values; `None` for an empty slice.
pub fn max_of(values: &[Real]) -> Option<Real> {
    values.iter().copied().reduce(Real::max)
}

/// Minimum over finite values; `None` for an empty slice.
pub fn min_of(values: &[Real]) -> Option<Real> {
    values.iter().copied().reduce(Real::min)
}
