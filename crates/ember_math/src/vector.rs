//! Guarded vector operations.

use crate::Vec3;
use thiserror::Error;

/// Errors raised by vector arithmetic.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("division by zero")]
    DivisionByZero,
}

pub type MathResult<T> = Result<T, MathError>;

/// Divide every component of `v` by `s`.
///
/// A divisor of exactly zero is an error rather than a vector of infinities.
#[inline]
pub fn checked_div(v: Vec3, s: f64) -> MathResult<Vec3> {
    if s == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok(v / s)
}

/// Normalize `v`, returning the zero vector unchanged.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let length = v.length();
    if length == 0.0 {
        v
    } else {
        v / length
    }
}

/// Reflect `v` about the plane with unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// True when every component is within `eps` of zero.
#[inline]
pub fn near_zero(v: Vec3, eps: f64) -> bool {
    v.x.abs() < eps && v.y.abs() < eps && v.z.abs() < eps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_div() {
        let v = Vec3::new(2.0, 4.0, 6.0);
        assert_eq!(checked_div(v, 2.0), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(checked_div(v, 0.0), Err(MathError::DivisionByZero));
    }

    #[test]
    fn test_safe_normalize_zero() {
        assert_eq!(safe_normalize(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_safe_normalize_idempotent() {
        let samples = [
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-1e-3, 2e-4, 5e-5),
            Vec3::new(1e6, -2e6, 3e6),
            Vec3::new(0.0, 0.0, -7.5),
        ];
        for v in samples {
            let n = safe_normalize(safe_normalize(v));
            assert!((n.length() - 1.0).abs() < 1e-12, "{v:?} -> {n:?}");
        }
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::new(1e-9, -1e-9, 0.0), 1e-8));
        assert!(!near_zero(Vec3::new(1e-9, 1e-7, 0.0), 1e-8));
    }
}
