//! Fixed-point primitives

use crate::CurveError;

/// Multiply two u64 values into u128 (cannot overflow)
#[inline]
pub fn mul_wide(a: u64, b: u64) -> u128 {
    (a as u128) * (b as u128)
}

/// floor(numerator * precision / denominator)
///
/// The product is taken in u128, so only the final quotient has to fit in
/// u64. Fails with `DivisionByZero` on a zero denominator and `Overflow`
/// when the quotient exceeds `u64::MAX`.
#[inline]
pub fn scaled_ratio(numerator: u64, denominator: u64, precision: u64) -> Result<u64, CurveError> {
    if denominator == 0 {
        return Err(CurveError::DivisionByZero);
    }
    let quotient = mul_wide(numerator, precision) / denominator as u128;
    u64::try_from(quotient).map_err(|_| CurveError::Overflow)
}

#[inline]
pub fn checked_add(a: u64, b: u64) -> Result<u64, CurveError> {
    a.checked_add(b).ok_or(CurveError::Overflow)
}

#[inline]
pub fn checked_sub(a: u64, b: u64) -> Result<u64, CurveError> {
    a.checked_sub(b).ok_or(CurveError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_ratio_floors() {
        assert_eq!(scaled_ratio(1, 3, 1_000_000), Ok(333_333));
        assert_eq!(scaled_ratio(2, 3, 1_000_000), Ok(666_666));
        assert_eq!(scaled_ratio(1000, 1300, 1_000_000), Ok(769_230));
        assert_eq!(scaled_ratio(300, 1000, 1000), Ok(300));
    }

    #[test]
    fn test_scaled_ratio_wide_intermediate() {
        // numerator * precision overflows u64 but the quotient does not
        let n = u64::MAX / 2;
        assert_eq!(scaled_ratio(n, n, 1_000_000), Ok(1_000_000));
        assert_eq!(scaled_ratio(u64::MAX, u64::MAX, u64::MAX), Ok(u64::MAX));
    }

    #[test]
    fn test_scaled_ratio_errors() {
        assert_eq!(scaled_ratio(1, 0, 1_000_000), Err(CurveError::DivisionByZero));
        assert_eq!(scaled_ratio(u64::MAX, 1, 2), Err(CurveError::Overflow));
    }

    #[test]
    fn test_checked_helpers() {
        assert_eq!(checked_add(u64::MAX, 1), Err(CurveError::Overflow));
        assert_eq!(checked_sub(0, 1), Err(CurveError::Overflow));
        assert_eq!(checked_add(2, 3), Ok(5));
        assert_eq!(checked_sub(5, 3), Ok(2));
    }
}

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// F1: scaled_ratio never exceeds the exact quotient and is within 1 of it
    #[kani::proof]
    fn f1_scaled_ratio_is_floor() {
        let n: u64 = kani::any();
        let d: u64 = kani::any();
        let p: u64 = kani::any();
        kani::assume(d > 0);
        kani::assume(n < 1 << 32 && p < 1 << 32);

        if let Ok(q) = scaled_ratio(n, d, p) {
            let exact = mul_wide(n, p);
            assert!(mul_wide(q, d) <= exact, "F1: floor must not exceed exact");
            assert!(mul_wide(q, d) + d as u128 > exact, "F1: floor within one unit");
        }
    }

    /// F2: zero denominator is always rejected
    #[kani::proof]
    fn f2_zero_denominator_rejected() {
        let n: u64 = kani::any();
        let p: u64 = kani::any();
        assert!(scaled_ratio(n, 0, p) == Err(CurveError::DivisionByZero));
    }
}
