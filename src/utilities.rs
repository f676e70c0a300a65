//! Magnitude and comparison helpers for (numerator, denominator, exponent) triples
//!
//! These helpers work on bare big integers and never look at the approximation
//! flags carried by [`crate::Fraction`].

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};

/// Largest number of bytes an exponent may occupy before an operation fails with
/// [`Error::Overflow`]
pub const MAX_EXPONENT_BYTES: u64 = 32;

/// Largest decimal exponent a continued fraction expansion multiplies out
pub const MAX_EXPANSION_EXPONENT: u32 = 1_000_000;

/// A bare `n / d * 10^e` triple, `d > 0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nde {
    pub n: BigInt,
    pub d: BigInt,
    pub e: BigInt,
}

impl Nde {
    pub fn new(n: BigInt, d: BigInt, e: BigInt) -> Self {
        Self { n, d, e }
    }

    /// The same triple with a non-negative numerator
    pub fn abs(&self) -> Self {
        Self {
            n: self.n.abs(),
            d: self.d.clone(),
            e: self.e.clone(),
        }
    }
}

pub(crate) fn ten() -> BigInt {
    BigInt::from(10u32)
}

/// `10^k`
pub(crate) fn pow10(k: u32) -> BigInt {
    ten().pow(k)
}

/// `10^k` for a big exponent; exponents that do not fit `u32` overflow
pub(crate) fn pow10_big(k: &BigInt) -> Result<BigInt> {
    if k.is_negative() {
        return Err(Error::invalid_argument("negative power of ten"));
    }
    let k = k.to_u32().ok_or(Error::Overflow)?;
    Ok(pow10(k))
}

/// `10^k` by repeated squaring, checking for cancellation before every step
pub(crate) fn pow10_cancellable(cancel: &CancellationToken, mut k: u32) -> Result<BigInt> {
    let mut result = BigInt::one();
    let mut base = ten();

    while k > 0 {
        cancel.check()?;

        if k & 1 == 1 {
            result *= &base;
        }
        k >>= 1;
        if k > 0 {
            base = &base * &base;
        }
    }

    Ok(result)
}

/// Number of bytes of the two's complement representation
pub(crate) fn byte_count(x: &BigInt) -> u64 {
    (x.bits() + 8) / 8
}

/// Fail with [`Error::Overflow`] when an exponent outgrows [`MAX_EXPONENT_BYTES`]
pub(crate) fn check_exponent(e: &BigInt) -> Result<()> {
    if byte_count(e) > MAX_EXPONENT_BYTES {
        tracing::warn!(target: "utilities", bits = e.bits(), "exponent overflow");
        return Err(Error::Overflow);
    }
    Ok(())
}

/// Greatest common divisor of two non-negative integers
pub fn greatest_common_divisor(
    cancel: &CancellationToken,
    a: &BigInt,
    b: &BigInt,
) -> Result<BigInt> {
    if a.is_negative() || b.is_negative() {
        return Err(Error::invalid_argument("GCD arguments must be non-negative"));
    }

    let word = BigInt::from(u64::MAX);
    if a < &word && b < &word {
        return Ok(a.gcd(b));
    }

    greatest_common_divisor_euclidean(cancel, a.clone(), b.clone())
}

/// Euclid's algorithm, checking for cancellation at every step
pub fn greatest_common_divisor_euclidean(
    cancel: &CancellationToken,
    mut a: BigInt,
    mut b: BigInt,
) -> Result<BigInt> {
    if a.is_negative() || b.is_negative() {
        return Err(Error::invalid_argument("GCD arguments must be non-negative"));
    }

    loop {
        cancel.check()?;

        if b.is_zero() {
            return Ok(a);
        }

        let r = &a % &b;
        a = b;
        b = r;
    }
}

/// Least common multiple of two non-negative integers
pub fn least_common_multiple(cancel: &CancellationToken, a: &BigInt, b: &BigInt) -> Result<BigInt> {
    if a.is_negative() || b.is_negative() {
        return Err(Error::invalid_argument("LCM arguments must be non-negative"));
    }
    if a.is_zero() && b.is_zero() {
        return Ok(BigInt::zero());
    }

    let gcd = greatest_common_divisor(cancel, a, b)?;

    Ok(b / gcd * a)
}

/// Move trailing decimal zeroes out of `x`; returns the trimmed value and the number
/// of zeroes removed. The sign is kept.
pub fn trim_zeroes(cancel: &CancellationToken, x: &BigInt) -> Result<(BigInt, u64)> {
    let (trimmed, count) = trim_zeroes_non_negative(cancel, x.abs())?;

    Ok((if x.is_negative() { -trimmed } else { trimmed }, count))
}

/// [`trim_zeroes`] for a value known to be non-negative
pub fn trim_zeroes_non_negative(cancel: &CancellationToken, mut x: BigInt) -> Result<(BigInt, u64)> {
    debug_assert!(!x.is_negative());

    let hundred = BigInt::from(100u32);
    let ten = ten();
    let mut count = 0u64;

    if x >= hundred {
        loop {
            cancel.check()?;

            let (q, r) = x.div_rem(&hundred);
            if !r.is_zero() {
                break;
            }

            x = q;
            count += 2;
        }
    }

    if x >= ten {
        loop {
            cancel.check()?;

            let (q, r) = x.div_rem(&ten);
            if !r.is_zero() {
                break;
            }

            x = q;
            count += 1;
        }
    }

    Ok((x, count))
}

/// Number of decimal digits of `|x|`; zero has one digit
pub fn number_of_digits(cancel: &CancellationToken, x: &BigInt) -> Result<usize> {
    cancel.check()?;

    Ok(x.magnitude().to_str_radix(10).len())
}

/// Expand the exponent into the numerator or the denominator
pub(crate) fn nde_to_nd(f: &Nde) -> Result<(BigInt, BigInt)> {
    match f.e.sign() {
        num_bigint::Sign::NoSign => Ok((f.n.clone(), f.d.clone())),
        num_bigint::Sign::Plus => Ok((&f.n * pow10_big(&f.e)?, f.d.clone())),
        num_bigint::Sign::Minus => Ok((f.n.clone(), &f.d * pow10_big(&-&f.e)?)),
    }
}

/// [`nde_to_nd`] for exponents up to `max_exponent`, observing the token while the
/// power of ten is built
pub(crate) fn nde_to_nd_bounded(
    cancel: &CancellationToken,
    f: &Nde,
    max_exponent: u32,
) -> Result<(BigInt, BigInt)> {
    let k = f
        .e
        .magnitude()
        .to_u32()
        .filter(|k| *k <= max_exponent)
        .ok_or_else(|| {
            tracing::warn!(target: "utilities", e = %f.e, max_exponent, "exponent too large to expand");
            Error::Overflow
        })?;

    match f.e.sign() {
        num_bigint::Sign::NoSign => Ok((f.n.clone(), f.d.clone())),
        num_bigint::Sign::Plus => Ok((&f.n * pow10_cancellable(cancel, k)?, f.d.clone())),
        num_bigint::Sign::Minus => Ok((f.n.clone(), &f.d * pow10_cancellable(cancel, k)?)),
    }
}

/// Compare two triples by value
pub fn compare(f1: &Nde, f2: &Nde) -> Ordering {
    debug_assert!(f1.d.is_positive());
    debug_assert!(f2.d.is_positive());

    if f1.n.is_zero() {
        return BigInt::zero().cmp(&f2.n.signum());
    }
    if f2.n.is_zero() {
        return f1.n.signum().cmp(&BigInt::zero());
    }
    if f1.n.is_negative() && f2.n.is_positive() {
        return Ordering::Less;
    }
    if f1.n.is_positive() && f2.n.is_negative() {
        return Ordering::Greater;
    }

    let mut p1 = &f1.n * &f2.d;
    let mut e1 = f1.e.clone();
    let mut p2 = &f2.n * &f1.d;
    let mut e2 = f2.e.clone();

    let by_exponent = |p: &BigInt, e1: &BigInt, e2: &BigInt| {
        if p.is_negative() {
            e1.cmp(e2).reverse()
        } else {
            e1.cmp(e2)
        }
    };

    if p1 == p2 {
        return by_exponent(&p1, &e1, &e2);
    }

    let ten = ten();

    // strip common trailing zeroes so that equal values meet at the same exponent
    if e1 < e2 {
        while e1 < e2 {
            let (q, r) = p1.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            e1 += 1;
            p1 = q;
        }
    } else if e1 > e2 {
        while e2 < e1 {
            let (q, r) = p2.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            e2 += 1;
            p2 = q;
        }
    }

    if e1 == e2 {
        return p1.cmp(&p2);
    }
    if p1 == p2 {
        return by_exponent(&p1, &e1, &e2);
    }

    let negative = p1.is_negative();
    if negative {
        p1 = -p1;
        p2 = -p2;
    }
    let positive_result = |ordering: Ordering| if negative { ordering.reverse() } else { ordering };

    if e1 > e2 {
        while e1 > e2 {
            if p1 >= p2 {
                return positive_result(Ordering::Greater);
            }
            p1 *= &ten;
            e1 -= 1;
        }
    } else {
        while e1 < e2 {
            if p1 <= p2 {
                return positive_result(Ordering::Less);
            }
            p2 *= &ten;
            e2 -= 1;
        }
    }

    positive_result(p1.cmp(&p2))
}

/// Difference `f1 - f2` of two triples whose exponents are close to each other
pub fn diff_small_diff_e(f1: &Nde, f2: &Nde) -> Result<Nde> {
    let min_e = (&f1.e).min(&f2.e).clone();

    let (n1, d1) = nde_to_nd(&Nde::new(f1.n.clone(), f1.d.clone(), &f1.e - &min_e))?;
    let (n2, d2) = nde_to_nd(&Nde::new(f2.n.clone(), f2.d.clone(), &f2.e - &min_e))?;

    Ok(Nde::new(&n1 * &d2 - &d1 * &n2, d1 * d2, min_e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nde(n: i64, d: i64, e: i64) -> Nde {
        Nde::new(BigInt::from(n), BigInt::from(d), BigInt::from(e))
    }

    #[test]
    fn test_gcd_and_lcm() {
        let cancel = CancellationToken::new();
        let gcd = greatest_common_divisor(&cancel, &BigInt::from(84), &BigInt::from(36)).unwrap();
        assert_eq!(gcd, BigInt::from(12));

        let lcm = least_common_multiple(&cancel, &BigInt::from(4), &BigInt::from(6)).unwrap();
        assert_eq!(lcm, BigInt::from(12));

        let big = pow10(40) * BigInt::from(6);
        let other = pow10(30) * BigInt::from(4);
        let gcd = greatest_common_divisor(&cancel, &big, &other).unwrap();
        assert_eq!(gcd, pow10(30) * BigInt::from(2));

        assert!(greatest_common_divisor(&cancel, &BigInt::from(-4), &BigInt::from(6)).is_err());
    }

    #[test]
    fn test_trim_zeroes_keeps_sign() {
        let cancel = CancellationToken::new();
        assert_eq!(
            trim_zeroes(&cancel, &BigInt::from(-12_000)).unwrap(),
            (BigInt::from(-12), 3)
        );
        assert_eq!(
            trim_zeroes(&cancel, &BigInt::from(5)).unwrap(),
            (BigInt::from(5), 0)
        );
        assert_eq!(
            trim_zeroes(&cancel, &BigInt::zero()).unwrap(),
            (BigInt::zero(), 0)
        );
    }

    #[test]
    fn test_number_of_digits() {
        let cancel = CancellationToken::new();
        assert_eq!(number_of_digits(&cancel, &BigInt::zero()).unwrap(), 1);
        assert_eq!(number_of_digits(&cancel, &BigInt::from(-999)).unwrap(), 3);
        assert_eq!(number_of_digits(&cancel, &pow10(25)).unwrap(), 26);
    }

    #[test]
    fn test_compare_across_exponents() {
        assert_eq!(compare(&nde(1, 2, 0), &nde(5, 1, -1)), Ordering::Equal);
        assert_eq!(compare(&nde(1, 3, 0), &nde(33, 1, -2)), Ordering::Greater);
        assert_eq!(compare(&nde(-1, 3, 0), &nde(-33, 1, -2)), Ordering::Less);
        assert_eq!(compare(&nde(7, 1, 3), &nde(69_999, 1, -1)), Ordering::Greater);
        assert_eq!(compare(&nde(0, 1, 0), &nde(-1, 7, 100)), Ordering::Greater);
        assert_eq!(compare(&nde(-2, 1, 5), &nde(1, 1, -5)), Ordering::Less);
        assert_eq!(compare(&nde(12, 1, 0), &nde(120, 1, -1)), Ordering::Equal);
    }

    #[test]
    fn test_diff_small_diff_e() {
        let diff = diff_small_diff_e(&nde(1, 2, 0), &nde(1, 4, -1)).unwrap();
        // 1/2 - 0.025 = 0.475
        assert_eq!(compare(&diff, &nde(475, 1, -3)), Ordering::Equal);
    }

    #[test]
    fn test_pow10_cancellable() {
        let cancel = CancellationToken::new();
        assert_eq!(pow10_cancellable(&cancel, 0).unwrap(), BigInt::one());
        assert_eq!(pow10_cancellable(&cancel, 5).unwrap(), BigInt::from(100_000));
        assert_eq!(pow10_cancellable(&cancel, 37).unwrap(), pow10(37));

        cancel.cancel();
        assert_eq!(pow10_cancellable(&cancel, 10), Err(Error::Cancelled));
    }

    #[test]
    fn test_nde_to_nd_bounded() {
        let cancel = CancellationToken::new();
        assert_eq!(
            nde_to_nd_bounded(&cancel, &nde(3, 7, -2), 10).unwrap(),
            (BigInt::from(3), BigInt::from(700))
        );
        assert_eq!(
            nde_to_nd_bounded(&cancel, &nde(-3, 7, 10), 10).unwrap(),
            (BigInt::from(-30_000_000_000i64), BigInt::from(7))
        );
        assert_eq!(nde_to_nd_bounded(&cancel, &nde(1, 1, 11), 10), Err(Error::Overflow));
        assert_eq!(nde_to_nd_bounded(&cancel, &nde(1, 1, -11), 10), Err(Error::Overflow));
    }
}
