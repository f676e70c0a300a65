//! Extended fraction value
//!
//! A [`Fraction`] is either one of the special values `Undefined`, `-Infinity`,
//! `+Infinity`, or a finite rational `(n / d) * 10^e` with `d > 0`.
//!
//! Values are immutable: every operation returns a new value. The approximation
//! flag records that a value stands in for some other value that could not be kept
//! exactly within the digit budget.

mod arithmetic;
mod compare;
mod reduce;
mod simplify;

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::constants::Constants;
use crate::context::CalculationContext;
use crate::dfloat::DecimalFloat;
use crate::error::{Error, Result};
use crate::utilities::{Nde, byte_count};

/// Finite payload of a [`Fraction`]: `(n / d) * 10^e`, `d > 0`
#[derive(Debug, Clone)]
pub struct Finite {
    n: BigInt,
    d: BigInt,
    e: BigInt,
    approx: bool,
    simplified: bool,
}

impl Finite {
    pub fn n(&self) -> &BigInt {
        &self.n
    }

    pub fn d(&self) -> &BigInt {
        &self.d
    }

    pub fn e(&self) -> &BigInt {
        &self.e
    }

    pub fn is_approx(&self) -> bool {
        self.approx
    }

    /// Whether GCD reduction and exponent placement were already performed
    pub fn is_simplified(&self) -> bool {
        self.simplified
    }

    pub(crate) fn to_nde(&self) -> Nde {
        Nde::new(self.n.clone(), self.d.clone(), self.e.clone())
    }
}

/// An exact rational with a decimal exponent, or one of the special values
#[derive(Debug, Clone)]
pub enum Fraction {
    Undefined,
    NegativeInfinity,
    PositiveInfinity,
    Normal(Finite),
}

impl Fraction {
    /// Create the fraction `(n / d) * 10^e`
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] when `d` is not positive.
    pub fn new(n: impl Into<BigInt>, d: impl Into<BigInt>, e: impl Into<BigInt>) -> Result<Self> {
        let d = d.into();
        if !d.is_positive() {
            return Err(Error::invalid_argument(format!(
                "denominator must be positive, got {d}"
            )));
        }

        Ok(Self::from_parts(n.into(), d, e.into(), false, false))
    }

    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self::from_parts(n.into(), BigInt::one(), BigInt::zero(), false, false)
    }

    /// Assemble a finite value without validation; `d` must be positive.
    pub(crate) fn from_parts(n: BigInt, d: BigInt, e: BigInt, approx: bool, simplified: bool) -> Self {
        debug_assert!(d.is_positive());

        Self::Normal(Finite {
            n,
            d,
            e,
            approx,
            simplified,
        })
    }

    fn small(n: i32, d: i32) -> Self {
        Self::from_parts(BigInt::from(n), BigInt::from(d), BigInt::zero(), false, true)
    }

    pub fn zero() -> Self {
        Self::small(0, 1)
    }

    pub fn one() -> Self {
        Self::small(1, 1)
    }

    pub fn minus_one() -> Self {
        Self::small(-1, 1)
    }

    pub fn half() -> Self {
        Self::small(1, 2)
    }

    pub fn minus_half() -> Self {
        Self::small(-1, 2)
    }

    pub fn quarter() -> Self {
        Self::small(1, 4)
    }

    pub fn minus_quarter() -> Self {
        Self::small(-1, 4)
    }

    pub fn two() -> Self {
        Self::small(2, 1)
    }

    pub fn four() -> Self {
        Self::small(4, 1)
    }

    pub fn ten() -> Self {
        Self::small(10, 1)
    }

    /// High-precision approximation of π, always approximate
    pub fn pi() -> Self {
        Constants::get().pi.clone()
    }

    /// High-precision approximation of e, always approximate
    pub fn euler_number() -> Self {
        Constants::get().euler.clone()
    }

    pub fn finite(&self) -> Option<&Finite> {
        match self {
            Self::Normal(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Self::Normal(_))
    }

    pub fn is_negative_infinity(&self) -> bool {
        matches!(self, Self::NegativeInfinity)
    }

    pub fn is_positive_infinity(&self) -> bool {
        matches!(self, Self::PositiveInfinity)
    }

    pub fn is_any_infinity(&self) -> bool {
        matches!(self, Self::NegativeInfinity | Self::PositiveInfinity)
    }

    pub fn is_zero(&self) -> bool {
        self.finite().is_some_and(|f| f.n.is_zero())
    }

    pub fn is_negative(&self) -> bool {
        self.finite().is_some_and(|f| f.n.is_negative())
    }

    pub fn is_negative_or_zero(&self) -> bool {
        self.finite().is_some_and(|f| !f.n.is_positive())
    }

    pub fn is_positive_non_zero(&self) -> bool {
        self.finite().is_some_and(|f| f.n.is_positive())
    }

    pub fn is_positive_or_zero(&self) -> bool {
        self.finite().is_some_and(|f| !f.n.is_negative())
    }

    /// Cheap check for `n == d` with a zero exponent; misses other spellings of one
    pub fn quick_test_one(&self) -> bool {
        self.finite().is_some_and(|f| f.e.is_zero() && f.n == f.d)
    }

    pub fn quick_test_minus_one(&self) -> bool {
        self.finite().is_some_and(|f| f.e.is_zero() && -&f.n == f.d)
    }

    pub fn is_approx(&self) -> bool {
        self.finite().is_some_and(|f| f.approx)
    }

    /// Special values count as simplified
    pub fn is_simplified(&self) -> bool {
        self.finite().is_none_or(|f| f.simplified)
    }

    pub fn as_approx(&self) -> Self {
        self.union_approx(true)
    }

    pub fn as_non_approx(&self) -> Self {
        match self {
            Self::Normal(f) => Self::Normal(Finite {
                approx: false,
                ..f.clone()
            }),
            other => other.clone(),
        }
    }

    /// The same value, approximate if it already was or if `approx` is set
    pub fn union_approx(&self, approx: bool) -> Self {
        match self {
            Self::Normal(f) if approx && !f.approx => Self::Normal(Finite {
                approx: true,
                ..f.clone()
            }),
            other => other.clone(),
        }
    }

    /// Numerator, denominator and exponent of a finite value
    pub fn to_nde(&self) -> Option<Nde> {
        self.finite().map(Finite::to_nde)
    }

    /// The value as an `i32`, when it is a finite integer in range
    pub fn try_to_i32(&self, ctx: &CalculationContext) -> Result<Option<i32>> {
        if !self.is_normal() {
            return Ok(None);
        }

        let simplified = self.simplify(ctx)?;
        let Some(f) = simplified.finite() else {
            return Ok(None);
        };

        if !f.d.is_one() || f.e.is_negative() {
            return Ok(None);
        }
        // |n| >= 1 so anything past ten zeroes is out of range
        let Some(e) = f.e.to_u32().filter(|e| *e <= 10) else {
            return Ok(None);
        };

        Ok((&f.n * crate::utilities::pow10(e)).to_i32())
    }

    /// Nearest `f64`; special values map to NaN and the infinities
    pub fn to_f64(&self) -> Result<f64> {
        let f = match self {
            Self::Undefined => return Ok(f64::NAN),
            Self::NegativeInfinity => return Ok(f64::NEG_INFINITY),
            Self::PositiveInfinity => return Ok(f64::INFINITY),
            Self::Normal(f) => f,
        };

        if f.n.is_zero() {
            return Ok(0.0);
        }
        if self.quick_test_one() {
            return Ok(1.0);
        }
        if self.quick_test_minus_one() {
            return Ok(-1.0);
        }

        let n = DecimalFloat::new(f.n.clone(), f.e.clone());
        let d = DecimalFloat::new(f.d.clone(), 0);
        let max_bytes = byte_count(&f.n).max(byte_count(&f.d)).max(8) + 4;

        DecimalFloat::div(&n, &d, max_bytes)?.to_f64()
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Fraction {
    fn from(n: i64) -> Self {
        Self::from_integer(n)
    }
}

impl From<BigInt> for Fraction {
    fn from(n: BigInt) -> Self {
        Self::from_integer(n)
    }
}

impl FromStr for Fraction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse(s)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self {
            Self::Undefined => return f.write_str("Undefined"),
            Self::PositiveInfinity => return f.write_str("+Infinity"),
            Self::NegativeInfinity => return f.write_str("-Infinity"),
            Self::Normal(v) => v,
        };

        if v.approx {
            f.write_str("≈")?;
        }
        if v.n.is_zero() {
            return f.write_str("0");
        }

        write!(f, "{}", v.n)?;
        if !v.e.is_zero() {
            if v.e.is_positive() {
                write!(f, "e+{}", v.e)?;
            } else {
                write!(f, "e{}", v.e)?;
            }
        }
        if !v.d.is_one() {
            write!(f, "/{}", v.d)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;

    #[test]
    fn test_new_rejects_non_positive_denominator() {
        assert!(matches!(Fraction::new(1, 0, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(Fraction::new(1, -3, 0), Err(Error::InvalidArgument(_))));
        assert!(Fraction::new(-1, 3, 2).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(Fraction::new(-3, 7, 2).unwrap().to_string(), "-3e+2/7");
        assert_eq!(Fraction::new(5, 1, -1).unwrap().to_string(), "5e-1");
        assert_eq!(Fraction::half().as_approx().to_string(), "≈1/2");
        assert_eq!(Fraction::zero().to_string(), "0");
        assert_eq!(Fraction::Undefined.to_string(), "Undefined");
        assert_eq!(Fraction::NegativeInfinity.to_string(), "-Infinity");
    }

    #[test]
    fn test_predicates() {
        let x = Fraction::new(-2, 3, 0).unwrap();
        assert!(x.is_negative());
        assert!(x.is_negative_or_zero());
        assert!(!x.is_positive_or_zero());
        assert!(Fraction::zero().is_positive_or_zero());
        assert!(!Fraction::PositiveInfinity.is_positive_non_zero());
        assert!(Fraction::new(7, 7, 0).unwrap().quick_test_one());
        assert!(Fraction::new(-7, 7, 0).unwrap().quick_test_minus_one());
        assert!(Fraction::Undefined.is_simplified());
    }

    #[test]
    fn test_approx_flags() {
        let x = Fraction::quarter();
        assert!(!x.is_approx());
        assert!(x.as_approx().is_approx());
        assert!(!x.as_approx().as_non_approx().is_approx());
        assert!(x.union_approx(true).is_approx());
        assert!(Fraction::pi().is_approx());
        assert!(Fraction::euler_number().is_approx());
    }

    #[test]
    fn test_conversions() {
        let ctx = CalculationContext::new(CancellationToken::new(), 10).unwrap();
        assert_eq!(Fraction::new(12, 1, 3).unwrap().try_to_i32(&ctx).unwrap(), Some(12_000));
        assert_eq!(Fraction::half().try_to_i32(&ctx).unwrap(), None);
        assert_eq!(Fraction::new(3, 1, 20).unwrap().try_to_i32(&ctx).unwrap(), None);

        assert_eq!(Fraction::quarter().to_f64().unwrap(), 0.25);
        assert_eq!(Fraction::new(-3, 4, 2).unwrap().to_f64().unwrap(), -75.0);
        assert!((Fraction::pi().to_f64().unwrap() - std::f64::consts::PI).abs() < 1e-15);
        assert!(Fraction::Undefined.to_f64().unwrap().is_nan());
    }
}
