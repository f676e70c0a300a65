//! Arithmetic over the extended fractions
//!
//! Special values follow the extended real table. Finite results are reduced to the
//! context bounds, so a result may be approximate even when both operands are exact.

use std::ops::Neg;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use super::{Finite, Fraction};
use crate::context::CalculationContext;
use crate::error::Result;
use crate::utilities::{check_exponent, least_common_multiple, ten};

impl Neg for &Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        match self {
            Fraction::Undefined => Fraction::Undefined,
            Fraction::NegativeInfinity => Fraction::PositiveInfinity,
            Fraction::PositiveInfinity => Fraction::NegativeInfinity,
            Fraction::Normal(f) if f.n.is_zero() => self.clone(),
            Fraction::Normal(f) => Fraction::Normal(Finite {
                n: -&f.n,
                ..f.clone()
            }),
        }
    }
}

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        -&self
    }
}

/// Sign of a value that is not `Undefined`
fn sign(f: &Fraction) -> i8 {
    match f {
        Fraction::NegativeInfinity => -1,
        Fraction::PositiveInfinity => 1,
        Fraction::Normal(v) if v.n.is_negative() => -1,
        Fraction::Normal(v) if v.n.is_zero() => 0,
        _ => 1,
    }
}

fn infinity_with_sign(sign: i8) -> Fraction {
    if sign < 0 {
        Fraction::NegativeInfinity
    } else {
        Fraction::PositiveInfinity
    }
}

impl Fraction {
    /// Absolute value; both infinities become `+Infinity`
    pub fn abs(&self) -> Self {
        match self {
            Self::Undefined => Self::Undefined,
            Self::NegativeInfinity | Self::PositiveInfinity => Self::PositiveInfinity,
            Self::Normal(f) if f.n.is_negative() => -self,
            Self::Normal(_) => self.clone(),
        }
    }

    pub fn add(&self, other: &Self, ctx: &CalculationContext) -> Result<Self> {
        ctx.cancel().check()?;

        let (a, b) = match (self, other) {
            (Self::Undefined, _) | (_, Self::Undefined) => return Ok(Self::Undefined),
            (Self::NegativeInfinity, Self::PositiveInfinity)
            | (Self::PositiveInfinity, Self::NegativeInfinity) => return Ok(Self::Undefined),
            (Self::NegativeInfinity, _) | (_, Self::NegativeInfinity) => {
                return Ok(Self::NegativeInfinity);
            }
            (Self::PositiveInfinity, _) | (_, Self::PositiveInfinity) => {
                return Ok(Self::PositiveInfinity);
            }
            (Self::Normal(a), Self::Normal(b)) => (a, b),
        };

        let approx = a.approx || b.approx;

        if a.n.is_zero() {
            return Ok(other.union_approx(approx));
        }
        if b.n.is_zero() {
            return Ok(self.union_approx(approx));
        }

        if a.n == b.n && a.d == b.d && a.e == b.e {
            return Self::from_parts(&a.n * 2, a.d.clone(), a.e.clone(), approx, false)
                .reduce_with_context(ctx);
        }

        let cancel = ctx.cancel();
        let lcm = least_common_multiple(cancel, &a.d, &b.d)?;
        cancel.check()?;

        let n_a = &lcm / &a.d * &a.n;
        let n_b = &lcm / &b.d * &b.n;

        // align on the smaller exponent
        let diff_e = &a.e - &b.e;
        let (lost, n, e) = if !diff_e.is_negative() {
            let (lost, n, shift) = mul_pow10_add_limited(ctx, n_a, diff_e, n_b)?;
            (lost, n, &b.e + shift)
        } else {
            let (lost, n, shift) = mul_pow10_add_limited(ctx, n_b, -diff_e, n_a)?;
            (lost, n, &a.e + shift)
        };

        if n.is_zero() {
            return Ok(Self::zero().union_approx(approx || lost));
        }
        check_exponent(&e)?;

        Self::from_parts(n, lcm, e, approx || lost, false).reduce_with_context(ctx)
    }

    pub fn sub(&self, other: &Self, ctx: &CalculationContext) -> Result<Self> {
        self.add(&-other, ctx)
    }

    pub fn mul(&self, other: &Self, ctx: &CalculationContext) -> Result<Self> {
        ctx.cancel().check()?;

        if self.is_undefined() || other.is_undefined() {
            return Ok(Self::Undefined);
        }

        if self.is_zero() {
            if other.is_any_infinity() {
                return Ok(Self::Undefined);
            }
            return Ok(Self::zero().union_approx(self.is_approx()));
        }
        if other.is_zero() {
            if self.is_any_infinity() {
                return Ok(Self::Undefined);
            }
            return Ok(Self::zero().union_approx(other.is_approx()));
        }

        if self.is_any_infinity() || other.is_any_infinity() {
            return Ok(infinity_with_sign(sign(self) * sign(other)));
        }

        let left = self.simplify(ctx)?;
        let right = other.simplify(ctx)?;
        let (Self::Normal(a), Self::Normal(b)) = (&left, &right) else {
            return Ok(Self::Undefined);
        };

        let e = &a.e + &b.e;
        check_exponent(&e)?;

        Self::from_parts(&a.n * &b.n, &a.d * &b.d, e, a.approx || b.approx, false)
            .reduce_with_context(ctx)
    }

    /// Division
    ///
    /// A nonzero value divided by an exact zero gives the infinity of its sign;
    /// dividing by an approximate zero gives `Undefined`, since the sign of the true
    /// divisor is unknown.
    pub fn div(&self, other: &Self, ctx: &CalculationContext) -> Result<Self> {
        ctx.cancel().check()?;

        if self.is_undefined() || other.is_undefined() {
            return Ok(Self::Undefined);
        }

        if self.is_any_infinity() {
            return Ok(match other {
                Self::Normal(b) if !b.n.is_zero() => infinity_with_sign(sign(self) * sign(other)),
                _ => Self::Undefined,
            });
        }

        if self.is_zero() {
            if other.is_zero() {
                return Ok(Self::Undefined);
            }
            return Ok(Self::zero().union_approx(self.is_approx() || other.is_approx()));
        }

        if other.is_any_infinity() {
            return Ok(Self::zero());
        }

        if other.is_zero() {
            if other.is_approx() {
                return Ok(Self::Undefined);
            }
            return Ok(infinity_with_sign(sign(self)));
        }

        let left = self.simplify(ctx)?;
        let right = other.simplify(ctx)?;
        let (Self::Normal(a), Self::Normal(b)) = (&left, &right) else {
            return Ok(Self::Undefined);
        };

        let n = if b.n.is_negative() { -(&a.n * &b.d) } else { &a.n * &b.d };
        let d = &a.d * b.n.abs();
        let e = &a.e - &b.e;
        check_exponent(&e)?;

        Self::from_parts(n, d, e, a.approx || b.approx, false).reduce_with_context(ctx)
    }
}

/// Compute `x1 * 10^e1 + x2` within the context bounds
///
/// `x1` absorbs as much of `e1` as the bounds allow; the rest of the gap is taken out
/// of `x2` by division, rounding half away from zero. Returns whether a nonzero
/// remainder was dropped, the sum, and the power of ten the sum is scaled by.
pub(crate) fn mul_pow10_add_limited(
    ctx: &CalculationContext,
    mut x1: BigInt,
    mut e1: BigInt,
    mut x2: BigInt,
) -> Result<(bool, BigInt, BigInt)> {
    debug_assert!(!e1.is_negative());

    if x1.is_zero() {
        return Ok((false, x2, BigInt::zero()));
    }
    if x2.is_zero() {
        return Ok((false, x1, e1));
    }

    let cancel = ctx.cancel();
    let ten = ten();

    while e1.is_positive() {
        let next = &x1 * &ten;
        if !ctx.in_range(&next) {
            break;
        }
        x1 = next;
        e1 -= 1;

        cancel.check()?;
    }

    let mut r = BigInt::zero();
    let mut lost = false;
    let mut remaining = e1.clone();

    while remaining.is_positive() {
        cancel.check()?;

        // truncating division keeps the sign of x2 in both parts
        let (q, rem) = x2.div_rem(&ten);
        x2 = q;
        r = rem;
        if !r.is_zero() {
            lost = true;
        }
        remaining -= 1;

        if x2.is_zero() && r.is_zero() {
            break;
        }
    }

    if r >= BigInt::from(5) {
        x2 += 1;
    } else if r <= BigInt::from(-5) {
        x2 -= 1;
    }

    x1 += x2;

    while !x1.is_zero() {
        let (q, rem) = x1.div_rem(&ten);
        if !rem.is_zero() {
            break;
        }
        x1 = q;
        e1 += 1;
    }

    Ok((lost, x1, e1))
}
