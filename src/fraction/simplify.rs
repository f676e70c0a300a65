use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use super::{Finite, Fraction};
use crate::cancel::CancellationToken;
use crate::context::CalculationContext;
use crate::error::Result;
use crate::utilities::{greatest_common_divisor, ten, trim_zeroes, trim_zeroes_non_negative};

impl Fraction {
    /// GCD-reduce and place the decimal exponent canonically for the context bounds
    ///
    /// The value does not change. Special values and already simplified values are
    /// returned as they are.
    pub fn simplify(&self, ctx: &CalculationContext) -> Result<Self> {
        let f = match self {
            Self::Normal(f) if !f.simplified => f,
            other => return Ok(other.clone()),
        };

        if f.n.is_zero() {
            return Ok(Self::zero().union_approx(f.approx));
        }

        let cancel = ctx.cancel();
        cancel.check()?;
        let ten = ten();

        let mut n = f.n.clone();
        let mut d = f.d.clone();
        let mut e = f.e.clone();

        // n is too large: move its trailing zeroes into e
        while !ctx.in_range(&n) {
            let (q, r) = n.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            n = q;
            e += 1;

            cancel.check()?;
        }

        // d is too large: move its trailing zeroes into e
        while &d > ctx.max_val() {
            let (q, r) = d.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            d = q;
            e -= 1;

            cancel.check()?;
        }

        absorb_exponent(ctx, &mut n, &mut d, &mut e)?;

        let gcd = greatest_common_divisor(cancel, &n.abs(), &d)?;
        n /= &gcd;
        d /= &gcd;

        absorb_exponent(ctx, &mut n, &mut d, &mut e)?;

        Ok(Self::Normal(Finite {
            n,
            d,
            e,
            approx: f.approx,
            simplified: true,
        }))
    }

    /// Move every trailing zero of the numerator and the denominator into the exponent
    pub fn trim_zeroes(&self, cancel: &CancellationToken) -> Result<Self> {
        let Self::Normal(f) = self else {
            return Ok(self.clone());
        };

        let (n, en) = trim_zeroes(cancel, &f.n)?;
        let (d, ed) = trim_zeroes_non_negative(cancel, f.d.clone())?;
        let e = &f.e + BigInt::from(en) - BigInt::from(ed);

        Ok(Self::Normal(Finite {
            n,
            d,
            e,
            approx: f.approx,
            simplified: false,
        }))
    }
}

/// Shift the exponent into `n` (when positive) or `d` (when negative) while the
/// receiving part stays within the context bounds
fn absorb_exponent(ctx: &CalculationContext, n: &mut BigInt, d: &mut BigInt, e: &mut BigInt) -> Result<()> {
    let ten = ten();

    while e.is_positive() && ctx.in_range_div10(n) {
        *n *= &ten;
        *e -= 1;

        ctx.cancel().check()?;
    }

    while e.is_negative() && &*d <= ctx.max_val_div10() {
        *d *= &ten;
        *e += 1;

        ctx.cancel().check()?;
    }

    Ok(())
}
