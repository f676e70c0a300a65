//! Best rational approximation within a magnitude bound
//!
//! The search walks the Stern-Brocot tree between `0/1` and `1/1`, jumping as many
//! mediant steps at once as the bound and the target allow.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use super::{Finite, Fraction};
use crate::cancel::CancellationToken;
use crate::constants::ReductionBands;
use crate::context::CalculationContext;
use crate::error::{Error, Result};
use crate::utilities::{
    Nde, check_exponent, compare, diff_small_diff_e, nde_to_nd, number_of_digits, pow10_big,
};

/// Nearest fraction to `n / d` in `]0, 1]` whose denominator does not exceed `max_val`
fn farey(
    cancel: &CancellationToken,
    n: &BigInt,
    d: &BigInt,
    max_val: &BigInt,
) -> Result<(BigInt, BigInt)> {
    debug_assert!(n.is_positive());
    debug_assert!(d.is_positive());
    debug_assert!(n <= d);

    if n == d {
        return Ok((BigInt::one(), BigInt::one()));
    }

    let (mut n0, mut n1) = (BigInt::zero(), BigInt::one());
    let (mut d0, mut d1) = (BigInt::one(), BigInt::one());
    let one = BigInt::one();

    loop {
        cancel.check()?;

        let dm = &d0 + &d1;
        if &dm > max_val {
            break;
        }
        let nm = &n0 + &n1;

        match (&nm * d).cmp(&(&dm * n)) {
            // mediant below the target: raise the lower bound
            Ordering::Less => {
                let k_max = (max_val - &d0) / &d1;
                let t = d * &n1 - n * &d1;
                let k = if t.is_zero() {
                    k_max.clone()
                } else {
                    (n * &d0 - d * &n0) / &t
                };
                let k = k_max.min(k);

                if k <= one {
                    n0 = nm;
                    d0 = dm;
                } else {
                    n0 += &n1 * &k;
                    d0 += &d1 * &k;
                }
            }
            // mediant above the target: lower the upper bound
            Ordering::Greater => {
                let k_max = (max_val - &d1) / &d0;
                let t = d * &n0 - n * &d0;
                let k = if t.is_zero() {
                    k_max.clone()
                } else {
                    (n * &d1 - d * &n1) / &t
                };
                let k = k_max.min(k);

                if k <= one {
                    n1 = nm;
                    d1 = dm;
                } else {
                    n1 += &n0 * &k;
                    d1 += &d0 * &k;
                }
            }
            Ordering::Equal => return Ok((nm, dm)),
        }
    }

    if BigInt::from(2) * n * &d1 * &d0 <= (&n1 * &d0 + &n0 * &d1) * d {
        Ok((n0, d0))
    } else {
        Ok((n1, d1))
    }
}

/// Smallest `j >= 1` such that `small * 10^j >= large`
fn shift_to_reach(cancel: &CancellationToken, small: &BigInt, large: &BigInt) -> Result<u64> {
    let digits_small = number_of_digits(cancel, small)?;
    let digits_large = number_of_digits(cancel, large)?;
    let j = digits_large.saturating_sub(digits_small).max(1) as u64;

    if small * pow10_big(&BigInt::from(j))? >= *large {
        Ok(j)
    } else {
        Ok(j + 1)
    }
}

fn validate_max_val(max_val: &BigInt) -> Result<()> {
    if max_val.is_positive() {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!("max_val must be positive, got {max_val}")))
    }
}

impl Fraction {
    /// Values that need no search: special values, zero and plain one
    fn reduce_trivial(&self) -> Option<Self> {
        match self {
            Self::Normal(f) if f.n.is_zero() => Some(self.clone()),
            Self::Normal(f) if self.quick_test_one() => Some(Self::one().union_approx(f.approx)),
            Self::Normal(f) if self.quick_test_minus_one() => {
                Some(Self::minus_one().union_approx(f.approx))
            }
            Self::Normal(_) => None,
            other => Some(other.clone()),
        }
    }

    /// Nearest fraction whose numerator and denominator both lie within `max_val`
    ///
    /// A value already within bounds is returned unchanged. Otherwise the result keeps
    /// a decimal exponent and is approximate unless the match is exact.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] when `max_val` is not positive, [`Error::Cancelled`]
    /// and [`Error::Overflow`].
    pub fn reduce(&self, cancel: &CancellationToken, max_val: &BigInt) -> Result<Self> {
        validate_max_val(max_val)?;

        if let Some(trivial) = self.reduce_trivial() {
            return Ok(trivial);
        }
        let Self::Normal(f) = self else {
            return Ok(self.clone());
        };

        if f.n.abs() <= *max_val && f.d <= *max_val {
            return Ok(self.clone());
        }

        cancel.check()?;

        let negative = f.n.is_negative();
        let this_abs = f.to_nde().abs();
        let abs_n = &this_abs.n;

        // two neighbouring decimal shifts put the target into ]0, 1] and [1, 10[;
        // each is searched and the closer result wins
        let candidates = if abs_n < &f.d {
            let shift = shift_to_reach(cancel, abs_n, &f.d)?;
            let n1 = abs_n * pow10_big(&BigInt::from(shift))?;
            let e1 = &f.e - shift;

            let (rd1, rn1) = farey(cancel, &f.d, &n1, max_val)?;
            let first = Nde::new(rn1, rd1, e1.clone());

            let d2 = &f.d * 10;
            let (rn2, rd2) = farey(cancel, &n1, &d2, max_val)?;
            let second = Nde::new(rn2, rd2, e1 + 1);

            [first, second]
        } else {
            let shift = shift_to_reach(cancel, &f.d, abs_n)?;
            let d1 = &f.d * pow10_big(&BigInt::from(shift))?;
            let e1 = &f.e + shift;

            let (rn1, rd1) = farey(cancel, abs_n, &d1, max_val)?;
            let first = Nde::new(rn1, rd1, e1.clone());

            let n2 = abs_n * 10;
            let (rd2, rn2) = farey(cancel, &d1, &n2, max_val)?;
            let second = Nde::new(rn2, rd2, e1 - 1);

            [first, second]
        };

        let mut best: Option<(Nde, Nde)> = None;
        for candidate in candidates {
            // an inverted search may land on 0/1, which has no reciprocal
            if candidate.d.is_zero() {
                continue;
            }
            check_exponent(&candidate.e)?;

            let diff = diff_small_diff_e(&this_abs, &candidate)?.abs();
            if diff.n.is_zero() {
                return Ok(signed(candidate, negative, f.approx));
            }

            let better = match &best {
                Some((_, best_diff)) => compare(&diff, best_diff) == Ordering::Less,
                None => true,
            };
            if better {
                best = Some((candidate, diff));
            }
        }

        match best {
            Some((candidate, _)) => {
                tracing::debug!(target: "fraction", %max_val, "reduced to an approximation");
                Ok(signed(candidate, negative, true))
            }
            None => Ok(saturated(max_val, negative)),
        }
    }

    /// [`Fraction::reduce`] with the bound of a context
    pub fn reduce_with_context(&self, ctx: &CalculationContext) -> Result<Self> {
        self.reduce(ctx.cancel(), ctx.max_val())
    }

    /// Nearest fraction within `max_val` that carries no decimal exponent
    pub fn reduce_no_e(&self, cancel: &CancellationToken, max_val: &BigInt) -> Result<Self> {
        self.reduce_no_e_with(cancel, max_val, ReductionBands::default())
    }

    /// [`Fraction::reduce_no_e`] with explicit magnitude bands
    ///
    /// Magnitudes below `10^-band` collapse to exact zero, magnitudes of at least
    /// `10^band` saturate at `±max_val`.
    pub fn reduce_no_e_with(
        &self,
        cancel: &CancellationToken,
        max_val: &BigInt,
        bands: ReductionBands,
    ) -> Result<Self> {
        validate_max_val(max_val)?;

        if let Some(trivial) = self.reduce_trivial() {
            return Ok(trivial);
        }
        let Self::Normal(f) = self else {
            return Ok(self.clone());
        };

        if f.e.is_zero() && f.n.abs() <= *max_val && f.d <= *max_val {
            return Ok(self.clone());
        }

        cancel.check()?;

        let negative = f.n.is_negative();
        let this_abs = f.to_nde().abs();
        let band = BigInt::from(bands.exponent_band);
        let one = BigInt::one();

        let tiny = Nde::new(one.clone(), one.clone(), -&band);
        if compare(&this_abs, &tiny) == Ordering::Less {
            return Ok(Self::zero());
        }

        let huge = Nde::new(one.clone(), one.clone(), band);
        if compare(&this_abs, &huge) != Ordering::Less {
            return Ok(saturated(max_val, negative));
        }

        let (n1, d1) = nde_to_nd(&this_abs)?;

        let result = if compare(&this_abs, &Nde::new(one.clone(), one, BigInt::zero())) == Ordering::Less {
            let (n, d) = farey(cancel, &n1, &d1, max_val)?;
            Nde::new(n, d, BigInt::zero())
        } else {
            let (d, n) = farey(cancel, &d1, &n1, max_val)?;
            if d.is_zero() {
                return Ok(saturated(max_val, negative));
            }
            Nde::new(n, d, BigInt::zero())
        };

        let exact = compare(&this_abs, &result) == Ordering::Equal;

        Ok(signed(result, negative, f.approx || !exact))
    }
}

fn signed(nde: Nde, negative: bool, approx: bool) -> Fraction {
    Fraction::Normal(Finite {
        n: if negative { -nde.n } else { nde.n },
        d: nde.d,
        e: nde.e,
        approx,
        simplified: false,
    })
}

/// `±max_val`, the largest magnitude the bound allows
fn saturated(max_val: &BigInt, negative: bool) -> Fraction {
    let n = if negative { -max_val } else { max_val.clone() };

    Fraction::Normal(Finite {
        n,
        d: BigInt::one(),
        e: BigInt::zero(),
        approx: true,
        simplified: false,
    })
}
