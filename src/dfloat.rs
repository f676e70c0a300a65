//! Decimal floating point value `m * 10^e`
//!
//! Only used as a bounded-precision intermediate when an exact fraction is turned
//! into a machine `f64`.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::constants::Constants;
use crate::error::{Error, Result};
use crate::utilities::{byte_count, check_exponent, pow10, ten};

/// A floating point number defined as `m * 10^e`
///
/// `m` is the mantissa, `e` the power of ten; both are unbounded signed integers.
#[derive(Debug, Clone)]
pub struct DecimalFloat {
    m: BigInt,
    e: BigInt,
    approx: bool,
}

impl DecimalFloat {
    pub fn new(m: impl Into<BigInt>, e: impl Into<BigInt>) -> Self {
        Self::with_approx(m, e, false)
    }

    pub fn with_approx(m: impl Into<BigInt>, e: impl Into<BigInt>, approx: bool) -> Self {
        Self {
            m: m.into(),
            e: e.into(),
            approx,
        }
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    pub fn one() -> Self {
        Self::new(1, 0)
    }

    pub fn ten() -> Self {
        Self::new(1, 1)
    }

    pub fn half() -> Self {
        Self::new(5, -1)
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.m
    }

    pub fn exponent(&self) -> &BigInt {
        &self.e
    }

    pub fn is_approx(&self) -> bool {
        self.approx
    }

    pub fn is_zero(&self) -> bool {
        self.m.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.m.is_negative()
    }

    pub fn as_approx(&self) -> Self {
        self.union_approx(true)
    }

    pub fn union_approx(&self, approx: bool) -> Self {
        Self {
            m: self.m.clone(),
            e: self.e.clone(),
            approx: self.approx || approx,
        }
    }

    /// Move the trailing zeroes of the mantissa into the exponent
    pub fn trim(&self) -> Self {
        if self.m.is_zero() || self.m.is_odd() {
            return self.clone();
        }

        let ten = ten();
        let mut m = self.m.clone();
        let mut e = self.e.clone();
        loop {
            let (q, r) = m.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            m = q;
            e += 1;
        }

        Self { m, e, approx: self.approx }
    }

    /// Shorten the mantissa to roughly `max_full_bytes` bytes, rounding half away from
    /// zero. The result is approximate when a nonzero remainder is dropped.
    pub fn reduce(&self, max_full_bytes: u64) -> Result<Self> {
        if max_full_bytes < 1 {
            return Err(Error::invalid_argument("max_full_bytes must be at least 1"));
        }

        let bit_length = self.m.bits();
        let max_bit_length = max_full_bytes * 8;

        if bit_length <= max_bit_length {
            return Ok(self.clone());
        }

        let extra_bytes = (bit_length - max_bit_length) / 8;
        if extra_bytes == 0 {
            return Ok(self.clone());
        }

        let (shift, divide_by, half) = eval_pow10(extra_bytes)?;
        debug_assert!(shift > 0);

        let (mut m, r) = self.m.div_rem(&divide_by);
        let is_approx = !r.is_zero();

        if r >= half {
            m += 1;
        } else if r <= -&half {
            m -= 1;
        }

        Ok(Self {
            m,
            e: &self.e + shift,
            approx: self.approx || is_approx,
        })
    }

    /// Product bounded to `max_bytes` of mantissa
    pub fn mul(f1: &Self, f2: &Self, max_bytes: u64) -> Result<Self> {
        if f1.is_zero() || f2.is_zero() {
            // an exact zero factor gives an exact zero
            let exact = (f1.is_zero() && !f1.approx) || (f2.is_zero() && !f2.approx);
            return Ok(Self::zero().union_approx(!exact));
        }

        let product = Self {
            m: &f1.m * &f2.m,
            e: &f1.e + &f2.e,
            approx: f1.approx || f2.approx,
        };
        check_exponent(&product.e)?;

        product.reduce(max_bytes)
    }

    /// Quotient bounded to `max_bytes` of mantissa, computed by long division
    pub fn div(f1: &Self, f2: &Self, max_bytes: u64) -> Result<Self> {
        if f2.is_zero() {
            return Err(Error::DivideByZero);
        }
        if f1.is_zero() {
            return Ok(Self::zero().union_approx(f1.approx));
        }

        let f1 = f1.trim();
        let f2 = f2.trim();

        let mut e = &f1.e - &f2.e;
        let m2 = f2.m.abs();
        let (mut m, mut r) = f1.m.abs().div_rem(&m2);
        let ten = ten();
        let mut is_approx = false;

        while !r.is_zero() {
            r *= &ten;
            let (q, next_r) = r.div_rem(&m2);
            debug_assert!(q < ten);
            r = next_r;

            m = m * &ten + q;
            e -= 1;

            if byte_count(&m) > max_bytes + 2 {
                if &r * 2 >= m2 {
                    m += 1;
                }
                is_approx = true;
                break;
            }
        }

        check_exponent(&e)?;

        let negative = f1.m.is_negative() != f2.m.is_negative();
        Self {
            m: if negative { -m } else { m },
            e,
            approx: f1.approx || f2.approx || is_approx,
        }
        .reduce(max_bytes)
    }

    /// Nearest `f64`; magnitudes outside the `f64` range become infinity or zero
    pub fn to_f64(&self) -> Result<f64> {
        let t = self.trim();
        format!("{}e{}", t.m, t.e)
            .parse::<f64>()
            .map_err(|e| Error::invalid_argument(format!("cannot convert to f64: {e}")))
    }
}

/// Decimal digits to drop for `byte_count` surplus bytes: `(k, 10^k, 10^k / 2)`
fn eval_pow10(byte_count: u64) -> Result<(u32, BigInt, BigInt)> {
    let k = match byte_count {
        0 => return Ok((0, BigInt::zero(), BigInt::zero())),
        1 => 2,
        2 => 4,
        3 => 7,
        4 => 9,
        _ => {
            let bits = BigInt::from(byte_count) * 8;
            let (n, d) = &Constants::get().log2_10;
            let scaled: BigInt = bits * d;
            (scaled / n).to_u32().ok_or(Error::Overflow)?
        }
    };
    let p = pow10(k);
    let half = &p / 2;

    Ok((k, p, half))
}

impl PartialEq for DecimalFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DecimalFloat {}

impl PartialOrd for DecimalFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecimalFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        let s = self.m.signum().cmp(&other.m.signum());
        if s != Ordering::Equal {
            return s;
        }

        if self.m.is_zero() || other.m.is_zero() {
            return self.m.cmp(&other.m);
        }
        if self.m == other.m {
            let by_exponent = self.e.cmp(&other.e);
            return if self.m.is_negative() { by_exponent.reverse() } else { by_exponent };
        }
        if self.e == other.e {
            return self.m.cmp(&other.m);
        }

        // (m1, e1) has the greater exponent
        let self_is_greater_e = self.e > other.e;
        let (mut m1, mut e1, m2, e2) = if self_is_greater_e {
            (self.m.clone(), self.e.clone(), &other.m, &other.e)
        } else {
            (other.m.clone(), other.e.clone(), &self.m, &self.e)
        };
        let oriented = |ordering: Ordering| if self_is_greater_e { ordering } else { ordering.reverse() };

        let step = BigInt::from(10);
        loop {
            let diff_e = &e1 - e2;
            debug_assert!(diff_e.is_positive());

            let shift = diff_e.min(step.clone()).to_u32().unwrap_or(10);
            m1 *= pow10(shift);
            e1 -= shift;

            if &e1 == e2 {
                return oriented(m1.cmp(m2));
            }

            if m1.is_positive() {
                if &m1 >= m2 {
                    return oriented(Ordering::Greater);
                }
            } else if &m1 <= m2 {
                return oriented(Ordering::Less);
            }
        }
    }
}

impl fmt::Display for DecimalFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.e.is_zero() {
            write!(f, "{}", self.m)
        } else {
            write!(f, "{}e{}", self.m, self.e)
        }
    }
}

impl Default for DecimalFloat {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigInt> for DecimalFloat {
    fn from(m: BigInt) -> Self {
        Self::new(m, BigInt::zero())
    }
}

impl DecimalFloat {
    /// Quick check for exactly `1 * 10^0`
    pub fn quick_test_one(&self) -> bool {
        self.m.is_one() && self.e.is_zero()
    }
}
