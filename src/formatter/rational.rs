use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::{check_max_digits, exponent_suffix, format_trivial, pow10_usize};
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::utilities::{number_of_digits, trim_zeroes, trim_zeroes_non_negative};

/// Format a fraction as `N[e±k][/D]`
///
/// Numerator and denominator are each rounded to at most `max_digits` digits, half
/// away from zero; a rounded or approximate value starts with `≈`. The exponent is
/// folded into the numerator or the denominator when the result still fits the budget.
///
/// # Examples
/// ```
/// use repeating_decimals::cancel::CancellationToken;
/// use repeating_decimals::formatter::to_rational_string;
/// use repeating_decimals::fraction::Fraction;
///
/// let cancel = CancellationToken::new();
/// let x = Fraction::new(22, 7, 0).unwrap();
/// assert_eq!(to_rational_string(&cancel, &x, 10).unwrap(), "22/7");
/// ```
pub fn to_rational_string(cancel: &CancellationToken, f: &Fraction, max_digits: usize) -> Result<String> {
    check_max_digits(max_digits)?;

    if let Some(text) = format_trivial(f) {
        return Ok(text);
    }
    let Fraction::Normal(v) = f else {
        return Ok(f.to_string());
    };

    let (n, e_n) = trim_zeroes(cancel, v.n())?;
    let (d, e_d) = trim_zeroes_non_negative(cancel, v.d().clone())?;
    let mut e = v.e() + BigInt::from(e_n) - BigInt::from(e_d);

    let (n_approx, n, shift) = apply_max_digits(cancel, n, max_digits)?;
    e += BigInt::from(shift);
    let (d_approx, mut d, shift) = apply_max_digits(cancel, d, max_digits)?;
    e -= BigInt::from(shift);

    let mut out = String::new();
    if v.is_approx() || n_approx || d_approx {
        out.push('≈');
    }

    let ndn = number_of_digits(cancel, &n)?;
    let ndd = number_of_digits(cancel, &d)?;
    let max = BigInt::from(max_digits);

    if !e.is_negative() {
        if BigInt::from(ndn) + &e <= max {
            // 123e2 is 12300
            let k = usize::try_from(&e).map_err(|_| Error::Overflow)?;
            out.push_str(&(n * pow10_usize(k)?).to_string());
        } else {
            out.push_str(&n.to_string());
            out.push_str(&exponent_suffix(&e));
        }
    } else if BigInt::from(ndd) - &e <= max {
        // move the zeroes into the denominator
        let k = usize::try_from(-&e).map_err(|_| Error::Overflow)?;
        out.push_str(&n.to_string());
        d *= pow10_usize(k)?;
    } else {
        out.push_str(&n.to_string());
        out.push_str(&exponent_suffix(&e));
    }

    if !d.is_one() {
        out.push('/');
        out.push_str(&d.to_string());
    }

    Ok(out)
}

/// Round `n` to at most `max_digits` digits, half away from zero
///
/// Returns whether digits were lost, the rounded value with trailing zeroes removed,
/// and the power of ten it must be multiplied by. `999` rounded to two digits gives
/// `(true, 1, 3)`.
pub(crate) fn apply_max_digits(
    cancel: &CancellationToken,
    n: BigInt,
    max_digits: usize,
) -> Result<(bool, BigInt, u64)> {
    let (n, mut e) = trim_zeroes(cancel, &n)?;

    let ndn = number_of_digits(cancel, &n)?;
    if ndn <= max_digits {
        return Ok((false, n, e));
    }

    let cut = ndn - max_digits;
    let pw = pow10_usize(cut)?;

    // truncating division: the remainder carries the sign of `n`
    let (mut q, r) = n.div_rem(&pw);

    cancel.check()?;

    let r = r.abs();
    let approx = !r.is_zero();
    e += cut as u64;

    if r >= &pw / 2 {
        if n.is_negative() {
            q -= 1;
        } else {
            q += 1;
        }
    }

    let (q, e2) = trim_zeroes(cancel, &q)?;

    Ok((approx, q, e + e2))
}
