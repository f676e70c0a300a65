use std::collections::HashMap;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use super::{GROUP_SEPARATOR, check_max_digits, exponent_suffix, format_trivial, pow10_usize};
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::utilities::{number_of_digits, ten, trim_zeroes_non_negative};

/// Digits of a value before layout: `int_part.float_part(repeating_part) × 10^e`
#[derive(Debug)]
struct DecimalDigits {
    negative: bool,
    int_part: String,
    float_part: String,
    repeating_part: String,
    e: BigInt,
    approx: bool,
}

/// Format a fraction as decimal text with at most `max_digits` significant digits
///
/// Long division stops exactly when a remainder repeats; the digits since its first
/// occurrence are shown in parentheses. When the budget runs out first the last digit
/// is rounded and the text starts with `≈`. With `group` set the integer digits are
/// separated into groups of three by a thin space.
///
/// # Examples
/// ```
/// use repeating_decimals::cancel::CancellationToken;
/// use repeating_decimals::formatter::to_float_string;
/// use repeating_decimals::fraction::Fraction;
///
/// let cancel = CancellationToken::new();
/// let x = Fraction::new(1, 7, 0).unwrap();
/// assert_eq!(to_float_string(&cancel, &x, 100, false).unwrap(), "0.(142857)");
/// ```
///
/// # Errors
/// [`Error::InvalidArgument`] when `max_digits` is below [`super::MIN_DIGITS`],
/// [`Error::InsufficientDigitBudget`] when the digits cannot be laid out, and
/// [`Error::Cancelled`].
pub fn to_float_string(
    cancel: &CancellationToken,
    f: &Fraction,
    max_digits: usize,
    group: bool,
) -> Result<String> {
    check_max_digits(max_digits)?;

    if let Some(text) = format_trivial(f) {
        return Ok(text);
    }
    let Fraction::Normal(v) = f else {
        return Ok(f.to_string());
    };

    let digits = long_division(cancel, v.n(), v.d(), v.e(), max_digits)?;

    let mut out = String::new();
    if digits.approx || v.is_approx() {
        out.push('≈');
    }
    layout(cancel, &mut out, digits, max_digits, group)?;

    Ok(out)
}

fn long_division(
    cancel: &CancellationToken,
    n: &BigInt,
    d: &BigInt,
    e: &BigInt,
    max_digits: usize,
) -> Result<DecimalDigits> {
    if !d.is_positive() {
        return Err(Error::invalid_argument("denominator must be positive"));
    }

    let negative = n.is_negative();
    let (mut n, en) = trim_zeroes_non_negative(cancel, n.abs())?;
    let (d, ed) = trim_zeroes_non_negative(cancel, d.clone())?;
    let mut e = e + BigInt::from(en) - BigInt::from(ed);

    // the numerator needs at least as many digits as the denominator
    let ndn = number_of_digits(cancel, &n)?;
    let ndd = number_of_digits(cancel, &d)?;
    if ndn < ndd {
        let zeroes = ndd - ndn;
        n *= pow10_usize(zeroes)?;
        e -= BigInt::from(zeroes);
    }

    let (q, r) = n.div_rem(&d);
    let ndq = if q.is_zero() {
        0
    } else {
        number_of_digits(cancel, &q)?
    };

    cancel.check()?;

    if ndq > max_digits {
        round_integer_part(cancel, q, ndq, e, max_digits, negative)
    } else {
        fractional_digits(cancel, q, r, &d, e, max_digits - ndq, negative)
    }
}

/// The integer part alone exceeds the budget: keep `max_digits` rounded digits
fn round_integer_part(
    cancel: &CancellationToken,
    q: BigInt,
    ndq: usize,
    mut e: BigInt,
    max_digits: usize,
    negative: bool,
) -> Result<DecimalDigits> {
    // one digit more than needed, for rounding
    let dropped = ndq - max_digits - 1;
    let mut q = q / pow10_usize(dropped)?;
    e += BigInt::from(dropped);

    cancel.check()?;

    q += 5;
    let extra = number_of_digits(cancel, &q)? - max_digits;
    q /= pow10_usize(extra)?;
    e += BigInt::from(extra);

    tracing::debug!(target: "formatter", max_digits, "integer part exceeds the digit budget");

    Ok(DecimalDigits {
        negative,
        int_part: q.to_string(),
        float_part: String::new(),
        repeating_part: String::new(),
        e,
        approx: true,
    })
}

/// Digits after the point, with cycle detection on the remainders
fn fractional_digits(
    cancel: &CancellationToken,
    q: BigInt,
    mut r: BigInt,
    d: &BigInt,
    mut e: BigInt,
    allowed_space: usize,
    negative: bool,
) -> Result<DecimalDigits> {
    let ten = ten();
    let mut remainders: HashMap<BigInt, usize> = HashMap::new();
    let mut float_part = String::new();
    let mut repeating_part = String::new();

    for index in 0..allowed_space {
        if r.is_zero() {
            break;
        }
        cancel.check()?;

        remainders.insert(r.clone(), index);

        let (digit, rest) = (r * &ten).div_rem(d);
        r = rest;
        float_part.push_str(&digit.to_string());

        if let Some(&start) = remainders.get(&r) {
            repeating_part = float_part.split_off(start);
            tracing::debug!(target: "formatter", period = repeating_part.len(), "cycle detected");
            break;
        }
    }

    let mut int_part = q.to_string();
    let approx = repeating_part.is_empty() && !r.is_zero();

    if approx {
        tracing::debug!(target: "formatter", allowed_space, "digit budget exhausted");

        let (next, _) = (r * &ten).div_rem(d);
        if next >= BigInt::from(5) {
            round_up(&mut int_part, &mut float_part, &mut e);
        }
    }

    Ok(DecimalDigits {
        negative,
        int_part,
        float_part,
        repeating_part,
        e,
        approx,
    })
}

/// Add one unit in the last kept place, keeping the digit count unchanged
fn round_up(int_part: &mut String, float_part: &mut String, e: &mut BigInt) {
    if !float_part.is_empty() {
        let (incremented, carry) = increment_digits(float_part);
        *float_part = incremented;
        if !carry {
            return;
        }
    }

    let (incremented, carry) = increment_digits(int_part);
    if !carry {
        *int_part = incremented;
        return;
    }

    // the integer part grew a digit: "1" followed by zeroes; shift one digit out
    *e += 1;
    let mut grown = String::with_capacity(int_part.len() + 1);
    grown.push('1');
    grown.push_str(&incremented);

    let last = grown.pop();
    if let Some(last) = last.filter(|_| !float_part.is_empty()) {
        float_part.pop();
        float_part.insert(0, last);
    }
    *int_part = grown;
}

/// Add one to a string of decimal digits; true when the carry runs out of the left end
fn increment_digits(digits: &str) -> (String, bool) {
    let mut carry = true;
    let mut result: Vec<char> = digits
        .chars()
        .rev()
        .map(|c| match (carry, c) {
            (false, c) => c,
            (true, '9') => '0',
            (true, c) => {
                carry = false;
                char::from(c as u8 + 1)
            }
        })
        .collect();
    result.reverse();

    (result.into_iter().collect(), carry)
}

/// Insert group separators between the integer digits written since `start`
fn make_groups(out: &mut String, start: usize) {
    let mut i = out.len().saturating_sub(3);
    while i > start {
        out.insert(i, GROUP_SEPARATOR);
        i = i.saturating_sub(3);
    }
}

/// Move trailing fractional digits that repeat the cycle into the cycle
///
/// `0.1(21)` becomes `0.(12)`.
fn optimise(mut float_part: String, repeating_part: String) -> (String, String) {
    if float_part.is_empty() || repeating_part.is_empty() {
        return (float_part, repeating_part);
    }

    let mut repeating: Vec<char> = repeating_part.chars().collect();
    while let (Some(f), Some(&r)) = (float_part.chars().last(), repeating.last()) {
        if f != r {
            break;
        }
        float_part.pop();
        repeating.rotate_right(1);
    }

    (float_part, repeating.into_iter().collect())
}

fn zeroes(count: usize) -> String {
    "0".repeat(count)
}

/// Choose the rendering: `0.xxx`, `ddd.xxx`, digits followed by zeroes, or
/// `d.xxx(yyy)e±k`, preferring the forms without an exponent
fn layout(
    cancel: &CancellationToken,
    out: &mut String,
    digits: DecimalDigits,
    max_digits: usize,
    group: bool,
) -> Result<()> {
    let DecimalDigits {
        negative,
        int_part,
        mut float_part,
        mut repeating_part,
        mut e,
        ..
    } = digits;

    let trimmed = int_part.trim_start_matches('0');
    let mut int_part = if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    };

    if int_part == "0" {
        // borrow the first non-zero digit of the fractional part
        let trimmed = float_part.trim_start_matches('0');
        e -= BigInt::from(float_part.len() - trimmed.len());
        float_part = trimmed.to_string();

        if !float_part.is_empty() {
            int_part = float_part.remove(0).to_string();
            e -= 1;
        }
    } else if int_part.len() > 1 {
        // keep a single digit before the point
        e += BigInt::from(int_part.len() - 1);
        float_part = format!("{}{float_part}", &int_part[1..]);
        int_part.truncate(1);
    }

    if repeating_part.trim_end_matches('0').is_empty() {
        repeating_part.clear();
    }
    if repeating_part.is_empty() {
        let len = float_part.trim_end_matches('0').len();
        float_part.truncate(len);
    }

    cancel.check()?;

    let int_is_zero = int_part == "0";
    let float_len = float_part.len();
    let repeating_len = repeating_part.len();

    if usize::from(!int_is_zero) + float_len + repeating_len > max_digits {
        return Err(Error::InsufficientDigitBudget { max_digits });
    }

    if int_is_zero && repeating_part.is_empty() {
        out.push('0');
        return Ok(());
    }

    if negative {
        out.push('-');
    }

    let max = BigInt::from(max_digits);

    if !int_is_zero && e == BigInt::from(-1) {
        // 1.2345e-1 is 0.12345
        let (new_float, new_repeating) = optimise(int_part + &float_part, repeating_part);
        out.push_str("0.");
        out.push_str(&new_float);
        repeating_part = new_repeating;
        e = BigInt::zero();
    } else if e.is_negative() {
        if -&e >= BigInt::from(max_digits - (float_len + repeating_len)) {
            // 1.23(456)e-200 keeps its exponent
            out.push_str(&int_part);
            if float_len > 0 || repeating_len > 0 {
                out.push('.');
                out.push_str(&float_part);
            }
        } else {
            // 1.23(456)e-2 is 0.0123(456)
            let leading = usize::try_from(-&e - 1).map_err(|_| Error::Overflow)?;
            let (new_float, new_repeating) =
                optimise(zeroes(leading) + &int_part + &float_part, repeating_part);
            out.push_str("0.");
            out.push_str(&new_float);
            repeating_part = new_repeating;
            e = BigInt::zero();
        }
    } else if e.is_zero() {
        let start = out.len();
        out.push_str(&int_part);
        if group {
            make_groups(out, start);
        }
        if float_len > 0 || repeating_len > 0 {
            out.push('.');
            out.push_str(&float_part);
        }
    } else if e <= BigInt::from(float_len) {
        // 1.23(456)e+1 is 12.3(456)
        let k = usize::try_from(&e).map_err(|_| Error::Overflow)?;
        let start = out.len();
        out.push_str(&int_part);
        out.push_str(&float_part[..k]);
        if group {
            make_groups(out, start);
        }

        let rest = &float_part[k..];
        if !rest.is_empty() || repeating_len > 0 {
            out.push('.');
            out.push_str(rest);
        }
        e = BigInt::zero();
    } else if repeating_len == 0 && e < max {
        // 12.345e+5 is 1234500
        let k = usize::try_from(&e).map_err(|_| Error::Overflow)?;
        let start = out.len();
        out.push_str(&int_part);
        out.push_str(&float_part);
        out.push_str(&zeroes(k - float_len));
        if group {
            make_groups(out, start);
        }
        e = BigInt::zero();
    } else if repeating_len > 0
        && (if int_is_zero {
            e <= BigInt::from(max_digits - repeating_len)
        } else {
            e < BigInt::from(max_digits - repeating_len)
        })
    {
        // take the missing integer digits from the cycle: 1.2(34)e+3 is 1234.(34)
        let k = usize::try_from(&e).map_err(|_| Error::Overflow)?;
        let start = out.len();
        if !int_is_zero || float_len > 0 {
            out.push_str(&int_part);
            out.push_str(&float_part);
        }

        let cycle = repeating_part.as_bytes();
        let mut j = 0;
        for _ in 0..k - float_len {
            out.push(char::from(cycle[j]));
            j = (j + 1) % repeating_len;
        }
        if group {
            make_groups(out, start);
        }
        out.push('.');

        repeating_part = format!("{}{}", &repeating_part[j..], &repeating_part[..j]);
        e = BigInt::zero();
    } else {
        // 123.45(7)e+100 is 1.2345(7)e+102
        out.push_str(&int_part);
        if float_len > 0 || repeating_len > 0 {
            out.push('.');
            out.push_str(&float_part);
        }
    }

    cancel.check()?;

    if !repeating_part.is_empty() {
        out.push('(');
        out.push_str(&repeating_part);
        out.push(')');
    }

    if !e.is_zero() {
        out.push_str(&exponent_suffix(&e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(n: i64, d: i64, e: i64, max_digits: usize) -> String {
        let cancel = CancellationToken::new();
        to_float_string(&cancel, &Fraction::new(n, d, e).unwrap(), max_digits, false).unwrap()
    }

    #[test]
    fn test_cycle_detection() {
        assert_eq!(float(1, 3, 0, 100), "0.(3)");
        assert_eq!(float(1, 7, 0, 100), "0.(142857)");
        assert_eq!(float(1, 6, 0, 100), "0.1(6)");
        assert_eq!(float(1, 12, 0, 100), "0.08(3)");
        assert_eq!(float(1, 30, 0, 100), "0.0(3)");
        assert_eq!(float(10, 3, 0, 100), "3.(3)");
        assert_eq!(float(22, 7, 0, 100), "3.(142857)");
        assert_eq!(float(-2, 3, 0, 100), "-0.(6)");
    }

    #[test]
    fn test_terminating_decimals() {
        assert_eq!(float(1, 4, 0, 100), "0.25");
        assert_eq!(float(1, 2, 0, 100), "0.5");
        assert_eq!(float(5, 1, -2, 100), "0.05");
        assert_eq!(float(1250, 1, 0, 100), "1250");
        assert_eq!(float(-125, 1, -1, 100), "-12.5");
        assert_eq!(float(7, 1, 0, 100), "7");
    }

    #[test]
    fn test_exponent_forms() {
        assert_eq!(float(1, 1, 200, 20), "1e+200");
        assert_eq!(float(-15, 1, -200, 20), "-1.5e-199");
        assert_eq!(float(1, 3, 50, 20), "0.(3)e+50");
        assert_eq!(float(1, 3, 3, 20), "333.(3)");
    }

    #[test]
    fn test_digit_budget_rounding() {
        assert_eq!(float(123_456, 1, 0, 3), "≈1.23e+5");
        assert_eq!(float(9996, 1, -3, 3), "≈10");
        assert_eq!(float(1, 7, 0, 3), "≈0.143");
        assert_eq!(float(-1, 7, 0, 3), "≈-0.143");
        // the cycle fits the budget, so nothing is rounded
        assert_eq!(float(2, 3, 0, 3), "0.(6)");
    }

    #[test]
    fn test_grouping() {
        let cancel = CancellationToken::new();
        let x = Fraction::new(1_234_567, 2, 0).unwrap();
        assert_eq!(
            to_float_string(&cancel, &x, 100, true).unwrap(),
            "617\u{2009}283.5"
        );
        let y = Fraction::new(1_234_567, 1, 0).unwrap();
        assert_eq!(
            to_float_string(&cancel, &y, 100, true).unwrap(),
            "1\u{2009}234\u{2009}567"
        );
    }

    #[test]
    fn test_special_values_and_budget() {
        let cancel = CancellationToken::new();
        assert_eq!(to_float_string(&cancel, &Fraction::Undefined, 10, false).unwrap(), "Undefined");
        assert_eq!(
            to_float_string(&cancel, &Fraction::NegativeInfinity, 10, false).unwrap(),
            "-Infinity"
        );
        assert_eq!(to_float_string(&cancel, &Fraction::zero(), 10, false).unwrap(), "0");
        assert_eq!(
            to_float_string(&cancel, &Fraction::zero().as_approx(), 10, false).unwrap(),
            "≈0"
        );
        assert!(matches!(
            to_float_string(&cancel, &Fraction::one(), 2, false),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_approximate_input_is_marked() {
        let cancel = CancellationToken::new();
        let x = Fraction::new(1, 4, 0).unwrap().as_approx();
        assert_eq!(to_float_string(&cancel, &x, 100, false).unwrap(), "≈0.25");
    }

    #[test]
    fn test_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let x = Fraction::new(1, 7, 0).unwrap();
        assert_eq!(to_float_string(&cancel, &x, 100, false), Err(Error::Cancelled));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(increment_digits("129"), ("130".to_string(), false));
        assert_eq!(increment_digits("99"), ("00".to_string(), true));
        assert_eq!(
            optimise("121".to_string(), "21".to_string()),
            (String::new(), "12".to_string())
        );

        let mut out = "-1234567".to_string();
        make_groups(&mut out, 1);
        assert_eq!(out, "-1\u{2009}234\u{2009}567");
    }

    #[test]
    fn test_layout_rejects_digits_beyond_budget() {
        let cancel = CancellationToken::new();
        let digits = DecimalDigits {
            negative: false,
            int_part: "1".to_string(),
            float_part: "23".to_string(),
            repeating_part: "4".to_string(),
            e: BigInt::from(5),
            approx: false,
        };

        let mut out = String::new();
        assert_eq!(
            layout(&cancel, &mut out, digits, 3, false),
            Err(Error::InsufficientDigitBudget { max_digits: 3 })
        );
    }
}
