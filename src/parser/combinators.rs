use num_bigint::BigInt;
use num_traits::{One, Zero};
use winnow::ascii::{multispace0, multispace1};
use winnow::combinator::{alt, delimited, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode, ParserError};
use winnow::token::{literal, one_of};
use winnow::{ModalResult, Parser};

use crate::fraction::Fraction;
use crate::parser::Input;
use crate::parser::tokens::*;
use crate::utilities::pow10;

/// Digits after the decimal point: the fractional digits and the repeating block
struct PointPart {
    fractional: String,
    repeating: Option<String>,
}

/// `.45`, `.45(67)` or `.(67)`; a bare point is rejected
fn parse_point_part(input: &mut &str) -> ModalResult<PointPart> {
    let start = *input;

    (parse_whitespace, '.', parse_whitespace).parse_next(input)?;
    let fractional = opt(parse_digits).parse_next(input)?.unwrap_or_default();
    let repeating = opt(delimited(
        (multispace0, '(', multispace0),
        parse_digits,
        (multispace0, ')'),
    ))
    .parse_next(input)?;

    if fractional.is_empty() && repeating.is_none() {
        *input = start;
        return Err(ErrMode::Backtrack(ContextError::from_input(input)));
    }

    Ok(PointPart {
        fractional,
        repeating,
    })
}

fn parse_optional_exponent(input: &mut &str) -> ModalResult<BigInt> {
    opt(preceded(multispace0, parse_exponent))
        .map(Option::unwrap_or_default)
        .parse_next(input)
}

/// `/ d`, `// d`, either optionally followed by an exponent
fn parse_denominator(input: &mut &str) -> ModalResult<(BigInt, BigInt)> {
    preceded(
        (multispace0, alt((literal("//"), literal("/"))), multispace0),
        (parse_natural, parse_optional_exponent),
    )
    .parse_next(input)
}

fn digit_count(digits: &str) -> ModalResult<u32> {
    u32::try_from(digits.len()).map_err(|_| ErrMode::Cut(ContextError::new()))
}

fn parse_digit_string(digits: &str) -> ModalResult<BigInt> {
    if digits.is_empty() {
        return Ok(BigInt::zero());
    }
    digits
        .parse::<BigInt>()
        .map_err(|_| ErrMode::Cut(ContextError::new()))
}

/// Value of `integer.fractional(repeating)`
///
/// With `t2 = integer.fractional` as an integer and `t1` the same digits followed by
/// one copy of the cycle, the value is `(t1 - t2) / (10^f * (10^r - 1))`.
fn decimal_to_fraction(
    negative: bool,
    integer: BigInt,
    point: PointPart,
    exponent: BigInt,
) -> ModalResult<Fraction> {
    let PointPart {
        fractional,
        repeating,
    } = point;

    match repeating {
        Some(repeating) => {
            let f_len = digit_count(&fractional)?;
            let r_len = digit_count(&repeating)?;

            let fpt = pow10(f_len);
            let rpt = pow10(r_len);

            let t2 = integer * &fpt + parse_digit_string(&fractional)?;
            let t1 = &t2 * &rpt + parse_digit_string(&repeating)?;
            let n = t1 - t2;
            let d = fpt * (rpt - 1);

            Ok(Fraction::from_parts(
                if negative { -n } else { n },
                d,
                exponent,
                false,
                false,
            ))
        }
        None => {
            let fractional = fractional.trim_end_matches('0');
            let f_len = digit_count(fractional)?;

            let n = integer * pow10(f_len) + parse_digit_string(fractional)?;

            Ok(Fraction::from_parts(
                if negative { -n } else { n },
                BigInt::one(),
                exponent - f_len,
                false,
                false,
            ))
        }
    }
}

fn rational_to_fraction(
    negative: bool,
    n: BigInt,
    n_exponent: BigInt,
    denominator: Option<(BigInt, BigInt)>,
) -> Fraction {
    let (d, d_exponent) = denominator.unwrap_or_else(|| (BigInt::one(), BigInt::zero()));

    match (n.is_zero(), d.is_zero()) {
        (true, true) => Fraction::Undefined,
        (true, false) => Fraction::zero(),
        (false, true) if negative => Fraction::NegativeInfinity,
        (false, true) => Fraction::PositiveInfinity,
        (false, false) => Fraction::from_parts(
            if negative { -n } else { n },
            d,
            n_exponent - d_exponent,
            false,
            false,
        ),
    }
}

/// Decimal (`-12.3(45)e6`) or rational (`3e2/7e1`) notation
pub fn parse_number(input: &mut &str) -> ModalResult<Fraction> {
    let negative = parse_sign(input)?;
    parse_whitespace(input)?;
    let integer = parse_natural(input)?;

    let point = opt(parse_point_part).parse_next(input)?;
    let exponent = parse_optional_exponent(input)?;

    if let Some(point) = point {
        return decimal_to_fraction(negative, integer, point, exponent);
    }

    let denominator = opt(parse_denominator).parse_next(input)?;

    Ok(rational_to_fraction(negative, integer, exponent, denominator))
}

/// `;`, `,` or plain whitespace between continued fraction terms
fn parse_term_separator(input: &mut &str) -> ModalResult<()> {
    alt((
        (multispace0, one_of([';', ',']), multispace0).void(),
        multispace1.void(),
    ))
    .parse_next(input)
}

/// `-[a0; a1, a2 ...]`; the closing bracket may be omitted
pub fn parse_continued_fraction(input: &mut &str) -> ModalResult<Input> {
    let negative = parse_sign(input)?;
    (parse_whitespace, '[', parse_whitespace).parse_next(input)?;

    let first = parse_signed_integer(input)?;
    let rest: Vec<BigInt> =
        repeat(0.., preceded(parse_term_separator, parse_signed_integer)).parse_next(input)?;

    (parse_whitespace, opt(']')).parse_next(input)?;

    let mut terms = Vec::with_capacity(rest.len() + 1);
    terms.push(first);
    terms.extend(rest);

    Ok(Input::ContinuedFraction { terms, negative })
}

/// Named values: the infinities, `undefined`, `pi` and `e`
pub fn parse_special_value(input: &mut &str) -> ModalResult<Fraction> {
    alt((
        parse_positive_infinity,
        parse_negative_infinity,
        parse_undefined,
        parse_pi,
        parse_euler_number,
    ))
    .parse_next(input)
}

/// A value in any accepted notation, optionally preceded by `≈`
pub fn parse_value(input: &mut &str) -> ModalResult<Input> {
    let approx = parse_approx_marker(input)?;
    parse_whitespace(input)?;

    if approx {
        return alt((parse_special_value, parse_number))
            .map(|f| Input::Fraction(f.as_approx()))
            .parse_next(input);
    }

    alt((
        parse_special_value.map(Input::Fraction),
        parse_continued_fraction,
        parse_number.map(Input::Fraction),
    ))
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> Fraction {
        let mut input = text;
        let f = parse_number(&mut input).unwrap();
        assert!(input.is_empty(), "unparsed '{input}' in '{text}'");
        f
    }

    fn frac(n: i64, d: i64, e: i64) -> Fraction {
        Fraction::new(n, d, e).unwrap()
    }

    #[test]
    fn test_decimal_forms() {
        assert_eq!(number("123"), frac(123, 1, 0));
        assert_eq!(number("-12.50"), frac(-25, 2, 0));
        assert_eq!(number("1.5e3"), frac(1500, 1, 0));
        assert_eq!(number("0.(3)"), frac(1, 3, 0));
        assert_eq!(number("0.1(6)"), frac(1, 6, 0));
        assert_eq!(number("3.(142857)"), frac(22, 7, 0));
        assert_eq!(number("-0.(9)"), frac(-1, 1, 0));
        assert_eq!(number("1.(3)e-1"), frac(2, 15, 0));
        assert_eq!(number("1\u{2009}234.5"), frac(12345, 1, -1));
        assert_eq!(number("1 . 5"), frac(3, 2, 0));
    }

    #[test]
    fn test_rational_forms() {
        assert_eq!(number("22/7"), frac(22, 7, 0));
        assert_eq!(number("-3e2 / 7e1"), frac(-30, 7, 0));
        assert_eq!(number("1//3"), frac(1, 3, 0));
        assert_eq!(number("3e+5/7"), frac(300_000, 7, 0));
        assert!(number("0/0").is_undefined());
        assert!(number("-5/0").is_negative_infinity());
        assert!(number("0/5").is_zero());
    }

    #[test]
    fn test_bare_point_is_not_consumed() {
        let mut input = "5.";
        assert_eq!(parse_number(&mut input).unwrap(), frac(5, 1, 0));
        assert_eq!(input, ".");
    }

    #[test]
    fn test_continued_fraction_forms() {
        let mut input = "-[3; 7, 15 1]";
        let Input::ContinuedFraction { terms, negative } = parse_continued_fraction(&mut input).unwrap() else {
            panic!("expected a continued fraction");
        };
        assert!(negative);
        let expected: Vec<BigInt> = [3, 7, 15, 1].into_iter().map(BigInt::from).collect();
        assert_eq!(terms, expected);
        assert!(input.is_empty());

        let mut input = "[1, -2";
        assert!(parse_continued_fraction(&mut input).is_ok());
        assert!(input.is_empty());
    }

    #[test]
    fn test_approx_marker() {
        let mut input = "≈0.33";
        let Input::Fraction(f) = parse_value(&mut input).unwrap() else {
            panic!("expected a fraction");
        };
        assert!(f.is_approx());
        assert_eq!(f, frac(33, 100, 0));
    }
}
