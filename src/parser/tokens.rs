use num_bigint::BigInt;
use winnow::ascii::{Caseless, digit1, multispace0};
use winnow::combinator::{alt, opt, preceded, separated};
use winnow::error::ErrMode;
use winnow::token::{literal, one_of};
use winnow::{ModalResult, Parser};

use crate::fraction::Fraction;

/// Characters that may separate digit groups
const DIGIT_SEPARATORS: [char; 2] = ['_', '\u{2009}'];

/// Optional spaces, tabs and line breaks
pub fn parse_whitespace(input: &mut &str) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

/// Optional `+` or `-`; true when negative
pub fn parse_sign(input: &mut &str) -> ModalResult<bool> {
    opt(one_of(['+', '-']))
        .map(|sign| sign == Some('-'))
        .parse_next(input)
}

/// Decimal digits, possibly grouped with `_` or a thin space; the separators are
/// dropped from the result
pub fn parse_digits(input: &mut &str) -> ModalResult<String> {
    separated(1.., digit1, one_of(DIGIT_SEPARATORS))
        .map(|groups: Vec<&str>| groups.concat())
        .parse_next(input)
}

pub fn parse_natural(input: &mut &str) -> ModalResult<BigInt> {
    parse_digits
        .try_map(|digits| digits.parse::<BigInt>())
        .parse_next(input)
}

pub fn parse_signed_integer(input: &mut &str) -> ModalResult<BigInt> {
    (parse_sign, parse_natural)
        .map(|(negative, n)| if negative { -n } else { n })
        .parse_next(input)
}

/// `e` or `E` followed by a signed integer
pub fn parse_exponent(input: &mut &str) -> ModalResult<BigInt> {
    preceded(one_of(['e', 'E']), parse_signed_integer).parse_next(input)
}

pub fn parse_positive_infinity(input: &mut &str) -> ModalResult<Fraction> {
    preceded(
        opt('+'),
        alt((literal(Caseless("infinity")), literal("∞"))),
    )
    .value(Fraction::PositiveInfinity)
    .parse_next(input)
    .map_err(ErrMode::Backtrack)
}

pub fn parse_negative_infinity(input: &mut &str) -> ModalResult<Fraction> {
    preceded('-', alt((literal(Caseless("infinity")), literal("∞"))))
        .value(Fraction::NegativeInfinity)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_undefined(input: &mut &str) -> ModalResult<Fraction> {
    literal(Caseless("undefined"))
        .value(Fraction::Undefined)
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_pi(input: &mut &str) -> ModalResult<Fraction> {
    alt((literal(Caseless("pi")), literal("π")))
        .map(|_| Fraction::pi())
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

pub fn parse_euler_number(input: &mut &str) -> ModalResult<Fraction> {
    literal(Caseless("e"))
        .map(|_| Fraction::euler_number())
        .parse_next(input)
        .map_err(ErrMode::Backtrack)
}

/// `≈` in front of a value marks it approximate
pub fn parse_approx_marker(input: &mut &str) -> ModalResult<bool> {
    opt(literal("≈"))
        .map(|marker| marker.is_some())
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digits_with_separators() {
        let mut input = "1_234\u{2009}567 rest";
        assert_eq!(parse_digits(&mut input).unwrap(), "1234567");
        assert_eq!(input, " rest");

        // a dangling separator is left in place
        let mut input = "12_";
        assert_eq!(parse_digits(&mut input).unwrap(), "12");
        assert_eq!(input, "_");

        assert!(parse_digits(&mut "_12").is_err());
    }

    #[test]
    fn test_parse_signed_integer_and_exponent() {
        assert_eq!(parse_signed_integer(&mut "-42").unwrap(), BigInt::from(-42));
        assert_eq!(parse_signed_integer(&mut "+7").unwrap(), BigInt::from(7));
        assert_eq!(parse_exponent(&mut "e-5").unwrap(), BigInt::from(-5));
        assert_eq!(parse_exponent(&mut "E+1_000").unwrap(), BigInt::from(1000));
        assert!(parse_exponent(&mut "e").is_err());
    }

    #[test]
    fn test_special_tokens() {
        assert!(parse_positive_infinity(&mut "Infinity").unwrap().is_positive_infinity());
        assert!(parse_positive_infinity(&mut "+∞").unwrap().is_positive_infinity());
        assert!(parse_negative_infinity(&mut "-INFINITY").unwrap().is_negative_infinity());
        assert!(parse_undefined(&mut "Undefined").unwrap().is_undefined());
        assert!(parse_pi(&mut "π").unwrap().is_approx());
        assert!(parse_euler_number(&mut "E").unwrap().is_approx());
        assert!(parse_negative_infinity(&mut "-5").is_err());
    }
}
