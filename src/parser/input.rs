use num_bigint::BigInt;
use winnow::Parser;
use winnow::ascii::multispace0;
use winnow::error::{ContextError, ErrMode};

use crate::cancel::CancellationToken;
use crate::continued_fraction;
use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::parser::combinators::parse_value;

/// A parsed input, before any evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Fraction(Fraction),
    /// Terms `[a0; a1, ...]`; `negative` when the bracket was preceded by `-`
    ContinuedFraction { terms: Vec<BigInt>, negative: bool },
}

/// Parse text in any accepted notation
///
/// Accepted: decimal with optional repeating block and exponent (`-1.2(34)e5`),
/// rational (`3e2/7`, `1//3`), continued fraction (`[3; 7, 15, 1]`), and the
/// names `infinity`, `∞`, `undefined`, `pi`, `π`, `e`.
///
/// # Examples
/// ```
/// use repeating_decimals::parser::{Input, parse_input};
///
/// let input = parse_input("[3; 7, 15, 1]").unwrap();
/// assert!(matches!(input, Input::ContinuedFraction { negative: false, .. }));
/// ```
pub fn parse_input(text: &str) -> Result<Input> {
    let mut input = text;

    let make_err = |e: ErrMode<ContextError>, remaining: &str| Error::Parse {
        input: text.to_string(),
        message: format!("{e:?} at remaining input '{remaining}'"),
    };

    multispace0
        .parse_next(&mut input)
        .map_err(|e| make_err(e, input))?;

    let value = parse_value
        .parse_next(&mut input)
        .map_err(|e| make_err(e, input))?;

    multispace0
        .parse_next(&mut input)
        .map_err(|e| make_err(e, input))?;

    if !input.is_empty() {
        return Err(Error::Parse {
            input: text.to_string(),
            message: format!("trailing characters '{input}'"),
        });
    }

    tracing::trace!(target: "parser", text, "parsed input");

    Ok(value)
}

/// Parse text into a value; continued fractions are evaluated exactly
///
/// # Examples
/// ```
/// use repeating_decimals::parser::parse;
///
/// let x = parse("0.(3)").unwrap();
/// assert_eq!(x, parse("1/3").unwrap());
/// ```
pub fn parse(text: &str) -> Result<Fraction> {
    match parse_input(text)? {
        Input::Fraction(fraction) => Ok(fraction),
        Input::ContinuedFraction { terms, negative } => {
            continued_fraction::to_fraction(&CancellationToken::new(), &terms, negative)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse("  22/7 \n").unwrap(), Fraction::new(22, 7, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in ["", "abc", "1.2.3", "1/", "--1", "5.", "[", "≈[1; 2]"] {
            let result = parse(text);
            assert!(matches!(result, Err(Error::Parse { .. })), "'{text}' -> {result:?}");
        }
    }

    #[test]
    fn test_parse_continued_fraction() {
        assert_eq!(parse("[3; 7, 15, 1]").unwrap(), Fraction::new(355, 113, 0).unwrap());
        assert_eq!(parse("-[2; 3]").unwrap(), Fraction::new(-7, 3, 0).unwrap());
    }

    #[test]
    fn test_from_str() {
        let x: Fraction = "1.25".parse().unwrap();
        assert_eq!(x, Fraction::new(5, 4, 0).unwrap());
    }
}
