use num_bigint::BigInt;

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::fraction::Fraction;

/// Render continued fraction terms as `[a0; a1, a2]`
///
/// At most `max_terms` terms are written; a longer list ends with `, …]`.
///
/// # Examples
/// ```
/// use num_bigint::BigInt;
/// use repeating_decimals::formatter::format_continued_fraction;
///
/// let terms: Vec<BigInt> = [3, 7, 15, 1].into_iter().map(BigInt::from).collect();
/// assert_eq!(format_continued_fraction(&terms, 10).unwrap(), "[3; 7, 15, 1]");
/// assert_eq!(format_continued_fraction(&terms, 2).unwrap(), "[3; 7, …]");
/// ```
pub fn format_continued_fraction(terms: &[BigInt], max_terms: usize) -> Result<String> {
    if max_terms == 0 {
        return Err(Error::invalid_argument("at least one term must be shown"));
    }
    let (first, rest) = terms
        .split_first()
        .ok_or_else(|| Error::invalid_argument("empty continued fraction"))?;

    let mut out = format!("[{first}");

    let shown: Vec<String> = rest.iter().take(max_terms - 1).map(BigInt::to_string).collect();
    if !shown.is_empty() {
        out.push_str("; ");
        out.push_str(&shown.join(", "));
    }

    if rest.len() > shown.len() {
        out.push_str(if shown.is_empty() { "; …" } else { ", …" });
    }
    out.push(']');

    Ok(out)
}

/// Continued fraction text of a finite value
pub fn to_continued_fraction_string(
    cancel: &CancellationToken,
    f: &Fraction,
    max_terms: usize,
) -> Result<String> {
    let terms = f.to_continued_fraction(cancel)?;

    format_continued_fraction(&terms, max_terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(values: &[i64]) -> Vec<BigInt> {
        values.iter().copied().map(BigInt::from).collect()
    }

    #[test]
    fn test_format_continued_fraction() {
        assert_eq!(format_continued_fraction(&big(&[5]), 3).unwrap(), "[5]");
        assert_eq!(format_continued_fraction(&big(&[-3, 1, 2]), 3).unwrap(), "[-3; 1, 2]");
        assert_eq!(format_continued_fraction(&big(&[1, 2, 3]), 1).unwrap(), "[1; …]");
        assert!(format_continued_fraction(&[], 3).is_err());
        assert!(format_continued_fraction(&big(&[1]), 0).is_err());
    }

    #[test]
    fn test_to_continued_fraction_string() {
        let cancel = CancellationToken::new();
        let x = Fraction::new(355, 113, 0).unwrap();
        assert_eq!(to_continued_fraction_string(&cancel, &x, 10).unwrap(), "[3; 7, 16]");
        assert!(to_continued_fraction_string(&cancel, &Fraction::Undefined, 10).is_err());
    }
}
