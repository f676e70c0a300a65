//! Exact rational arithmetic with repeating decimals
//!
//! Values are extended fractions `N / D × 10^E` or one of `Undefined`, `+Infinity`,
//! `-Infinity`. They are parsed from decimal (with an optional repeating block),
//! rational and continued fraction notation, kept within a digit budget by
//! simplification and best-approximation reduction, and rendered back as text with
//! the repeating period found by cycle detection.
//!
//! ```
//! use repeating_decimals::{CancellationToken, parse, simplify, to_decimal_string};
//!
//! let cancel = CancellationToken::new();
//! let x = simplify(&parse("2/14").unwrap(), 33, &cancel).unwrap();
//! assert_eq!(to_decimal_string(&x, 100, &cancel).unwrap(), "0.(142857)");
//! ```

pub mod cancel;
pub mod config;
mod constants;
pub mod context;
pub mod continued_fraction;
pub mod dfloat;
pub mod error;
pub mod formatter;
pub mod fraction;
pub mod parser;
pub mod report;
pub mod utilities;

use num_bigint::BigInt;

pub use cancel::CancellationToken;
pub use config::Settings;
pub use constants::ReductionBands;
pub use context::CalculationContext;
pub use dfloat::DecimalFloat;
pub use error::{Error, Result};
pub use fraction::{Finite, Fraction};
pub use parser::{Input, parse, parse_input};

/// GCD-reduce a value and place its exponent for a `max_digits` budget
pub fn simplify(f: &Fraction, max_digits: usize, cancel: &CancellationToken) -> Result<Fraction> {
    cancel.check()?;
    let ctx = CalculationContext::new(cancel.clone(), max_digits)?;

    f.simplify(&ctx)
}

/// Decimal text with at most `max_digits` significant digits, see
/// [`formatter::to_float_string`]
pub fn to_decimal_string(f: &Fraction, max_digits: usize, cancel: &CancellationToken) -> Result<String> {
    cancel.check()?;

    formatter::to_float_string(cancel, f, max_digits, false)
}

/// Rational text `N[e±k][/D]`, see [`formatter::to_rational_string`]
pub fn to_rational_string(f: &Fraction, max_digits: usize, cancel: &CancellationToken) -> Result<String> {
    cancel.check()?;

    formatter::to_rational_string(cancel, f, max_digits)
}

/// Value of the continued fraction `[a0; a1, ...]`, negated when `negative` is set
pub fn from_continued_fraction(
    terms: &[BigInt],
    negative: bool,
    cancel: &CancellationToken,
) -> Result<Fraction> {
    cancel.check()?;

    continued_fraction::to_fraction(cancel, terms, negative)
}
