//! Value formatting module
//!
//! This module renders fractions as text: decimal notation with the repeating block
//! in parentheses, rational notation `N[e±k][/D]`, and continued fraction term lists.
//! The main entry points are [`to_float_string`] and [`to_rational_string`].

mod continued;
mod decimal;
mod rational;

pub use continued::{format_continued_fraction, to_continued_fraction_string};
pub use decimal::to_float_string;
pub use rational::to_rational_string;

use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::utilities::pow10;

/// Smallest digit budget accepted by the decimal and rational renderers
pub const MIN_DIGITS: usize = 3;

/// Thin space used between digit groups
pub const GROUP_SEPARATOR: char = '\u{2009}';

fn check_max_digits(max_digits: usize) -> Result<()> {
    if max_digits < MIN_DIGITS {
        return Err(Error::invalid_argument(format!(
            "precision too small: {max_digits} digits, at least {MIN_DIGITS} required"
        )));
    }

    Ok(())
}

/// Text of the values that need no digit work: the special kinds and zero
fn format_trivial(f: &Fraction) -> Option<String> {
    match f {
        Fraction::Normal(v) if v.n().is_zero() => {
            Some(if v.is_approx() { "≈0" } else { "0" }.to_string())
        }
        Fraction::Normal(_) => None,
        special => Some(special.to_string()),
    }
}

/// `10^k` for a digit count
fn pow10_usize(k: usize) -> Result<BigInt> {
    u32::try_from(k).map(pow10).map_err(|_| Error::Overflow)
}

/// `e+5` or `e-5`
fn exponent_suffix(e: &BigInt) -> String {
    if e.sign() == Sign::Minus {
        format!("e{e}")
    } else {
        format!("e+{e}")
    }
}
