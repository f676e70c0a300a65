//! Process-wide numeric constants
//!
//! The literals live in an embedded TOML file and are materialised once, on first
//! use. If the embedded data cannot be read the engine falls back to short built-in
//! literals and logs the problem.

use std::sync::OnceLock;

use num_bigint::BigInt;

use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::utilities::pow10;

/// Exponent thresholds of the exponent-free reduction
///
/// Values whose magnitude is below `10^-exponent_band` collapse to zero; values
/// whose magnitude is at least `10^exponent_band` saturate at the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionBands {
    pub exponent_band: i64,
}

impl Default for ReductionBands {
    fn default() -> Self {
        Constants::get().bands
    }
}

pub(crate) struct Constants {
    pub(crate) pi: Fraction,
    pub(crate) euler: Fraction,
    /// log2(10) as (numerator, denominator)
    pub(crate) log2_10: (BigInt, BigInt),
    pub(crate) bands: ReductionBands,
}

static CONSTANTS: OnceLock<Constants> = OnceLock::new();

impl Constants {
    fn new() -> Self {
        match Self::load_embedded() {
            Ok(constants) => constants,
            Err(e) => {
                tracing::error!(target: "constants", error = %e, "failed to load embedded constants");
                Self::builtin()
            }
        }
    }

    /// Load the literals from the embedded TOML file
    fn load_embedded() -> Result<Self> {
        let constants_toml = include_str!("data/constants.toml");
        let parsed_toml: toml::Value =
            toml::from_str(constants_toml).map_err(|e| Error::Config(e.to_string()))?;

        let table = parsed_toml
            .as_table()
            .ok_or_else(|| Error::Config("Root is not a table".to_string()))?;

        let literal = |key: &str| -> Result<(BigInt, u32)> {
            let text = table
                .get(key)
                .and_then(|v| v.get("value"))
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::Config(format!("Missing or invalid value in {key}")))?;
            parse_decimal_literal(text)
        };

        let (pi_digits, pi_scale) = literal("pi")?;
        let (e_digits, e_scale) = literal("euler")?;
        let (lb_digits, lb_scale) = literal("log2_10")?;

        let exponent_band = table
            .get("reduce_no_e")
            .and_then(|v| v.get("exponent_band"))
            .and_then(|v| v.as_integer())
            .filter(|band| *band > 0)
            .ok_or_else(|| Error::Config("Missing or invalid reduce_no_e.exponent_band".to_string()))?;

        Ok(Self {
            pi: decimal_constant(pi_digits, pi_scale),
            euler: decimal_constant(e_digits, e_scale),
            log2_10: (lb_digits, pow10(lb_scale)),
            bands: ReductionBands { exponent_band },
        })
    }

    /// Double-precision literals used when the embedded data is unusable
    fn builtin() -> Self {
        Self {
            pi: decimal_constant(BigInt::from(3_141_592_653_589_793u64), 15),
            euler: decimal_constant(BigInt::from(2_718_281_828_459_045u64), 15),
            log2_10: (BigInt::from(3_321_928_094_887_362u64), pow10(15)),
            bands: ReductionBands { exponent_band: 1000 },
        }
    }

    pub(crate) fn get() -> &'static Self {
        CONSTANTS.get_or_init(Self::new)
    }
}

fn decimal_constant(digits: BigInt, scale: u32) -> Fraction {
    Fraction::from_parts(digits, BigInt::from(1), -BigInt::from(scale), true, false)
}

/// Split `"3.14"` into the digits `314` and the fractional length `2`
fn parse_decimal_literal(text: &str) -> Result<(BigInt, u32)> {
    let text = text.trim();
    let (integer, fractional) = text.split_once('.').unwrap_or((text, ""));

    if integer.is_empty() || !integer.bytes().chain(fractional.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(Error::Config(format!("Not a decimal literal: '{text}'")));
    }

    let digits: BigInt = format!("{integer}{fractional}")
        .parse()
        .map_err(|e| Error::Config(format!("Not a decimal literal: {e}")))?;
    let scale = u32::try_from(fractional.len())
        .map_err(|_| Error::Config("Decimal literal too long".to_string()))?;

    Ok((digits, scale))
}
