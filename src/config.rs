//! Digit budgets used by the evaluation entry points
//!
//! Settings are plain values with defaults; a front end can override them from a
//! TOML document with an `[engine]` table:
//!
//! ```toml
//! [engine]
//! decimal_digits = 1000
//! rational_digits = 50
//! simplify_digits = 33
//! group = true
//! ```

use crate::context::MIN_DIGITS as MIN_CONTEXT_DIGITS;
use crate::error::{Error, Result};
use crate::formatter::MIN_DIGITS;

/// Digits allowed in the decimal output; the period of 6918696/2996677 alone has
/// 241665 digits
pub const DEFAULT_DECIMAL_DIGITS: usize = 250_000;
pub const DEFAULT_RATIONAL_DIGITS: usize = 200;
pub const DEFAULT_SIMPLIFY_DIGITS: usize = 33;

/// Budgets for formatting and simplification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Significant digits of the decimal text
    pub decimal_digits: usize,
    /// Digits of each of the numerator and the denominator in rational text
    pub rational_digits: usize,
    /// Digit budget of the calculation context used to simplify a parsed value
    pub simplify_digits: usize,
    /// Separate integer digit groups with a thin space
    pub group: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            decimal_digits: DEFAULT_DECIMAL_DIGITS,
            rational_digits: DEFAULT_RATIONAL_DIGITS,
            simplify_digits: DEFAULT_SIMPLIFY_DIGITS,
            group: false,
        }
    }
}

impl Settings {
    /// Read settings from TOML text; keys missing from `[engine]` keep their defaults
    ///
    /// # Examples
    /// ```
    /// use repeating_decimals::config::Settings;
    ///
    /// let settings = Settings::from_toml_str("[engine]\ndecimal_digits = 500").unwrap();
    /// assert_eq!(settings.decimal_digits, 500);
    /// assert_eq!(settings.rational_digits, 200);
    /// ```
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let parsed_toml: toml::Value =
            toml::from_str(toml_str).map_err(|e| Error::Config(e.to_string()))?;

        let table = parsed_toml
            .as_table()
            .ok_or_else(|| Error::Config("Root is not a table".to_string()))?;

        let mut settings = Self::default();

        let Some(engine) = table.get("engine") else {
            return Ok(settings);
        };
        let engine = engine
            .as_table()
            .ok_or_else(|| Error::Config("engine is not a table".to_string()))?;

        let digits = |key: &str, min: usize| -> Result<Option<usize>> {
            let Some(value) = engine.get(key) else {
                return Ok(None);
            };
            value
                .as_integer()
                .and_then(|v| usize::try_from(v).ok())
                .filter(|v| *v >= min)
                .map(Some)
                .ok_or_else(|| {
                    Error::Config(format!("Invalid {key}: expected an integer of at least {min}"))
                })
        };

        if let Some(v) = digits("decimal_digits", MIN_DIGITS)? {
            settings.decimal_digits = v;
        }
        if let Some(v) = digits("rational_digits", MIN_DIGITS)? {
            settings.rational_digits = v;
        }
        if let Some(v) = digits("simplify_digits", MIN_CONTEXT_DIGITS)? {
            settings.simplify_digits = v;
        }
        if let Some(value) = engine.get("group") {
            settings.group = value
                .as_bool()
                .ok_or_else(|| Error::Config("Invalid group: expected a boolean".to_string()))?;
        }

        tracing::debug!(target: "config", ?settings, "settings loaded");

        Ok(settings)
    }
}
