//! Evaluation of one input into every presentation the result panel shows
//!
//! The text is parsed, continued fractions are rebuilt, finite values are simplified,
//! and the value is rendered in decimal and rational form. The repeating period is
//! read back from the decimal text.

use std::fmt;

use crate::cancel::CancellationToken;
use crate::config::Settings;
use crate::context::CalculationContext;
use crate::continued_fraction;
use crate::error::Result;
use crate::formatter::{to_float_string, to_rational_string};
use crate::fraction::Fraction;
use crate::parser::{Input, parse_input};

/// What the decimal text says about the period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    /// The decimal expansion terminates, or the value is not finite
    NotRepeating,
    /// Number of digits in the repeating block
    Period(usize),
    /// The digit budget ran out before the expansion ended or repeated
    PeriodTooLong,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::NotRepeating => f.write_str("Not a repeating decimal."),
            Note::Period(period) => write!(f, "The period is {period}."),
            Note::PeriodTooLong => f.write_str("The period is too long."),
        }
    }
}

/// Result of [`evaluate`]
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// The simplified value
    pub value: Fraction,
    /// Decimal text, the repeating block in parentheses
    pub decimal: String,
    /// Rational text `N[e±k][/D]`
    pub rational: String,
    pub note: Note,
}

impl Report {
    /// Digits in the repeating block, zero when there is none
    pub fn period(&self) -> usize {
        match self.note {
            Note::Period(period) => period,
            _ => 0,
        }
    }

    /// Whether the decimal text is rounded
    pub fn is_approx(&self) -> bool {
        self.decimal.starts_with('≈')
    }
}

/// Parse `text` and render the value with the budgets of `settings`
///
/// # Examples
/// ```
/// use repeating_decimals::cancel::CancellationToken;
/// use repeating_decimals::config::Settings;
/// use repeating_decimals::report::{Note, evaluate};
///
/// let report = evaluate("1/7", &Settings::default(), &CancellationToken::new()).unwrap();
/// assert_eq!(report.decimal, "0.(142857)");
/// assert_eq!(report.note, Note::Period(6));
/// ```
pub fn evaluate(text: &str, settings: &Settings, cancel: &CancellationToken) -> Result<Report> {
    cancel.check()?;

    let value = match parse_input(text)? {
        Input::Fraction(fraction) => fraction,
        Input::ContinuedFraction { terms, negative } => {
            continued_fraction::to_fraction(cancel, &terms, negative)?
        }
    };

    let value = if value.is_normal() {
        let ctx = CalculationContext::new(cancel.clone(), settings.simplify_digits)?;
        value.simplify(&ctx)?
    } else {
        value
    };

    let decimal = to_float_string(cancel, &value, settings.decimal_digits, settings.group)?;
    let rational = to_rational_string(cancel, &value, settings.rational_digits)?;
    let note = note_for(&decimal);

    tracing::debug!(target: "report", text, %decimal, %rational, ?note, "evaluated");

    Ok(Report {
        value,
        decimal,
        rational,
        note,
    })
}

fn note_for(decimal: &str) -> Note {
    if decimal.starts_with('≈') {
        return Note::PeriodTooLong;
    }

    match (decimal.find('('), decimal.find(')')) {
        (Some(left), Some(right)) if left > 0 && right > left => Note::Period(right - left - 1),
        _ => Note::NotRepeating,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Report {
        evaluate(text, &Settings::default(), &CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_notes() {
        assert_eq!(run("1/3").note, Note::Period(1));
        assert_eq!(run("0.25").note, Note::NotRepeating);
        assert_eq!(run("infinity").note, Note::NotRepeating);
        assert_eq!(run("pi").note, Note::PeriodTooLong);

        assert_eq!(Note::Period(6).to_string(), "The period is 6.");
        assert_eq!(Note::NotRepeating.to_string(), "Not a repeating decimal.");
        assert_eq!(Note::PeriodTooLong.to_string(), "The period is too long.");
    }

    #[test]
    fn test_report_fields() {
        let report = run("[3; 7, 15, 1]");
        assert_eq!(report.value, Fraction::new(355, 113, 0).unwrap());
        assert_eq!(report.rational, "355/113");
        assert_eq!(report.period(), 112);
        assert!(!report.is_approx());
    }

    #[test]
    fn test_small_budget_is_approximate() {
        let settings = Settings {
            decimal_digits: 5,
            ..Settings::default()
        };
        let report = evaluate("1/7", &settings, &CancellationToken::new()).unwrap();
        assert_eq!(report.decimal, "≈0.14286");
        assert!(report.is_approx());
        assert_eq!(report.period(), 0);
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = evaluate("1/3", &Settings::default(), &cancel);
        assert!(result.is_err_and(|e| e.is_cancelled()));
    }
}
