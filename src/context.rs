//! Precision configuration for simplification and reduction

use num_bigint::BigInt;

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::utilities::{byte_count, pow10};

/// Smallest accepted digit budget
pub const MIN_DIGITS: usize = 2;

/// Supplies the magnitude bounds derived from one "maximum digits" setting, together
/// with the cancellation token every bounded operation observes
#[derive(Debug, Clone)]
pub struct CalculationContext {
    cancel: CancellationToken,
    max_digits: usize,
    min_val: BigInt,
    max_val: BigInt,
    min_val_div10: BigInt,
    max_val_div10: BigInt,
    max_bytes: u64,
}

impl CalculationContext {
    /// Create a context for `max_digits` significant digits
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] when `max_digits` is below [`MIN_DIGITS`].
    pub fn new(cancel: CancellationToken, max_digits: usize) -> Result<Self> {
        let mut ctx = Self {
            cancel,
            max_digits: 0,
            min_val: BigInt::default(),
            max_val: BigInt::default(),
            min_val_div10: BigInt::default(),
            max_val_div10: BigInt::default(),
            max_bytes: 0,
        };
        ctx.set_max_digits(max_digits)?;
        Ok(ctx)
    }

    /// Change the digit budget, recomputing the bounds
    pub fn set_max_digits(&mut self, max_digits: usize) -> Result<()> {
        if max_digits < MIN_DIGITS {
            return Err(Error::invalid_argument(format!(
                "maximum digits must be at least {MIN_DIGITS}, got {max_digits}"
            )));
        }
        if max_digits == self.max_digits {
            return Ok(());
        }
        let exponent = u32::try_from(max_digits)
            .map_err(|_| Error::invalid_argument(format!("maximum digits too large: {max_digits}")))?;

        self.max_digits = max_digits;
        self.max_val = pow10(exponent) - 1;
        self.min_val = -&self.max_val;
        self.min_val_div10 = &self.min_val / 10;
        self.max_val_div10 = &self.max_val / 10;
        self.max_bytes = byte_count(&self.max_val);

        Ok(())
    }

    pub fn cancel(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn max_digits(&self) -> usize {
        self.max_digits
    }

    /// `-(10^max_digits - 1)`
    pub fn min_val(&self) -> &BigInt {
        &self.min_val
    }

    /// `10^max_digits - 1`
    pub fn max_val(&self) -> &BigInt {
        &self.max_val
    }

    pub fn min_val_div10(&self) -> &BigInt {
        &self.min_val_div10
    }

    pub fn max_val_div10(&self) -> &BigInt {
        &self.max_val_div10
    }

    /// Bytes needed to hold [`Self::max_val`]
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Whether `n` lies within `[min_val, max_val]`
    pub(crate) fn in_range(&self, n: &BigInt) -> bool {
        n >= &self.min_val && n <= &self.max_val
    }

    /// Whether `n` can absorb another factor of ten without leaving the bounds
    pub(crate) fn in_range_div10(&self, n: &BigInt) -> bool {
        n >= &self.min_val_div10 && n <= &self.max_val_div10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_max_digits() {
        let mut ctx = CalculationContext::new(CancellationToken::new(), 3).unwrap();
        assert_eq!(ctx.max_val(), &BigInt::from(999));
        assert_eq!(ctx.min_val(), &BigInt::from(-999));
        assert_eq!(ctx.max_val_div10(), &BigInt::from(99));
        assert_eq!(ctx.min_val_div10(), &BigInt::from(-99));
        assert_eq!(ctx.max_bytes(), 2);

        ctx.set_max_digits(5).unwrap();
        assert_eq!(ctx.max_val(), &BigInt::from(99_999));
        assert!(ctx.in_range(&BigInt::from(-99_999)));
        assert!(!ctx.in_range(&BigInt::from(100_000)));
    }

    #[test]
    fn test_rejects_small_budget() {
        let result = CalculationContext::new(CancellationToken::new(), 1);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
