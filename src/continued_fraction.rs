//! Continued fractions `[a0; a1, a2, ...]`
//!
//! Expansion of a rational into its terms, the convergent recurrence that rebuilds a
//! rational from terms, and negation of a term list.

use std::mem;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::fraction::Fraction;
use crate::utilities::{MAX_EXPANSION_EXPONENT, nde_to_nd_bounded};

/// Terms of `n / d`, produced lazily by Euclid's algorithm
///
/// Finite: the sequence ends when a remainder reaches zero.
#[derive(Debug, Clone)]
pub struct Expansion {
    n: BigInt,
    d: BigInt,
    done: bool,
}

impl Iterator for Expansion {
    type Item = BigInt;

    fn next(&mut self) -> Option<BigInt> {
        if self.done {
            return None;
        }

        let (q, r) = self.n.div_rem(&self.d);
        if r.is_zero() {
            self.done = true;
        } else {
            self.n = mem::replace(&mut self.d, r);
        }

        Some(q)
    }
}

/// Expand `n / d` into continued fraction terms
///
/// # Errors
/// [`Error::InvalidArgument`] for a negative numerator or a non-positive denominator.
pub fn expand(n: BigInt, d: BigInt) -> Result<Expansion> {
    if n.is_negative() {
        return Err(Error::invalid_argument("negative numerator"));
    }
    if !d.is_positive() {
        return Err(Error::invalid_argument("denominator must be positive"));
    }

    Ok(Expansion { n, d, done: false })
}

/// Successive convergents `(p_k, q_k)` of a term list
#[derive(Debug, Clone)]
pub struct Convergents<'a> {
    terms: &'a [BigInt],
    index: usize,
    previous: (BigInt, BigInt),
    current: (BigInt, BigInt),
}

impl Iterator for Convergents<'_> {
    type Item = (BigInt, BigInt);

    fn next(&mut self) -> Option<(BigInt, BigInt)> {
        let a = self.terms.get(self.index)?;

        // p_k = a_k * p_(k-1) + p_(k-2), likewise for q
        let next = (
            a * &self.current.0 + &self.previous.0,
            a * &self.current.1 + &self.previous.1,
        );
        self.previous = mem::replace(&mut self.current, next);
        self.index += 1;

        Some(self.current.clone())
    }
}

/// Convergents of `terms`; the last one is the value of the continued fraction
///
/// # Errors
/// [`Error::InvalidArgument`] for an empty term list.
pub fn convergents(terms: &[BigInt]) -> Result<Convergents<'_>> {
    if terms.is_empty() {
        return Err(Error::invalid_argument("empty continued fraction"));
    }

    // seeds: p_(-1) = 1, p_(-2) = 0, q_(-1) = 0, q_(-2) = 1
    Ok(Convergents {
        terms,
        index: 0,
        previous: (BigInt::zero(), BigInt::one()),
        current: (BigInt::one(), BigInt::zero()),
    })
}

/// Terms of `-x` given the regular terms of `x`
///
/// Uses `[a0; a1, a2, ...] -> [-a0-1; 1, a1-1, a2, ...]`, merging the `1` away when
/// `a1 == 1`.
pub fn negate(terms: &[BigInt]) -> Result<Vec<BigInt>> {
    let (a0, rest) = terms
        .split_first()
        .ok_or_else(|| Error::invalid_argument("empty continued fraction"))?;
    let new_a0 = -a0 - 1;

    let result = match rest {
        [] => vec![-a0],
        [a1] if a1.is_one() => vec![new_a0],
        [a1] => vec![new_a0, BigInt::one(), a1 - 1],
        [a1, a2, tail @ ..] if a1.is_one() => {
            let mut result = vec![new_a0, a2 + 1];
            result.extend_from_slice(tail);
            result
        }
        [a1, tail @ ..] => {
            let mut result = vec![new_a0, BigInt::one(), a1 - 1];
            result.extend_from_slice(tail);
            result
        }
    };

    Ok(result)
}

/// Value of a continued fraction, negated when `negative` is set
///
/// A zero final denominator gives the infinity of the numerator's sign, or
/// `Undefined` when the numerator is zero too.
pub fn to_fraction(cancel: &CancellationToken, terms: &[BigInt], negative: bool) -> Result<Fraction> {
    let mut last = None;
    for convergent in convergents(terms)? {
        cancel.check()?;
        last = Some(convergent);
    }
    let Some((n, d)) = last else {
        return Err(Error::invalid_argument("empty continued fraction"));
    };

    let fraction = if d.is_zero() {
        if n.is_negative() {
            Fraction::NegativeInfinity
        } else if n.is_positive() {
            Fraction::PositiveInfinity
        } else {
            Fraction::Undefined
        }
    } else if d.is_negative() {
        Fraction::new(-n, -d, 0)?
    } else {
        Fraction::new(n, d, 0)?
    };

    tracing::trace!(target: "continued_fraction", terms = terms.len(), "rebuilt from terms");

    Ok(if negative { -fraction } else { fraction })
}

impl Fraction {
    /// Regular continued fraction terms of a finite value
    ///
    /// The expansion is exact; it does not look at the approximation flag. Values
    /// whose decimal exponent exceeds [`MAX_EXPANSION_EXPONENT`] fail with
    /// [`Error::Overflow`].
    pub fn to_continued_fraction(&self, cancel: &CancellationToken) -> Result<Vec<BigInt>> {
        cancel.check()?;

        let nde = self
            .to_nde()
            .ok_or_else(|| Error::invalid_argument(format!("{self} has no continued fraction")))?;

        let (n, d) = nde_to_nd_bounded(cancel, &nde, MAX_EXPANSION_EXPONENT)?;
        let negative = n.is_negative();

        let mut terms = Vec::new();
        for term in expand(n.abs(), d)? {
            cancel.check()?;
            terms.push(term);
        }

        if negative {
            terms = negate(&terms)?;
            // a trailing 1 folds into the term before it
            if terms.len() > 1 && terms.last().is_some_and(One::is_one) {
                terms.pop();
                if let Some(last) = terms.last_mut() {
                    *last += 1;
                }
            }
        }

        Ok(terms)
    }
}
