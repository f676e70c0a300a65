use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::{Finite, Fraction};
use crate::utilities::{compare, ten};

/// Equality compares values: `1/2` equals `5e-1`. `Undefined` equals itself.
impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Normal(a), Self::Normal(b)) => compare(&a.to_nde(), &b.to_nde()) == Ordering::Equal,
            (Self::Undefined, Self::Undefined)
            | (Self::NegativeInfinity, Self::NegativeInfinity)
            | (Self::PositiveInfinity, Self::PositiveInfinity) => true,
            _ => false,
        }
    }
}

impl Eq for Fraction {}

/// `-Infinity < finite < +Infinity`; `Undefined` is unordered against everything
/// but itself
impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let rank = |f: &Self| match f {
            Self::NegativeInfinity => Some(0),
            Self::Normal(_) => Some(1),
            Self::PositiveInfinity => Some(2),
            Self::Undefined => None,
        };

        match (self, other) {
            (Self::Undefined, Self::Undefined) => Some(Ordering::Equal),
            (Self::Normal(a), Self::Normal(b)) => Some(compare(&a.to_nde(), &b.to_nde())),
            _ => Some(rank(self)?.cmp(&rank(other)?)),
        }
    }
}

impl Hash for Fraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Undefined => 0u8.hash(state),
            Self::NegativeInfinity => 1u8.hash(state),
            Self::PositiveInfinity => 2u8.hash(state),
            Self::Normal(f) => {
                3u8.hash(state);
                canonical_parts(f).hash(state);
            }
        }
    }
}

/// The unique `(n, d, e)` of a value with `gcd(n, d) = 1`, `10 ∤ n` and `d` coprime
/// to ten. Equal values always produce equal triples.
fn canonical_parts(f: &Finite) -> (BigInt, BigInt, BigInt) {
    if f.n.is_zero() {
        return (BigInt::zero(), BigInt::one(), BigInt::zero());
    }

    let two = BigInt::from(2);
    let five = BigInt::from(5);

    // d = 2^a * 5^b * rest
    let (rest, twos) = strip_factor(&f.d, &two);
    let (rest, fives) = strip_factor(&rest, &five);

    // scale so the power-of-ten part of d moves into e
    let k = twos.max(fives);
    let mut n = f.n.clone() * two.pow(k - twos) * five.pow(k - fives);
    let mut e = &f.e - BigInt::from(k);

    let ten = ten();
    loop {
        let (q, r) = n.div_rem(&ten);
        if !r.is_zero() {
            break;
        }
        n = q;
        e += 1;
    }

    let gcd = n.abs().gcd(&rest);

    (n / &gcd, rest / gcd, e)
}

fn strip_factor(x: &BigInt, factor: &BigInt) -> (BigInt, u32) {
    let mut x = x.clone();
    let mut count = 0;
    loop {
        let (q, r) = x.div_rem(factor);
        if !r.is_zero() {
            return (x, count);
        }
        x = q;
        count += 1;
    }
}
