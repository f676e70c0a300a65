//! Input parsing module
//!
//! This module turns user text into values: decimal notation with an optional
//! repeating block, rational notation, continued fraction term lists and the named
//! constants. The main entry points are [`parse`] and [`parse_input`].

mod combinators;
mod input;
mod tokens;

pub use input::{Input, parse, parse_input};
