use repeating_decimals::formatter::{format_continued_fraction, to_float_string, to_rational_string};
use repeating_decimals::{CancellationToken, Error, parse};

fn decimal(text: &str, max_digits: usize) -> String {
    let value = parse(text).unwrap_or_else(|e| panic!("Failed to parse '{text}': {e}"));
    to_float_string(&CancellationToken::new(), &value, max_digits, false)
        .unwrap_or_else(|e| panic!("Failed to format '{text}': {e}"))
}

fn grouped(text: &str) -> String {
    let value = parse(text).unwrap();
    to_float_string(&CancellationToken::new(), &value, 1000, true).unwrap()
}

fn rational(text: &str, max_digits: usize) -> String {
    let value = parse(text).unwrap();
    to_rational_string(&CancellationToken::new(), &value, max_digits).unwrap()
}

#[test]
fn test_repeating_decimals() {
    assert_eq!(decimal("1/3", 1000), "0.(3)");
    assert_eq!(decimal("1/7", 1000), "0.(142857)");
    assert_eq!(decimal("1/6", 1000), "0.1(6)");
    assert_eq!(decimal("5/12", 1000), "0.41(6)");
    assert_eq!(decimal("-1/11", 1000), "-0.(09)");
    assert_eq!(decimal("100/7", 1000), "14.(285714)");
    assert_eq!(decimal("0.12(34)", 1000), "0.12(34)");
}

#[test]
fn test_terminating_decimals() {
    assert_eq!(decimal("1/4", 1000), "0.25");
    assert_eq!(decimal("1/2", 1000), "0.5");
    assert_eq!(decimal("3/8", 1000), "0.375");
    assert_eq!(decimal("-7/5", 1000), "-1.4");
    assert_eq!(decimal("12e3", 1000), "12000");
    assert_eq!(decimal("0.0001", 1000), "0.0001");
}

#[test]
fn test_repeating_block_absorbs_exponent() {
    assert_eq!(decimal("1/3e-2", 1000), "33.(3)");
    assert_eq!(decimal("1/7e-3", 1000), "142.(857142)");
}

#[test]
fn test_scientific_forms() {
    assert_eq!(decimal("1e-500", 100), "1e-500");
    assert_eq!(decimal("25e700", 100), "2.5e+701");
    assert_eq!(decimal("123456", 4), "≈1.235e+5");
}

#[test]
fn test_rounding_at_budget() {
    assert_eq!(decimal("2/7", 4), "≈0.2857");
    assert_eq!(decimal("2/3", 3), "0.(6)");
    assert_eq!(decimal("1/7", 4), "≈0.1429");
    assert_eq!(decimal("0.9999", 3), "≈1");
    assert_eq!(decimal("19.96", 3), "≈20");
}

#[test]
fn test_grouping() {
    assert_eq!(grouped("1234567.5"), "1\u{2009}234\u{2009}567.5");
    assert_eq!(grouped("123"), "123");
    assert_eq!(grouped("1000/3"), "333.(3)");
    assert_eq!(grouped("10000/3"), "3\u{2009}333.(3)");

    // grouped output parses back
    assert_eq!(parse(&grouped("1234567.5")).unwrap(), parse("1234567.5").unwrap());
}

#[test]
fn test_rational_text() {
    assert_eq!(rational("22/7", 100), "22/7");
    assert_eq!(rational("2.5", 100), "25/10");
    assert_eq!(rational("1e250", 100), "1e+250");
    assert_eq!(rational("123456789/7", 3), "≈123e+6/7");
    assert_eq!(rational("999.9", 3), "≈1e+3");
    assert_eq!(rational("undefined", 3), "Undefined");
    assert_eq!(rational("≈1/4", 10), "≈1/4");
}

#[test]
fn test_precision_too_small() {
    let value = parse("1/3").unwrap();
    let cancel = CancellationToken::new();

    assert!(matches!(to_float_string(&cancel, &value, 2, false), Err(Error::InvalidArgument(_))));
    assert!(matches!(to_rational_string(&cancel, &value, 0), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_continued_fraction_text() {
    let cancel = CancellationToken::new();
    let terms = parse("-7/3").unwrap().to_continued_fraction(&cancel).unwrap();

    assert_eq!(format_continued_fraction(&terms, 10).unwrap(), "[-3; 1, 2]");
}
