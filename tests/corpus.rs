use std::fs;
use std::path::{Path, PathBuf};

use repeating_decimals::config::Settings;
use repeating_decimals::parse;
use repeating_decimals::report::evaluate;
use repeating_decimals::{CancellationToken, to_decimal_string, to_rational_string};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TestCase {
    input: String,
    #[serde(default)]
    decimal: Option<String>,
    rational: String,
    note: String,
}

#[derive(Debug, Deserialize)]
struct TestCases {
    cases: Vec<TestCase>,
}

fn load_cases() -> TestCases {
    let json_path: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("corpus.json");

    let json_content = fs::read_to_string(&json_path)
        .unwrap_or_else(|e| panic!("Failed to read JSON file {}: {}", json_path.display(), e));

    serde_json::from_str(&json_content)
        .unwrap_or_else(|e| panic!("Failed to parse JSON file {}: {}", json_path.display(), e))
}

fn run_test_case(case: &TestCase, settings: &Settings) -> Result<(), String> {
    let cancel = CancellationToken::new();
    let report = evaluate(&case.input, settings, &cancel)
        .map_err(|e| format!("\n✗ Evaluation failed for \"{}\": {}", case.input, e))?;

    let mismatch = |what: &str, expected: &str, actual: &str| {
        format!(
            "\n✗ Mismatch for input: \"{}\" ({what})\nExpected:   \"{expected}\"\nActual:     \"{actual}\"",
            case.input
        )
    };

    if let Some(decimal) = &case.decimal {
        if &report.decimal != decimal {
            return Err(mismatch("decimal", decimal, &report.decimal));
        }
    }
    if report.rational != case.rational {
        return Err(mismatch("rational", &case.rational, &report.rational));
    }
    let note = report.note.to_string();
    if note != case.note {
        return Err(mismatch("note", &case.note, &note));
    }

    Ok(())
}

#[test]
fn test_corpus() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let test_suite = load_cases();
    let settings = Settings::default();
    let mut failed = 0;

    for (i, case) in test_suite.cases.iter().enumerate() {
        if let Err(msg) = run_test_case(case, &settings) {
            failed += 1;
            eprintln!("\n[Case {}] {}", i + 1, msg);
        }
    }

    assert_eq!(failed, 0, "{failed} of {} corpus cases failed", test_suite.cases.len());
}

#[test]
fn test_corpus_round_trip() {
    let cancel = CancellationToken::new();

    for case in load_cases().cases {
        let value = parse(&case.input).unwrap();
        if !value.is_normal() {
            continue;
        }

        let decimal = to_decimal_string(&value, 1000, &cancel).unwrap();
        assert_eq!(parse(&decimal).unwrap(), value, "{} -> {decimal}", case.input);

        let rational = to_rational_string(&value, 1000, &cancel).unwrap();
        assert_eq!(parse(&rational).unwrap(), value, "{} -> {rational}", case.input);
    }
}
