//! End-to-end harness tests: generate fixtures, then query and verify them
//! through the same entry point the binary uses.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use clap::Parser;
use lineseek::SearchError;
use lineseek_cli::{Cli, HarnessError, run};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

fn execute(args: &[&str]) -> (Result<(), HarnessError>, String) {
    let cli = Cli::try_parse_from(std::iter::once("lineseek").chain(args.iter().copied()))
        .expect("Failed to parse arguments");
    let mut out = Vec::new();
    let result = run(&cli.command, &mut out);
    (result, String::from_utf8(out).expect("Output is not UTF-8"))
}

fn generate(dir: &TempDir, name: &str, extra: &[&str]) -> String {
    let path = dir.path().join(name);
    let path = path.to_str().unwrap().to_string();
    let mut args = vec!["generate", path.as_str(), "--seed", "11"];
    args.extend_from_slice(extra);
    let (result, _) = execute(&args);
    result.unwrap();
    path
}

fn first_line(path: &str) -> String {
    std::fs::read_to_string(Path::new(path))
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string()
}

#[test]
fn test_generate_then_verify_unique() {
    let dir = TempDir::new().unwrap();
    let path = generate(&dir, "unique.txt", &["--records", "2000"]);

    let (result, out) = execute(&["verify", path.as_str()]);
    result.unwrap();
    assert!(out.ends_with("2000 lines, 2000 keys, 100 ranges, 0 mismatches\n"), "{out}");
}

#[test]
fn test_generate_then_verify_non_unique() {
    let dir = TempDir::new().unwrap();
    let path = generate(&dir, "dups.txt", &["--records", "1000", "--non-unique"]);

    let (result, out) = execute(&["verify", path.as_str(), "--non-unique", "--windows", "50"]);
    result.unwrap();
    assert!(out.contains("1000 keys"), "{out}");
    assert!(out.ends_with("0 mismatches\n"), "{out}");
}

#[test]
fn test_find_and_between() {
    let dir = TempDir::new().unwrap();
    let path = generate(&dir, "data.txt", &["--records", "300"]);
    let line = first_line(&path);
    let (key, value) = line.split_once(':').unwrap();

    let (result, out) = execute(&["find", path.as_str(), key]);
    result.unwrap();
    assert_eq!(out, format!("{value}\n"));

    let (result, out) = execute(&["find", path.as_str(), key, "--json"]);
    result.unwrap();
    let record: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(record["key"], key.parse::<i64>().unwrap());
    assert_eq!(record["value"], value);

    let (result, out) = execute(&["between", path.as_str(), "0", key]);
    result.unwrap();
    assert_eq!(out, format!("{line}\n"));
}

#[test]
fn test_find_missing_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gaps.txt");
    std::fs::write(&path, "10:a\n20:b\n30:c\n").unwrap();
    let path = path.to_str().unwrap();

    let (result, out) = execute(&["find", path, "25"]);
    assert!(matches!(
        result,
        Err(HarnessError::Search(SearchError::NotFound { .. }))
    ));
    assert!(out.is_empty());

    let (result, out) = execute(&["find", path, "25", "--non-unique"]);
    assert!(matches!(
        result,
        Err(HarnessError::Search(SearchError::NotFound { key })) if key == "25"
    ));
    assert!(out.is_empty());
}

#[test]
fn test_missing_file_reported_on_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.txt");

    let (result, out) = execute(&["find", path.to_str().unwrap(), "1"]);
    assert!(matches!(
        result,
        Err(HarnessError::Search(SearchError::Open { path: failed, .. })) if failed == path
    ));
    assert!(out.is_empty());
}

#[test]
fn test_bounds_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bounds.txt");
    std::fs::write(&path, "10:a\n20:b\n30:c\n\n").unwrap();
    let path = path.to_str().unwrap();

    let (result, out) = execute(&["bounds", path]);
    result.unwrap();
    assert_eq!(out, "min: 10:a\nmax: 30:c\nfile size: 15\n");

    let (result, out) = execute(&["bounds", path, "--json"]);
    result.unwrap();
    let bounds: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(bounds["min"]["key"], 10);
    assert_eq!(bounds["max"]["value"], "c");
    assert_eq!(bounds["file_size"], 15);
}

#[test]
fn test_string_keys_and_separator() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("words.txt");
    std::fs::write(&path, "apple=red\nbanana=yellow\ncherry=dark red\n").unwrap();
    let path = path.to_str().unwrap();

    let (result, out) = execute(&[
        "between",
        path,
        "b",
        "d",
        "--key-type",
        "string",
        "--separator",
        "=",
    ]);
    result.unwrap();
    assert_eq!(out, "banana=yellow\ncherry=dark red\n");
}

#[test]
fn test_invalid_int_key() {
    let dir = TempDir::new().unwrap();
    let path = generate(&dir, "data.txt", &["--records", "10"]);

    let (result, _) = execute(&["find", path.as_str(), "ten"]);
    assert!(matches!(
        result,
        Err(HarnessError::InvalidKey { key_type: "int", .. })
    ));
}

#[test]
fn test_verify_reports_unsorted_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unsorted.txt");
    std::fs::write(&path, "5:a\n1:b\n2:c\n9:d\n").unwrap();

    let (result, out) = execute(&["verify", path.to_str().unwrap()]);
    assert!(matches!(
        result,
        Err(HarnessError::VerificationFailed { .. })
    ));
    assert!(out.contains("MISMATCH find 1"), "{out}");
}
