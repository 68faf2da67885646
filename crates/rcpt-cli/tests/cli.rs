use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const RECEIPT: &str = "\
CORNER SHOP
2 x Milk £1.50
Bread
£1.20
Fresh Bananas
TOTAL £4.20
VISA £4.20
THANK YOU
";

fn rcpt() -> Command {
    Command::cargo_bin("rcpt").unwrap()
}

#[test]
fn parse_file_to_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("receipt.txt");
    fs::write(&input, RECEIPT).unwrap();

    let output = rcpt().arg("parse").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["name"], "Milk");
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["price"], 1.5);
    assert_eq!(items[2]["price"], 0.0);
    assert_eq!(json["total"]["value"], 4.2);
    assert!(json.get("skipped").is_none());
}

#[test]
fn parse_stdin_to_csv() {
    rcpt()
        .args(["parse", "-", "--format", "csv"])
        .write_stdin("Apple £0.50\nApple £0.50\n")
        .assert()
        .success()
        .stdout("name,quantity,price,line_total\nApple,1,0.50,0.50\n");
}

#[test]
fn parse_without_dedup() {
    rcpt()
        .args(["parse", "-", "--format", "csv", "--no-dedup"])
        .write_stdin("Apple £0.50\nApple £0.50\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Apple,1,0.50,0.50\nApple,1,0.50,0.50\n"));
}

#[test]
fn parse_reports_mismatch_on_stderr() {
    rcpt()
        .args(["parse", "-", "--format", "text"])
        .write_stdin("Milk £1.50\nTOTAL £9.00\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Milk"))
        .stderr(predicate::str::contains("differs from receipt total 9.00"));
}

#[test]
fn parse_missing_file_fails() {
    rcpt()
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn lines_lists_and_selects() {
    rcpt()
        .args(["lines", "-"])
        .write_stdin(RECEIPT)
        .assert()
        .success()
        .stdout("  1  2 x Milk £1.50\n  2  Bread\n  3  £1.20\n  4  Fresh Bananas\n");

    rcpt()
        .args(["lines", "-", "--select", "2,3", "--format", "csv"])
        .write_stdin(RECEIPT)
        .assert()
        .success()
        .stdout("name,quantity,price,line_total\nBread,1,1.20,1.20\n");
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir_all(&input_dir).unwrap();
    fs::write(input_dir.join("a.txt"), RECEIPT).unwrap();
    fs::write(input_dir.join("b.txt"), "Apple £0.50\n").unwrap();
    fs::write(input_dir.join("ignored.jpg"), "binary").unwrap();

    let pattern = format!("{}/*", input_dir.display());
    rcpt()
        .args(["batch", &pattern, "--summary", "-j", "2", "-o"])
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(output_dir.join("a.json").exists());
    assert!(output_dir.join("b.json").exists());

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,items"));
    assert!(summary.contains("b.txt,success,1,0,0.50"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = tempdir().unwrap();
    let pattern = format!("{}/*.txt", dir.path().display());

    rcpt()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_set_get_and_locale() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    let config_arg = config.to_str().unwrap();

    rcpt()
        .args(["config", "init", "-c", config_arg])
        .assert()
        .success();

    rcpt()
        .args(["config", "set", "locale.decimal_separator", ",", "-c", config_arg])
        .assert()
        .success();
    rcpt()
        .args(["config", "set", "locale.currency_symbols", "[\"€\"]", "-c", config_arg])
        .assert()
        .success();

    rcpt()
        .args(["config", "get", "locale.decimal_separator", "-c", config_arg])
        .assert()
        .success()
        .stdout("\",\"\n");

    rcpt()
        .args(["parse", "-", "--format", "csv", "-c", config_arg])
        .write_stdin("Brot 1,20 €\n")
        .assert()
        .success()
        .stdout("name,quantity,price,line_total\nBrot,1,1.20,1.20\n");
}

#[test]
fn config_set_unknown_key_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");

    rcpt()
        .args(["config", "set", "parser.nope", "1", "-c", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
