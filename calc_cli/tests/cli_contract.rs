use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;

fn calc(data_dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("calc_cli");
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

#[test]
fn convert_prints_summary() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["convert", "1", "mi", "km"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 mi = 1.61 km"));
}

#[test]
fn convert_temperature_accepts_negative_values() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["convert", "-40", "C", "F", "--kind", "temperature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-40 C = -40 F"));
}

#[test]
fn convert_emits_json_contract() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    let output = calc(temp.path())
        .args(["--json", "convert", "2", "kg", "g", "--kind", "weight"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: Value = serde_json::from_slice(&output).expect("stdout should contain valid json");
    assert_eq!(value["kind"], "Weight");
    assert_eq!(value["from"], "kg");
    assert!((value["result"].as_f64().unwrap() - 2000.0).abs() < 1e-9);
}

#[test]
fn malformed_value_is_no_result() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["convert", "abc", "m", "ft"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no result"));
}

#[test]
fn unknown_unit_fails() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["convert", "1", "furlong", "m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown unit 'furlong'"));
}

#[test]
fn units_lists_table() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["units", "area"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ha").and(predicate::str::contains("Hectare")));
}

#[test]
fn keys_persist_history() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["keys", "5", "+", "3", "="])
        .assert()
        .success()
        .stdout(predicate::str::diff("8\n"));

    assert!(temp.path().join("calculator-history.json").exists());

    calc(temp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 + 3 = 8"));

    calc(temp.path())
        .args(["history", "--clear"])
        .assert()
        .success();

    calc(temp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("no history"));
}

#[test]
fn divide_by_zero_shows_undefined() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["keys", "5/0="])
        .assert()
        .success()
        .stdout(predicate::str::contains("Undefined"));
}

#[test]
fn session_reads_stdin() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .arg("session")
        .write_stdin("12 + 7 =\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("19"));

    calc(temp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("12 + 7 = 19"));
}

#[test]
fn favorites_toggle_round_trip() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["favorites", "add", "paint-calculator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("paint-calculator"));

    calc(temp.path())
        .args(["favorites", "toggle", "paint-calculator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed from favorites"));

    calc(temp.path())
        .arg("favorites")
        .assert()
        .success()
        .stdout(predicate::str::contains("no favorites"));
}

#[test]
fn favorites_reject_unknown_ids() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["favorites", "add", "flux-capacitor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a known calculator"));
}

#[test]
fn open_records_recent() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path()).args(["open", "loan-calculator"]).assert().success();
    calc(temp.path()).args(["open", "paint-calculator"]).assert().success();

    let output = calc(temp.path())
        .args(["--json", "recent"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: Value = serde_json::from_slice(&output).expect("stdout should contain valid json");
    let ids: Vec<&str> = value.as_array().unwrap().iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["paint-calculator", "loan-calculator"]);
}

#[test]
fn search_matches_keywords() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["search", "mortgage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loan-calculator"));
}

#[test]
fn share_prints_text_and_link() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["share", "2", "x", "3", "="])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 × 3 = 6").and(predicate::str::contains("https://wa.me/?text=")));
}

#[test]
fn share_without_result_fails() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["share", "4", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to share"));
}

#[test]
fn loan_and_estimators() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["loan", "--principal", "200000", "--rate", "6", "--years", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1199.10"));

    calc(temp.path())
        .args(["paint", "--area", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cans: 4 x 5 L"));

    calc(temp.path())
        .args(["roofing", "--area", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bundles: 33"));

    calc(temp.path())
        .args(["paint", "--area", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input for 'area_m2'"));
}

#[test]
fn percent_of_and_change() {
    let temp = tempfile::tempdir().expect("temp dir should be created");

    calc(temp.path())
        .args(["percent", "of", "15", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("15% of 80 = 12"));

    calc(temp.path())
        .args(["percent", "change", "50", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("50 -> 75 = 50%"));

    calc(temp.path())
        .args(["percent", "change", "0", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Undefined result"));
}
