use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const WIDE: &str = "\
Country,Gas Type,Industry,2010,2011
Asia,Carbon dioxide,Mining,1,2
Europe,Carbon dioxide,Mining,3,
Eastern Asia,Greenhouse gas,Mining,4,5
";

fn data_file(dir: &TempDir) -> PathBuf {
    let p = dir.path().join("emissions.csv");
    fs::write(&p, WIDE).unwrap();
    p
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("ghg").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("heatmap"))
        .stdout(predicate::str::contains("animate"));
}

#[test]
fn info_lists_years_and_gases() {
    let dir = TempDir::new().unwrap();
    let data = data_file(&dir);
    let mut cmd = Command::cargo_bin("ghg").unwrap();
    cmd.arg("--data").arg(&data).arg("info");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("years: 2010-2011"))
        .stdout(predicate::str::contains("Carbon dioxide, Greenhouse gas"));
}

#[test]
fn stats_prints_one_line_per_group() {
    let dir = TempDir::new().unwrap();
    let data = data_file(&dir);
    let mut cmd = Command::cargo_bin("ghg").unwrap();
    cmd.args(["stats", "--data"]).arg(&data);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Europe | Carbon dioxide"))
        .stdout(predicate::str::contains("missing=1"));
}

#[test]
fn export_json() {
    let dir = TempDir::new().unwrap();
    let data = data_file(&dir);
    let out = dir.path().join("tidy.json");
    let mut cmd = Command::cargo_bin("ghg").unwrap();
    cmd.arg("--data").arg(&data).arg("export").arg("--out").arg(&out);
    cmd.assert().success();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 6);
}

#[test]
fn heatmap_for_a_missing_year_fails() {
    let dir = TempDir::new().unwrap();
    let data = data_file(&dir);
    let out = dir.path().join("heat.svg");
    let mut cmd = Command::cargo_bin("ghg").unwrap();
    cmd.arg("--data")
        .arg(&data)
        .args(["heatmap", "--year", "1999", "--out"])
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("1999"));
}

#[test]
fn animate_writes_one_frame_per_year() {
    let dir = TempDir::new().unwrap();
    let data = data_file(&dir);
    let frames = dir.path().join("frames");
    let mut cmd = Command::cargo_bin("ghg").unwrap();
    cmd.arg("--data")
        .arg(&data)
        .args(["animate", "--chart", "asia-bar", "--out-dir"])
        .arg(&frames);
    cmd.assert().success();
    assert!(frames.join("frame_000_2010.svg").exists());
    assert!(frames.join("frame_001_2011.svg").exists());
}

#[test]
fn missing_data_file_is_reported() {
    let mut cmd = Command::cargo_bin("ghg").unwrap();
    cmd.args(["--data", "/no/such/file.csv", "info"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("/no/such/file.csv"));
}
