#![forbid(unsafe_code)]
use std::fs;

use assert_cmd::Command;
use chrono::NaiveDate;
use predicates::prelude::*;
use turnario::{export_plan_json, AbsencePeriod, PlanConfig};

#[test]
fn init_writes_a_sample_plan() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("piano.json");

    cli()
        .args(["init", "--out", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Piano di esempio"));

    let text = fs::read_to_string(&out).unwrap();
    let plan: PlanConfig = serde_json::from_str(&text).unwrap();
    assert!(plan.people.contains(&"Anna".to_string()));
}

#[test]
fn weeks_prints_monday_aligned_windows() {
    cli()
        .args(["weeks", "--year", "2021", "--month", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settimana 1: 01/02 - 07/02"))
        .stdout(predicate::str::contains("Settimana 4: 22/02 - 28/02"));
}

#[test]
fn generate_writes_outputs_and_reports_success() {
    let dir = tempfile::tempdir().unwrap();
    let plan_path = dir.path().join("piano.json");
    let csv_path = dir.path().join("turni.csv");
    export_plan_json(&plan_path, &fixed_plan()).unwrap();

    cli()
        .args([
            "generate",
            "--plan",
            plan_path.to_str().unwrap(),
            "--out-csv",
            csv_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: tutte le stanze assegnate"))
        .stdout(predicate::str::contains("Anna"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("settimana,periodo,stanza,persona,data,giorno,gruppo"));
}

#[test]
fn generate_flags_uncovered_rooms_with_exit_code_two() {
    let dir = tempfile::tempdir().unwrap();
    let plan_path = dir.path().join("piano.json");

    let mut plan = fixed_plan();
    let everyone = plan.people.clone();
    for name in everyone {
        plan.absences.insert(
            name,
            vec![AbsencePeriod::new(d(2021, 2, 8), d(2021, 2, 14)).unwrap()],
        );
    }
    export_plan_json(&plan_path, &plan).unwrap();

    cli()
        .args(["generate", "--plan", plan_path.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("scoperte"));
}

#[test]
fn generate_reads_people_from_csv_override() {
    let dir = tempfile::tempdir().unwrap();
    let plan_path = dir.path().join("piano.json");
    let people_path = dir.path().join("persone.csv");
    export_plan_json(&plan_path, &fixed_plan()).unwrap();
    fs::write(&people_path, "name,absences\nRita,\nPaolo,\n").unwrap();

    cli()
        .args([
            "generate",
            "--plan",
            plan_path.to_str().unwrap(),
            "--people-csv",
            people_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rita"));
}

#[test]
fn report_prints_the_distribution() {
    let dir = tempfile::tempdir().unwrap();
    let plan_path = dir.path().join("piano.json");
    export_plan_json(&plan_path, &fixed_plan()).unwrap();

    cli()
        .args(["report", "--plan", plan_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Turni di Febbraio 2021"))
        .stdout(predicate::str::contains("Anna: 4 turni (4/4 stanze)"));
}

fn cli() -> Command {
    Command::cargo_bin("turnario-cli").unwrap()
}

// February 2021 starts on a Monday, which keeps the expectations readable
fn fixed_plan() -> PlanConfig {
    let mut plan = PlanConfig::sample();
    plan.year = 2021;
    plan.month = 2;
    plan
}

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
