#![forbid(unsafe_code)]
use std::fs;

use chrono::NaiveDate;
use turnario::io::{export_schedule_csv, export_schedule_json, import_people_csv};
use turnario::{
    export_plan_json, load_plan_from_file, AbsencePeriod, MonthSchedule, PlanConfig,
    ScheduleOptions, Scheduler,
};

#[test]
fn sample_plan_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("piano.json");

    let plan = PlanConfig::sample();
    plan.validate().unwrap();
    export_plan_json(&path, &plan).unwrap();

    let loaded = load_plan_from_file(&path).unwrap();
    assert_eq!(loaded, plan);
}

#[test]
fn plan_validation_rejects_bad_configs() {
    let mut plan = PlanConfig::sample();
    plan.month = 13;
    assert!(err_of(&plan).contains("month"));

    let mut plan = PlanConfig::sample();
    plan.people = vec!["Anna".to_string()];
    assert!(err_of(&plan).contains("two people"));

    let mut plan = PlanConfig::sample();
    plan.people.push("Anna".to_string());
    assert!(err_of(&plan).contains("duplicate person"));

    let mut plan = PlanConfig::sample();
    plan.rooms.push("Bagno".to_string());
    assert!(err_of(&plan).contains("duplicate room"));

    let mut plan = PlanConfig::sample();
    plan.absences.insert(
        "Sconosciuto".to_string(),
        vec![AbsencePeriod::new(d(2026, 2, 1), d(2026, 2, 2)).unwrap()],
    );
    assert!(err_of(&plan).contains("unknown person"));

    let mut plan = PlanConfig::sample();
    plan.absences.insert(
        "Anna".to_string(),
        vec![AbsencePeriod {
            start: d(2026, 2, 10),
            end: d(2026, 2, 1),
        }],
    );
    assert!(err_of(&plan).contains("precedes"));
}

#[test]
fn plan_absences_reach_the_people() {
    let mut plan = PlanConfig::sample();
    plan.year = 2021;
    plan.month = 2;
    plan.absences.insert(
        "Anna".to_string(),
        vec![AbsencePeriod::new(d(2021, 2, 8), d(2021, 2, 14)).unwrap()],
    );

    let people = plan.to_people();
    let anna = people.iter().find(|p| p.name() == "Anna").unwrap();
    assert!(!anna.is_available_on(d(2021, 2, 10)));
    assert!(anna.is_available_on(d(2021, 2, 15)));
}

#[test]
fn people_csv_import_parses_absence_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persone.csv");
    fs::write(
        &path,
        "name,absences\nAnna,2026-02-03..2026-02-05;2026-02-20\nMarco,\nLuca,2026-03-01/2026-03-02\n",
    )
    .unwrap();

    let people = import_people_csv(&path).unwrap();
    assert_eq!(people.len(), 3);

    let anna = &people[0];
    assert_eq!(anna.name(), "Anna");
    assert_eq!(anna.absences.len(), 2);
    assert_eq!(anna.absences[0].start, d(2026, 2, 3));
    assert_eq!(anna.absences[0].end, d(2026, 2, 5));
    // single dates collapse to a one-day period
    assert_eq!(anna.absences[1].start, anna.absences[1].end);

    assert!(people[1].absences.is_empty());
    assert_eq!(people[2].absences[0].end, d(2026, 3, 2));
}

#[test]
fn people_csv_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();

    let bad_date = dir.path().join("bad_date.csv");
    fs::write(&bad_date, "name,absences\nAnna,notadate\n").unwrap();
    assert!(import_people_csv(&bad_date).is_err());

    let empty_name = dir.path().join("empty_name.csv");
    fs::write(&empty_name, "name,absences\n,2026-02-03\n").unwrap();
    assert!(import_people_csv(&empty_name).is_err());
}

#[test]
fn schedule_csv_has_stable_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("turni.csv");

    let schedule = schedule_with_gap();
    export_schedule_csv(&path, &schedule).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "settimana,periodo,stanza,persona,data,giorno,gruppo"
    );
    assert_eq!(text.lines().count(), 17);
    // a gap keeps its row, with an empty person column
    assert!(text.contains("08/02 - 14/02,Bagno,,2021-02-08,"));
    assert!(text.contains("Anna"));
}

#[test]
fn schedule_json_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("turni.json");

    let schedule = schedule_with_gap();
    export_schedule_json(&path, &schedule).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let parsed: MonthSchedule = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, schedule);
}

fn schedule_with_gap() -> MonthSchedule {
    let mut plan = PlanConfig::sample();
    plan.year = 2021;
    plan.month = 2;
    for name in plan.people.clone() {
        plan.absences.insert(
            name,
            vec![AbsencePeriod::new(d(2021, 2, 8), d(2021, 2, 14)).unwrap()],
        );
    }
    Scheduler::new(plan.rooms.clone())
        .generate(&plan.to_people(), 2021, 2, &ScheduleOptions::default())
        .unwrap()
}

fn err_of(plan: &PlanConfig) -> String {
    plan.validate().unwrap_err().to_string()
}

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
