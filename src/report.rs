use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::Datelike;

use crate::model::{MonthSchedule, GIORNI_SETTIMANA};

/// Statistiche di distribuzione di un piano mensile.
#[derive(Debug, Clone)]
pub struct DistributionReport {
    pub month_label: String,
    pub rooms: Vec<String>,
    pub people: Vec<PersonDistribution>,
    /// Conteggi per giorno, da lunedì a domenica.
    pub weekdays: [u32; 7],
    pub gaps: Vec<GapEntry>,
    pub min_load: u32,
    pub max_load: u32,
}

impl DistributionReport {
    /// Vero se lo scarto tra carichi totali non supera 1.
    pub fn is_balanced(&self) -> bool {
        self.max_load - self.min_load <= 1
    }
}

/// Carico e varietà di una singola persona.
#[derive(Debug, Clone)]
pub struct PersonDistribution {
    pub name: String,
    pub total: u32,
    pub rooms: Vec<String>,
}

/// Stanza rimasta scoperta in una settimana.
#[derive(Debug, Clone)]
pub struct GapEntry {
    pub week_number: u32,
    pub room: String,
}

/// Permette di variare il formato del report (testo, futuri canali).
pub trait ReportRenderer {
    fn render(&self, report: &DistributionReport) -> String;
}

/// Resa testuale semplice per il terminale.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn render(&self, report: &DistributionReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Turni di {}", report.month_label);
        let _ = writeln!(out);
        let _ = writeln!(out, "Per persona:");
        for person in &report.people {
            let _ = writeln!(
                out,
                "  {}: {} turni ({}/{} stanze)",
                person.name,
                person.total,
                person.rooms.len(),
                report.rooms.len()
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Per giorno:");
        for (giorno, count) in GIORNI_SETTIMANA.iter().zip(report.weekdays.iter()) {
            let _ = writeln!(out, "  {giorno}: {count}");
        }
        let _ = writeln!(out);
        if report.gaps.is_empty() {
            let _ = writeln!(out, "Stanze scoperte: nessuna");
        } else {
            let _ = writeln!(out, "Stanze scoperte:");
            for gap in &report.gaps {
                let _ = writeln!(out, "  Settimana {}: {}", gap.week_number, gap.room);
            }
        }
        let _ = writeln!(out);
        if report.is_balanced() {
            let _ = writeln!(
                out,
                "Distribuzione bilanciata (scarto {}).",
                report.max_load - report.min_load
            );
        } else {
            let _ = writeln!(
                out,
                "ATTENZIONE: distribuzione sbilanciata (scarto {}).",
                report.max_load - report.min_load
            );
        }
        out
    }
}

/// Calcola le statistiche del piano per le persone indicate (in ordine di
/// input); chi non compare nel piano figura con zero turni.
pub fn prepare_report(schedule: &MonthSchedule, people: &[String]) -> DistributionReport {
    let mut totals: BTreeMap<&str, u32> = people.iter().map(|p| (p.as_str(), 0)).collect();
    let mut rooms_by_person: BTreeMap<&str, Vec<String>> =
        people.iter().map(|p| (p.as_str(), Vec::new())).collect();
    let mut weekdays = [0u32; 7];
    let mut gaps = Vec::new();
    let mut rooms: Vec<String> = Vec::new();

    for entry in &schedule.entries {
        if !rooms.contains(&entry.room) {
            rooms.push(entry.room.clone());
        }
        match &entry.person {
            Some(name) => {
                if let Some(total) = totals.get_mut(name.as_str()) {
                    *total += 1;
                }
                if let Some(seen) = rooms_by_person.get_mut(name.as_str()) {
                    if !seen.contains(&entry.room) {
                        seen.push(entry.room.clone());
                    }
                }
                weekdays[entry.date.weekday().num_days_from_monday() as usize] += 1;
            }
            None => gaps.push(GapEntry {
                week_number: entry.week_number,
                room: entry.room.clone(),
            }),
        }
    }

    let people: Vec<PersonDistribution> = people
        .iter()
        .map(|name| PersonDistribution {
            name: name.clone(),
            total: totals.get(name.as_str()).copied().unwrap_or(0),
            rooms: rooms_by_person.remove(name.as_str()).unwrap_or_default(),
        })
        .collect();

    let min_load = people.iter().map(|p| p.total).min().unwrap_or(0);
    let max_load = people.iter().map(|p| p.total).max().unwrap_or(0);

    DistributionReport {
        month_label: schedule.month_label(),
        rooms,
        people,
        weekdays,
        gaps,
        min_load,
        max_load,
    }
}
