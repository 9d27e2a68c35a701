use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::io;
use crate::model::{AbsencePeriod, Person, PERSONE_DEFAULT, STANZE_DEFAULT};
use crate::scheduler::{GroupingOptions, RoomGroup, ScheduleOptions};

/// Configurazione completa di un piano mensile, caricata da JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    pub year: i32,
    pub month: u32,
    #[serde(default = "default_rooms")]
    pub rooms: Vec<String>,
    pub people: Vec<String>,
    /// Persona -> periodi di assenza nel mese.
    #[serde(default)]
    pub absences: BTreeMap<String, Vec<AbsencePeriod>>,
    /// Persona -> stanze escluse nella prima settimana.
    #[serde(default)]
    pub excluded_first_week: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub priority_first_week: Vec<String>,
    #[serde(default)]
    pub room_groups: GroupingOptions,
}

impl PlanConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            bail!("month must be between 1 and 12, got {}", self.month);
        }
        if NaiveDate::from_ymd_opt(self.year, self.month, 1).is_none() {
            bail!("invalid year/month: {}-{:02}", self.year, self.month);
        }
        if self.people.len() < 2 {
            bail!("at least two people are required");
        }
        for (i, name) in self.people.iter().enumerate() {
            if name.trim().is_empty() {
                bail!("person name cannot be empty");
            }
            if self.people[..i].contains(name) {
                bail!("duplicate person name: {name}");
            }
        }
        if self.rooms.is_empty() {
            bail!("room list cannot be empty");
        }
        for (i, room) in self.rooms.iter().enumerate() {
            if room.trim().is_empty() {
                bail!("room name cannot be empty");
            }
            if self.rooms[..i].contains(room) {
                bail!("duplicate room name: {room}");
            }
        }
        for (name, periods) in &self.absences {
            if !self.people.contains(name) {
                bail!("absences refer to unknown person: {name}");
            }
            for period in periods {
                if period.end < period.start {
                    bail!("absence end precedes start for {name}");
                }
            }
        }
        for name in self.excluded_first_week.keys() {
            if !self.people.contains(name) {
                bail!("first-week exclusions refer to unknown person: {name}");
            }
        }
        // stanze ignote in priorità, esclusioni o gruppi: ignorate a valle
        Ok(())
    }

    /// Piano di esempio sul mese corrente, con un gruppo dimostrativo spento.
    pub fn sample() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
            rooms: default_rooms(),
            people: PERSONE_DEFAULT.iter().map(|p| p.to_string()).collect(),
            absences: BTreeMap::new(),
            excluded_first_week: BTreeMap::new(),
            priority_first_week: Vec::new(),
            room_groups: GroupingOptions {
                enabled: false,
                groups: vec![RoomGroup {
                    name: "Zona giorno".to_string(),
                    rooms: vec!["Cucina".to_string(), "Veranda".to_string()],
                    description: Some(
                        "Cucina e veranda pulite insieme dalla stessa persona".to_string(),
                    ),
                }],
            },
        }
    }

    /// Costruisce le persone del run, con le assenze agganciate per nome.
    pub fn to_people(&self) -> Vec<Person> {
        self.people
            .iter()
            .map(|name| {
                let mut person = Person::new(name);
                if let Some(periods) = self.absences.get(name) {
                    for period in periods {
                        person.add_absence(period.clone());
                    }
                }
                person
            })
            .collect()
    }

    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            excluded_first_week: self.excluded_first_week.clone(),
            priority_first_week: self.priority_first_week.clone(),
            grouping: self.room_groups.clone(),
        }
    }
}

pub fn load_plan_from_file<P: AsRef<Path>>(path: P) -> Result<PlanConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading plan {}", path.display()))?;
    let plan: PlanConfig =
        serde_json::from_slice(&data).with_context(|| format!("parsing plan {}", path.display()))?;
    plan.validate()?;
    Ok(plan)
}

pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &PlanConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    io::write_atomic(path, json.as_bytes())
}

fn default_rooms() -> Vec<String> {
    STANZE_DEFAULT.iter().map(|r| r.to_string()).collect()
}
