use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opzioni di generazione del piano mensile.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOptions {
    /// Persona -> stanze che non deve ricevere nella prima settimana.
    pub excluded_first_week: BTreeMap<String, Vec<String>>,
    /// Ordine di elaborazione delle stanze nella prima settimana.
    pub priority_first_week: Vec<String>,
    pub grouping: GroupingOptions,
}

impl ScheduleOptions {
    pub fn is_excluded(&self, name: &str, room: &str) -> bool {
        self.excluded_first_week
            .get(name)
            .is_some_and(|rooms| rooms.iter().any(|r| r == room))
    }
}

/// Raggruppamento stanze per le settimane a tre partecipanti.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingOptions {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub groups: Vec<RoomGroup>,
}

/// Gruppo di stanze pulite insieme dalla stessa persona nello stesso giorno.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomGroup {
    pub name: String,
    pub rooms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid year/month: {year}-{month:02}")]
    InvalidDate { year: i32, month: u32 },
    #[error("at least two people are required, got {0}")]
    InsufficientPeople(usize),
    #[error("duplicate person name: {0}")]
    DuplicatePerson(String),
    #[error("room set cannot be empty")]
    NoRooms,
}
