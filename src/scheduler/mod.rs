mod calendar;
mod engine;
mod grouping;
mod scoring;
mod types;

pub use calendar::month_weeks;
pub use types::{GroupingOptions, RoomGroup, SchedError, ScheduleOptions};

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::model::{
    MonthSchedule, Person, ScheduleEntry, SchedulingState, WeekWindow, STANZE_DEFAULT,
};

/// Scheduler: incapsula l'insieme di stanze da coprire ogni settimana.
#[derive(Debug, Clone)]
pub struct Scheduler {
    rooms: Vec<String>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(STANZE_DEFAULT.iter().map(|r| r.to_string()).collect())
    }
}

impl Scheduler {
    pub fn new(rooms: Vec<String>) -> Self {
        Self { rooms }
    }

    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }

    /// Genera il piano del mese. Deterministico: stesso input, stesso piano.
    ///
    /// Ogni settimana viene coperta dal motore a due passaggi oppure, se i
    /// partecipanti sono esattamente tre e il raggruppamento produce tre
    /// unità, dal passaggio per unità. Le stanze senza candidati diventano
    /// voci scoperte, non errori.
    pub fn generate(
        &self,
        people: &[Person],
        year: i32,
        month: u32,
        opts: &ScheduleOptions,
    ) -> Result<MonthSchedule, SchedError> {
        if self.rooms.is_empty() {
            return Err(SchedError::NoRooms);
        }
        if people.len() < 2 {
            return Err(SchedError::InsufficientPeople(people.len()));
        }
        let mut seen = BTreeSet::new();
        for p in people {
            if !seen.insert(p.name()) {
                return Err(SchedError::DuplicatePerson(p.name().to_string()));
            }
        }

        let weeks = calendar::month_weeks(year, month)?;
        let mut state = SchedulingState::new(people, &self.rooms);
        let units = grouping::build_units(&self.rooms, &opts.grouping);
        let first_week_order = normalize_priority(&self.rooms, &opts.priority_first_week);

        for week in &weeks {
            let participants = participants_of(&state, week);
            debug!(
                settimana = week.number,
                partecipanti = participants.len(),
                "elaborazione settimana"
            );
            if participants.is_empty() {
                warn!(settimana = week.number, "nessun partecipante disponibile");
                continue;
            }
            if participants.len() == 3 && units.len() == 3 {
                grouping::assign_week(&mut state, week, &participants, &units, opts);
            } else {
                let room_order: &[String] = if week.number == 1 {
                    &first_week_order
                } else {
                    &self.rooms
                };
                engine::assign_week(&mut state, week, &participants, room_order, opts);
            }
        }

        let entries = build_entries(&state, &weeks, &self.rooms);
        Ok(MonthSchedule {
            year,
            month,
            weeks,
            entries,
        })
    }
}

/// Indici delle persone con almeno un giorno libero nella settimana.
fn participants_of(state: &SchedulingState, week: &WeekWindow) -> Vec<usize> {
    (0..state.people().len())
        .filter(|&i| !state.people()[i].available_days_in(week).is_empty())
        .collect()
}

/// Ordine delle stanze per la prima settimana: prima le priorità valide
/// nell'ordine dato, poi le stanze restanti nell'ordine di input. I nomi
/// ignoti vengono ignorati.
fn normalize_priority(rooms: &[String], priority: &[String]) -> Vec<String> {
    let mut order: Vec<String> = Vec::with_capacity(rooms.len());
    for room in priority {
        if rooms.contains(room) && !order.contains(room) {
            order.push(room.clone());
        }
    }
    for room in rooms {
        if !order.contains(room) {
            order.push(room.clone());
        }
    }
    order
}

/// Materializza una voce per ogni coppia (settimana, stanza), comprese le
/// stanze scoperte (persona assente, data convenzionale = inizio settimana).
fn build_entries(
    state: &SchedulingState,
    weeks: &[WeekWindow],
    rooms: &[String],
) -> Vec<ScheduleEntry> {
    let mut entries = Vec::with_capacity(weeks.len() * rooms.len());
    for week in weeks {
        for room in rooms {
            let entry = match state.assignment_for(week.number, room) {
                Some(a) => ScheduleEntry {
                    week_number: week.number,
                    week_start: week.start,
                    week_end: week.end,
                    room: room.clone(),
                    person: Some(a.person.as_str().to_string()),
                    date: a.date,
                    group: a.group.clone(),
                },
                None => {
                    warn!(settimana = week.number, stanza = %room, "stanza scoperta");
                    ScheduleEntry {
                        week_number: week.number,
                        week_start: week.start,
                        week_end: week.end,
                        room: room.clone(),
                        person: None,
                        date: week.start,
                        group: None,
                    }
                }
            };
            entries.push(entry);
        }
    }
    entries
}
