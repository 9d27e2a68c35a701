use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Giorni della settimana, da lunedì a domenica.
pub const GIORNI_SETTIMANA: [&str; 7] = [
    "Lunedì",
    "Martedì",
    "Mercoledì",
    "Giovedì",
    "Venerdì",
    "Sabato",
    "Domenica",
];

/// Nomi dei mesi, indice 0 = gennaio.
pub const MESI_ITALIANI: [&str; 12] = [
    "Gennaio",
    "Febbraio",
    "Marzo",
    "Aprile",
    "Maggio",
    "Giugno",
    "Luglio",
    "Agosto",
    "Settembre",
    "Ottobre",
    "Novembre",
    "Dicembre",
];

/// Stanze predefinite della casa.
pub const STANZE_DEFAULT: [&str; 4] = ["Bagno", "Cucina", "Veranda", "Corridoio"];

/// Persone predefinite per i piani di esempio.
pub const PERSONE_DEFAULT: [&str; 4] = ["Anna", "Marco", "Luca", "Sofia"];

/// Etichetta mostrata quando una stanza resta scoperta.
pub const NESSUNO_DISPONIBILE: &str = "Nessuno disponibile";

/// Nome italiano del giorno della settimana.
pub fn giorno(date: NaiveDate) -> &'static str {
    GIORNI_SETTIMANA[date.weekday().num_days_from_monday() as usize]
}

/// Nome italiano del mese (1 = gennaio), `None` se fuori da 1..=12.
pub fn mese(month: u32) -> Option<&'static str> {
    MESI_ITALIANI.get((month as usize).checked_sub(1)?).copied()
}

/// Identificatore forte per Person (il nome, unico all'interno di un run).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonId(String);

impl PersonId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Periodo di assenza di una persona (intervallo di giorni inclusivo [start, end]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsencePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AbsencePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err("absence end must not precede start".to_string());
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }
}

/// Persona che partecipa ai turni. I contatori sono locali al run corrente
/// e vengono aggiornati soltanto da `SchedulingState::commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    pub absences: Vec<AbsencePeriod>,
    room_counts: BTreeMap<String, u32>,
    total_assignments: u32,
    weekly: BTreeMap<u32, WeekRecord>,
}

impl Person {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        Self {
            id: PersonId::new(name),
            absences: Vec::new(),
            room_counts: BTreeMap::new(),
            total_assignments: 0,
            weekly: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    pub fn add_absence(&mut self, period: AbsencePeriod) {
        self.absences.push(period);
    }

    pub fn is_available_on(&self, day: NaiveDate) -> bool {
        !self.absences.iter().any(|a| a.contains(day))
    }

    /// Giorni liberi nella finestra: prima i feriali (lun-ven), poi il
    /// fine settimana, in ordine cronologico dentro ciascun blocco.
    pub fn available_days_in(&self, week: &WeekWindow) -> Vec<NaiveDate> {
        let free: Vec<NaiveDate> = week
            .days()
            .into_iter()
            .filter(|d| self.is_available_on(*d))
            .collect();
        let mut ordered: Vec<NaiveDate> = free
            .iter()
            .copied()
            .filter(|d| d.weekday().num_days_from_monday() < 5)
            .collect();
        ordered.extend(
            free.into_iter()
                .filter(|d| d.weekday().num_days_from_monday() >= 5),
        );
        ordered
    }

    pub fn room_count(&self, room: &str) -> u32 {
        self.room_counts.get(room).copied().unwrap_or(0)
    }

    pub fn total_assignments(&self) -> u32 {
        self.total_assignments
    }

    pub fn week_record(&self, week: u32) -> Option<&WeekRecord> {
        self.weekly.get(&week)
    }

    pub fn assignments_in_week(&self, week: u32) -> u32 {
        self.weekly.get(&week).map_or(0, |r| r.len() as u32)
    }

    pub fn has_date_in_week(&self, week: u32, date: NaiveDate) -> bool {
        self.weekly.get(&week).is_some_and(|r| r.has_date(date))
    }

    pub(crate) fn record(&mut self, room: &str, date: NaiveDate, week: u32) {
        *self.room_counts.entry(room.to_string()).or_insert(0) += 1;
        self.total_assignments += 1;
        self.weekly.entry(week).or_default().insert(room, date);
    }

    pub(crate) fn reset_run_state(&mut self, rooms: &[String]) {
        self.room_counts = rooms.iter().map(|r| (r.clone(), 0)).collect();
        self.total_assignments = 0;
        self.weekly.clear();
    }
}

/// Registro settimanale di una persona: stanza -> data di esecuzione.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekRecord {
    assignments: BTreeMap<String, NaiveDate>,
}

impl WeekRecord {
    pub fn rooms(&self) -> impl Iterator<Item = &str> {
        self.assignments.keys().map(String::as_str)
    }

    pub fn date_of(&self, room: &str) -> Option<NaiveDate> {
        self.assignments.get(room).copied()
    }

    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.assignments.values().any(|d| *d == date)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub(crate) fn insert(&mut self, room: &str, date: NaiveDate) {
        self.assignments.insert(room.to_string(), date);
    }
}

/// Finestra settimanale lunedì-domenica, numerata a partire da 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub number: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..7).map(|i| self.start + Duration::days(i)).collect()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    /// Etichetta del tipo "Settimana 2".
    pub fn label(&self) -> String {
        format!("Settimana {}", self.number)
    }

    /// Periodo compatto del tipo "08/02 - 14/02".
    pub fn period(&self) -> String {
        format!("{} - {}", self.start.format("%d/%m"), self.end.format("%d/%m"))
    }
}

/// Assegnazione registrata nel ledger. Mai ritrattata una volta committata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub room: String,
    pub person: PersonId,
    pub date: NaiveDate,
    pub week_number: u32,
    pub group: Option<String>,
}

impl Assignment {
    pub fn new(room: String, person: PersonId, date: NaiveDate, week_number: u32) -> Self {
        Self {
            room,
            person,
            date,
            week_number,
            group: None,
        }
    }

    pub fn grouped(
        room: String,
        person: PersonId,
        date: NaiveDate,
        week_number: u32,
        group: String,
    ) -> Self {
        Self {
            room,
            person,
            date,
            week_number,
            group: Some(group),
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }
}

/// Stato di un run di generazione: arena delle persone, ledger delle
/// assegnazioni e indici derivati. L'unico punto di mutazione è `commit`.
#[derive(Debug, Clone)]
pub struct SchedulingState {
    people: Vec<Person>,
    rooms: Vec<String>,
    assignments: Vec<Assignment>,
    by_date: BTreeMap<NaiveDate, Vec<usize>>,
    by_week: BTreeMap<u32, Vec<usize>>,
    by_room: BTreeMap<String, Vec<usize>>,
}

impl SchedulingState {
    /// Clona le persone nell'arena del run e azzera i loro contatori.
    pub fn new(people: &[Person], rooms: &[String]) -> Self {
        let people = people
            .iter()
            .map(|p| {
                let mut p = p.clone();
                p.reset_run_state(rooms);
                p
            })
            .collect();
        Self {
            people,
            rooms: rooms.to_vec(),
            assignments: Vec::new(),
            by_date: BTreeMap::new(),
            by_week: BTreeMap::new(),
            by_room: BTreeMap::new(),
        }
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.iter().find(|p| p.id() == id)
    }

    /// Registra un'assegnazione: aggiorna contatori della persona e indici.
    /// Restituisce `false` (senza registrare nulla) se la persona è ignota.
    #[must_use]
    pub fn commit(&mut self, assignment: Assignment) -> bool {
        let Some(person) = self.people.iter_mut().find(|p| *p.id() == assignment.person) else {
            return false;
        };
        person.record(&assignment.room, assignment.date, assignment.week_number);
        let idx = self.assignments.len();
        self.by_date.entry(assignment.date).or_default().push(idx);
        self.by_week
            .entry(assignment.week_number)
            .or_default()
            .push(idx);
        self.by_room
            .entry(assignment.room.clone())
            .or_default()
            .push(idx);
        self.assignments.push(assignment);
        true
    }

    pub fn assignments_on(&self, date: NaiveDate) -> usize {
        self.by_date.get(&date).map_or(0, Vec::len)
    }

    pub fn is_room_assigned_in_week(&self, room: &str, week: u32) -> bool {
        self.by_room
            .get(room)
            .is_some_and(|ids| ids.iter().any(|&i| self.assignments[i].week_number == week))
    }

    pub fn assignment_for(&self, week: u32, room: &str) -> Option<&Assignment> {
        self.by_week.get(&week).and_then(|ids| {
            ids.iter()
                .map(|&i| &self.assignments[i])
                .find(|a| a.room == room)
        })
    }

    /// Numero di unità raggruppate già ricevute dalla persona nel run.
    pub fn grouped_units_of(&self, person: &PersonId) -> u32 {
        let mut seen: BTreeSet<(u32, &str)> = BTreeSet::new();
        for a in &self.assignments {
            if &a.person == person {
                if let Some(g) = &a.group {
                    seen.insert((a.week_number, g.as_str()));
                }
            }
        }
        seen.len() as u32
    }
}

/// Voce del piano mensile: una per ogni coppia (settimana, stanza).
/// `person == None` marca esplicitamente una stanza scoperta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub week_number: u32,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub room: String,
    pub person: Option<String>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl ScheduleEntry {
    pub fn week_label(&self) -> String {
        format!("Settimana {}", self.week_number)
    }

    pub fn period(&self) -> String {
        format!(
            "{} - {}",
            self.week_start.format("%d/%m"),
            self.week_end.format("%d/%m")
        )
    }

    pub fn weekday_name(&self) -> &'static str {
        giorno(self.date)
    }

    /// Data leggibile del tipo "Mercoledì 10/02".
    pub fn full_date(&self) -> String {
        format!("{} {}", self.weekday_name(), self.date.format("%d/%m"))
    }

    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }
}

/// Piano mensile completo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSchedule {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<WeekWindow>,
    pub entries: Vec<ScheduleEntry>,
}

impl MonthSchedule {
    /// Voci ordinate per data e poi per stanza, per la visualizzazione.
    pub fn sorted_entries(&self) -> Vec<&ScheduleEntry> {
        let mut entries: Vec<&ScheduleEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.room.cmp(&b.room)));
        entries
    }

    pub fn gaps(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(|e| e.person.is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|e| e.person.is_some())
    }

    /// Intestazione del tipo "Febbraio 2021".
    pub fn month_label(&self) -> String {
        format!("{} {}", mese(self.month).unwrap_or("?"), self.year)
    }
}
