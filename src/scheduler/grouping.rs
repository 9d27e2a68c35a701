use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::{
    scoring,
    types::{GroupingOptions, ScheduleOptions},
};
use crate::model::{Assignment, SchedulingState, WeekWindow};

/// Unità assegnabile: una stanza singola oppure un gruppo di stanze che
/// viaggiano insieme (stessa persona, stessa data).
#[derive(Debug, Clone)]
pub(super) struct Unit {
    pub(super) name: Option<String>,
    pub(super) rooms: Vec<String>,
}

impl Unit {
    pub(super) fn is_group(&self) -> bool {
        self.name.is_some()
    }
}

/// Costruisce le unità a partire dai gruppi configurati. Un gruppo è
/// valido se, tolte le stanze ignote e quelle già reclamate da un gruppo
/// precedente, gliene restano almeno due. Senza gruppi validi (o con il
/// raggruppamento spento) restituisce l'insieme vuoto.
pub(super) fn build_units(rooms: &[String], grouping: &GroupingOptions) -> Vec<Unit> {
    if !grouping.enabled {
        return Vec::new();
    }
    let mut claimed: BTreeSet<String> = BTreeSet::new();
    let mut units: Vec<Unit> = Vec::new();
    for group in &grouping.groups {
        let valid: Vec<String> = rooms
            .iter()
            .filter(|r| group.rooms.iter().any(|g| g == *r) && !claimed.contains(*r))
            .cloned()
            .collect();
        if valid.len() < 2 {
            debug!(gruppo = %group.name, "gruppo ignorato: meno di due stanze valide");
            continue;
        }
        claimed.extend(valid.iter().cloned());
        units.push(Unit {
            name: Some(group.name.clone()),
            rooms: valid,
        });
    }
    if units.is_empty() {
        return Vec::new();
    }
    for room in rooms {
        if !claimed.contains(room) {
            units.push(Unit {
                name: None,
                rooms: vec![room.clone()],
            });
        }
    }
    units
}

/// Assegna una settimana per unità: ogni partecipante riceve esattamente
/// una unità. Le coppie (unità, persona) vengono valutate tutte e servite
/// in ordine di punteggio decrescente; i pareggi mantengono l'ordine di
/// costruzione delle unità e di input delle persone.
pub(super) fn assign_week(
    state: &mut SchedulingState,
    week: &WeekWindow,
    participants: &[usize],
    units: &[Unit],
    opts: &ScheduleOptions,
) {
    let mut pairs: Vec<(i64, usize, usize)> = Vec::new();
    for (u, unit) in units.iter().enumerate() {
        for &p in participants {
            if week.number == 1
                && unit
                    .rooms
                    .iter()
                    .any(|r| opts.is_excluded(state.people()[p].name(), r))
            {
                continue;
            }
            let score = scoring::unit_person_score(state, participants, p, &unit.rooms, unit.is_group());
            pairs.push((score, u, p));
        }
    }
    pairs.sort_by(|a, b| b.0.cmp(&a.0));

    let mut unit_done = vec![false; units.len()];
    let mut person_done: BTreeSet<usize> = BTreeSet::new();
    for (_, u, p) in pairs {
        if unit_done[u] || person_done.contains(&p) {
            continue;
        }
        let Some(date) = best_unit_date(state, p, &units[u], week) else {
            continue;
        };
        commit_unit(state, &units[u], p, date, week);
        unit_done[u] = true;
        person_done.insert(p);
    }

    // residuo: prima persona libera sulla prima data senza conflitti
    for (u, unit) in units.iter().enumerate() {
        if unit_done[u] {
            continue;
        }
        let free = participants.iter().copied().find(|p| !person_done.contains(p));
        match free.and_then(|p| first_free_date(state, p, week).map(|d| (p, d))) {
            Some((p, date)) => {
                debug!(settimana = week.number, unita = ?unit.name, "assegnazione residua");
                commit_unit(state, unit, p, date, week);
                unit_done[u] = true;
                person_done.insert(p);
            }
            None => {
                for room in &unit.rooms {
                    warn!(settimana = week.number, stanza = %room, "nessun candidato idoneo per l'unità");
                }
            }
        }
    }
}

/// Data migliore per l'unità secondo la variante di punteggio che
/// penalizza le date già cariche.
fn best_unit_date(
    state: &SchedulingState,
    person: usize,
    unit: &Unit,
    week: &WeekWindow,
) -> Option<NaiveDate> {
    let p = &state.people()[person];
    let mut best: Option<(i64, NaiveDate)> = None;
    for date in p.available_days_in(week) {
        if p.has_date_in_week(week.number, date) {
            continue;
        }
        let score = scoring::unit_date_score(state, unit.is_group(), date);
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, date));
        }
    }
    best.map(|(_, d)| d)
}

fn first_free_date(state: &SchedulingState, person: usize, week: &WeekWindow) -> Option<NaiveDate> {
    let p = &state.people()[person];
    p.available_days_in(week)
        .into_iter()
        .find(|d| !p.has_date_in_week(week.number, *d))
}

/// Commit atomico dell'unità: tutte le stanze alla stessa persona nella
/// stessa data, con il nome del gruppo quando l'unità è raggruppata.
fn commit_unit(state: &mut SchedulingState, unit: &Unit, person: usize, date: NaiveDate, week: &WeekWindow) {
    let id = state.people()[person].id().clone();
    for room in &unit.rooms {
        let assignment = match &unit.name {
            Some(g) => Assignment::grouped(room.clone(), id.clone(), date, week.number, g.clone()),
            None => Assignment::new(room.clone(), id.clone(), date, week.number),
        };
        if !state.commit(assignment) {
            warn!(settimana = week.number, stanza = %room, "assegnazione scartata: persona ignota");
        }
    }
}
