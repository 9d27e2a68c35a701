use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::{scoring, types::ScheduleOptions};
use crate::model::{Assignment, SchedulingState, WeekWindow};

/// Assegna le stanze di una settimana in due passaggi: uno cronologico
/// guidato dai target bilanciati, poi uno di recupero senza vincoli di
/// target. Le stanze senza alcun candidato restano fuori dal ledger.
pub(super) fn assign_week(
    state: &mut SchedulingState,
    week: &WeekWindow,
    participants: &[usize],
    room_order: &[String],
    opts: &ScheduleOptions,
) {
    let targets = balanced_targets(state, participants, room_order.len());
    let dates = available_dates(state, participants, week);

    for (di, date) in dates.iter().enumerate() {
        let unassigned: Vec<&String> = room_order
            .iter()
            .filter(|r| !state.is_room_assigned_in_week(r, week.number))
            .collect();
        if unassigned.is_empty() {
            break;
        }
        // quota del giorno: distribuisce le stanze sulle date rimanenti
        let quota = (unassigned.len() / (dates.len() - di)).clamp(1, 3);

        let mut scored: Vec<(i64, &String)> = unassigned
            .iter()
            .map(|&r| (scoring::room_rotation_priority(state, participants, r), r))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let mut commits = 0usize;
        for (_, room) in scored {
            if commits == quota {
                break;
            }
            if let Some(p) = best_candidate(state, participants, room, *date, week, &targets, opts)
            {
                let person = state.people()[p].id().clone();
                if state.commit(Assignment::new(room.clone(), person, *date, week.number)) {
                    commits += 1;
                }
            }
        }
    }

    // passaggio di recupero: ignora target e quota giornaliera
    for room in room_order {
        if state.is_room_assigned_in_week(room, week.number) {
            continue;
        }
        match best_pair(state, participants, room, week, opts) {
            Some((p, date)) => {
                debug!(settimana = week.number, stanza = %room, "assegnazione di recupero");
                let person = state.people()[p].id().clone();
                if !state.commit(Assignment::new(room.clone(), person, date, week.number)) {
                    warn!(settimana = week.number, stanza = %room, "assegnazione scartata: persona ignota");
                }
            }
            None => {
                warn!(settimana = week.number, stanza = %room, "nessun candidato idoneo");
            }
        }
    }
}

/// Target settimanali: divisione intera delle stanze tra i partecipanti,
/// con il resto a chi ha il carico totale più basso. Chi è già al massimo
/// del gruppo non riceve stanze extra.
fn balanced_targets(
    state: &SchedulingState,
    participants: &[usize],
    num_rooms: usize,
) -> BTreeMap<usize, u32> {
    let base = (num_rooms / participants.len()) as u32;
    let remainder = num_rooms % participants.len();
    let max_total = participants
        .iter()
        .map(|&i| state.people()[i].total_assignments())
        .max()
        .unwrap_or(0);

    let mut order: Vec<usize> = participants.to_vec();
    order.sort_by_key(|&i| state.people()[i].total_assignments());

    let mut targets: BTreeMap<usize, u32> = participants.iter().map(|&i| (i, base)).collect();
    let mut given = 0usize;
    for &i in &order {
        if given == remainder {
            break;
        }
        if state.people()[i].total_assignments() < max_total {
            if let Some(t) = targets.get_mut(&i) {
                *t += 1;
            }
            given += 1;
        }
    }
    targets
}

/// Unione cronologica dei giorni liberi dei partecipanti.
fn available_dates(
    state: &SchedulingState,
    participants: &[usize],
    week: &WeekWindow,
) -> Vec<NaiveDate> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for &i in participants {
        dates.extend(state.people()[i].available_days_in(week));
    }
    dates.into_iter().collect()
}

/// Miglior candidato per la stanza nella data, tra chi è sotto target,
/// libero quel giorno e non già impegnato in quella data. A parità di
/// punteggio vince il primo in ordine di input.
fn best_candidate(
    state: &SchedulingState,
    participants: &[usize],
    room: &str,
    date: NaiveDate,
    week: &WeekWindow,
    targets: &BTreeMap<usize, u32>,
    opts: &ScheduleOptions,
) -> Option<usize> {
    let mut best: Option<(i64, usize)> = None;
    for &i in participants {
        let p = &state.people()[i];
        if p.assignments_in_week(week.number) >= targets.get(&i).copied().unwrap_or(0) {
            continue;
        }
        if !p.is_available_on(date) {
            continue;
        }
        if p.has_date_in_week(week.number, date) {
            continue;
        }
        if week.number == 1 && opts.is_excluded(p.name(), room) {
            continue;
        }
        let score = scoring::person_room_score(state, participants, i, room, date);
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, i));
        }
    }
    best.map(|(_, i)| i)
}

/// Miglior coppia (persona, data) per una stanza rimasta scoperta dopo il
/// passaggio cronologico: valuta ogni combinazione ammissibile.
fn best_pair(
    state: &SchedulingState,
    participants: &[usize],
    room: &str,
    week: &WeekWindow,
    opts: &ScheduleOptions,
) -> Option<(usize, NaiveDate)> {
    let mut best: Option<(i64, usize, NaiveDate)> = None;
    for &i in participants {
        let p = &state.people()[i];
        if week.number == 1 && opts.is_excluded(p.name(), room) {
            continue;
        }
        for date in p.available_days_in(week) {
            if p.has_date_in_week(week.number, date) {
                continue;
            }
            let score = scoring::person_room_score(state, participants, i, room, date);
            if best.map_or(true, |(s, _, _)| score > s) {
                best = Some((score, i, date));
            }
        }
    }
    best.map(|(_, i, date)| (i, date))
}
