use chrono::{Datelike, NaiveDate};

use crate::model::SchedulingState;

/// Bonus di distribuzione per giorno, da lunedì a domenica.
const BONUS_GIORNO: [i64; 7] = [15, 20, 25, 20, 15, 5, 1];

const SCALA_ROTAZIONE: [i64; 2] = [400, 200];
const SCALA_CARICO: [i64; 3] = [600, 400, 200];
const SCALA_CARICO_UNITA: [i64; 3] = [1000, 600, 200];
const SCALA_ROTAZIONE_UNITA: [i64; 2] = [300, 150];

/// Termini di punteggio legati alla data: preferenza feriale più bonus
/// di distribuzione del giorno.
pub(super) fn weekday_terms(date: NaiveDate) -> i64 {
    let wd = date.weekday().num_days_from_monday() as usize;
    let feriale = if wd < 5 { 30 } else { 10 };
    feriale + BONUS_GIORNO[wd]
}

/// Priorità di rotazione di una stanza: più è squilibrato o scarso lo
/// storico tra i partecipanti, prima la stanza va elaborata.
pub(super) fn room_rotation_priority(
    state: &SchedulingState,
    participants: &[usize],
    room: &str,
) -> i64 {
    let counts: Vec<u32> = participants
        .iter()
        .map(|&i| state.people()[i].room_count(room))
        .collect();
    let max = counts.iter().copied().max().unwrap_or(0);
    let min = counts.iter().copied().min().unwrap_or(0);
    let mai_fatta = counts.iter().filter(|&&c| c == 0).count() as i64;
    let media = counts.iter().sum::<u32>() as f64 / counts.len().max(1) as f64;

    let mut score = 100 * i64::from(max - min) + 50 * mai_fatta;
    if media < 1.0 {
        score += 25;
    }
    score
}

/// Punteggio di una persona per una coppia (stanza, data).
/// Il bilanciamento del carico totale è il termine dominante.
pub(super) fn person_room_score(
    state: &SchedulingState,
    participants: &[usize],
    person: usize,
    room: &str,
    date: NaiveDate,
) -> i64 {
    let p = &state.people()[person];

    let count = p.room_count(room);
    let (rank, min) = rank_among(
        count,
        participants.iter().map(|&i| state.people()[i].room_count(room)),
    );
    let rotazione = ladder(rank, count - min, &SCALA_ROTAZIONE, 100);

    let load = p.total_assignments();
    let (rank, min) = rank_among(
        load,
        participants
            .iter()
            .map(|&i| state.people()[i].total_assignments()),
    );
    let carico = ladder(rank, load - min, &SCALA_CARICO, 150);

    rotazione + carico + weekday_terms(date)
}

/// Punteggio di una persona per un'unità (singola stanza o gruppo).
pub(super) fn unit_person_score(
    state: &SchedulingState,
    participants: &[usize],
    person: usize,
    unit_rooms: &[String],
    is_group: bool,
) -> i64 {
    let p = &state.people()[person];

    let load = p.total_assignments();
    let (rank, min) = rank_among(
        load,
        participants
            .iter()
            .map(|&i| state.people()[i].total_assignments()),
    );
    let mut score = ladder(rank, load - min, &SCALA_CARICO_UNITA, 200);

    for room in unit_rooms {
        let count = p.room_count(room);
        let (rank, min) = rank_among(
            count,
            participants.iter().map(|&i| state.people()[i].room_count(room)),
        );
        score += ladder(rank, count - min, &SCALA_ROTAZIONE_UNITA, 100);
    }

    if is_group {
        score += 50;
    }
    score - 100 * i64::from(state.grouped_units_of(p.id()))
}

/// Variante per la scelta della data di un'unità: penalizza le date già
/// cariche, con penalità doppia per i gruppi.
pub(super) fn unit_date_score(state: &SchedulingState, is_group: bool, date: NaiveDate) -> i64 {
    let peso = if is_group { 2 } else { 1 };
    weekday_terms(date) - 50 * peso * state.assignments_on(date) as i64
}

/// Rango del valore tra i valori distinti ordinati (0 = minimo) e minimo.
fn rank_among(value: u32, values: impl Iterator<Item = u32>) -> (usize, u32) {
    let mut distinct: Vec<u32> = values.collect();
    distinct.sort_unstable();
    distinct.dedup();
    let min = distinct.first().copied().unwrap_or(0);
    let rank = distinct.iter().position(|&v| v == value).unwrap_or(0);
    (rank, min)
}

/// Scala a gradini: bonus per i primi ranghi, penalità proporzionale
/// all'eccesso oltre il minimo per gli altri.
fn ladder(rank: usize, excess: u32, steps: &[i64], penalty: i64) -> i64 {
    match steps.get(rank) {
        Some(&bonus) => bonus,
        None => -penalty * i64::from(excess),
    }
}
