use chrono::{Datelike, Days, NaiveDate};

use super::types::SchedError;
use crate::model::WeekWindow;

/// Partiziona il mese in finestre lunedì-domenica numerate da 1.
/// La prima finestra parte dal lunedì della settimana del giorno 1,
/// l'ultima copre l'ultimo giorno del mese; le code possono sconfinare
/// nei mesi adiacenti.
pub fn month_weeks(year: i32, month: u32) -> Result<Vec<WeekWindow>, SchedError> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(SchedError::InvalidDate { year, month })?;
    let last = last_day_of_month(year, month).ok_or(SchedError::InvalidDate { year, month })?;

    let offset = first.weekday().num_days_from_monday() as u64;
    let Some(mut current) = first.checked_sub_days(Days::new(offset)) else {
        return Err(SchedError::InvalidDate { year, month });
    };

    let mut weeks = Vec::new();
    let mut number = 1;
    while current <= last {
        let Some(end) = current.checked_add_days(Days::new(6)) else {
            break;
        };
        weeks.push(WeekWindow {
            number,
            start: current,
            end,
        });
        number += 1;
        current = match current.checked_add_days(Days::new(7)) {
            Some(d) => d,
            None => break,
        };
    }
    Ok(weeks)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    next.pred_opt()
}
