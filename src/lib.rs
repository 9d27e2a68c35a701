#![forbid(unsafe_code)]
//! Turnario: generazione dei turni di pulizia mensili della casa (senza BD).
//!
//! - Partizione del mese in settimane lunedì-domenica.
//! - Motore greedy deterministico: carichi bilanciati e rotazione delle stanze.
//! - Raggruppamento stanze opzionale per le settimane a tre partecipanti.
//! - Piano in JSON, persone da CSV, export CSV/JSON del risultato.

pub mod io;
pub mod model;
pub mod plan;
pub mod report;
pub mod scheduler;

pub use model::{
    giorno, mese, AbsencePeriod, Assignment, MonthSchedule, Person, PersonId, ScheduleEntry,
    SchedulingState, WeekRecord, WeekWindow, GIORNI_SETTIMANA, MESI_ITALIANI,
    NESSUNO_DISPONIBILE, PERSONE_DEFAULT, STANZE_DEFAULT,
};
pub use plan::{export_plan_json, load_plan_from_file, PlanConfig};
pub use report::{
    prepare_report, DistributionReport, GapEntry, PersonDistribution, ReportRenderer, TextReport,
};
pub use scheduler::{
    month_weeks, GroupingOptions, RoomGroup, SchedError, ScheduleOptions, Scheduler,
};
