use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use tempfile::NamedTempFile;

use crate::model::{AbsencePeriod, MonthSchedule, Person};

/// Scrittura atomica: file temporaneo nella stessa directory, fsync,
/// poi rename sul percorso finale.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = NamedTempFile::new_in(parent.unwrap_or_else(|| Path::new(".")))
        .with_context(|| format!("creating temp file near {}", path.display()))?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}

/// Import persone da CSV: header `name,absences`. Le assenze sono
/// intervalli inclusivi separati da `;`, nella forma `2026-02-03..2026-02-07`
/// (accettato anche `/` come separatore) o come giorno singolo.
pub fn import_people_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Person>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid people row (empty name)");
        }
        let mut person = Person::new(name);
        if let Some(ranges) = rec.get(1) {
            let ranges = ranges.trim();
            if !ranges.is_empty() {
                for period in parse_absences(ranges)
                    .with_context(|| format!("invalid absences value for {name}"))?
                {
                    person.add_absence(period);
                }
            }
        }
        out.push(person);
    }
    Ok(out)
}

fn parse_absences(raw: &str) -> anyhow::Result<Vec<AbsencePeriod>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| parse_absence_chunk(chunk.trim()))
        .collect()
}

fn parse_absence_chunk(chunk: &str) -> anyhow::Result<AbsencePeriod> {
    if let Some((start_raw, end_raw)) = chunk.split_once("..").or_else(|| chunk.split_once('/')) {
        let start = parse_date(start_raw.trim())?;
        let end = parse_date(end_raw.trim())?;
        AbsencePeriod::new(start, end).map_err(anyhow::Error::msg)
    } else {
        let day = parse_date(chunk)?;
        AbsencePeriod::new(day, day).map_err(anyhow::Error::msg)
    }
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Export CSV del piano: header `settimana,periodo,stanza,persona,data,giorno,gruppo`,
/// righe ordinate per data e stanza, cella persona vuota per le scoperture.
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, schedule: &MonthSchedule) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    {
        let mut w = WriterBuilder::new().has_headers(false).from_writer(&mut buf);
        w.write_record([
            "settimana", "periodo", "stanza", "persona", "data", "giorno", "gruppo",
        ])?;
        let mut week_buf = itoa::Buffer::new();
        for entry in schedule.sorted_entries() {
            let settimana = week_buf.format(entry.week_number);
            let periodo = entry.period();
            let data = entry.date.format("%Y-%m-%d").to_string();
            w.write_record([
                settimana,
                periodo.as_str(),
                entry.room.as_str(),
                entry.person.as_deref().unwrap_or(""),
                data.as_str(),
                entry.weekday_name(),
                entry.group.as_deref().unwrap_or(""),
            ])?;
        }
        w.flush()?;
    }
    write_atomic(path, &buf)
}

/// Export JSON del piano (con indentazione).
pub fn export_schedule_json<P: AsRef<Path>>(
    path: P,
    schedule: &MonthSchedule,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(schedule)?;
    write_atomic(path, json.as_bytes())
}
