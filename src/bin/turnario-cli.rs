#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use turnario::{
    io,
    plan::{self, PlanConfig},
    report::{prepare_report, ReportRenderer, TextReport},
    scheduler::{month_weeks, Scheduler},
    NESSUNO_DISPONIBILE,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimale per i turni di pulizia mensili (senza base di dati)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Attiva i log (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrivere un piano JSON di esempio
    Init {
        #[arg(long, default_value = "piano.json")]
        out: String,
    },

    /// Elencare le settimane lunedì-domenica di un mese
    Weeks {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },

    /// Generare il piano del mese da un file di piano
    Generate {
        #[arg(long, default_value = "piano.json")]
        plan: String,
        /// CSV persone (sostituisce persone e assenze del piano)
        #[arg(long)]
        people_csv: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Statistiche di distribuzione del piano generato
    Report {
        #[arg(long, default_value = "piano.json")]
        plan: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Init { out } => {
            plan::export_plan_json(&out, &PlanConfig::sample())?;
            println!("Piano di esempio scritto in {out}");
            0
        }
        Commands::Weeks { year, month } => {
            for week in month_weeks(year, month)? {
                println!("{}: {}", week.label(), week.period());
            }
            0
        }
        Commands::Generate {
            plan,
            people_csv,
            out_csv,
            out_json,
        } => {
            let plan = plan::load_plan_from_file(&plan)?;
            let people = match people_csv {
                Some(path) => io::import_people_csv(path)?,
                None => plan.to_people(),
            };
            if people.len() < 2 {
                bail!("servono almeno due persone per generare i turni");
            }
            let scheduler = Scheduler::new(plan.rooms.clone());
            let schedule = scheduler.generate(&people, plan.year, plan.month, &plan.schedule_options())?;

            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &schedule)?;
            }
            if let Some(path) = out_json {
                io::export_schedule_json(path, &schedule)?;
            }
            // stampa compatta
            for entry in schedule.sorted_entries() {
                println!(
                    "{} | {} | {} | {}",
                    entry.date.format("%Y-%m-%d"),
                    entry.weekday_name(),
                    entry.room,
                    entry.person.as_deref().unwrap_or(NESSUNO_DISPONIBILE)
                );
            }
            let gaps = schedule.gaps().count();
            if gaps == 0 {
                println!("OK: tutte le stanze assegnate");
                0
            } else {
                eprintln!("{gaps} stanza/e scoperte nel mese");
                // Codice 2 = piano incompleto
                2
            }
        }
        Commands::Report { plan } => {
            let plan = plan::load_plan_from_file(&plan)?;
            let scheduler = Scheduler::new(plan.rooms.clone());
            let schedule =
                scheduler.generate(&plan.to_people(), plan.year, plan.month, &plan.schedule_options())?;
            let report = prepare_report(&schedule, &plan.people);
            print!("{}", TextReport.render(&report));
            0
        }
    };

    std::process::exit(code);
}
