//! exercise-rx CLI - clinician-facing front end over the record store
//!
//! Each subcommand is one logical operation: it acquires a session, runs the
//! repository/report calls, prints JSON, and releases the session.

use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use exercise_rx_lib::db::{self, Database, DatabaseError};
use exercise_rx_lib::models::{
    option_sets, Frequency, Goal, NewPatient, NewPrescription, NewProgressRecord, RiskFactor,
    SessionDuration, CONDITION_LABELS,
};
use exercise_rx_lib::{config, recommendation, report};

#[derive(Parser, Debug)]
#[command(
    name = "exercise-rx",
    author,
    version,
    about = "Record patient profiles, prescribe exercise by condition, and track progress",
    long_about = "Stores patients, prescriptions and session logs in a local SQLite file. \
                  Set EXERCISE_RX_DB to choose the file location."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database file and schema if needed, then show its status
    Init,
    /// Show database location, tables, and patient count (never creates the file)
    Status,
    /// List every enumerated choice (risk factors, goals, frequencies, durations, conditions)
    Options,
    /// Show recommended exercises for a condition label, e.g. "Fall Prevention"
    Recommend { label: String },
    /// Add a patient profile
    AddPatient {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        age: i64,
        /// Repeatable, e.g. --risk-factor "Osteoporosis"
        #[arg(long = "risk-factor", value_parser = parse_option::<RiskFactor>)]
        risk_factors: Vec<RiskFactor>,
        /// Repeatable, e.g. --goal "Improve Balance"
        #[arg(long = "goal", value_parser = parse_option::<Goal>)]
        goals: Vec<Goal>,
    },
    /// List patients, newest first
    Patients,
    /// Show one patient with their conditions and prescriptions
    Patient { id: i64 },
    /// Link a condition label to a patient
    AttachCondition {
        #[arg(long)]
        patient: i64,
        #[arg(long)]
        label: String,
    },
    /// Generate a prescription from one or more condition labels
    Prescribe {
        #[arg(long)]
        patient: i64,
        /// Repeatable condition label; exercises are snapshotted from the table
        #[arg(long = "condition", required = true)]
        conditions: Vec<String>,
        #[arg(long, value_parser = parse_option::<Frequency>)]
        frequency: Frequency,
        #[arg(long, value_parser = parse_option::<SessionDuration>)]
        duration: SessionDuration,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List a patient's prescriptions, newest first
    Prescriptions { patient: i64 },
    /// Record one exercise session
    LogProgress {
        #[arg(long)]
        patient: i64,
        #[arg(long)]
        prescription: i64,
        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Minutes exercised
        #[arg(long, allow_hyphen_values = true)]
        duration: i64,
        /// 1-5
        #[arg(long, allow_hyphen_values = true)]
        difficulty: i64,
        /// 0-10
        #[arg(long, allow_hyphen_values = true)]
        pain: i64,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show progress entries plus summary statistics and chart series
    Progress {
        patient: i64,
        /// Only use the N most recent entries
        #[arg(long)]
        recent: Option<usize>,
    },
}

fn parse_option<T: FromStr<Err = DatabaseError>>(s: &str) -> Result<T, String> {
    s.parse().map_err(|e: DatabaseError| e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to encode output")?);
    Ok(())
}

#[derive(Serialize)]
struct PatientDetail {
    patient: exercise_rx_lib::models::Patient,
    conditions: Vec<exercise_rx_lib::models::Condition>,
    prescriptions: Vec<exercise_rx_lib::models::Prescription>,
}

#[derive(Serialize)]
struct ProgressView {
    entries: Vec<exercise_rx_lib::models::ProgressRecord>,
    report: report::ProgressReport,
}

fn main() -> ExitCode {
    exercise_rx_lib::init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<DatabaseError>() {
                Some(db_err) => eprintln!("error ({:?}): {db_err}", db_err.kind()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let database = Database::from_config();

    // These never touch the schema.
    match &cli.command {
        Commands::Status => return print_json(&db::database_status(&database)?),
        Commands::Options => return print_json(&option_sets()),
        Commands::Recommend { label } => {
            return print_json(&recommendation::recommend_for_label(label))
        }
        _ => {}
    }

    info!("{} v{} using {}", config::APP_NAME, config::APP_VERSION, database.path().display());
    database.ensure_schema()?;

    match cli.command {
        Commands::Init => print_json(&db::database_status(&database)?),
        Commands::AddPatient {
            name,
            age,
            risk_factors,
            goals,
        } => {
            let input = NewPatient { name, age, risk_factors, goals };
            let patient = database.run(|conn| db::create_patient(conn, &input))?;
            print_json(&patient)
        }
        Commands::Patients => print_json(&database.run(db::list_patients)?),
        Commands::Patient { id } => {
            let detail = database.run(|conn| {
                Ok::<_, DatabaseError>(PatientDetail {
                    patient: db::get_patient(conn, id)?,
                    conditions: db::list_conditions_for_patient(conn, id)?,
                    prescriptions: db::list_prescriptions_for_patient(conn, id)?,
                })
            })?;
            print_json(&detail)
        }
        Commands::AttachCondition { patient, label } => {
            let condition = database.run(|conn| db::attach_condition(conn, patient, &label))?;
            print_json(&condition)
        }
        Commands::Prescribe {
            patient,
            conditions,
            frequency,
            duration,
            notes,
        } => {
            let unknown = recommendation::unrecognized_labels(&conditions);
            if !unknown.is_empty() {
                bail!(
                    "Unknown condition label(s): {}. Expected one of: {}",
                    unknown.join(", "),
                    CONDITION_LABELS.join(", ")
                );
            }
            let input = NewPrescription {
                patient_id: patient,
                exercises: recommendation::exercises_for_conditions(&conditions),
                frequency,
                duration,
                notes,
            };
            let prescription = database.run(|conn| db::create_prescription(conn, &input))?;
            print_json(&prescription)
        }
        Commands::Prescriptions { patient } => {
            print_json(&database.run(|conn| db::list_prescriptions_for_patient(conn, patient))?)
        }
        Commands::LogProgress {
            patient,
            prescription,
            date,
            duration,
            difficulty,
            pain,
            notes,
        } => {
            let input = NewProgressRecord {
                patient_id: patient,
                prescription_id: prescription,
                date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                duration_minutes: duration,
                difficulty_rating: difficulty,
                pain_level: pain,
                notes,
            };
            let record = database.run(|conn| db::record_progress(conn, &input))?;
            print_json(&record)
        }
        Commands::Progress { patient, recent } => {
            let view = database.run(|conn| {
                Ok::<_, DatabaseError>(ProgressView {
                    entries: report::progress_history(conn, patient, recent)?,
                    report: report::progress_report(conn, patient, recent)?,
                })
            })?;
            print_json(&view)
        }
        Commands::Status | Commands::Options | Commands::Recommend { .. } => Ok(()),
    }
}
