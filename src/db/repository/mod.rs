//! Repository layer: entity-scoped database operations.
//!
//! Every function takes a borrowed connection; the caller owns the session
//! (see [`crate::db::Database`]). Writes validate their input and check
//! foreign references before touching the database, then commit before
//! returning.

mod condition;
mod patient;
mod prescription;
mod progress;

use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;

pub use condition::*;
pub use patient::*;
pub use prescription::*;
pub use progress::*;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current UTC time at the precision the database stores.
fn now_timestamp() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn date_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn json_column<T: DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text).map_err(|e| conversion_error(idx, e))
}

fn enum_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = super::DatabaseError>,
{
    let text: String = row.get(idx)?;
    text.parse().map_err(|e| conversion_error(idx, e))
}

/// Collapse repeated entries, keeping the first occurrence's position.
fn dedup_in_order<T: PartialEq + Copy>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(*item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::ErrorKind;
    use crate::models::*;
    use crate::recommendation::exercises_for_conditions;
    use crate::report::build_progress_report;

    #[test]
    fn timestamps_round_trip_at_second_precision() {
        let ts = now_timestamp();
        let parsed =
            NaiveDateTime::parse_from_str(&format_timestamp(&ts), TIMESTAMP_FORMAT).unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        assert_eq!(dedup_in_order(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn end_to_end_fall_prevention_scenario() {
        let conn = open_memory_database().unwrap();

        let jane = create_patient(&conn, &NewPatient {
            name: "Jane Doe".into(),
            age: 72,
            risk_factors: vec![RiskFactor::Osteoporosis],
            goals: vec![Goal::ImproveBalance],
        })
        .unwrap();

        let exercises = exercises_for_conditions(&["Fall Prevention"]);
        assert_eq!(exercises.len(), 2);

        let rx = create_prescription(&conn, &NewPrescription {
            patient_id: jane.id,
            exercises,
            frequency: Frequency::ThreeTimesPerWeek,
            duration: SessionDuration::Minutes20,
            notes: "Use a chair for support".into(),
        })
        .unwrap();

        for (day, minutes, difficulty, pain) in [(3, 15, 2, 4), (10, 25, 3, 2)] {
            record_progress(&conn, &NewProgressRecord {
                patient_id: jane.id,
                prescription_id: rx.id,
                date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
                duration_minutes: minutes,
                difficulty_rating: difficulty,
                pain_level: pain,
                notes: None,
            })
            .unwrap();
        }

        let history = list_progress_for_patient(&conn, jane.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(history[1].date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());

        let report = build_progress_report(&history);
        let duration = report.summary.duration.unwrap();
        assert!((duration.mean - 20.0).abs() < 1e-9);
        assert!((duration.std_dev.unwrap() - 50f64.sqrt()).abs() < 1e-9);
        let pain = report.summary.pain_level.unwrap();
        assert!((pain.mean - 3.0).abs() < 1e-9);
        assert!((pain.std_dev.unwrap() - 2f64.sqrt()).abs() < 1e-9);
        let difficulty = report.summary.difficulty_rating.unwrap();
        assert!((difficulty.mean - 2.5).abs() < 1e-9);

        assert_eq!(report.series.duration[0].value, 15);
        assert_eq!(report.series.duration[1].value, 25);
    }

    #[test]
    fn failed_writes_leave_no_rows() {
        let conn = open_memory_database().unwrap();
        let patient = create_patient(&conn, &NewPatient {
            name: "Sam".into(),
            age: 50,
            risk_factors: vec![],
            goals: vec![],
        })
        .unwrap();

        let err = create_prescription(&conn, &NewPrescription {
            patient_id: patient.id + 100,
            exercises: exercises_for_conditions(&["Pain Management"]),
            frequency: Frequency::TwicePerWeek,
            duration: SessionDuration::Minutes15,
            notes: String::new(),
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Reference);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM prescriptions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert!(list_prescriptions_for_patient(&conn, patient.id).unwrap().is_empty());
    }
}
