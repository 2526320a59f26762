use chrono::Datelike;
use rusqlite::{params, Connection};

use super::patient::patient_exists;
use super::prescription::prescription_owner;
use super::{date_column, format_date, format_timestamp, now_timestamp, timestamp_column};
use crate::db::DatabaseError;
use crate::models::{
    NewProgressRecord, ProgressRecord, DIFFICULTY_RANGE, PAIN_RANGE, YEAR_RANGE,
};

const PROGRESS_COLUMNS: &str = "id, patient_id, prescription_id, date, duration_minutes,
     difficulty_rating, pain_level, notes, created_at";

/// Append one session log. Ranges are checked first, then both references
/// (including that the prescription belongs to the patient), then the row is
/// written and committed.
pub fn record_progress(
    conn: &Connection,
    input: &NewProgressRecord,
) -> Result<ProgressRecord, DatabaseError> {
    let (duration_minutes, difficulty_rating, pain_level) = validate_ranges(input)?;
    let notes = input
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    let tx = conn.unchecked_transaction()?;
    if !patient_exists(&tx, input.patient_id)? {
        tracing::warn!(patient_id = input.patient_id, "Progress for unknown patient rejected");
        return Err(DatabaseError::missing("patient", input.patient_id));
    }
    match prescription_owner(&tx, input.prescription_id)? {
        None => {
            tracing::warn!(
                prescription_id = input.prescription_id,
                "Progress for unknown prescription rejected"
            );
            return Err(DatabaseError::missing("prescription", input.prescription_id));
        }
        Some(owner) if owner != input.patient_id => {
            tracing::warn!(
                prescription_id = input.prescription_id,
                patient_id = input.patient_id,
                owner,
                "Progress against another patient's prescription rejected"
            );
            return Err(DatabaseError::PrescriptionOwnerMismatch {
                prescription_id: input.prescription_id,
                patient_id: input.patient_id,
            });
        }
        Some(_) => {}
    }

    let created_at = now_timestamp();
    tx.execute(
        "INSERT INTO progress (patient_id, prescription_id, date, duration_minutes,
         difficulty_rating, pain_level, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            input.patient_id,
            input.prescription_id,
            format_date(&input.date),
            duration_minutes,
            difficulty_rating,
            pain_level,
            notes,
            format_timestamp(&created_at),
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    tracing::info!(progress_id = id, patient_id = input.patient_id, "Progress recorded");

    Ok(ProgressRecord {
        id,
        patient_id: input.patient_id,
        prescription_id: input.prescription_id,
        date: input.date,
        duration_minutes,
        difficulty_rating,
        pain_level,
        notes,
        created_at,
    })
}

fn validate_ranges(input: &NewProgressRecord) -> Result<(u32, u8, u8), DatabaseError> {
    if !YEAR_RANGE.contains(&input.date.year()) {
        tracing::warn!(date = %input.date, "Session date out of range");
        return Err(DatabaseError::validation(
            "date",
            format!("year must be between 1 and 9999, got {}", input.date),
        ));
    }
    let duration = u32::try_from(input.duration_minutes).map_err(|_| {
        DatabaseError::validation(
            "duration_minutes",
            format!("must be zero or more, got {}", input.duration_minutes),
        )
    })?;
    if !DIFFICULTY_RANGE.contains(&input.difficulty_rating) {
        tracing::warn!(difficulty = input.difficulty_rating, "Difficulty out of range");
        return Err(DatabaseError::validation(
            "difficulty_rating",
            format!("must be between 1 and 5, got {}", input.difficulty_rating),
        ));
    }
    if !PAIN_RANGE.contains(&input.pain_level) {
        tracing::warn!(pain = input.pain_level, "Pain level out of range");
        return Err(DatabaseError::validation(
            "pain_level",
            format!("must be between 0 and 10, got {}", input.pain_level),
        ));
    }
    // Both ranges fit in u8 once checked.
    Ok((duration, input.difficulty_rating as u8, input.pain_level as u8))
}

/// A patient's full history, most recent date first.
pub fn list_progress_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<ProgressRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROGRESS_COLUMNS} FROM progress
         WHERE patient_id = ?1
         ORDER BY date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![patient_id], row_to_progress)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// The `limit` most recent entries, in the same order as the full listing.
pub fn list_recent_progress_for_patient(
    conn: &Connection,
    patient_id: i64,
    limit: usize,
) -> Result<Vec<ProgressRecord>, DatabaseError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROGRESS_COLUMNS} FROM progress
         WHERE patient_id = ?1
         ORDER BY date DESC, id DESC
         LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![patient_id, limit], row_to_progress)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

fn row_to_progress(row: &rusqlite::Row) -> Result<ProgressRecord, rusqlite::Error> {
    Ok(ProgressRecord {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        prescription_id: row.get(2)?,
        date: date_column(row, 3)?,
        duration_minutes: row.get(4)?,
        difficulty_rating: row.get(5)?,
        pain_level: row.get(6)?,
        notes: row.get(7)?,
        created_at: timestamp_column(row, 8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::db::repository::{create_patient, create_prescription};
    use crate::db::sqlite::open_memory_database;
    use crate::db::ErrorKind;
    use crate::models::{ExerciseSnapshot, Frequency, NewPatient, NewPrescription, SessionDuration};

    struct Fixture {
        conn: Connection,
        patient_id: i64,
        prescription_id: i64,
    }

    fn fixture() -> Fixture {
        let conn = open_memory_database().unwrap();
        let (patient_id, prescription_id) = make_patient_with_prescription(&conn, "Jane");
        Fixture {
            conn,
            patient_id,
            prescription_id,
        }
    }

    fn make_patient_with_prescription(conn: &Connection, name: &str) -> (i64, i64) {
        let patient = create_patient(conn, &NewPatient {
            name: name.into(),
            age: 70,
            risk_factors: vec![],
            goals: vec![],
        })
        .unwrap();
        let rx = create_prescription(conn, &NewPrescription {
            patient_id: patient.id,
            exercises: vec![ExerciseSnapshot {
                name: "Balance Walking".into(),
                description: "Heel to toe".into(),
            }],
            frequency: Frequency::TwicePerWeek,
            duration: SessionDuration::Minutes15,
            notes: String::new(),
        })
        .unwrap();
        (patient.id, rx.id)
    }

    fn entry(f: &Fixture, day: u32, difficulty: i64, pain: i64) -> NewProgressRecord {
        NewProgressRecord {
            patient_id: f.patient_id,
            prescription_id: f.prescription_id,
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            duration_minutes: 20,
            difficulty_rating: difficulty,
            pain_level: pain,
            notes: Some("felt steady".into()),
        }
    }

    fn count_rows(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM progress", [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn record_and_list_round_trip() {
        let f = fixture();
        let created = record_progress(&f.conn, &entry(&f, 1, 3, 4)).unwrap();
        let listed = list_progress_for_patient(&f.conn, f.patient_id).unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[test]
    fn difficulty_boundaries() {
        let f = fixture();
        assert!(record_progress(&f.conn, &entry(&f, 1, 1, 0)).is_ok());
        assert!(record_progress(&f.conn, &entry(&f, 2, 5, 0)).is_ok());
        for bad in [0, 6] {
            let err = record_progress(&f.conn, &entry(&f, 3, bad, 0)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert_eq!(count_rows(&f.conn), 2);
    }

    #[test]
    fn pain_boundaries() {
        let f = fixture();
        assert!(record_progress(&f.conn, &entry(&f, 1, 2, 0)).is_ok());
        assert!(record_progress(&f.conn, &entry(&f, 2, 2, 10)).is_ok());
        for bad in [-1, 11] {
            let err = record_progress(&f.conn, &entry(&f, 3, 2, bad)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn negative_duration_rejected() {
        let f = fixture();
        let mut input = entry(&f, 1, 2, 2);
        input.duration_minutes = -5;
        let err = record_progress(&f.conn, &input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        input.duration_minutes = 0;
        assert_eq!(record_progress(&f.conn, &input).unwrap().duration_minutes, 0);
    }

    #[test]
    fn missing_references_rejected() {
        let f = fixture();
        let mut input = entry(&f, 1, 2, 2);
        input.patient_id = 999;
        assert_eq!(record_progress(&f.conn, &input).unwrap_err().kind(), ErrorKind::Reference);

        let mut input = entry(&f, 1, 2, 2);
        input.prescription_id = 999;
        assert_eq!(record_progress(&f.conn, &input).unwrap_err().kind(), ErrorKind::Reference);
        assert_eq!(count_rows(&f.conn), 0);
    }

    #[test]
    fn prescription_of_another_patient_rejected() {
        let f = fixture();
        let (_, other_rx) = make_patient_with_prescription(&f.conn, "John");
        let mut input = entry(&f, 1, 2, 2);
        input.prescription_id = other_rx;
        let err = record_progress(&f.conn, &input).unwrap_err();
        assert!(matches!(err, DatabaseError::PrescriptionOwnerMismatch { .. }));
        assert_eq!(err.kind(), ErrorKind::Reference);
        assert_eq!(count_rows(&f.conn), 0);
    }

    #[test]
    fn listing_is_most_recent_date_first() {
        let f = fixture();
        record_progress(&f.conn, &entry(&f, 10, 2, 2)).unwrap();
        record_progress(&f.conn, &entry(&f, 25, 2, 2)).unwrap();
        record_progress(&f.conn, &entry(&f, 3, 2, 2)).unwrap();

        let days: Vec<String> = list_progress_for_patient(&f.conn, f.patient_id)
            .unwrap()
            .iter()
            .map(|p| p.date.to_string())
            .collect();
        assert_eq!(days, vec!["2024-04-25", "2024-04-10", "2024-04-03"]);
    }

    #[test]
    fn same_day_entries_newest_first() {
        let f = fixture();
        let first = record_progress(&f.conn, &entry(&f, 5, 2, 2)).unwrap();
        let second = record_progress(&f.conn, &entry(&f, 5, 3, 1)).unwrap();
        let listed = list_progress_for_patient(&f.conn, f.patient_id).unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn recent_listing_limits() {
        let f = fixture();
        for day in 1..=7 {
            record_progress(&f.conn, &entry(&f, day, 2, 2)).unwrap();
        }
        let recent = list_recent_progress_for_patient(&f.conn, f.patient_id, 5).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].date, NaiveDate::from_ymd_opt(2024, 4, 7).unwrap());
        assert_eq!(recent[4].date, NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
    }

    #[test]
    fn dates_beyond_four_digit_years_rejected() {
        let f = fixture();
        let mut input = entry(&f, 1, 2, 2);
        input.date = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        record_progress(&f.conn, &input).unwrap();

        input.date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        let err = record_progress(&f.conn, &input).unwrap_err();
        assert!(matches!(&err, DatabaseError::Validation { field, .. } if field == "date"));

        input.date = NaiveDate::from_ymd_opt(0, 6, 1).unwrap();
        let err = record_progress(&f.conn, &input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        input.date = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        record_progress(&f.conn, &input).unwrap();

        let dates: Vec<String> = list_progress_for_patient(&f.conn, f.patient_id)
            .unwrap()
            .iter()
            .map(|p| p.date.to_string())
            .collect();
        assert_eq!(dates, vec!["9999-12-31", "0001-01-01"]);
    }

    #[test]
    fn blank_notes_stored_as_none() {
        let f = fixture();
        let mut input = entry(&f, 1, 2, 2);
        input.notes = Some("   ".into());
        let created = record_progress(&f.conn, &input).unwrap();
        assert_eq!(created.notes, None);
        let listed = list_progress_for_patient(&f.conn, f.patient_id).unwrap();
        assert_eq!(listed[0].notes, None);
    }
}
