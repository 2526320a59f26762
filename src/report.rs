//! Progress reporting: summary statistics and chart-ready series over a
//! patient's session history. A straight columnar reshape; no filtering or
//! smoothing.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{list_progress_for_patient, list_recent_progress_for_patient, DatabaseError};
use crate::models::ProgressRecord;

/// Mean and sample standard deviation of one metric. `std_dev` is `None`
/// with a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub mean: f64,
    pub std_dev: Option<f64>,
}

/// `None` for a metric means "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub entry_count: usize,
    pub duration: Option<Statistic>,
    pub pain_level: Option<Statistic>,
    pub difficulty_rating: Option<Statistic>,
}

impl ProgressSummary {
    pub fn has_data(&self) -> bool {
        self.entry_count > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: u32,
}

/// Per-metric line series, ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSeries {
    pub duration: Vec<SeriesPoint>,
    pub pain_level: Vec<SeriesPoint>,
    pub difficulty_rating: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub summary: ProgressSummary,
    pub series: ProgressSeries,
}

fn statistic(values: &[f64]) -> Option<Statistic> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std_dev = (values.len() > 1).then(|| {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (n - 1.0)).sqrt()
    });
    Some(Statistic { mean, std_dev })
}

pub fn summarize(records: &[ProgressRecord]) -> ProgressSummary {
    let column = |f: fn(&ProgressRecord) -> f64| records.iter().map(f).collect::<Vec<_>>();

    ProgressSummary {
        entry_count: records.len(),
        duration: statistic(&column(|r| f64::from(r.duration_minutes))),
        pain_level: statistic(&column(|r| f64::from(r.pain_level))),
        difficulty_rating: statistic(&column(|r| f64::from(r.difficulty_rating))),
    }
}

/// Reorders to calendar order whatever order the records arrive in.
pub fn chart_series(records: &[ProgressRecord]) -> ProgressSeries {
    let mut ordered: Vec<&ProgressRecord> = records.iter().collect();
    ordered.sort_by_key(|r| (r.date, r.id));

    let points = |f: fn(&ProgressRecord) -> u32| {
        ordered
            .iter()
            .map(|&r| SeriesPoint { date: r.date, value: f(r) })
            .collect::<Vec<_>>()
    };

    ProgressSeries {
        duration: points(|r| r.duration_minutes),
        pain_level: points(|r| u32::from(r.pain_level)),
        difficulty_rating: points(|r| u32::from(r.difficulty_rating)),
    }
}

pub fn build_progress_report(records: &[ProgressRecord]) -> ProgressReport {
    ProgressReport {
        summary: summarize(records),
        series: chart_series(records),
    }
}

/// A patient's whole history, or only the `recent` latest entries,
/// most recent date first.
pub fn progress_history(
    conn: &Connection,
    patient_id: i64,
    recent: Option<usize>,
) -> Result<Vec<ProgressRecord>, DatabaseError> {
    match recent {
        Some(limit) => list_recent_progress_for_patient(conn, patient_id, limit),
        None => list_progress_for_patient(conn, patient_id),
    }
}

/// Report over the same selection as [`progress_history`].
pub fn progress_report(
    conn: &Connection,
    patient_id: i64,
    recent: Option<usize>,
) -> Result<ProgressReport, DatabaseError> {
    let records = progress_history(conn, patient_id, recent)?;
    tracing::debug!(patient_id, entries = records.len(), "Building progress report");
    Ok(build_progress_report(&records))
}
