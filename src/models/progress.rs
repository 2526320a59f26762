use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DIFFICULTY_RANGE: std::ops::RangeInclusive<i64> = 1..=5;
pub const PAIN_RANGE: std::ops::RangeInclusive<i64> = 0..=10;
/// Years whose `YYYY-MM-DD` text sorts in calendar order.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// One logged exercise session. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: i64,
    pub patient_id: i64,
    pub prescription_id: i64,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub difficulty_rating: u8, // 1-5
    pub pain_level: u8,        // 0-10
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Raw session log as entered; numeric fields are range-checked on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgressRecord {
    pub patient_id: i64,
    pub prescription_id: i64,
    pub date: NaiveDate,
    pub duration_minutes: i64,
    pub difficulty_rating: i64,
    pub pain_level: i64,
    pub notes: Option<String>,
}
