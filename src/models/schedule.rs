use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::printer::PrinterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Booking stored under the displayed day.
    Booked,
    /// Tail of a previous-day booking, clipped to midnight.
    Spillover,
    /// Placeholder for a printer with nothing on the displayed day.
    Idle,
}

/// One render-ready line of a day's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub printer: PrinterId,
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
    pub ticket: Option<String>,
    pub color: Option<String>,
    pub kind: RowKind,
}

/// Total booked minutes of one printer over a reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterUsage {
    pub printer: PrinterId,
    pub total_minutes: i64,
}
