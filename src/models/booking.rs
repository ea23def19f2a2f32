use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::printer::PrinterId;

/// A print job placed on a concrete printer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub printer: PrinterId,
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
    pub ticket: String,
    pub color: String,
}

/// `start + minutes`, or `None` when the result is not representable.
pub fn checked_end(start: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    Duration::try_minutes(minutes).and_then(|span| start.checked_add_signed(span))
}

impl Booking {
    /// Saturates at `NaiveDateTime::MAX`; stored bookings are range-checked on load.
    pub fn end(&self) -> NaiveDateTime {
        checked_end(self.start, self.duration_minutes).unwrap_or(NaiveDateTime::MAX)
    }

    /// Calendar day the booking is stored under.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Where a candidate job should go: a named printer or any free printer of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PrinterTarget {
    Printer(String),
    Class(String),
}

/// A candidate job as submitted by the user, not yet checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub target: PrinterTarget,
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
    pub ticket: String,
}

impl BookingRequest {
    pub fn on_printer(
        printer: impl Into<String>,
        start: NaiveDateTime,
        duration_minutes: i64,
        ticket: impl Into<String>,
    ) -> Self {
        Self {
            target: PrinterTarget::Printer(printer.into()),
            start,
            duration_minutes,
            ticket: ticket.into(),
        }
    }

    pub fn in_class(
        class: impl Into<String>,
        start: NaiveDateTime,
        duration_minutes: i64,
        ticket: impl Into<String>,
    ) -> Self {
        Self {
            target: PrinterTarget::Class(class.into()),
            start,
            duration_minutes,
            ticket: ticket.into(),
        }
    }

    pub fn end(&self) -> NaiveDateTime {
        checked_end(self.start, self.duration_minutes).unwrap_or(NaiveDateTime::MAX)
    }
}
