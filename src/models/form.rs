use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::booking::{BookingRequest, PrinterTarget};

/// Booking form as posted by the planning UI.
///
/// Exactly one of `printer` or `class` must be filled in: naming a printer
/// books that printer, naming a class lets the planner pick the first free one.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingForm {
    #[serde(default)]
    pub printer: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    #[serde(default)]
    pub ticket: String,
}

impl BookingForm {
    pub fn into_request(self) -> Result<BookingRequest, String> {
        let target = match (self.printer, self.class) {
            (Some(printer), None) => PrinterTarget::Printer(printer),
            (None, Some(class)) => PrinterTarget::Class(class),
            (Some(_), Some(_)) => {
                return Err("Specify either a printer or a printer class, not both".to_string())
            }
            (None, None) => return Err("A printer or a printer class is required".to_string()),
        };

        Ok(BookingRequest {
            target,
            start: self.date.and_time(self.start_time),
            duration_minutes: self.duration_minutes,
            ticket: self.ticket,
        })
    }
}

// Response structure for a cancelled booking
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
    pub ticket: String,
    pub printer: String,
}
