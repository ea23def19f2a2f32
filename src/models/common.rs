use chrono::NaiveDate;
use serde::Deserialize;

// Query parameters for the printer listing
#[derive(Debug, Deserialize)]
pub struct PrinterListParams {
    pub class: Option<String>,
}

// Query parameters for the day schedule
#[derive(Debug, Deserialize)]
pub struct ScheduleParams {
    #[serde(default = "default_idle")]
    pub idle: bool,
}

pub fn default_idle() -> bool {
    false
}

// Query parameters for cancelling a booking
#[derive(Debug, Deserialize)]
pub struct CancelParams {
    pub ticket: String,
}

// Query parameters for usage reports, both bounds inclusive
#[derive(Debug, Deserialize)]
pub struct UsageParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}
