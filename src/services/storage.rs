use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::StorageError;
use crate::models::booking::{checked_end, Booking};
use crate::models::printer::PrinterId;
use crate::services::allocation::MAX_DURATION_MINUTES;

const START_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HEADERS: [&str; 5] = ["Printer", "Start", "Duration", "Ticket", "Color"];

/// Persistence collaborator of the planner: one ordered list of bookings per
/// calendar day.
#[cfg_attr(test, mockall::automock)]
pub trait BookingStore: Send + Sync {
    /// Bookings stored under `date`; an empty list when nothing was ever saved.
    fn load_bookings(&self, date: NaiveDate) -> Result<Vec<Booking>, StorageError>;

    /// Replaces everything stored under `date`.
    fn save_bookings(&self, date: NaiveDate, bookings: &[Booking]) -> Result<(), StorageError>;

    /// Bookings of every day in `[start, end]`, day by day.
    fn load_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>, StorageError> {
        let mut bookings = Vec::new();
        let mut day = start;
        while day <= end {
            bookings.extend(self.load_bookings(day)?);
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        Ok(bookings)
    }
}

// Row layout of a planning file
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BookingRecord {
    #[serde(rename = "Printer")]
    pub printer: String,
    #[serde(rename = "Start")]
    pub start: String, // "YYYY-MM-DD HH:MM:SS"
    #[serde(rename = "Duration")]
    pub duration: i64,
    #[serde(rename = "Ticket")]
    pub ticket: String,
    #[serde(rename = "Color")]
    pub color: String,
}

impl From<&Booking> for BookingRecord {
    fn from(booking: &Booking) -> Self {
        Self {
            printer: booking.printer.to_string(),
            start: booking.start.format(START_FORMAT).to_string(),
            duration: booking.duration_minutes,
            ticket: booking.ticket.clone(),
            color: booking.color.clone(),
        }
    }
}

impl BookingRecord {
    fn into_booking(self) -> Result<Booking, String> {
        let printer: PrinterId = self.printer.parse()?;

        // Files written by older tools use the ISO "T" separator
        let start = NaiveDateTime::parse_from_str(&self.start, START_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(&self.start, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|e| format!("invalid start '{}': {}", self.start, e))?;

        if self.duration <= 0 || self.duration > MAX_DURATION_MINUTES {
            return Err(format!(
                "duration {} of ticket '{}' is outside 1..={} minutes",
                self.duration, self.ticket, MAX_DURATION_MINUTES
            ));
        }
        if checked_end(start, self.duration).is_none() {
            return Err(format!("ticket '{}' ends past the last representable date", self.ticket));
        }
        if self.ticket.trim().is_empty() {
            return Err(format!("booking on {} at {} has no ticket", printer, self.start));
        }

        Ok(Booking {
            printer,
            start,
            duration_minutes: self.duration,
            ticket: self.ticket,
            color: self.color,
        })
    }
}

/// Booking store keeping one CSV file per day (`planning_YYYY-MM-DD.csv`).
pub struct CsvBookingStore {
    data_dir: PathBuf,
    file_mutex: Mutex<()>,
}

impl CsvBookingStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_mutex: Mutex::new(()),
        }
    }

    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.data_dir
            .join(format!("planning_{}.csv", date.format("%Y-%m-%d")))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.file_mutex
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

impl BookingStore for CsvBookingStore {
    fn load_bookings(&self, date: NaiveDate) -> Result<Vec<Booking>, StorageError> {
        let _lock = self.lock()?;
        let path = self.file_for(date);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No planning file for {}, starting empty", date);
                return Ok(Vec::new());
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut bookings = Vec::new();

        for result in reader.deserialize::<BookingRecord>() {
            let record = result.map_err(|source| StorageError::Csv {
                path: path.clone(),
                source,
            })?;
            let booking = record
                .into_booking()
                .map_err(|reason| StorageError::CorruptRecord {
                    path: path.clone(),
                    reason,
                })?;
            bookings.push(booking);
        }

        debug!("Loaded {} bookings for {}", bookings.len(), date);
        Ok(bookings)
    }

    fn save_bookings(&self, date: NaiveDate, bookings: &[Booking]) -> Result<(), StorageError> {
        let _lock = self.lock()?;
        let path = self.file_for(date);
        let tmp_path = path.with_extension("csv.tmp");

        let file = File::create(&tmp_path).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        let csv_error = |source| StorageError::Csv {
            path: tmp_path.clone(),
            source,
        };

        writer.write_record(HEADERS).map_err(csv_error)?;
        for booking in bookings {
            writer
                .serialize(BookingRecord::from(booking))
                .map_err(csv_error)?;
        }
        writer.flush().map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        drop(writer);

        fs::rename(&tmp_path, &path).map_err(|source| {
            error!("Failed to replace planning file {}: {}", path.display(), source);
            StorageError::Io {
                path: path.clone(),
                source,
            }
        })?;

        info!("Saved {} bookings for {}", bookings.len(), date);
        Ok(())
    }
}

// Create the booking store from configuration
pub fn create_booking_store(config: &Config) -> Result<Arc<CsvBookingStore>, StorageError> {
    fs::create_dir_all(&config.data_dir).map_err(|source| StorageError::Io {
        path: config.data_dir.clone(),
        source,
    })?;

    info!("Planning files stored in {}", config.data_dir.display());
    Ok(Arc::new(CsvBookingStore::new(&config.data_dir)))
}
