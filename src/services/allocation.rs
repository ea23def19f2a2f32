//! Printer slot allocation.
//!
//! Every function here works on a snapshot of bookings handed in by the
//! caller and returns new values; nothing is read from or written to storage
//! and no input is mutated. Callers load a day, run the engine, then persist
//! whatever it returned.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::error::AllocationError;
use crate::models::booking::{checked_end, Booking, BookingRequest, PrinterTarget};
use crate::models::printer::{PrinterId, PrinterPool};
use crate::models::schedule::{PrinterUsage, RowKind, ScheduleRow};

/// Longest job accepted, in minutes.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

pub fn opening_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default()
}

pub fn last_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    UnknownPrinter,
    UnknownClass,
    StartOutsideWindow,
    EmptyTicket,
    InvalidDuration,
}

/// A single structural problem with a candidate booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Derives the display color of a ticket: `#` followed by the first six hex
/// digits of the SHA-256 digest of the label.
pub fn ticket_color(ticket: &str) -> String {
    let digest = hex::encode(Sha256::digest(ticket.as_bytes()));
    format!("#{}", &digest[..6])
}

/// Checks a candidate without looking at existing bookings.
///
/// Returns every problem found, in a fixed order (printer, start, ticket,
/// duration). An empty list means the candidate is structurally valid.
pub fn validate(pool: &PrinterPool, request: &BookingRequest) -> Vec<Violation> {
    let mut violations = Vec::new();

    match &request.target {
        PrinterTarget::Printer(id) => {
            if !pool.is_valid_printer(id) {
                violations.push(Violation::new(
                    ViolationKind::UnknownPrinter,
                    format!("Unknown printer '{}'", id),
                ));
            }
        }
        PrinterTarget::Class(class) => {
            if !pool.has_class(class) || pool.list_printers(Some(class)).is_empty() {
                violations.push(Violation::new(
                    ViolationKind::UnknownClass,
                    format!("Unknown printer class '{}'", class),
                ));
            }
        }
    }

    let start_time = request.start.time();
    if start_time < opening_time() || start_time > last_start_time() {
        violations.push(Violation::new(
            ViolationKind::StartOutsideWindow,
            format!(
                "Start time {} must be between {} and {}",
                start_time.format("%H:%M"),
                opening_time().format("%H:%M"),
                last_start_time().format("%H:%M")
            ),
        ));
    }

    if request.ticket.trim().is_empty() {
        violations.push(Violation::new(
            ViolationKind::EmptyTicket,
            "Ticket number is required",
        ));
    }

    if request.duration_minutes <= 0 || request.duration_minutes > MAX_DURATION_MINUTES {
        violations.push(Violation::new(
            ViolationKind::InvalidDuration,
            format!(
                "Duration {} must be between 1 and {} minutes",
                request.duration_minutes, MAX_DURATION_MINUTES
            ),
        ));
    } else if checked_end(request.start, request.duration_minutes).is_none() {
        violations.push(Violation::new(
            ViolationKind::InvalidDuration,
            format!(
                "A {} minute job starting {} ends past the last supported date",
                request.duration_minutes, request.start
            ),
        ));
    }

    violations
}

fn overlaps(
    start: NaiveDateTime,
    end: NaiveDateTime,
    other_start: NaiveDateTime,
    other_end: NaiveDateTime,
) -> bool {
    !(end <= other_start || start >= other_end)
}

/// Returns the first booking on `printer`, stored under the candidate's day,
/// whose `[start, end)` interval intersects the candidate's.
pub fn find_conflict<'a>(
    existing: &'a [Booking],
    printer: &PrinterId,
    request: &BookingRequest,
) -> Option<&'a Booking> {
    let day = request.start.date();
    let end = request.end();

    existing
        .iter()
        .filter(|booking| &booking.printer == printer && booking.date() == day)
        .find(|booking| overlaps(request.start, end, booking.start, booking.end()))
}

/// Whether `printer` is busy during the candidate's window. Touching
/// intervals never conflict.
pub fn has_conflict(existing: &[Booking], printer: &PrinterId, request: &BookingRequest) -> bool {
    find_conflict(existing, printer, request).is_some()
}

/// First printer of `class`, in canonical order, that is free during the
/// candidate's window.
pub fn find_available_printer(
    pool: &PrinterPool,
    existing: &[Booking],
    class: &str,
    request: &BookingRequest,
) -> Option<PrinterId> {
    let chosen = pool
        .list_printers(Some(class))
        .into_iter()
        .find(|printer| !has_conflict(existing, printer, request));

    debug!(
        "Free printer search in class {} for {} ({} min): {:?}",
        class, request.start, request.duration_minutes, chosen
    );

    chosen
}

/// Places a candidate job.
///
/// Runs validation first, then the conflict check for a named printer or the
/// free-printer search for a class. On success the new booking is returned
/// for the caller to persist; `existing` is left untouched, so the same call
/// against the same snapshot always yields the same answer.
pub fn allocate(
    pool: &PrinterPool,
    existing: &[Booking],
    request: &BookingRequest,
) -> Result<Booking, AllocationError> {
    let violations = validate(pool, request);
    if !violations.is_empty() {
        return Err(AllocationError::Validation(violations));
    }

    let printer = match &request.target {
        PrinterTarget::Printer(id) => {
            let printer: PrinterId = id.parse().map_err(|reason: String| {
                AllocationError::Validation(vec![Violation::new(
                    ViolationKind::UnknownPrinter,
                    reason,
                )])
            })?;

            if let Some(booking) = find_conflict(existing, &printer, request) {
                return Err(AllocationError::Conflict {
                    printer: printer.to_string(),
                    ticket: booking.ticket.clone(),
                    start: booking.start,
                    end: booking.end(),
                });
            }
            printer
        }
        PrinterTarget::Class(class) => find_available_printer(pool, existing, class, request)
            .ok_or_else(|| AllocationError::NoCapacity {
                class: class.clone(),
                start: request.start,
                end: request.end(),
            })?,
    };

    Ok(Booking {
        printer,
        start: request.start,
        duration_minutes: request.duration_minutes,
        ticket: request.ticket.clone(),
        color: ticket_color(&request.ticket),
    })
}

/// Removes the first booking with `ticket` among those stored under `date`.
///
/// Only the given day's own bookings are searched. A job that started the
/// day before and runs past midnight must be cancelled from that previous day.
pub fn cancel(
    day_bookings: &[Booking],
    ticket: &str,
    date: NaiveDate,
) -> Result<(Vec<Booking>, Booking), AllocationError> {
    let index = day_bookings
        .iter()
        .position(|booking| booking.date() == date && booking.ticket == ticket)
        .ok_or_else(|| AllocationError::NotFound {
            ticket: ticket.to_string(),
            date,
        })?;

    let mut remaining = day_bookings.to_vec();
    let removed = remaining.remove(index);
    Ok((remaining, removed))
}

/// Projects the stored bookings of `date` and of the day before into
/// render-ready rows.
///
/// Previous-day jobs still running at midnight are shown from 00:00 with
/// their remaining duration, which is zero for a job ending exactly at 00:00. With `include_idle`, every printer of the pool
/// without any row gets a zero-length placeholder at 00:00. Rows are ordered
/// by printer canonical order, then by displayed start.
pub fn build_day_schedule(
    pool: &PrinterPool,
    day_bookings: &[Booking],
    previous_day_bookings: &[Booking],
    date: NaiveDate,
    include_idle: bool,
) -> Vec<ScheduleRow> {
    let midnight = date.and_time(NaiveTime::default());
    let mut rows = Vec::new();

    for booking in previous_day_bookings {
        let end = booking.end();
        // A job ending exactly at 00:00 still shows as a zero-length row
        if end < midnight {
            continue;
        }
        rows.push(ScheduleRow {
            printer: booking.printer.clone(),
            start: midnight,
            duration_minutes: (end - midnight).num_minutes(),
            ticket: Some(booking.ticket.clone()),
            color: Some(booking.color.clone()),
            kind: RowKind::Spillover,
        });
    }

    rows.extend(
        day_bookings
            .iter()
            .filter(|booking| booking.date() == date)
            .map(|booking| ScheduleRow {
                printer: booking.printer.clone(),
                start: booking.start,
                duration_minutes: booking.duration_minutes,
                ticket: Some(booking.ticket.clone()),
                color: Some(booking.color.clone()),
                kind: RowKind::Booked,
            }),
    );

    if include_idle {
        let busy: HashSet<PrinterId> = rows.iter().map(|row| row.printer.clone()).collect();
        rows.extend(
            pool.list_printers(None)
                .into_iter()
                .filter(|printer| !busy.contains(printer))
                .map(|printer| ScheduleRow {
                    printer,
                    start: midnight,
                    duration_minutes: 0,
                    ticket: None,
                    color: None,
                    kind: RowKind::Idle,
                }),
        );
    }

    // Printers outside the pool sort after every known printer
    rows.sort_by(|a, b| {
        let rank_a = pool.position(&a.printer).unwrap_or(usize::MAX);
        let rank_b = pool.position(&b.printer).unwrap_or(usize::MAX);
        rank_a
            .cmp(&rank_b)
            .then_with(|| a.printer.cmp(&b.printer))
            .then_with(|| a.start.cmp(&b.start))
    });

    rows
}

/// Total booked minutes per printer for bookings starting within
/// `[start_date, end_date]`.
///
/// Every printer of the pool is listed in canonical order, with zero when it
/// was unused; bookings on printers unknown to the pool are appended after.
pub fn summarize_usage(
    pool: &PrinterPool,
    bookings: &[Booking],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<PrinterUsage> {
    let mut totals: BTreeMap<PrinterId, i64> = BTreeMap::new();
    for booking in bookings {
        let day = booking.date();
        if day >= start_date && day <= end_date {
            *totals.entry(booking.printer.clone()).or_insert(0) += booking.duration_minutes;
        }
    }

    let mut usage: Vec<PrinterUsage> = pool
        .list_printers(None)
        .into_iter()
        .map(|printer| PrinterUsage {
            total_minutes: totals.remove(&printer).unwrap_or(0),
            printer,
        })
        .collect();

    usage.extend(
        totals
            .into_iter()
            .map(|(printer, total_minutes)| PrinterUsage {
                printer,
                total_minutes,
            }),
    );

    usage
}

