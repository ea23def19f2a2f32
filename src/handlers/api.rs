use axum::{
    extract::{Json as ExtractJson, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::models::booking::Booking;
use crate::models::common::{CancelParams, PrinterListParams, ScheduleParams, UsageParams};
use crate::models::form::{BookingForm, CancelResponse};
use crate::models::printer::{PrinterId, PrinterPool};
use crate::models::schedule::{PrinterUsage, ScheduleRow};
use crate::services::allocation::{self, Violation};
use crate::services::report::usage_csv_string;
use crate::services::storage::BookingStore;

/// Longest period a usage report may cover, bounds included.
pub const MAX_REPORT_DAYS: i64 = 366;

// AppState struct containing shared resources
pub struct AppState {
    pub pool: PrinterPool,
    pub store: Arc<dyn BookingStore>,
    /// Held across load → allocate → save so concurrent requests never
    /// interleave a read-modify-write of the planning files.
    pub write_lock: Mutex<()>,
}

impl AppState {
    pub fn new(pool: PrinterPool, store: Arc<dyn BookingStore>) -> Self {
        Self {
            pool,
            store,
            write_lock: Mutex::new(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrintersResponse {
    pub printers: Vec<PrinterId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayScheduleResponse {
    pub date: NaiveDate,
    pub rows: Vec<ScheduleRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub usage: Vec<PrinterUsage>,
}

// List printers endpoint
pub async fn list_printers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PrinterListParams>,
) -> Json<PrintersResponse> {
    let printers = state.pool.list_printers(params.class.as_deref());
    info!(
        "Listing {} printers for class {:?}",
        printers.len(),
        params.class
    );
    Json(PrintersResponse { printers })
}

// Dry-run validation endpoint, always answers 200 with the violation list
pub async fn validate_booking(
    State(state): State<Arc<AppState>>,
    ExtractJson(form): ExtractJson<BookingForm>,
) -> Result<Json<ValidationResponse>, AppError> {
    let request = form.into_request().map_err(AppError::BadRequest)?;
    let violations = allocation::validate(&state.pool, &request);

    Ok(Json(ValidationResponse {
        valid: violations.is_empty(),
        violations,
    }))
}

// Create booking endpoint
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    ExtractJson(form): ExtractJson<BookingForm>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let request = form.into_request().map_err(AppError::BadRequest)?;
    let date = request.start.date();

    info!(
        "Received booking request for ticket '{}' on {:?} at {} ({} min)",
        request.ticket, request.target, request.start, request.duration_minutes
    );

    let _guard = state.write_lock.lock().await;

    let mut bookings = state.store.load_bookings(date).map_err(|e| {
        error!("Failed to load planning for {}: {}", date, e);
        AppError::Storage(e)
    })?;

    let booking = allocation::allocate(&state.pool, &bookings, &request).map_err(|e| {
        warn!("Booking for ticket '{}' rejected: {}", request.ticket, e);
        AppError::Allocation(e)
    })?;

    bookings.push(booking.clone());
    state.store.save_bookings(date, &bookings).map_err(|e| {
        error!("Failed to save planning for {}: {}", date, e);
        AppError::Storage(e)
    })?;

    info!(
        "Booked ticket '{}' on printer {} from {} to {}",
        booking.ticket,
        booking.printer,
        booking.start,
        booking.end()
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

// Cancel booking endpoint, only searches the bookings stored under `date`.
// The ticket travels as a query parameter so labels containing '/' still work.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
    Query(CancelParams { ticket }): Query<CancelParams>,
) -> Result<Json<CancelResponse>, AppError> {
    info!("Received request to cancel ticket '{}' on {}", ticket, date);

    let _guard = state.write_lock.lock().await;

    let bookings = state.store.load_bookings(date).map_err(|e| {
        error!("Failed to load planning for {}: {}", date, e);
        AppError::Storage(e)
    })?;

    let (remaining, removed) = allocation::cancel(&bookings, &ticket, date).map_err(|e| {
        warn!("Cancellation rejected: {}", e);
        AppError::Allocation(e)
    })?;

    state.store.save_bookings(date, &remaining).map_err(|e| {
        error!("Failed to save planning for {}: {}", date, e);
        AppError::Storage(e)
    })?;

    info!(
        "Cancelled ticket '{}' on printer {} ({})",
        removed.ticket, removed.printer, date
    );

    Ok(Json(CancelResponse {
        success: true,
        message: format!("Print job '{}' cancelled", removed.ticket),
        ticket: removed.ticket,
        printer: removed.printer.to_string(),
    }))
}

// Day schedule endpoint, includes jobs spilling over from the previous day
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(date): Path<NaiveDate>,
    Query(params): Query<ScheduleParams>,
) -> Result<Json<DayScheduleResponse>, AppError> {
    let day_bookings = state.store.load_bookings(date).map_err(|e| {
        error!("Failed to load planning for {}: {}", date, e);
        AppError::Storage(e)
    })?;

    let previous_bookings = match date.pred_opt() {
        Some(previous) => state.store.load_bookings(previous).map_err(|e| {
            error!("Failed to load planning for {}: {}", previous, e);
            AppError::Storage(e)
        })?,
        None => Vec::new(),
    };

    let rows = allocation::build_day_schedule(
        &state.pool,
        &day_bookings,
        &previous_bookings,
        date,
        params.idle,
    );

    info!("Built schedule for {} with {} rows", date, rows.len());

    Ok(Json(DayScheduleResponse { date, rows }))
}

fn load_usage(state: &AppState, params: &UsageParams) -> Result<Vec<PrinterUsage>, AppError> {
    if params.end < params.start {
        return Err(AppError::BadRequest(format!(
            "Report end {} is before start {}",
            params.end, params.start
        )));
    }
    if (params.end - params.start).num_days() >= MAX_REPORT_DAYS {
        return Err(AppError::BadRequest(format!(
            "Report from {} to {} spans more than {} days",
            params.start, params.end, MAX_REPORT_DAYS
        )));
    }

    let bookings = state
        .store
        .load_range(params.start, params.end)
        .map_err(|e| {
            error!(
                "Failed to load planning from {} to {}: {}",
                params.start, params.end, e
            );
            AppError::Storage(e)
        })?;

    Ok(allocation::summarize_usage(
        &state.pool,
        &bookings,
        params.start,
        params.end,
    ))
}

// Usage summary endpoint
pub async fn usage_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UsageParams>,
) -> Result<Json<UsageResponse>, AppError> {
    let usage = load_usage(&state, &params)?;

    Ok(Json(UsageResponse {
        start: params.start,
        end: params.end,
        usage,
    }))
}

// Usage export endpoint, serves the summary as a CSV download
pub async fn export_usage(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UsageParams>,
) -> Result<impl IntoResponse, AppError> {
    let usage = load_usage(&state, &params)?;
    let body = usage_csv_string(&usage)
        .map_err(|e| AppError::Internal(format!("Failed to render usage export: {}", e)))?;

    info!(
        "Exported usage for {} printers from {} to {}",
        usage.len(),
        params.start,
        params.end
    );

    let disposition = format!(
        "attachment; filename=\"usage_{}_{}.csv\"",
        params.start, params.end
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
