//! 3D Print Planning Service
//!
//! This library assigns print jobs ("tickets") to a fixed pool of 3D
//! printers, prevents overlapping jobs on any printer and projects each day
//! into a render-ready timeline, including jobs that run past midnight.
//!
//! # Modules
//!
//! - `models`: printer pool, bookings, schedule rows and request forms
//! - `services::allocation`: the pure allocation engine (validation, conflict
//!   detection, free-printer search, cancellation, day schedule, usage)
//! - `services::storage`: the `BookingStore` trait and its per-day CSV store
//! - `services::report`: CSV export of usage summaries
//! - `handlers` / `routes`: the HTTP surface used by the planning UI
//!
//! # Snapshots
//!
//! The engine never touches storage. Handlers load the day's bookings, pass
//! them to the engine, and persist the returned result, so every engine call
//! can be retried against a freshly loaded snapshot.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

// Re-export the main API types for ease of use
pub use config::Config;
pub use error::{AllocationError, AppError, StorageError};
pub use handlers::api::AppState;
pub use models::{Booking, BookingRequest, PrinterId, PrinterPool, PrinterTarget};
pub use routes::create_router;
pub use services::storage::{create_booking_store, BookingStore, CsvBookingStore};
