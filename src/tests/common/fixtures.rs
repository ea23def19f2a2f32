use axum_test::{TestServer, TestServerConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use crate::handlers::api::AppState;
use crate::models::printer::PrinterPool;
use crate::routes::create_router;
use crate::services::storage::{BookingStore, CsvBookingStore};

/// Booking form for a named printer, as the planning UI posts it
pub fn printer_form(printer: &str, date: &str, start_time: &str, duration: i64, ticket: &str) -> Value {
    json!({
        "printer": printer,
        "date": date,
        "start_time": start_time,
        "duration_minutes": duration,
        "ticket": ticket,
    })
}

/// Booking form asking for any free printer of a class
pub fn class_form(class: &str, date: &str, start_time: &str, duration: i64, ticket: &str) -> Value {
    json!({
        "class": class,
        "date": date,
        "start_time": start_time,
        "duration_minutes": duration,
        "ticket": ticket,
    })
}

/// Build a test server over the given store with the default printer pool
pub fn server_with_store(store: Arc<dyn BookingStore>) -> TestServer {
    let app_state = Arc::new(AppState::new(PrinterPool::default(), store));
    let router = create_router(app_state);

    let config = TestServerConfig::builder().mock_transport().build();
    TestServer::new_with_config(router, config).unwrap()
}

/// Build a test server backed by CSV files in a fresh temporary directory.
/// The directory lives as long as the returned `TempDir`.
pub fn csv_test_server() -> (TestServer, Arc<CsvBookingStore>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CsvBookingStore::new(dir.path()));
    let server = server_with_store(store.clone());
    (server, store, dir)
}
