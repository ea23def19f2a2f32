use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{
    cancel_booking, create_booking, export_usage, get_schedule, list_printers, usage_summary,
    validate_booking, AppState,
};
use crate::handlers::health::health_check;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let health_route = Router::new().route("/health", get(health_check));

    let planning_routes = Router::new()
        .route("/printers", get(list_printers))
        .route("/bookings", post(create_booking))
        .route("/bookings/validate", post(validate_booking))
        .route("/bookings/:date", delete(cancel_booking))
        .route("/schedule/:date", get(get_schedule));

    let report_routes = Router::new()
        .route("/usage", get(usage_summary))
        .route("/usage/export", get(export_usage));

    info!("Planning and report routes registered");

    Router::new()
        .merge(health_route)
        .merge(planning_routes)
        .merge(report_routes)
        .with_state(app_state)
}
