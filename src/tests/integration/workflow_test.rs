#[cfg(test)]
mod workflow_tests {
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::handlers::api::DayScheduleResponse;
    use crate::models::booking::Booking;
    use crate::models::schedule::RowKind;
    use crate::services::storage::BookingStore;
    use crate::tests::common::fixtures::{class_form, csv_test_server, printer_form};

    #[tokio::test]
    async fn test_conflicting_and_touching_bookings() {
        let (server, store, _dir) = csv_test_server();

        // T1 on A1, 09:00 for an hour
        let response = server
            .post("/bookings")
            .json(&printer_form("A1", "2024-03-05", "09:00:00", 60, "T1"))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        // T2 overlapping T1 is refused and names T1
        let response = server
            .post("/bookings")
            .json(&printer_form("A1", "2024-03-05", "09:30:00", 30, "T2"))
            .await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["code"], "CONFLICT");
        assert!(body["message"].as_str().unwrap().contains("'T1'"));

        // T2 starting exactly when T1 ends is accepted
        let response = server
            .post("/bookings")
            .json(&printer_form("A1", "2024-03-05", "10:00:00", 30, "T2"))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let stored = store
            .load_bookings(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
            .unwrap();
        let tickets: Vec<&str> = stored.iter().map(|b| b.ticket.as_str()).collect();
        assert_eq!(tickets, vec!["T1", "T2"]);
    }

    #[tokio::test]
    async fn test_overnight_job_lifecycle() {
        let (server, _store, _dir) = csv_test_server();

        // A class booking at the end of the window that runs past midnight
        let response = server
            .post("/bookings")
            .json(&class_form("B", "2024-01-01", "17:00:00", 480, "overnight"))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let created: Booking = response.json();
        assert_eq!(created.printer.to_string(), "B1");

        // Shown on the next day from midnight until 01:00
        let schedule: DayScheduleResponse = server.get("/schedule/2024-01-02").await.json();
        assert_eq!(schedule.rows.len(), 1);
        assert_eq!(schedule.rows[0].kind, RowKind::Spillover);
        assert_eq!(schedule.rows[0].duration_minutes, 60);

        // Not cancellable from the next day, with a hint to look at the day before
        let response = server
            .delete("/bookings/2024-01-02")
            .add_query_param("ticket", "overnight")
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert!(body["details"].as_str().unwrap().contains("previous day"));

        // Cancelled from the day it started, it disappears from both days
        let response = server
            .delete("/bookings/2024-01-01")
            .add_query_param("ticket", "overnight")
            .await;
        response.assert_status_ok();

        let schedule: DayScheduleResponse = server.get("/schedule/2024-01-02").await.json();
        assert!(schedule.rows.is_empty());
        let schedule: DayScheduleResponse = server.get("/schedule/2024-01-01").await.json();
        assert!(schedule.rows.is_empty());
    }
}
