#[cfg(test)]
mod storage_tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use std::fs;
    use tempfile::tempdir;

    use crate::error::StorageError;
    use crate::models::booking::Booking;
    use crate::services::allocation::ticket_color;
    use crate::services::storage::{BookingStore, CsvBookingStore};

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    fn booking(printer: &str, start: &str, duration: i64, ticket: &str) -> Booking {
        Booking {
            printer: printer.parse().unwrap(),
            start: NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M").unwrap(),
            duration_minutes: duration,
            ticket: ticket.to_string(),
            color: ticket_color(ticket),
        }
    }

    #[test]
    fn test_load_missing_day_is_empty() {
        let dir = tempdir().unwrap();
        let store = CsvBookingStore::new(dir.path());

        let bookings = store.load_bookings(day("2024-03-05")).unwrap();
        assert!(bookings.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = CsvBookingStore::new(dir.path());
        let date = day("2024-03-05");

        let bookings = vec![
            booking("A1", "2024-03-05 09:00", 60, "T1"),
            booking("B6", "2024-03-05 16:45", 600, "long, with comma"),
            booking("A10", "2024-03-05 08:00", 1440, "T3"),
        ];
        store.save_bookings(date, &bookings).unwrap();

        let mut loaded = store.load_bookings(date).unwrap();
        let mut expected = bookings.clone();
        loaded.sort_by(|a, b| a.ticket.cmp(&b.ticket));
        expected.sort_by(|a, b| a.ticket.cmp(&b.ticket));
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_save_replaces_whole_day() {
        let dir = tempdir().unwrap();
        let store = CsvBookingStore::new(dir.path());
        let date = day("2024-03-05");

        store
            .save_bookings(
                date,
                &[
                    booking("A1", "2024-03-05 09:00", 60, "T1"),
                    booking("A2", "2024-03-05 09:00", 60, "T2"),
                ],
            )
            .unwrap();
        store
            .save_bookings(date, &[booking("A3", "2024-03-05 10:00", 30, "T3")])
            .unwrap();

        let loaded = store.load_bookings(date).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].ticket, "T3");

        // Saving nothing leaves an empty but readable day
        store.save_bookings(date, &[]).unwrap();
        assert!(store.load_bookings(date).unwrap().is_empty());
    }

    #[test]
    fn test_days_are_stored_separately() {
        let dir = tempdir().unwrap();
        let store = CsvBookingStore::new(dir.path());

        store
            .save_bookings(day("2024-03-05"), &[booking("A1", "2024-03-05 09:00", 60, "T1")])
            .unwrap();
        store
            .save_bookings(day("2024-03-06"), &[booking("A1", "2024-03-06 09:00", 60, "T2")])
            .unwrap();

        assert!(store.file_for(day("2024-03-05")).ends_with("planning_2024-03-05.csv"));
        assert_eq!(store.load_bookings(day("2024-03-05")).unwrap()[0].ticket, "T1");
        assert_eq!(store.load_bookings(day("2024-03-06")).unwrap()[0].ticket, "T2");

        let range = store.load_range(day("2024-03-04"), day("2024-03-06")).unwrap();
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn test_file_layout_matches_planning_columns() {
        let dir = tempdir().unwrap();
        let store = CsvBookingStore::new(dir.path());
        let date = day("2024-01-01");

        store
            .save_bookings(date, &[booking("A7", "2024-01-01 23:30", 90, "night")])
            .unwrap();

        let content = fs::read_to_string(store.file_for(date)).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Printer,Start,Duration,Ticket,Color"));
        assert_eq!(
            lines.next(),
            Some(format!("A7,2024-01-01 23:30:00,90,night,{}", ticket_color("night")).as_str())
        );
    }

    #[test]
    fn test_load_accepts_iso_start_column() {
        let dir = tempdir().unwrap();
        let store = CsvBookingStore::new(dir.path());
        let date = day("2024-03-05");

        fs::write(
            store.file_for(date),
            "Printer,Start,Duration,Ticket,Color\nB2,2024-03-05T09:15:00,45,T9,#abcdef\n",
        )
        .unwrap();

        let loaded = store.load_bookings(date).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].printer.to_string(), "B2");
        assert_eq!(loaded[0].duration_minutes, 45);
        assert_eq!(loaded[0].color, "#abcdef");
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_an_empty_day() {
        let dir = tempdir().unwrap();
        let store = CsvBookingStore::new(dir.path());
        let date = day("2024-03-05");

        fs::write(
            store.file_for(date),
            "Printer,Start,Duration,Ticket,Color\n??,yesterday,45,T9,#abcdef\n",
        )
        .unwrap();

        match store.load_bookings(date) {
            Err(e @ StorageError::CorruptRecord { .. }) => assert!(e.is_retryable()),
            other => panic!("expected corrupt record error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_rows_are_corrupt_records() {
        let dir = tempdir().unwrap();
        let store = CsvBookingStore::new(dir.path());
        let date = day("2024-03-05");

        let rows = [
            "A1,2024-03-05 09:00:00,9223372036854775807,T1,#abcdef",
            "A1,2024-03-05 09:00:00,1441,T1,#abcdef",
            "A1,2024-03-05 09:00:00,0,T1,#abcdef",
            "A1,2024-03-05 09:00:00,-30,T1,#abcdef",
            "A1,2024-03-05 09:00:00,60,  ,#abcdef",
        ];

        for row in rows {
            fs::write(
                store.file_for(date),
                format!("Printer,Start,Duration,Ticket,Color\n{}\n", row),
            )
            .unwrap();

            match store.load_bookings(date) {
                Err(StorageError::CorruptRecord { reason, .. }) => assert!(!reason.is_empty()),
                other => panic!("expected corrupt record error for {:?}, got {:?}", row, other),
            }
        }
    }

    #[test]
    fn test_unreadable_duration_is_a_csv_error() {
        let dir = tempdir().unwrap();
        let store = CsvBookingStore::new(dir.path());
        let date = day("2024-03-05");

        fs::write(
            store.file_for(date),
            "Printer,Start,Duration,Ticket,Color\nA1,2024-03-05 09:00:00,sixty,T1,#abcdef\n",
        )
        .unwrap();

        assert!(matches!(
            store.load_bookings(date),
            Err(StorageError::Csv { .. })
        ));
    }
}
