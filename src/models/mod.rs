pub mod booking;
pub mod common;
pub mod form;
pub mod printer;
pub mod schedule;

pub use booking::{Booking, BookingRequest, PrinterTarget};
pub use printer::{PrinterClass, PrinterId, PrinterPool};
pub use schedule::{PrinterUsage, RowKind, ScheduleRow};
