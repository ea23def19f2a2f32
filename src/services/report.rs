use csv::WriterBuilder;
use std::io::Write;

use crate::models::schedule::PrinterUsage;

/// Writes a usage summary as `printer,total_minutes` CSV rows.
///
/// The header is always written, so an empty summary still yields a valid
/// document.
pub fn write_usage_csv<W: Write>(usage: &[PrinterUsage], writer: W) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(["printer", "total_minutes"])?;
    for row in usage {
        writer.write_record([row.printer.to_string(), row.total_minutes.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Renders a usage summary into an in-memory CSV document.
pub fn usage_csv_string(usage: &[PrinterUsage]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_usage_csv(usage, &mut buffer)?;
    // The csv writer only ever emits the UTF-8 text it was given
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
