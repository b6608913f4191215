//! CSV export of record collections.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// Write records as CSV, one row per record, with a header row derived
/// from the record's field names.
pub fn write_csv<R, W>(records: &[R], writer: W) -> Result<()>
where
    R: Serialize,
    W: Write,
{
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Render records as a CSV string.
pub fn to_csv_string<R: Serialize>(records: &[R]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
