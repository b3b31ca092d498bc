use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use super::{ExportError, ResultRow};

/// Write rows as CSV with a header line
pub fn write_csv<W: Write>(rows: &[ResultRow], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array
pub fn write_json<W: Write>(rows: &[ResultRow], writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}

/// Write rows to `path`, as JSON when `json` is set and CSV otherwise
pub fn write_results<P: AsRef<Path>>(
    rows: &[ResultRow],
    path: P,
    json: bool,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    if json {
        write_json(rows, &mut writer)?;
    } else {
        write_csv(rows, &mut writer)?;
    }
    writer.flush()?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
