//! Row sink — ordering and CSV serialization of the generated events.

use crate::{error::GenResult, simulator::EventRow};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 3] = ["user_id", "signup_date", "event_date"];

/// Sort by (signup_date, user_id, event_date).
///
/// Dates compare chronologically, which matches string order for
/// `YYYY-MM-DD`. User ids compare as strings.
pub fn sort_rows(rows: &mut [EventRow]) {
    rows.sort_by(|a, b| {
        (a.signup_date, a.user_id.as_str(), a.event_date)
            .cmp(&(b.signup_date, b.user_id.as_str(), b.event_date))
    });
}

pub fn is_sorted(rows: &[EventRow]) -> bool {
    rows.windows(2).all(|w| {
        (w[0].signup_date, w[0].user_id.as_str(), w[0].event_date)
            <= (w[1].signup_date, w[1].user_id.as_str(), w[1].event_date)
    })
}

/// Write the header and every row to `writer`.
pub fn write_rows<W: Write>(writer: W, rows: &[EventRow]) -> GenResult<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}

/// Create (or truncate) the file at `path` and write all rows to it.
/// Missing parent directories are created. Returns the canonical path
/// of the written file.
pub fn write_csv(path: &Path, rows: &[EventRow]) -> GenResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_rows(std::io::BufWriter::new(file), rows)?;
    let written = std::fs::canonicalize(path)?;
    log::info!("wrote {} rows to {}", rows.len(), written.display());
    Ok(written)
}
