//! Tabular output of a [`FieldLayout`].
//!
//! The CSV format has the header `id,x,y,z` followed by one row per heliostat in
//! emission order, coordinates in meters.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::layout::runner::FieldLayout;

pub const CSV_HEADER: [&str; 4] = ["id", "x", "y", "z"];

/// Writes the heliostats of `layout` as CSV into `writer`.
pub fn write_csv<W: Write>(layout: &FieldLayout, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for h in &layout.heliostats {
        csv.write_record([
            h.id.to_string(),
            h.position.x.to_string(),
            h.position.y.to_string(),
            h.position.z.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the heliostats of `layout` as CSV to the file at `path`, replacing it.
pub fn write_csv_to_path(layout: &FieldLayout, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv(layout, BufWriter::new(file))?;
    info!(
        "Wrote {} heliostats to {}.",
        layout.heliostats.len(),
        path.display()
    );
    Ok(())
}

/// Renders the heliostats of `layout` as a CSV string.
pub fn to_csv_string(layout: &FieldLayout) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(layout, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
