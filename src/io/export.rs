//! CSV export for shaped series and component tables.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::network::ComponentTable;
use crate::shape::Unavailable;
use crate::shape::timeseries::ShapedSeries;
use crate::views::{Panel, ViewOutput};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The view part that would be exported has no data.
    #[error("nothing to export: {0}")]
    Unavailable(Unavailable),
}

/// Exports what a view shows: the chart of the temporal view, the
/// component table of the summary and geospatial views, the YAML text of
/// the metadata view.
///
/// # Errors
///
/// Returns [`ExportError::Unavailable`] when that part carries a notice.
pub fn export_view(output: &ViewOutput<'_>, path: &Path) -> Result<(), ExportError> {
    let written = match output {
        ViewOutput::Temporal(view) => match &view.chart {
            Panel::Ready(chart) => export_series(&chart.series, path),
            Panel::Unavailable(notice) => return Err(ExportError::Unavailable(notice.clone())),
        },
        ViewOutput::Summary(view) => section_table(&view.section.table, path)?,
        ViewOutput::Geospatial(view) => section_table(&view.section.table, path)?,
        ViewOutput::Metadata(view) => fs::write(path, &view.yaml),
    };
    written.map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn section_table(table: &Panel<&ComponentTable>, path: &Path) -> Result<io::Result<()>, ExportError> {
    match table {
        Panel::Ready(table) => Ok(export_table(table, path)),
        Panel::Unavailable(notice) => Err(ExportError::Unavailable(notice.clone())),
    }
}

/// Exports a shaped series to a CSV file at the given path.
///
/// One row per snapshot; missing values are written as empty cells.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series(series: &ShapedSeries, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_series(series, io::BufWriter::new(file))
}

/// Writes a shaped series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series(series: &ShapedSeries, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    let columns = series.series();

    let mut header = vec!["snapshot".to_string()];
    header.extend(columns.iter().map(|(name, _)| (*name).to_string()));
    wtr.write_record(&header)?;

    for (row, snapshot) in series.index().iter().enumerate() {
        let mut record = vec![snapshot.to_string()];
        record.extend(
            columns
                .iter()
                .map(|(_, values)| values[row].map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a component table to a CSV file, id column first.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_table(table: &ComponentTable, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_table(table, io::BufWriter::new(file))
}

/// Writes a component table as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_table(table: &ComponentTable, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header = vec!["name"];
    header.extend(table.column_names());
    wtr.write_record(&header)?;

    for (row, id) in table.ids().iter().enumerate() {
        let mut record = vec![id.clone()];
        record.extend(table.column_names().map(|col| table.display_cell(row, col)));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
