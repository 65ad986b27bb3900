//! Reader for the csv-folder network layout.
//!
//! ```text
//! network.csv              name and scalar attributes (one row)
//! snapshots.csv            time axis (`snapshot` or `timestep` column)
//! investment_periods.csv   optional, first column
//! meta.json                optional free-form metadata
//! buses.csv, generators.csv, ...        static tables, first column is the id
//! generators-p.csv, loads-p_set.csv, ... time series, first column is the snapshot
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::network::table::is_missing_cell;
use crate::network::{
    ColumnData, ComponentKind, ComponentTable, NetworkModel, Snapshot, TimeSeriesTable,
};

use super::LoadError;

pub(super) fn read(dir: &Path) -> Result<NetworkModel, LoadError> {
    let mut network = NetworkModel::new();

    if let Some(rows) = read_optional(dir, "network.csv")? {
        if let Some(name) = rows.value(0, "name") {
            network = network.with_name(name);
        }
    }

    let snapshots = match read_optional(dir, "snapshots.csv")? {
        Some(rows) => snapshot_axis(&rows),
        None => Vec::new(),
    };
    network = network.with_snapshots(snapshots.clone());

    if let Some(rows) = read_optional(dir, "investment_periods.csv")? {
        let periods = rows
            .records
            .iter()
            .filter_map(|record| record.first())
            .map(|cell| {
                parse_period(cell).ok_or_else(|| {
                    LoadError::malformed("investment_periods.csv", format!("\"{cell}\" is not a year"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        network = network.with_investment_periods(periods);
    }

    let meta_path = dir.join("meta.json");
    if meta_path.is_file() {
        let text = fs::read_to_string(&meta_path).map_err(|e| LoadError::io(&meta_path, e))?;
        let meta = serde_json::from_str(&text).map_err(|e| LoadError::malformed("meta.json", e))?;
        network = network.with_meta(meta);
    }

    for kind in ComponentKind::ALL {
        let file = format!("{}.csv", kind.file_stem());
        if let Some(rows) = read_optional(dir, &file)? {
            network.set_table(kind, static_table(&file, &rows)?);
        }
    }

    for (kind, attribute, file) in series_files(dir)? {
        let Some(rows) = read_optional(dir, &file)? else {
            continue;
        };
        let mut table = series_table(&file, &rows)?;
        if !snapshots.is_empty() {
            table = table.reindex(&snapshots);
        }
        debug!(
            component = %kind,
            attribute = attribute.as_str(),
            columns = table.column_count(),
            "read series"
        );
        network.insert_series(kind, attribute, table);
    }

    Ok(network)
}

/// Header plus records of one csv file.
struct Rows {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Rows {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn value(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column(name)?;
        self.records.get(row)?.get(col).map(String::as_str)
    }
}

fn read_optional(dir: &Path, file: &str) -> Result<Option<Rows>, LoadError> {
    let path = dir.join(file);
    if !path.is_file() {
        return Ok(None);
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&path)
        .map_err(|e| LoadError::malformed(file, e))?;
    let headers = reader
        .headers()
        .map_err(|e| LoadError::malformed(file, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let records = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| LoadError::malformed(file, e))
        })
        .collect::<Result<Vec<Vec<String>>, _>>()?;
    Ok(Some(Rows { headers, records }))
}

fn snapshot_axis(rows: &Rows) -> Vec<Snapshot> {
    let col = rows
        .column("snapshot")
        .or_else(|| rows.column("timestep"))
        .unwrap_or(0);
    rows.records
        .iter()
        .filter_map(|record| record.get(col))
        .map(|cell| Snapshot::parse(cell))
        .collect()
}

fn parse_period(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    cell.parse::<i64>().ok().or_else(|| {
        let value = cell.parse::<f64>().ok()?;
        (value.fract() == 0.0).then_some(value as i64)
    })
}

fn static_table(file: &str, rows: &Rows) -> Result<ComponentTable, LoadError> {
    let ids = rows
        .records
        .iter()
        .map(|record| record.first().cloned().unwrap_or_default())
        .collect();
    let mut table = ComponentTable::new(ids).map_err(|e| LoadError::table(file, e))?;
    for (col, header) in rows.headers.iter().enumerate().skip(1) {
        let cells: Vec<&str> = rows
            .records
            .iter()
            .map(|record| record.get(col).map_or("", String::as_str))
            .collect();
        table
            .insert_column(header.clone(), ColumnData::read(header, &cells))
            .map_err(|e| LoadError::table(file, e))?;
    }
    Ok(table)
}

fn series_table(file: &str, rows: &Rows) -> Result<TimeSeriesTable, LoadError> {
    let index = rows
        .records
        .iter()
        .map(|record| Snapshot::parse(record.first().map_or("", String::as_str)))
        .collect();
    let mut table = TimeSeriesTable::new(index);
    for (col, header) in rows.headers.iter().enumerate().skip(1) {
        let values = rows
            .records
            .iter()
            .map(|record| parse_cell(record.get(col).map_or("", String::as_str)))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                LoadError::malformed(file, format!("non-numeric value in column \"{header}\""))
            })?;
        table
            .insert_column(header.clone(), values)
            .map_err(|e| LoadError::table(file, e))?;
    }
    Ok(table)
}

/// `Some(None)` for a missing cell, `None` for a cell that is not a number.
fn parse_cell(cell: &str) -> Option<Option<f64>> {
    let cell = cell.trim();
    if is_missing_cell(cell) {
        return Some(None);
    }
    cell.parse::<f64>().ok().map(Some)
}

/// Finds `<stem>-<attribute>.csv` files, sorted by name.
fn series_files(dir: &Path) -> Result<Vec<(ComponentKind, String, String)>, LoadError> {
    let entries = fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".csv"))
        .collect();
    names.sort();

    Ok(names
        .into_iter()
        .filter_map(|name| {
            let stem = name.strip_suffix(".csv")?;
            let (component, attribute) = stem.split_once('-')?;
            let kind = ComponentKind::ALL
                .into_iter()
                .find(|kind| kind.file_stem() == component)?;
            (!attribute.is_empty()).then(|| (kind, attribute.to_string(), name.clone()))
        })
        .collect())
}
