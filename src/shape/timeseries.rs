//! Time-series shaping: alignment, entity selection and aggregation.
//!
//! Every call first drops entity columns that are missing across the whole
//! time axis. What follows depends on [`ShapeMode`]; the alignment policy
//! differs between modes:
//!
//! - `Individual` and `AggregateByCarrier` keep only fully dense rows.
//! - `SumAll` treats missing cells as zero and drops a row only when every
//!   column in it is missing.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::network::{ComponentKind, Snapshot, TimeSeriesTable};

use super::Unavailable;
use super::carrier::CarrierLookup;

/// How the entity columns of a time-series table are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeMode {
    /// One series per selected entity.
    Individual,
    /// One series per carrier, summed over its entities.
    AggregateByCarrier,
    /// One series, summed over every entity.
    SumAll,
}

impl ShapeMode {
    /// Short label shown on mode selectors.
    pub fn label(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::AggregateByCarrier => "Aggregate by type",
            Self::SumAll => "Sum all",
        }
    }
}

impl fmt::Display for ShapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShapeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "carrier" | "aggregate" | "aggregate_by_carrier" | "type" => {
                Ok(Self::AggregateByCarrier)
            }
            "sum" | "sum_all" | "total" => Ok(Self::SumAll),
            other => Err(format!(
                "unknown view option \"{other}\", expected individual, carrier or sum"
            )),
        }
    }
}

/// Entities chosen for [`ShapeMode::Individual`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// No prior selection: the first aligned column is used.
    #[default]
    FirstAvailable,
    /// An explicit choice, in display order. May be empty.
    Entities(Vec<String>),
}

impl Selection {
    /// An explicit selection.
    pub fn of<S: Into<String>>(entities: impl IntoIterator<Item = S>) -> Self {
        Self::Entities(entities.into_iter().map(Into::into).collect())
    }
}

/// A single unnamed series, e.g. the sum over all entities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalSeries {
    /// Time axis.
    pub index: Vec<Snapshot>,
    /// One value per snapshot.
    pub values: Vec<f64>,
}

/// Output of [`shape`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ShapedSeries {
    /// Entity-keyed series (individual mode or the single-column bypass).
    Entities(TimeSeriesTable),
    /// Carrier-keyed series, already summed per carrier.
    Carriers(TimeSeriesTable),
    /// One total series.
    Total(TotalSeries),
}

impl ShapedSeries {
    /// The time axis of the shaped output.
    pub fn index(&self) -> &[Snapshot] {
        match self {
            Self::Entities(table) | Self::Carriers(table) => table.index(),
            Self::Total(total) => &total.index,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index().len()
    }

    /// Returns `true` when no row survived.
    pub fn is_empty(&self) -> bool {
        self.index().is_empty()
    }

    /// Series names, with `"total"` for the summed series.
    pub fn series_names(&self) -> Vec<&str> {
        match self {
            Self::Entities(table) | Self::Carriers(table) => table.column_names().collect(),
            Self::Total(_) => vec!["total"],
        }
    }

    /// Iterates `(name, values)` over every series.
    pub fn series(&self) -> Vec<(&str, Vec<Option<f64>>)> {
        match self {
            Self::Entities(table) | Self::Carriers(table) => table
                .columns()
                .map(|(name, values)| (name, values.to_vec()))
                .collect(),
            Self::Total(total) => vec![("total", total.values.iter().copied().map(Some).collect())],
        }
    }
}

/// Drops the columns that are missing at every snapshot. Idempotent.
pub fn align(ts: &TimeSeriesTable) -> TimeSeriesTable {
    ts.drop_empty_columns()
}

/// Shapes one time-series attribute of a component kind.
///
/// `kind` and `attribute` only label the notices returned on failure.
/// `carriers` is required for [`ShapeMode::AggregateByCarrier`] and ignored
/// otherwise.
///
/// # Errors
///
/// Returns [`Unavailable`] when nothing is left after alignment, the selection
/// is empty, no entity has a carrier, or the shaped result has zero rows.
pub fn shape(
    kind: ComponentKind,
    attribute: &str,
    ts: &TimeSeriesTable,
    mode: ShapeMode,
    selection: &Selection,
    carriers: Option<&CarrierLookup>,
) -> Result<ShapedSeries, Unavailable> {
    let empty = || Unavailable::EmptySeries {
        kind,
        attribute: attribute.to_string(),
    };

    let aligned = align(ts);
    if aligned.is_empty() {
        return Err(empty());
    }
    if aligned.column_count() == 1 {
        return Ok(ShapedSeries::Entities(aligned));
    }

    let shaped = match mode {
        ShapeMode::Individual => ShapedSeries::Entities(individual(kind, &aligned, selection)?),
        ShapeMode::AggregateByCarrier => {
            let lookup = carriers.ok_or(Unavailable::NoCarrierGroups { kind })?;
            ShapedSeries::Carriers(by_carrier(kind, &aligned, lookup)?)
        }
        ShapeMode::SumAll => ShapedSeries::Total(sum_all(&aligned)),
    };

    if shaped.is_empty() {
        return Err(empty());
    }
    Ok(shaped)
}

fn individual(
    kind: ComponentKind,
    aligned: &TimeSeriesTable,
    selection: &Selection,
) -> Result<TimeSeriesTable, Unavailable> {
    let chosen: Vec<&str> = match selection {
        Selection::FirstAvailable => aligned.column_names().take(1).collect(),
        Selection::Entities(entities) => entities.iter().map(String::as_str).collect(),
    };
    let picked = aligned.select(&chosen);
    if picked.column_count() == 0 {
        return Err(Unavailable::EmptySelection { kind });
    }
    Ok(picked.drop_incomplete_rows())
}

fn by_carrier(
    kind: ComponentKind,
    aligned: &TimeSeriesTable,
    lookup: &CarrierLookup,
) -> Result<TimeSeriesTable, Unavailable> {
    let mut groups: IndexMap<&str, Vec<&[Option<f64>]>> = IndexMap::new();
    for (entity, values) in aligned.columns() {
        if let Some(carrier) = lookup.get(entity) {
            groups.entry(carrier).or_default().push(values);
        }
    }
    if groups.is_empty() {
        return Err(Unavailable::NoCarrierGroups { kind });
    }

    let columns = groups
        .into_iter()
        .map(|(carrier, members)| {
            let values = (0..aligned.len())
                .map(|row| members.iter().map(|col| col[row]).sum::<Option<f64>>())
                .collect();
            (carrier.to_string(), values)
        })
        .collect();
    let summed = TimeSeriesTable::from_columns(aligned.index().to_vec(), columns);
    Ok(summed.drop_incomplete_rows())
}

fn sum_all(aligned: &TimeSeriesTable) -> TotalSeries {
    let mut index = Vec::with_capacity(aligned.len());
    let mut values = Vec::with_capacity(aligned.len());
    for (row, snapshot) in aligned.index().iter().enumerate() {
        let cells = aligned.columns().filter_map(|(_, col)| col[row]);
        let total = cells.fold(None, |acc: Option<f64>, v| Some(acc.unwrap_or(0.0) + v));
        if let Some(total) = total {
            index.push(snapshot.clone());
            values.push(total);
        }
    }
    TotalSeries { index, values }
}
