//! Time-indexed attribute tables (one column per entity).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::snapshot::Snapshot;
use super::table::TableError;

/// A table indexed by snapshot, one column per entity id.
///
/// Cells hold the attribute value of that entity at that snapshot, or `None`
/// when the value is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeriesTable {
    index: Vec<Snapshot>,
    columns: IndexMap<String, Vec<Option<f64>>>,
}

impl TimeSeriesTable {
    /// Creates a table over the given time axis with no columns.
    pub fn new(index: Vec<Snapshot>) -> Self {
        Self {
            index,
            columns: IndexMap::new(),
        }
    }

    /// Assembles a table from columns that already span `index`.
    pub(crate) fn from_columns(
        index: Vec<Snapshot>,
        columns: IndexMap<String, Vec<Option<f64>>>,
    ) -> Self {
        debug_assert!(columns.values().all(|col| col.len() == index.len()));
        Self { index, columns }
    }

    /// Builder form of [`TimeSeriesTable::insert_column`].
    ///
    /// # Errors
    ///
    /// See [`TimeSeriesTable::insert_column`].
    pub fn with_column(
        mut self,
        entity: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, TableError> {
        self.insert_column(entity, values)?;
        Ok(self)
    }

    /// Adds one entity column.
    ///
    /// # Errors
    ///
    /// Returns an error on a duplicated entity or a cell count that differs
    /// from the length of the time axis.
    pub fn insert_column(
        &mut self,
        entity: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), TableError> {
        let entity = entity.into();
        if self.columns.contains_key(&entity) {
            return Err(TableError::DuplicateColumn(entity));
        }
        if values.len() != self.index.len() {
            return Err(TableError::LengthMismatch {
                column: entity,
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(entity, values);
        Ok(())
    }

    /// The time axis.
    pub fn index(&self) -> &[Snapshot] {
        &self.index
    }

    /// Number of snapshots (rows).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` when there are no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    /// Number of entity columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Entity ids in column order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Values of one entity column.
    pub fn column(&self, entity: &str) -> Option<&[Option<f64>]> {
        self.columns.get(entity).map(Vec::as_slice)
    }

    /// Iterates `(entity, values)` in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of rows that hold at least one value.
    pub fn populated_rows(&self) -> usize {
        (0..self.len())
            .filter(|&row| self.columns.values().any(|col| col[row].is_some()))
            .count()
    }

    /// Returns a copy without the columns that are missing at every snapshot.
    pub fn drop_empty_columns(&self) -> Self {
        Self {
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .filter(|(_, values)| values.iter().any(Option::is_some))
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect(),
        }
    }

    /// Returns a copy restricted to the given entities, in the given order.
    ///
    /// Unknown entities are skipped.
    pub fn select<S: AsRef<str>>(&self, entities: &[S]) -> Self {
        let mut columns = IndexMap::with_capacity(entities.len());
        for entity in entities {
            let entity = entity.as_ref();
            if let Some(values) = self.columns.get(entity) {
                columns.insert(entity.to_string(), values.clone());
            }
        }
        Self {
            index: self.index.clone(),
            columns,
        }
    }

    /// Returns a copy keeping only rows where every column has a value.
    pub fn drop_incomplete_rows(&self) -> Self {
        let keep: Vec<bool> = (0..self.len())
            .map(|row| self.columns.values().all(|col| col[row].is_some()))
            .collect();
        self.retain_rows(&keep)
    }

    fn retain_rows(&self, keep: &[bool]) -> Self {
        let index = self
            .index
            .iter()
            .zip(keep)
            .filter(|(_, k)| **k)
            .map(|(snap, _)| snap.clone())
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                let kept = values
                    .iter()
                    .zip(keep)
                    .filter(|(_, k)| **k)
                    .map(|(v, _)| *v)
                    .collect();
                (name.clone(), kept)
            })
            .collect();
        Self { index, columns }
    }

    /// Aligns this table onto `target`: rows are matched by snapshot, target
    /// snapshots absent here become missing, and rows not in `target` are
    /// dropped.
    pub fn reindex(&self, target: &[Snapshot]) -> Self {
        let positions: Vec<Option<usize>> = target
            .iter()
            .map(|snap| self.index.iter().position(|s| s == snap))
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| {
                let aligned = positions
                    .iter()
                    .map(|pos| pos.and_then(|p| values[p]))
                    .collect();
                (name.clone(), aligned)
            })
            .collect();
        Self {
            index: target.to_vec(),
            columns,
        }
    }
}

/// Serialized layout of a time-series table inside a JSON archive.
///
/// The index is optional; when absent the network's snapshots are used.
#[derive(Debug, Deserialize)]
pub(crate) struct RawTimeSeriesTable {
    #[serde(default)]
    pub index: Option<Vec<Snapshot>>,
    #[serde(default)]
    pub columns: IndexMap<String, Vec<Option<f64>>>,
}

impl RawTimeSeriesTable {
    pub(crate) fn into_table(self, snapshots: &[Snapshot]) -> Result<TimeSeriesTable, TableError> {
        let mut table = TimeSeriesTable::new(self.index.unwrap_or_else(|| snapshots.to_vec()));
        for (entity, values) in self.columns {
            table.insert_column(entity, values)?;
        }
        Ok(table)
    }
}
