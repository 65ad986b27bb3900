//! Component tables: entities of one class indexed by a unique identifier.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the longitude column joined in from the bus table.
pub const X_COLUMN: &str = "x";
/// Name of the latitude column joined in from the bus table.
pub const Y_COLUMN: &str = "y";
/// Column holding the categorical carrier label.
pub const CARRIER_COLUMN: &str = "carrier";
/// Column holding the bus an entity is attached to.
pub const BUS_COLUMN: &str = "bus";
/// Reference and category columns. Read as text whatever their cells look like.
pub const LABEL_COLUMNS: &[&str] = &[BUS_COLUMN, "bus0", "bus1", CARRIER_COLUMN, "type"];

/// Returns `true` for a raw cell that stands for a missing value: empty or `NaN`.
pub fn is_missing_cell(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("nan")
}

/// Structural errors raised while assembling a table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// Two rows share the same identifier.
    #[error("duplicate entity identifier \"{0}\"")]
    DuplicateId(String),
    /// Two columns share the same name.
    #[error("duplicate column \"{0}\"")]
    DuplicateColumn(String),
    /// A column does not have one cell per row.
    #[error("column \"{column}\" has {actual} cells, expected {expected}")]
    LengthMismatch {
        /// Offending column.
        column: String,
        /// Number of rows in the table.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
}

/// Typed cells of one column. Every cell may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnData {
    /// Floating point attribute (capacities, coordinates, costs).
    Numeric(Vec<Option<f64>>),
    /// Boolean flag (e.g. `p_nom_extendable`).
    Boolean(Vec<Option<bool>>),
    /// Free text (carrier, bus reference, type).
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Returns `true` when the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the raw cells of column `name`, inferring the type unless it is
    /// one of [`LABEL_COLUMNS`].
    pub fn read(name: &str, raw: &[&str]) -> Self {
        if LABEL_COLUMNS.contains(&name) {
            Self::text(raw)
        } else {
            Self::infer(raw)
        }
    }

    /// Infers a column type from raw string cells.
    ///
    /// Empty and `NaN` cells are missing. A column is numeric when every
    /// present cell parses as `f64`, boolean when every present cell is
    /// `True`/`False` (any case), and text otherwise. A column with no present
    /// cells is numeric.
    pub fn infer(raw: &[&str]) -> Self {
        let present = || raw.iter().map(|s| s.trim()).filter(|s| !is_missing_cell(s));

        if present().all(|s| s.parse::<f64>().is_ok()) {
            return Self::Numeric(
                raw.iter()
                    .map(|s| {
                        let s = s.trim();
                        if is_missing_cell(s) { None } else { s.parse::<f64>().ok() }
                    })
                    .collect(),
            );
        }
        if present().all(|s| parse_bool(s).is_some()) {
            return Self::Boolean(raw.iter().map(|s| parse_bool(s.trim())).collect());
        }
        Self::text(raw)
    }

    /// Keeps every present cell as text.
    pub fn text(raw: &[&str]) -> Self {
        Self::Text(
            raw.iter()
                .map(|s| {
                    let s = s.trim();
                    (!is_missing_cell(s)).then(|| s.to_string())
                })
                .collect(),
        )
    }

    /// Converts the cells to text, formatting numbers the way they display.
    pub fn into_text(self) -> Self {
        match self {
            Self::Text(_) => self,
            Self::Numeric(v) => Self::Text(v.into_iter().map(|c| c.map(format_number)).collect()),
            Self::Boolean(v) => Self::Text(v.into_iter().map(|c| c.map(|b| b.to_string())).collect()),
        }
    }

    /// Renders one cell for plain-text display; missing cells render empty.
    pub fn display_cell(&self, row: usize) -> String {
        match self {
            Self::Numeric(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(format_number)
                .unwrap_or_default(),
            Self::Boolean(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|b| b.to_string())
                .unwrap_or_default(),
            Self::Text(v) => v.get(row).cloned().flatten().unwrap_or_default(),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Formats a number compactly: integers without a fraction, others to 4 places.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// A table of entities of one component class.
///
/// Rows are identified by unique string ids; columns are typed and ordered by
/// insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentTable {
    index: Vec<String>,
    columns: IndexMap<String, ColumnData>,
}

impl ComponentTable {
    /// Creates a table with the given row ids and no columns.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateId`] if an id appears twice.
    pub fn new(index: Vec<String>) -> Result<Self, TableError> {
        let mut seen = HashSet::with_capacity(index.len());
        for id in &index {
            if !seen.insert(id.as_str()) {
                return Err(TableError::DuplicateId(id.clone()));
            }
        }
        Ok(Self {
            index,
            columns: IndexMap::new(),
        })
    }

    /// Builder form of [`ComponentTable::insert_column`].
    ///
    /// # Errors
    ///
    /// See [`ComponentTable::insert_column`].
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        data: ColumnData,
    ) -> Result<Self, TableError> {
        self.insert_column(name, data)?;
        Ok(self)
    }

    /// Adds a new column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column name exists or the cell count differs
    /// from the row count.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        data: ColumnData,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        self.check_len(&name, &data)?;
        self.columns.insert(name, data);
        Ok(())
    }

    /// Adds a column, replacing any existing column with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::LengthMismatch`] on a wrong cell count.
    pub fn set_column(
        &mut self,
        name: impl Into<String>,
        data: ColumnData,
    ) -> Result<(), TableError> {
        let name = name.into();
        self.check_len(&name, &data)?;
        self.columns.insert(name, data);
        Ok(())
    }

    fn check_len(&self, name: &str, data: &ColumnData) -> Result<(), TableError> {
        if data.len() != self.index.len() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.index.len(),
                actual: data.len(),
            });
        }
        Ok(())
    }

    /// Removes a column, returning its data.
    pub fn remove_column(&mut self, name: &str) -> Option<ColumnData> {
        self.columns.shift_remove(name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Entity ids in row order.
    pub fn ids(&self) -> &[String] {
        &self.index
    }

    /// Row position of an entity id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.iter().position(|candidate| candidate == id)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Returns `true` if the column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Raw access to a column.
    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.get(name)
    }

    /// Cells of a numeric column; `None` if absent or not numeric.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.columns.get(name) {
            Some(ColumnData::Numeric(values)) => Some(values),
            _ => None,
        }
    }

    /// Cells of a text column; `None` if absent or not text.
    pub fn text(&self, name: &str) -> Option<&[Option<String>]> {
        match self.columns.get(name) {
            Some(ColumnData::Text(values)) => Some(values),
            _ => None,
        }
    }

    /// The `x`/`y` coordinate pair, present only when both columns are numeric.
    pub fn coordinates(&self) -> Option<(&[Option<f64>], &[Option<f64>])> {
        Some((self.numeric(X_COLUMN)?, self.numeric(Y_COLUMN)?))
    }

    /// Drops a lone `x` or `y` column so coordinates stay paired.
    ///
    /// Returns the name of the dropped column, if any.
    pub fn enforce_coordinate_pairing(&mut self) -> Option<&'static str> {
        match (self.has_column(X_COLUMN), self.has_column(Y_COLUMN)) {
            (true, false) => {
                self.remove_column(X_COLUMN);
                Some(X_COLUMN)
            }
            (false, true) => {
                self.remove_column(Y_COLUMN);
                Some(Y_COLUMN)
            }
            _ => None,
        }
    }

    /// Renders one cell for plain-text display.
    pub fn display_cell(&self, row: usize, column: &str) -> String {
        self.columns
            .get(column)
            .map(|data| data.display_cell(row))
            .unwrap_or_default()
    }
}

/// Serialized layout of a component table inside a JSON archive.
#[derive(Debug, Deserialize)]
pub(crate) struct RawComponentTable {
    pub index: Vec<String>,
    #[serde(default)]
    pub columns: IndexMap<String, ColumnData>,
}

impl TryFrom<RawComponentTable> for ComponentTable {
    type Error = TableError;

    fn try_from(raw: RawComponentTable) -> Result<Self, Self::Error> {
        let mut table = Self::new(raw.index)?;
        for (name, data) in raw.columns {
            let data = if LABEL_COLUMNS.contains(&name.as_str()) {
                data.into_text()
            } else {
                data
            };
            table.insert_column(name, data)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ComponentTable::new(ids(&["a", "b", "a"])).unwrap_err();
        assert_eq!(err, TableError::DuplicateId("a".to_string()));
    }

    #[test]
    fn rejects_short_columns() {
        let err = ComponentTable::new(ids(&["a", "b"]))
            .unwrap()
            .with_column("p_nom", ColumnData::Numeric(vec![Some(1.0)]))
            .unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn infers_column_types() {
        assert_eq!(
            ColumnData::infer(&["1.5", "", "3"]),
            ColumnData::Numeric(vec![Some(1.5), None, Some(3.0)])
        );
        assert_eq!(
            ColumnData::infer(&["True", "false"]),
            ColumnData::Boolean(vec![Some(true), Some(false)])
        );
        assert_eq!(
            ColumnData::infer(&["gas", ""]),
            ColumnData::Text(vec![Some("gas".to_string()), None])
        );
        assert_eq!(ColumnData::infer(&["", ""]), ColumnData::Numeric(vec![None, None]));
    }

    #[test]
    fn nan_cells_are_missing() {
        assert_eq!(
            ColumnData::infer(&["NaN", "2", "nan"]),
            ColumnData::Numeric(vec![None, Some(2.0), None])
        );
        assert_eq!(
            ColumnData::infer(&["gas", "NaN"]),
            ColumnData::Text(vec![Some("gas".to_string()), None])
        );
    }

    #[test]
    fn label_columns_stay_text() {
        assert_eq!(
            ColumnData::read(BUS_COLUMN, &["1", "2", ""]),
            ColumnData::Text(vec![Some("1".to_string()), Some("2".to_string()), None])
        );
        assert!(matches!(ColumnData::read("p_nom", &["1", "2"]), ColumnData::Numeric(_)));
        assert_eq!(
            ColumnData::Numeric(vec![Some(7.0), None]).into_text(),
            ColumnData::Text(vec![Some("7".to_string()), None])
        );
    }

    #[test]
    fn archive_label_columns_are_converted_to_text() {
        let raw: RawComponentTable = serde_json::from_str(
            r#"{"index": ["g1", "g2"], "columns": {"bus": [1, 2], "p_nom": [10, 20]}}"#,
        )
        .unwrap();
        let table = ComponentTable::try_from(raw).unwrap();
        assert_eq!(
            table.text(BUS_COLUMN),
            Some(&[Some("1".to_string()), Some("2".to_string())][..])
        );
        assert!(table.numeric("p_nom").is_some());
    }

    #[test]
    fn coordinates_require_both_columns() {
        let table = ComponentTable::new(ids(&["b1"]))
            .unwrap()
            .with_column(X_COLUMN, ColumnData::Numeric(vec![Some(1.0)]))
            .unwrap();
        assert!(table.coordinates().is_none());

        let table = table
            .with_column(Y_COLUMN, ColumnData::Numeric(vec![Some(2.0)]))
            .unwrap();
        assert!(table.coordinates().is_some());
    }

    #[test]
    fn pairing_drops_lone_coordinate() {
        let mut table = ComponentTable::new(ids(&["b1"]))
            .unwrap()
            .with_column(Y_COLUMN, ColumnData::Numeric(vec![Some(2.0)]))
            .unwrap();
        assert_eq!(table.enforce_coordinate_pairing(), Some(Y_COLUMN));
        assert!(!table.has_column(X_COLUMN) && !table.has_column(Y_COLUMN));
    }

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
    }
}
