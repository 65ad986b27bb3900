//! In-memory network model: component tables, time series and metadata.

pub mod series;
pub mod snapshot;
pub mod table;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shape::timeseries::ShapeMode;
pub use series::TimeSeriesTable;
pub use snapshot::Snapshot;
pub use table::{ColumnData, ComponentTable, TableError};

/// The fixed set of component classes a network exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Electrical buses (nodes).
    Buses,
    /// AC lines.
    Lines,
    /// Generators.
    Generators,
    /// Loads.
    Loads,
    /// Storage units with a fixed energy-to-power ratio.
    StorageUnits,
    /// Controllable links (HVDC, converters, sector coupling).
    Links,
    /// Two-winding transformers.
    Transformers,
    /// Energy stores.
    Stores,
}

/// Error for component names outside the fixed menu.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown component type \"{0}\"")]
pub struct UnknownComponent(pub String);

impl ComponentKind {
    /// Every component kind, in storage order.
    pub const ALL: [Self; 8] = [
        Self::Buses,
        Self::Lines,
        Self::Generators,
        Self::Loads,
        Self::StorageUnits,
        Self::Links,
        Self::Transformers,
        Self::Stores,
    ];

    /// Order of the summary counts table.
    pub const SUMMARY_ORDER: [Self; 8] = [
        Self::Generators,
        Self::Buses,
        Self::Lines,
        Self::Links,
        Self::Loads,
        Self::StorageUnits,
        Self::Stores,
        Self::Transformers,
    ];

    /// Menu of the geospatial view.
    pub const GEOSPATIAL_MENU: [Self; 7] = [
        Self::Buses,
        Self::Lines,
        Self::Generators,
        Self::Loads,
        Self::StorageUnits,
        Self::Links,
        Self::Transformers,
    ];

    /// Menu of the temporal view.
    pub const TEMPORAL_MENU: [Self; 5] = [
        Self::Generators,
        Self::Loads,
        Self::StorageUnits,
        Self::Lines,
        Self::Buses,
    ];

    /// Human-readable plural label, e.g. `"Storage Units"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Buses => "Buses",
            Self::Lines => "Lines",
            Self::Generators => "Generators",
            Self::Loads => "Loads",
            Self::StorageUnits => "Storage Units",
            Self::Links => "Links",
            Self::Transformers => "Transformers",
            Self::Stores => "Stores",
        }
    }

    /// Singular noun used in chart titles, e.g. `"Storage Unit"`.
    pub fn singular(self) -> &'static str {
        match self {
            Self::Buses => "Bus",
            Self::Lines => "Line",
            Self::Generators => "Generator",
            Self::Loads => "Load",
            Self::StorageUnits => "Storage Unit",
            Self::Links => "Link",
            Self::Transformers => "Transformer",
            Self::Stores => "Store",
        }
    }

    /// File stem in the csv-folder layout, e.g. `"storage_units"`.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Buses => "buses",
            Self::Lines => "lines",
            Self::Generators => "generators",
            Self::Loads => "loads",
            Self::StorageUnits => "storage_units",
            Self::Links => "links",
            Self::Transformers => "transformers",
            Self::Stores => "stores",
        }
    }

    /// Attribute menu of the temporal view for this kind.
    ///
    /// Empty for kinds the temporal view does not offer.
    pub fn series_attributes(self) -> &'static [&'static str] {
        match self {
            Self::Generators => &["p", "q", "p_max_pu", "p_min_pu"],
            Self::Loads => &["p", "q", "p_set"],
            Self::StorageUnits => &["p", "state_of_charge"],
            Self::Lines => &["p0", "p1"],
            Self::Buses => &["v_mag_pu", "marginal_price"],
            Self::Links | Self::Transformers | Self::Stores => &[],
        }
    }

    /// Shaping modes offered for this kind's time series.
    pub fn series_modes(self) -> &'static [ShapeMode] {
        match self {
            Self::Generators | Self::StorageUnits => &[
                ShapeMode::Individual,
                ShapeMode::AggregateByCarrier,
                ShapeMode::SumAll,
            ],
            Self::Loads | Self::Lines => &[ShapeMode::Individual, ShapeMode::SumAll],
            Self::Buses => &[ShapeMode::Individual],
            Self::Links | Self::Transformers | Self::Stores => &[],
        }
    }

    /// Nominal-capacity attribute summed per carrier, if the kind has one.
    pub fn capacity_attribute(self) -> Option<&'static str> {
        match self {
            Self::Generators | Self::StorageUnits | Self::Links => Some("p_nom"),
            Self::Stores => Some("e_nom"),
            Self::Buses | Self::Lines | Self::Loads | Self::Transformers => None,
        }
    }

    /// Returns `true` for kinds whose rows reference a single bus.
    pub fn has_single_bus(self) -> bool {
        matches!(
            self,
            Self::Generators | Self::Loads | Self::StorageUnits | Self::Stores
        )
    }

    /// Returns `true` for kinds whose `x`/`y` columns are map coordinates.
    ///
    /// Branch kinds (Lines, Links, Transformers) use `x` for reactance.
    pub fn has_coordinates(self) -> bool {
        self == Self::Buses || self.has_single_bus()
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComponentKind {
    type Err = UnknownComponent;

    /// Accepts the display label or the file stem, case-insensitively, with
    /// `-`, `_` and spaces treated alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|kind| normalize(kind.label()) == wanted || normalize(kind.file_stem()) == wanted)
            .ok_or_else(|| UnknownComponent(s.to_string()))
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A loaded power-system network.
///
/// Owns one table per [`ComponentKind`] (empty when the source had none), the
/// per-kind time-series groupings and scalar metadata. Read-only once built.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    name: Option<String>,
    snapshots: Vec<Snapshot>,
    investment_periods: Vec<i64>,
    meta: serde_json::Value,
    tables: [ComponentTable; 8],
    series: HashMap<ComponentKind, IndexMap<String, TimeSeriesTable>>,
}

impl Default for NetworkModel {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkModel {
    /// Creates an empty network with no snapshots.
    pub fn new() -> Self {
        Self {
            name: None,
            snapshots: Vec::new(),
            investment_periods: Vec::new(),
            meta: serde_json::Value::Object(serde_json::Map::new()),
            tables: std::array::from_fn(|_| ComponentTable::default()),
            series: HashMap::new(),
        }
    }

    /// Sets the network name; blank names are treated as unset.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.trim().is_empty()).then_some(name);
        self
    }

    /// Sets the snapshot axis.
    pub fn with_snapshots(mut self, snapshots: Vec<Snapshot>) -> Self {
        self.snapshots = snapshots;
        self
    }

    /// Sets the investment periods.
    pub fn with_investment_periods(mut self, periods: Vec<i64>) -> Self {
        self.investment_periods = periods;
        self
    }

    /// Sets the free-form metadata.
    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = meta;
        self
    }

    /// Replaces the table of one component kind.
    pub fn with_table(mut self, kind: ComponentKind, table: ComponentTable) -> Self {
        self.set_table(kind, table);
        self
    }

    /// Adds or replaces one time-series attribute of a component kind.
    pub fn with_series(
        mut self,
        kind: ComponentKind,
        attribute: impl Into<String>,
        table: TimeSeriesTable,
    ) -> Self {
        self.insert_series(kind, attribute, table);
        self
    }

    /// Replaces the table of one component kind in place.
    pub fn set_table(&mut self, kind: ComponentKind, table: ComponentTable) {
        self.tables[kind.slot()] = table;
    }

    /// Adds or replaces one time-series attribute in place.
    pub fn insert_series(
        &mut self,
        kind: ComponentKind,
        attribute: impl Into<String>,
        table: TimeSeriesTable,
    ) {
        self.series
            .entry(kind)
            .or_default()
            .insert(attribute.into(), table);
    }

    /// Network name, if one is set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The snapshot axis.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Investment periods (empty for single-period networks).
    pub fn investment_periods(&self) -> &[i64] {
        &self.investment_periods
    }

    /// Free-form metadata.
    pub fn meta(&self) -> &serde_json::Value {
        &self.meta
    }

    /// Table of one component kind; empty when the network has none.
    pub fn table(&self, kind: ComponentKind) -> &ComponentTable {
        &self.tables[kind.slot()]
    }

    pub(crate) fn table_mut(&mut self, kind: ComponentKind) -> &mut ComponentTable {
        &mut self.tables[kind.slot()]
    }

    /// One time-series attribute of a component kind.
    pub fn series(&self, kind: ComponentKind, attribute: &str) -> Option<&TimeSeriesTable> {
        self.series.get(&kind)?.get(attribute)
    }

    /// Names of the time-series attributes stored for a component kind.
    pub fn series_attributes(&self, kind: ComponentKind) -> Vec<&str> {
        self.series
            .get(&kind)
            .map(|group| group.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
