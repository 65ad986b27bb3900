//! Single-document JSON archive.
//!
//! ```json
//! {
//!   "name": "demo",
//!   "snapshots": ["2020-01-01 00:00:00", "2020-01-01 01:00:00"],
//!   "investment_periods": [],
//!   "meta": {"author": "..."},
//!   "components": {"buses": {"index": ["b1"], "columns": {"x": [8.5], "y": [50.1]}}},
//!   "series": {"generators": {"p": {"columns": {"g1": [1.0, null]}}}}
//! }
//! ```
//!
//! Component keys accept labels or file stems. Sections for component
//! classes outside the fixed set (carriers, shunts, ...) are skipped.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::network::series::RawTimeSeriesTable;
use crate::network::table::RawComponentTable;
use crate::network::{ComponentKind, ComponentTable, NetworkModel, Snapshot};

use super::LoadError;

#[derive(Debug, Deserialize)]
struct NetworkArchive {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    snapshots: Vec<Snapshot>,
    #[serde(default)]
    investment_periods: Vec<i64>,
    #[serde(default)]
    meta: Option<serde_json::Value>,
    #[serde(default)]
    components: IndexMap<String, RawComponentTable>,
    #[serde(default)]
    series: IndexMap<String, IndexMap<String, RawTimeSeriesTable>>,
}

pub(super) fn from_slice(bytes: &[u8]) -> Result<NetworkModel, LoadError> {
    let archive: NetworkArchive =
        serde_json::from_slice(bytes).map_err(|e| LoadError::malformed("archive", e))?;

    let mut network = NetworkModel::new()
        .with_snapshots(archive.snapshots.clone())
        .with_investment_periods(archive.investment_periods);
    if let Some(name) = archive.name {
        network = network.with_name(name);
    }
    if let Some(meta) = archive.meta.filter(|m| !m.is_null()) {
        network = network.with_meta(meta);
    }

    for (key, raw) in archive.components {
        let Ok(kind) = key.parse::<ComponentKind>() else {
            debug!(section = key.as_str(), "skipping component section");
            continue;
        };
        let table = ComponentTable::try_from(raw)
            .map_err(|e| LoadError::table(format!("components.{key}"), e))?;
        network.set_table(kind, table);
    }

    for (key, group) in archive.series {
        let Ok(kind) = key.parse::<ComponentKind>() else {
            debug!(section = key.as_str(), "skipping series section");
            continue;
        };
        for (attribute, raw) in group {
            let mut table = raw
                .into_table(&archive.snapshots)
                .map_err(|e| LoadError::table(format!("series.{key}.{attribute}"), e))?;
            if !archive.snapshots.is_empty() && table.index() != archive.snapshots.as_slice() {
                table = table.reindex(&archive.snapshots);
            }
            network.insert_series(kind, attribute, table);
        }
    }

    Ok(network)
}
