//! Grouping of entities by their carrier label.

use indexmap::IndexMap;

use crate::network::table::CARRIER_COLUMN;
use crate::network::{ComponentKind, ComponentTable};

use super::Unavailable;

/// Per-carrier totals in order of first occurrence.
pub type CarrierTotals = IndexMap<String, f64>;

/// Sums a numeric attribute within each carrier.
///
/// Rows are partitioned by exact carrier string. Rows without a carrier are
/// left out; missing attribute cells count as zero. Zero and negative totals
/// are kept.
///
/// # Errors
///
/// Returns [`Unavailable::MissingColumn`] when the table has no text `carrier`
/// column or `attribute` is not a numeric column.
pub fn aggregate_by_carrier(
    kind: ComponentKind,
    table: &ComponentTable,
    attribute: &str,
) -> Result<CarrierTotals, Unavailable> {
    let carriers = table
        .text(CARRIER_COLUMN)
        .ok_or_else(|| Unavailable::MissingColumn {
            kind,
            column: CARRIER_COLUMN.to_string(),
        })?;
    let values = table
        .numeric(attribute)
        .ok_or_else(|| Unavailable::MissingColumn {
            kind,
            column: attribute.to_string(),
        })?;

    let mut totals = CarrierTotals::new();
    for (carrier, value) in carriers.iter().zip(values) {
        let Some(carrier) = carrier else {
            continue;
        };
        *totals.entry(carrier.clone()).or_insert(0.0) += value.unwrap_or(0.0);
    }
    Ok(totals)
}

/// Entity id → carrier label, built from a component table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierLookup {
    carriers: IndexMap<String, String>,
}

impl CarrierLookup {
    /// Builds the lookup from a table's `carrier` column.
    ///
    /// Entities whose carrier cell is missing are not in the lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Unavailable::MissingColumn`] when there is no text `carrier`
    /// column.
    pub fn from_table(kind: ComponentKind, table: &ComponentTable) -> Result<Self, Unavailable> {
        let carriers = table
            .text(CARRIER_COLUMN)
            .ok_or_else(|| Unavailable::MissingColumn {
                kind,
                column: CARRIER_COLUMN.to_string(),
            })?;
        Ok(table
            .ids()
            .iter()
            .zip(carriers)
            .filter_map(|(id, carrier)| Some((id.clone(), carrier.clone()?)))
            .collect())
    }

    /// Carrier of an entity.
    pub fn get(&self, entity: &str) -> Option<&str> {
        self.carriers.get(entity).map(String::as_str)
    }

    /// Number of entities with a carrier.
    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    /// Returns `true` when no entity has a carrier.
    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CarrierLookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            carriers: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
