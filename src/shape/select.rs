//! Component table selection.

use crate::network::{ComponentKind, ComponentTable, NetworkModel, UnknownComponent};

use super::Unavailable;

/// Returns the table of a component kind, possibly with zero rows.
pub fn select(network: &NetworkModel, kind: ComponentKind) -> &ComponentTable {
    network.table(kind)
}

/// Resolves a component name typed at a text boundary, then selects it.
///
/// # Errors
///
/// Returns [`UnknownComponent`] when the name is outside the fixed menu. A
/// known kind with zero rows is *not* an error.
pub fn select_by_name<'a>(
    network: &'a NetworkModel,
    name: &str,
) -> Result<(ComponentKind, &'a ComponentTable), UnknownComponent> {
    let kind: ComponentKind = name.parse()?;
    Ok((kind, select(network, kind)))
}

/// Selects a table and turns the zero-row case into a notice.
pub fn select_populated(
    network: &NetworkModel,
    kind: ComponentKind,
) -> Result<&ComponentTable, Unavailable> {
    let table = select(network, kind);
    if table.is_empty() {
        Err(Unavailable::NoRows { kind })
    } else {
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ColumnData;

    fn network() -> NetworkModel {
        let buses = ComponentTable::new(vec!["b1".to_string()])
            .unwrap()
            .with_column("v_nom", ColumnData::Numeric(vec![Some(380.0)]))
            .unwrap();
        NetworkModel::new().with_table(ComponentKind::Buses, buses)
    }

    #[test]
    fn zero_rows_is_not_unknown() {
        let network = network();
        let (kind, table) = select_by_name(&network, "Stores").unwrap();
        assert_eq!(kind, ComponentKind::Stores);
        assert!(table.is_empty());

        assert!(select_by_name(&network, "Substations").is_err());
    }

    #[test]
    fn populated_selection_reports_empty_tables() {
        let network = network();
        assert_eq!(select_populated(&network, ComponentKind::Buses).map(|t| t.len()), Ok(1));
        assert_eq!(
            select_populated(&network, ComponentKind::Lines),
            Err(Unavailable::NoRows {
                kind: ComponentKind::Lines
            })
        );
    }

    #[test]
    fn every_kind_is_selectable() {
        let network = NetworkModel::new();
        for kind in ComponentKind::ALL {
            assert!(select(&network, kind).is_empty());
        }
    }
}
