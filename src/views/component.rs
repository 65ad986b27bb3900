//! The component section shared by the summary and geospatial views.

use serde::Serialize;

use crate::network::table::CARRIER_COLUMN;
use crate::network::{ComponentKind, ComponentTable};
use crate::session::Session;
use crate::shape::Unavailable;
use crate::shape::carrier::aggregate_by_carrier;
use crate::shape::color::{CarrierPalette, Rgb};
use crate::shape::select::select_populated;

use super::Panel;

/// One located entity on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint<'a> {
    pub id: &'a str,
    pub x: f64,
    pub y: f64,
    pub carrier: Option<&'a str>,
    /// Carrier color; `None` for entities without a carrier.
    pub color: Option<Rgb>,
}

/// Total nominal capacity of one carrier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarrierShare {
    pub carrier: String,
    pub total: f64,
    pub color: Rgb,
}

/// Capacity-by-carrier breakdown of one component kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityBreakdown {
    /// Summed attribute (`p_nom` or `e_nom`).
    pub attribute: &'static str,
    pub shares: Vec<CarrierShare>,
}

impl CapacityBreakdown {
    /// Sum over every carrier.
    pub fn total(&self) -> f64 {
        self.shares.iter().map(|s| s.total).sum()
    }
}

/// Table, map points and capacity breakdown of one component kind.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentSection<'a> {
    pub kind: ComponentKind,
    pub table: Panel<&'a ComponentTable>,
    /// Present when the table carries both coordinate columns.
    pub map: Option<Vec<MapPoint<'a>>>,
    /// Present for kinds with a nominal-capacity attribute.
    pub capacity: Option<Panel<CapacityBreakdown>>,
}

pub fn build(session: &Session, kind: ComponentKind) -> ComponentSection<'_> {
    let palette = session.palette();
    let table = match select_populated(session.network(), kind) {
        Ok(table) => table,
        Err(notice) => {
            return ComponentSection {
                kind,
                table: Panel::Unavailable(notice),
                map: None,
                capacity: None,
            };
        }
    };

    ComponentSection {
        kind,
        table: Panel::Ready(table),
        map: map_points(table, palette),
        capacity: kind
            .capacity_attribute()
            .map(|attribute| capacity(kind, table, attribute, palette).into()),
    }
}

/// Rows with both coordinates, in table order.
pub fn map_points<'a>(
    table: &'a ComponentTable,
    palette: &CarrierPalette,
) -> Option<Vec<MapPoint<'a>>> {
    let (xs, ys) = table.coordinates()?;
    let carriers = table.text(CARRIER_COLUMN);
    Some(
        table
            .ids()
            .iter()
            .enumerate()
            .filter_map(|(row, id)| {
                let (x, y) = (xs[row]?, ys[row]?);
                let carrier = carriers.and_then(|c| c[row].as_deref());
                Some(MapPoint {
                    id,
                    x,
                    y,
                    carrier,
                    color: carrier.map(|c| palette.color_for(c)),
                })
            })
            .collect(),
    )
}

fn capacity(
    kind: ComponentKind,
    table: &ComponentTable,
    attribute: &'static str,
    palette: &CarrierPalette,
) -> Result<CapacityBreakdown, Unavailable> {
    let totals = aggregate_by_carrier(kind, table, attribute)?;
    let shares = totals
        .into_iter()
        .map(|(carrier, total)| CarrierShare {
            color: palette.color_for(&carrier),
            carrier,
            total,
        })
        .collect();
    Ok(CapacityBreakdown { attribute, shares })
}
