//! Time-series charts for one component kind and attribute.

use serde::Serialize;

use crate::network::ComponentKind;
use crate::session::Session;
use crate::shape::Unavailable;
use crate::shape::carrier::CarrierLookup;
use crate::shape::color::{CarrierPalette, Rgb};
use crate::shape::timeseries::{self, ShapeMode, ShapedSeries};

use super::{Panel, ViewRequest};

/// Attribute used when a kind offers no attribute menu.
const FALLBACK_ATTRIBUTE: &str = "p";

/// Shaped series ready to plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub series: ShapedSeries,
    /// One entry per series, in series order.
    pub colors: Vec<Option<Rgb>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemporalView {
    pub kind: ComponentKind,
    /// Attribute menu of `kind`.
    pub attributes: &'static [&'static str],
    pub attribute: String,
    /// Modes offered for `kind`.
    pub modes: &'static [ShapeMode],
    pub mode: ShapeMode,
    /// Entities that can be selected, i.e. the aligned columns.
    pub entities: Vec<String>,
    pub chart: Panel<Chart>,
}

pub fn build(session: &Session, request: &ViewRequest) -> TemporalView {
    let kind = request.component_or_default();
    let attribute = request
        .attribute
        .clone()
        .or_else(|| kind.series_attributes().first().map(|a| (*a).to_string()))
        .unwrap_or_else(|| FALLBACK_ATTRIBUTE.to_string());
    let mode = request.mode.unwrap_or(ShapeMode::Individual);

    let network = session.network();
    let aligned = network.series(kind, &attribute).map(timeseries::align);
    let entities = aligned
        .as_ref()
        .map(|ts| ts.column_names().map(str::to_string).collect())
        .unwrap_or_default();

    let chart = chart(session, kind, &attribute, mode, request).into();
    TemporalView {
        kind,
        attributes: kind.series_attributes(),
        attribute,
        modes: kind.series_modes(),
        mode,
        entities,
        chart,
    }
}

fn chart(
    session: &Session,
    kind: ComponentKind,
    attribute: &str,
    mode: ShapeMode,
    request: &ViewRequest,
) -> Result<Chart, Unavailable> {
    if !kind.series_modes().contains(&mode) {
        return Err(Unavailable::ModeNotOffered { kind, mode });
    }
    let network = session.network();
    if network.series_attributes(kind).is_empty() {
        return Err(Unavailable::NoSeriesGroup { kind });
    }
    let ts = network
        .series(kind, attribute)
        .ok_or_else(|| Unavailable::NoSeries {
            kind,
            attribute: attribute.to_string(),
        })?;

    let lookup = CarrierLookup::from_table(kind, network.table(kind)).ok();
    let series = timeseries::shape(kind, attribute, ts, mode, &request.selection, lookup.as_ref())?;
    let colors = colors(&series, lookup.as_ref(), session.palette());
    Ok(Chart {
        title: title(kind, attribute, &series),
        series,
        colors,
    })
}

/// Chart title, following the shape actually produced.
pub fn title(kind: ComponentKind, attribute: &str, series: &ShapedSeries) -> String {
    let noun = kind.singular();
    match series {
        ShapedSeries::Entities(_) => format!("{noun} {attribute} time series"),
        ShapedSeries::Carriers(_) => format!("{noun} {attribute} by type"),
        ShapedSeries::Total(_) => format!("Total {noun} {attribute}"),
    }
}

fn colors(
    series: &ShapedSeries,
    lookup: Option<&CarrierLookup>,
    palette: &CarrierPalette,
) -> Vec<Option<Rgb>> {
    match series {
        ShapedSeries::Entities(table) => table
            .column_names()
            .map(|entity| {
                lookup
                    .and_then(|l| l.get(entity))
                    .map(|carrier| palette.color_for(carrier))
            })
            .collect(),
        ShapedSeries::Carriers(table) => table
            .column_names()
            .map(|carrier| Some(palette.color_for(carrier)))
            .collect(),
        ShapedSeries::Total(_) => vec![None],
    }
}
