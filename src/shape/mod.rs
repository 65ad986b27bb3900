//! Data shaping: table selection, carrier aggregation, time-series alignment
//! and carrier colors.
//!
//! Nothing in here fails hard. Missing tables, columns or series surface as an
//! [`Unavailable`] value that views embed and sinks print as a notice.

pub mod carrier;
pub mod color;
pub mod select;
pub mod timeseries;

use std::fmt;

use serde::Serialize;

use crate::network::ComponentKind;
use timeseries::ShapeMode;

/// Why a piece of a view has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unavailable {
    /// The component table has zero rows.
    NoRows {
        /// Component kind.
        kind: ComponentKind,
    },
    /// A required column is absent or has the wrong type.
    MissingColumn {
        /// Component kind.
        kind: ComponentKind,
        /// Column name.
        column: String,
    },
    /// The component kind has no time series at all.
    NoSeriesGroup {
        /// Component kind.
        kind: ComponentKind,
    },
    /// The attribute does not exist on the component's time series.
    NoSeries {
        /// Component kind.
        kind: ComponentKind,
        /// Attribute name.
        attribute: String,
    },
    /// The attribute exists but has no populated data after alignment.
    EmptySeries {
        /// Component kind.
        kind: ComponentKind,
        /// Attribute name.
        attribute: String,
    },
    /// A multi-select control has nothing selected.
    EmptySelection {
        /// Component kind.
        kind: ComponentKind,
    },
    /// None of the aligned entities has a carrier.
    NoCarrierGroups {
        /// Component kind.
        kind: ComponentKind,
    },
    /// The requested mode is not offered for this component kind.
    ModeNotOffered {
        /// Component kind.
        kind: ComponentKind,
        /// Requested mode.
        mode: ShapeMode,
    },
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRows { kind } => {
                write!(f, "No {} found in this network.", kind.label().to_lowercase())
            }
            Self::MissingColumn { kind, column } if column == "carrier" => {
                write!(f, "{} type information is not available.", kind.singular())
            }
            Self::MissingColumn { kind, column } => write!(
                f,
                "{} {column} information is not available.",
                kind.singular()
            ),
            Self::NoSeriesGroup { kind } => {
                write!(f, "No time series data available for {}.", kind.label())
            }
            Self::NoSeries { kind, attribute } | Self::EmptySeries { kind, attribute } => write!(
                f,
                "No {attribute} time series data available for {}.",
                kind.label().to_lowercase()
            ),
            Self::EmptySelection { kind } => write!(
                f,
                "Please select at least one {} to plot.",
                kind.singular().to_lowercase()
            ),
            Self::NoCarrierGroups { kind } => write!(
                f,
                "{} type (carrier) information is not available.",
                kind.singular()
            ),
            Self::ModeNotOffered { kind, mode } => write!(
                f,
                "View option \"{}\" is not offered for {}.",
                mode.label(),
                kind.label().to_lowercase()
            ),
        }
    }
}
