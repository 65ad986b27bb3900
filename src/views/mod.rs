//! View dispatch: a closed set of views, each built from a [`Session`].
//!
//! A view never fails. Parts without data carry an [`Unavailable`] notice
//! and the rest of the view is still produced.

pub mod component;
pub mod geospatial;
pub mod metadata;
pub mod summary;
pub mod temporal;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::network::ComponentKind;
use crate::session::Session;
use crate::shape::Unavailable;
use crate::shape::timeseries::{Selection, ShapeMode};

pub use component::ComponentSection;
pub use geospatial::GeospatialView;
pub use metadata::MetadataView;
pub use summary::SummaryView;
pub use temporal::TemporalView;

/// The views of the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Counts, network attributes and one component table.
    #[default]
    Summary,
    /// Time-series charts.
    Temporal,
    /// Component table with map points.
    Geospatial,
    /// Free-form metadata dump.
    Metadata,
}

impl View {
    /// Every view, in navigation order.
    pub const ALL: [Self; 4] = [Self::Summary, Self::Temporal, Self::Geospatial, Self::Metadata];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Summary => "System Summary",
            Self::Temporal => "Temporal View",
            Self::Geospatial => "Geospatial View",
            Self::Metadata => "Network Configuration",
        }
    }

    /// Component kinds this view lets the user choose from.
    pub fn component_menu(self) -> &'static [ComponentKind] {
        match self {
            Self::Summary => &ComponentKind::SUMMARY_ORDER,
            Self::Temporal => &ComponentKind::TEMPORAL_MENU,
            Self::Geospatial => &ComponentKind::GEOSPATIAL_MENU,
            Self::Metadata => &[],
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" | "system_summary" => Ok(Self::Summary),
            "temporal" | "timeseries" | "time_series" => Ok(Self::Temporal),
            "geospatial" | "map" => Ok(Self::Geospatial),
            "metadata" | "config" | "configuration" => Ok(Self::Metadata),
            other => Err(format!(
                "unknown view \"{other}\" (expected summary, temporal, geospatial or metadata)"
            )),
        }
    }
}

/// What the user picked in the view's controls. Unset fields take the
/// first entry of the corresponding menu.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewRequest {
    pub view: View,
    pub component: Option<ComponentKind>,
    pub attribute: Option<String>,
    pub mode: Option<ShapeMode>,
    pub selection: Selection,
}

impl ViewRequest {
    pub fn new(view: View) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn with_component(mut self, kind: ComponentKind) -> Self {
        self.component = Some(kind);
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_mode(mut self, mode: ShapeMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// The requested component, or the first entry of the view's menu.
    pub fn component_or_default(&self) -> ComponentKind {
        self.component
            .or_else(|| self.view.component_menu().first().copied())
            .unwrap_or(ComponentKind::Generators)
    }
}

/// A piece of a view that either has data or explains why not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    Unavailable(Unavailable),
}

impl<T> Panel<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    pub fn notice(&self) -> Option<&Unavailable> {
        match self {
            Self::Ready(_) => None,
            Self::Unavailable(notice) => Some(notice),
        }
    }
}

impl<T> From<Result<T, Unavailable>> for Panel<T> {
    fn from(result: Result<T, Unavailable>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(notice) => Self::Unavailable(notice),
        }
    }
}

/// The rendered content of one view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewOutput<'a> {
    Summary(SummaryView<'a>),
    Temporal(TemporalView),
    Geospatial(GeospatialView<'a>),
    Metadata(MetadataView),
}

/// Routes a request to its view builder.
pub fn dispatch<'a>(session: &'a Session, request: &ViewRequest) -> ViewOutput<'a> {
    debug!(
        view = ?request.view,
        component = ?request.component,
        attribute = ?request.attribute,
        mode = ?request.mode,
        "dispatching view"
    );
    match request.view {
        View::Summary => {
            ViewOutput::Summary(summary::build(session, request.component_or_default()))
        }
        View::Temporal => ViewOutput::Temporal(temporal::build(session, request)),
        View::Geospatial => {
            ViewOutput::Geospatial(geospatial::build(session, request.component_or_default()))
        }
        View::Metadata => ViewOutput::Metadata(metadata::build(session.network())),
    }
}
