//! API response and query types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::loader::SampleNetwork;
use crate::network::ComponentKind;
use crate::session::Session;
use crate::shape::timeseries::{Selection, ShapeMode};
use crate::views::{View, ViewRequest};

/// Description of the loaded network.
#[derive(Debug, Serialize)]
pub struct NetworkInfo {
    /// How the network was loaded, e.g. `"sample scigrid_de"`.
    pub source: String,
    pub name: Option<String>,
    pub snapshots: usize,
    pub loaded_at: DateTime<Utc>,
}

impl From<&Session> for NetworkInfo {
    fn from(session: &Session) -> Self {
        let network = session.network();
        Self {
            source: session.source().to_string(),
            name: network.name().map(str::to_string),
            snapshots: network.snapshots().len(),
            loaded_at: session.loaded_at(),
        }
    }
}

/// One bundled sample network.
#[derive(Debug, Serialize)]
pub struct SampleInfo {
    pub name: &'static str,
    pub description: &'static str,
}

impl From<SampleNetwork> for SampleInfo {
    fn from(sample: SampleNetwork) -> Self {
        Self {
            name: sample.name(),
            description: sample.description(),
        }
    }
}

/// View controls as query parameters; all optional.
///
/// `select` is a comma-separated entity list. An empty `select=` is an
/// explicit empty selection.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub component: Option<String>,
    pub attribute: Option<String>,
    pub mode: Option<String>,
    pub select: Option<String>,
}

impl ViewQuery {
    /// Parses the query into a request for `view`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending parameter.
    pub fn to_request(&self, view: View) -> Result<ViewRequest, String> {
        let mut request = ViewRequest::new(view);
        if let Some(name) = &self.component {
            let kind = name
                .parse::<ComponentKind>()
                .map_err(|e| format!("component: {e}"))?;
            request = request.with_component(kind);
        }
        if let Some(attribute) = &self.attribute {
            request = request.with_attribute(attribute.clone());
        }
        if let Some(mode) = &self.mode {
            let mode = mode.parse::<ShapeMode>().map_err(|e| format!("mode: {e}"))?;
            request = request.with_mode(mode);
        }
        if let Some(list) = &self.select {
            request = request.with_selection(Selection::of(
                list.split(',').map(str::trim).filter(|e| !e.is_empty()),
            ));
        }
        Ok(request)
    }
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
