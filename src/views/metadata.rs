//! One-way dump of the network's free-form metadata.

use serde::Serialize;
use tracing::warn;

use crate::network::NetworkModel;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataView {
    /// Block-structured YAML text.
    pub yaml: String,
    /// `true` when there are no metadata entries.
    pub empty: bool,
}

pub fn build(network: &NetworkModel) -> MetadataView {
    let meta = network.meta();
    let empty = meta.is_null() || meta.as_object().is_some_and(|m| m.is_empty());
    let yaml = match serde_yaml::to_string(meta) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "metadata is not representable as YAML");
            format!("# metadata could not be rendered: {e}\n")
        }
    };
    MetadataView { yaml, empty }
}
