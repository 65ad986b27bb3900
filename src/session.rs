//! The explicit per-user context every view is rendered against.

use chrono::{DateTime, Utc};

use crate::loader::{self, LoadError, LoadMethod};
use crate::network::NetworkModel;
use crate::shape::color::CarrierPalette;

/// One loaded network plus the palette its views are colored with.
///
/// Created by a successful load and discarded on the next one; the network
/// inside is never mutated.
#[derive(Debug, Clone)]
pub struct Session {
    network: NetworkModel,
    source: String,
    palette: CarrierPalette,
    loaded_at: DateTime<Utc>,
}

impl Session {
    /// Wraps an already loaded network.
    pub fn new(network: NetworkModel, source: impl Into<String>, palette: CarrierPalette) -> Self {
        Self {
            network,
            source: source.into(),
            palette,
            loaded_at: Utc::now(),
        }
    }

    /// Loads a network and starts a session over it.
    ///
    /// # Errors
    ///
    /// Propagates the [`LoadError`] of the load; no session exists then.
    pub fn open(method: &LoadMethod, palette: CarrierPalette) -> Result<Self, LoadError> {
        let network = loader::load(method)?;
        Ok(Self::new(network, method.describe(), palette))
    }

    pub fn network(&self) -> &NetworkModel {
        &self.network
    }

    /// Where the network came from, e.g. `"sample scigrid_de"`.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn palette(&self) -> &CarrierPalette {
        &self.palette
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SampleNetwork;

    #[test]
    fn open_describes_its_source() {
        let session = Session::open(
            &LoadMethod::Sample(SampleNetwork::AcDcMeshed),
            CarrierPalette::default(),
        )
        .unwrap();
        assert_eq!(session.source(), "sample ac_dc_meshed");
        assert_eq!(session.network().name(), Some("AC-DC-Meshed"));
    }

    #[test]
    fn failed_load_yields_no_session() {
        let result = Session::open(&LoadMethod::Upload(Vec::new()), CarrierPalette::default());
        assert!(result.is_err());
    }
}
