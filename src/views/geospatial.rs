use serde::Serialize;

use crate::network::ComponentKind;
use crate::session::Session;

use super::component::{self, ComponentSection};

/// Component table with map points for the geospatial menu.
#[derive(Debug, Clone, Serialize)]
pub struct GeospatialView<'a> {
    pub section: ComponentSection<'a>,
}

pub fn build(session: &Session, kind: ComponentKind) -> GeospatialView<'_> {
    GeospatialView {
        section: component::build(session, kind),
    }
}
