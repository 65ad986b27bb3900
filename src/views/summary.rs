//! System summary: component counts, network attributes and one component.

use serde::Serialize;

use crate::network::{ComponentKind, Snapshot};
use crate::session::Session;

use super::component::{self, ComponentSection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentCount {
    pub kind: ComponentKind,
    pub count: usize,
}

/// First and last snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub first: Snapshot,
    pub last: Snapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView<'a> {
    pub name: Option<&'a str>,
    /// Counts in the fixed summary order.
    pub counts: Vec<ComponentCount>,
    pub snapshot_count: usize,
    pub investment_periods: &'a [i64],
    pub time_range: Option<TimeRange>,
    pub section: ComponentSection<'a>,
}

pub fn build(session: &Session, kind: ComponentKind) -> SummaryView<'_> {
    let network = session.network();
    let snapshots = network.snapshots();
    SummaryView {
        name: network.name(),
        counts: ComponentKind::SUMMARY_ORDER
            .into_iter()
            .map(|kind| ComponentCount {
                kind,
                count: network.table(kind).len(),
            })
            .collect(),
        snapshot_count: snapshots.len(),
        investment_periods: network.investment_periods(),
        time_range: match (snapshots.first(), snapshots.last()) {
            (Some(first), Some(last)) => Some(TimeRange {
                first: first.clone(),
                last: last.clone(),
            }),
            _ => None,
        },
        section: component::build(session, kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadMethod, SampleNetwork};
    use crate::network::NetworkModel;
    use crate::shape::color::CarrierPalette;

    #[test]
    fn counts_follow_summary_order() {
        let session = Session::open(
            &LoadMethod::Sample(SampleNetwork::AcDcMeshed),
            CarrierPalette::default(),
        )
        .unwrap();
        let view = build(&session, ComponentKind::Generators);
        let kinds: Vec<ComponentKind> = view.counts.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, ComponentKind::SUMMARY_ORDER);
        assert_eq!(view.counts[0].count, 6);
        assert_eq!(view.snapshot_count, 10);
        assert!(view.time_range.is_some());
        assert_eq!(view.name, Some("AC-DC-Meshed"));
    }

    #[test]
    fn empty_network_has_no_time_range() {
        let session = Session::new(NetworkModel::new(), "empty", CarrierPalette::default());
        let view = build(&session, ComponentKind::Stores);
        assert!(view.time_range.is_none());
        assert!(view.counts.iter().all(|c| c.count == 0));
        assert!(view.section.table.notice().is_some());
    }
}
