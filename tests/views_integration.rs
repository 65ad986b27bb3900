//! Integration tests for view output over loaded networks.

mod common;

use network_explorer::loader::{LoadMethod, SampleNetwork};
use network_explorer::network::ComponentKind;
use network_explorer::reporting::render_view;
use network_explorer::session::Session;
use network_explorer::shape::Unavailable;
use network_explorer::shape::color::CarrierPalette;
use network_explorer::shape::timeseries::{Selection, ShapeMode, ShapedSeries};
use network_explorer::views::{Panel, View, ViewOutput, ViewRequest, dispatch};

fn folder_session() -> (tempfile::TempDir, Session) {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_csv_network(dir.path());
    let session = Session::open(
        &LoadMethod::Path(dir.path().to_path_buf()),
        CarrierPalette::default(),
    )
    .expect("folder loads");
    (dir, session)
}

fn temporal(session: &Session, request: ViewRequest) -> ShapedSeries {
    match dispatch(session, &request) {
        ViewOutput::Temporal(view) => match view.chart {
            Panel::Ready(chart) => chart.series,
            Panel::Unavailable(notice) => panic!("unexpected notice: {notice}"),
        },
        _ => panic!("expected the temporal view"),
    }
}

#[test]
fn summary_counts_follow_fixed_order() {
    let (_dir, session) = folder_session();
    let ViewOutput::Summary(view) = dispatch(&session, &ViewRequest::new(View::Summary)) else {
        panic!("expected the summary view");
    };
    let kinds: Vec<ComponentKind> = view.counts.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, ComponentKind::SUMMARY_ORDER);
    assert_eq!(view.counts[0].count, 3);
    assert_eq!(view.name, Some("tri-bus"));
    assert_eq!(view.snapshot_count, 3);
}

#[test]
fn capacity_breakdown_skips_unlabelled_generator() {
    let (_dir, session) = folder_session();
    let ViewOutput::Summary(view) = dispatch(&session, &ViewRequest::new(View::Summary)) else {
        panic!("expected the summary view");
    };
    let breakdown = view
        .section
        .capacity
        .and_then(|panel| panel.ready().cloned())
        .expect("capacity breakdown");
    let carriers: Vec<&str> = breakdown.shares.iter().map(|s| s.carrier.as_str()).collect();
    assert_eq!(carriers, ["coal", "wind"]);
    assert_eq!(breakdown.total(), 700.0);
}

#[test]
fn individual_mode_drops_rows_with_gaps() {
    let (_dir, session) = folder_session();
    let series = temporal(
        &session,
        ViewRequest::new(View::Temporal).with_selection(Selection::of(["coal", "wind"])),
    );
    assert_eq!(series.series_names(), ["coal", "wind"]);
    assert_eq!(series.len(), 2);
}

#[test]
fn carrier_mode_sums_labelled_entities() {
    let (_dir, session) = folder_session();
    let series = temporal(
        &session,
        ViewRequest::new(View::Temporal).with_mode(ShapeMode::AggregateByCarrier),
    );
    let ShapedSeries::Carriers(table) = series else {
        panic!("expected carrier series");
    };
    assert_eq!(table.column_names().collect::<Vec<_>>(), ["coal", "wind"]);
    // the gap in wind removes that snapshot from every carrier
    assert_eq!(table.len(), 2);
    assert_eq!(table.column("coal"), Some(&[Some(400.0), Some(350.0)][..]));
}

#[test]
fn sum_mode_skips_gaps() {
    let (_dir, session) = folder_session();
    let series = temporal(
        &session,
        ViewRequest::new(View::Temporal).with_mode(ShapeMode::SumAll),
    );
    let ShapedSeries::Total(total) = series else {
        panic!("expected a total series");
    };
    assert_eq!(total.values, [520.0, 390.0, 520.0]);
}

#[test]
fn single_column_bypasses_mode() {
    let (_dir, session) = folder_session();
    let series = temporal(
        &session,
        ViewRequest::new(View::Temporal)
            .with_component(ComponentKind::Loads)
            .with_attribute("p_set")
            .with_mode(ShapeMode::SumAll),
    );
    assert!(matches!(series, ShapedSeries::Entities(_)));
    assert_eq!(series.series_names(), ["city"]);
}

#[test]
fn missing_series_kind_is_a_notice() {
    let (_dir, session) = folder_session();
    let request = ViewRequest::new(View::Temporal).with_component(ComponentKind::StorageUnits);
    let ViewOutput::Temporal(view) = dispatch(&session, &request) else {
        panic!("expected the temporal view");
    };
    assert_eq!(
        view.chart.notice(),
        Some(&Unavailable::NoSeriesGroup {
            kind: ComponentKind::StorageUnits
        })
    );
}

#[test]
fn geospatial_points_carry_carrier_colors() {
    let (_dir, session) = folder_session();
    let request = ViewRequest::new(View::Geospatial).with_component(ComponentKind::Generators);
    let ViewOutput::Geospatial(view) = dispatch(&session, &request) else {
        panic!("expected the geospatial view");
    };
    let points = view.section.map.expect("generators are located");
    assert_eq!(points.len(), 3);
    let palette = CarrierPalette::default();
    assert_eq!(points[0].color, Some(palette.color_for("coal")));
    assert_eq!(points[2].carrier, None);
    assert_eq!(points[2].color, None);
}

#[test]
fn metadata_report_is_yaml() {
    let (_dir, session) = folder_session();
    let text = render_view(&dispatch(&session, &ViewRequest::new(View::Metadata)), 20);
    assert!(text.contains("source:\n  dataset: fixture\n"));
}

#[test]
fn report_renders_every_view_of_every_sample() {
    for sample in SampleNetwork::ALL {
        let session = common::sample_session(sample);
        for view in View::ALL {
            for &kind in view.component_menu() {
                let request = ViewRequest::new(view).with_component(kind);
                let text = render_view(&dispatch(&session, &request), 5);
                assert!(text.starts_with(&format!("--- {} ---", view.label())), "{sample} {view}");
            }
        }
    }
}
