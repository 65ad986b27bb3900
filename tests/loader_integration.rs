//! Integration tests for network loading from folders, archives and samples.

mod common;

use std::fs;

use network_explorer::loader::{LoadError, LoadMethod, SampleNetwork, load};
use network_explorer::network::{ColumnData, ComponentKind};
use network_explorer::shape::timeseries::{Selection, ShapeMode, shape};

#[test]
fn csv_folder_loads_tables_series_and_metadata() {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_csv_network(dir.path());

    let network = load(&LoadMethod::Path(dir.path().to_path_buf())).expect("folder loads");
    assert_eq!(network.name(), Some("tri-bus"));
    assert_eq!(network.snapshots().len(), 3);
    assert_eq!(network.investment_periods(), &[2020]);
    assert_eq!(network.meta()["source"]["dataset"], "fixture");

    assert_eq!(network.table(ComponentKind::Buses).len(), 3);
    assert_eq!(network.table(ComponentKind::Generators).len(), 3);
    assert_eq!(network.table(ComponentKind::Lines).len(), 1);
    assert!(network.table(ComponentKind::Stores).is_empty());

    let p = network
        .series(ComponentKind::Generators, "p")
        .expect("generator output present");
    assert_eq!(p.column("wind"), Some(&[Some(120.0), None, Some(150.0)][..]));
    assert!(network.series(ComponentKind::Loads, "p_set").is_some());
}

#[test]
fn bus_coordinates_are_joined_onto_generators() {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_csv_network(dir.path());
    let network = load(&LoadMethod::Path(dir.path().to_path_buf())).expect("folder loads");

    let generators = network.table(ComponentKind::Generators);
    let (x, y) = generators.coordinates().expect("joined coordinates");
    assert_eq!(x, &[Some(10.0), Some(11.5), Some(13.4)]);
    assert_eq!(y, &[Some(54.0), Some(48.0), Some(52.5)]);
    assert!(network.table(ComponentKind::Loads).coordinates().is_some());
    // lines reference two buses and get no coordinates
    assert!(network.table(ComponentKind::Lines).coordinates().is_none());
}

#[test]
fn missing_carrier_cell_stays_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_csv_network(dir.path());
    let network = load(&LoadMethod::Path(dir.path().to_path_buf())).expect("folder loads");

    let carriers = network
        .table(ComponentKind::Generators)
        .text("carrier")
        .expect("carrier column");
    assert_eq!(carriers[2], None);
}

#[test]
fn json_archive_loads_from_path_and_upload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("network.json");
    fs::write(&path, common::archive_json()).expect("write archive");

    let from_path = load(&LoadMethod::Path(path)).expect("archive path loads");
    let from_upload =
        load(&LoadMethod::Upload(common::archive_json().into_bytes())).expect("upload loads");

    for network in [&from_path, &from_upload] {
        assert_eq!(network.name(), Some("archive-net"));
        assert_eq!(network.investment_periods(), &[2030]);
        assert_eq!(network.table(ComponentKind::Generators).len(), 2);
        assert!(network.series(ComponentKind::Buses, "marginal_price").is_some());
        assert!(matches!(
            network.table(ComponentKind::Generators).column("x"),
            Some(ColumnData::Numeric(_))
        ));
    }
}

#[test]
fn netcdf_upload_is_unsupported() {
    let mut bytes = b"\x89HDF\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&[0; 64]);
    let err = load(&LoadMethod::Upload(bytes)).expect_err("netcdf is rejected");
    assert!(matches!(err, LoadError::UnsupportedFormat(_)));
}

#[test]
fn malformed_archive_reports_file() {
    let err = load(&LoadMethod::Upload(b"{\"components\": 3}".to_vec())).expect_err("bad archive");
    assert!(matches!(err, LoadError::Malformed { .. }));
}

#[test]
fn unknown_sample_lists_available() {
    let err = "europe".parse::<SampleNetwork>().expect_err("unknown sample");
    let message = err.to_string();
    for sample in SampleNetwork::ALL {
        assert!(message.contains(sample.name()), "{message}");
    }
}

#[test]
fn every_sample_has_located_buses() {
    for sample in SampleNetwork::ALL {
        let network = load(&LoadMethod::Sample(sample)).expect("samples load");
        assert!(
            network.table(ComponentKind::Buses).coordinates().is_some(),
            "{sample}"
        );
        assert!(!network.snapshots().is_empty(), "{sample}");
    }
}

#[test]
fn numeric_bus_ids_still_join_coordinates() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("buses.csv"), "Bus,v_nom,x,y\n1,380,8.5,50.1\n2,220,9.0,51.0\n")
        .expect("write buses");
    fs::write(
        dir.path().join("generators.csv"),
        "Generator,bus,carrier,p_nom\ng1,1,wind,100\ng2,2,gas,50\n",
    )
    .expect("write generators");

    let network = load(&LoadMethod::Path(dir.path().to_path_buf())).expect("folder loads");
    let generators = network.table(ComponentKind::Generators);
    assert!(matches!(generators.column("bus"), Some(ColumnData::Text(_))));
    let (x, y) = generators.coordinates().expect("joined coordinates");
    assert_eq!(x, &[Some(8.5), Some(9.0)]);
    assert_eq!(y, &[Some(50.1), Some(51.0)]);
}

#[test]
fn nan_series_cells_are_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("snapshots.csv"),
        "snapshot\n2020-01-01 00:00:00\n2020-01-01 01:00:00\n",
    )
    .expect("write snapshots");
    fs::write(
        dir.path().join("generators-p.csv"),
        "snapshot,g1,g2\n2020-01-01 00:00:00,1,NaN\n2020-01-01 01:00:00,2,nan\n",
    )
    .expect("write series");

    let network = load(&LoadMethod::Path(dir.path().to_path_buf())).expect("folder loads");
    let p = network
        .series(ComponentKind::Generators, "p")
        .expect("generator output present");
    assert_eq!(p.column("g2"), Some(&[None, None][..]));

    let shaped = shape(
        ComponentKind::Generators,
        "p",
        p,
        ShapeMode::SumAll,
        &Selection::default(),
        None,
    )
    .expect("g1 has values");
    assert_eq!(shaped.series_names(), ["g1"]);
    assert_eq!(shaped.series(), vec![("g1", vec![Some(1.0), Some(2.0)])]);
}

#[test]
fn branch_tables_keep_reactance() {
    for sample in SampleNetwork::ALL {
        let network = load(&LoadMethod::Sample(sample)).expect("samples load");
        let lines = network.table(ComponentKind::Lines);
        if !lines.is_empty() {
            assert!(lines.has_column("x"), "{sample}");
        }
    }
}
