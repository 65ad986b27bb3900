//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use network_explorer::loader::{LoadMethod, SampleNetwork};
use network_explorer::session::Session;
use network_explorer::shape::color::CarrierPalette;

/// Session over a bundled sample with the default palette.
pub fn sample_session(sample: SampleNetwork) -> Session {
    Session::open(&LoadMethod::Sample(sample), CarrierPalette::default())
        .expect("samples always load")
}

/// Writes a small three-bus network in the csv-folder layout.
///
/// Generators `coal` and `wind` sit on located buses; `solar` has no carrier.
/// The `wind` output is missing at the second snapshot.
pub fn write_csv_network(dir: &Path) {
    let files = [
        ("network.csv", "name,srid\ntri-bus,4326\n"),
        (
            "snapshots.csv",
            "snapshot\n2020-01-01 00:00:00\n2020-01-01 01:00:00\n2020-01-01 02:00:00\n",
        ),
        ("investment_periods.csv", "period,objective\n2020,1.0\n"),
        ("meta.json", r#"{"source": {"dataset": "fixture"}}"#),
        ("buses.csv", "name,x,y,v_nom\nnorth,10.0,54.0,380\nsouth,11.5,48.0,380\neast,13.4,52.5,220\n"),
        (
            "generators.csv",
            "name,bus,carrier,p_nom\ncoal,north,coal,500\nwind,south,wind,200\nsolar,east,,50\n",
        ),
        ("loads.csv", "name,bus\ncity,east\n"),
        (
            "generators-p.csv",
            "snapshot,coal,wind,solar\n\
             2020-01-01 00:00:00,400,120,0\n\
             2020-01-01 01:00:00,380,,10\n\
             2020-01-01 02:00:00,350,150,20\n",
        ),
        (
            "loads-p_set.csv",
            "snapshot,city\n2020-01-01 00:00:00,520\n2020-01-01 01:00:00,390\n2020-01-01 02:00:00,520\n",
        ),
        ("lines.csv", "name,bus0,bus1,s_nom\nn-s,north,south,1000\n"),
    ];
    for (file, content) in files {
        fs::write(dir.join(file), content).expect("fixture write");
    }
}

/// A JSON archive with one located bus, two generators and a price series.
pub fn archive_json() -> String {
    r#"{
        "name": "archive-net",
        "snapshots": ["2030-06-01 12:00:00", "2030-06-01 13:00:00"],
        "investment_periods": [2030],
        "meta": {"scenario": "fixture"},
        "components": {
            "buses": {"index": ["hub"], "columns": {"x": [4.9], "y": [52.4]}},
            "generators": {
                "index": ["pv", "gas"],
                "columns": {
                    "bus": ["hub", "hub"],
                    "carrier": ["solar", "gas"],
                    "p_nom": [80.0, 120.0]
                }
            },
            "batteries": {"index": ["b"], "columns": {}}
        },
        "series": {
            "generators": {
                "p": {
                    "index": ["2030-06-01 12:00:00", "2030-06-01 13:00:00"],
                    "columns": {"pv": [60.0, 55.0], "gas": [10.0, 30.0]}
                }
            },
            "buses": {
                "marginal_price": {
                    "index": ["2030-06-01 12:00:00", "2030-06-01 13:00:00"],
                    "columns": {"hub": [42.0, 47.5]}
                }
            }
        }
    }"#
    .to_string()
}
