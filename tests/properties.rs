//! Property tests for selection, aggregation, shaping and colors.

use proptest::prelude::*;

use network_explorer::network::{
    ColumnData, ComponentKind, ComponentTable, NetworkModel, Snapshot, TimeSeriesTable,
};
use network_explorer::shape::carrier::{CarrierLookup, aggregate_by_carrier};
use network_explorer::shape::color::{BrightnessBand, CarrierPalette};
use network_explorer::shape::select::select_by_name;
use network_explorer::shape::timeseries::{Selection, ShapeMode, ShapedSeries, align, shape};

fn axis(n: usize) -> Vec<Snapshot> {
    (0..n).map(|i| Snapshot::Label(format!("t{i}"))).collect()
}

fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("e{i}")).collect()
}

fn cell() -> impl Strategy<Value = Option<f64>> {
    prop::option::of((-1000i32..1000).prop_map(f64::from))
}

fn carrier() -> impl Strategy<Value = Option<String>> {
    prop::option::of(
        prop::sample::select(vec!["solar", "wind", "gas", "Solar"]).prop_map(String::from),
    )
}

fn series_table(rows: usize, columns: Vec<Vec<Option<f64>>>) -> TimeSeriesTable {
    let mut table = TimeSeriesTable::new(axis(rows));
    for (i, values) in columns.into_iter().enumerate() {
        table
            .insert_column(format!("e{i}"), values)
            .expect("generated columns span the axis");
    }
    table
}

proptest! {
    #[test]
    fn carrier_totals_preserve_sum(rows in prop::collection::vec((carrier(), cell()), 0..40)) {
        let (carriers, values): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        let expected: f64 = carriers
            .iter()
            .zip(&values)
            .filter(|(c, _)| c.is_some())
            .map(|(_, v)| v.unwrap_or(0.0))
            .sum();
        let table = ComponentTable::new(ids(values.len()))
            .and_then(|t| t.with_column("carrier", ColumnData::Text(carriers)))
            .and_then(|t| t.with_column("p_nom", ColumnData::Numeric(values)))
            .expect("valid table");

        let totals = aggregate_by_carrier(ComponentKind::Generators, &table, "p_nom")
            .expect("columns present");
        let grouped: f64 = totals.values().sum();
        prop_assert_eq!(grouped, expected);
    }

    #[test]
    fn align_is_idempotent(
        (rows, columns) in (0usize..8).prop_flat_map(|rows| {
            (Just(rows), prop::collection::vec(prop::collection::vec(cell(), rows), 0..6))
        })
    ) {
        let table = series_table(rows, columns);
        let once = align(&table);
        prop_assert_eq!(align(&once), once.clone());
        prop_assert!(once.column_count() <= table.column_count());
    }

    #[test]
    fn colors_are_deterministic_and_case_insensitive(label in "[A-Za-z ]{1,16}") {
        let palette = CarrierPalette::default();
        let again = CarrierPalette::default();
        prop_assert_eq!(palette.color_for(&label), again.color_for(&label));
        prop_assert_eq!(palette.color_for(&label), palette.color_for(&label.to_uppercase()));
        prop_assert_eq!(palette.color_for(&label), palette.color_for(&label.to_lowercase()));
    }

    #[test]
    fn fallback_colors_stay_in_band(
        label in "zz-[a-z0-9]{1,12}",
        (min, max) in (0u8..=255).prop_flat_map(|min| (Just(min), min..=255u8)),
    ) {
        let band = BrightnessBand { min, max };
        let palette = CarrierPalette::new(band);
        prop_assert!(palette.known(&label).is_none());
        prop_assert!(band.contains(palette.color_for(&label)));
    }

    #[test]
    fn coordinates_stay_paired(has_x in any::<bool>(), has_y in any::<bool>(), n in 1usize..5) {
        let mut table = ComponentTable::new(ids(n)).expect("unique ids");
        if has_x {
            table.insert_column("x", ColumnData::Numeric(vec![Some(1.0); n])).expect("fresh column");
        }
        if has_y {
            table.insert_column("y", ColumnData::Numeric(vec![Some(2.0); n])).expect("fresh column");
        }
        let dropped = table.enforce_coordinate_pairing();
        prop_assert_eq!(table.has_column("x"), table.has_column("y"));
        prop_assert_eq!(dropped.is_some(), has_x != has_y);
    }

    #[test]
    fn unknown_names_are_not_empty_tables(name in "[a-z]{3,10}") {
        let network = NetworkModel::new();
        let squash = |s: &str| s.replace(['_', ' ', '-'], "").to_lowercase();
        let known = ComponentKind::ALL
            .iter()
            .any(|k| name == squash(k.file_stem()) || name == squash(k.label()));
        match select_by_name(&network, &name) {
            Ok((_, table)) => {
                prop_assert!(known);
                prop_assert!(table.is_empty());
            }
            Err(_) => prop_assert!(!known),
        }
    }
}

#[test]
fn every_kind_selects_an_empty_table_on_an_empty_network() {
    let network = NetworkModel::new();
    for kind in ComponentKind::ALL {
        let (selected, table) = select_by_name(&network, kind.file_stem()).expect("known kind");
        assert_eq!(selected, kind);
        assert!(table.is_empty());
    }
    assert!(select_by_name(&network, "shunt_impedances").is_err());
}

#[test]
fn sum_all_counts_missing_as_zero() {
    let table = series_table(
        3,
        vec![
            vec![Some(1.0), None, Some(3.0)],
            vec![Some(2.0), Some(2.0), None],
            vec![None, None, None],
        ],
    );
    let shaped = shape(
        ComponentKind::Generators,
        "p",
        &table,
        ShapeMode::SumAll,
        &Selection::FirstAvailable,
        None,
    )
    .expect("non-empty");
    let ShapedSeries::Total(total) = shaped else {
        panic!("expected a total series");
    };
    assert_eq!(total.values, [3.0, 2.0, 3.0]);
}

#[test]
fn individual_keeps_rows_where_all_selected_are_present() {
    let table = TimeSeriesTable::new(axis(2))
        .with_column("A", vec![Some(1.0), None])
        .and_then(|t| t.with_column("B", vec![Some(2.0), Some(2.0)]))
        .expect("valid table");
    let shaped = shape(
        ComponentKind::Generators,
        "p",
        &table,
        ShapeMode::Individual,
        &Selection::of(["A", "B"]),
        None,
    )
    .expect("non-empty");
    assert_eq!(shaped.index(), &axis(1)[..]);
    assert_eq!(
        shaped.series(),
        vec![("A", vec![Some(1.0)]), ("B", vec![Some(2.0)])]
    );
}

#[test]
fn carrier_groups_drop_rows_with_missing_members() {
    let table = TimeSeriesTable::new(axis(2))
        .with_column("s1", vec![Some(1.0), Some(1.0)])
        .and_then(|t| t.with_column("s2", vec![Some(2.0), None]))
        .and_then(|t| t.with_column("g1", vec![Some(5.0), Some(5.0)]))
        .expect("valid table");
    let generators = ComponentTable::new(vec!["s1".into(), "s2".into(), "g1".into()])
        .and_then(|t| {
            t.with_column(
                "carrier",
                ColumnData::Text(vec![
                    Some("solar".into()),
                    Some("solar".into()),
                    Some("gas".into()),
                ]),
            )
        })
        .expect("valid table");
    let lookup = CarrierLookup::from_table(ComponentKind::Generators, &generators).expect("carriers");

    let shaped = shape(
        ComponentKind::Generators,
        "p",
        &table,
        ShapeMode::AggregateByCarrier,
        &Selection::FirstAvailable,
        Some(&lookup),
    )
    .expect("non-empty");
    assert_eq!(shaped.len(), 1);
    assert_eq!(
        shaped.series(),
        vec![("solar", vec![Some(3.0)]), ("gas", vec![Some(5.0)])]
    );
}
