//! Bundled sample networks.
//!
//! Each sample is a static blueprint (buses, assets, topology) plus a seeded
//! dispatch so the time series are identical on every run.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::network::table::{BUS_COLUMN, CARRIER_COLUMN, X_COLUMN, Y_COLUMN};
use crate::network::{
    ColumnData, ComponentKind, ComponentTable, NetworkModel, Snapshot, TableError, TimeSeriesTable,
};

use super::LoadError;

/// The sample networks shipped with the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleNetwork {
    /// Meshed AC grids in Great Britain, Germany and Norway joined by HVDC.
    AcDcMeshed,
    /// Reduced German transmission grid with a wide carrier mix.
    ScigridDe,
    /// Renewable grid with batteries, hydrogen storage and an HVDC overlay.
    StorageHvdc,
}

impl SampleNetwork {
    /// All samples, in menu order.
    pub const ALL: [Self; 3] = [Self::AcDcMeshed, Self::ScigridDe, Self::StorageHvdc];

    /// Identifier used on the command line and in the API.
    pub fn name(self) -> &'static str {
        match self {
            Self::AcDcMeshed => "ac_dc_meshed",
            Self::ScigridDe => "scigrid_de",
            Self::StorageHvdc => "storage_hvdc",
        }
    }

    /// One-line description for menus.
    pub fn description(self) -> &'static str {
        match self {
            Self::AcDcMeshed => "AC grids in GB, DE and NO coupled by an HVDC link",
            Self::ScigridDe => "reduced German grid, 24 hours, many carriers",
            Self::StorageHvdc => "renewables with batteries, hydrogen and HVDC links",
        }
    }

    pub(crate) fn build(self) -> Result<NetworkModel, LoadError> {
        match self {
            Self::AcDcMeshed => ac_dc_meshed().assemble(),
            Self::ScigridDe => scigrid_de().assemble(),
            Self::StorageHvdc => storage_hvdc().assemble(),
        }
    }
}

impl fmt::Display for SampleNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleNetwork {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|sample| sample.name() == wanted)
            .ok_or_else(|| LoadError::UnknownSample {
                name: s.to_string(),
                available: Self::ALL.map(Self::name).join(", "),
            })
    }
}

struct BusSpec {
    name: &'static str,
    v_nom: f64,
    carrier: &'static str,
    x: f64,
    y: f64,
}

struct GeneratorSpec {
    name: &'static str,
    bus: &'static str,
    /// Empty for generators without a carrier label.
    carrier: &'static str,
    p_nom: f64,
    marginal_cost: f64,
}

struct LoadSpec {
    name: &'static str,
    bus: &'static str,
    base: f64,
}

/// Lines and transformers: two-ended branches.
struct BranchSpec {
    name: &'static str,
    bus0: &'static str,
    bus1: &'static str,
    s_nom: f64,
    x: f64,
}

struct LinkSpec {
    name: &'static str,
    bus0: &'static str,
    bus1: &'static str,
    carrier: &'static str,
    p_nom: f64,
    efficiency: f64,
}

struct StorageSpec {
    name: &'static str,
    bus: &'static str,
    carrier: &'static str,
    p_nom: f64,
    max_hours: f64,
}

struct StoreSpec {
    name: &'static str,
    bus: &'static str,
    carrier: &'static str,
    e_nom: f64,
}

struct Blueprint {
    name: &'static str,
    start: (i32, u32, u32),
    steps: usize,
    seed: u64,
    periods: Vec<i64>,
    meta: serde_json::Value,
    buses: Vec<BusSpec>,
    generators: Vec<GeneratorSpec>,
    /// Generators listed in the table but without any dispatch values.
    retired: Vec<&'static str>,
    loads: Vec<LoadSpec>,
    lines: Vec<BranchSpec>,
    transformers: Vec<BranchSpec>,
    links: Vec<LinkSpec>,
    storage_units: Vec<StorageSpec>,
    stores: Vec<StoreSpec>,
}

fn ac_dc_meshed() -> Blueprint {
    let bus = |name, v_nom, carrier, x, y| BusSpec { name, v_nom, carrier, x, y };
    let generator = |name, bus, carrier, p_nom, marginal_cost| GeneratorSpec {
        name,
        bus,
        carrier,
        p_nom,
        marginal_cost,
    };
    let load = |name, base| LoadSpec { name, bus: name, base };
    let line = |name, bus0, bus1, s_nom, x| BranchSpec { name, bus0, bus1, s_nom, x };
    let link = |name, bus0, bus1, carrier, p_nom, efficiency| LinkSpec {
        name,
        bus0,
        bus1,
        carrier,
        p_nom,
        efficiency,
    };

    Blueprint {
        name: "AC-DC-Meshed",
        start: (2015, 1, 1),
        steps: 10,
        seed: 7,
        periods: Vec::new(),
        meta: json!({}),
        buses: vec![
            bus("London", 380.0, "AC", -0.13, 51.51),
            bus("Norwich", 380.0, "AC", 1.30, 52.63),
            bus("Norwich DC", 200.0, "DC", 1.35, 52.60),
            bus("Manchester", 380.0, "AC", -2.24, 53.48),
            bus("Bremen", 380.0, "AC", 8.80, 53.08),
            bus("Bremen DC", 200.0, "DC", 8.75, 53.05),
            bus("Frankfurt", 380.0, "AC", 8.68, 50.11),
            bus("Norway", 380.0, "AC", 10.75, 59.91),
            bus("Norway DC", 200.0, "DC", 10.70, 59.85),
        ],
        generators: vec![
            generator("Manchester Wind", "Manchester", "wind", 80.0, 0.0),
            generator("Manchester Gas", "Manchester", "gas", 50_000.0, 25.0),
            generator("Norway Wind", "Norway", "wind", 100.0, 0.0),
            generator("Norway Gas", "Norway", "gas", 20_000.0, 30.0),
            generator("Frankfurt Wind", "Frankfurt", "wind", 110.0, 0.0),
            generator("Frankfurt Gas", "Frankfurt", "gas", 80_000.0, 22.0),
        ],
        retired: Vec::new(),
        loads: vec![
            load("London", 200.0),
            load("Norwich", 90.0),
            load("Manchester", 160.0),
            load("Bremen", 110.0),
            load("Frankfurt", 180.0),
            load("Norway", 120.0),
        ],
        lines: vec![
            line("0", "London", "Norwich", 500.0, 0.1),
            line("1", "Norwich", "Manchester", 500.0, 0.1),
            line("2", "London", "Manchester", 700.0, 0.12),
            line("3", "Bremen", "Frankfurt", 600.0, 0.08),
            line("4", "Frankfurt", "Bremen", 400.0, 0.09),
            line("5", "Manchester", "London", 300.0, 0.05),
            line("6", "Norwich DC", "Bremen DC", 1_000.0, 0.01),
        ],
        transformers: Vec::new(),
        links: vec![
            link("Norwich Converter", "Norwich", "Norwich DC", "AC-DC", 1_000.0, 0.98),
            link("Norway Converter", "Norway", "Norway DC", "AC-DC", 1_000.0, 0.98),
            link("Bremen Converter", "Bremen", "Bremen DC", "AC-DC", 1_000.0, 0.98),
            link("DC link", "Norway DC", "Bremen DC", "DC", 1_000.0, 0.97),
        ],
        storage_units: Vec::new(),
        stores: Vec::new(),
    }
}

fn scigrid_de() -> Blueprint {
    let bus = |name, v_nom, x, y| BusSpec { name, v_nom, carrier: "AC", x, y };
    let generator = |name, bus, carrier, p_nom, marginal_cost| GeneratorSpec {
        name,
        bus,
        carrier,
        p_nom,
        marginal_cost,
    };
    let load = |name, bus, base| LoadSpec { name, bus, base };
    let branch = |name, bus0, bus1, s_nom, x| BranchSpec { name, bus0, bus1, s_nom, x };
    let storage = |name, bus, p_nom| StorageSpec {
        name,
        bus,
        carrier: "Pumped Hydro",
        p_nom,
        max_hours: 6.0,
    };

    Blueprint {
        name: "scigrid-de",
        start: (2011, 1, 1),
        steps: 24,
        seed: 2011,
        periods: Vec::new(),
        meta: json!({
            "source": {"dataset": "SciGRID", "release": "0.2", "country": "DE"},
            "crs": "EPSG:4326",
            "notes": ["reduced topology", "synthetic dispatch"],
        }),
        buses: vec![
            bus("Hamburg", 380.0, 9.99, 53.55),
            bus("Hamburg 220", 220.0, 10.05, 53.50),
            bus("Berlin", 380.0, 13.40, 52.52),
            bus("Hannover", 380.0, 9.73, 52.37),
            bus("Leipzig", 380.0, 12.37, 51.34),
            bus("Koeln", 380.0, 6.96, 50.94),
            bus("Koeln 220", 220.0, 7.02, 50.90),
            bus("Frankfurt", 380.0, 8.68, 50.11),
            bus("Stuttgart", 380.0, 9.18, 48.78),
            bus("Muenchen", 380.0, 11.58, 48.14),
        ],
        generators: vec![
            generator("Brokdorf", "Hamburg", "Nuclear", 1_410.0, 8.0),
            generator("Moorburg", "Hamburg 220", "Hard Coal", 1_650.0, 30.0),
            generator("Nordsee Ost", "Hamburg", "Wind Offshore", 295.0, 0.0),
            generator("Uckermark Wind", "Berlin", "Wind Onshore", 900.0, 0.0),
            generator("Lippendorf", "Leipzig", "Brown Coal", 1_840.0, 18.0),
            generator("Boxberg", "Leipzig", "Brown Coal", 2_100.0, 18.0),
            generator("Brandenburg Solar", "Berlin", "Solar", 1_200.0, 0.0),
            generator("Niederaussem", "Koeln", "Brown Coal", 3_400.0, 20.0),
            generator("Koeln Gas", "Koeln 220", "Gas", 800.0, 55.0),
            generator("Staudinger", "Frankfurt", "Hard Coal", 1_000.0, 32.0),
            generator("Frankfurt Multi", "Frankfurt", "Multiple", 350.0, 45.0),
            generator("Neckarwestheim", "Stuttgart", "Nuclear", 1_310.0, 8.0),
            generator("Stuttgart Waste", "Stuttgart", "Waste", 120.0, 5.0),
            generator("Bayern Solar", "Muenchen", "Solar", 1_800.0, 0.0),
            generator("Isar Run of River", "Muenchen", "Run of River", 400.0, 0.0),
            generator("Unterhaching", "Muenchen", "Geothermal", 40.0, 2.0),
            generator("Ingolstadt Oil", "Muenchen", "Oil", 300.0, 90.0),
            generator("Hannover Mixed", "Hannover", "Other", 150.0, 60.0),
            generator("Hannover Unlabelled", "Hannover", "", 60.0, 40.0),
            generator("Stade", "Hamburg", "Nuclear", 640.0, 8.0),
        ],
        retired: vec!["Stade"],
        loads: vec![
            load("Hamburg", "Hamburg", 1_700.0),
            load("Berlin", "Berlin", 2_300.0),
            load("Hannover", "Hannover", 900.0),
            load("Leipzig", "Leipzig", 1_000.0),
            load("Koeln", "Koeln", 2_600.0),
            load("Frankfurt", "Frankfurt", 1_900.0),
            load("Stuttgart", "Stuttgart", 1_600.0),
            load("Muenchen", "Muenchen", 2_000.0),
        ],
        lines: vec![
            branch("1", "Hamburg", "Berlin", 1_790.0, 12.4),
            branch("2", "Hamburg", "Hannover", 1_790.0, 6.9),
            branch("3", "Berlin", "Leipzig", 1_790.0, 8.8),
            branch("4", "Hannover", "Leipzig", 1_790.0, 10.1),
            branch("5", "Hannover", "Koeln", 2_690.0, 11.6),
            branch("6", "Koeln", "Frankfurt", 1_790.0, 7.6),
            branch("7", "Leipzig", "Frankfurt", 1_790.0, 13.9),
            branch("8", "Frankfurt", "Stuttgart", 2_690.0, 6.3),
            branch("9", "Stuttgart", "Muenchen", 1_790.0, 7.2),
            branch("10", "Leipzig", "Muenchen", 1_790.0, 15.3),
        ],
        transformers: vec![
            branch("T Hamburg", "Hamburg", "Hamburg 220", 1_200.0, 0.05),
            branch("T Koeln", "Koeln", "Koeln 220", 1_000.0, 0.05),
        ],
        links: Vec::new(),
        storage_units: vec![
            storage("Goldisthal", "Leipzig", 1_060.0),
            storage("Waldeck", "Frankfurt", 440.0),
        ],
        stores: Vec::new(),
    }
}

fn storage_hvdc() -> Blueprint {
    let bus = |name, x, y| BusSpec { name, v_nom: 380.0, carrier: "AC", x, y };
    let generator = |name, bus, carrier: &'static str, p_nom| GeneratorSpec {
        name,
        bus,
        carrier,
        p_nom,
        marginal_cost: if carrier == "gas" { 70.0 } else { 0.0 },
    };
    let load = |name, bus, base| LoadSpec { name, bus, base };
    let link = |name, bus0, bus1, p_nom| LinkSpec {
        name,
        bus0,
        bus1,
        carrier: "DC",
        p_nom,
        efficiency: 0.97,
    };
    let storage = |name, bus, carrier, p_nom, max_hours| StorageSpec {
        name,
        bus,
        carrier,
        p_nom,
        max_hours,
    };
    let store = |name, bus, e_nom| StoreSpec {
        name,
        bus,
        carrier: "H2",
        e_nom,
    };

    Blueprint {
        name: "storage-hvdc",
        start: (2030, 1, 1),
        steps: 12,
        seed: 2030,
        periods: vec![2030],
        meta: json!({
            "scenario": {"horizon": 2030, "co2_limit": 0.0},
            "storage": {"battery_hours": 4, "hydrogen_hours": 168},
        }),
        buses: vec![
            bus("0", 6.2, 53.4),
            bus("1", 9.1, 54.6),
            bus("2", 12.8, 52.9),
            bus("3", 7.4, 49.8),
            bus("4", 11.3, 48.6),
            bus("5", 14.2, 50.7),
        ],
        generators: vec![
            generator("0 wind", "0", "wind", 900.0),
            generator("0 solar", "0", "solar", 400.0),
            generator("1 wind", "1", "wind", 1_200.0),
            generator("2 solar", "2", "solar", 700.0),
            generator("2 gas", "2", "gas", 600.0),
            generator("3 wind", "3", "wind", 500.0),
            generator("3 solar", "3", "solar", 800.0),
            generator("4 solar", "4", "solar", 1_100.0),
            generator("5 wind", "5", "wind", 650.0),
            generator("5 gas", "5", "gas", 400.0),
        ],
        retired: Vec::new(),
        loads: vec![
            load("0 load", "0", 420.0),
            load("1 load", "1", 260.0),
            load("2 load", "2", 510.0),
            load("3 load", "3", 380.0),
            load("4 load", "4", 600.0),
            load("5 load", "5", 330.0),
        ],
        lines: Vec::new(),
        transformers: Vec::new(),
        links: vec![
            link("0-1 HVDC", "0", "1", 800.0),
            link("1-2 HVDC", "1", "2", 800.0),
            link("0-3 HVDC", "0", "3", 600.0),
            link("3-4 HVDC", "3", "4", 600.0),
            link("2-5 HVDC", "2", "5", 500.0),
            link("4-5 HVDC", "4", "5", 500.0),
        ],
        storage_units: vec![
            storage("0 battery", "0", "battery", 200.0, 4.0),
            storage("2 battery", "2", "battery", 250.0, 4.0),
            storage("4 battery", "4", "battery", 300.0, 4.0),
            storage("1 hydrogen", "1", "H2", 150.0, 168.0),
            storage("5 hydrogen", "5", "H2", 120.0, 168.0),
        ],
        stores: vec![store("1 H2 store", "1", 25_000.0), store("5 H2 store", "5", 18_000.0)],
    }
}

impl Blueprint {
    fn assemble(&self) -> Result<NetworkModel, LoadError> {
        let snapshots = self.snapshots()?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let hours: Vec<f64> = snapshots
            .iter()
            .filter_map(Snapshot::timestamp)
            .map(|ts| hour_of_day(&ts))
            .collect();

        let mut network = NetworkModel::new()
            .with_name(self.name)
            .with_snapshots(snapshots.clone())
            .with_investment_periods(self.periods.clone())
            .with_meta(self.meta.clone());

        network.set_table(ComponentKind::Buses, self.bus_table()?);
        network.set_table(ComponentKind::Generators, self.generator_table()?);
        network.set_table(ComponentKind::Loads, self.load_table()?);
        network.set_table(ComponentKind::Lines, branch_table("lines", &self.lines)?);
        network.set_table(
            ComponentKind::Transformers,
            branch_table("transformers", &self.transformers)?,
        );
        network.set_table(ComponentKind::Links, self.link_table()?);
        network.set_table(ComponentKind::StorageUnits, self.storage_table()?);
        network.set_table(ComponentKind::Stores, self.store_table()?);

        let demand: Vec<Vec<f64>> = self
            .loads
            .iter()
            .map(|load| {
                hours
                    .iter()
                    .map(|&h| {
                        load.base * daily_demand(h) * (1.0 + gaussian_noise(&mut rng, 0.02))
                    })
                    .collect()
            })
            .collect();
        let total_demand: Vec<f64> = (0..hours.len())
            .map(|t| demand.iter().map(|d| d[t]).sum())
            .collect();

        let availability = self.availability(&hours, &mut rng);
        let dispatch = self.dispatch(&availability, &total_demand);

        let load_columns: Vec<_> = self
            .loads
            .iter()
            .zip(&demand)
            .map(|(load, values)| (load.name, values.clone()))
            .collect();
        network.insert_series(
            ComponentKind::Loads,
            "p_set",
            series("loads-p_set", &snapshots, &load_columns)?,
        );
        network.insert_series(
            ComponentKind::Loads,
            "p",
            series("loads-p", &snapshots, &load_columns)?,
        );

        let variable: Vec<_> = self
            .generators
            .iter()
            .zip(&availability)
            .filter_map(|(g, avail)| Some((g.name, avail.clone()?)))
            .collect();
        if !variable.is_empty() {
            network.insert_series(
                ComponentKind::Generators,
                "p_max_pu",
                series("generators-p_max_pu", &snapshots, &variable)?,
            );
        }

        let mut p = TimeSeriesTable::new(snapshots.clone());
        for (generator, values) in self.generators.iter().zip(&dispatch) {
            let cells = if self.retired.contains(&generator.name) {
                vec![None; values.len()]
            } else {
                values.iter().copied().map(Some).collect()
            };
            p.insert_column(generator.name, cells)
                .map_err(|e| sample_error("generators-p", e))?;
        }
        network.insert_series(ComponentKind::Generators, "p", p);

        let price = self.clearing_price(&dispatch);
        let bus_price: Vec<_> = self
            .buses
            .iter()
            .map(|bus| {
                let values = price
                    .iter()
                    .map(|&p| (p + gaussian_noise(&mut rng, 0.5)).max(0.0))
                    .collect();
                (bus.name, values)
            })
            .collect();
        network.insert_series(
            ComponentKind::Buses,
            "marginal_price",
            series("buses-marginal_price", &snapshots, &bus_price)?,
        );
        let voltage: Vec<_> = self
            .buses
            .iter()
            .map(|bus| {
                let values = (0..hours.len())
                    .map(|_| 1.0 + gaussian_noise(&mut rng, 0.01))
                    .collect();
                (bus.name, values)
            })
            .collect();
        network.insert_series(
            ComponentKind::Buses,
            "v_mag_pu",
            series("buses-v_mag_pu", &snapshots, &voltage)?,
        );

        if !self.lines.is_empty() {
            let (p0, p1) = branch_flows(&self.lines, hours.len(), &mut rng);
            network.insert_series(ComponentKind::Lines, "p0", series("lines-p0", &snapshots, &p0)?);
            network.insert_series(ComponentKind::Lines, "p1", series("lines-p1", &snapshots, &p1)?);
        }

        if !self.storage_units.is_empty() {
            let (p, soc) = self.storage_operation(&hours);
            network.insert_series(
                ComponentKind::StorageUnits,
                "p",
                series("storage_units-p", &snapshots, &p)?,
            );
            network.insert_series(
                ComponentKind::StorageUnits,
                "state_of_charge",
                series("storage_units-state_of_charge", &snapshots, &soc)?,
            );
        }

        Ok(network)
    }

    fn snapshots(&self) -> Result<Vec<Snapshot>, LoadError> {
        let (year, month, day) = self.start;
        let start: NaiveDateTime = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| LoadError::malformed(self.name, "invalid sample start date"))?;
        Ok((0..self.steps)
            .map(|step| Snapshot::Timestamp(start + Duration::hours(step as i64)))
            .collect())
    }

    fn bus_table(&self) -> Result<ComponentTable, LoadError> {
        let rows = &self.buses;
        table(
            "buses",
            rows.iter().map(|b| b.name),
            [
                ("v_nom", numbers(rows.iter().map(|b| b.v_nom))),
                (CARRIER_COLUMN, text(rows.iter().map(|b| b.carrier))),
                (X_COLUMN, numbers(rows.iter().map(|b| b.x))),
                (Y_COLUMN, numbers(rows.iter().map(|b| b.y))),
            ],
        )
    }

    fn generator_table(&self) -> Result<ComponentTable, LoadError> {
        let rows = &self.generators;
        table(
            "generators",
            rows.iter().map(|g| g.name),
            [
                (BUS_COLUMN, text(rows.iter().map(|g| g.bus))),
                (CARRIER_COLUMN, text(rows.iter().map(|g| g.carrier))),
                ("p_nom", numbers(rows.iter().map(|g| g.p_nom))),
                ("marginal_cost", numbers(rows.iter().map(|g| g.marginal_cost))),
            ],
        )
    }

    fn load_table(&self) -> Result<ComponentTable, LoadError> {
        let rows = &self.loads;
        table(
            "loads",
            rows.iter().map(|l| l.name),
            [(BUS_COLUMN, text(rows.iter().map(|l| l.bus)))],
        )
    }

    fn link_table(&self) -> Result<ComponentTable, LoadError> {
        let rows = &self.links;
        table(
            "links",
            rows.iter().map(|l| l.name),
            [
                ("bus0", text(rows.iter().map(|l| l.bus0))),
                ("bus1", text(rows.iter().map(|l| l.bus1))),
                (CARRIER_COLUMN, text(rows.iter().map(|l| l.carrier))),
                ("p_nom", numbers(rows.iter().map(|l| l.p_nom))),
                ("efficiency", numbers(rows.iter().map(|l| l.efficiency))),
            ],
        )
    }

    fn storage_table(&self) -> Result<ComponentTable, LoadError> {
        let rows = &self.storage_units;
        table(
            "storage_units",
            rows.iter().map(|s| s.name),
            [
                (BUS_COLUMN, text(rows.iter().map(|s| s.bus))),
                (CARRIER_COLUMN, text(rows.iter().map(|s| s.carrier))),
                ("p_nom", numbers(rows.iter().map(|s| s.p_nom))),
                ("max_hours", numbers(rows.iter().map(|s| s.max_hours))),
            ],
        )
    }

    fn store_table(&self) -> Result<ComponentTable, LoadError> {
        let rows = &self.stores;
        table(
            "stores",
            rows.iter().map(|s| s.name),
            [
                (BUS_COLUMN, text(rows.iter().map(|s| s.bus))),
                (CARRIER_COLUMN, text(rows.iter().map(|s| s.carrier))),
                ("e_nom", numbers(rows.iter().map(|s| s.e_nom))),
            ],
        )
    }

    /// Per-unit availability of each generator; `None` for dispatchable ones.
    fn availability(&self, hours: &[f64], rng: &mut StdRng) -> Vec<Option<Vec<f64>>> {
        self.generators
            .iter()
            .map(|g| match g.carrier.to_ascii_lowercase() {
                c if c.contains("wind") => Some(wind_availability(rng, hours.len())),
                c if c.contains("solar") => Some(
                    hours
                        .iter()
                        .map(|&h| {
                            let noisy = solar_availability(h) * (1.0 + gaussian_noise(rng, 0.05));
                            noisy.clamp(0.0, 1.0)
                        })
                        .collect(),
                ),
                _ => None,
            })
            .collect()
    }

    /// Variable generators run first (curtailed to demand), then dispatchable
    /// capacity covers the rest pro rata.
    fn dispatch(&self, availability: &[Option<Vec<f64>>], demand: &[f64]) -> Vec<Vec<f64>> {
        let dispatchable: f64 = self
            .generators
            .iter()
            .zip(availability)
            .filter(|(g, avail)| avail.is_none() && !self.retired.contains(&g.name))
            .map(|(g, _)| g.p_nom)
            .sum();

        let mut out = vec![vec![0.0; demand.len()]; self.generators.len()];
        for (t, &load) in demand.iter().enumerate() {
            let renewable: f64 = self
                .generators
                .iter()
                .zip(availability)
                .filter_map(|(g, avail)| Some(avail.as_ref()?[t] * g.p_nom))
                .sum();
            let curtail = if renewable > load { load / renewable } else { 1.0 };
            let residual = (load - renewable).max(0.0);
            let share = if dispatchable > 0.0 {
                (residual / dispatchable).min(1.0)
            } else {
                0.0
            };
            for (i, (g, avail)) in self.generators.iter().zip(availability).enumerate() {
                out[i][t] = match avail {
                    Some(avail) => avail[t] * g.p_nom * curtail,
                    None if self.retired.contains(&g.name) => 0.0,
                    None => g.p_nom * share,
                };
            }
        }
        out
    }

    /// Highest marginal cost among generators running at each snapshot.
    fn clearing_price(&self, dispatch: &[Vec<f64>]) -> Vec<f64> {
        let steps = dispatch.first().map_or(0, Vec::len);
        (0..steps)
            .map(|t| {
                self.generators
                    .iter()
                    .zip(dispatch)
                    .filter(|(_, p)| p[t] > 1e-6)
                    .map(|(g, _)| g.marginal_cost)
                    .fold(0.0, f64::max)
            })
            .collect()
    }

    /// Charge at midday, discharge in the evening. Positive `p` discharges.
    fn storage_operation(&self, hours: &[f64]) -> (Columns, Columns) {
        let mut p = Vec::with_capacity(self.storage_units.len());
        let mut soc = Vec::with_capacity(self.storage_units.len());
        for unit in &self.storage_units {
            let capacity = unit.p_nom * unit.max_hours;
            let mut level = capacity / 2.0;
            let mut power = Vec::with_capacity(hours.len());
            let mut state = Vec::with_capacity(hours.len());
            for &h in hours {
                let wanted = -unit.p_nom * (2.0 * PI * (h - 6.0) / 24.0).sin() * 0.8;
                let actual = wanted.clamp(level - capacity, level);
                level -= actual;
                power.push(actual);
                state.push(level);
            }
            p.push((unit.name, power));
            soc.push((unit.name, state));
        }
        (p, soc)
    }
}

type Columns = Vec<(&'static str, Vec<f64>)>;

fn table<const N: usize>(
    file: &str,
    ids: impl Iterator<Item = &'static str>,
    columns: [(&'static str, ColumnData); N],
) -> Result<ComponentTable, LoadError> {
    let mut table = ComponentTable::new(ids.map(str::to_string).collect())
        .map_err(|e| sample_error(file, e))?;
    for (name, data) in columns {
        table
            .insert_column(name, data)
            .map_err(|e| sample_error(file, e))?;
    }
    Ok(table)
}

fn branch_table(file: &str, rows: &[BranchSpec]) -> Result<ComponentTable, LoadError> {
    table(
        file,
        rows.iter().map(|b| b.name),
        [
            ("bus0", text(rows.iter().map(|b| b.bus0))),
            ("bus1", text(rows.iter().map(|b| b.bus1))),
            ("s_nom", numbers(rows.iter().map(|b| b.s_nom))),
            ("x", numbers(rows.iter().map(|b| b.x))),
        ],
    )
}

fn series(
    file: &str,
    snapshots: &[Snapshot],
    columns: &[(&'static str, Vec<f64>)],
) -> Result<TimeSeriesTable, LoadError> {
    let mut table = TimeSeriesTable::new(snapshots.to_vec());
    for (name, values) in columns {
        table
            .insert_column(*name, values.iter().copied().map(Some).collect())
            .map_err(|e| sample_error(file, e))?;
    }
    Ok(table)
}

fn sample_error(file: &str, source: TableError) -> LoadError {
    LoadError::table(format!("sample {file}"), source)
}

fn numbers(values: impl Iterator<Item = f64>) -> ColumnData {
    ColumnData::Numeric(values.map(Some).collect())
}

/// Empty strings become missing cells.
fn text(values: impl Iterator<Item = &'static str>) -> ColumnData {
    ColumnData::Text(
        values
            .map(|s| (!s.is_empty()).then(|| s.to_string()))
            .collect(),
    )
}

fn hour_of_day(ts: &NaiveDateTime) -> f64 {
    f64::from(ts.hour()) + f64::from(ts.minute()) / 60.0
}

/// Demand multiplier with a morning ramp and an evening peak.
fn daily_demand(hour: f64) -> f64 {
    1.0 + 0.25 * (2.0 * PI * (hour - 9.0) / 24.0).sin()
        + 0.1 * (2.0 * PI * (hour - 18.0) / 12.0).cos()
}

fn solar_availability(hour: f64) -> f64 {
    if (6.0..18.0).contains(&hour) {
        (PI * (hour - 6.0) / 12.0).sin()
    } else {
        0.0
    }
}

/// AR(1) wind capacity factor clamped to `[0, 1]`.
fn wind_availability(rng: &mut StdRng, steps: usize) -> Vec<f64> {
    const ALPHA: f64 = 0.8;
    let mut level = rng.random_range(0.2..0.8);
    (0..steps)
        .map(|_| {
            let innovation = 0.5 + gaussian_noise(rng, 0.6);
            level = (ALPHA * level + (1.0 - ALPHA) * innovation).clamp(0.0, 1.0);
            level
        })
        .collect()
}

fn branch_flows(lines: &[BranchSpec], steps: usize, rng: &mut StdRng) -> (Columns, Columns) {
    let mut p0 = Vec::with_capacity(lines.len());
    let mut p1 = Vec::with_capacity(lines.len());
    for line in lines {
        let mut loading: f64 = rng.random_range(-0.5..0.5);
        let flow: Vec<f64> = (0..steps)
            .map(|_| {
                loading = (0.9 * loading + gaussian_noise(rng, 0.1)).clamp(-1.0, 1.0);
                loading * line.s_nom
            })
            .collect();
        let losses = 1.0 - 0.002 * line.x.min(10.0);
        p1.push((line.name, flow.iter().map(|f| -f * losses).collect()));
        p0.push((line.name, flow));
    }
    (p0, p1)
}

/// Box-Muller standard normal scaled by `std_dev`.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-9, 1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos() * std_dev
}
