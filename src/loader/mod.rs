//! Network loading: csv folders, JSON archives and bundled samples.
//!
//! Whatever the source, a loaded network goes through the same finishing
//! step: lone coordinate columns are dropped and bus coordinates are joined
//! onto every component that references a single bus.

mod archive;
mod csv_folder;
pub mod samples;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::network::table::{BUS_COLUMN, X_COLUMN, Y_COLUMN};
use crate::network::{ColumnData, ComponentKind, NetworkModel, TableError};
pub use samples::SampleNetwork;

/// Magic prefixes of archive formats recognised but not read.
const NETCDF_MAGIC: [&[u8]; 3] = [b"CDF\x01", b"CDF\x02", b"\x89HDF\r\n\x1a\n"];

/// Failure at the load boundary. The caller stays without a network.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file or folder could not be read.
    #[error("cannot read \"{path}\": {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The payload is not a format this crate reads.
    #[error("unsupported network format: {0}")]
    UnsupportedFormat(String),
    /// A file parsed but its content is not a valid network part.
    #[error("malformed {file}: {message}")]
    Malformed {
        /// File (or archive section) at fault.
        file: String,
        /// Parser message.
        message: String,
    },
    /// A table violates a structural invariant.
    #[error("invalid table in {file}: {source}")]
    Table {
        /// File (or archive section) at fault.
        file: String,
        /// Structural error.
        #[source]
        source: TableError,
    },
    /// The sample identifier is not one of the bundled samples.
    #[error("unknown sample network \"{name}\", available: {available}")]
    UnknownSample {
        /// Requested name.
        name: String,
        /// Comma-separated list of bundled samples.
        available: String,
    },
}

impl LoadError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn table(file: impl Into<String>, source: TableError) -> Self {
        Self::Table {
            file: file.into(),
            source,
        }
    }

    pub(crate) fn malformed(file: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Malformed {
            file: file.into(),
            message: message.to_string(),
        }
    }
}

/// Where a network comes from.
#[derive(Debug, Clone)]
pub enum LoadMethod {
    /// A csv folder or a `.json` archive on disk.
    Path(PathBuf),
    /// Raw bytes of an uploaded archive.
    Upload(Vec<u8>),
    /// One of the bundled sample networks.
    Sample(SampleNetwork),
}

impl LoadMethod {
    /// Short description of the source for status lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Upload(bytes) => format!("uploaded archive ({} bytes)", bytes.len()),
            Self::Sample(sample) => format!("sample {}", sample.name()),
        }
    }
}

/// Loads a network and applies the coordinate join.
///
/// # Errors
///
/// Returns a [`LoadError`] when the source cannot be read, is in an
/// unsupported format, or holds malformed tables.
pub fn load(method: &LoadMethod) -> Result<NetworkModel, LoadError> {
    let network = match method {
        LoadMethod::Path(path) => load_path(path)?,
        LoadMethod::Upload(bytes) => load_bytes(bytes)?,
        LoadMethod::Sample(sample) => sample.build()?,
    };
    let network = finish(network);
    info!(
        source = %method.describe(),
        buses = network.table(ComponentKind::Buses).len(),
        generators = network.table(ComponentKind::Generators).len(),
        snapshots = network.snapshots().len(),
        "network loaded"
    );
    Ok(network)
}

fn load_path(path: &Path) -> Result<NetworkModel, LoadError> {
    let metadata = fs::metadata(path).map_err(|e| LoadError::io(path, e))?;
    if metadata.is_dir() {
        return csv_folder::read(path);
    }
    let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    load_bytes(&bytes)
}

/// Recognises the payload by its leading bytes.
fn load_bytes(bytes: &[u8]) -> Result<NetworkModel, LoadError> {
    if NETCDF_MAGIC.iter().any(|magic| bytes.starts_with(magic)) {
        return Err(LoadError::UnsupportedFormat(
            "NetCDF/HDF5 archives are not read; export the network to a csv folder or a JSON archive"
                .to_string(),
        ));
    }
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => archive::from_slice(bytes),
        Some(_) => Err(LoadError::UnsupportedFormat(
            "payload is neither a JSON archive nor a known binary format".to_string(),
        )),
        None => Err(LoadError::UnsupportedFormat("payload is empty".to_string())),
    }
}

/// Enforces coordinate pairing and joins bus coordinates onto dependents.
fn finish(mut network: NetworkModel) -> NetworkModel {
    for kind in ComponentKind::ALL.into_iter().filter(|k| k.has_coordinates()) {
        if let Some(dropped) = network.table_mut(kind).enforce_coordinate_pairing() {
            warn!(component = %kind, column = dropped, "dropped unpaired coordinate column");
        }
    }

    let Some(lookup) = bus_coordinates(&network) else {
        debug!("buses carry no coordinates, skipping coordinate join");
        return network;
    };

    for kind in ComponentKind::ALL.into_iter().filter(|k| k.has_single_bus()) {
        let table = network.table_mut(kind);
        let Some(buses) = table.text(BUS_COLUMN) else {
            continue;
        };
        let (xs, ys): (Vec<Option<f64>>, Vec<Option<f64>>) = buses
            .iter()
            .map(|bus| {
                bus.as_deref()
                    .and_then(|b| lookup.get(b))
                    .map_or((None, None), |&(x, y)| (x, y))
            })
            .unzip();
        let joined = table
            .set_column(X_COLUMN, ColumnData::Numeric(xs))
            .and_then(|()| table.set_column(Y_COLUMN, ColumnData::Numeric(ys)));
        if let Err(e) = joined {
            warn!(component = %kind, error = %e, "coordinate join failed");
            table.remove_column(X_COLUMN);
            table.remove_column(Y_COLUMN);
        }
    }
    network
}

type CoordinateLookup = HashMap<String, (Option<f64>, Option<f64>)>;

fn bus_coordinates(network: &NetworkModel) -> Option<CoordinateLookup> {
    let buses = network.table(ComponentKind::Buses);
    let (xs, ys) = buses.coordinates()?;
    Some(
        buses
            .ids()
            .iter()
            .zip(xs.iter().zip(ys))
            .map(|(id, (x, y))| (id.clone(), (*x, *y)))
            .collect(),
    )
}
