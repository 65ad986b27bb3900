//! Explorer for PyPSA power-system networks.

pub mod cli;
pub mod config;
/// File sinks.
pub mod io;
/// Network loading from folders, archives and bundled samples.
pub mod loader;
pub mod logging;
pub mod network;
pub mod reporting;
pub mod session;
/// Selection, carrier aggregation, time-series shaping and colors.
pub mod shape;
pub mod views;

#[cfg(feature = "api")]
pub mod api;
#[cfg(feature = "tui")]
pub mod tui;
