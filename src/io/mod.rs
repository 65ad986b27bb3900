//! File sinks.

pub mod export;
