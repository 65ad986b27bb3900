use std::env;
use std::path::PathBuf;

use crate::config::{ConfigError, ExplorerConfig};
use crate::loader::{LoadMethod, SampleNetwork};
use crate::network::ComponentKind;
use crate::shape::timeseries::{Selection, ShapeMode};
use crate::views::{View, ViewRequest};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub network: Option<PathBuf>,
    pub sample: Option<SampleNetwork>,
    pub config: Option<PathBuf>,
    pub view: View,
    pub component: Option<ComponentKind>,
    pub attribute: Option<String>,
    pub mode: Option<ShapeMode>,
    pub select: Option<Vec<String>>,
    pub export: Option<PathBuf>,
    pub help: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: Option<u16>,
    #[cfg(feature = "tui")]
    pub tui: bool,
}

impl CliOptions {
    /// The view request described by the view flags.
    pub fn request(&self) -> ViewRequest {
        let mut request = ViewRequest::new(self.view);
        request.component = self.component;
        request.attribute = self.attribute.clone();
        request.mode = self.mode;
        if let Some(entities) = &self.select {
            request.selection = Selection::of(entities.iter().cloned());
        }
        request
    }

    /// Where to load the network from: a flag wins over the config file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the fallback sample name is unknown.
    pub fn load_method(&self, config: &ExplorerConfig) -> Result<LoadMethod, ConfigError> {
        if let Some(path) = &self.network {
            return Ok(LoadMethod::Path(path.clone()));
        }
        if let Some(sample) = self.sample {
            return Ok(LoadMethod::Sample(sample));
        }
        if let Some(path) = &config.load.path {
            return Ok(LoadMethod::Path(path.clone()));
        }
        config.sample().map(LoadMethod::Sample)
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut view = None;
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--network" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --network (expected a csv folder or .json file)",
                )?;
                if opts.network.replace(PathBuf::from(path)).is_some() {
                    return Err("--network provided more than once".to_string());
                }
            }
            "--sample" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --sample (expected a sample name)")?;
                let sample = name.parse::<SampleNetwork>().map_err(|e| e.to_string())?;
                if opts.sample.replace(sample).is_some() {
                    return Err("--sample provided more than once".to_string());
                }
            }
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--view" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --view (expected summary, temporal, geospatial or metadata)",
                )?;
                if view.replace(name.parse::<View>()?).is_some() {
                    return Err("--view provided more than once".to_string());
                }
            }
            "--component" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --component (expected a component type)")?;
                let kind = name.parse::<ComponentKind>().map_err(|e| e.to_string())?;
                if opts.component.replace(kind).is_some() {
                    return Err("--component provided more than once".to_string());
                }
            }
            "--attribute" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --attribute (expected an attribute name)")?;
                if opts.attribute.replace(name.to_string()).is_some() {
                    return Err("--attribute provided more than once".to_string());
                }
            }
            "--mode" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --mode (expected individual, carrier or sum)",
                )?;
                if opts.mode.replace(name.parse::<ShapeMode>()?).is_some() {
                    return Err("--mode provided more than once".to_string());
                }
            }
            "--select" => {
                i += 1;
                let list = args.next_or_err(i, "missing value for --select (expected a,b,...)")?;
                let entities = list
                    .split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect();
                if opts.select.replace(entities).is_some() {
                    return Err("--select provided more than once".to_string());
                }
            }
            "--export" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --export (expected a file path)")?;
                if opts.export.replace(PathBuf::from(path)).is_some() {
                    return Err("--export provided more than once".to_string());
                }
            }
            #[cfg(feature = "api")]
            "--serve" => opts.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                opts.port = Some(port);
            }
            #[cfg(feature = "tui")]
            "--tui" => opts.tui = true,
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.network.is_some() && opts.sample.is_some() {
        return Err(
            "arguments `--network` and `--sample` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    #[cfg(all(feature = "api", feature = "tui"))]
    if opts.serve && opts.tui {
        return Err("arguments `--serve` and `--tui` are mutually exclusive".to_string());
    }

    // a temporal flag without --view means the temporal view
    opts.view = view.unwrap_or(if opts.attribute.is_some() || opts.mode.is_some() {
        View::Temporal
    } else {
        View::Summary
    });

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("network-explorer: browse PyPSA power-system networks");
    eprintln!();
    eprintln!("Usage: network-explorer [OPTIONS]");
    eprintln!();
    eprintln!("Source:");
    eprintln!("  --network <path>       Load a csv folder or a .json archive");
    eprintln!("  --sample <name>        Load a bundled sample (ac_dc_meshed, scigrid_de, storage_hvdc)");
    eprintln!("  --config <path>        Read settings from a TOML file");
    eprintln!();
    eprintln!("View:");
    eprintln!("  --view <name>          summary, temporal, geospatial or metadata");
    eprintln!("  --component <type>     Component type, e.g. generators or \"Storage Units\"");
    eprintln!("  --attribute <name>     Time-series attribute, e.g. p or p_max_pu");
    eprintln!("  --mode <mode>          individual, carrier or sum");
    eprintln!("  --select <a,b,...>     Entities to plot in individual mode");
    eprintln!("  --export <path>        Write the chart (temporal) or table to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!();
        eprintln!("  --serve                Start the JSON API");
        eprintln!("  --port <u16>           API port (default from config: 8501)");
    }
    #[cfg(feature = "tui")]
    eprintln!("  --tui                  Open the terminal explorer");
    eprintln!("  --help                 Show this help message");
    eprintln!();
    eprintln!("Without --network or --sample the [load] section of the config is used.");
}
