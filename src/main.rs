//! network-explorer entry point: CLI wiring and session construction.

use std::process;

use network_explorer::cli::{self, CliOptions};
use network_explorer::config::ExplorerConfig;
use network_explorer::io::export::export_view;
use network_explorer::logging;
use network_explorer::reporting::print_view;
use network_explorer::session::Session;
use network_explorer::views::dispatch;

fn load_config(opts: &CliOptions) -> ExplorerConfig {
    let config = match &opts.config {
        Some(path) => ExplorerConfig::from_toml_file(path).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        }),
        None => ExplorerConfig::default(),
    };
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    config
}

fn main() {
    let opts = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });
    if opts.help {
        cli::print_usage();
        return;
    }

    let config = load_config(&opts);

    #[cfg(feature = "tui")]
    let filter = if opts.tui { "warn" } else { config.logging.filter.as_str() };
    #[cfg(not(feature = "tui"))]
    let filter = config.logging.filter.as_str();
    logging::init(filter);

    let method = opts.load_method(&config).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    let palette = config.palette();

    #[cfg(feature = "tui")]
    if opts.tui {
        let app = network_explorer::tui::runtime::App::new(Some(&method), palette);
        if let Err(e) = network_explorer::tui::run(app) {
            eprintln!("error: TUI crashed: {e}");
            process::exit(1);
        }
        return;
    }

    let session = Session::open(&method, palette).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    #[cfg(feature = "api")]
    if opts.serve {
        run_server(session, &config, opts.port);
        return;
    }

    let output = dispatch(&session, &opts.request());
    print_view(&output, config.display.max_rows);

    if let Some(path) = &opts.export {
        if let Err(e) = export_view(&output, path) {
            eprintln!("error: {e}");
            process::exit(1);
        }
        eprintln!("Export written to {}", path.display());
    }
}

#[cfg(feature = "api")]
fn run_server(session: Session, config: &ExplorerConfig, port: Option<u16>) {
    use std::net::{IpAddr, SocketAddr};
    use std::sync::Arc;

    use network_explorer::api::{AppState, serve};

    let ip: IpAddr = config.api.bind.parse().unwrap_or_else(|e| {
        eprintln!("error: invalid api.bind: {e}");
        process::exit(1);
    });
    let addr = SocketAddr::new(ip, port.unwrap_or(config.api.port));
    let state = Arc::new(AppState::with_session(session));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(serve(state, addr)) {
        eprintln!("error: API server failed: {e}");
        process::exit(1);
    }
}
