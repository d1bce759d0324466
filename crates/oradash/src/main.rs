//! oradash - live Oracle instance dashboard.
//!
//! Connects with a `user/password@connect_string [as sysdba]` descriptor and
//! redraws a fixed terminal screen every `ORADASH_INTERVAL` seconds until
//! `q`, `Esc`, Ctrl-C or SIGTERM.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::process;
use std::sync::Mutex;
use std::sync::mpsc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use oradash_core::config::Config;
use oradash_core::layout::FieldLayout;
use oradash_core::scheduler::{Dashboard, Signal, run_dashboard};
use oradash_core::source::{ConnectDescriptor, OracleSource};
use oradash_core::tui::{AnsiRenderer, CrosstermTerminal};

const USAGE: &str = "Usage:\n$ oradash <connect_string>";

#[derive(Parser)]
#[command(name = "oradash", about = "Live Oracle instance dashboard", version = oradash_core::VERSION)]
struct Args {
    /// Connect descriptor: user/password@connect_string [as sysdba].
    /// Words are joined with spaces, so the sysdba suffix needs no quoting.
    connect: Vec<String>,
}

fn main() {
    let args = Args::parse();
    if args.connect.is_empty() {
        println!("{USAGE}");
        process::exit(1);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Some(path) = config.log_file.as_deref() {
        if let Err(e) = init_logging(path) {
            eprintln!("Error opening log file {}: {e}", path.display());
            process::exit(1);
        }
    }

    let descriptor = match ConnectDescriptor::parse(&args.connect.join(" ")) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            eprintln!("Error: {e}");
            println!("{USAGE}");
            process::exit(1);
        }
    };

    info!(
        version = oradash_core::VERSION,
        db = %descriptor,
        interval_secs = config.refresh_interval.as_secs(),
        "starting"
    );

    // Connect before taking over the screen so errors print normally.
    let source = match OracleSource::connect(descriptor) {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "connect failed");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let (tx, rx) = mpsc::channel();
    let signal_tx = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = signal_tx.send(Signal::Terminate);
    }) {
        warn!(error = %e, "failed to set signal handler");
    }
    // The key listener starts once the terminal is in raw mode.
    let terminal = CrosstermTerminal::stdout().with_key_listener(tx);

    let renderer = AnsiRenderer::new(io::stdout(), FieldLayout::standard());
    let mut dashboard = Dashboard::new(source, renderer, config);

    // The terminal is restored by the time run_dashboard returns.
    if let Err(e) = run_dashboard(&mut dashboard, terminal, &rx) {
        error!(error = %e, "dashboard stopped");
        eprintln!("Error: {e}");
        process::exit(1);
    }
    info!(cycles = dashboard.cycles(), skipped = dashboard.skipped(), "stopped");
}

/// Appends plain-text logs to `path`. The terminal itself is never logged to.
fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("oradash=info,oradash_core=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
