use anyhow::{Context, Result};
use choppa_model::{FlavorText, ProbeSettings, DEFAULT_TARGET, DEFAULT_TIMEOUT_MS};
use choppa_poller::{parse_interval, usage, ConfigError, Poller, RandomPicker, Shutdown};
use choppa_probe::SystemPingChecker;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const BIN_NAME: &str = "choppa";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Stopped,
    Usage,
}

#[derive(Parser, Debug)]
#[command(
    name = "choppa",
    version,
    about = "Get to the choppa: pings a public host and reports when the WiFi drops."
)]
struct Cli {
    /// Seconds between checks.
    #[arg(allow_negative_numbers = true)]
    interval: Option<String>,

    #[arg(long, default_value = DEFAULT_TARGET)]
    target: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Seed for picking quotes and escape routes.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with `quotes` and `escape_routes` arrays.
    #[arg(long)]
    flavor: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()) {
        Ok(Exit::Stopped) => ExitCode::SUCCESS,
        Ok(Exit::Usage) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_usage(out: &mut impl Write, err: &ConfigError) -> io::Result<()> {
    writeln!(out, "{err}")?;
    writeln!(out, "{}", usage(BIN_NAME))?;
    out.flush()
}

fn run(cli: Cli) -> Result<Exit> {
    let interval = match parse_interval(cli.interval.as_deref()) {
        Ok(secs) => secs,
        Err(err) => {
            print_usage(&mut io::stdout().lock(), &err).context("failed to print usage")?;
            return Ok(Exit::Usage);
        }
    };

    let flavor = match &cli.flavor {
        Some(path) => FlavorText::load(path)?,
        None => FlavorText::default(),
    };

    let picker = match cli.seed {
        Some(seed) => RandomPicker::seeded(seed),
        None => RandomPicker::new(),
    };

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.trigger())
            .context("failed to install Ctrl-C handler")?;
    }

    let settings = ProbeSettings {
        target: cli.target,
        timeout_ms: cli.timeout_ms,
        ..ProbeSettings::default()
    };
    debug!(?settings, interval, "starting monitor");

    let checker = {
        let shutdown = shutdown.clone();
        SystemPingChecker::new(settings).with_cancel(move || shutdown.is_triggered())
    };

    let mut poller = Poller::new(io::stdout(), picker, flavor);
    poller
        .run(&checker, shutdown, Duration::from_secs(interval))
        .context("failed to write status")?;

    info!(checks = poller.check_count(), "monitor stopped");
    Ok(Exit::Stopped)
}
