//! fleetdash - terminal dashboard for server-fleet telemetry
//!
//! This is the main entry point for the fleetdash binary.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{ArgAction, Parser, Subcommand};
use fleetdash::config::{Config, LogFormat};
use fleetdash::fetch::fetch_snapshot;
use fleetdash::report::Report;
use fleetdash::store::RestStore;
use fleetdash::{DashError, Result};
use tracing::{error, info};
use tracing_subscriber::fmt::MakeWriter;

/// Name of the config file picked up from the working directory
const DEFAULT_CONFIG_FILE: &str = "fleetdash.toml";

/// fleetdash - server fleet monitoring dashboard
///
/// Reads every row of the servers table once and shows status, alert,
/// resource and network charts alongside a per-server table.
#[derive(Parser, Debug)]
#[command(name = "fleetdash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Data store project URL (overrides config file)
    #[arg(long = "url", value_name = "URL", env = "SUPABASE_URL", global = true)]
    url: Option<String>,

    /// Data store API key (overrides config file)
    #[arg(
        long = "key",
        value_name = "KEY",
        env = "SUPABASE_KEY",
        hide_env_values = true,
        global = true
    )]
    key: Option<String>,

    /// Table holding the server records (overrides config file)
    #[arg(
        long = "table",
        value_name = "TABLE",
        env = "FLEETDASH_TABLE",
        global = true
    )]
    table: Option<String>,

    /// Log level: trace, debug, info, warn, error (overrides config file)
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        env = "FLEETDASH_LOG_LEVEL",
        global = true
    )]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the terminal dashboard (default if no command specified)
    Run,

    /// Fetch once and print tallies and the server table
    Summary {
        /// Print JSON instead of text
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Write a starter configuration file
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

impl Cli {
    /// Apply CLI argument overrides to the configuration
    fn apply_to_config(&self, config: &mut Config) {
        if let Some(ref url) = self.url {
            config.store.url = Some(url.clone());
        }
        if let Some(ref key) = self.key {
            config.store.key = Some(key.clone());
        }
        if let Some(ref table) = self.table {
            config.store.table = table.clone();
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[derive(Debug, Clone)]
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile(PathBuf),
    Defaults,
}

impl ConfigSource {
    fn label(&self) -> String {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::DefaultFile(path) => {
                path.display().to_string()
            }
            ConfigSource::Defaults => "built-in defaults".to_string(),
        }
    }
}

fn load_config(cli: &Cli) -> Result<(Config, ConfigSource)> {
    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(DashError::Config(format!(
                "Config file '{}' not found",
                path.display()
            )));
        }
        let config = Config::from_file(path)?;
        return Ok((config, ConfigSource::Explicit(path.clone())));
    }

    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        let config = Config::from_file(&default_path)?;
        return Ok((config, ConfigSource::DefaultFile(default_path)));
    }

    Ok((Config::default(), ConfigSource::Defaults))
}

/// Where log lines go.
enum LogTarget {
    Stderr,
    /// `logging.file` if set, otherwise nowhere
    FileOrDiscard,
}

fn init_logging(config: &Config, target: LogTarget) -> Result<()> {
    match (target, &config.logging.file) {
        (LogTarget::Stderr, _) => install_subscriber(config, std::io::stderr, true),
        (LogTarget::FileOrDiscard, Some(path)) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            install_subscriber(config, Mutex::new(file), false)
        }
        (LogTarget::FileOrDiscard, None) => install_subscriber(config, std::io::sink, false),
    }
    Ok(())
}

fn install_subscriber<W>(config: &Config, writer: W, ansi: bool)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(writer))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty().with_ansi(ansi).with_writer(writer))
                .init();
        }
    }
}

/// Load, override and validate configuration, then start logging.
fn prepare(cli: &Cli, target: LogTarget) -> Result<Config> {
    let (mut config, source) = load_config(cli)?;
    cli.apply_to_config(&mut config);
    config.validate()?;
    init_logging(&config, target)?;
    info!(
        config = %source.label(),
        table = %config.store.table,
        "fleetdash v{}",
        env!("CARGO_PKG_VERSION")
    );
    Ok(config)
}

#[cfg(feature = "tui")]
async fn cmd_run(cli: &Cli) -> ExitCode {
    use fleetdash::store::RemoteStore;
    use std::sync::Arc;

    let config = match prepare(cli, LogTarget::FileOrDiscard) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let store: Arc<dyn RemoteStore> = Arc::new(RestStore::from_config(&config.store));
    match fleetdash::tui::app::run(store, &config.store.table, config.ui.tick_rate()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tui"))]
async fn cmd_run(_cli: &Cli) -> ExitCode {
    eprintln!("fleetdash was built without the `tui` feature; use `fleetdash summary` instead.");
    ExitCode::FAILURE
}

async fn cmd_summary(cli: &Cli, json: bool) -> ExitCode {
    let config = match prepare(cli, LogTarget::Stderr) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let store = RestStore::from_config(&config.store);
    let snapshot = match fetch_snapshot(&store, &config.store.table).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "fetch failed");
            eprintln!("{}", e.banner());
            return ExitCode::FAILURE;
        }
    };

    let report = Report::new(&snapshot);
    if json {
        match report.to_json() {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Failed to serialize report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report.to_text());
    }
    ExitCode::SUCCESS
}

fn write_starter_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        return Err(DashError::Config(format!(
            "Configuration file '{}' already exists. Use --force to overwrite it.",
            output.display()
        )));
    }
    Config::default().to_file(output)
}

fn cmd_init(output: &Path, force: bool) -> ExitCode {
    if let Err(e) = write_starter_config(output, force) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    println!("Created configuration file: {}", output.display());
    println!();
    println!("Set the data store credentials in the [store] section, or export:");
    println!("  SUPABASE_URL=https://<project>.supabase.co");
    println!("  SUPABASE_KEY=<anon key>");
    println!();
    println!("Then start the dashboard:");
    println!("  fleetdash --config {}", output.display());
    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Init { output, force }) => cmd_init(output, *force),
        Some(Commands::Summary { json }) => cmd_summary(&cli, *json).await,
        Some(Commands::Run) | None => cmd_run(&cli).await,
    }
}
