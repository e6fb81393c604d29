use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pkgvsn_monitor::app::{Config, Monitor};
use pkgvsn_monitor::notify::{DesktopNotifier, NoopNotifier, Notifier};
use pkgvsn_monitor::package::CliStatusQuery;
use pkgvsn_monitor::progress;

/// pkgvsn-monitor - waits for the latest package version creation and notifies
#[derive(Parser)]
#[command(name = "pkgvsn-monitor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Config file (defaults to ~/.config/pkgvsn-monitor/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    monitor: MonitorArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll until the latest package version creation finishes (default)
    Monitor(MonitorArgs),
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct MonitorArgs {
    /// Seconds to wait before giving up (defaults to poll.default_timeout_secs)
    #[arg(short, long, env = "PKGVSN_MONITOR_TIMEOUT")]
    timeout: Option<u64>,
    /// Seconds between status checks (defaults to poll.interval_secs)
    #[arg(long)]
    interval: Option<u64>,
    /// Print the final status as JSON on stdout
    #[arg(long)]
    json: bool,
    /// Skip the desktop notification
    #[arg(long)]
    no_notify: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::config_path()?,
    };

    match cli.command {
        Some(Commands::Config { action }) => handle_config(action, &config_path),
        Some(Commands::Monitor(args)) => run_monitor(args, &config_path),
        None => run_monitor(cli.monitor, &config_path),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level: {}", level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    Ok(())
}

fn handle_config(action: ConfigAction, path: &std::path::Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_from(path)?;
            println!("# {}", path.display());
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }
            Config::default().save_to(path)?;
            info!("Wrote default config to {}", path.display());
        }
    }
    Ok(())
}

fn run_monitor(args: MonitorArgs, config_path: &std::path::Path) -> Result<()> {
    let mut config = Config::load_from(config_path)?;
    if let Some(interval) = args.interval {
        config.poll.interval_secs = interval;
    }
    if args.no_notify {
        config.notification.enabled = false;
    }
    config.validate()?;
    let timeout = args.timeout.unwrap_or(config.poll.default_timeout_secs);

    let query = CliStatusQuery::from_config(&config.query);
    let mut progress = progress::for_stderr();
    let notifier: Box<dyn Notifier> = if config.notification.enabled {
        Box::new(DesktopNotifier::new())
    } else {
        Box::new(NoopNotifier)
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let status = runtime.block_on(async {
        Monitor::new(&config, &query, progress.as_mut(), notifier.as_ref())
            .run(timeout)
            .await
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    }

    Ok(())
}
