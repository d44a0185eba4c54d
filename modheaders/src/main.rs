#![forbid(unsafe_code)]

mod commands;
mod serve;
mod watch;

use clap::{Parser, Subcommand};
use modheaders_lib::config::{load_settings, ApplyOn, Settings};
use modheaders_lib::telemetry::init_tracing;
use modheaders_lib::FileStore;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rewrite HTTP request/response headers from URL-matched rules")]
struct Cli {
    /// Path to the TOML settings file
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "MODHEADERS_SETTINGS",
        default_value = "modheaders.toml"
    )]
    settings: PathBuf,

    /// Store directory, overrides `[store] path`
    #[arg(long, value_name = "DIR")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the example configuration if none is stored yet
    Init,
    /// Print the stored configuration
    Show,
    /// Check every URL pattern of the stored configuration
    Validate,
    /// Write the configuration to a file
    Export {
        #[arg(value_name = "FILE", default_value = modheaders_lib::config::DEFAULT_EXPORT_FILE_NAME)]
        file: PathBuf,
    },
    /// Replace the configuration with the content of a file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Delete every rule
    Reset,
    /// Start modifying headers
    Start,
    /// Stop modifying headers
    Stop,
    /// Show the running flag and rule count
    Status,
    /// Apply the stored rules to a JSON header list (stdin when no file is given)
    Rewrite {
        #[arg(long)]
        url: String,
        #[arg(long, value_parser = parse_phase, default_value = "req")]
        phase: ApplyOn,
        #[arg(long, value_name = "FILE")]
        headers: Option<PathBuf>,
    },
    /// List common header names
    Headers {
        #[arg(long, value_parser = parse_phase, default_value = "req")]
        phase: ApplyOn,
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Rewrite line-delimited interception events read from stdin
    Serve,
}

fn parse_phase(s: &str) -> Result<ApplyOn, String> {
    s.parse().map_err(|e: modheaders_lib::ModHeadersError| e.to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(&cli.settings) {
        Ok(settings) => settings,
        Err(err) => {
            init_logging(&Settings::default());
            error!(%err, path = %cli.settings.display(), "failed to load settings");
            std::process::exit(1);
        }
    };
    init_logging(&settings);

    let store_path = cli.store.clone().unwrap_or_else(|| settings.store.path.clone());
    let store = FileStore::new(store_path);

    let result = match cli.command {
        Command::Serve => serve::run(store, &settings.watch).await,
        command => commands::run(command, store),
    };

    if let Err(err) = result {
        error!(%err, "command failed");
        std::process::exit(1);
    }
}

fn init_logging(settings: &Settings) {
    if let Err(err) = init_tracing(&settings.logging.level, settings.logging.show_target) {
        eprintln!("modheaders: {err}");
    }
}
