//! Tabula - browse and edit backend tables from the terminal
//!
//! Entry point of the `tabula` binary.

mod commands;
mod confirm;
mod logging;
mod output;
mod settings;

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

use crate::settings::TabulaSettings;

#[derive(Debug, Parser)]
#[command(name = "tabula", version, about = "Browse and edit backend tables from the terminal")]
pub struct Cli {
    /// Backend base URL, e.g. http://localhost:8000/api
    #[arg(long, global = true, env = "TABULA_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tables
    Tables,

    /// Show a table's columns, primary key and editable columns
    Describe { table: String },

    /// Print a table's rows
    Rows {
        table: String,
        #[command(flatten)]
        sort: SortArgs,
    },

    /// Show the primary key and edit value derived from one row
    Select {
        table: String,
        /// Row index as printed by `rows`
        #[arg(long)]
        row: usize,
        #[command(flatten)]
        sort: SortArgs,
    },

    /// Update one field of one record
    Update {
        table: String,
        /// Primary-key value, repeat for each key column
        #[arg(long = "pk", value_name = "COL=VAL", value_parser = parse_pk_pair)]
        pk: Vec<(String, String)>,
        /// Column to change (defaults to the first editable column)
        #[arg(long)]
        field: Option<String>,
        /// New value; JSON for the JSON column
        #[arg(long)]
        value: String,
    },

    /// Delete one record
    Delete {
        table: String,
        #[arg(long = "pk", value_name = "COL=VAL", value_parser = parse_pk_pair)]
        pk: Vec<(String, String)>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Suggest location names
    Suggest { query: String },

    /// Current weather and five-day forecast
    Weather {
        #[command(subcommand)]
        query: WeatherCommand,
    },

    /// Show or initialize the settings file
    Settings {
        /// Write the default settings file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug, Default, Args)]
pub struct SortArgs {
    /// Column to order by (defaults to the first primary-key column)
    #[arg(long)]
    pub sort_by: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

#[derive(Debug, Subcommand)]
pub enum WeatherCommand {
    City { name: String },
    Zip {
        zip: String,
        #[arg(long)]
        country: String,
    },
    /// Coordinates as "lat, lon"
    Gps { coordinates: String },
}

fn parse_pk_pair(input: &str) -> Result<(String, String), String> {
    let (column, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected COL=VAL, got '{}'", input))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{}'", input));
    }
    Ok((column.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match TabulaSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            // Logging is not set up yet
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let logging_config = if cli.verbose {
        logging::LoggingConfig::development().with_json_logs(settings.json_logs)
    } else if settings.json_logs {
        logging::LoggingConfig::production()
    } else {
        logging::LoggingConfig::default()
    };
    let _log_guard = match logging::init(logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("FATAL: Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), command = ?cli.command, "Starting tabula");

    match commands::run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
