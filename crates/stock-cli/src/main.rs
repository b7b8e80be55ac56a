//! Stock CLI
//!
//! Command-line interface for Stock - local inventory tracking.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stock_core::{Config, NewItem, StockProvider};

mod commands;
mod output;
mod prompt;

use commands::item::ItemChanges;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "stock")]
#[command(about = "Stock - local inventory tracking")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new item
    Add {
        /// Item name
        #[arg(short, long)]
        name: String,
        /// Unit price
        #[arg(short, long)]
        price: f64,
        /// Image reference or path
        #[arg(short, long)]
        image: String,
        /// Units on hand (defaults to 0)
        #[arg(short = 'Q', long)]
        quantity: Option<i64>,
    },
    /// List items
    #[command(alias = "ls")]
    List {
        /// SQL filter, e.g. "quantity > ?"
        #[arg(short = 'w', long = "where")]
        selection: Option<String>,
        /// Value bound to each `?` in the filter
        #[arg(short, long = "arg")]
        args: Vec<String>,
        /// SQL sort order, e.g. "name ASC"
        #[arg(short, long)]
        sort: Option<String>,
    },
    /// Show one item
    Show {
        /// Item ID
        id: i64,
    },
    /// Change fields of an item
    Edit {
        /// Item ID
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 'Q', long)]
        quantity: Option<i64>,
        #[arg(short, long)]
        price: Option<f64>,
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Sell one unit of an item
    Sell {
        /// Item ID
        id: i64,
    },
    /// Delete an item
    #[command(alias = "rm")]
    Delete {
        /// Item ID
        id: i64,
    },
    /// Delete every item
    DeleteAll,
    /// Print the type tag for a resource identifier
    Type {
        /// Resource identifier, e.g. content://com.example.android.inventoryapp/items
        uri: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let provider = StockProvider::open(&config).context("Failed to open inventory database")?;

    match cli.command {
        Commands::Add {
            name,
            price,
            image,
            quantity,
        } => {
            let mut item = NewItem::new(name, price, image);
            item.quantity = quantity;
            commands::item::add(&provider, item, &output)
        }
        Commands::List {
            selection,
            args,
            sort,
        } => commands::item::list(&provider, selection, args, sort, &output),
        Commands::Show { id } => commands::item::show(&provider, id, &output),
        Commands::Edit {
            id,
            name,
            quantity,
            price,
            image,
        } => {
            let changes = ItemChanges {
                name,
                quantity,
                price,
                image,
            };
            commands::item::edit(&provider, id, changes, &output)
        }
        Commands::Sell { id } => commands::item::sell(&provider, id, &output),
        Commands::Delete { id } => commands::item::delete(&provider, id, &output),
        Commands::DeleteAll => commands::item::delete_all(&provider, &output),
        Commands::Type { uri } => commands::item::content_type(&provider, uri, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Initialize file logging
///
/// Only initializes if STOCK_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("STOCK_LOG") else {
        return;
    };

    let log_path = config.log_path();
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "stock_core={},stock_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
