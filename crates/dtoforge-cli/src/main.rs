//! dtoforge CLI tool.
//!
//! Usage:
//! ```bash
//! dtoforge hydrate --class Customer input.json
//! dtoforge rules [--class Customer]
//! dtoforge list-rules
//! dtoforge init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Validated construction of DTOs declared in dtoforge.toml
#[derive(Parser)]
#[command(name = "dtoforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate JSON input and construct a declared class
    Hydrate {
        /// Class to construct
        #[arg(long)]
        class: String,

        /// JSON input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the composed rule sets of declared classes
    Rules {
        /// Only print this class
        #[arg(long)]
        class: Option<String>,
    },

    /// List built-in validation rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for constructed instances.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Indented field listing.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Single-line JSON.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cwd = std::env::current_dir()?;
    let source = || config_resolver::resolve(&cwd, cli.config.as_deref());

    match cli.command {
        Commands::Hydrate {
            class,
            input,
            format,
        } => commands::hydrate::run(&class, &input, format, &source()),
        Commands::Rules { class } => commands::rules::run(class.as_deref(), &source()),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
