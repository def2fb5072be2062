//! Symcorpus CLI - build and query a symbol corpus from extractor fragments

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "symcorpus")]
#[command(version)]
#[command(about = "Symbol corpus builder - merge declaration fragments into one queryable corpus")]
#[command(long_about = r#"
Symcorpus merges the partial declaration fragments an extractor emits for
each translation unit into one consistent corpus, then answers questions
about it:
  • Which members does a record expose, including inherited ones?
  • What does a scope contain, with overloads grouped?
  • What does the merged entity for a given name look like?

Example usage:
  symcorpus build --input "out/**/*.json"
  symcorpus interface --input "out/**/*.json" --record app::Widget
  symcorpus members --input "out/**/*.json" --scope app
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Ingest fragments, freeze the corpus, and report statistics
    Build {
        /// Fragment files (glob patterns)
        #[arg(short, long)]
        input: Vec<String>,

        /// Also write the frozen corpus as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective interface of a record
    Interface {
        /// Fragment files (glob patterns)
        #[arg(short, long)]
        input: Vec<String>,

        /// Qualified name of the record
        #[arg(short, long)]
        record: String,
    },

    /// List the members of a scope
    Members {
        /// Fragment files (glob patterns)
        #[arg(short, long)]
        input: Vec<String>,

        /// Qualified name of the scope (defaults to the global namespace)
        #[arg(short, long)]
        scope: Option<String>,
    },

    /// Print merged symbols as JSON
    Dump {
        /// Fragment files (glob patterns)
        #[arg(short, long)]
        input: Vec<String>,

        /// Qualified name of one symbol to print
        #[arg(short, long)]
        symbol: Option<String>,
    },
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        *self == OutputMode::Human
    }
}

/// Print a successful result in JSON mode
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode.is_human() {
        return Ok(());
    }
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let config_path = cli.config.clone().unwrap_or_else(symcorpus::config::default_config_path);
    let config = symcorpus::config::load_config(Some(config_path.as_path()))?;

    let result = match cli.command {
        Commands::Init { force } => commands::run_init(output_mode, &config_path, force),
        Commands::Build { input, output } => commands::run_build(output_mode, &config, &input, output.as_deref()),
        Commands::Interface { input, record } => commands::run_interface(output_mode, &config, &input, &record),
        Commands::Members { input, scope } => commands::run_members(output_mode, &config, &input, scope.as_deref()),
        Commands::Dump { input, symbol } => commands::run_dump(&config, &input, symbol.as_deref()),
    };

    if let Err(e) = result {
        if output_mode.is_human() {
            symcorpus::ui::error(&format!("{:#}", e));
        } else {
            let envelope = serde_json::json!({ "ok": false, "error": format!("{:#}", e) });
            println!("{}", envelope);
        }
        std::process::exit(1);
    }
    Ok(())
}
