//! Cutline CLI: command-line interface for timeline projects.
//!
//! Usage:
//!   cutline init <NAME>                  Create a new project
//!   cutline info <PATH>                  Show project and timeline information
//!   cutline validate <PATH>              Check a project for invariant violations
//!   cutline apply <PATH> <ACTIONS>       Apply a JSON action list
//!   cutline auto-cut <PATH>              Generate (and optionally apply) a cut list
//!   cutline config                       Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cutline",
    about = "Timeline clip editing with undo, presets and auto-cut",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty project
    Init {
        /// Project name
        name: String,

        /// Source video duration (seconds)
        #[arg(short, long)]
        duration: f64,

        /// Output directory (defaults to the configured projects directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show project information
    Info {
        /// Path to the project directory
        path: PathBuf,

        /// Also resolve the frame under this timeline time (seconds)
        #[arg(long)]
        at: Option<f64>,
    },

    /// Validate a project bundle
    Validate {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Apply a JSON array of editor actions to a project
    Apply {
        /// Path to the project directory
        path: PathBuf,

        /// Path to the actions file
        actions: PathBuf,

        /// Report what would happen without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate a cut list from the source duration
    AutoCut {
        /// Path to the project directory
        path: PathBuf,

        /// Cut strategy: even|proportional
        #[arg(long, default_value = "even")]
        strategy: String,

        /// Number of clips (defaults to the configured count)
        #[arg(long)]
        clips: Option<i64>,

        /// Total seconds of material for the proportional strategy
        #[arg(long)]
        target: Option<f64>,

        /// Apply the generated actions instead of printing them
        #[arg(long)]
        apply: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the standard config location
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = cutline_common::AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    cutline_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Init {
            name,
            duration,
            output,
        } => commands::init::run(
            name,
            duration,
            output.unwrap_or_else(|| config.projects_dir.clone()),
        ),
        Commands::Info { path, at } => commands::info::run(path, at),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Apply {
            path,
            actions,
            dry_run,
        } => commands::apply::run(path, actions, dry_run, &config.editor),
        Commands::AutoCut {
            path,
            strategy,
            clips,
            target,
            apply,
        } => commands::auto_cut::run(path, strategy, clips, target, apply, &config.editor),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
