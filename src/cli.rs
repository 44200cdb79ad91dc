//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands;
use redcap2rs::core::models::SelectionPolicy;
use redcap2rs::output::OutputMode;
use redcap2rs::settings::Overrides;

/// redcap2rs - REDCap data dictionaries to tagged ReproSchema commits
#[derive(Parser, Debug)]
#[command(
    name = "redcap2rs",
    version,
    about = "Convert REDCap data dictionaries to ReproSchema and tag each revision",
    long_about = "Convert versioned REDCap data-dictionary exports to ReproSchema.\n\n\
                  Exports newer than the last tagged revision are converted and validated\n\
                  with the reproschema tool, committed, tagged and pushed, oldest first."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert, commit and tag every export newer than the current version
    Run {
        /// Log what would happen without changing any file or ref
        #[arg(long)]
        dry_run: bool,

        /// Do not push to the remote
        #[arg(long, conflicts_with = "force_push")]
        no_push: bool,

        /// Force-push when the remote rejects the branch or tag
        #[arg(long)]
        force_push: bool,

        #[command(flatten)]
        paths: PathArgs,
    },

    /// Show the current version and the exports a run would convert
    Status {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// Show version
    Version,
}

/// Options shared by `run` and `status`
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Repository root (default: current directory)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Settings file (default: <repo>/redcap2rs.toml if present)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Directory containing data-dictionary exports
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Protocol config YAML passed to the converter
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Remote to push to
    #[arg(long)]
    pub remote: Option<String>,

    /// Processing order: ascending, descending
    #[arg(long)]
    pub policy: Option<SelectionPolicy>,

    /// Ignore revisions at or below this number
    #[arg(long)]
    pub min_revision: Option<u64>,

    /// Converter executable
    #[arg(long)]
    pub tool: Option<String>,

    /// Study label used in commit messages
    #[arg(long)]
    pub label: Option<String>,
}

impl PathArgs {
    fn into_overrides(self) -> Overrides {
        Overrides {
            repo: self.repo,
            settings: self.settings,
            input_dir: self.input_dir,
            config: self.config,
            remote: self.remote,
            policy: self.policy,
            min_revision: self.min_revision,
            tool: self.tool,
            label: self.label,
            ..Overrides::default()
        }
    }
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Run {
            dry_run,
            no_push,
            force_push,
            paths,
        }) => {
            let overrides = Overrides {
                dry_run,
                no_push,
                force_push,
                ..paths.into_overrides()
            };
            commands::run(overrides, output_mode)
        },
        Some(Command::Status { paths }) => commands::status(paths.into_overrides(), output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("redcap2rs v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("redcap2rs v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'redcap2rs --help' for usage");
                println!("Run 'redcap2rs run --dry-run' to preview a conversion");
            }
            Ok(())
        },
    }
}
