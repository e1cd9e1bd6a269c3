//! speclink: compose specification documents along their `extends` chains.

mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use speclink_compose::MergeStrategy;
use tracing_subscriber::EnvFilter;

use config::{ResolveOverrides, SpeclinkConfig};

#[derive(Parser)]
#[command(name = "speclink", version, about = "Specification inheritance resolver")]
struct Cli {
    /// Enable debug logging (overridden by SPECLINK_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that runs a resolution.
#[derive(clap::Args)]
struct ResolveFlags {
    /// Merge strategy (override, merge, append)
    #[arg(long)]
    strategy: Option<MergeStrategy>,
    /// Maximum `extends` nesting depth
    #[arg(long)]
    max_depth: Option<usize>,
    /// Follow circular references instead of rejecting them
    #[arg(long, overrides_with = "no_allow_circular")]
    allow_circular: bool,
    /// Reject circular references even if speclink.toml allows them
    #[arg(long)]
    no_allow_circular: bool,
    /// Skip the post-merge consistency checks
    #[arg(long)]
    no_consistency: bool,
    /// Stop storing errors after this many
    #[arg(long)]
    max_errors: Option<usize>,
}

impl ResolveFlags {
    fn overrides(&self) -> ResolveOverrides {
        ResolveOverrides {
            max_depth: self.max_depth,
            allow_circular: match (self.allow_circular, self.no_allow_circular) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            },
            strategy: self.strategy,
            no_consistency: self.no_consistency,
            max_errors: self.max_errors,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a document and print the composed result
    Resolve {
        /// Document to resolve (.yaml, .yml, .json or .toml)
        file: PathBuf,
        #[command(flatten)]
        flags: ResolveFlags,
        /// Output format (yaml, json, toml)
        #[arg(long)]
        format: Option<String>,
        /// Write the composed document to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Drop the `extends` list from the output
        #[arg(long)]
        flatten: bool,
        /// Print the content digest of the composed document to stderr
        #[arg(long)]
        digest: bool,
    },
    /// Resolve a document and report diagnostics only
    Check {
        /// Document to check
        file: PathBuf,
        #[command(flatten)]
        flags: ResolveFlags,
        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the ancestors a document inherits from
    Ancestors {
        /// Document to inspect
        file: PathBuf,
        #[command(flatten)]
        flags: ResolveFlags,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SPECLINK_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = SpeclinkConfig::load_or_default(&cwd)?;

    match cli.command {
        Commands::Resolve {
            file,
            flags,
            format,
            output,
            flatten,
            digest,
        } => {
            let options = config.resolve_options(&flags.overrides());
            let format = config.output_format(format.as_deref())?;
            commands::resolve::run(
                &cwd,
                &file,
                options,
                format,
                output.as_deref(),
                flatten,
                digest,
            )
        }

        Commands::Check { file, flags, json } => {
            let options = config.resolve_options(&flags.overrides());
            commands::check::run(&cwd, &file, options, json)
        }

        Commands::Ancestors { file, flags } => {
            let options = config.resolve_options(&flags.overrides());
            commands::ancestors::run(&cwd, &file, options)
        }
    }
}
