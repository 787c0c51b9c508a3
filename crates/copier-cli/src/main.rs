mod config;
mod copy_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use copier_core::CopyLimits;

use config::CopierConfig;
use copy_cmd::{CopyMode, Endpoints};

#[derive(Parser)]
#[command(
    name = "copier",
    about = "Copy characters from a source to a destination up to a newline"
)]
struct Cli {
    /// Read from this file instead of stdin
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Write to this file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a copier config file
    Init {
        /// Units requested per batch read
        #[arg(long, default_value_t = config::DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Upper bound on steps for copy-all
        #[arg(long)]
        max_steps: Option<usize>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Copy a single character
    Copy,
    /// Copy a single batch, up to the first newline
    CopyMultiple {
        /// Units to request (overrides COPIER_BATCH_SIZE and the config file)
        #[arg(long)]
        count: Option<usize>,
    },
    /// Keep copying until no data, a newline, or an empty batch
    CopyAll {
        /// Units to request per batch (overrides COPIER_BATCH_SIZE and the config file)
        #[arg(long, conflicts_with = "single")]
        count: Option<usize>,
        /// Copy one character per step instead of batches
        #[arg(long)]
        single: bool,
        /// Stop after this many steps (overrides COPIER_MAX_STEPS and the config file)
        #[arg(long)]
        max_steps: Option<usize>,
    },
    /// Print the resolved configuration
    Config,
}

/// Execute the `copier init` command: write config file.
fn cmd_init(batch_size: usize, max_steps: Option<usize>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        copy: config::CopySection {
            batch_size,
            max_steps,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  copy.batch_size = {batch_size}");
    if let Some(max) = max_steps {
        println!("  copy.max_steps = {max}");
    }

    Ok(())
}

/// Execute the `copier config` command: print the resolved configuration.
fn cmd_config() -> anyhow::Result<()> {
    let resolved = CopierConfig::resolve(None, None)?;
    let path = config::config_path();
    let origin = if path.exists() { "" } else { " (not found)" };

    println!("Config file: {}{origin}", path.display());
    println!("  batch_size = {}", resolved.batch_size);
    match resolved.max_steps {
        Some(max) => println!("  max_steps = {max}"),
        None => println!("  max_steps = unbounded"),
    }

    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let endpoints = Endpoints {
        input: cli.input.as_deref(),
        output: cli.output.as_deref(),
    };

    match cli.command {
        Commands::Init {
            batch_size,
            max_steps,
            force,
        } => cmd_init(batch_size, max_steps, force),
        Commands::Config => cmd_config(),
        Commands::Copy => copy_cmd::run_copy(endpoints, CopyMode::One, CopyLimits::default()),
        Commands::CopyMultiple { count } => {
            let resolved = CopierConfig::resolve(count, None)?;
            copy_cmd::run_copy(
                endpoints,
                CopyMode::Multiple(resolved.batch_size),
                CopyLimits::default(),
            )
        }
        Commands::CopyAll {
            count,
            single,
            max_steps,
        } => {
            let resolved = CopierConfig::resolve(count, max_steps)?;
            let mode = if single {
                CopyMode::All
            } else {
                CopyMode::AllMultiple(resolved.batch_size)
            };
            let limits = CopyLimits {
                max_steps: resolved.max_steps,
            };
            copy_cmd::run_copy(endpoints, mode, limits)
        }
    }
}

fn main() {
    // Logs go to stderr; stdout carries only copied data.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn copy_all_count_conflicts_with_single() {
        let result = Cli::try_parse_from(["copier", "copy-all", "--single", "--count", "4"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_input_flag_parses_after_subcommand() {
        let cli = Cli::try_parse_from(["copier", "copy", "--input", "in.txt"]).unwrap();
        assert_eq!(cli.input.as_deref(), Some(std::path::Path::new("in.txt")));
        assert!(matches!(cli.command, Commands::Copy));
    }
}
