use anyhow::Result;
use bindfix_core::{PatchConfig, PatchOutcome, RunOptions};
use clap::{Parser, Subcommand};
use console::{Term, style};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// bindfix - Adapt generated WebAssembly bindings for non-browser hosts
#[derive(Parser)]
#[command(name = "bindfix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Patch a generated bindings file
    Patch {
        /// Path to the bindings file to patch
        file: PathBuf,

        /// Write the result here instead of patching in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a TOML patch configuration (default: built-in Node adaptation)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail if any substitution pattern matches nothing
        #[arg(long)]
        strict: bool,
    },

    /// Show what the patch would change (dry-run)
    Plan {
        /// Path to the bindings file
        file: PathBuf,

        /// Path to a TOML patch configuration (default: built-in Node adaptation)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show version and the built-in configuration
    Status,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Patch {
            file,
            output,
            config,
            strict,
        } => cmd_patch(&file, output.as_deref(), config.as_deref(), strict, cli.verbose),
        Commands::Plan { file, config } => cmd_plan(&file, config.as_deref(), cli.verbose),
        Commands::Status => cmd_status(),
    }
}

fn load_config(term: &Term, config_path: Option<&Path>) -> Result<PatchConfig> {
    match config_path {
        Some(path) => match PatchConfig::from_file(path) {
            Ok(c) => Ok(c),
            Err(e) => {
                term.write_line(&format!(
                    "{} Failed to load config: {}",
                    style("error:").red().bold(),
                    e
                ))?;
                std::process::exit(1);
            }
        },
        None => Ok(PatchConfig::node_fetch()),
    }
}

fn cmd_patch(
    file: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    strict: bool,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    // Check bindings file exists
    if !file.exists() {
        term.write_line(&format!(
            "{} Bindings file not found: {}",
            style("error:").red().bold(),
            file.display()
        ))?;
        std::process::exit(1);
    }

    let config = load_config(&term, config_path)?;
    debug!(
        "Loaded {} preamble line(s) and {} rule(s)",
        config.preamble.len(),
        config.rules.len()
    );
    let out_path = output.unwrap_or(file);

    term.write_line(&format!(
        "{} Patching {}",
        style("::").cyan().bold(),
        file.display()
    ))?;

    let options = RunOptions {
        dry_run: false,
        strict,
    };

    let outcome = match bindfix_core::run(file, out_path, &config, &options) {
        Ok(o) => o,
        Err(e) => {
            term.write_line(&format!("{} {}", style("error:").red().bold(), e))?;
            std::process::exit(1);
        }
    };

    print_outcome(&term, &config, &outcome, verbose)?;

    term.write_line(&format!(
        "{} Wrote {}",
        style("::").green().bold(),
        out_path.display()
    ))?;

    Ok(())
}

fn cmd_plan(file: &Path, config_path: Option<&Path>, verbose: bool) -> Result<()> {
    let term = Term::stderr();

    // Check bindings file exists
    if !file.exists() {
        term.write_line(&format!(
            "{} Bindings file not found: {}",
            style("error:").red().bold(),
            file.display()
        ))?;
        std::process::exit(1);
    }

    let config = load_config(&term, config_path)?;

    term.write_line(&format!(
        "{} Evaluating {}",
        style("::").cyan().bold(),
        file.display()
    ))?;

    let options = RunOptions {
        dry_run: true,
        strict: false,
    };

    let outcome = match bindfix_core::run(file, file, &config, &options) {
        Ok(o) => o,
        Err(e) => {
            term.write_line(&format!("{} {}", style("error:").red().bold(), e))?;
            std::process::exit(1);
        }
    };

    print_outcome(&term, &config, &outcome, verbose)?;

    term.write_line("")?;
    term.write_line(&format!(
        "{} Would insert {} preamble line(s) and make {} substitution(s)",
        style("::").cyan().bold(),
        outcome.preamble_lines,
        outcome.total_matches()
    ))?;

    Ok(())
}

fn cmd_status() -> Result<()> {
    let term = Term::stderr();
    let config = PatchConfig::node_fetch();

    term.write_line(&format!(
        "{} bindfix v{}",
        style("::").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    ))?;
    term.write_line("")?;
    term.write_line("  Built-in preamble:")?;
    for line in &config.preamble {
        term.write_line(&format!("    {}", style(line).dim()))?;
    }
    term.write_line("  Built-in rules:")?;
    for rule in &config.rules {
        term.write_line(&format!(
            "    {} -> {}",
            style(&rule.pattern).dim(),
            style(&rule.replacement).dim()
        ))?;
    }

    Ok(())
}

fn print_outcome(
    term: &Term,
    config: &PatchConfig,
    outcome: &PatchOutcome,
    verbose: bool,
) -> Result<()> {
    for line in &config.preamble {
        term.write_line(&format!(
            "  {} {}",
            style("+").green().bold(),
            style(line).dim()
        ))?;
    }

    for rule in &outcome.rules {
        let symbol = if rule.matches > 0 {
            style("~").yellow().bold()
        } else {
            style("!").red().bold()
        };
        term.write_line(&format!(
            "  {} {} {}",
            symbol,
            rule.pattern,
            style(format!("({} match(es))", rule.matches)).dim()
        ))?;
    }

    // Show the patched file head in verbose mode
    if verbose {
        for line in outcome.content.lines().take(5) {
            term.write_line(&format!("      {}", style(line).dim()))?;
        }
        let line_count = outcome.content.lines().count();
        if line_count > 5 {
            term.write_line(&format!(
                "      {}",
                style(format!("... ({} more lines)", line_count - 5)).dim()
            ))?;
        }
    }

    Ok(())
}
