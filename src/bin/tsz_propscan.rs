#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use tsz_propscan::props::FallbackPolicy;
use tsz_propscan::{CliOverrides, PropscanConfig, ScanMode, collect_inputs, scan_paths};

/// Extract React component props schemas from type graph snapshots.
#[derive(Parser, Debug)]
#[command(name = "tsz-propscan", version, about)]
struct Args {
    /// Snapshot files, or directories searched recursively for `*.json`.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Config file (defaults to `propscan.json` in the working directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail when a type cannot be classified.
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,

    /// Report unclassifiable types as `any`.
    #[arg(long)]
    lenient: bool,

    /// Fully-qualified base component name. Repeatable; replaces the configured list.
    #[arg(long = "marker", value_name = "NAME")]
    markers: Vec<String>,

    /// One pass per snapshot instead of one per source file.
    #[arg(long)]
    batch: bool,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        let fallback = if self.strict {
            Some(FallbackPolicy::Strict)
        } else if self.lenient {
            Some(FallbackPolicy::Lenient)
        } else {
            None
        };
        CliOverrides {
            fallback,
            markers: self.markers.clone(),
            pretty: self.pretty,
        }
    }
}

fn main() -> ExitCode {
    tsz_propscan::tracing_config::init_tracing();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config =
        PropscanConfig::discover(args.config.as_deref(), &cwd)?.apply(&args.overrides());
    let options = config.resolve();
    let mode = if args.batch {
        ScanMode::Batch
    } else {
        ScanMode::PerFile
    };

    let paths = collect_inputs(&args.inputs)?;
    if paths.is_empty() {
        anyhow::bail!("no snapshot files found");
    }
    tracing::debug!(snapshots = paths.len(), ?mode, "scanning");

    let output = scan_paths(&paths, &options, mode)?;
    let mut text = if config.pretty() {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    text.push('\n');

    match &args.out {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .context("failed to write to stdout")?;
        }
    }
    Ok(())
}
