//! textrek CLI: compile song text files to WAV.
//!
//! Usage:
//!   textrek song.tt other.tt
//!   textrek --bits 24 --channels 1 song.tt -o out.wav

use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use tt_master::{CompileOptions, Controller, WavSettings};

#[derive(Parser)]
#[command(name = "textrek", version)]
#[command(about = "Render tracker-style song text to WAV", long_about = None)]
struct Cli {
    /// Song files; each is written next to itself with a .wav extension
    files: Vec<PathBuf>,

    /// Output path (single input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Bits per sample
    #[arg(long, default_value = "16", value_parser = parse_bits)]
    bits: u16,

    /// Interleaved output channels
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u16).range(1..))]
    channels: u16,

    /// Start every file from the built-in defaults
    #[arg(long)]
    reset_defaults: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_bits(s: &str) -> Result<u16, String> {
    let bits: u16 = s.parse().map_err(|e| format!("{e}"))?;
    WavSettings::new(bits)
        .map(|settings| settings.bits_per_sample)
        .map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.files.is_empty() {
        let _ = Cli::command().print_help();
        return;
    }

    if cli.output.is_some() && cli.files.len() > 1 {
        Cli::command()
            .error(ErrorKind::ArgumentConflict, "--output needs exactly one input file")
            .exit();
    }

    if let Err(err) = run(&cli) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = CompileOptions {
        channels: cli.channels,
        wav: WavSettings::new(cli.bits)?,
        reset_defaults: cli.reset_defaults,
    };
    tracing::debug!(?options, files = cli.files.len(), "starting");
    let mut ctrl = Controller::new(options);

    for path in &cli.files {
        let report = ctrl
            .process_file(path, cli.output.as_deref())
            .with_context(|| format!("Failed to process file {}", path.display()))?;
        println!(
            "{} -> {} ({} patterns, {} frames)",
            path.display(),
            report.output.display(),
            report.patterns,
            report.frames
        );
    }
    Ok(())
}
