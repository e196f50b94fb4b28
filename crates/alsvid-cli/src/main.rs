//! Alsvid Command-Line Interface
//!
//! Synthesizes reversible circuits from SyReC programs and PLA truth
//! tables, emits OpenQASM 3, and simulates the result.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{simulate, synth, table};

/// Alsvid - reversible circuit synthesis
#[derive(Parser)]
#[command(name = "alsvid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a SyReC program
    Synth {
        /// Input file (SyReC source)
        input: String,

        /// Output file (QASM3); defaults to the input with .qasm
        #[arg(short, long)]
        output: Option<String>,

        /// Synthesis backend (line-aware, cost-aware)
        #[arg(short, long, default_value = "line-aware")]
        backend: String,

        /// Module to synthesize instead of `main`
        #[arg(long)]
        main_module: Option<String>,

        /// Bit width for signals declared without one
        #[arg(long, default_value = "32")]
        default_bitwidth: u32,

        /// Print a JSON statistics record
        #[arg(long)]
        stats: bool,
    },

    /// Synthesize a PLA truth table
    Table {
        /// Input file (PLA)
        input: String,

        /// Output file (QASM3); defaults to the input with .qasm
        #[arg(short, long)]
        output: Option<String>,

        /// Synthesis flow (coding, coding-compact, one-pass)
        #[arg(short, long, default_value = "coding")]
        mode: String,

        /// Print a JSON statistics record
        #[arg(long)]
        stats: bool,
    },

    /// Synthesize a SyReC program and run it on an input pattern
    Simulate {
        /// Input file (SyReC source)
        input: String,

        /// Input pattern, most significant line first (e.g. 0101)
        #[arg(short = 'i', long)]
        pattern: String,

        /// Synthesis backend (line-aware, cost-aware)
        #[arg(short, long, default_value = "line-aware")]
        backend: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Synth {
            input,
            output,
            backend,
            main_module,
            default_bitwidth,
            stats,
        } => synth::execute(
            &input,
            output.as_deref(),
            &backend,
            main_module,
            default_bitwidth,
            stats,
        ),
        Commands::Table {
            input,
            output,
            mode,
            stats,
        } => table::execute(&input, output.as_deref(), &mode, stats),
        Commands::Simulate {
            input,
            pattern,
            backend,
        } => simulate::execute(&input, &pattern, &backend),
    }
}
