//! CLI tool for ppmz compression.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// PPM compressor with range coding
#[derive(Parser)]
#[command(name = "ppmz")]
#[command(author, version, about = "PPM compressor with range coding", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Model order (-1 to 16); must match between compression and decompression
    #[arg(
        long,
        short = 'o',
        default_value_t = ppmz::options::DEFAULT_ORDER,
        allow_negative_numbers = true,
        global = true
    )]
    order: i32,

    /// Range coder state width in bits (10 to 32)
    #[arg(long, default_value_t = ppmz::coder::DEFAULT_STATE_BITS, global = true)]
    state_bits: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file (alias: c)
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Compressed file to create
        output: PathBuf,
    },

    /// Decompress a file (alias: d)
    #[command(alias = "d")]
    Decompress {
        /// Compressed file to read
        input: PathBuf,

        /// File to restore
        output: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output
    Json,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::BadArgs
            } else {
                ExitCode::Success
            };
            std::process::exit(code.code());
        }
    };

    let exit_code = match cli.command {
        Commands::Compress { input, output } => {
            match commands::build_options(cli.order, cli.state_bits) {
                Ok(options) => commands::compress(&commands::CodingConfig {
                    input: &input,
                    output: &output,
                    options,
                    format: cli.format,
                    quiet: cli.quiet,
                }),
                Err(code) => code,
            }
        }

        Commands::Decompress { input, output } => {
            match commands::build_options(cli.order, cli.state_bits) {
                Ok(options) => commands::decompress(&commands::CodingConfig {
                    input: &input,
                    output: &output,
                    options,
                    format: cli.format,
                    quiet: cli.quiet,
                }),
                Err(code) => code,
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "ppmz", &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
