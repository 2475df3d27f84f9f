//! Command implementations for the CLI.

use std::fs::File;
use std::path::Path;

use ppmz::PpmOptions;

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::{Operation, Summary, create_formatter};
use crate::progress::CliProgress;

/// Configuration for a compress or decompress command
pub struct CodingConfig<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub options: PpmOptions,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Validates the model options given on the command line
pub fn build_options(order: i32, state_bits: u32) -> Result<PpmOptions, ExitCode> {
    PpmOptions::new()
        .order(order)
        .and_then(|options| options.state_bits(state_bits))
        .map_err(|e| {
            eprintln!("Error: {}", e);
            ExitCode::BadArgs
        })
}

/// Compresses a file
pub fn compress(config: &CodingConfig<'_>) -> ExitCode {
    run(Operation::Compress, config)
}

/// Decompresses a file
pub fn decompress(config: &CodingConfig<'_>) -> ExitCode {
    run(Operation::Decompress, config)
}

fn run(operation: Operation, config: &CodingConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let input = match File::open(config.input) {
        Ok(f) => f,
        Err(e) => {
            eprint!(
                "{}",
                formatter.format_error(
                    operation,
                    &format!("cannot open {}: {}", config.input.display(), e)
                )
            );
            return ExitCode::IoError;
        }
    };
    let total_bytes = input.metadata().map(|m| m.len()).unwrap_or(0);

    let output = match File::create(config.output) {
        Ok(f) => f,
        Err(e) => {
            eprint!(
                "{}",
                formatter.format_error(
                    operation,
                    &format!("cannot create {}: {}", config.output.display(), e)
                )
            );
            return ExitCode::IoError;
        }
    };

    let progress = CliProgress::new(total_bytes, config.quiet);
    let reader = progress.wrap_read(input);
    let outcome = match operation {
        Operation::Compress => {
            progress.set_message("Compressing...");
            ppmz::compress(reader, output, &config.options)
        }
        Operation::Decompress => {
            progress.set_message("Decompressing...");
            ppmz::decompress(reader, output, &config.options)
        }
    };

    match outcome {
        Ok(result) => {
            progress.finish();
            if !config.quiet || matches!(config.format, OutputFormat::Json) {
                print!(
                    "{}",
                    formatter.format_summary(&Summary {
                        operation,
                        input: config.input,
                        output: config.output,
                        options: &config.options,
                        result: &result,
                    })
                );
            }
            ExitCode::Success
        }
        Err(e) => {
            progress.abandon();
            // Partial output is not left behind.
            let _ = std::fs::remove_file(config.output);
            eprint!("{}", formatter.format_error(operation, &e.to_string()));
            error_to_exit_code(&e)
        }
    }
}
