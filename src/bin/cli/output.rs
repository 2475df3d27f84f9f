//! Output formatting for CLI operations.

use ppmz::{CodingResult, PpmOptions};
use serde_json::json;
use std::path::Path;

/// Which direction a session ran in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Compress => "compress",
            Self::Decompress => "decompress",
        }
    }
}

/// A finished session as reported to the user
pub struct Summary<'a> {
    pub operation: Operation,
    pub input: &'a Path,
    pub output: &'a Path,
    pub options: &'a PpmOptions,
    pub result: &'a CodingResult,
}

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the result of a compression or decompression
    fn format_summary(&self, summary: &Summary<'_>) -> String;

    /// Formats a failure
    fn format_error(&self, operation: Operation, message: &str) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_summary(&self, summary: &Summary<'_>) -> String {
        let result = summary.result;
        let mut output = String::new();
        match summary.operation {
            Operation::Compress => output.push_str(&format!(
                "Compressed {} -> {}\n",
                summary.input.display(),
                summary.output.display()
            )),
            Operation::Decompress => output.push_str(&format!(
                "Decompressed {} -> {}\n",
                summary.input.display(),
                summary.output.display()
            )),
        }
        output.push_str(&format!(
            "  Original:   {}\n",
            humanize_bytes(result.uncompressed_size)
        ));
        output.push_str(&format!(
            "  Compressed: {}\n",
            humanize_bytes(result.compressed_size)
        ));
        if result.uncompressed_size > 0 {
            output.push_str(&format!(
                "  Ratio:      {:.1}% ({:.1}% saved)\n",
                result.compression_ratio() * 100.0,
                result.space_savings() * 100.0
            ));
        }
        output.push_str(&format!(
            "  Model:      order {}, {} contexts\n",
            summary.options.order, result.contexts
        ));
        output
    }

    fn format_error(&self, operation: Operation, message: &str) -> String {
        format!("Error during {}: {}\n", operation.as_str(), message)
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, summary: &Summary<'_>) -> String {
        let result = summary.result;
        let obj = json!({
            "success": true,
            "operation": summary.operation.as_str(),
            "input": summary.input.display().to_string(),
            "output": summary.output.display().to_string(),
            "order": summary.options.order,
            "state_bits": summary.options.state_bits,
            "uncompressed_size": result.uncompressed_size,
            "compressed_size": result.compressed_size,
            "compression_ratio": result.compression_ratio(),
            "space_savings": result.space_savings(),
            "contexts": result.contexts,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string()) + "\n"
    }

    fn format_error(&self, operation: Operation, message: &str) -> String {
        let obj = json!({
            "success": false,
            "operation": operation.as_str(),
            "error": message,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string()) + "\n"
    }
}

/// Creates a formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
