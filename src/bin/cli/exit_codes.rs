//! Exit codes for the CLI tool.

use ppmz::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Compressed stream is corrupt or was coded with other options
pub const BAD_STREAM: i32 = 3;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadStream,
    IoError,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadStream => BAD_STREAM,
            Self::IoError => IO_ERROR,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a ppmz error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    if error.is_corruption() {
        return ExitCode::BadStream;
    }
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::InvalidConfig(_) => ExitCode::BadArgs,
        // Includes a context total outgrowing the coder width.
        _ => ExitCode::FatalError,
    }
}
