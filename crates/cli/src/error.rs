//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: texture error (unknown preset, bad dimensions, bad parameter)
//! - 11: I/O error (PNG write, seed file read/write)
//! - 12: input error (bad JSON params, malformed seed file)
//! - 13: serialization error

use std::fmt;

use texgen_core::TextureError;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A texture construction error.
    Texture(TextureError),
    /// An I/O error (file read or write).
    Io(String),
    /// A user input error (bad JSON params, malformed seed file).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Texture(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Texture(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<TextureError> for CliError {
    fn from(e: TextureError) -> Self {
        match e {
            TextureError::Io(msg) => CliError::Io(msg),
            other => CliError::Texture(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
