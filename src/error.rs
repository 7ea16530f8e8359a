//! ABOUTME: Ambient error type for failures outside the language's own error model
//!
//! Language-level failures (parser errors, runtime `Error` values, fatal
//! macro-expansion errors) are handled entirely inside the interpreter —
//! see `parser.rs` and `eval.rs`. `WispError` only covers the process-level
//! concerns that sit around the interpreter: reading a script file named on
//! the command line, and loading or saving the REPL's history file.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WispError {
    #[error("could not read script {path}: {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not access history file {path}: {source}")]
    HistoryAccess {
        path: PathBuf,
        #[source]
        source: rustyline::error::ReadlineError,
    },
}
