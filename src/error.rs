//! Error types for line parsing.

use std::fmt;
use thiserror::Error;

/// Which quote was left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Single,
    Double,
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteKind::Single => f.write_str("single"),
            QuoteKind::Double => f.write_str("double"),
        }
    }
}

/// Which substitution form was left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionKind {
    /// `` `cmd` ``
    Backtick,
    /// `$(cmd)`
    Dollar,
}

impl fmt::Display for SubstitutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionKind::Backtick => f.write_str("backtick"),
            SubstitutionKind::Dollar => f.write_str("$("),
        }
    }
}

/// Errors raised by a substitution executor.
#[derive(Debug, Error)]
pub enum SubstitutionError {
    #[error("failed to run `{shell}`: {source}")]
    Spawn {
        shell: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` failed ({}): {}", exit_detail(.code), output_detail(.stdout, .stderr))]
    Exit {
        command: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn exit_detail(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn output_detail(stdout: &str, stderr: &str) -> String {
    let stderr = stderr.trim_end();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    stdout.trim_end().to_string()
}

/// Errors that abort a parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unterminated escape at end of line")]
    UnterminatedEscape,

    #[error("unterminated {0} quote")]
    UnterminatedQuote(QuoteKind),

    #[error("unterminated {0} substitution")]
    UnterminatedSubstitution(SubstitutionKind),

    #[error("substitution failed: {0}")]
    SubstitutionFailed(#[from] SubstitutionError),
}
