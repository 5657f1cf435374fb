//! shellwords - split a shell-like command line into arguments.
//!
//! Handles quoting, escapes, optional `$VAR` expansion and optional
//! `` `cmd` `` / `$(cmd)` substitution. Control operators and redirections
//! are not interpreted: scanning stops there and reports the offset so the
//! rest of the line can be handed to a real shell.

pub mod audit;
pub mod config;
pub mod env;
pub mod error;
pub mod input;
pub mod output;
pub mod parser;
pub mod shell;
pub mod substitution;

pub use config::Config;
pub use env::{EnvResolver, ProcessEnv};
pub use error::{ParseError, SubstitutionError};
pub use parser::{CommandLine, Parser, parse, parse_with_envs};
pub use shell::Tokenized;
pub use substitution::{Executor, ShellExecutor};
