//! shellwords command-line entry point.
//!
//! Reads one JSON request from stdin and prints the split line as JSON.

use shellwords::audit::AuditLogger;
use shellwords::config::Config;
use shellwords::input::ParseRequest;
use shellwords::output::{ParseResponse, format_error, format_response};

use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut input_str = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input_str) {
        eprintln!("error: failed to read stdin: {}", e);
        return ExitCode::from(2);
    }

    let request = match ParseRequest::parse(&input_str) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let cwd = request.cwd.as_deref().map(Path::new);
    let config = match Config::load(cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::from(2);
        }
    };

    let parser = config.build_parser(cwd, &request.env);
    let outcome = parser.parse_with_env_assignments(&request.line);

    // Audit logging (if enabled)
    if config.audit.enabled
        && let Some(path) = &config.audit.path
        && let Ok(mut logger) = AuditLogger::open(Path::new(path))
    {
        let _ = logger.log_request(&request, outcome.as_ref());
    }

    match outcome {
        Ok(parsed) => {
            let split_env = request.split_env.or(config.split_env).unwrap_or(false);
            let response = ParseResponse::new(&request.line, parsed, split_env);
            println!("{}", format_response(&response));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", format_error(&e));
            ExitCode::from(1)
        }
    }
}
