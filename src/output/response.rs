//! Response formatting for command-line output.

use serde::Serialize;

use crate::error::ParseError;
use crate::parser::CommandLine;

/// JSON response for a successful parse.
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub args: Vec<String>,
    /// Leading assignments, present only when they were split off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// The unparsed tail of the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest: Option<String>,
}

impl ParseResponse {
    /// Build a response for `line` from its parsed form.
    pub fn new(line: &str, parsed: CommandLine, split_env: bool) -> Self {
        let rest = parsed.remainder(line).map(str::to_string);
        let CommandLine { env, args, stop } = parsed;
        let (env, args) = if split_env {
            (Some(env), args)
        } else {
            let mut words = env;
            words.extend(args);
            (None, words)
        };

        Self {
            args,
            env,
            position: stop,
            rest,
        }
    }
}

/// Format a successful parse as a JSON line for stdout.
pub fn format_response(response: &ParseResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| r#"{"args":[]}"#.to_string())
}

/// Format a parse failure for stderr.
pub fn format_error(err: &ParseError) -> String {
    format!("error: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteKind;

    fn parsed(env: &[&str], args: &[&str], stop: Option<usize>) -> CommandLine {
        CommandLine {
            env: env.iter().map(|s| s.to_string()).collect(),
            args: args.iter().map(|s| s.to_string()).collect(),
            stop,
        }
    }

    #[test]
    fn test_plain_response() {
        let response = ParseResponse::new("A=1 ls", parsed(&["A=1"], &["ls"], None), false);
        assert_eq!(format_response(&response), r#"{"args":["A=1","ls"]}"#);
    }

    #[test]
    fn test_split_response() {
        let response = ParseResponse::new("A=1 ls", parsed(&["A=1"], &["ls"], None), true);
        assert_eq!(format_response(&response), r#"{"args":["ls"],"env":["A=1"]}"#);
    }

    #[test]
    fn test_response_with_rest() {
        let line = "ls -la 2>foo";
        let response = ParseResponse::new(line, parsed(&[], &["ls", "-la"], Some(7)), false);
        let json: serde_json::Value = serde_json::from_str(&format_response(&response)).unwrap();
        assert_eq!(json["position"], 7);
        assert_eq!(json["rest"], "2>foo");
    }

    #[test]
    fn test_format_error() {
        let msg = format_error(&ParseError::UnterminatedQuote(QuoteKind::Double));
        assert_eq!(msg, "error: unterminated double quote");
    }
}
