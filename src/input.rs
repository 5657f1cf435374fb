//! Request parsing for the command-line front end.

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when parsing a request.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A line to split, read as JSON from stdin.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseRequest {
    /// The command line.
    pub line: String,

    /// Working directory for config lookup and substitutions (optional).
    #[serde(default)]
    pub cwd: Option<String>,

    /// Variables for this request only, over config and process env.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Separate leading assignments; overrides the config default when set.
    #[serde(default)]
    pub split_env: Option<bool>,
}

impl ParseRequest {
    /// Parse from JSON string.
    pub fn parse(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let req = ParseRequest::parse(r#"{"line":"ls -la"}"#).unwrap();
        assert_eq!(req.line, "ls -la");
        assert!(req.cwd.is_none());
        assert!(req.env.is_empty());
        assert!(req.split_env.is_none());
    }

    #[test]
    fn test_parse_full() {
        let req = ParseRequest::parse(
            r#"{"line":"echo $X","cwd":"/home/user","env":{"X":"1"},"split_env":true}"#,
        )
        .unwrap();
        assert_eq!(req.cwd, Some("/home/user".to_string()));
        assert_eq!(req.env["X"], "1");
        assert_eq!(req.split_env, Some(true));
    }

    #[test]
    fn test_missing_line() {
        assert!(ParseRequest::parse(r#"{"cwd":"/"}"#).is_err());
        assert!(ParseRequest::parse("not json").is_err());
    }
}
