//! Audit logging for parse requests.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::error::ParseError;
use crate::input::ParseRequest;
use crate::output::redact_secrets;
use crate::parser::CommandLine;
use crate::shell::assignment_parts;

/// An audit log entry.
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the request.
    pub timestamp: DateTime<Utc>,
    /// The requested line, redacted and truncated.
    pub line: String,
    /// Working directory if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    /// Whether parsing succeeded.
    pub ok: bool,
    /// Number of arguments produced, assignments included.
    pub words: usize,
    /// Names of leading assignments (values are never logged).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assigns: Vec<String>,
    /// Stop offset when the line was not fully consumed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Error text on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from a request and its outcome.
    pub fn new(request: &ParseRequest, outcome: Result<&CommandLine, &ParseError>) -> Self {
        let (ok, words, assigns, position, error) = match outcome {
            Ok(parsed) => (
                true,
                parsed.env.len() + parsed.args.len(),
                parsed
                    .env
                    .iter()
                    .filter_map(|w| assignment_parts(w).map(|(name, _)| name.to_string()))
                    .collect(),
                parsed.stop,
                None,
            ),
            Err(err) => (false, 0, Vec::new(), None, Some(redact_secrets(&err.to_string()))),
        };

        Self {
            timestamp: Utc::now(),
            line: truncate_string(&redact_secrets(&request.line), 200),
            cwd: request.cwd.clone(),
            ok,
            words,
            assigns,
            position,
            error,
        }
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Audit logger for writing entries to a file.
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create an audit log file.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Write an audit entry to the log.
    pub fn log(&mut self, entry: &AuditEntry) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()
    }

    /// Log the outcome of a request.
    pub fn log_request(
        &mut self,
        request: &ParseRequest,
        outcome: Result<&CommandLine, &ParseError>,
    ) -> std::io::Result<()> {
        let entry = AuditEntry::new(request, outcome);
        self.log(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteKind;
    use tempfile::NamedTempFile;

    fn request(line: &str) -> ParseRequest {
        ParseRequest::parse(&serde_json::json!({ "line": line }).to_string()).unwrap()
    }

    #[test]
    fn test_audit_entry_ok() {
        let req = request("API_TOKEN=xyz ls -la; rm x");
        let parsed = CommandLine {
            env: vec!["API_TOKEN=xyz".to_string()],
            args: vec!["ls".to_string(), "-la".to_string()],
            stop: Some(20),
        };
        let entry = AuditEntry::new(&req, Ok(&parsed));

        assert!(entry.ok);
        assert_eq!(entry.words, 3);
        assert_eq!(entry.assigns, vec!["API_TOKEN"]);
        assert_eq!(entry.position, Some(20));
        assert!(!entry.line.contains("xyz"));
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_audit_entry_error() {
        let req = request("echo 'oops");
        let err = ParseError::UnterminatedQuote(QuoteKind::Single);
        let entry = AuditEntry::new(&req, Err(&err));

        assert!(!entry.ok);
        assert_eq!(entry.words, 0);
        assert_eq!(entry.error.as_deref(), Some("unterminated single quote"));
    }

    #[test]
    fn test_audit_logger() {
        let temp_file = NamedTempFile::new().unwrap();
        let mut logger = AuditLogger::open(temp_file.path()).unwrap();

        let req = request("pwd");
        let parsed = CommandLine {
            args: vec!["pwd".to_string()],
            ..Default::default()
        };
        logger.log_request(&req, Ok(&parsed)).unwrap();
        logger.log_request(&req, Ok(&parsed)).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"line\":\"pwd\""));
        assert!(content.contains("\"ok\":true"));
        assert!(!content.contains("assigns"));
    }

    #[test]
    fn test_truncate_line() {
        let req = request(&"é".repeat(300));
        let parsed = CommandLine::default();
        let entry = AuditEntry::new(&req, Ok(&parsed));

        assert_eq!(entry.line.chars().count(), 200);
        assert!(entry.line.ends_with("..."));
    }
}
