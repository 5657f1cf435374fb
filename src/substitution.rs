//! Command substitution: running `` `cmd` `` and `$(cmd)` bodies.

use std::path::PathBuf;
use std::process::Command;

use crate::error::SubstitutionError;

/// Runs a captured command body and returns its standard output.
pub trait Executor: Send + Sync {
    fn execute(&self, command: &str) -> Result<String, SubstitutionError>;
}

/// Adapts a plain closure into an executor.
pub struct FnExecutor<F>(pub F);

impl<F> Executor for FnExecutor<F>
where
    F: Fn(&str) -> Result<String, SubstitutionError> + Send + Sync,
{
    fn execute(&self, command: &str) -> Result<String, SubstitutionError> {
        (self.0)(command)
    }
}

/// Runs substitutions through the host shell.
///
/// POSIX hosts use `$SHELL -c` (or `sh`), Windows uses `%COMSPEC% /c` (or `cmd`).
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    dir: Option<PathBuf>,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run substitutions in `dir` instead of the current directory.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    fn command(&self, line: &str) -> (String, Command) {
        let (shell, flag) = host_shell();
        let mut cmd = Command::new(&shell);
        cmd.arg(flag).arg(line);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        (shell, cmd)
    }
}

#[cfg(windows)]
fn host_shell() -> (String, &'static str) {
    (shell_from_env("COMSPEC", "cmd"), "/c")
}

#[cfg(not(windows))]
fn host_shell() -> (String, &'static str) {
    (shell_from_env("SHELL", "sh"), "-c")
}

fn shell_from_env(var: &str, fallback: &str) -> String {
    match std::env::var(var) {
        Ok(shell) if !shell.trim().is_empty() => shell,
        _ => fallback.to_string(),
    }
}

impl Executor for ShellExecutor {
    fn execute(&self, command: &str) -> Result<String, SubstitutionError> {
        let (shell, mut cmd) = self.command(command);
        let output = cmd
            .output()
            .map_err(|source| SubstitutionError::Spawn { shell, source })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(SubstitutionError::Exit {
                command: command.to_string(),
                code: output.status.code(),
                stdout,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(strip_trailing_newline(stdout))
    }
}

/// Remove at most one trailing line ending (`\n` or `\r\n`).
pub fn strip_trailing_newline(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_single_newline() {
        assert_eq!(strip_trailing_newline("foo\n".to_string()), "foo");
        assert_eq!(strip_trailing_newline("foo\r\n".to_string()), "foo");
        assert_eq!(strip_trailing_newline("foo\n\n".to_string()), "foo\n");
        assert_eq!(strip_trailing_newline("foo".to_string()), "foo");
        assert_eq!(strip_trailing_newline(String::new()), "");
    }

    #[test]
    fn test_fn_executor() {
        let exec = FnExecutor(|cmd: &str| -> Result<String, SubstitutionError> {
            Ok(cmd.to_uppercase())
        });
        assert_eq!(exec.execute("echo").unwrap(), "ECHO");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_echo() {
        let out = ShellExecutor::new().execute("echo foo").unwrap();
        assert_eq!(out, "foo");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_multi_line_keeps_interior_newline() {
        let out = ShellExecutor::new().execute("echo a && echo b").unwrap();
        assert_eq!(out, "a\nb");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let expected = dir.path().canonicalize().unwrap();
        let out = ShellExecutor::new().dir(dir.path()).execute("pwd -P").unwrap();
        assert_eq!(std::path::PathBuf::from(out), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_failure_carries_output() {
        let err = ShellExecutor::new()
            .execute("echo partial; echo broken >&2; exit 3")
            .unwrap_err();
        match err {
            SubstitutionError::Exit {
                code,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(code, Some(3));
                assert_eq!(stdout, "partial\n");
                assert_eq!(stderr, "broken\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
