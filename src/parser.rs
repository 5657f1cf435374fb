//! Parser configuration and the public entry points.

use std::path::PathBuf;
use std::sync::Arc;

use crate::env::{EnvResolver, FnResolver, ProcessEnv};
use crate::error::ParseError;
use crate::shell::{TokenizeOptions, Tokenized, remainder_at, split_env_assignments, tokenize};
use crate::substitution::{Executor, ShellExecutor};

/// Arguments split into leading environment assignments and the command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    /// Leading `NAME=value` words.
    pub env: Vec<String>,
    /// The command and its arguments.
    pub args: Vec<String>,
    /// Code-point offset where parsing stopped, if the line was not fully consumed.
    pub stop: Option<usize>,
}

impl CommandLine {
    /// The unparsed tail of `line`, starting at the stop offset.
    pub fn remainder<'l>(&self, line: &'l str) -> Option<&'l str> {
        remainder_at(line, self.stop?)
    }
}

/// A reusable line parser.
///
/// Both expansions are off by default. The parser holds no per-line state and
/// can be shared between threads.
#[derive(Clone)]
pub struct Parser {
    expand_env: bool,
    expand_substitution: bool,
    resolver: Arc<dyn EnvResolver>,
    /// Built-in executor, used unless a custom one is installed.
    shell: ShellExecutor,
    executor: Option<Arc<dyn Executor>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            expand_env: false,
            expand_substitution: false,
            resolver: Arc::new(ProcessEnv),
            shell: ShellExecutor::new(),
            executor: None,
        }
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("expand_env", &self.expand_env)
            .field("expand_substitution", &self.expand_substitution)
            .field("shell", &self.shell)
            .finish_non_exhaustive()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand `$NAME` / `${NAME}` references.
    pub fn expand_env(mut self, enabled: bool) -> Self {
        self.expand_env = enabled;
        self
    }

    /// Execute `` `cmd` `` / `$(cmd)` spans.
    pub fn expand_substitution(mut self, enabled: bool) -> Self {
        self.expand_substitution = enabled;
        self
    }

    pub fn resolver(mut self, resolver: impl EnvResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Use a closure for variable lookup.
    pub fn getenv<F>(self, getenv: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.resolver(FnResolver(getenv))
    }

    /// Run substitutions through `executor` instead of the host shell.
    pub fn executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Working directory for the built-in shell executor.
    ///
    /// Has no effect on an executor installed with [`Parser::executor`].
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shell = self.shell.dir(dir);
        self
    }

    fn options(&self) -> TokenizeOptions<'_> {
        TokenizeOptions {
            expand_env: self.expand_env,
            expand_substitution: self.expand_substitution,
            env: self.resolver.as_ref(),
            executor: match &self.executor {
                Some(executor) => executor.as_ref(),
                None => &self.shell,
            },
        }
    }

    /// Tokenize a line, keeping the resumable stop offset.
    pub fn tokenize(&self, line: &str) -> Result<Tokenized, ParseError> {
        tokenize(line, &self.options())
    }

    /// Split a line into arguments.
    pub fn parse(&self, line: &str) -> Result<Vec<String>, ParseError> {
        Ok(self.tokenize(line)?.words)
    }

    /// Split a line and separate leading `NAME=value` assignments.
    pub fn parse_with_env_assignments(&self, line: &str) -> Result<CommandLine, ParseError> {
        let Tokenized { words, stop } = self.tokenize(line)?;
        let (env, args) = split_env_assignments(words);
        Ok(CommandLine { env, args, stop })
    }
}

/// Split a line with the default parser (no expansion).
pub fn parse(line: &str) -> Result<Vec<String>, ParseError> {
    Parser::new().parse(line)
}

/// Split a line with the default parser and separate leading assignments.
pub fn parse_with_envs(line: &str) -> Result<(Vec<String>, Vec<String>), ParseError> {
    let CommandLine { env, args, .. } = Parser::new().parse_with_env_assignments(line)?;
    Ok((env, args))
}
