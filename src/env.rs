//! Environment variable lookup used by `$NAME` expansion.

use std::collections::HashMap;

/// Resolves a variable name to its value.
///
/// Lookup is total: unknown names resolve to the empty string.
pub trait EnvResolver: Send + Sync {
    fn resolve(&self, name: &str) -> String;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvResolver for ProcessEnv {
    fn resolve(&self, name: &str) -> String {
        std::env::var_os(name)
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl EnvResolver for HashMap<String, String> {
    fn resolve(&self, name: &str) -> String {
        self.get(name).cloned().unwrap_or_default()
    }
}

/// Adapts a plain closure into a resolver.
pub struct FnResolver<F>(pub F);

impl<F> EnvResolver for FnResolver<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn resolve(&self, name: &str) -> String {
        (self.0)(name)
    }
}

/// Fixed variables layered over a fallback resolver.
pub struct OverlayEnv<R> {
    vars: HashMap<String, String>,
    fallback: R,
}

impl<R: EnvResolver> OverlayEnv<R> {
    pub fn new(vars: HashMap<String, String>, fallback: R) -> Self {
        Self { vars, fallback }
    }
}

impl<R: EnvResolver> EnvResolver for OverlayEnv<R> {
    fn resolve(&self, name: &str) -> String {
        match self.vars.get(name) {
            Some(value) => value.clone(),
            None => self.fallback.resolve(name),
        }
    }
}
