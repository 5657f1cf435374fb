//! Leading `NAME=value` environment assignments.

use once_cell::sync::Lazy;
use regex::Regex;

static ASSIGNMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*=").expect("valid regex"));

/// Check whether a word is an environment assignment (`VAR=value`).
pub fn is_env_assignment(word: &str) -> bool {
    ASSIGNMENT_RE.is_match(word)
}

/// Split already-tokenized words into leading assignments and the command.
///
/// Classification stops at the first word that is not an assignment, so
/// `cmd A=B` keeps `A=B` as an argument.
pub fn split_env_assignments(mut words: Vec<String>) -> (Vec<String>, Vec<String>) {
    let count = words.iter().take_while(|w| is_env_assignment(w)).count();
    let args = words.split_off(count);
    (words, args)
}

/// Split an assignment into its name and value.
pub fn assignment_parts(word: &str) -> Option<(&str, &str)> {
    if !is_env_assignment(word) {
        return None;
    }
    word.split_once('=')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_is_env_assignment() {
        assert!(is_env_assignment("FOO=bar"));
        assert!(is_env_assignment("_x1="));
        assert!(!is_env_assignment("1FOO=bar"));
        assert!(!is_env_assignment("=bar"));
        assert!(!is_env_assignment("--args=A=B"));
        assert!(!is_env_assignment("FOO"));
    }

    #[test]
    fn test_split_leading_assignments() {
        let (env, args) = split_env_assignments(owned(&[
            "FOO=foo",
            "BAR=bar",
            "cmd",
            "--args=A=B",
            "-A=B",
        ]));
        assert_eq!(env, vec!["FOO=foo", "BAR=bar"]);
        assert_eq!(args, vec!["cmd", "--args=A=B", "-A=B"]);
    }

    #[test]
    fn test_no_leading_assignments() {
        let (env, args) = split_env_assignments(owned(&["cmd", "FOO=bar"]));
        assert!(env.is_empty());
        assert_eq!(args, vec!["cmd", "FOO=bar"]);
    }

    #[test]
    fn test_only_assignments() {
        let (env, args) = split_env_assignments(owned(&["A=1", "B=2"]));
        assert_eq!(env, vec!["A=1", "B=2"]);
        assert!(args.is_empty());
    }

    #[test]
    fn test_assignment_parts() {
        assert_eq!(assignment_parts("FOO=a=b"), Some(("FOO", "a=b")));
        assert_eq!(assignment_parts("cmd"), None);
    }
}
