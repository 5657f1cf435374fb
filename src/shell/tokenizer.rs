//! Shell-style tokenization (shlex-like) with expansion and substitution.

use super::word::{Word, is_blank};
use crate::env::EnvResolver;
use crate::error::{ParseError, QuoteKind, SubstitutionKind};
use crate::substitution::Executor;

/// Settings for a single tokenize call.
#[derive(Clone, Copy)]
pub struct TokenizeOptions<'a> {
    /// Expand `$NAME` and `${NAME}` references.
    pub expand_env: bool,
    /// Execute `` `cmd` `` and `$(cmd)` spans instead of keeping them verbatim.
    pub expand_substitution: bool,
    pub env: &'a dyn EnvResolver,
    pub executor: &'a dyn Executor,
}

/// Result of tokenizing a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    /// Completed arguments, in order.
    pub words: Vec<String>,
    /// Code-point offset of the construct that stopped scanning, if any.
    pub stop: Option<usize>,
}

impl Tokenized {
    /// Stop offset, 0 when the whole line was consumed.
    pub fn position(&self) -> usize {
        self.stop.unwrap_or(0)
    }

    /// Whether an unsupported construct left part of the line unparsed.
    pub fn has_more(&self) -> bool {
        self.stop.is_some()
    }

    /// The unparsed tail of `line`, starting at the stop offset.
    pub fn remainder<'l>(&self, line: &'l str) -> Option<&'l str> {
        remainder_at(line, self.stop?)
    }
}

/// The tail of `line` from code-point offset `stop`.
pub fn remainder_at(line: &str, stop: usize) -> Option<&str> {
    line.char_indices().nth(stop).map(|(i, _)| &line[i..])
}

/// Split a line into arguments.
///
/// Scanning stops without error at the first control operator or
/// redirection outside quotes; the offset is reported in [`Tokenized::stop`].
pub fn tokenize(input: &str, opts: &TokenizeOptions<'_>) -> Result<Tokenized, ParseError> {
    Scanner::new(input, opts).run()
}

/// An open `` ` `` or `$(` span whose body is being captured.
struct Capture {
    kind: SubstitutionKind,
    /// Offset of the opening delimiter.
    start: usize,
    body: String,
    depth: usize,
    quote: Option<QuoteKind>,
    escaped: bool,
}

impl Capture {
    fn new(kind: SubstitutionKind, start: usize) -> Self {
        Self {
            kind,
            start,
            body: String::new(),
            depth: 0,
            quote: None,
            escaped: false,
        }
    }

    /// Feed one character of the body. Returns true on the closing delimiter.
    fn feed(&mut self, c: char) -> bool {
        if self.escaped {
            self.escaped = false;
        } else if c == '\\' && self.quote != Some(QuoteKind::Single) {
            self.escaped = true;
        } else if let Some(quote) = self.quote {
            if closes(quote, c) {
                self.quote = None;
            }
        } else {
            match (self.kind, c) {
                (_, '\'') => self.quote = Some(QuoteKind::Single),
                (_, '"') => self.quote = Some(QuoteKind::Double),
                (SubstitutionKind::Backtick, '`') => return true,
                (SubstitutionKind::Dollar, '(') => self.depth += 1,
                (SubstitutionKind::Dollar, ')') => {
                    if self.depth == 0 {
                        return true;
                    }
                    self.depth -= 1;
                }
                // A nested backtick or `$(` is part of the outer body.
                _ => {}
            }
        }
        self.body.push(c);
        false
    }

    /// The span as written, delimiters included.
    fn verbatim(&self) -> String {
        match self.kind {
            SubstitutionKind::Backtick => format!("`{}`", self.body),
            SubstitutionKind::Dollar => format!("$({})", self.body),
        }
    }
}

fn closes(quote: QuoteKind, c: char) -> bool {
    match quote {
        QuoteKind::Single => c == '\'',
        QuoteKind::Double => c == '"',
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Scanner<'a> {
    opts: &'a TokenizeOptions<'a>,
    chars: Vec<char>,
    pos: usize,
    escaped: bool,
    quote: Option<QuoteKind>,
    capture: Option<Capture>,
    word: Word,
    words: Vec<String>,
}

impl<'a> Scanner<'a> {
    fn new(input: &str, opts: &'a TokenizeOptions<'a>) -> Self {
        Self {
            opts,
            chars: input.chars().collect(),
            pos: 0,
            escaped: false,
            quote: None,
            capture: None,
            word: Word::default(),
            words: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Tokenized, ParseError> {
        let mut stop = None;
        while let Some(&c) = self.chars.get(self.pos) {
            let at = self.pos;
            self.pos += 1;
            if let Some(offset) = self.step(at, c)? {
                stop = Some(offset);
                break;
            }
        }

        if stop.is_none() {
            self.check_terminated()?;
        }
        self.finish_word();

        Ok(Tokenized {
            words: self.words,
            stop,
        })
    }

    /// Handle one character. Returns a stop offset on an unsupported construct.
    fn step(&mut self, at: usize, c: char) -> Result<Option<usize>, ParseError> {
        if let Some(capture) = self.capture.as_mut() {
            if capture.feed(c) {
                self.close_capture()?;
            }
            return Ok(None);
        }

        if self.escaped {
            self.escaped = false;
            self.word.push_literal(at, c);
            return Ok(None);
        }

        match (self.quote, c) {
            (Some(QuoteKind::Single), '\'') => self.quote = None,
            (Some(QuoteKind::Single), _) => self.word.push_literal(at, c),
            (_, '\\') => self.escaped = true,
            (Some(QuoteKind::Double), '"') => self.quote = None,
            (Some(QuoteKind::Double), '$') => self.scan_dollar(at, true),
            (Some(QuoteKind::Double), _) => self.word.push_literal(at, c),
            (None, '"') => {
                self.quote = Some(QuoteKind::Double);
                self.word.mark_quoted(at);
            }
            (None, '\'') => {
                self.quote = Some(QuoteKind::Single);
                self.word.mark_quoted(at);
            }
            (None, c) if is_blank(c) => self.finish_word(),
            (None, '`') => self.capture = Some(Capture::new(SubstitutionKind::Backtick, at)),
            (None, '$') if self.chars.get(self.pos) == Some(&'(') => {
                self.pos += 1;
                self.capture = Some(Capture::new(SubstitutionKind::Dollar, at));
            }
            (None, '$') => self.scan_dollar(at, false),
            (None, '>' | '<') => return Ok(Some(self.redirect_start(at))),
            (None, ';' | '&' | '|' | '(' | ')') => return Ok(Some(at)),
            (None, _) => self.word.push_plain(at, c),
        }
        Ok(None)
    }

    /// `$` outside single quotes: a reference when expansion is on and a name
    /// follows, otherwise a literal dollar sign.
    fn scan_dollar(&mut self, at: usize, quoted: bool) {
        if self.opts.expand_env
            && let Some((name, next)) = self.reference_name()
        {
            self.word.push_var(at, name, quoted);
            self.pos = next;
            return;
        }
        if quoted {
            self.word.push_literal(at, '$');
        } else {
            self.word.push_plain(at, '$');
        }
    }

    /// Read `NAME` or `{NAME}` at the cursor, returning it with the offset
    /// just past it.
    fn reference_name(&self) -> Option<(String, usize)> {
        let rest = &self.chars[self.pos..];
        match rest.first() {
            Some('{') => {
                let close = rest.iter().position(|&c| c == '}')?;
                let name: String = rest[1..close].iter().collect();
                if name.is_empty() || !name.chars().all(is_name_char) {
                    return None;
                }
                Some((name, self.pos + close + 1))
            }
            Some(&c) if is_name_char(c) => {
                let len = rest
                    .iter()
                    .position(|&c| !is_name_char(c))
                    .unwrap_or(rest.len());
                Some((rest[..len].iter().collect(), self.pos + len))
            }
            _ => None,
        }
    }

    /// A redirection stops at the operator, or at its fd number (`2>`).
    fn redirect_start(&mut self, at: usize) -> usize {
        match self.word.start() {
            Some(start) if self.word.is_fd_number() => {
                self.word = Word::default();
                start
            }
            _ => at,
        }
    }

    fn close_capture(&mut self) -> Result<(), ParseError> {
        let Some(capture) = self.capture.take() else {
            return Ok(());
        };
        if self.opts.expand_substitution {
            let output = self.opts.executor.execute(&capture.body)?;
            self.word.push_text(capture.start, &output);
        } else {
            self.word.push_text(capture.start, &capture.verbatim());
        }
        Ok(())
    }

    fn finish_word(&mut self) {
        let word = std::mem::take(&mut self.word);
        if !word.is_empty() {
            self.words.extend(word.finish(self.opts.env));
        }
    }

    fn check_terminated(&self) -> Result<(), ParseError> {
        if self.escaped {
            return Err(ParseError::UnterminatedEscape);
        }
        if let Some(capture) = &self.capture {
            return Err(ParseError::UnterminatedSubstitution(capture.kind));
        }
        if let Some(quote) = self.quote {
            return Err(ParseError::UnterminatedQuote(quote));
        }
        Ok(())
    }
}
