//! A word under construction and its final field splitting.

use crate::env::EnvResolver;

/// Part of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    /// Text taken as-is: plain characters, quoted spans, escapes and
    /// substitution output.
    Text(String),
    /// An environment reference, expanded when the word is finished.
    Var { name: String, quoted: bool },
}

/// The word currently being scanned.
#[derive(Debug, Default)]
pub(super) struct Word {
    pieces: Vec<Piece>,
    /// Code-point offset of the first character belonging to this word.
    start: Option<usize>,
    /// Only unquoted, unescaped characters so far.
    plain: bool,
}

impl Word {
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn start(&self) -> Option<usize> {
        self.start
    }

    fn touch(&mut self, at: usize) {
        if self.start.is_none() {
            self.start = Some(at);
            self.plain = true;
        }
    }

    /// Push an unquoted, unescaped character.
    pub fn push_plain(&mut self, at: usize, c: char) {
        self.touch(at);
        self.push_char(c);
    }

    /// Push a character that lost any special meaning (quoted or escaped).
    pub fn push_literal(&mut self, at: usize, c: char) {
        self.touch(at);
        self.plain = false;
        self.push_char(c);
    }

    /// Push already-expanded text such as substitution output.
    pub fn push_text(&mut self, at: usize, s: &str) {
        self.touch(at);
        self.plain = false;
        if s.is_empty() {
            return;
        }
        match self.pieces.last_mut() {
            Some(Piece::Text(text)) => text.push_str(s),
            _ => self.pieces.push(Piece::Text(s.to_string())),
        }
    }

    pub fn push_var(&mut self, at: usize, name: String, quoted: bool) {
        self.touch(at);
        self.plain = false;
        self.pieces.push(Piece::Var { name, quoted });
    }

    pub fn mark_quoted(&mut self, at: usize) {
        self.touch(at);
        self.plain = false;
        // An empty quote pair still starts a field at this position.
        if !matches!(self.pieces.last(), Some(Piece::Text(_))) {
            self.pieces.push(Piece::Text(String::new()));
        }
    }

    fn push_char(&mut self, c: char) {
        match self.pieces.last_mut() {
            Some(Piece::Text(text)) => text.push(c),
            _ => self.pieces.push(Piece::Text(c.to_string())),
        }
    }

    /// True when the word is a bare file-descriptor number such as the `2`
    /// in `2>file`.
    pub fn is_fd_number(&self) -> bool {
        self.plain
            && matches!(self.pieces.as_slice(), [Piece::Text(t)] if t.chars().all(|c| c.is_ascii_digit()))
    }

    /// Expand references and split into final arguments.
    ///
    /// Values of unquoted references are split on whitespace; everything else
    /// is kept intact. A word made only of empty unquoted expansions produces
    /// no argument.
    pub fn finish(self, env: &dyn EnvResolver) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut started = false;

        for piece in self.pieces {
            match piece {
                Piece::Text(text) => {
                    current.push_str(&text);
                    started = true;
                }
                Piece::Var { name, quoted: true } => {
                    current.push_str(&env.resolve(&name));
                    started = true;
                }
                Piece::Var {
                    name,
                    quoted: false,
                } => {
                    for c in env.resolve(&name).chars() {
                        if is_blank(c) {
                            if started {
                                fields.push(std::mem::take(&mut current));
                                started = false;
                            }
                        } else {
                            current.push(c);
                            started = true;
                        }
                    }
                }
            }
        }

        if started {
            fields.push(current);
        }
        fields
    }
}

/// Word separators outside quotes.
pub(super) fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}
