//! Selector lexer splitting selector source into tokens.

use regex::Regex;
use std::sync::LazyLock;

/// Position markers first, then a maximal name run, then single punctuation.
static SELECTOR_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safe: The regex pattern is a compile-time constant and is valid.
    Regex::new(r"[LR]:|[\w.][\w.\-]*|[,|\-()]")
        .unwrap_or_else(|_| unreachable!("selector token regex is valid"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    Left,
    Right,
    Name(&'a str),
    Comma,
    Pipe,
    Minus,
    Open,
    Close,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind<'a>,
    pub(crate) start: usize,
}

/// Forward-only scanner over a selector string.
///
/// Characters that start no token are skipped; once nothing else matches the
/// lexer yields [`TokenKind::End`] forever.
#[derive(Debug)]
pub(crate) struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) const fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    pub(crate) fn next_token(&mut self) -> Token<'a> {
        let Some(found) = SELECTOR_TOKEN_RE.find_at(self.source, self.pos) else {
            self.pos = self.source.len();
            return Token {
                kind: TokenKind::End,
                start: self.source.len(),
            };
        };
        self.pos = found.end();
        let text = found.as_str();
        let kind = match text {
            "L:" => TokenKind::Left,
            "R:" => TokenKind::Right,
            "," => TokenKind::Comma,
            "|" => TokenKind::Pipe,
            "-" => TokenKind::Minus,
            "(" => TokenKind::Open,
            ")" => TokenKind::Close,
            name => TokenKind::Name(name),
        };
        Token {
            kind,
            start: found.start(),
        }
    }
}
