//! Tokenizer for the declaration language.
//!
//! Scanning is a single left-to-right pass which records the byte range of
//! each token. Lines and columns are attached afterwards from a table of
//! line start offsets built once over the whole input.

use std::fmt;

use crate::language::{Keyword, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punctuation {
    Colon,
    Semicolon,
    Comma,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
}

impl Punctuation {
    fn from_char(c: char) -> Option<Punctuation> {
        let punctuation = match c {
            ':' => Punctuation::Colon,
            ';' => Punctuation::Semicolon,
            ',' => Punctuation::Comma,
            '(' => Punctuation::OpenParen,
            ')' => Punctuation::CloseParen,
            '[' => Punctuation::OpenBracket,
            ']' => Punctuation::CloseBracket,
            _ => return None,
        };
        Some(punctuation)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Punctuation::Colon => ":",
            Punctuation::Semicolon => ";",
            Punctuation::Comma => ",",
            Punctuation::OpenParen => "(",
            Punctuation::CloseParen => ")",
            Punctuation::OpenBracket => "[",
            Punctuation::CloseBracket => "]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Number,
    Keyword(Keyword),
    Punctuation(Punctuation),
    Range,
    EndOfInput,
}

impl TokenKind {
    /// The name of this kind of token as used in grammar descriptions.
    pub fn terminal(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "ident",
            TokenKind::Number => "number",
            TokenKind::Keyword(keyword) => keyword.as_str(),
            TokenKind::Punctuation(punctuation) => punctuation.as_str(),
            TokenKind::Range => "..",
            TokenKind::EndOfInput => "$",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'i> {
    pub kind: TokenKind,
    pub text: &'i str,
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl<'i> Token<'i> {
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    /// How to refer to this token in an error message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    InvalidCharacter(usize, char),
    UnterminatedComment(usize),
}

impl LexicalError {
    pub fn offset(&self) -> usize {
        match self {
            LexicalError::InvalidCharacter(offset, _) => *offset,
            LexicalError::UnterminatedComment(offset) => *offset,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LexicalError::InvalidCharacter(_, c) => format!("invalid character '{}'", c),
            LexicalError::UnterminatedComment(_) => "unterminated comment".to_string(),
        }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message(), self.offset())
    }
}

/// Offsets at which each line of the source begins, for translating byte
/// offsets into lines and columns.
#[derive(Debug, Clone)]
pub struct LineIndex<'i> {
    source: &'i str,
    starts: Vec<usize>,
}

impl<'i> LineIndex<'i> {
    pub fn new(source: &'i str) -> LineIndex<'i> {
        let mut starts = vec![0];
        starts.extend(
            source
                .match_indices('\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { source, starts }
    }

    /// Columns count characters, not bytes, from the start of the line.
    pub fn locate(&self, offset: usize) -> Position {
        let offset = offset.min(
            self.source
                .len(),
        );
        let i = self
            .starts
            .partition_point(|&start| start <= offset)
            - 1;
        let start = self.starts[i];

        let column = self
            .source
            .get(start..offset)
            .map(|before| {
                before
                    .chars()
                    .count()
            })
            .unwrap_or(offset - start);

        Position::new(i as u32 + 1, column as u32 + 1, offset)
    }
}

/// Convert source text into tokens, finishing with an end of input token.
/// Fails on the first character that cannot begin a token.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexicalError> {
    let mut scanned: Vec<(TokenKind, usize, usize)> = Vec::new();
    let mut i = 0;

    while let Some(c) = source[i..]
        .chars()
        .next()
    {
        let rest = &source[i..];

        if c.is_whitespace() {
            i += c.len_utf8();
            continue;
        }

        // comments
        if rest.starts_with("//") {
            i += rest
                .find('\n')
                .unwrap_or(rest.len());
            continue;
        }
        if c == '{' {
            match rest.find('}') {
                Some(end) => i += end + 1,
                None => return Err(LexicalError::UnterminatedComment(i)),
            }
            continue;
        }

        let (kind, width) = if rest.starts_with("..") {
            (TokenKind::Range, 2)
        } else if let Some(punctuation) = Punctuation::from_char(c) {
            (TokenKind::Punctuation(punctuation), 1)
        } else if c.is_ascii_digit() {
            let width = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            (TokenKind::Number, width)
        } else if c.is_ascii_alphabetic() {
            let width = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            let word = rest[..width].to_ascii_lowercase();
            match Keyword::lookup(&word) {
                Some(keyword) => (TokenKind::Keyword(keyword), width),
                None => (TokenKind::Identifier, width),
            }
        } else {
            return Err(LexicalError::InvalidCharacter(i, c));
        };

        debug_assert!(width > 0);
        scanned.push((kind, i, i + width));
        i += width;
    }

    let index = LineIndex::new(source);

    let mut tokens: Vec<Token> = scanned
        .into_iter()
        .map(|(kind, start, end)| {
            let position = index.locate(start);
            Token {
                kind,
                text: &source[start..end],
                line: position.line,
                column: position.column,
                offset: start,
            }
        })
        .collect();

    let position = index.locate(source.len());
    tokens.push(Token {
        kind: TokenKind::EndOfInput,
        text: "",
        line: position.line,
        column: position.column,
        offset: source.len(),
    });

    Ok(tokens)
}

#[cfg(test)]
#[path = "checks/lexer.rs"]
mod check;
