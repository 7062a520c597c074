//! Syntax highlighting of source text as written

use std::borrow::Cow;

use tracing::debug;

use crate::formatting::Syntax;
use crate::language::Keyword;
use crate::parsing::lexer::{tokenize, TokenKind};

/// Split source into tagged fragments which, concatenated, reproduce the
/// input exactly. Whitespace and comments between tokens are kept. Text
/// that does not tokenize is returned as a single neutral fragment.
pub fn highlight_fragments(source: &str) -> Vec<(Syntax, Cow<'_, str>)> {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(error) => {
            debug!(%error, "Not highlighting");
            return vec![(Syntax::Neutral, Cow::Borrowed(source))];
        }
    };

    let mut fragments = Vec::new();
    let mut position = 0;
    let mut naming = false;

    for token in &tokens {
        gap(&mut fragments, &source[position..token.offset]);

        let syntax = match token.kind {
            TokenKind::Keyword(keyword) => Syntax::of_keyword(keyword),
            TokenKind::Identifier if naming => Syntax::Declaration,
            TokenKind::Identifier => Syntax::Variable,
            TokenKind::Number => Syntax::Numeric,
            TokenKind::Punctuation(_) | TokenKind::Range => Syntax::Punctuation,
            TokenKind::EndOfInput => break,
        };
        fragments.push((syntax, Cow::Borrowed(token.text)));

        naming = matches!(
            token.kind,
            TokenKind::Keyword(Keyword::Procedure) | TokenKind::Keyword(Keyword::Function)
        );
        position = token.offset
            + token
                .text
                .len();
    }

    gap(&mut fragments, &source[position..]);

    fragments
}

/// Whitespace runs are neutral, comments are tagged as such.
fn gap<'i>(fragments: &mut Vec<(Syntax, Cow<'i, str>)>, text: &'i str) {
    let mut rest = text;

    while !rest.is_empty() {
        let (syntax, length) = if rest.starts_with("//") {
            (
                Syntax::Comment,
                rest.find('\n')
                    .unwrap_or(rest.len()),
            )
        } else if rest.starts_with('{') {
            (
                Syntax::Comment,
                rest.find('}')
                    .map(|i| i + 1)
                    .unwrap_or(rest.len()),
            )
        } else {
            (
                Syntax::Neutral,
                rest.find(|c: char| !c.is_whitespace())
                    .unwrap_or(rest.len()),
            )
        };

        // anything else should not survive tokenizing
        let length = if length == 0 { rest.len() } else { length };

        fragments.push((syntax, Cow::Borrowed(&rest[..length])));
        rest = &rest[length..];
    }
}
