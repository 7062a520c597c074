//! parser for declaration source files

use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::language::{LoadingError, ParseOutcome, Program};
use crate::parsing::lexer::{LexicalError, LineIndex};
use crate::parsing::parser::ParsingError;

pub mod lexer;
pub mod parser;
pub mod scope;

/// Read a file and return an owned String. We pass that ownership back to the
/// main function so that the Program object created by parse() below can
/// have the same lifetime. A filename of `-` reads standard input.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    let result = if filename.to_str() == Some("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map(|_| content)
    } else {
        std::fs::read_to_string(filename)
    };

    match result {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Tokenize and parse text into a Program, or return the list of errors
/// encountered. A lexical error stops everything and is the only error
/// returned.
pub fn parse(content: &str) -> Result<Program<'_>, Vec<ParsingError>> {
    let tokens = match lexer::tokenize(content) {
        Ok(tokens) => tokens,
        Err(error) => {
            debug!(%error, "Tokenizing failed");
            return Err(vec![lexical_error(content, error)]);
        }
    };

    debug!("Read {} tokens", tokens.len());

    match parser::parse_program(&tokens) {
        Ok(program) => {
            let count = program.count();
            debug!(
                "Found {} declaration{}",
                count,
                if count == 1 { "" } else { "s" }
            );
            Ok(program)
        }
        Err(errors) => {
            debug!("errors: {}", errors.len());
            Err(errors)
        }
    }
}

/// Validate text, answering with the same shape whether the failure was
/// lexical, syntactic or semantic.
pub fn check(content: &str) -> ParseOutcome {
    match parse(content) {
        Ok(_) => ParseOutcome::from_errors(vec![]),
        Err(errors) => ParseOutcome::from_errors(
            errors
                .iter()
                .map(Into::into)
                .collect(),
        ),
    }
}

fn lexical_error(content: &str, error: LexicalError) -> ParsingError {
    let index = LineIndex::new(content);
    let position = index.locate(error.offset());

    match error {
        LexicalError::InvalidCharacter(_, c) => ParsingError::InvalidCharacter(position, c),
        LexicalError::UnterminatedComment(_) => ParsingError::UnterminatedComment(position),
    }
}
