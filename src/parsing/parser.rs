//! Recursive descent parser for declarations.
//!
//! Every production is chosen by looking at the current token alone. A
//! syntax error abandons the parse; semantic problems (name conflicts,
//! duplicate parameters, bad bounds) are recorded and parsing carries on so
//! that later problems can still be found.

use std::fmt;

use tracing::debug;

use crate::language::*;
use crate::parsing::lexer::{Punctuation, Token, TokenKind};
use crate::parsing::scope::{ScopeError, ScopeTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    InvalidCharacter(Position, char),
    UnterminatedComment(Position),
    Expected(Position, &'static str, String),
    NotADeclaration(Position, String),
    UnknownType(Position, String),
    NameConflict(Position, SymbolKind, String, u32),
    DuplicateParameter(Position, String),
    InvalidStringSize(Position, String),
    InvalidArrayRange(Position, u64, u64),
    InvalidReturnType(Position, String),
    NumberTooLarge(Position, String),
}

impl ParsingError {
    pub fn position(&self) -> Position {
        match self {
            ParsingError::InvalidCharacter(position, _) => *position,
            ParsingError::UnterminatedComment(position) => *position,
            ParsingError::Expected(position, _, _) => *position,
            ParsingError::NotADeclaration(position, _) => *position,
            ParsingError::UnknownType(position, _) => *position,
            ParsingError::NameConflict(position, _, _, _) => *position,
            ParsingError::DuplicateParameter(position, _) => *position,
            ParsingError::InvalidStringSize(position, _) => *position,
            ParsingError::InvalidArrayRange(position, _, _) => *position,
            ParsingError::InvalidReturnType(position, _) => *position,
            ParsingError::NumberTooLarge(position, _) => *position,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ParsingError::InvalidCharacter(..) | ParsingError::UnterminatedComment(..) => {
                DiagnosticKind::Lexical
            }
            ParsingError::Expected(..)
            | ParsingError::NotADeclaration(..)
            | ParsingError::UnknownType(..) => DiagnosticKind::Syntax,
            ParsingError::NameConflict(..)
            | ParsingError::DuplicateParameter(..)
            | ParsingError::InvalidStringSize(..)
            | ParsingError::InvalidArrayRange(..)
            | ParsingError::InvalidReturnType(..)
            | ParsingError::NumberTooLarge(..) => DiagnosticKind::Semantic,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::InvalidCharacter(_, c) => format!("invalid character '{}'", c),
            ParsingError::UnterminatedComment(_) => "unterminated comment".to_string(),
            ParsingError::Expected(_, expected, found) => {
                format!("expected {} but found {}", expected, found)
            }
            ParsingError::NotADeclaration(_, found) => {
                format!("expected a declaration but found {}", found)
            }
            ParsingError::UnknownType(_, found) => format!("unknown type {}", found),
            ParsingError::NameConflict(_, kind, name, line) => format!(
                "{} name '{}' conflicts with the symbol declared on line {}",
                kind, name, line
            ),
            ParsingError::DuplicateParameter(_, name) => {
                format!("duplicate parameter '{}'", name)
            }
            ParsingError::InvalidStringSize(_, size) => format!(
                "invalid size string[{}], must be between 1 and 255",
                size
            ),
            ParsingError::InvalidArrayRange(_, low, high) => format!(
                "invalid array range [{}..{}], lower bound must be less than upper bound",
                low, high
            ),
            ParsingError::InvalidReturnType(_, kind) => format!(
                "invalid function return type '{}', must be integer or real",
                kind
            ),
            ParsingError::NumberTooLarge(_, text) => format!("number {} is too large", text),
        }
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position(), self.message())
    }
}

impl From<ScopeError> for ParsingError {
    fn from(error: ScopeError) -> Self {
        match error {
            ScopeError::NameConflict {
                name,
                kind,
                position,
                first,
            } => ParsingError::NameConflict(position, kind, name, first.line),
            ScopeError::DuplicateParameter { name, position } => {
                ParsingError::DuplicateParameter(position, name)
            }
        }
    }
}

impl From<&ParsingError> for Diagnostic {
    fn from(error: &ParsingError) -> Self {
        Diagnostic::new(error.kind(), error.message(), error.position())
    }
}

/// Parse a token sequence, reporting whether it is well formed along with
/// every diagnostic raised on the way.
pub fn parse(tokens: &[Token<'_>]) -> ParseOutcome {
    match parse_program(tokens) {
        Ok(_) => ParseOutcome::from_errors(vec![]),
        Err(errors) => ParseOutcome::from_errors(
            errors
                .iter()
                .map(Diagnostic::from)
                .collect(),
        ),
    }
}

/// Parse a token sequence into its declarations, or return the problems
/// encountered in the order they were found. Each call works against a
/// fresh scope table holding only the global scope.
pub fn parse_program<'i>(tokens: &[Token<'i>]) -> Result<Program<'i>, Vec<ParsingError>> {
    let mut parser = Parser::new(tokens);

    let result = parser.read_program();
    let mut problems = parser.problems;

    match result {
        Ok(program) if problems.is_empty() => {
            debug!("Parsed {} declarations", program.count());
            Ok(program)
        }
        Ok(_) => Err(problems),
        Err(error) => {
            debug!(%error, "Parsing abandoned");
            problems.push(error);
            Err(problems)
        }
    }
}

#[derive(Debug)]
struct Parser<'a, 'i> {
    tokens: &'a [Token<'i>],
    index: usize,
    scope: ScopeTable<'i>,
    problems: Vec<ParsingError>,
}

impl<'a, 'i> Parser<'a, 'i> {
    fn new(tokens: &'a [Token<'i>]) -> Parser<'a, 'i> {
        Parser {
            tokens,
            index: 0,
            scope: ScopeTable::new(),
            problems: Vec::new(),
        }
    }

    fn peek(&self) -> Token<'i> {
        match self
            .tokens
            .get(self.index)
        {
            Some(token) => *token,
            None => self.end_of_input(),
        }
    }

    // token sequences from tokenize() always finish with an end of input
    // token, but a caller could hand us a truncated slice.
    fn end_of_input(&self) -> Token<'i> {
        let (line, column, offset) = match self
            .tokens
            .last()
        {
            Some(last) if last.kind == TokenKind::EndOfInput => {
                (last.line, last.column, last.offset)
            }
            Some(last) => (
                last.line,
                last.column
                    + last
                        .text
                        .chars()
                        .count() as u32,
                last.offset
                    + last
                        .text
                        .len(),
            ),
            None => (1, 1, 0),
        };

        Token {
            kind: TokenKind::EndOfInput,
            text: "",
            line,
            column,
            offset,
        }
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek()
            .kind
            == kind
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'i>, ParsingError> {
        let token = self.peek();
        if token.kind == kind {
            self.advance();
            Ok(token)
        } else {
            Err(ParsingError::Expected(
                token.position(),
                expected,
                token.describe(),
            ))
        }
    }

    fn record(&mut self, result: Result<(), ScopeError>) {
        if let Err(error) = result {
            self.problems
                .push(error.into());
        }
    }

    fn read_program(&mut self) -> Result<Program<'i>, ParsingError> {
        let declarations = self.read_declarations()?;

        let token = self.peek();
        if token.kind != TokenKind::EndOfInput {
            return Err(ParsingError::NotADeclaration(
                token.position(),
                token.describe(),
            ));
        }

        Ok(Program { declarations })
    }

    /// Zero or more declarations, stopping at the first token which cannot
    /// begin one.
    fn read_declarations(&mut self) -> Result<Vec<Declaration<'i>>, ParsingError> {
        let mut declarations = Vec::new();

        loop {
            let keyword = match self
                .peek()
                .kind
            {
                TokenKind::Keyword(keyword) if keyword.starts_declaration() => keyword,
                _ => break,
            };

            let declaration = match keyword {
                Keyword::Var => self.read_variable()?,
                Keyword::Procedure => self.read_procedure()?,
                _ => self.read_function()?,
            };
            declarations.push(declaration);
        }

        Ok(declarations)
    }

    fn read_variable(&mut self) -> Result<Declaration<'i>, ParsingError> {
        self.advance(); // var

        let names = self.read_identifiers()?;
        for &(name, position) in &names {
            let result = self
                .scope
                .declare_variable(name.0, position);
            self.record(result);
        }

        self.expect(TokenKind::Punctuation(Punctuation::Colon), "':'")?;
        let (kind, _) = self.read_type()?;
        self.expect(TokenKind::Punctuation(Punctuation::Semicolon), "';'")?;

        Ok(Declaration::Variable {
            names: names
                .into_iter()
                .map(|(name, _)| name)
                .collect(),
            kind,
        })
    }

    fn read_procedure(&mut self) -> Result<Declaration<'i>, ParsingError> {
        self.advance(); // procedure

        let name = self.expect(TokenKind::Identifier, "a procedure name")?;
        let parameters = self.read_parameters()?;
        self.expect(TokenKind::Punctuation(Punctuation::Semicolon), "';'")?;

        let forward = self.at(TokenKind::Keyword(Keyword::Forward));
        let result = self
            .scope
            .declare_procedure(name.text, name.position(), forward);
        self.record(result);

        let body = self.read_routine(name.text, &parameters, forward)?;

        Ok(Declaration::Procedure {
            name: Identifier(name.text),
            parameters: parameters
                .into_iter()
                .map(|(parameter, _)| parameter)
                .collect(),
            body,
        })
    }

    fn read_function(&mut self) -> Result<Declaration<'i>, ParsingError> {
        self.advance(); // function

        let name = self.expect(TokenKind::Identifier, "a function name")?;
        let parameters = self.read_parameters()?;
        self.expect(TokenKind::Punctuation(Punctuation::Colon), "':'")?;
        let (returns, position) = self.read_type()?;
        self.expect(TokenKind::Punctuation(Punctuation::Semicolon), "';'")?;

        let primitive = match returns {
            DeclaredType::Primitive(primitive) if primitive.is_returnable() => Some(primitive),
            _ => {
                self.problems
                    .push(ParsingError::InvalidReturnType(
                        position,
                        returns.to_string(),
                    ));
                None
            }
        };

        let forward = self.at(TokenKind::Keyword(Keyword::Forward));
        let result = self
            .scope
            .declare_function(name.text, primitive, name.position(), forward);
        self.record(result);

        let body = self.read_routine(name.text, &parameters, forward)?;

        Ok(Declaration::Function {
            name: Identifier(name.text),
            parameters: parameters
                .into_iter()
                .map(|(parameter, _)| parameter)
                .collect(),
            returns,
            body,
        })
    }

    /// The part of a procedure or function after its heading: either
    /// `forward ;` or a body. Parameters and the body belong to a new scope
    /// named after the routine.
    fn read_routine(
        &mut self,
        name: &'i str,
        parameters: &[(Parameter<'i>, Position)],
        forward: bool,
    ) -> Result<Option<Vec<Declaration<'i>>>, ParsingError> {
        self.scope
            .enter(name);

        let names: Vec<(&'i str, Position)> = parameters
            .iter()
            .map(|(parameter, position)| (parameter.name.0, *position))
            .collect();
        let result = self
            .scope
            .declare_params(&names);
        self.record(result);

        let body = if forward {
            self.advance(); // forward
            self.expect(TokenKind::Punctuation(Punctuation::Semicolon), "';'")?;
            None
        } else {
            Some(self.read_body()?)
        };

        self.scope
            .exit();

        Ok(body)
    }

    fn read_body(&mut self) -> Result<Vec<Declaration<'i>>, ParsingError> {
        self.expect(TokenKind::Keyword(Keyword::Begin), "'begin' or 'forward'")?;

        let declarations = self.read_declarations()?;

        self.expect(TokenKind::Keyword(Keyword::End), "a declaration or 'end'")?;
        if self.at(TokenKind::Punctuation(Punctuation::Semicolon)) {
            self.advance();
        }

        Ok(declarations)
    }

    fn read_identifiers(&mut self) -> Result<Vec<(Identifier<'i>, Position)>, ParsingError> {
        let mut names = Vec::new();

        loop {
            let token = self.expect(TokenKind::Identifier, "an identifier")?;
            names.push((Identifier(token.text), token.position()));

            if self.at(TokenKind::Punctuation(Punctuation::Comma)) {
                self.advance();
            } else {
                break;
            }
        }

        Ok(names)
    }

    /// An optional parenthesized list of sections like `a, b: integer`
    /// separated by semicolons, expanded into one parameter per name.
    fn read_parameters(&mut self) -> Result<Vec<(Parameter<'i>, Position)>, ParsingError> {
        let mut parameters = Vec::new();

        if !self.at(TokenKind::Punctuation(Punctuation::OpenParen)) {
            return Ok(parameters);
        }
        self.advance();

        if !self.at(TokenKind::Punctuation(Punctuation::CloseParen)) {
            loop {
                let names = self.read_identifiers()?;
                self.expect(TokenKind::Punctuation(Punctuation::Colon), "':'")?;
                let (kind, _) = self.read_type()?;

                for (name, position) in names {
                    parameters.push((
                        Parameter {
                            name,
                            kind: kind.clone(),
                        },
                        position,
                    ));
                }

                if self.at(TokenKind::Punctuation(Punctuation::Semicolon)) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.expect(TokenKind::Punctuation(Punctuation::CloseParen), "')'")?;

        Ok(parameters)
    }

    /// Read a type, returning it with the position of its first token.
    fn read_type(&mut self) -> Result<(DeclaredType, Position), ParsingError> {
        let token = self.peek();
        let position = token.position();

        let kind = match token.kind {
            TokenKind::Keyword(Keyword::String) => {
                self.advance();
                self.read_string_size()?
            }
            TokenKind::Keyword(Keyword::Array) => {
                self.advance();
                self.read_array()?
            }
            TokenKind::Keyword(keyword) => match PrimitiveType::from_keyword(keyword) {
                Some(primitive) => {
                    self.advance();
                    DeclaredType::Primitive(primitive)
                }
                None => return Err(ParsingError::UnknownType(position, token.describe())),
            },
            TokenKind::Identifier => {
                return Err(ParsingError::UnknownType(position, token.describe()))
            }
            _ => {
                return Err(ParsingError::Expected(
                    position,
                    "a type",
                    token.describe(),
                ))
            }
        };

        Ok((kind, position))
    }

    fn read_string_size(&mut self) -> Result<DeclaredType, ParsingError> {
        if !self.at(TokenKind::Punctuation(Punctuation::OpenBracket)) {
            return Ok(DeclaredType::String(None));
        }
        self.advance();

        let number = self.expect(TokenKind::Number, "a string size")?;
        self.expect(TokenKind::Punctuation(Punctuation::CloseBracket), "']'")?;

        let size = number
            .text
            .parse::<u32>()
            .ok();
        if !matches!(size, Some(1..=255)) {
            self.problems
                .push(ParsingError::InvalidStringSize(
                    number.position(),
                    number
                        .text
                        .to_string(),
                ));
        }

        Ok(DeclaredType::String(size))
    }

    fn read_array(&mut self) -> Result<DeclaredType, ParsingError> {
        self.expect(TokenKind::Punctuation(Punctuation::OpenBracket), "'['")?;
        let low = self.expect(TokenKind::Number, "a lower bound")?;
        self.expect(TokenKind::Range, "'..'")?;
        let high = self.expect(TokenKind::Number, "an upper bound")?;
        self.expect(TokenKind::Punctuation(Punctuation::CloseBracket), "']'")?;
        self.expect(TokenKind::Keyword(Keyword::Of), "'of'")?;

        let bounds = (self.read_bound(low), self.read_bound(high));
        if let (Some(from), Some(to)) = bounds {
            if from >= to {
                self.problems
                    .push(ParsingError::InvalidArrayRange(low.position(), from, to));
            }
        }

        let (element, _) = self.read_type()?;

        Ok(DeclaredType::Array {
            low: bounds
                .0
                .unwrap_or(0),
            high: bounds
                .1
                .unwrap_or(0),
            element: Box::new(element),
        })
    }

    fn read_bound(&mut self, token: Token<'i>) -> Option<u64> {
        match token
            .text
            .parse::<u64>()
        {
            Ok(value) => Some(value),
            Err(_) => {
                self.problems
                    .push(ParsingError::NumberTooLarge(
                        token.position(),
                        token
                            .text
                            .to_string(),
                    ));
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "checks/parser.rs"]
mod check;

#[cfg(test)]
#[path = "checks/errors.rs"]
mod errors;
