//! The uniform shape in which lexical, syntax, and semantic problems are
//! reported to callers.

use serde::Serialize;
use std::fmt;

use super::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::Lexical => "lexical",
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::Semantic => "semantic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(rename = "type")]
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: u32,
    #[serde(rename = "col")]
    pub column: u32,
    #[serde(skip)]
    pub offset: usize,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: String, position: Position) -> Diagnostic {
        Diagnostic {
            kind,
            message,
            line: position.line,
            column: position.column,
            offset: position.offset,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error at {}:{}: {}",
            self.kind, self.line, self.column, self.message
        )
    }
}

/// Result of checking a piece of source text. Diagnostics are kept in the
/// order they were raised; use `first()` for the one to show a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ParseOutcome {
    pub ok: bool,
    pub errors: Vec<Diagnostic>,
}

impl ParseOutcome {
    pub fn from_errors(errors: Vec<Diagnostic>) -> ParseOutcome {
        ParseOutcome {
            ok: errors.is_empty(),
            errors,
        }
    }

    /// The earliest diagnostic by line and column.
    pub fn first(&self) -> Option<&Diagnostic> {
        self.errors
            .iter()
            .min_by_key(|diagnostic| (diagnostic.line, diagnostic.column))
    }

    /// All diagnostics sorted by line and column. The sort is stable so
    /// diagnostics at the same place keep the order they were raised in.
    pub fn sorted(&self) -> Vec<&Diagnostic> {
        let mut errors: Vec<&Diagnostic> = self
            .errors
            .iter()
            .collect();
        errors.sort_by_key(|diagnostic| (diagnostic.line, diagnostic.column));
        errors
    }
}
