use std::fmt;

/// The two actions which collided in a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftShift,
    ShiftReduce,
    ReduceReduce,
    AcceptReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConflictKind::ShiftShift => "shift/shift",
            ConflictKind::ShiftReduce => "shift/reduce",
            ConflictKind::ReduceReduce => "reduce/reduce",
            ConflictKind::AcceptReduce => "accept/reduce",
        };
        f.write_str(name)
    }
}

/// Problems with a grammar description. Everything except `Conflict` is
/// found by the structural check before any table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    Malformed(String),
    NoTerminals,
    NoNonterminals,
    DuplicateTerminal(String),
    DuplicateNonterminal(String),
    ReservedSymbol(String),
    AmbiguousSymbol(String),
    UnknownStartSymbol(String),
    UnknownHead(String),
    MissingProductions(String),
    UnknownSymbol(String, String),
    Conflict {
        kind: ConflictKind,
        state: usize,
        symbol: String,
    },
}

impl GrammarError {
    pub fn message(&self) -> String {
        match self {
            GrammarError::Malformed(details) => {
                format!("grammar description is not valid: {}", details)
            }
            GrammarError::NoTerminals => "no terminals declared".to_string(),
            GrammarError::NoNonterminals => "no nonterminals declared".to_string(),
            GrammarError::DuplicateTerminal(name) => {
                format!("terminal '{}' is declared more than once", name)
            }
            GrammarError::DuplicateNonterminal(name) => {
                format!("nonterminal '{}' is declared more than once", name)
            }
            GrammarError::ReservedSymbol(name) => {
                format!("'{}' is reserved for the end of input", name)
            }
            GrammarError::AmbiguousSymbol(name) => {
                format!("'{}' is declared as both a terminal and a nonterminal", name)
            }
            GrammarError::UnknownStartSymbol(name) => {
                format!("start symbol '{}' is not a nonterminal", name)
            }
            GrammarError::UnknownHead(name) => {
                format!("productions given for '{}' which is not a nonterminal", name)
            }
            GrammarError::MissingProductions(name) => {
                format!("nonterminal '{}' has no productions", name)
            }
            GrammarError::UnknownSymbol(head, symbol) => {
                format!("production for '{}' uses undeclared symbol '{}'", head, symbol)
            }
            GrammarError::Conflict {
                kind,
                state,
                symbol,
            } => format!("{} conflict in state {} on symbol '{}'", kind, state, symbol),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, GrammarError::Conflict { .. })
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
