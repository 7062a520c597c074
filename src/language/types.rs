//! Types representing declarations in the Pascal-style declaration language

use std::fmt;

/// A location in the source text. Lines and columns are 1-origin, the
/// offset is the 0-origin byte offset. Ordering is by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: usize) -> Position {
        Position {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Var,
    Procedure,
    Function,
    Forward,
    Begin,
    End,
    Array,
    Of,
    Integer,
    Real,
    Char,
    Boolean,
    String,
}

impl Keyword {
    /// Match an already lower-cased word against the reserved words.
    pub fn lookup(word: &str) -> Option<Keyword> {
        let keyword = match word {
            "var" => Keyword::Var,
            "procedure" => Keyword::Procedure,
            "function" => Keyword::Function,
            "forward" => Keyword::Forward,
            "begin" => Keyword::Begin,
            "end" => Keyword::End,
            "array" => Keyword::Array,
            "of" => Keyword::Of,
            "integer" => Keyword::Integer,
            "real" => Keyword::Real,
            "char" => Keyword::Char,
            "boolean" => Keyword::Boolean,
            "string" => Keyword::String,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Var => "var",
            Keyword::Procedure => "procedure",
            Keyword::Function => "function",
            Keyword::Forward => "forward",
            Keyword::Begin => "begin",
            Keyword::End => "end",
            Keyword::Array => "array",
            Keyword::Of => "of",
            Keyword::Integer => "integer",
            Keyword::Real => "real",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::String => "string",
        }
    }

    /// Keywords which can begin a declaration.
    pub fn starts_declaration(&self) -> bool {
        matches!(self, Keyword::Var | Keyword::Procedure | Keyword::Function)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Integer,
    Real,
    Char,
    Boolean,
}

impl PrimitiveType {
    pub fn from_keyword(keyword: Keyword) -> Option<PrimitiveType> {
        match keyword {
            Keyword::Integer => Some(PrimitiveType::Integer),
            Keyword::Real => Some(PrimitiveType::Real),
            Keyword::Char => Some(PrimitiveType::Char),
            Keyword::Boolean => Some(PrimitiveType::Boolean),
            _ => None,
        }
    }

    /// Functions may only return numbers.
    pub fn is_returnable(&self) -> bool {
        matches!(self, PrimitiveType::Integer | PrimitiveType::Real)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Integer => "integer",
            PrimitiveType::Real => "real",
            PrimitiveType::Char => "char",
            PrimitiveType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Primitive(PrimitiveType),
    String(Option<u32>),
    Array {
        low: u64,
        high: u64,
        element: Box<DeclaredType>,
    },
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Primitive(primitive) => write!(f, "{}", primitive),
            DeclaredType::String(None) => f.write_str("string"),
            DeclaredType::String(Some(size)) => write!(f, "string[{}]", size),
            DeclaredType::Array {
                low,
                high,
                element,
            } => write!(f, "array[{}..{}] of {}", low, high, element),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Procedure,
    Function,
    Parameter,
    Variable,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Procedure => "procedure",
            SymbolKind::Function => "function",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Variable => "variable",
        };
        f.write_str(name)
    }
}

// the declaration tree produced by a successful parse

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier<'i>(pub &'i str);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter<'i> {
    pub name: Identifier<'i>,
    pub kind: DeclaredType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration<'i> {
    Variable {
        names: Vec<Identifier<'i>>,
        kind: DeclaredType,
    },
    Procedure {
        name: Identifier<'i>,
        parameters: Vec<Parameter<'i>>,
        body: Option<Vec<Declaration<'i>>>,
    },
    Function {
        name: Identifier<'i>,
        parameters: Vec<Parameter<'i>>,
        returns: DeclaredType,
        body: Option<Vec<Declaration<'i>>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program<'i> {
    pub declarations: Vec<Declaration<'i>>,
}

impl<'i> Program<'i> {
    /// Count every declaration, including those nested inside bodies.
    pub fn count(&self) -> usize {
        fn walk(declarations: &[Declaration]) -> usize {
            declarations
                .iter()
                .map(|declaration| match declaration {
                    Declaration::Procedure {
                        body: Some(body), ..
                    }
                    | Declaration::Function {
                        body: Some(body), ..
                    } => 1 + walk(body),
                    _ => 1,
                })
                .sum()
        }
        walk(&self.declarations)
    }
}
