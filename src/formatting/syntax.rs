//! Renderers for colourizing declaration source

use crate::language::{Keyword, PrimitiveType};

/// Types of content that can be rendered with different styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Neutral, // default
    Indent,
    Newline,
    Comment,
    Keyword,
    Type,
    Declaration,
    Variable,
    Numeric,
    Punctuation,
}

impl Syntax {
    /// Type names are styled apart from the keywords giving structure.
    pub fn of_keyword(keyword: Keyword) -> Syntax {
        match keyword {
            Keyword::String | Keyword::Array => Syntax::Type,
            other if PrimitiveType::from_keyword(other).is_some() => Syntax::Type,
            _ => Syntax::Keyword,
        }
    }
}

/// Trait for different rendering backends (the no-op no-markup one and ANSI
/// escapes for terminal colouring)
pub trait Render {
    /// Apply styling to content with the specified syntax type
    fn style(&self, content_type: Syntax, content: &str) -> String;
}

/// Returns content unchanged, with no markup applied
pub struct Identity;

impl Render for Identity {
    fn style(&self, _syntax: Syntax, content: &str) -> String {
        content.to_string()
    }
}
