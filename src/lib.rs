//! Checking of Pascal-style declarations: a position-tracking tokenizer, a
//! recursive descent parser with nested scopes, and an LR(1) table builder
//! used to validate grammar descriptions of the language.

pub mod formatting;
pub mod grammar;
pub mod language;
pub mod parsing;
pub mod rendering;
