//! Grammar descriptions and the LR(1) check run over them

use tracing::debug;

mod description;
mod error;
mod table;

pub use description::*;
pub use error::*;
pub use table::*;

/// Grammar description of the declaration language accepted by the parser.
pub static DECLARATIONS: &str = include_str!("declarations.json");

/// Read a grammar description from JSON text. This only checks the shape of
/// the JSON; call `validate()` or `build_lr1()` to check the grammar itself.
pub fn from_json(content: &str) -> Result<Grammar, GrammarError> {
    match serde_json::from_str::<Grammar>(content) {
        Ok(grammar) => {
            debug!(
                "Read grammar with {} terminals and {} nonterminals",
                grammar
                    .terminals
                    .len(),
                grammar
                    .nonterminals
                    .len()
            );
            Ok(grammar)
        }
        Err(error) => Err(GrammarError::Malformed(error.to_string())),
    }
}

/// The grammar of the declaration language.
pub fn default_grammar() -> Result<Grammar, GrammarError> {
    from_json(DECLARATIONS)
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn default_grammar_is_lr1() {
        let grammar = default_grammar().unwrap();

        assert_eq!(grammar.start_symbol, "Program");
        assert_eq!(grammar.validate(), Ok(()));

        let verdict = check_lr1(&grammar);
        assert!(verdict.is_lr1, "{}", verdict.message);
    }

    #[test]
    fn default_grammar_covers_every_terminal() {
        let grammar = default_grammar().unwrap();
        let tables = build_lr1(&grammar).unwrap();

        for terminal in &grammar.terminals {
            assert!(
                tables
                    .action
                    .iter()
                    .any(|row| row.contains_key(terminal)),
                "terminal {} is never shifted",
                terminal
            );
        }
    }

    #[test]
    fn tokens_are_terminals_of_default_grammar() {
        let grammar = default_grammar().unwrap();
        let source = "var a, b: array[1..2] of string[9]; procedure P(x: real); forward;\n\
                      function F: integer; begin var c: char; var d: boolean end;";
        let tokens = crate::parsing::lexer::tokenize(source).unwrap();

        for token in &tokens[..tokens.len() - 1] {
            let name = token
                .kind
                .terminal();
            assert!(grammar.is_terminal(name), "{} is not a terminal", name);
        }
    }

    #[test]
    fn malformed_json() {
        let result = from_json("{ \"terminals\": [1, 2] ");
        assert!(matches!(result, Err(GrammarError::Malformed(_))));

        let result = from_json("[]");
        assert!(matches!(result, Err(GrammarError::Malformed(_))));
    }
}
