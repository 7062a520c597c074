use crate::problem::Present;
use declcheck::{formatting::Render, language::*, parsing::parser::ParsingError};

fn integer() -> DeclaredType {
    DeclaredType::Primitive(PrimitiveType::Integer)
}

fn real() -> DeclaredType {
    DeclaredType::Primitive(PrimitiveType::Real)
}

fn examples(declarations: &[Declaration], renderer: &dyn Render) -> String {
    declarations
        .iter()
        .flat_map(|declaration| {
            declaration
                .present(renderer)
                .lines()
                .map(|line| format!("    {}", line))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generate problem and detail messages for parsing errors, with examples
/// of correct declarations where that helps.
pub fn generate_error_message(error: &ParsingError, renderer: &dyn Render) -> (String, String) {
    match error {
        ParsingError::InvalidCharacter(_, c) => (
            format!("Invalid character '{}'", c),
            r#"
Declarations are made up of keywords, identifiers, numbers and the
punctuation : ; , ( ) [ ] and .. along with whitespace and comments.
Identifiers must begin with a letter.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::UnterminatedComment(_) => (
            "Unterminated comment".to_string(),
            "A comment opened with '{' must be closed with a matching '}'.".to_string(),
        ),
        ParsingError::Expected(_, expected, found) => (
            format!("Expected {}", expected),
            format!(
                "The parser was looking for {} but found {} instead.",
                expected, found
            ),
        ),
        ParsingError::NotADeclaration(_, found) => {
            let samples = vec![
                Declaration::Variable {
                    names: vec![Identifier("count"), Identifier("total")],
                    kind: integer(),
                },
                Declaration::Procedure {
                    name: Identifier("reset"),
                    parameters: vec![],
                    body: None,
                },
                Declaration::Function {
                    name: Identifier("average"),
                    parameters: vec![Parameter {
                        name: Identifier("n"),
                        kind: integer(),
                    }],
                    returns: real(),
                    body: None,
                },
            ];

            (
                "Expected a declaration".to_string(),
                format!(
                    r#"
Found {} where a declaration should begin. Every declaration starts with
one of the keywords var, procedure or function, for example:

{}
                    "#,
                    found,
                    examples(&samples, renderer)
                )
                .trim_ascii()
                .to_string(),
            )
        }
        ParsingError::UnknownType(_, found) => {
            let types = vec![
                integer(),
                DeclaredType::Primitive(PrimitiveType::Char),
                DeclaredType::String(Some(80)),
                DeclaredType::Array {
                    low: 1,
                    high: 10,
                    element: Box::new(real()),
                },
            ];
            let types = types
                .iter()
                .map(|kind| kind.present(renderer))
                .collect::<Vec<_>>()
                .join(", ");

            (
                format!("Unknown type {}", found),
                format!(
                    r#"
Types are one of integer, real, char, boolean, a string with an optional
size, or an array with bounds and an element type, such as:

    {}
                    "#,
                    types
                )
                .trim_ascii()
                .to_string(),
            )
        }
        ParsingError::NameConflict(
            _,
            kind @ (SymbolKind::Variable | SymbolKind::Parameter),
            name,
            line,
        ) => {
            let samples = vec![Declaration::Variable {
                names: vec![Identifier(name)],
                kind: integer(),
            }];

            (
                format!("Duplicate declaration of {} '{}'", kind, name),
                format!(
                    r#"
The name {} was already declared on line {} in the same scope. A variable
may only be declared once in each procedure or function body (or once at
the top level), and its name cannot also be used for a procedure or
function in that scope. Rename one of them, or keep a single declaration:

{}
                    "#,
                    Identifier(name).present(renderer),
                    line,
                    examples(&samples, renderer)
                )
                .trim_ascii()
                .to_string(),
            )
        }
        ParsingError::NameConflict(_, kind, name, line) => {
            let samples = vec![
                Declaration::Procedure {
                    name: Identifier(name),
                    parameters: vec![],
                    body: None,
                },
                Declaration::Procedure {
                    name: Identifier(name),
                    parameters: vec![],
                    body: Some(vec![]),
                },
            ];

            (
                format!("Duplicate declaration of {} '{}'", kind, name),
                format!(
                    r#"
The name {} was already declared on line {} in the same scope. A
procedure or function may only be declared a second time to complete an
earlier forward declaration of the same kind:

{}
                    "#,
                    Identifier(name).present(renderer),
                    line,
                    examples(&samples, renderer)
                )
                .trim_ascii()
                .to_string(),
            )
        }
        ParsingError::DuplicateParameter(_, name) => (
            format!("Duplicate parameter '{}'", name),
            format!(
                "Each parameter of a procedure or function needs a distinct name, but {} appears more than once.",
                Identifier(name).present(renderer)
            ),
        ),
        ParsingError::InvalidStringSize(_, size) => (
            format!("Invalid string size {}", size),
            format!(
                "The size of a string must be between 1 and 255, as in {}.",
                DeclaredType::String(Some(255)).present(renderer)
            ),
        ),
        ParsingError::InvalidArrayRange(_, low, high) => (
            format!("Invalid array range [{}..{}]", low, high),
            format!(
                "The lower bound of an array must be less than its upper bound, as in {}.",
                DeclaredType::Array {
                    low: 1,
                    high: 10,
                    element: Box::new(integer())
                }
                .present(renderer)
            ),
        ),
        ParsingError::InvalidReturnType(_, kind) => {
            let samples = vec![Declaration::Function {
                name: Identifier("square"),
                parameters: vec![Parameter {
                    name: Identifier("x"),
                    kind: real(),
                }],
                returns: real(),
                body: None,
            }];

            (
                format!("Invalid return type {}", kind),
                format!(
                    r#"
Functions may only return {} or {}, for example:

{}
                    "#,
                    integer().present(renderer),
                    real().present(renderer),
                    examples(&samples, renderer)
                )
                .trim_ascii()
                .to_string(),
            )
        }
        ParsingError::NumberTooLarge(_, text) => (
            "Number too large".to_string(),
            format!(
                "The number {} is too large to be used as an array bound.",
                text
            ),
        ),
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use declcheck::formatting::Identity;

    #[test]
    fn name_conflict_shows_forward_example() {
        let error = ParsingError::NameConflict(
            Position::new(2, 11, 38),
            SymbolKind::Procedure,
            "Proc1".to_string(),
            1,
        );
        let (problem, details) = generate_error_message(&error, &Identity);

        assert_eq!(problem, "Duplicate declaration of procedure 'Proc1'");
        assert!(details.contains("line 1"));
        assert!(details.contains("    procedure Proc1; forward;"));
    }

    #[test]
    fn variable_conflict_has_its_own_explanation() {
        let error = ParsingError::NameConflict(
            Position::new(1, 8, 7),
            SymbolKind::Variable,
            "a".to_string(),
            1,
        );
        let (problem, details) = generate_error_message(&error, &Identity);

        assert_eq!(problem, "Duplicate declaration of variable 'a'");
        assert!(details.contains("A variable\nmay only be declared once"));
        assert!(details.contains("    var a: integer;"));
        assert!(!details.contains("forward"));
    }

    #[test]
    fn return_type_example() {
        let error = ParsingError::InvalidReturnType(Position::new(1, 13, 12), "char".to_string());
        let (_, details) = generate_error_message(&error, &Identity);

        assert!(details.contains("function square(x: real): real; forward;"));
    }
}
