use super::*;
use crate::parsing::lexer::tokenize;

/// Helper function to check if parsing produces the expected error
fn expect_error(content: &str, expected: ParsingError) {
    let tokens = tokenize(content).unwrap();
    let result = parse_program(&tokens);
    match result {
        Ok(_) => panic!(
            "Expected parsing to fail, but it succeeded for input: {}",
            content
        ),
        Err(errors) => {
            // Check if any error exactly matches the expected error
            let found_expected = errors.contains(&expected);

            if !found_expected {
                panic!(
                    "Expected error {:?} but got: {:?} for input '{}'",
                    expected, errors, content
                );
            }
        }
    }
}

#[test]
fn missing_procedure_name() {
    expect_error(
        "procedure (a: integer);",
        ParsingError::Expected(Position::new(1, 11, 10), "a procedure name", "'('".to_string()),
    );
}

#[test]
fn missing_semicolon_after_heading() {
    expect_error(
        "procedure P begin end;",
        ParsingError::Expected(Position::new(1, 13, 12), "';'", "'begin'".to_string()),
    );
}

#[test]
fn missing_body() {
    expect_error(
        "procedure P;",
        ParsingError::Expected(
            Position::new(1, 13, 12),
            "'begin' or 'forward'",
            "end of input".to_string(),
        ),
    );
}

#[test]
fn unclosed_body() {
    expect_error(
        "procedure P; begin var x: integer;",
        ParsingError::Expected(
            Position::new(1, 35, 34),
            "a declaration or 'end'",
            "end of input".to_string(),
        ),
    );
}

#[test]
fn statement_inside_body() {
    expect_error(
        "procedure P; begin x end;",
        ParsingError::Expected(
            Position::new(1, 20, 19),
            "a declaration or 'end'",
            "'x'".to_string(),
        ),
    );
    // keywords which cannot begin a declaration end the list too
    expect_error(
        "procedure P; begin integer end;",
        ParsingError::Expected(
            Position::new(1, 20, 19),
            "a declaration or 'end'",
            "'integer'".to_string(),
        ),
    );
}

#[test]
fn stray_token_at_top_level() {
    expect_error(
        "var x: integer; end;",
        ParsingError::NotADeclaration(Position::new(1, 17, 16), "'end'".to_string()),
    );
    expect_error(
        "hello",
        ParsingError::NotADeclaration(Position::new(1, 1, 0), "'hello'".to_string()),
    );
}

#[test]
fn function_requires_return_type() {
    expect_error(
        "function f; begin end;",
        ParsingError::Expected(Position::new(1, 11, 10), "':'", "';'".to_string()),
    );
}

#[test]
fn function_return_types() {
    expect_error(
        "function f: char; begin end;",
        ParsingError::InvalidReturnType(Position::new(1, 13, 12), "char".to_string()),
    );
    expect_error(
        "function f: string[10]; forward;",
        ParsingError::InvalidReturnType(Position::new(1, 13, 12), "string[10]".to_string()),
    );
    expect_error(
        "function f: array[1..2] of integer; forward;",
        ParsingError::InvalidReturnType(
            Position::new(1, 13, 12),
            "array[1..2] of integer".to_string(),
        ),
    );
}

#[test]
fn unknown_types() {
    expect_error(
        "var x: foo;",
        ParsingError::UnknownType(Position::new(1, 8, 7), "'foo'".to_string()),
    );
    expect_error(
        "var x: begin;",
        ParsingError::UnknownType(Position::new(1, 8, 7), "'begin'".to_string()),
    );
    expect_error(
        "var x: ;",
        ParsingError::Expected(Position::new(1, 8, 7), "a type", "';'".to_string()),
    );
}

#[test]
fn string_sizes() {
    expect_error(
        "var s: string[256];",
        ParsingError::InvalidStringSize(Position::new(1, 15, 14), "256".to_string()),
    );
    expect_error(
        "var s: string[99999999999];",
        ParsingError::InvalidStringSize(Position::new(1, 15, 14), "99999999999".to_string()),
    );

    let tokens = tokenize("var s: string[1]; var t: string[255];").unwrap();
    assert!(parse_program(&tokens).is_ok());
}

#[test]
fn array_ranges() {
    expect_error(
        "var a: array[3..3] of char;",
        ParsingError::InvalidArrayRange(Position::new(1, 14, 13), 3, 3),
    );
    expect_error(
        "var a: array[1..99999999999999999999] of char;",
        ParsingError::NumberTooLarge(
            Position::new(1, 17, 16),
            "99999999999999999999".to_string(),
        ),
    );
    expect_error(
        "var a: array[1 10] of char;",
        ParsingError::Expected(Position::new(1, 16, 15), "'..'", "'10'".to_string()),
    );
}

#[test]
fn nested_array_bounds_are_checked() {
    expect_error(
        "var grid: array[1..3] of array[5..1] of boolean;",
        ParsingError::InvalidArrayRange(Position::new(1, 32, 31), 5, 1),
    );
}

#[test]
fn duplicate_names_in_one_variable_list() {
    expect_error(
        "var a, b, a: integer;",
        ParsingError::NameConflict(
            Position::new(1, 11, 10),
            SymbolKind::Variable,
            "a".to_string(),
            1,
        ),
    );
}

#[test]
fn variable_conflicts_with_procedure() {
    expect_error(
        "procedure P; forward;\nvar P: integer;",
        ParsingError::NameConflict(
            Position::new(2, 5, 26),
            SymbolKind::Variable,
            "P".to_string(),
            1,
        ),
    );
}

#[test]
fn function_cannot_complete_forward_procedure() {
    expect_error(
        "procedure F; forward;\nfunction F: integer; begin end;",
        ParsingError::NameConflict(
            Position::new(2, 10, 31),
            SymbolKind::Function,
            "F".to_string(),
            1,
        ),
    );
}

#[test]
fn inner_scope_may_reuse_outer_names() {
    let tokens = tokenize(
        r#"
procedure P(P: integer);
begin
    procedure P;
    begin
    end;
end;
        "#,
    )
    .unwrap();

    assert!(parse_program(&tokens).is_ok());
}

#[test]
fn conflicts_in_nested_scopes() {
    expect_error(
        "procedure Outer; begin\n  procedure A; begin end;\n  procedure A; begin end;\nend;",
        ParsingError::NameConflict(
            Position::new(3, 13, 61),
            SymbolKind::Procedure,
            "A".to_string(),
            2,
        ),
    );
}

#[test]
fn semantic_problems_survive_a_later_syntax_error() {
    let tokens = tokenize("var s: string[300]; var x integer;").unwrap();
    let result = parse_program(&tokens);

    assert_eq!(
        result,
        Err(vec![
            ParsingError::InvalidStringSize(Position::new(1, 15, 14), "300".to_string()),
            ParsingError::Expected(Position::new(1, 27, 26), "':'", "'integer'".to_string()),
        ])
    );
}

#[test]
fn diagnostics_classify_their_kind() {
    assert_eq!(
        ParsingError::InvalidCharacter(Position::default(), '#').kind(),
        DiagnosticKind::Lexical
    );
    assert_eq!(
        ParsingError::NotADeclaration(Position::default(), "'x'".to_string()).kind(),
        DiagnosticKind::Syntax
    );
    assert_eq!(
        ParsingError::DuplicateParameter(Position::default(), "a".to_string()).kind(),
        DiagnosticKind::Semantic
    );
}
