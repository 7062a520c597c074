use declcheck::language::{DiagnosticKind, Position};
use declcheck::parsing::{self, parser::ParsingError};

/// Helper function to check that parsing produces an error of the expected
/// kind, ignoring its payload
fn expect_error(content: &str, expected: ParsingError) {
    let result = parsing::parse(content);
    match result {
        Ok(_) => panic!(
            "Expected parsing to fail, but it succeeded for input: {}",
            content
        ),
        Err(errors) => {
            let found_expected = errors
                .iter()
                .any(|error| std::mem::discriminant(error) == std::mem::discriminant(&expected));

            if !found_expected {
                panic!(
                    "Expected error type like {:?} but got: {:?} for input '{}'",
                    expected, errors, content
                );
            }
        }
    }
}

#[test]
fn invalid_character_is_located() {
    let result = parsing::parse("var x: integer;\nvar y: integer = 5;");

    assert_eq!(
        result,
        Err(vec![ParsingError::InvalidCharacter(
            Position::new(2, 16, 31),
            '='
        )])
    );
}

#[test]
fn unterminated_comment_is_located() {
    let result = parsing::parse("var x: integer;\n{ never closed");

    assert_eq!(
        result,
        Err(vec![ParsingError::UnterminatedComment(Position::new(
            2, 1, 16
        ))])
    );
}

#[test]
fn lexical_errors_stop_everything() {
    // the duplicate would be a semantic problem, but tokenizing fails first
    let outcome = parsing::check("var a, a: integer; #");

    assert!(!outcome.ok);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].kind, DiagnosticKind::Lexical);
    assert_eq!(outcome.errors[0].message, "invalid character '#'");
}

#[test]
fn kinds_of_error() {
    expect_error(
        "var wrongVar integer;",
        ParsingError::Expected(Position::default(), "", String::new()),
    );
    expect_error(
        "begin end;",
        ParsingError::NotADeclaration(Position::default(), String::new()),
    );
    expect_error(
        "var x: text;",
        ParsingError::UnknownType(Position::default(), String::new()),
    );
    expect_error(
        "procedure Proc2(a: integer; a: real); begin end;",
        ParsingError::DuplicateParameter(Position::default(), String::new()),
    );
    expect_error(
        "var s: string[0];",
        ParsingError::InvalidStringSize(Position::default(), String::new()),
    );
    expect_error(
        "var arr: array[10..5] of integer;",
        ParsingError::InvalidArrayRange(Position::default(), 0, 0),
    );
    expect_error(
        "function f: boolean; forward;",
        ParsingError::InvalidReturnType(Position::default(), String::new()),
    );
}

#[test]
fn first_error_is_earliest_position() {
    // both problems are semantic, and are found in source order
    let outcome = parsing::check(
        "procedure A; begin end;\nvar s: string[999];\nprocedure A; begin end;",
    );

    assert!(!outcome.ok);
    assert_eq!(outcome.errors.len(), 2);

    let first = outcome
        .first()
        .unwrap();
    assert_eq!((first.line, first.column), (2, 15));
    assert_eq!(
        first.message,
        "invalid size string[999], must be between 1 and 255"
    );
}

#[test]
fn outcome_serializes_for_callers() {
    let outcome = parsing::check("var wrongVar integer;");
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        value,
        serde_json::json!({
            "ok": false,
            "errors": [{
                "type": "syntax",
                "message": "expected ':' but found 'integer'",
                "line": 1,
                "col": 14
            }]
        })
    );
}
