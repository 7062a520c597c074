use super::*;
use crate::parsing::lexer::tokenize;

fn program(source: &str) -> Result<Program<'_>, Vec<ParsingError>> {
    let tokens = tokenize(source).unwrap();
    parse_program(&tokens)
}

#[test]
fn empty_program() {
    assert_eq!(program(""), Ok(Program::default()));
    assert_eq!(program("  // nothing here\n"), Ok(Program::default()));
}

#[test]
fn procedure_with_parameters() {
    let result = program("procedure Proc1(a: integer; b: real); begin end;");

    assert_eq!(
        result,
        Ok(Program {
            declarations: vec![Declaration::Procedure {
                name: Identifier("Proc1"),
                parameters: vec![
                    Parameter {
                        name: Identifier("a"),
                        kind: DeclaredType::Primitive(PrimitiveType::Integer),
                    },
                    Parameter {
                        name: Identifier("b"),
                        kind: DeclaredType::Primitive(PrimitiveType::Real),
                    },
                ],
                body: Some(vec![]),
            }]
        })
    );
}

#[test]
fn variables_and_forward_function() {
    let result = program(
        r#"
var a, b: array[1..10] of string[20];
function f(x: integer; y, z: real): real; forward;
        "#,
    );

    assert_eq!(
        result,
        Ok(Program {
            declarations: vec![
                Declaration::Variable {
                    names: vec![Identifier("a"), Identifier("b")],
                    kind: DeclaredType::Array {
                        low: 1,
                        high: 10,
                        element: Box::new(DeclaredType::String(Some(20))),
                    },
                },
                Declaration::Function {
                    name: Identifier("f"),
                    parameters: vec![
                        Parameter {
                            name: Identifier("x"),
                            kind: DeclaredType::Primitive(PrimitiveType::Integer),
                        },
                        Parameter {
                            name: Identifier("y"),
                            kind: DeclaredType::Primitive(PrimitiveType::Real),
                        },
                        Parameter {
                            name: Identifier("z"),
                            kind: DeclaredType::Primitive(PrimitiveType::Real),
                        },
                    ],
                    returns: DeclaredType::Primitive(PrimitiveType::Real),
                    body: None,
                },
            ]
        })
    );
}

#[test]
fn nested_bodies() {
    let result = program(
        r#"
procedure Outer;
begin
    var count: integer;
    procedure Middle();
    begin
        function Inner(n: integer): integer;
        begin
        end;
    end
end;
        "#,
    );

    let program = result.unwrap();
    assert_eq!(program.count(), 4);

    match &program.declarations[0] {
        Declaration::Procedure {
            name,
            body: Some(body),
            ..
        } => {
            assert_eq!(*name, Identifier("Outer"));
            assert_eq!(body.len(), 2);
        }
        other => panic!("unexpected declaration {:?}", other),
    }
}

#[test]
fn semicolon_after_end_is_optional() {
    assert!(program("procedure A; begin end procedure B; begin end").is_ok());
}

#[test]
fn empty_parentheses() {
    assert!(program("procedure A(); begin end;").is_ok());
}

#[test]
fn plain_string_type() {
    let result = program("var s: string;");
    assert_eq!(
        result,
        Ok(Program {
            declarations: vec![Declaration::Variable {
                names: vec![Identifier("s")],
                kind: DeclaredType::String(None),
            }]
        })
    );
}

#[test]
fn scenario_valid_procedure() {
    let tokens = tokenize("procedure Proc1(a: integer; b: real); begin end;").unwrap();
    let outcome = parse(&tokens);

    assert!(outcome.ok);
    assert!(outcome
        .errors
        .is_empty());
}

#[test]
fn scenario_missing_colon() {
    let tokens = tokenize("var wrongVar integer;").unwrap();
    let outcome = parse(&tokens);

    assert!(!outcome.ok);
    let first = outcome
        .first()
        .unwrap();
    assert_eq!(first.kind, DiagnosticKind::Syntax);
    assert_eq!((first.line, first.column), (1, 14));
    assert_eq!(first.message, "expected ':' but found 'integer'");
}

#[test]
fn scenario_duplicate_parameter() {
    let tokens = tokenize("procedure Proc2(a: integer; a: real); begin end;").unwrap();
    let outcome = parse(&tokens);

    assert!(!outcome.ok);
    let first = outcome
        .first()
        .unwrap();
    assert_eq!(first.kind, DiagnosticKind::Semantic);
    assert_eq!(first.message, "duplicate parameter 'a'");
    assert_eq!((first.line, first.column), (1, 29));
}

#[test]
fn scenario_sibling_conflict() {
    let tokens = tokenize("procedure Proc1; begin end;\nprocedure Proc1; begin end;").unwrap();
    let outcome = parse(&tokens);

    assert!(!outcome.ok);
    assert_eq!(
        outcome.errors,
        vec![Diagnostic::new(
            DiagnosticKind::Semantic,
            "procedure name 'Proc1' conflicts with the symbol declared on line 1".to_string(),
            Position::new(2, 11, 38)
        )]
    );
}

#[test]
fn scenario_type_bounds() {
    let tokens = tokenize("var s: string[0];").unwrap();
    let outcome = parse(&tokens);
    let first = outcome
        .first()
        .unwrap();
    assert_eq!(first.kind, DiagnosticKind::Semantic);
    assert_eq!(
        first.message,
        "invalid size string[0], must be between 1 and 255"
    );

    let tokens = tokenize("var arr: array[10..5] of integer;").unwrap();
    let outcome = parse(&tokens);
    let first = outcome
        .first()
        .unwrap();
    assert_eq!(first.kind, DiagnosticKind::Semantic);
    assert_eq!((first.line, first.column), (1, 16));
    assert!(first
        .message
        .contains("[10..5]"));
}

#[test]
fn forward_round_trip() {
    let result = program(
        "procedure P; forward;\nprocedure P; begin end;\nprocedure P; begin end;",
    );

    assert_eq!(
        result,
        Err(vec![ParsingError::NameConflict(
            Position::new(3, 11, 56),
            SymbolKind::Procedure,
            "P".to_string(),
            1
        )])
    );
}

#[test]
fn fresh_scope_for_every_parse() {
    let tokens = tokenize("procedure P; begin end;").unwrap();

    assert!(parse(&tokens).ok);
    assert!(parse(&tokens).ok);
}

#[test]
fn truncated_token_slice() {
    let tokens = tokenize("var x: integer").unwrap();

    // drop the end of input marker
    let result = parse_program(&tokens[..tokens.len() - 1]);
    assert_eq!(
        result,
        Err(vec![ParsingError::Expected(
            Position::new(1, 15, 14),
            "';'",
            "end of input".to_string()
        )])
    );
}
